//! Byte-Pair-Encoding model -- spec.md 4.5. A `Split`'s text is merged
//! symbol-by-symbol according to a ranked merge table, greedily applying
//! the lowest-rank (earliest-learned) pair first.

mod cache;
mod word;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Model, Result, Token};
use cache::Cache;
use word::Word;

#[derive(Debug)]
pub struct BpeError(String);

impl fmt::Display for BpeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BPE error: {}", self.0)
    }
}

impl std::error::Error for BpeError {}

fn byte_fallback_token(byte: u8) -> String {
    format!("<0x{:02X}>", byte)
}

/// The model for a `TokenizerImpl`, configured via `BpeBuilder`.
pub struct BPE {
    vocab: HashMap<String, u32>,
    vocab_r: HashMap<u32, String>,
    merges: HashMap<(u32, u32), (u32, u32)>,
    cache: Cache<String, Word>,
    dropout: Option<f32>,
    unk_token: Option<String>,
    continuing_subword_prefix: Option<String>,
    end_of_word_suffix: Option<String>,
    fuse_unk: bool,
    byte_fallback: bool,
    ignore_merges: bool,
}

impl fmt::Debug for BPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPE")
            .field("vocab_size", &self.vocab.len())
            .field("merges", &self.merges.len())
            .field("dropout", &self.dropout)
            .field("unk_token", &self.unk_token)
            .finish()
    }
}

#[derive(Default)]
pub struct BpeBuilder {
    vocab: HashMap<String, u32>,
    merges: Vec<(String, String)>,
    dropout: Option<f32>,
    unk_token: Option<String>,
    continuing_subword_prefix: Option<String>,
    end_of_word_suffix: Option<String>,
    fuse_unk: bool,
    byte_fallback: bool,
    ignore_merges: bool,
    cache_capacity: Option<usize>,
}

impl BpeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vocab(mut self, vocab: HashMap<String, u32>) -> Self {
        self.vocab = vocab;
        self
    }

    pub fn merges(mut self, merges: Vec<(String, String)>) -> Self {
        self.merges = merges;
        self
    }

    pub fn dropout(mut self, dropout: f32) -> Self {
        self.dropout = Some(dropout);
        self
    }

    pub fn unk_token(mut self, unk_token: String) -> Self {
        self.unk_token = Some(unk_token);
        self
    }

    pub fn continuing_subword_prefix(mut self, prefix: String) -> Self {
        self.continuing_subword_prefix = Some(prefix);
        self
    }

    pub fn end_of_word_suffix(mut self, suffix: String) -> Self {
        self.end_of_word_suffix = Some(suffix);
        self
    }

    pub fn fuse_unk(mut self, fuse_unk: bool) -> Self {
        self.fuse_unk = fuse_unk;
        self
    }

    pub fn byte_fallback(mut self, byte_fallback: bool) -> Self {
        self.byte_fallback = byte_fallback;
        self
    }

    pub fn ignore_merges(mut self, ignore_merges: bool) -> Self {
        self.ignore_merges = ignore_merges;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<BPE> {
        if self.vocab.is_empty() {
            return Err(Box::new(BpeError("vocab must not be empty".into())));
        }
        if let Some(unk) = &self.unk_token {
            if !self.vocab.contains_key(unk) {
                return Err(Box::new(BpeError(format!(
                    "unk_token `{}` is not in the vocab",
                    unk
                ))));
            }
        }

        let vocab_r = self
            .vocab
            .iter()
            .map(|(token, id)| (*id, token.clone()))
            .collect();

        // A merge whose endpoints or resulting concatenation aren't in the
        // vocab is silently skipped rather than rejected outright: it just
        // never fires, same as any other pair that's absent from the table.
        let mut merges = HashMap::with_capacity(self.merges.len());
        for (rank, (a, b)) in self.merges.into_iter().enumerate() {
            let (a_id, b_id) = match (self.vocab.get(&a), self.vocab.get(&b)) {
                (Some(&a_id), Some(&b_id)) => (a_id, b_id),
                _ => continue,
            };
            let b_without_prefix = self
                .continuing_subword_prefix
                .as_ref()
                .and_then(|prefix| b.strip_prefix(prefix.as_str()))
                .unwrap_or(&b);
            let new_token = format!("{}{}", a, b_without_prefix);
            if let Some(&new_id) = self.vocab.get(&new_token) {
                merges.insert((a_id, b_id), (rank as u32, new_id));
            }
        }

        let cache = Cache::new(self.cache_capacity.unwrap_or(cache::DEFAULT_CACHE_CAPACITY));

        Ok(BPE {
            vocab: self.vocab,
            vocab_r,
            merges,
            cache,
            dropout: self.dropout,
            unk_token: self.unk_token,
            continuing_subword_prefix: self.continuing_subword_prefix,
            end_of_word_suffix: self.end_of_word_suffix,
            fuse_unk: self.fuse_unk,
            byte_fallback: self.byte_fallback,
            ignore_merges: self.ignore_merges,
        })
    }
}

impl BPE {
    pub fn builder() -> BpeBuilder {
        BpeBuilder::new()
    }

    /// Clears the merge cache. Useful after swapping dropout on or off, so
    /// stale non-dropout merges don't linger.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn merge_word(&self, sequence: &str) -> Word {
        let mut word = Word::new();
        let chars: Vec<char> = sequence.chars().collect();

        for (i, &c) in chars.iter().enumerate() {
            let char_len = c.len_utf8();
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);

            let prefix = if i > 0 {
                self.continuing_subword_prefix.as_deref().unwrap_or("")
            } else {
                ""
            };
            let suffix = if i == chars.len() - 1 {
                self.end_of_word_suffix.as_deref().unwrap_or("")
            } else {
                ""
            };
            let candidate = format!("{}{}{}", prefix, encoded, suffix);

            if let Some(&id) = self.vocab.get(&candidate) {
                word.add(id, char_len);
                continue;
            }

            if self.byte_fallback {
                for byte in encoded.as_bytes() {
                    if let Some(&id) = self.vocab.get(&byte_fallback_token(*byte)) {
                        word.add(id, 1);
                    }
                }
                continue;
            }

            if let Some(unk) = &self.unk_token {
                if let Some(&id) = self.vocab.get(unk) {
                    word.add_unk(id, char_len, self.fuse_unk);
                }
            }
        }

        word
    }

    fn word_to_tokens(&self, word: &Word) -> Vec<Token> {
        word.to_tokens(&self.vocab_r)
    }

    /// Reconstructs the original ranked merge list, for serialization.
    pub(crate) fn merges_in_rank_order(&self) -> Vec<(String, String)> {
        let mut ordered: Vec<_> = self.merges.iter().collect();
        ordered.sort_by_key(|(_, (rank, _))| *rank);
        ordered
            .into_iter()
            .filter_map(|((a, b), _)| {
                let a = self.vocab_r.get(a)?.clone();
                let b = self.vocab_r.get(b)?.clone();
                Some((a, b))
            })
            .collect()
    }

    pub fn get_dropout(&self) -> Option<f32> {
        self.dropout
    }

    pub fn get_unk_token(&self) -> Option<&str> {
        self.unk_token.as_deref()
    }

    pub fn get_continuing_subword_prefix(&self) -> Option<&str> {
        self.continuing_subword_prefix.as_deref()
    }

    pub fn get_end_of_word_suffix(&self) -> Option<&str> {
        self.end_of_word_suffix.as_deref()
    }

    pub fn get_fuse_unk(&self) -> bool {
        self.fuse_unk
    }

    pub fn get_byte_fallback(&self) -> bool {
        self.byte_fallback
    }

    pub fn get_ignore_merges(&self) -> bool {
        self.ignore_merges
    }
}

impl Model for BPE {
    fn tokenize_split(&self, sequence: &str) -> Result<Vec<Token>> {
        if sequence.is_empty() {
            return Ok(vec![]);
        }

        if self.ignore_merges {
            if let Some(&id) = self.vocab.get(sequence) {
                return Ok(vec![Token::new(id, sequence.to_owned(), (0, sequence.len()))]);
            }
        }

        let use_cache = self.dropout.unwrap_or(0.0) == 0.0;
        if use_cache {
            if let Some(word) = self.cache.get(&sequence.to_owned()) {
                return Ok(self.word_to_tokens(&word));
            }
        }

        let mut word = self.merge_word(sequence);
        word.merge_all(&self.merges, self.dropout);
        let tokens = self.word_to_tokens(&word);

        if use_cache {
            self.cache.set(sequence.to_owned(), word);
        }

        Ok(tokens)
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    fn id_to_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(&id).map(String::as_str)
    }

    fn get_vocab(&self) -> &HashMap<String, u32> {
        &self.vocab
    }

    fn get_vocab_size(&self) -> usize {
        self.vocab.len()
    }
}

#[derive(Serialize, Deserialize)]
struct BpeSerde {
    vocab: HashMap<String, u32>,
    merges: Vec<(String, String)>,
    #[serde(default)]
    dropout: Option<f32>,
    #[serde(default)]
    unk_token: Option<String>,
    #[serde(default)]
    continuing_subword_prefix: Option<String>,
    #[serde(default)]
    end_of_word_suffix: Option<String>,
    #[serde(default)]
    fuse_unk: bool,
    #[serde(default)]
    byte_fallback: bool,
    #[serde(default)]
    ignore_merges: bool,
}

impl Serialize for BPE {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        BpeSerde {
            vocab: self.vocab.clone(),
            merges: self.merges_in_rank_order(),
            dropout: self.dropout,
            unk_token: self.unk_token.clone(),
            continuing_subword_prefix: self.continuing_subword_prefix.clone(),
            end_of_word_suffix: self.end_of_word_suffix.clone(),
            fuse_unk: self.fuse_unk,
            byte_fallback: self.byte_fallback,
            ignore_merges: self.ignore_merges,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BPE {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = BpeSerde::deserialize(deserializer)?;
        let mut builder = BpeBuilder::new().vocab(helper.vocab).merges(helper.merges);
        if let Some(dropout) = helper.dropout {
            builder = builder.dropout(dropout);
        }
        if let Some(unk_token) = helper.unk_token {
            builder = builder.unk_token(unk_token);
        }
        if let Some(prefix) = helper.continuing_subword_prefix {
            builder = builder.continuing_subword_prefix(prefix);
        }
        if let Some(suffix) = helper.end_of_word_suffix {
            builder = builder.end_of_word_suffix(suffix);
        }
        builder = builder
            .fuse_unk(helper.fuse_unk)
            .byte_fallback(helper.byte_fallback)
            .ignore_merges(helper.ignore_merges);
        builder.build().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bpe() -> BPE {
        let vocab: HashMap<String, u32> = [
            ("u", 0),
            ("n", 1),
            ("r", 2),
            ("e", 3),
            ("l", 4),
            ("a", 5),
            ("t", 6),
            ("d", 7),
            ("un", 8),
            ("re", 9),
            ("rel", 10),
            ("related", 11),
            ("unrelated", 12),
        ]
        .iter()
        .map(|(s, i)| (s.to_string(), *i))
        .collect();
        let merges = vec![
            ("u".into(), "n".into()),
            ("r".into(), "e".into()),
            ("re".into(), "l".into()),
            ("rel".into(), "a".into()),
            ("rela".into(), "t".into()),
            ("relat".into(), "e".into()),
            ("relate".into(), "d".into()),
            ("un".into(), "related".into()),
        ];
        // `rela`, `relat`, `relate` are never in vocab, so those merges are
        // dropped during build; still exercises the "skip if concatenation
        // missing from vocab" path.
        BpeBuilder::new().vocab(vocab).merges(merges).build().unwrap()
    }

    #[test]
    fn tokenizes_known_word() {
        let model = bpe();
        let tokens = model.tokenize_split("un").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "un");
        assert_eq!(tokens[0].offsets, (0, 2));
    }

    #[test]
    fn ignore_merges_short_circuits() {
        let vocab: HashMap<String, u32> = [("un", 0u32), ("u", 1), ("n", 2)]
            .iter()
            .map(|(s, i)| (s.to_string(), *i))
            .collect();
        let model = BpeBuilder::new()
            .vocab(vocab)
            .merges(vec![])
            .ignore_merges(true)
            .build()
            .unwrap();
        let tokens = model.tokenize_split("un").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, 0);
    }

    #[test]
    fn unknown_symbol_without_unk_is_dropped() {
        let vocab: HashMap<String, u32> = [("a", 0u32)].iter().map(|(s, i)| (s.to_string(), *i)).collect();
        let model = BpeBuilder::new().vocab(vocab).merges(vec![]).build().unwrap();
        let tokens = model.tokenize_split("ab").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "a");
    }

    #[test]
    fn fuse_unk_merges_consecutive_unknowns() {
        let vocab: HashMap<String, u32> = [("a", 0u32), ("<unk>", 1)]
            .iter()
            .map(|(s, i)| (s.to_string(), *i))
            .collect();
        let model = BpeBuilder::new()
            .vocab(vocab)
            .merges(vec![])
            .unk_token("<unk>".into())
            .fuse_unk(true)
            .build()
            .unwrap();
        let tokens = model.tokenize_split("bbc").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, 1);
        assert_eq!(tokens[0].offsets, (0, 3));
    }
}
