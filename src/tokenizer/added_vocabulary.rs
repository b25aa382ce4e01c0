//! Special/user tokens that must survive normalization and pre-tokenization
//! intact. `AddedVocabulary::extract_and_normalize` runs before the rest of
//! the pipeline and freezes exact occurrences of these tokens as
//! pre-assigned `Token`s (see spec.md 4.7).

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{
    Model, NormalizedString, Normalizer, PreTokenizedString, Range as NRange, Result, Token,
};

/// A token added outside of the model's own vocabulary: a special token
/// (`[CLS]`, `[SEP]`, ...) or a plain user token. The boolean flags are
/// match-time modifiers applied during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedToken {
    pub content: String,
    #[serde(default)]
    pub single_word: bool,
    #[serde(default)]
    pub lstrip: bool,
    #[serde(default)]
    pub rstrip: bool,
    #[serde(default = "default_true")]
    pub normalized: bool,
    #[serde(default)]
    pub special: bool,
}

fn default_true() -> bool {
    true
}

impl AddedToken {
    pub fn from<S: Into<String>>(content: S, special: bool) -> Self {
        Self {
            content: content.into(),
            single_word: false,
            lstrip: false,
            rstrip: false,
            normalized: !special,
            special,
        }
    }

    pub fn single_word(mut self, single_word: bool) -> Self {
        self.single_word = single_word;
        self
    }

    pub fn lstrip(mut self, lstrip: bool) -> Self {
        self.lstrip = lstrip;
        self
    }

    pub fn rstrip(mut self, rstrip: bool) -> Self {
        self.rstrip = rstrip;
        self
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// Wire shape of one entry in the config's `added_tokens` array: the
/// `AddedToken` fields plus the id it must be assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedTokenWithId {
    pub id: u32,
    #[serde(flatten)]
    pub token: AddedToken,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Finds non-overlapping occurrences of `tokens` (already sorted longest
/// content first) in `text`, applying each match's `single_word`/`lstrip`/
/// `rstrip` boundary rules. A linear scan, per spec.md 4.7/9 -- a trie would
/// give the same results faster but is not required for correctness.
fn find_matches<'a>(text: &str, tokens: &'a [AddedToken]) -> Vec<(Range<usize>, &'a AddedToken)> {
    let mut matches = Vec::new();
    let mut pos = 0usize;
    'outer: while pos < text.len() {
        for token in tokens {
            if token.content.is_empty() {
                continue;
            }
            if !text[pos..].starts_with(token.content.as_str()) {
                continue;
            }
            let mut start = pos;
            let mut end = pos + token.content.len();

            if token.single_word {
                let left_ok = start == 0
                    || !text[..start]
                        .chars()
                        .next_back()
                        .map(is_word_char)
                        .unwrap_or(false);
                let right_ok = end == text.len()
                    || !text[end..].chars().next().map(is_word_char).unwrap_or(false);
                if !left_ok || !right_ok {
                    continue;
                }
            }
            if token.lstrip {
                while start > 0 {
                    match text[..start].chars().next_back() {
                        Some(c) if c.is_whitespace() => start -= c.len_utf8(),
                        _ => break,
                    }
                }
            }
            if token.rstrip {
                while end < text.len() {
                    match text[end..].chars().next() {
                        Some(c) if c.is_whitespace() => end += c.len_utf8(),
                        _ => break,
                    }
                }
            }
            matches.push((start..end, token));
            pos = end;
            continue 'outer;
        }
        pos += text[pos..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
    }
    matches
}

/// Carves `normalized` into the alternating matched/unmatched pieces
/// `find_matches` tiled, attaching a pre-assigned `Token` to each match.
/// A matched piece's `Token::offsets` is set to the piece's own full span
/// (`(0, len)`), the same convention `Model`s use, so `PreTokenizedString::
/// into_tokens` rebases both uniformly.
fn split_with_added_tokens(
    normalized: NormalizedString,
    tokens: &[AddedToken],
    ids: &HashMap<String, u32>,
) -> Result<Vec<(NormalizedString, Option<Token>)>> {
    if tokens.is_empty() {
        return Ok(vec![(normalized, None)]);
    }
    let matches = find_matches(normalized.get(), tokens);
    if matches.is_empty() {
        return Ok(vec![(normalized, None)]);
    }

    let mut out = Vec::new();
    let mut cursor = 0usize;
    for (range, token) in matches {
        if range.start > cursor {
            if let Some(piece) = normalized.slice(NRange::Normalized(cursor..range.start)) {
                out.push((piece, None));
            }
        }
        if let Some(piece) = normalized.slice(NRange::Normalized(range.clone())) {
            let id = *ids.get(&token.content).unwrap_or(&0);
            let value = piece.get().to_owned();
            let len = piece.len();
            out.push((piece, Some(Token::new(id, value, (0, len)))));
        }
        cursor = range.end;
    }
    let total_len = normalized.len();
    if cursor < total_len {
        if let Some(piece) = normalized.slice(NRange::Normalized(cursor..total_len)) {
            out.push((piece, None));
        }
    }
    Ok(out)
}

/// Holds every token added outside of a `Model`'s own vocabulary: special
/// tokens (`[CLS]`, `[SEP]`, ...) and user tokens. Sorted into a
/// non-normalized bucket (matched against the raw input) and a normalized
/// bucket (matched after the normalizer runs), longest-content-first so the
/// linear scan prefers the longest match at a given position.
#[derive(Debug, Clone, Default)]
pub struct AddedVocabulary {
    added_tokens_map: HashMap<String, u32>,
    added_tokens_map_r: HashMap<u32, AddedToken>,
    special_tokens: HashSet<String>,
    split_normalized: Vec<AddedToken>,
    split_non_normalized: Vec<AddedToken>,
}

/// Serializes as the ordered `added_tokens` array of spec.md 6; the
/// `Tokenizer` (de)serialization logic rebuilds the matcher buckets by
/// calling `add_tokens`/`add_special_tokens` again (see
/// `tokenizer::serialization`), the same two-way split the teacher's
/// `tokenizer/serialization.rs` already uses.
impl Serialize for AddedVocabulary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut entries: Vec<AddedTokenWithId> = self
            .added_tokens_map_r
            .iter()
            .map(|(id, token)| AddedTokenWithId {
                id: *id,
                token: token.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.id);
        entries.serialize(serializer)
    }
}

impl AddedVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.added_tokens_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added_tokens_map.is_empty()
    }

    pub fn get_vocab(&self) -> &HashMap<String, u32> {
        &self.added_tokens_map
    }

    pub fn is_special_token(&self, token: &str) -> bool {
        self.special_tokens.contains(token)
    }

    pub fn token_to_id<M: Model>(&self, token: &str, model: &M) -> Option<u32> {
        self.added_tokens_map
            .get(token)
            .copied()
            .or_else(|| model.token_to_id(token))
    }

    pub fn id_to_token<'s, M: Model>(&'s self, id: u32, model: &'s M) -> Option<&'s str> {
        self.added_tokens_map_r
            .get(&id)
            .map(|t| t.content.as_str())
            .or_else(|| model.id_to_token(id))
    }

    fn add<M: Model, N: Normalizer>(
        &mut self,
        tokens: &[AddedToken],
        model: &M,
        normalizer: Option<&N>,
        mark_special: bool,
    ) -> usize {
        let mut added = 0;
        for token in tokens {
            let already_present = self.added_tokens_map.contains_key(&token.content)
                || model.token_to_id(&token.content).is_some();
            if mark_special {
                self.special_tokens.insert(token.content.clone());
            }
            let mut token = token.clone();
            token.special = token.special || mark_special;
            if already_present {
                if let Some(&id) = self.added_tokens_map.get(&token.content) {
                    self.added_tokens_map_r.insert(id, token);
                }
                continue;
            }

            let next_id = self
                .added_tokens_map
                .values()
                .copied()
                .max()
                .map(|m| m + 1)
                .unwrap_or_else(|| model.get_vocab_size() as u32);
            self.added_tokens_map.insert(token.content.clone(), next_id);
            self.added_tokens_map_r.insert(next_id, token.clone());
            added += 1;

            let mut normalized_copy = token.clone();
            if let Some(normalizer) = normalizer {
                if token.normalized {
                    let mut ns = NormalizedString::from(token.content.as_str());
                    if normalizer.normalize(&mut ns).is_ok() {
                        normalized_copy.content = ns.get().to_owned();
                    }
                }
            }

            if token.normalized {
                self.split_normalized.push(normalized_copy);
            } else {
                self.split_non_normalized.push(token);
            }
        }
        self.split_normalized
            .sort_by_key(|t| std::cmp::Reverse(t.content.len()));
        self.split_non_normalized
            .sort_by_key(|t| std::cmp::Reverse(t.content.len()));
        added
    }

    pub fn add_tokens<M: Model, N: Normalizer>(
        &mut self,
        tokens: &[AddedToken],
        model: &M,
        normalizer: Option<&N>,
    ) -> usize {
        self.add(tokens, model, normalizer, false)
    }

    pub fn add_special_tokens<M: Model, N: Normalizer>(
        &mut self,
        tokens: &[AddedToken],
        model: &M,
        normalizer: Option<&N>,
    ) -> usize {
        self.add(tokens, model, normalizer, true)
    }

    /// Runs the non-normalized trie against the raw input, then the
    /// normalizer on every piece it didn't match, then the normalized trie
    /// -- spec.md 4.7's three-step `extract_and_normalize`.
    pub fn extract_and_normalize<N: Normalizer>(
        &self,
        normalizer: Option<&N>,
        sequence: &str,
    ) -> PreTokenizedString {
        let mut pretokenized = PreTokenizedString::from(sequence);

        pretokenized
            .split_with_tokens(|_, normalized| {
                split_with_added_tokens(normalized, &self.split_non_normalized, &self.added_tokens_map)
            })
            .expect("splitting on non-normalized added tokens cannot fail");

        pretokenized
            .split_with_tokens(|_, mut normalized| {
                if let Some(normalizer) = normalizer {
                    normalizer.normalize(&mut normalized)?;
                }
                split_with_added_tokens(normalized, &self.split_normalized, &self.added_tokens_map)
            })
            .expect("normalizing and splitting on normalized added tokens cannot fail");

        pretokenized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::NormalizedString as NS;

    struct NoopNormalizer;
    impl Normalizer for NoopNormalizer {
        fn normalize(&self, _normalized: &mut NS) -> Result<()> {
            Ok(())
        }
    }

    struct DummyModel;
    impl Model for DummyModel {
        fn tokenize_split(&self, _sequence: &str) -> Result<Vec<Token>> {
            Ok(vec![])
        }
        fn token_to_id(&self, _token: &str) -> Option<u32> {
            None
        }
        fn id_to_token(&self, _id: u32) -> Option<&str> {
            None
        }
        fn get_vocab(&self) -> &HashMap<String, u32> {
            unimplemented!()
        }
        fn get_vocab_size(&self) -> usize {
            0
        }
    }

    #[test]
    fn extraction_yields_expected_splits() {
        let mut vocab = AddedVocabulary::new();
        let model = DummyModel;
        let normalizer: Option<&NoopNormalizer> = None;
        let tokens: Vec<AddedToken> = ["[CLS]", "[SEP]", "[MASK]", "[UNK]", "[PAD]"]
            .iter()
            .map(|t| AddedToken::from(*t, true).normalized(false))
            .collect();
        vocab.add_special_tokens(&tokens, &model, normalizer);

        let input = "[CLS] my name is, SLIM SHADY? [MASK] is my name!";
        let pretok = vocab.extract_and_normalize(normalizer, input);
        let splits = pretok.get_splits(crate::tokenizer::OffsetReferential::Original);
        assert_eq!(splits.len(), 4);
        assert_eq!(splits[0].0, "[CLS]");
        assert_eq!(splits[0].1, (0, 5));
        assert_eq!(splits[2].0, "[MASK]");
        assert_eq!(splits[2].1, (30, 36));
    }

    #[test]
    fn single_word_respects_boundaries() {
        let mut vocab = AddedVocabulary::new();
        let model = DummyModel;
        let normalizer: Option<&NoopNormalizer> = None;
        let token = AddedToken::from("ing", false)
            .single_word(true)
            .normalized(false);
        vocab.add_tokens(&[token], &model, normalizer);

        let pretok = vocab.extract_and_normalize(normalizer, "running ing");
        let splits: Vec<&str> = pretok
            .get_splits(crate::tokenizer::OffsetReferential::Original)
            .into_iter()
            .map(|(s, _, _)| s)
            .collect();
        // "ing" inside "running" doesn't stand at a word boundary, so only
        // the standalone occurrence is extracted.
        assert_eq!(splits, vec!["running ", "ing"]);
    }
}
