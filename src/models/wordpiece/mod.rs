//! [WordPiece](https://static.googleusercontent.com/media/research.google.com/en//pubs/archive/37842.pdf)
//! model -- spec.md 4.4. Greedy longest-match-from-left: for each word,
//! repeatedly take the longest vocab-matching prefix remaining (subsequent
//! prefixes carry `continuing_subword_prefix`, e.g. BERT's `##`).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Model, Result, Token};

#[derive(Debug)]
pub struct WordPieceError(String);

impl fmt::Display for WordPieceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordPiece error: {}", self.0)
    }
}

impl std::error::Error for WordPieceError {}

#[derive(Debug, Clone)]
pub struct WordPiece {
    vocab: HashMap<String, u32>,
    vocab_r: HashMap<u32, String>,
    unk_token: String,
    continuing_subword_prefix: String,
    max_input_chars_per_word: usize,
}

#[derive(Serialize, Deserialize)]
struct WordPieceSerde {
    vocab: HashMap<String, u32>,
    unk_token: String,
    continuing_subword_prefix: String,
    max_input_chars_per_word: usize,
}

impl Serialize for WordPiece {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        WordPieceSerde {
            vocab: self.vocab.clone(),
            unk_token: self.unk_token.clone(),
            continuing_subword_prefix: self.continuing_subword_prefix.clone(),
            max_input_chars_per_word: self.max_input_chars_per_word,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WordPiece {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = WordPieceSerde::deserialize(deserializer)?;
        WordPieceBuilder::new()
            .vocab(helper.vocab)
            .unk_token(helper.unk_token)
            .continuing_subword_prefix(helper.continuing_subword_prefix)
            .max_input_chars_per_word(helper.max_input_chars_per_word)
            .build()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone)]
pub struct WordPieceBuilder {
    vocab: HashMap<String, u32>,
    unk_token: String,
    continuing_subword_prefix: String,
    max_input_chars_per_word: usize,
}

impl Default for WordPieceBuilder {
    fn default() -> Self {
        Self {
            vocab: HashMap::new(),
            unk_token: String::from("[UNK]"),
            continuing_subword_prefix: String::from("##"),
            max_input_chars_per_word: 100,
        }
    }
}

impl WordPieceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vocab(mut self, vocab: HashMap<String, u32>) -> Self {
        self.vocab = vocab;
        self
    }

    pub fn unk_token(mut self, unk_token: String) -> Self {
        self.unk_token = unk_token;
        self
    }

    pub fn continuing_subword_prefix(mut self, prefix: String) -> Self {
        self.continuing_subword_prefix = prefix;
        self
    }

    pub fn max_input_chars_per_word(mut self, max: usize) -> Self {
        self.max_input_chars_per_word = max;
        self
    }

    pub fn build(self) -> Result<WordPiece> {
        if !self.vocab.contains_key(&self.unk_token) {
            return Err(Box::new(WordPieceError(format!(
                "unk_token `{}` is not in the vocab",
                self.unk_token
            ))));
        }
        let vocab_r = self
            .vocab
            .iter()
            .map(|(token, id)| (*id, token.clone()))
            .collect();
        Ok(WordPiece {
            vocab: self.vocab,
            vocab_r,
            unk_token: self.unk_token,
            continuing_subword_prefix: self.continuing_subword_prefix,
            max_input_chars_per_word: self.max_input_chars_per_word,
        })
    }
}

impl WordPiece {
    pub fn builder() -> WordPieceBuilder {
        WordPieceBuilder::new()
    }

    pub fn get_unk_token(&self) -> &str {
        &self.unk_token
    }

    pub fn get_continuing_subword_prefix(&self) -> &str {
        &self.continuing_subword_prefix
    }
}

impl Model for WordPiece {
    fn tokenize_split(&self, sequence: &str) -> Result<Vec<Token>> {
        if sequence.is_empty() {
            return Ok(vec![]);
        }

        let unk_id = *self
            .vocab
            .get(&self.unk_token)
            .ok_or_else(|| Box::new(WordPieceError("unk_token missing from vocab".into())))?;

        if sequence.chars().count() > self.max_input_chars_per_word {
            return Ok(vec![Token::new(
                unk_id,
                self.unk_token.clone(),
                (0, sequence.len()),
            )]);
        }

        let char_boundaries: Vec<usize> = sequence
            .char_indices()
            .map(|(i, _)| i)
            .chain(Some(sequence.len()))
            .collect();

        let mut tokens = Vec::new();
        let mut start = 0usize;
        while start < sequence.len() {
            let mut matched = None;
            // Walk candidate end boundaries from longest to shortest, so
            // the first vocab hit is the longest prefix available.
            for &end in char_boundaries.iter().rev() {
                if end <= start {
                    break;
                }
                let piece = &sequence[start..end];
                let candidate = if start == 0 {
                    piece.to_owned()
                } else {
                    format!("{}{}", self.continuing_subword_prefix, piece)
                };
                if let Some(&id) = self.vocab.get(&candidate) {
                    matched = Some((id, candidate, end));
                    break;
                }
            }

            match matched {
                Some((id, value, end)) => {
                    tokens.push(Token::new(id, value, (start, end)));
                    start = end;
                }
                None => {
                    // No prefix of the remainder matches anything, not even
                    // a single character: the whole word falls back to unk.
                    return Ok(vec![Token::new(unk_id, self.unk_token.clone(), (0, sequence.len()))]);
                }
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn wordpiece() -> WordPiece {
        let vocab: HashMap<String, u32> = [
            ("[UNK]", 0),
            ("un", 1),
            ("##aff", 2),
            ("##able", 3),
            ("unaffable", 4),
        ]
        .iter()
        .map(|(s, i)| (s.to_string(), *i))
        .collect();
        WordPieceBuilder::new().vocab(vocab).build().unwrap()
    }

    #[test]
    fn greedy_longest_match_prefers_whole_word() {
        let model = wordpiece();
        let tokens = model.tokenize_split("unaffable").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "unaffable");
    }

    #[test]
    fn falls_back_to_subword_pieces() {
        let vocab: HashMap<String, u32> = [("[UNK]", 0), ("un", 1), ("##aff", 2), ("##able", 3)]
            .iter()
            .map(|(s, i)| (s.to_string(), *i))
            .collect();
        let model = WordPieceBuilder::new().vocab(vocab).build().unwrap();
        let tokens = model.tokenize_split("unaffable").unwrap();
        let values: Vec<_> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["un", "##aff", "##able"]);
        assert_eq!(tokens[1].offsets, (2, 5));
    }

    #[test]
    fn unmatchable_word_becomes_single_unk() {
        let model = wordpiece();
        let tokens = model.tokenize_split("xyz").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, 0);
        assert_eq!(tokens[0].offsets, (0, 3));
    }

    #[test]
    fn too_long_word_becomes_unk() {
        let model = WordPieceBuilder::new()
            .vocab(
                [("[UNK]", 0u32), ("a", 1)]
                    .iter()
                    .map(|(s, i)| (s.to_string(), *i))
                    .collect(),
            )
            .max_input_chars_per_word(3)
            .build()
            .unwrap();
        let tokens = model.tokenize_split("aaaa").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, 0);
    }
}
