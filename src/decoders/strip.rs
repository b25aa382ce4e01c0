//! `StripDecoder(content, start, stop)` -- spec.md 4.8: strip up to `start`
//! leading and `stop` trailing occurrences of `content` from each token.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripDecoder {
    content: char,
    start: usize,
    stop: usize,
}

impl StripDecoder {
    pub fn new(content: char, start: usize, stop: usize) -> Self {
        Self { content, start, stop }
    }
}

impl Decoder for StripDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        Ok(tokens.into_iter().map(|token| self.strip_one(&token)).collect())
    }
}

impl StripDecoder {
    fn strip_one(&self, token: &str) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        for _ in 0..self.start {
            if chars.first() == Some(&self.content) {
                chars.remove(0);
            } else {
                break;
            }
        }
        for _ in 0..self.stop {
            if chars.last() == Some(&self.content) {
                chars.pop();
            } else {
                break;
            }
        }
        chars.into_iter().collect()
    }
}
