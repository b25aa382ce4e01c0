//! `WordPieceDecoder(prefix, cleanup)` -- spec.md 4.8: strip the
//! continuing-subword prefix from non-leading tokens (else prepend a
//! space), then optionally undo the detokenization artifacts BERT's
//! reference decoder cleans up.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPieceDecoder {
    pub prefix: String,
    pub cleanup: bool,
}

impl Default for WordPieceDecoder {
    fn default() -> Self {
        Self {
            prefix: "##".into(),
            cleanup: true,
        }
    }
}

impl WordPieceDecoder {
    pub fn new(prefix: String, cleanup: bool) -> Self {
        Self { prefix, cleanup }
    }
}

fn cleanup(token: &str) -> String {
    token
        .replace(" .", ".")
        .replace(" ?", "?")
        .replace(" !", "!")
        .replace(" ,", ",")
        .replace(" ' ", "'")
        .replace(" n't", "n't")
        .replace(" 'm", "'m")
        .replace(" 's", "'s")
        .replace(" 've", "'ve")
        .replace(" 're", "'re")
}

impl Decoder for WordPieceDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        let out = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| {
                let joined = if i == 0 {
                    token
                } else if let Some(stripped) = token.strip_prefix(self.prefix.as_str()) {
                    stripped.to_string()
                } else {
                    format!(" {}", token)
                };
                if self.cleanup {
                    cleanup(&joined)
                } else {
                    joined
                }
            })
            .collect();
        Ok(out)
    }
}
