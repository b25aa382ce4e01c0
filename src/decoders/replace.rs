//! `ReplaceDecoder(pattern, content)` -- spec.md 4.8: regex/string
//! substitute applied to each token.

use serde::{Deserialize, Serialize};

use crate::tokenizer::pattern::SplitPattern;
use crate::tokenizer::normalizer::Pattern;
use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceDecoder {
    pattern: SplitPattern,
    content: String,
}

impl ReplaceDecoder {
    pub fn new(pattern: SplitPattern, content: impl Into<String>) -> Self {
        Self {
            pattern,
            content: content.into(),
        }
    }
}

impl Decoder for ReplaceDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        tokens
            .into_iter()
            .map(|token| {
                let matches = self.pattern.find_matches(&token)?;
                let mut out = String::with_capacity(token.len());
                for ((start, end), is_match) in matches {
                    if is_match {
                        out.push_str(&self.content);
                    } else {
                        out.push_str(&token[start..end]);
                    }
                }
                Ok(out)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_literal_matches() {
        let decoder = ReplaceDecoder::new(SplitPattern::String("_".into()), " ");
        let out = decoder.decode(vec!["foo_bar".into()]).unwrap();
        assert_eq!(out, "foo bar");
    }
}
