//! `ByteFallbackDecoder` -- spec.md 4.8: recognizes `<0xNN>` tokens (the
//! form `BPE`'s `byte_fallback` mode emits for unseen code points) and
//! folds consecutive runs of them back into UTF-8 text; any run that
//! doesn't decode to valid UTF-8 is dropped, per the Open Questions note
//! that some source paths produce empty output here.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ByteFallbackDecoder;

fn parse_byte_token(token: &str) -> Option<u8> {
    let hex = token.strip_prefix("<0x")?.strip_suffix('>')?;
    u8::from_str_radix(hex, 16).ok()
}

impl Decoder for ByteFallbackDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut pending: Vec<u8> = Vec::new();
        for token in tokens {
            match parse_byte_token(&token) {
                Some(b) => pending.push(b),
                None => {
                    if !pending.is_empty() {
                        out.push(flush(&mut pending));
                    }
                    out.push(token);
                }
            }
        }
        if !pending.is_empty() {
            out.push(flush(&mut pending));
        }
        Ok(out)
    }
}

fn flush(pending: &mut Vec<u8>) -> String {
    let bytes = std::mem::take(pending);
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_byte_tokens_into_utf8() {
        let decoder = ByteFallbackDecoder;
        let out = decoder
            .decode(vec!["<0x48>".into(), "<0x69>".into()])
            .unwrap();
        assert_eq!(out, "Hi");
    }

    #[test]
    fn invalid_byte_run_decodes_to_empty() {
        let decoder = ByteFallbackDecoder;
        let out = decoder.decode(vec!["<0xFF>".into()]).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn passes_through_non_byte_tokens() {
        let decoder = ByteFallbackDecoder;
        let out = decoder
            .decode(vec!["hello".into(), "<0x20>".into(), "world".into()])
            .unwrap();
        assert_eq!(out, "hello world");
    }
}
