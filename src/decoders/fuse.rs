//! `FuseDecoder` -- spec.md 4.8: concatenate all tokens into one.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FuseDecoder;

impl Decoder for FuseDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        Ok(vec![tokens.concat()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuses_all_tokens() {
        let decoder = FuseDecoder;
        let out = decoder.decode(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(out, "abc");
    }
}
