//! `ByteLevelDecoder` -- spec.md 4.8: invert the bytes<->unicode table
//! byte-by-byte and concatenate.

use serde::{Deserialize, Serialize};

use crate::pre_tokenizers::byte_level::char_to_byte;
use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ByteLevelDecoder;

impl Decoder for ByteLevelDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        let joined: String = tokens.concat();
        let bytes: Vec<u8> = joined.chars().filter_map(char_to_byte).collect();
        Ok(vec![String::from_utf8_lossy(&bytes).into_owned()])
    }
}
