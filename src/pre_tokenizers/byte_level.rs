//! `ByteLevel(add_prefix_space, use_regex)` -- spec.md 4.3. Splits on the
//! GPT-2 regex (unless disabled), then remaps every UTF-8 byte of each
//! piece through the 256-entry bytes<->unicode table so the resulting text
//! is printable and the vocabulary only ever has to hold printable code
//! points. `decoders::byte_level` and `processors::byte_level` share the
//! same table.

use std::collections::HashMap;

use lazy_static::lazy_static;
use onig::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

/// GPT-2's splitting pattern -- contractions, then runs of letters, digits,
/// other-symbols, and whitespace (the last alternative only keeping a
/// trailing run of whitespace that isn't followed by a non-space).
const GPT2_PATTERN: &str = r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

lazy_static! {
    static ref GPT2_REGEX: Regex = Regex::new(GPT2_PATTERN).expect("GPT-2 pattern is valid");
    static ref BYTES_CHAR: HashMap<u8, char> = bytes_char();
    static ref CHAR_BYTES: HashMap<char, u8> =
        BYTES_CHAR.iter().map(|(&b, &c)| (c, b)).collect();
}

/// Builds the 256-entry bytes<->unicode table: printable ASCII/Latin-1
/// first, then every remaining byte value assigned the next free code
/// point starting at `0x100`.
fn bytes_char() -> HashMap<u8, char> {
    let mut bs: Vec<u8> = (b'!'..=b'~')
        .chain(0xA1u8..=0xAC)
        .chain(0xAEu8..=0xFF)
        .collect();
    let mut cs: Vec<u32> = bs.iter().map(|&b| b as u32).collect();
    let mut n = 0u32;
    for b in 0u32..=255 {
        if !bs.contains(&(b as u8)) {
            bs.push(b as u8);
            cs.push(256 + n);
            n += 1;
        }
    }
    bs.into_iter()
        .zip(cs.into_iter().map(|c| char::from_u32(c).unwrap()))
        .collect()
}

pub fn byte_to_char(b: u8) -> char {
    BYTES_CHAR[&b]
}

pub fn char_to_byte(c: char) -> Option<u8> {
    CHAR_BYTES.get(&c).copied()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ByteLevel {
    pub add_prefix_space: bool,
    pub use_regex: bool,
}

impl Default for ByteLevel {
    fn default() -> Self {
        Self {
            add_prefix_space: true,
            use_regex: true,
        }
    }
}

impl ByteLevel {
    pub fn new(add_prefix_space: bool, use_regex: bool) -> Self {
        Self {
            add_prefix_space,
            use_regex,
        }
    }
}

impl PreTokenizer for ByteLevel {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        if self.add_prefix_space {
            pretokenized.split(|_, mut normalized| {
                if !normalized.is_empty() && !normalized.get().starts_with(' ') {
                    normalized.prepend(" ")?;
                }
                Ok(vec![normalized])
            })?;
        }
        if self.use_regex {
            pretokenized.split_with_pattern(&*GPT2_REGEX, SplitDelimiterBehavior::Isolated, false)?;
        }
        pretokenized.split(|_, mut normalized| {
            normalized.map_bytes(byte_to_char)?;
            Ok(vec![normalized])
        })
    }
}
