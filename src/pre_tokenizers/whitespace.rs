//! `Whitespace` and `WhitespaceSplit` -- spec.md 4.3.

use lazy_static::lazy_static;
use onig::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

lazy_static! {
    static ref WORD_REGEX: Regex = Regex::new(r"\w+|[^\w\s]+").expect("pattern is valid");
}

/// Splits into runs of word characters and runs of other non-whitespace
/// characters, dropping the whitespace between them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Whitespace;

impl PreTokenizer for Whitespace {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&*WORD_REGEX, SplitDelimiterBehavior::Removed, true)
    }
}

/// Splits on whitespace only, dropping it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WhitespaceSplit;

impl PreTokenizer for WhitespaceSplit {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&char::is_whitespace, SplitDelimiterBehavior::Removed, false)
    }
}
