//! `CharDelimiterSplit(delimiter)` -- spec.md 4.3: split on a single
//! character, dropping it.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct CharDelimiterSplit {
    delimiter: char,
}

impl CharDelimiterSplit {
    pub fn new(delimiter: char) -> Self {
        CharDelimiterSplit { delimiter }
    }
}

impl PreTokenizer for CharDelimiterSplit {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&self.delimiter, SplitDelimiterBehavior::Removed, false)
    }
}
