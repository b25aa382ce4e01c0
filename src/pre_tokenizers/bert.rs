//! `BertPreTokenizer` -- spec.md 4.3: split on whitespace (dropping the
//! delimiter), then on Unicode punctuation (keeping each mark as its own
//! split).

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::tokenizer::{OffsetReferential, PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

pub(crate) fn is_bert_punc(c: char) -> bool {
    char::is_ascii_punctuation(&c) || c.is_punctuation()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BertPreTokenizer;

impl PreTokenizer for BertPreTokenizer {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&char::is_whitespace, SplitDelimiterBehavior::Removed, false)?;
        pretokenized.split_with_pattern(&is_bert_punc, SplitDelimiterBehavior::Isolated, false)
    }
}
