//! `Punctuation(behavior)` -- spec.md 4.3: split on ASCII or Unicode
//! punctuation, default `Isolated`.

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::pre_tokenizers::bert::is_bert_punc;
use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Punctuation {
    pub behavior: SplitDelimiterBehavior,
}

impl Default for Punctuation {
    fn default() -> Self {
        Self {
            behavior: SplitDelimiterBehavior::Isolated,
        }
    }
}

impl Punctuation {
    pub fn new(behavior: SplitDelimiterBehavior) -> Self {
        Self { behavior }
    }
}

impl PreTokenizer for Punctuation {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&is_bert_punc, self.behavior, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_punctuation_by_default() {
        let pretok = Punctuation::default();
        let mut pts = PreTokenizedString::from("Hey, friend.");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["Hey", ",", " friend", "."]);
    }
}
