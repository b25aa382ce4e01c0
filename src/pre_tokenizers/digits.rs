//! `Digits(individual_digits)` -- spec.md 4.3: isolate runs of digits; if
//! `individual_digits`, isolate every digit on its own.

use onig::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Digits {
    pub individual_digits: bool,
}

impl Digits {
    pub fn new(individual_digits: bool) -> Self {
        Self { individual_digits }
    }
}

impl PreTokenizer for Digits {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        let pattern = if self.individual_digits { "[0-9]" } else { "[0-9]+" };
        let re = Regex::new(pattern)?;
        pretokenized.split_with_pattern(&re, SplitDelimiterBehavior::Isolated, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_digit_runs() {
        let pretok = Digits::new(false);
        let mut pts = PreTokenizedString::from("abc123def");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["abc", "123", "def"]);
    }

    #[test]
    fn isolates_each_digit() {
        let pretok = Digits::new(true);
        let mut pts = PreTokenizedString::from("a12b");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["a", "1", "2", "b"]);
    }
}
