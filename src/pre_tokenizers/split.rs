//! `Split(pattern, behavior, invert)` -- spec.md 4.3: the generic,
//! JSON-configurable pre-tokenizer around the shared pattern primitive.

use serde::{Deserialize, Serialize};

use crate::tokenizer::pattern::SplitPattern;
use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    pattern: SplitPattern,
    behavior: SplitDelimiterBehavior,
    #[serde(default)]
    invert: bool,
}

impl Split {
    pub fn new(pattern: SplitPattern, behavior: SplitDelimiterBehavior, invert: bool) -> Self {
        Self {
            pattern,
            behavior,
            invert,
        }
    }
}

impl PreTokenizer for Split {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split_with_pattern(&self.pattern, self.behavior, self.invert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_drops_delimiter() {
        let pretok = Split::new(
            SplitPattern::String(",".into()),
            SplitDelimiterBehavior::Removed,
            false,
        );
        let mut pts = PreTokenizedString::from("a,b,c");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["a", "b", "c"]);
    }

    #[test]
    fn isolated_keeps_delimiter() {
        let pretok = Split::new(
            SplitPattern::String(",".into()),
            SplitDelimiterBehavior::Isolated,
            false,
        );
        let mut pts = PreTokenizedString::from("a,b");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["a", ",", "b"]);
    }

    #[test]
    fn invert_swaps_match_and_gap() {
        let pretok = Split::new(
            SplitPattern::Regex(r"\d+".into()),
            SplitDelimiterBehavior::Removed,
            true,
        );
        let mut pts = PreTokenizedString::from("ab12cd34");
        pretok.pre_tokenize(&mut pts).unwrap();
        let words: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(words, vec!["12", "34"]);
    }
}
