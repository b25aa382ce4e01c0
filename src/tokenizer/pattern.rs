//! Pattern sources accepted by the JSON config wherever spec.md 6 allows
//! `{ "String": "..." }` or `{ "Regex": "..." }` (the `Replace` normalizer,
//! the `Split` pre-tokenizer). Regexes are compiled with `onig`, the same
//! engine the `ByteLevel` pre-tokenizer uses for the GPT-2 splitting
//! pattern, since `onig` (unlike the `regex` crate) supports the
//! lookahead `Replace`/`Split` patterns in the wild commonly rely on.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{normalizer::Pattern, Result};

impl Pattern for &str {
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>> {
        if self.is_empty() || inside.is_empty() {
            if inside.is_empty() {
                return Ok(vec![]);
            }
            return Ok(vec![((0, inside.len()), false)]);
        }
        let mut result = vec![];
        let mut prev = 0usize;
        let mut start = 0usize;
        while let Some(pos) = inside[start..].find(self) {
            let match_start = start + pos;
            let match_end = match_start + self.len();
            if match_start > prev {
                result.push(((prev, match_start), false));
            }
            result.push(((match_start, match_end), true));
            prev = match_end;
            start = if match_end > match_start {
                match_end
            } else {
                match_end + 1
            };
            if start > inside.len() {
                break;
            }
        }
        if prev < inside.len() {
            result.push(((prev, inside.len()), false));
        }
        Ok(result)
    }
}

impl Pattern for onig::Regex {
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>> {
        if inside.is_empty() {
            return Ok(vec![]);
        }
        let mut result = vec![];
        let mut prev = 0usize;
        for (start, end) in self.find_iter(inside) {
            if start > prev {
                result.push(((prev, start), false));
            }
            // A pattern may match an empty range (e.g. a trailing
            // lookahead-only alternative); keep it from looping forever.
            let end = end.max(start);
            result.push(((start, end), true));
            prev = end;
        }
        if prev < inside.len() {
            result.push(((prev, inside.len()), false));
        }
        Ok(result)
    }
}

/// A pattern as it appears on the wire: a literal substring or a regex
/// source compiled with `onig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitPattern {
    String(String),
    Regex(String),
}

impl Pattern for SplitPattern {
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>> {
        match self {
            SplitPattern::String(s) => s.as_str().find_matches(inside),
            SplitPattern::Regex(pattern) => {
                let re = onig::Regex::new(pattern)?;
                re.find_matches(inside)
            }
        }
    }
}
