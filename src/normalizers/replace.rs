//! `Replace(pattern, content)` -- spec.md 4.2. Each match of `pattern`
//! triggers a `replace` transform at the match's start with the new byte
//! length of `content`; matches are found back-to-front so earlier offsets
//! stay valid as the string grows or shrinks.

use serde::{Deserialize, Serialize};

use crate::tokenizer::normalizer::Pattern;
use crate::tokenizer::pattern::SplitPattern;
use crate::tokenizer::{NormalizedString, Normalizer, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replace {
    pattern: SplitPattern,
    content: String,
}

impl Replace {
    pub fn new<I: Into<String>>(pattern: SplitPattern, content: I) -> Self {
        Self {
            pattern,
            content: content.into(),
        }
    }
}

impl Normalizer for Replace {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        let matches = self.pattern.find_matches(normalized.get())?;
        for ((start, end), is_match) in matches.into_iter().rev() {
            if is_match {
                normalized.replace_range(start..end, &self.content)?;
            }
        }
        Ok(())
    }
}
