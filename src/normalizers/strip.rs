//! `Strip` and `StripAccents` -- spec.md 4.2.

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::tokenizer::{NormalizedString, Normalizer, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Strip {
    #[serde(default = "default_true")]
    pub strip_left: bool,
    #[serde(default = "default_true")]
    pub strip_right: bool,
}

fn default_true() -> bool {
    true
}

impl Strip {
    pub fn new(strip_left: bool, strip_right: bool) -> Self {
        Self {
            strip_left,
            strip_right,
        }
    }
}

impl Default for Strip {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Normalizer for Strip {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.strip(self.strip_left, self.strip_right)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StripAccents;

impl Normalizer for StripAccents {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.filter(|c| !c.is_mark_nonspacing())
    }
}
