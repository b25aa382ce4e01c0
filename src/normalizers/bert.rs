//! `BertNormalizer` -- spec.md 4.2. Four independently-toggleable passes
//! applied in a fixed order: `clean_text`, `handle_chinese_chars`,
//! `strip_accents` (implied `true` when `lowercase` is set unless the caller
//! explicitly said otherwise), `lowercase`.

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::tokenizer::{NormalizedString, Normalizer, Result};

fn is_chinese_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2B73F
            | 0x2B740..=0x2B81F
            | 0x2B920..=0x2CEAF
            | 0xF900..=0xFAFF
            | 0x2F800..=0x2FA1F
    )
}

fn is_control(c: char) -> bool {
    // `\t`/`\n`/`\r` count as whitespace, not control, for clean_text's
    // purposes -- they get normalized to a space by the whitespace pass
    // instead of erased outright.
    c != '\t' && c != '\n' && c != '\r' && c.is_other_control()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BertNormalizer {
    #[serde(default = "default_true")]
    pub clean_text: bool,
    #[serde(default = "default_true")]
    pub handle_chinese_chars: bool,
    #[serde(default)]
    pub strip_accents: Option<bool>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BertNormalizer {
    fn default() -> Self {
        Self {
            clean_text: true,
            handle_chinese_chars: true,
            strip_accents: None,
            lowercase: true,
        }
    }
}

impl BertNormalizer {
    pub fn new(
        clean_text: bool,
        handle_chinese_chars: bool,
        strip_accents: Option<bool>,
        lowercase: bool,
    ) -> Self {
        Self {
            clean_text,
            handle_chinese_chars,
            strip_accents,
            lowercase,
        }
    }

    fn do_clean_text(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.filter(|c| !(c == '\u{0}' || c == '\u{FFFD}' || is_control(c)))?;
        normalized.map(|c| if c.is_whitespace() { ' ' } else { c })
    }

    fn do_handle_chinese_chars(&self, normalized: &mut NormalizedString) -> Result<()> {
        let indices: Vec<usize> = normalized
            .get()
            .chars()
            .enumerate()
            .filter(|(_, c)| is_chinese_char(*c))
            .map(|(i, _)| i)
            .collect();
        // Pad from the back so earlier indices stay valid as padding grows
        // the string.
        for i in indices.into_iter().rev() {
            normalized.pad(i)?;
        }
        Ok(())
    }

    fn do_strip_accents(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.nfd()?;
        normalized.filter(|c| !c.is_mark_nonspacing())
    }
}

impl Normalizer for BertNormalizer {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        if self.clean_text {
            self.do_clean_text(normalized)?;
        }
        if self.handle_chinese_chars {
            self.do_handle_chinese_chars(normalized)?;
        }
        let strip_accents = self.strip_accents.unwrap_or(self.lowercase);
        if strip_accents {
            self.do_strip_accents(normalized)?;
        }
        if self.lowercase {
            normalized.lowercase()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_and_pads_chinese() {
        let normalizer = BertNormalizer::default();
        let mut ns = NormalizedString::from("Hello 中 World!");
        normalizer.normalize(&mut ns).unwrap();
        assert_eq!(ns.get(), "hello  中  world!");
    }

    #[test]
    fn strip_accents_drops_combining_marks() {
        let normalizer = BertNormalizer::new(true, true, Some(true), false);
        let mut ns = NormalizedString::from("caf\u{e9}");
        normalizer.normalize(&mut ns).unwrap();
        assert_eq!(ns.get(), "cafe");
    }

    #[test]
    fn without_lowercase_accents_survive() {
        let normalizer = BertNormalizer::new(true, true, Some(false), false);
        let mut ns = NormalizedString::from("caf\u{e9}");
        normalizer.normalize(&mut ns).unwrap();
        assert_eq!(ns.get(), "caf\u{e9}");
    }
}
