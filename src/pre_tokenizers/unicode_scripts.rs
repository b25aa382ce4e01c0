//! `UnicodeScripts` -- spec.md 4.3: splits where the dominant Unicode
//! script changes (Han/Hiragana/Katakana/Hangul/Latin/other), so e.g. mixed
//! CJK-and-Latin text is torn at the script boundary. Script-neutral code
//! points (punctuation, digits, whitespace) attach to whichever run they
//! fall inside rather than starting a new one.

use serde::{Deserialize, Serialize};

use crate::tokenizer::normalizer::Range;
use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Han,
    Hiragana,
    Katakana,
    Hangul,
    Latin,
    Other,
}

fn script_of(c: char) -> Script {
    let cp = c as u32;
    match cp {
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0x20000..=0x2A6DF | 0xF900..=0xFAFF => Script::Han,
        0x3040..=0x309F => Script::Hiragana,
        0x30A0..=0x30FF => Script::Katakana,
        0xAC00..=0xD7AF | 0x1100..=0x11FF => Script::Hangul,
        0x0041..=0x005A | 0x0061..=0x007A | 0x00C0..=0x024F => Script::Latin,
        _ => Script::Other,
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UnicodeScripts;

impl PreTokenizer for UnicodeScripts {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split(|_, normalized| {
            let text = normalized.get();
            let mut boundaries = vec![0usize];
            let mut current: Option<Script> = None;
            for (i, c) in text.char_indices() {
                let s = script_of(c);
                match (current, s) {
                    (None, _) => current = Some(s),
                    (Some(_), Script::Other) => {}
                    (Some(cur), s2) if s2 == cur => {}
                    (Some(_), s2) => {
                        boundaries.push(i);
                        current = Some(s2);
                    }
                }
            }
            boundaries.push(text.len());
            boundaries.dedup();

            let mut pieces = Vec::with_capacity(boundaries.len());
            for w in boundaries.windows(2) {
                if w[0] < w[1] {
                    if let Some(piece) = normalized.slice(Range::Normalized(w[0]..w[1])) {
                        pieces.push(piece);
                    }
                }
            }
            Ok(pieces)
        })
    }
}
