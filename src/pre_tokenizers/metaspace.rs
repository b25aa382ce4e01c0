//! `Metaspace(replacement, add_prefix_space)` -- spec.md 4.3: replaces
//! whitespace with a meta character and splits so each word keeps its
//! leading separator (`"Hey friend!"` -> `["▁Hey", "▁friend!"]`). The
//! grouping doesn't fit the shared match/non-match `split_with_pattern`
//! primitive (the delimiter sticks to the *following* piece, not its own
//! isolated split), so this walks the replaced text by hand.

use serde::{Deserialize, Serialize};

use crate::tokenizer::normalizer::Range;
use crate::tokenizer::{Decoder, NormalizedString, PreTokenizedString, PreTokenizer, Result};

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Metaspace {
    replacement: char,
    add_prefix_space: bool,
}

impl Metaspace {
    pub fn new(replacement: char, add_prefix_space: bool) -> Self {
        Self {
            replacement,
            add_prefix_space,
        }
    }
}

impl Default for Metaspace {
    fn default() -> Self {
        Self::new('\u{2581}', true)
    }
}

impl PreTokenizer for Metaspace {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()> {
        pretokenized.split(|_, mut normalized| {
            if self.add_prefix_space && !normalized.is_empty() && !normalized.get().starts_with(' ') {
                normalized.prepend(" ")?;
            }
            normalized.map(|c| if c.is_whitespace() { self.replacement } else { c })?;

            let text = normalized.get();
            let mut boundaries: Vec<usize> = text
                .char_indices()
                .filter(|(_, c)| *c == self.replacement)
                .map(|(i, _)| i)
                .collect();
            if boundaries.first() != Some(&0) {
                boundaries.insert(0, 0);
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

impl Decoder for Metaspace {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        Ok(tokens
            .into_iter()
            .enumerate()
            .map(|(token_idx, token)| {
                token
                    .chars()
                    .enumerate()
                    .filter_map(|(char_idx, c)| {
                        if c == self.replacement {
                            if token_idx == 0 && char_idx == 0 && self.add_prefix_space {
                                None
                            } else {
                                Some(' ')
                            }
                        } else {
                            Some(c)
                        }
                    })
                    .collect::<String>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::OffsetReferential;

    fn splits(pretok: &Metaspace, text: &str) -> Vec<(String, (usize, usize))> {
        let mut pts = PreTokenizedString::from(text);
        pretok.pre_tokenize(&mut pts).unwrap();
        pts.get_splits(OffsetReferential::Original)
            .into_iter()
            .map(|(s, o, _)| (s.to_owned(), o))
            .collect()
    }

    #[test]
    fn basic() {
        let pretok = Metaspace::new('\u{2581}', true);
        assert_eq!(
            splits(&pretok, "Hey friend!"),
            vec![("\u{2581}Hey".into(), (0, 4)), ("\u{2581}friend!".into(), (4, 12))]
        );
    }

    #[test]
    fn multiple_spaces() {
        let pretok = Metaspace::new('\u{2581}', true);
        assert_eq!(
            splits(&pretok, "Hey   friend!"),
            vec![
                ("\u{2581}Hey".into(), (0, 4)),
                ("\u{2581}".into(), (4, 5)),
                ("\u{2581}".into(), (5, 6)),
                ("\u{2581}friend!".into(), (6, 14)),
            ]
        );
    }

    #[test]
    fn decode_strips_leading_prefix_space() {
        let decoder = Metaspace::new('\u{2581}', true);
        let res = decoder
            .decode(vec!["\u{2581}Hey".into(), "\u{2581}friend!".into()])
            .unwrap();
        assert_eq!(&res, "Hey friend!");
    }
}
