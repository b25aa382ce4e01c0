//! `NormalizedString` keeps the mutated text of a sequence aligned with the
//! original input through every normalization step, and `PreTokenizedString`
//! keeps the collection of `Split`s produced once pre-tokenization starts
//! slicing that text apart.
//!
//! Every mutation goes through [`NormalizedString::transform_range`] (direct,
//! index-based edits: erase/pad/grow/shrink/add/replace) or
//! [`NormalizedString::transform`] (whole-string, change-coded rewrites used
//! by Unicode (de)composition). Both keep the per-byte `offsets` array in
//! lockstep with `normalized` so that any later byte range can be resolved
//! back to the original input.

use std::ops::{Range as StdRange, RangeBounds};

use unicode_normalization_alignments::UnicodeNormalization;

use crate::tokenizer::{Offsets, Result, Token};

/// Which string a `Range` indexes into.
#[derive(Debug, Clone, PartialEq)]
pub enum Range<T> {
    Original(T),
    Normalized(T),
}

/// Distinguishes the two coordinate systems a byte range can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetReferential {
    Original,
    Normalized,
}

fn range_of<T: RangeBounds<usize>>(range: T, len: usize) -> StdRange<usize> {
    let start = match range.start_bound() {
        std::ops::Bound::Included(&s) => s,
        std::ops::Bound::Excluded(&s) => s + 1,
        std::ops::Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        std::ops::Bound::Included(&e) => e + 1,
        std::ops::Bound::Excluded(&e) => e,
        std::ops::Bound::Unbounded => len,
    };
    start..end
}

/// Text plus a byte-for-byte alignment back to the original input it was
/// derived from.
///
/// `offsets[b]` holds the `(start, end)` range in `original` that produced
/// byte `b` of `normalized`. Every byte belonging to the same code point of
/// `normalized` repeats the same entry, so `offset_ranges()` (one entry per
/// code point, `(byte_start, byte_len)` into `normalized`'s own encoding) is
/// always derivable rather than tracked separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedString {
    original: String,
    normalized: String,
    offsets: Vec<(usize, usize)>,
}

impl NormalizedString {
    pub fn new(original: String, normalized: String, offsets: Vec<(usize, usize)>) -> Self {
        debug_assert_eq!(normalized.len(), offsets.len());
        Self {
            original,
            normalized,
            offsets,
        }
    }

    pub fn get(&self) -> &str {
        &self.normalized
    }

    pub fn get_original(&self) -> &str {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn len_original(&self) -> usize {
        self.original.len()
    }

    /// One entry per code point of `normalized`: `(byte_start, byte_len)`
    /// within `normalized`'s own UTF-8 encoding.
    pub fn offset_ranges(&self) -> Vec<(usize, usize)> {
        self.normalized
            .char_indices()
            .map(|(i, c)| (i, c.len_utf8()))
            .collect()
    }

    /// Converts a range expressed in one coordinate system into the other.
    pub fn convert_offsets(&self, range: Range<StdRange<usize>>) -> Option<StdRange<usize>> {
        match range {
            Range::Normalized(r) => {
                let r = range_of(r, self.normalized.len());
                if r.start > self.normalized.len() || r.end > self.normalized.len() {
                    return None;
                }
                if r.start == r.end {
                    let anchor = if r.start < self.offsets.len() {
                        self.offsets[r.start].0
                    } else {
                        self.offsets.last().map(|o| o.1).unwrap_or(0)
                    };
                    return Some(anchor..anchor);
                }
                let start = self.offsets.get(r.start)?.0;
                let end = self.offsets.get(r.end - 1)?.1;
                Some(start..end)
            }
            Range::Original(r) => {
                let r = range_of(r, self.original.len());
                // Find the span of normalized bytes whose original range
                // intersects `r`.
                let mut start = None;
                let mut end = None;
                for (b, (os, oe)) in self.offsets.iter().enumerate() {
                    if *oe > r.start && *os < r.end {
                        if start.is_none() {
                            start = Some(b);
                        }
                        end = Some(b + 1);
                    }
                }
                match (start, end) {
                    (Some(s), Some(e)) => Some(s..e),
                    _ => Some(r.start.min(self.normalized.len())..r.start.min(self.normalized.len())),
                }
            }
        }
    }

    /// Splits off the normalized-coordinate range `range`, returning it as a
    /// standalone `NormalizedString` that keeps the *full* original input and
    /// the taken bytes' original global alignment untouched.
    ///
    /// Unlike `String::split_off`, the taken range does not have to start at
    /// the beginning -- `self` keeps the prefix, the return value is the
    /// `range` slice, and anything after `range` is dropped (callers slice
    /// one `Split` at a time and never need the remainder). `original` and
    /// `offsets` are never rebased to a local substring: every split of a
    /// sequence must keep resolving its tokens' offsets back to the same
    /// global byte coordinates the unsliced `NormalizedString` used, or
    /// every split after the first would report offsets relative to itself
    /// instead of the original input (spec.md 3, 4.10 step 4, 8 property 1).
    pub fn slice(&self, range: Range<StdRange<usize>>) -> Option<NormalizedString> {
        let normalized_range = match range {
            Range::Normalized(r) => range_of(r, self.normalized.len()),
            Range::Original(r) => self.convert_offsets(Range::Original(r))?,
        };
        if normalized_range.start > self.normalized.len() || normalized_range.end > self.normalized.len() {
            return None;
        }
        let normalized = self.normalized[normalized_range.clone()].to_owned();
        let offsets = self.offsets[normalized_range].to_vec();
        Some(NormalizedString::new(self.original.clone(), normalized, offsets))
    }

    /// The byte range replacing `char_range` inherits the union of the
    /// original ranges of the replaced code points; a pure insertion
    /// (`char_range` empty) inherits the original range of its right
    /// neighbor, or the left neighbor's end if it is being appended at the
    /// end of the string.
    fn splice_chars(&mut self, char_range: StdRange<usize>, content: &str) -> Result<()> {
        let char_count = self.normalized.chars().count();
        if char_range.start > char_count || char_range.end > char_count || char_range.start > char_range.end {
            return Err(Box::new(LogicError(format!(
                "transform: char range {:?} out of bounds for {} chars",
                char_range, char_count
            ))));
        }
        let byte_start = self
            .normalized
            .char_indices()
            .nth(char_range.start)
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.normalized.len());
        let byte_end = self
            .normalized
            .char_indices()
            .nth(char_range.end)
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.normalized.len());

        let original_span = if byte_start == byte_end {
            // Insertion: inherit the neighboring original offset.
            if byte_start < self.offsets.len() {
                self.offsets[byte_start]
            } else if let Some(last) = self.offsets.last() {
                (last.1, last.1)
            } else {
                (0, 0)
            }
        } else {
            let first = self.offsets[byte_start];
            let last = self.offsets[byte_end - 1];
            (first.0.min(last.0), first.1.max(last.1))
        };

        self.normalized
            .replace_range(byte_start..byte_end, content);
        let new_offsets: Vec<(usize, usize)> = content
            .bytes()
            .map(|_| original_span)
            .collect();
        self.offsets.splice(byte_start..byte_end, new_offsets);
        Ok(())
    }

    /// `erase`: drop code point `i`.
    pub fn erase(&mut self, i: usize) -> Result<()> {
        self.splice_chars(i..i + 1, "")
    }

    /// `pad`: wrap code point `i` with a one-byte spacer before and after.
    pub fn pad(&mut self, i: usize) -> Result<()> {
        self.splice_chars(i + 1..i + 1, " ")?;
        self.splice_chars(i..i, " ")
    }

    /// `grow`: code point `i` expands into the (multi-character)
    /// `replacement`, e.g. NFD decomposition of a single precomposed letter.
    pub fn grow(&mut self, i: usize, replacement: &str) -> Result<()> {
        self.splice_chars(i..i + 1, replacement)
    }

    /// `shrink`: the code points in `char_range` collapse into one
    /// `replacement` character, e.g. dropping a combining accent.
    pub fn shrink(&mut self, char_range: StdRange<usize>, replacement: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.splice_chars(char_range, replacement.encode_utf8(&mut buf))
    }

    /// `add`: insert `content` before code point `i` (or append, if
    /// `i == char_count`).
    pub fn add(&mut self, i: usize, content: &str) -> Result<()> {
        self.splice_chars(i..i, content)
    }

    /// `replace`: replace the code point at `i` with `content`.
    pub fn replace(&mut self, i: usize, content: &str) -> Result<()> {
        self.splice_chars(i..i + 1, content)
    }

    /// `replace`, generalized to a normalized-coordinate *byte* range rather
    /// than a single code point -- used by the `Replace` normalizer, whose
    /// regex/string matches rarely land on single-code-point boundaries.
    pub fn replace_range(&mut self, byte_range: StdRange<usize>, content: &str) -> Result<()> {
        let char_start = self.normalized[..byte_range.start].chars().count();
        let char_end = self.normalized[..byte_range.end].chars().count();
        self.splice_chars(char_start..char_end, content)
    }

    /// Applies a change-coded rewrite of the whole string: `change == 0`
    /// aligns 1:1 with the next original code point; `change > 0` is
    /// additional decomposition output fused onto the *previous* code
    /// point's original span (NFD/NFKD); `change < 0` (value `-k`) means this
    /// one output code point consumes the current plus `k` following code
    /// points (NFC/NFKC recomposition).
    pub fn transform<I: Iterator<Item = (char, isize)>>(&mut self, dest: I) -> Result<()> {
        let old_offsets = self.offsets.clone();
        let old_char_spans: Vec<(usize, usize)> = self
            .normalized
            .char_indices()
            .map(|(b, c)| (b, b + c.len_utf8()))
            .collect();
        // original span owned by each old code point
        let old_original: Vec<(usize, usize)> = old_char_spans
            .iter()
            .map(|(b, _)| old_offsets[*b])
            .collect();

        let mut new_normalized = String::with_capacity(self.normalized.len());
        let mut new_offsets: Vec<(usize, usize)> = Vec::with_capacity(self.normalized.len());
        let mut old_idx = 0usize;
        let mut last_span = old_original.first().copied().unwrap_or((0, 0));

        for (ch, change) in dest {
            let span = if change == 0 {
                let span = *old_original
                    .get(old_idx)
                    .unwrap_or(old_original.last().unwrap_or(&(0, 0)));
                old_idx += 1;
                span
            } else if change > 0 {
                // Fused onto the previous output's original span.
                last_span
            } else {
                let consumed = (-change) as usize + 1;
                let start_span = *old_original
                    .get(old_idx)
                    .unwrap_or(old_original.last().unwrap_or(&(0, 0)));
                let end_span = *old_original
                    .get(old_idx + consumed - 1)
                    .unwrap_or(old_original.last().unwrap_or(&(0, 0)));
                old_idx += consumed;
                (start_span.0.min(end_span.0), start_span.1.max(end_span.1))
            };
            last_span = span;
            new_normalized.push(ch);
            for _ in 0..ch.len_utf8() {
                new_offsets.push(span);
            }
        }

        self.normalized = new_normalized;
        self.offsets = new_offsets;
        Ok(())
    }

    pub fn nfd(&mut self) -> Result<()> {
        let dest: Vec<(char, isize)> = self.normalized.chars().nfd().collect();
        self.transform(dest.into_iter())
    }

    pub fn nfkd(&mut self) -> Result<()> {
        let dest: Vec<(char, isize)> = self.normalized.chars().nfkd().collect();
        self.transform(dest.into_iter())
    }

    pub fn nfc(&mut self) -> Result<()> {
        let dest: Vec<(char, isize)> = self.normalized.chars().nfc().collect();
        self.transform(dest.into_iter())
    }

    pub fn nfkc(&mut self) -> Result<()> {
        let dest: Vec<(char, isize)> = self.normalized.chars().nfkc().collect();
        self.transform(dest.into_iter())
    }

    pub fn lowercase(&mut self) -> Result<()> {
        let dest: Vec<(char, isize)> = self
            .normalized
            .chars()
            .flat_map(|c| {
                let lower: Vec<char> = c.to_lowercase().collect();
                lower
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| if i == 0 { (c, 0) } else { (c, 1) })
                    .collect::<Vec<_>>()
            })
            .collect();
        self.transform(dest.into_iter())
    }

    /// Drops every code point for which `keep` returns `false`.
    pub fn filter<F: Fn(char) -> bool>(&mut self, keep: F) -> Result<()> {
        let to_erase: Vec<usize> = self
            .normalized
            .chars()
            .enumerate()
            .filter(|(_, c)| !keep(*c))
            .map(|(i, _)| i)
            .collect();
        for i in to_erase.into_iter().rev() {
            self.erase(i)?;
        }
        Ok(())
    }

    /// Replaces every code point with the result of `f`, preserving
    /// alignment for code points that map 1:1.
    pub fn map<F: Fn(char) -> char>(&mut self, f: F) -> Result<()> {
        let replacements: Vec<(usize, char, char)> = self
            .normalized
            .chars()
            .enumerate()
            .filter_map(|(i, c)| {
                let mapped = f(c);
                if mapped == c {
                    None
                } else {
                    Some((i, c, mapped))
                }
            })
            .collect();
        for (i, _, mapped) in replacements {
            let mut buf = [0u8; 4];
            self.splice_chars(i..i + 1, mapped.encode_utf8(&mut buf))?;
        }
        Ok(())
    }

    /// Replaces every code point with the UTF-8 bytes of its encoding, each
    /// byte mapped through `to_char` -- the primitive the `ByteLevel`
    /// pre-tokenizer uses to turn multi-byte input into one output code
    /// point per source *byte*. All bytes of one source code point inherit
    /// that code point's original span, the same way `grow` would.
    pub fn map_bytes<F: Fn(u8) -> char>(&mut self, to_char: F) -> Result<()> {
        let dest: Vec<(char, isize)> = self
            .normalized
            .chars()
            .flat_map(|c| {
                let mut buf = [0u8; 4];
                let encoded = c.encode_utf8(&mut buf).as_bytes().to_vec();
                encoded
                    .into_iter()
                    .enumerate()
                    .map(|(i, b)| (to_char(b), if i == 0 { 0 } else { 1 }))
                    .collect::<Vec<_>>()
            })
            .collect();
        self.transform(dest.into_iter())
    }

    pub fn prepend(&mut self, s: &str) -> Result<()> {
        self.splice_chars(0..0, s)
    }

    pub fn lstrip(&mut self) -> Result<()> {
        self.strip(true, false)
    }

    pub fn rstrip(&mut self) -> Result<()> {
        self.strip(false, true)
    }

    pub fn strip(&mut self, left: bool, right: bool) -> Result<()> {
        let chars: Vec<char> = self.normalized.chars().collect();
        if right {
            let trailing = chars.iter().rev().take_while(|c| c.is_whitespace()).count();
            if trailing > 0 {
                self.splice_chars(chars.len() - trailing..chars.len(), "")?;
            }
        }
        let chars: Vec<char> = self.normalized.chars().collect();
        if left {
            let leading = chars.iter().take_while(|c| c.is_whitespace()).count();
            if leading > 0 {
                self.splice_chars(0..leading, "")?;
            }
        }
        Ok(())
    }
}

impl From<&str> for NormalizedString {
    fn from(s: &str) -> Self {
        let offsets = s
            .char_indices()
            .flat_map(|(i, c)| std::iter::repeat((i, i + c.len_utf8())).take(c.len_utf8()))
            .collect();
        NormalizedString::new(s.to_owned(), s.to_owned(), offsets)
    }
}

impl From<String> for NormalizedString {
    fn from(s: String) -> Self {
        NormalizedString::from(s.as_str())
    }
}

impl std::fmt::Display for NormalizedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

#[derive(Debug)]
pub struct LogicError(pub String);
impl std::error::Error for LogicError {}
impl std::fmt::Display for LogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NormalizedString logic error: {}", self.0)
    }
}

/// Behavior of the shared `split` primitive when handed a tiling of
/// match/non-match intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitDelimiterBehavior {
    /// Drop the matched intervals, keep the rest.
    Removed,
    /// Keep everything; matches become their own pieces.
    Isolated,
}

/// Something that can carve a string into `(range, is_match)` tiles.
pub trait Pattern {
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>>;
}

impl Pattern for char {
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>> {
        if inside.is_empty() {
            return Ok(vec![]);
        }
        let mut result = vec![];
        let mut prev = 0;
        for (start, c) in inside.char_indices() {
            if c == *self {
                if prev != start {
                    result.push(((prev, start), false));
                }
                result.push(((start, start + c.len_utf8()), true));
                prev = start + c.len_utf8();
            }
        }
        if prev != inside.len() {
            result.push(((prev, inside.len()), false));
        }
        Ok(result)
    }
}

impl<F> Pattern for F
where
    F: Fn(char) -> bool,
{
    fn find_matches(&self, inside: &str) -> Result<Vec<((usize, usize), bool)>> {
        if inside.is_empty() {
            return Ok(vec![]);
        }
        let mut result = vec![];
        let mut prev = 0;
        for (start, c) in inside.char_indices() {
            let is_match = self(c);
            let end = start + c.len_utf8();
            if is_match {
                if prev != start {
                    result.push(((prev, start), false));
                }
                result.push(((start, end), true));
                prev = end;
            }
        }
        if prev != inside.len() {
            result.push(((prev, inside.len()), false));
        }
        Ok(result)
    }
}

fn invert(mut tiles: Vec<((usize, usize), bool)>) -> Vec<((usize, usize), bool)> {
    for tile in tiles.iter_mut() {
        tile.1 = !tile.1;
    }
    tiles
}

/// `(normalized, offsets, tokens)` -- one segment of a `PreTokenizedString`.
/// `tokens` stays empty until a `Model` tokenizes it.
#[derive(Debug, Clone)]
pub struct Split {
    normalized: NormalizedString,
    tokens: Option<Vec<Token>>,
}

impl Split {
    pub fn normalized(&self) -> &NormalizedString {
        &self.normalized
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        self.tokens.as_deref()
    }
}

impl From<NormalizedString> for Split {
    fn from(normalized: NormalizedString) -> Self {
        Split {
            normalized,
            tokens: None,
        }
    }
}

/// The collection of `Split`s a sequence is carved into on its way through
/// pre-tokenization and model tokenization.
#[derive(Debug, Clone)]
pub struct PreTokenizedString {
    original: String,
    splits: Vec<Split>,
}

impl PreTokenizedString {
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Replaces the given split with a pre-assigned token (used by
    /// `AddedVocabulary` to freeze special/user tokens before normalization
    /// can break them apart).
    pub fn with_single_token(normalized: NormalizedString, token: Token) -> Split {
        Split {
            normalized,
            tokens: Some(vec![token]),
        }
    }

    pub fn push_split(&mut self, split: Split) {
        self.splits.push(split);
    }

    /// Runs `split_fn` over every split whose `tokens` is still empty,
    /// replacing it with the `NormalizedString`s it returns.
    pub fn split<F>(&mut self, mut split_fn: F) -> Result<()>
    where
        F: FnMut(usize, NormalizedString) -> Result<Vec<NormalizedString>>,
    {
        let mut new_splits = Vec::with_capacity(self.splits.len());
        for (i, split) in std::mem::take(&mut self.splits).into_iter().enumerate() {
            if split.tokens.is_some() {
                new_splits.push(split);
                continue;
            }
            for piece in split_fn(i, split.normalized)? {
                if !piece.is_empty() {
                    new_splits.push(Split::from(piece));
                }
            }
        }
        self.splits = new_splits;
        Ok(())
    }

    /// The shared pre-tokenizer primitive of spec.md 4.3: tile each
    /// not-yet-tokenized split with `pattern`, dropping or isolating matches
    /// per `behavior`.
    pub fn split_with_pattern<P: Pattern>(
        &mut self,
        pattern: &P,
        behavior: SplitDelimiterBehavior,
        invert_match: bool,
    ) -> Result<()> {
        self.split(|_, normalized| {
            let mut tiles = pattern.find_matches(normalized.get())?;
            if invert_match {
                tiles = invert(tiles);
            }
            let pieces = tiles
                .into_iter()
                .filter_map(|((start, end), is_match)| {
                    if is_match && behavior == SplitDelimiterBehavior::Removed {
                        return None;
                    }
                    normalized.slice(Range::Normalized(start..end))
                })
                .collect();
            Ok(pieces)
        })
    }

    /// Sets the tokens for every split that doesn't already carry
    /// pre-assigned ones (those produced by `AddedVocabulary`).
    pub fn tokenize<F>(&mut self, mut tokenize_fn: F) -> Result<()>
    where
        F: FnMut(&NormalizedString) -> Result<Vec<Token>>,
    {
        for split in self.splits.iter_mut() {
            if split.tokens.is_none() {
                split.tokens = Some(tokenize_fn(&split.normalized)?);
            }
        }
        Ok(())
    }

    /// Like [`split`](Self::split), but each produced piece may carry a
    /// pre-assigned `Token` (used by `AddedVocabulary` to freeze
    /// special/user tokens before normalization or the model can touch
    /// them). A piece with no token attached is left open for later
    /// normalization/pre-tokenization/model stages.
    pub fn split_with_tokens<F>(&mut self, mut split_fn: F) -> Result<()>
    where
        F: FnMut(usize, NormalizedString) -> Result<Vec<(NormalizedString, Option<Token>)>>,
    {
        let mut new_splits = Vec::with_capacity(self.splits.len());
        for (i, split) in std::mem::take(&mut self.splits).into_iter().enumerate() {
            if split.tokens.is_some() {
                new_splits.push(split);
                continue;
            }
            for (piece, token) in split_fn(i, split.normalized)? {
                if piece.is_empty() && token.is_none() {
                    continue;
                }
                new_splits.push(Split {
                    normalized: piece,
                    tokens: token.map(|t| vec![t]),
                });
            }
        }
        self.splits = new_splits;
        Ok(())
    }

    /// Flattens every split's tokens into `(Token, word_idx)` pairs,
    /// rebasing each token's offsets -- which a `Model` or `AddedVocabulary`
    /// records relative to the `Split` that produced it -- into the
    /// original input's byte coordinates via that split's own alignment.
    pub fn into_tokens(self) -> Vec<(Token, u32)> {
        let mut word = 0u32;
        let mut out = Vec::new();
        for split in self.splits {
            let tokens = match split.tokens {
                Some(t) => t,
                None => continue,
            };
            for token in tokens {
                let (start, end) = token.offsets;
                let rebased = split
                    .normalized
                    .convert_offsets(Range::Normalized(start..end))
                    .map(|r| (r.start, r.end))
                    .unwrap_or((0, 0));
                out.push((Token::new(token.id, token.value, rebased), word));
            }
            word += 1;
        }
        out
    }

    /// Flattens into `(token, word_idx)` triples with offsets rebased into
    /// the requested coordinate system.
    pub fn get_splits(
        &self,
        offset_ref: OffsetReferential,
    ) -> Vec<(&str, Offsets, Option<&[Token]>)> {
        let mut offset = 0usize;
        self.splits
            .iter()
            .map(|split| {
                let len = split.normalized.len();
                let offsets = match offset_ref {
                    OffsetReferential::Normalized => (offset, offset + len),
                    OffsetReferential::Original => {
                        match split.normalized.convert_offsets(Range::Normalized(0..len)) {
                            Some(r) => (r.start, r.end),
                            None => (0, 0),
                        }
                    }
                };
                offset += len;
                (split.normalized.get(), offsets, split.tokens())
            })
            .collect()
    }
}

impl From<NormalizedString> for PreTokenizedString {
    fn from(normalized: NormalizedString) -> Self {
        let original = normalized.get_original().to_owned();
        PreTokenizedString {
            original,
            splits: vec![Split::from(normalized)],
        }
    }
}

impl From<&str> for PreTokenizedString {
    fn from(s: &str) -> Self {
        PreTokenizedString::from(NormalizedString::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_identity() {
        let ns = NormalizedString::from("hello world");
        assert_eq!(ns.get(), "hello world");
        assert_eq!(ns.get_original(), "hello world");
        let r = ns.convert_offsets(Range::Normalized(0..5)).unwrap();
        assert_eq!(r, 0..5);
    }

    #[test]
    fn erase_shrinks_alignment() {
        let mut ns = NormalizedString::from("abc");
        ns.erase(1).unwrap();
        assert_eq!(ns.get(), "ac");
        let r = ns.convert_offsets(Range::Normalized(1..2)).unwrap();
        assert_eq!(r, 2..3);
    }

    #[test]
    fn pad_wraps_with_spaces() {
        let mut ns = NormalizedString::from("a中b");
        // '中' is the second char (index 1)
        ns.pad(1).unwrap();
        assert_eq!(ns.get(), "a 中 b");
    }

    #[test]
    fn add_inherits_neighbor_offset() {
        let mut ns = NormalizedString::from("ab");
        ns.add(0, "[CLS]").unwrap();
        assert_eq!(ns.get(), "[CLS]ab");
        let r = ns.convert_offsets(Range::Normalized(0..5)).unwrap();
        assert_eq!(r, 0..0);
    }

    #[test]
    fn lowercase_preserves_offsets() {
        let mut ns = NormalizedString::from("ABC");
        ns.lowercase().unwrap();
        assert_eq!(ns.get(), "abc");
        assert_eq!(ns.convert_offsets(Range::Normalized(1..2)).unwrap(), 1..2);
    }

    #[test]
    fn split_on_whitespace() {
        let mut pts = PreTokenizedString::from("hello world");
        pts.split_with_pattern(&|c: char| c.is_whitespace(), SplitDelimiterBehavior::Removed, false)
            .unwrap();
        let splits: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(splits, vec!["hello", "world"]);
    }

    #[test]
    fn split_isolated_keeps_delimiter() {
        let mut pts = PreTokenizedString::from("a,b");
        pts.split_with_pattern(&',', SplitDelimiterBehavior::Isolated, false)
            .unwrap();
        let splits: Vec<&str> = pts.splits().iter().map(|s| s.normalized().get()).collect();
        assert_eq!(splits, vec!["a", ",", "b"]);
    }

    #[test]
    fn slice_keeps_global_offsets() {
        let ns = NormalizedString::from("hello world");
        let world = ns.slice(Range::Normalized(6..11)).unwrap();
        assert_eq!(world.get(), "world");
        assert_eq!(world.get_original(), "hello world");
        let r = world.convert_offsets(Range::Normalized(0..5)).unwrap();
        assert_eq!(r, 6..11);
    }
}
