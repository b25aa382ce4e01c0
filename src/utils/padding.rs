//! Length shaping that grows encodings up to a target length -- spec.md 4.9.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, PaddingDirection, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaddingDirectionParam {
    Left,
    Right,
}

impl From<PaddingDirectionParam> for PaddingDirection {
    fn from(d: PaddingDirectionParam) -> Self {
        match d {
            PaddingDirectionParam::Left => PaddingDirection::Left,
            PaddingDirectionParam::Right => PaddingDirection::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingStrategy {
    BatchLongest,
    Fixed(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddingParams {
    pub direction: PaddingDirectionParam,
    pub strategy: PaddingStrategy,
    pub pad_id: u32,
    pub pad_type_id: u32,
    pub pad_token: String,
    #[serde(default)]
    pub pad_to_multiple_of: Option<usize>,
}

impl Default for PaddingParams {
    fn default() -> Self {
        Self {
            direction: PaddingDirectionParam::Right,
            strategy: PaddingStrategy::BatchLongest,
            pad_id: 0,
            pad_type_id: 0,
            pad_token: String::from("[PAD]"),
            pad_to_multiple_of: None,
        }
    }
}

fn round_up(len: usize, multiple_of: Option<usize>) -> usize {
    match multiple_of {
        Some(m) if m > 0 && len % m != 0 => len + (m - len % m),
        _ => len,
    }
}

/// Pads every encoding (and recursively each overflowing entry) to a
/// shared target length, computed from `params.strategy` -- `Fixed(n)` pads
/// to exactly `n` (rounded up to `pad_to_multiple_of`), `BatchLongest` pads
/// every encoding in the batch up to the longest one in it.
pub fn pad_encodings(encodings: &mut [Encoding], params: &PaddingParams) -> Result<()> {
    if encodings.is_empty() {
        return Ok(());
    }

    let target = match params.strategy {
        PaddingStrategy::Fixed(size) => round_up(size, params.pad_to_multiple_of),
        PaddingStrategy::BatchLongest => {
            let longest = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
            round_up(longest, params.pad_to_multiple_of)
        }
    };

    for encoding in encodings.iter_mut() {
        pad_one(encoding, target, params);
    }

    Ok(())
}

fn pad_one(encoding: &mut Encoding, target: usize, params: &PaddingParams) {
    let direction = PaddingDirection::from(params.direction);
    if encoding.len() < target {
        let count = target - encoding.len();
        // `Encoding::pad` recurses into `overflowing` entries on its own.
        encoding.pad(
            count,
            params.pad_id,
            params.pad_type_id,
            &params.pad_token,
            direction,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(ids: &[u32]) -> Encoding {
        let n = ids.len();
        Encoding::new(
            ids.to_vec(),
            vec![0; n],
            ids.iter().map(|i| i.to_string()).collect(),
            (0..n as u32).map(Some).collect(),
            vec![(0, 1); n],
            vec![0; n],
            vec![1; n],
            vec![],
        )
    }

    #[test]
    fn fixed_pads_to_multiple_of_three() {
        let params = PaddingParams {
            strategy: PaddingStrategy::Fixed(4),
            pad_to_multiple_of: Some(3),
            ..PaddingParams::default()
        };
        let mut encodings = vec![enc(&[1, 2, 3, 4])];
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings[0].get_attention_mask(), &[1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn batch_longest_pads_shorter_entries() {
        let params = PaddingParams::default();
        let mut encodings = vec![enc(&[1, 2, 3]), enc(&[1])];
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings[0].len(), 3);
        assert_eq!(encodings[1].len(), 3);
    }
}
