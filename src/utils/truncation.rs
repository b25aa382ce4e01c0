//! Length shaping applied after post-processing would otherwise grow an
//! encoding past its budget -- spec.md 4.9.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, Result, TruncationDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruncationStrategy {
    LongestFirst,
    OnlyFirst,
    OnlySecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TruncationDirectionParam {
    Left,
    Right,
}

impl From<TruncationDirectionParam> for TruncationDirection {
    fn from(d: TruncationDirectionParam) -> Self {
        match d {
            TruncationDirectionParam::Left => TruncationDirection::Left,
            TruncationDirectionParam::Right => TruncationDirection::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TruncationParams {
    pub direction: TruncationDirectionParam,
    pub strategy: TruncationStrategy,
    pub max_length: usize,
    pub stride: usize,
}

impl Default for TruncationParams {
    fn default() -> Self {
        Self {
            direction: TruncationDirectionParam::Right,
            strategy: TruncationStrategy::LongestFirst,
            max_length: usize::MAX,
            stride: 0,
        }
    }
}

#[derive(Debug)]
pub struct TruncationError(pub String);
impl std::error::Error for TruncationError {}
impl std::fmt::Display for TruncationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "truncation error: {}", self.0)
    }
}

/// Truncates `encoding` (and `pair`, if present) per `params.strategy`,
/// spilling the removed tail/head into `overflowing` in `stride`-sized
/// overlapping windows -- spec.md 4.9 and testable property 6.
pub fn truncate_encodings(
    encoding: Encoding,
    pair: Option<Encoding>,
    params: &TruncationParams,
) -> Result<(Encoding, Option<Encoding>)> {
    if params.max_length == 0 {
        let mut encoding = encoding;
        encoding.truncate(0, 0, params.direction.into());
        let pair = pair.map(|mut p| {
            p.truncate(0, 0, params.direction.into());
            p
        });
        return Ok((encoding, pair));
    }

    let mut encoding = encoding;
    let mut pair = pair;

    match (&params.strategy, &mut pair) {
        (TruncationStrategy::LongestFirst, Some(pair)) => {
            let total_length = encoding.len() + pair.len();
            if total_length <= params.max_length {
                return Ok((encoding, Some(std::mem::take(pair))));
            }
            let n_to_remove = total_length - params.max_length;
            let mut removed_first = 0usize;
            let mut removed_second = 0usize;
            for _ in 0..n_to_remove {
                if encoding.len() - removed_first > pair.len() - removed_second {
                    removed_first += 1;
                } else {
                    removed_second += 1;
                }
            }
            encoding.truncate(
                encoding.len() - removed_first,
                params.stride,
                params.direction.into(),
            );
            pair.truncate(
                pair.len() - removed_second,
                params.stride,
                params.direction.into(),
            );
        }
        (TruncationStrategy::LongestFirst, None) => {
            encoding.truncate(params.max_length, params.stride, params.direction.into());
        }
        (TruncationStrategy::OnlyFirst, _) => {
            encoding.truncate(params.max_length, params.stride, params.direction.into());
        }
        (TruncationStrategy::OnlySecond, Some(pair)) => {
            pair.truncate(params.max_length, params.stride, params.direction.into());
        }
        (TruncationStrategy::OnlySecond, None) => {
            return Err(Box::new(TruncationError(
                "TruncationStrategy::OnlySecond requires a pair sequence".into(),
            )));
        }
    }

    Ok((encoding, pair))
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
    fn longest_first_right_overflow() {
        let params = TruncationParams {
            direction: TruncationDirectionParam::Right,
            strategy: TruncationStrategy::LongestFirst,
            max_length: 1,
            stride: 0,
        };
        let (first, second) = truncate_encodings(enc(&[12, 14]), None, &params).unwrap();
        assert_eq!(first.get_ids(), &[12]);
        assert!(second.is_none());
        assert_eq!(first.get_overflowing().len(), 1);
        assert_eq!(first.get_overflowing()[0].get_ids(), &[14]);
    }

    #[test]
    fn max_length_zero_drops_everything() {
        let params = TruncationParams {
            direction: TruncationDirectionParam::Right,
            strategy: TruncationStrategy::LongestFirst,
            max_length: 0,
            stride: 0,
        };
        let (first, _) = truncate_encodings(enc(&[12, 14]), None, &params).unwrap();
        assert!(first.is_empty());
        assert!(first.get_overflowing().is_empty());
    }
}
