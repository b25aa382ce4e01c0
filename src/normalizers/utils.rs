//! `Sequence`, `Lowercase` and `Prepend` -- spec.md 4.2. `Sequence` composes
//! an ordered list of normalizers left to right; `Lowercase`/`Prepend` are
//! single-purpose wrappers around the matching `NormalizedString` primitive.

use serde::{Deserialize, Serialize};

use crate::normalizers::NormalizerWrapper;
use crate::tokenizer::{NormalizedString, Normalizer, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    normalizers: Vec<NormalizerWrapper>,
}

impl Sequence {
    pub fn new(normalizers: Vec<NormalizerWrapper>) -> Self {
        Self { normalizers }
    }
}

impl Normalizer for Sequence {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        for normalizer in &self.normalizers {
            normalizer.normalize(normalized)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Lowercase;

impl Normalizer for Lowercase {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prepend {
    pub prepend: String,
}

impl Prepend {
    pub fn new(prepend: String) -> Self {
        Self { prepend }
    }
}

impl Normalizer for Prepend {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        normalized.prepend(&self.prepend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_runs_left_to_right() {
        let seq = Sequence::new(vec![
            NormalizerWrapper::Lowercase(Lowercase),
            NormalizerWrapper::Prepend(Prepend::new(">>".into())),
        ]);
        let mut ns = NormalizedString::from("ABC");
        seq.normalize(&mut ns).unwrap();
        assert_eq!(ns.get(), ">>abc");
    }

    #[test]
    fn prepend_inserts_at_start() {
        let mut ns = NormalizedString::from("bc");
        Prepend::new("a".into()).normalize(&mut ns).unwrap();
        assert_eq!(ns.get(), "abc");
    }
}
