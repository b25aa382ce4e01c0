//! The normalizers -- spec.md 4.2. `NormalizerWrapper` is the closed enum
//! the JSON config's `normalizer.type` tag resolves into.

pub mod bert;
pub mod replace;
pub mod strip;
pub mod unicode;
pub mod utils;

use serde::{Deserialize, Serialize};

use crate::normalizers::bert::BertNormalizer;
use crate::normalizers::replace::Replace;
use crate::normalizers::strip::{Strip, StripAccents};
use crate::normalizers::unicode::{NFC, NFD, NFKC, NFKD};
use crate::normalizers::utils::{Lowercase, Prepend, Sequence};
use crate::{NormalizedString, Normalizer};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NormalizerWrapper {
    BertNormalizer(BertNormalizer),
    Strip(Strip),
    StripAccents(StripAccents),
    NFC(NFC),
    NFD(NFD),
    NFKC(NFKC),
    NFKD(NFKD),
    Sequence(Sequence),
    Lowercase(Lowercase),
    Prepend(Prepend),
    Replace(Replace),
}

impl Normalizer for NormalizerWrapper {
    fn normalize(&self, normalized: &mut NormalizedString) -> crate::Result<()> {
        match self {
            NormalizerWrapper::BertNormalizer(n) => n.normalize(normalized),
            NormalizerWrapper::Strip(n) => n.normalize(normalized),
            NormalizerWrapper::StripAccents(n) => n.normalize(normalized),
            NormalizerWrapper::NFC(n) => n.normalize(normalized),
            NormalizerWrapper::NFD(n) => n.normalize(normalized),
            NormalizerWrapper::NFKC(n) => n.normalize(normalized),
            NormalizerWrapper::NFKD(n) => n.normalize(normalized),
            NormalizerWrapper::Sequence(n) => n.normalize(normalized),
            NormalizerWrapper::Lowercase(n) => n.normalize(normalized),
            NormalizerWrapper::Prepend(n) => n.normalize(normalized),
            NormalizerWrapper::Replace(n) => n.normalize(normalized),
        }
    }
}

impl_enum_from!(BertNormalizer, NormalizerWrapper, BertNormalizer);
impl_enum_from!(Strip, NormalizerWrapper, Strip);
impl_enum_from!(StripAccents, NormalizerWrapper, StripAccents);
impl_enum_from!(NFC, NormalizerWrapper, NFC);
impl_enum_from!(NFD, NormalizerWrapper, NFD);
impl_enum_from!(NFKC, NormalizerWrapper, NFKC);
impl_enum_from!(NFKD, NormalizerWrapper, NFKD);
impl_enum_from!(Sequence, NormalizerWrapper, Sequence);
impl_enum_from!(Lowercase, NormalizerWrapper, Lowercase);
impl_enum_from!(Prepend, NormalizerWrapper, Prepend);
impl_enum_from!(Replace, NormalizerWrapper, Replace);
