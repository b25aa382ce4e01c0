//! The four standard Unicode normalization forms -- spec.md 4.2. Each just
//! delegates to the matching `NormalizedString` method, which threads the
//! alignment through `unicode-normalization-alignments`'s change-coded
//! output (see `tokenizer::normalizer::NormalizedString::transform`).

use serde::{Deserialize, Serialize};

use crate::tokenizer::{NormalizedString, Normalizer, Result};

macro_rules! unicode_normalizer {
    ($name:ident, $method:ident) => {
        #[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
        pub struct $name;

        impl Normalizer for $name {
            fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
                normalized.$method()
            }
        }
    };
}

unicode_normalizer!(NFC, nfc);
unicode_normalizer!(NFD, nfd);
unicode_normalizer!(NFKC, nfkc);
unicode_normalizer!(NFKD, nfkd);
