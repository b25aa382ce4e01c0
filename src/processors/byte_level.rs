//! `ByteLevelProcessing(add_prefix_space, trim_offsets)` -- spec.md 4.6:
//! shrinks each token's offsets past any leading/trailing byte-level space
//! markers its surface form carries, so offsets keep pointing at the real
//! text rather than including the synthetic leading space `ByteLevel`'s
//! pre-tokenizer may have inserted.

use serde::{Deserialize, Serialize};

use crate::pre_tokenizers::byte_level::byte_to_char;
use crate::tokenizer::{default_process, Encoding, PostProcessor, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ByteLevelProcessing {
    pub add_prefix_space: bool,
    pub trim_offsets: bool,
}

impl Default for ByteLevelProcessing {
    fn default() -> Self {
        Self {
            add_prefix_space: true,
            trim_offsets: true,
        }
    }
}

impl ByteLevelProcessing {
    pub fn new(add_prefix_space: bool, trim_offsets: bool) -> Self {
        Self {
            add_prefix_space,
            trim_offsets,
        }
    }
}

impl PostProcessor for ByteLevelProcessing {
    fn added_tokens(&self, _is_pair: bool) -> usize {
        0
    }

    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let mut encoding = default_process(encoding, pair_encoding, add_special_tokens)?;
        if self.trim_offsets {
            let space = byte_to_char(b' ');
            let tokens = encoding.get_tokens().to_vec();
            let offsets = encoding.get_offsets_mut();
            for (i, (token, offset)) in tokens.iter().zip(offsets.iter_mut()).enumerate() {
                let len = token.chars().count();
                let mut leading = token.chars().take_while(|&c| c == space).count();
                if i == 0 && !self.add_prefix_space {
                    leading = 0;
                }
                let trailing = token.chars().rev().take_while(|&c| c == space).count();
                let trailing = trailing.min(len - leading.min(len));
                offset.0 = offset.0.saturating_add(leading);
                offset.1 = offset.1.saturating_sub(trailing).max(offset.0);
            }
        }
        Ok(encoding)
    }
}
