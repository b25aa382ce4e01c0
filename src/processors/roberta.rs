//! `RobertaProcessing(sep, cls, trim_offsets, add_prefix_space)` --
//! spec.md 4.6: the fixed RoBERTa template, `<s> A </s>` /
//! `<s> A </s></s> B </s>`, with the same byte-level offset trimming
//! `ByteLevelProcessing` performs when `trim_offsets` is set.

use serde::{Deserialize, Serialize};

use crate::pre_tokenizers::byte_level::byte_to_char;
use crate::tokenizer::{Encoding, PostProcessor, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobertaProcessing {
    sep: (String, u32),
    cls: (String, u32),
    trim_offsets: bool,
    add_prefix_space: bool,
}

impl RobertaProcessing {
    pub fn new(sep: (String, u32), cls: (String, u32)) -> Self {
        Self {
            sep,
            cls,
            trim_offsets: true,
            add_prefix_space: true,
        }
    }

    pub fn trim_offsets(mut self, trim_offsets: bool) -> Self {
        self.trim_offsets = trim_offsets;
        self
    }

    pub fn add_prefix_space(mut self, add_prefix_space: bool) -> Self {
        self.add_prefix_space = add_prefix_space;
        self
    }

    fn trim(&self, encoding: &mut Encoding) {
        if !self.trim_offsets {
            return;
        }
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
}

impl PostProcessor for RobertaProcessing {
    fn added_tokens(&self, is_pair: bool) -> usize {
        if is_pair {
            4
        } else {
            2
        }
    }

    fn process(
        &self,
        mut encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        self.trim(&mut encoding);
        let mut result = encoding.with_type_id(0);
        if add_special_tokens {
            let mut with_special = Encoding::one_special_token(self.cls.1, self.cls.0.clone(), 0);
            with_special.merge_with(result, false);
            with_special.merge_with(Encoding::one_special_token(self.sep.1, self.sep.0.clone(), 0), false);
            result = with_special;
        }
        if let Some(mut pair) = pair_encoding {
            self.trim(&mut pair);
            let mut pair = pair.with_type_id(0);
            if add_special_tokens {
                let mut sep_sep = Encoding::one_special_token(self.sep.1, self.sep.0.clone(), 0);
                sep_sep.merge_with(pair, false);
                sep_sep.merge_with(Encoding::one_special_token(self.sep.1, self.sep.0.clone(), 0), false);
                pair = sep_sep;
            }
            result.merge_with(pair, false);
        }
        Ok(result)
    }
}
