//! `BertProcessing(sep, cls)` -- spec.md 4.6: the fixed BERT template,
//! `[CLS] A [SEP]` / `[CLS] A [SEP] B [SEP]`.

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, PostProcessor, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BertProcessing {
    sep: (String, u32),
    cls: (String, u32),
}

impl BertProcessing {
    pub fn new(sep: (String, u32), cls: (String, u32)) -> Self {
        Self { sep, cls }
    }
}

impl PostProcessor for BertProcessing {
    fn added_tokens(&self, is_pair: bool) -> usize {
        if is_pair {
            3
        } else {
            2
        }
    }

    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let mut result = encoding.with_type_id(0);
        if add_special_tokens {
            let mut with_special = Encoding::one_special_token(self.cls.1, self.cls.0.clone(), 0);
            with_special.merge_with(result, false);
            with_special.merge_with(Encoding::one_special_token(self.sep.1, self.sep.0.clone(), 0), false);
            result = with_special;
        }
        if let Some(pair) = pair_encoding {
            let mut pair = pair.with_type_id(1);
            if add_special_tokens {
                pair.merge_with(Encoding::one_special_token(self.sep.1, self.sep.0.clone(), 1), false);
            }
            result.merge_with(pair, false);
        }
        Ok(result)
    }
}
