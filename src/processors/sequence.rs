//! `Sequence([processors])` -- spec.md 4.6: left-fold composition.

use serde::{Deserialize, Serialize};

use crate::processors::PostProcessorWrapper;
use crate::tokenizer::{default_process, Encoding, PostProcessor, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    processors: Vec<PostProcessorWrapper>,
}

impl Sequence {
    pub fn new(processors: Vec<PostProcessorWrapper>) -> Self {
        Self { processors }
    }
}

impl PostProcessor for Sequence {
    fn added_tokens(&self, is_pair: bool) -> usize {
        self.processors.iter().map(|p| p.added_tokens(is_pair)).sum()
    }

    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let mut encoding = encoding;
        let mut pair_encoding = pair_encoding;
        for (i, processor) in self.processors.iter().enumerate() {
            let is_last = i == self.processors.len() - 1;
            if is_last {
                return processor.process(encoding, pair_encoding, add_special_tokens);
            }
            encoding = processor.process(encoding, pair_encoding.take(), add_special_tokens)?;
        }
        Ok(encoding)
    }
}
