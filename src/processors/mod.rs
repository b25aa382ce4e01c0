pub mod bert;
pub mod byte_level;
pub mod roberta;
pub mod sequence;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::processors::bert::BertProcessing;
use crate::processors::byte_level::ByteLevelProcessing;
use crate::processors::roberta::RobertaProcessing;
use crate::processors::sequence::Sequence;
use crate::processors::template::TemplateProcessing;
use crate::tokenizer::{Encoding, PostProcessor, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PostProcessorWrapper {
    TemplateProcessing(TemplateProcessing),
    ByteLevelProcessing(ByteLevelProcessing),
    BertProcessing(BertProcessing),
    RobertaProcessing(RobertaProcessing),
    Sequence(Sequence),
}

impl PostProcessor for PostProcessorWrapper {
    fn added_tokens(&self, is_pair: bool) -> usize {
        match self {
            Self::TemplateProcessing(p) => p.added_tokens(is_pair),
            Self::ByteLevelProcessing(p) => p.added_tokens(is_pair),
            Self::BertProcessing(p) => p.added_tokens(is_pair),
            Self::RobertaProcessing(p) => p.added_tokens(is_pair),
            Self::Sequence(p) => p.added_tokens(is_pair),
        }
    }

    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        match self {
            Self::TemplateProcessing(p) => p.process(encoding, pair_encoding, add_special_tokens),
            Self::ByteLevelProcessing(p) => p.process(encoding, pair_encoding, add_special_tokens),
            Self::BertProcessing(p) => p.process(encoding, pair_encoding, add_special_tokens),
            Self::RobertaProcessing(p) => p.process(encoding, pair_encoding, add_special_tokens),
            Self::Sequence(p) => p.process(encoding, pair_encoding, add_special_tokens),
        }
    }
}

impl_enum_from!(TemplateProcessing, PostProcessorWrapper, TemplateProcessing);
impl_enum_from!(ByteLevelProcessing, PostProcessorWrapper, ByteLevelProcessing);
impl_enum_from!(BertProcessing, PostProcessorWrapper, BertProcessing);
impl_enum_from!(RobertaProcessing, PostProcessorWrapper, RobertaProcessing);
impl_enum_from!(Sequence, PostProcessorWrapper, Sequence);
