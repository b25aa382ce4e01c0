//! `TemplateProcessing` -- spec.md 4.6: inserts special tokens and
//! re-stamps `type_ids` according to an ordered template of pieces.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, PostProcessor, Result};

#[derive(Debug)]
pub struct TemplateProcessingError(String);

impl fmt::Display for TemplateProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemplateProcessing: {}", self.0)
    }
}

impl std::error::Error for TemplateProcessingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceId {
    A,
    B,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Piece {
    Sequence { id: SequenceId, type_id: u32 },
    SpecialToken { id: String, type_id: u32 },
}

/// The `(ids, tokens)` a special token piece expands into; usually a single
/// id, but kept as a list so a special token made of several sub-tokens
/// can be expressed the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialTokenEntry {
    pub ids: Vec<u32>,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateProcessing {
    single: Vec<Piece>,
    pair: Vec<Piece>,
    special_tokens: HashMap<String, SpecialTokenEntry>,
}

impl TemplateProcessing {
    pub fn new(
        single: Vec<Piece>,
        pair: Vec<Piece>,
        special_tokens: HashMap<String, SpecialTokenEntry>,
    ) -> Self {
        Self {
            single,
            pair,
            special_tokens,
        }
    }

    fn template_for(&self, is_pair: bool) -> &[Piece] {
        if is_pair {
            &self.pair
        } else {
            &self.single
        }
    }
}

impl PostProcessor for TemplateProcessing {
    fn added_tokens(&self, is_pair: bool) -> usize {
        self.template_for(is_pair)
            .iter()
            .filter_map(|piece| match piece {
                Piece::SpecialToken { id, .. } => self.special_tokens.get(id).map(|e| e.ids.len()),
                Piece::Sequence { .. } => None,
            })
            .sum()
    }

    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let template = self.template_for(pair_encoding.is_some());
        let mut result = Encoding::default();
        for piece in template {
            match piece {
                Piece::Sequence {
                    id: SequenceId::A,
                    type_id,
                } => result.merge_with(encoding.with_type_id(*type_id), false),
                Piece::Sequence {
                    id: SequenceId::B,
                    type_id,
                } => {
                    let pair = pair_encoding.as_ref().ok_or_else(|| {
                        Box::new(TemplateProcessingError(
                            "template references sequence B but no pair was given".into(),
                        ))
                    })?;
                    result.merge_with(pair.with_type_id(*type_id), false);
                }
                Piece::SpecialToken { id, type_id } => {
                    if !add_special_tokens {
                        continue;
                    }
                    let entry = self.special_tokens.get(id).ok_or_else(|| {
                        Box::new(TemplateProcessingError(format!(
                            "template references unknown special token {:?}",
                            id
                        )))
                    })?;
                    for (token_id, token_value) in entry.ids.iter().zip(entry.tokens.iter()) {
                        result.merge_with(
                            Encoding::one_special_token(*token_id, token_value.clone(), *type_id),
                            false,
                        );
                    }
                }
            }
        }
        Ok(result)
    }
}
