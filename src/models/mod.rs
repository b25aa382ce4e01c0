//! The tokenization models -- spec.md 4.4/4.5. `ModelWrapper` is the closed
//! enum the JSON config's `model.type` tag resolves into.

pub mod bpe;
pub mod wordpiece;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Model, Result, Token};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelWrapper {
    WordPiece(wordpiece::WordPiece),
    BPE(bpe::BPE),
}

impl From<wordpiece::WordPiece> for ModelWrapper {
    fn from(model: wordpiece::WordPiece) -> Self {
        ModelWrapper::WordPiece(model)
    }
}

impl From<bpe::BPE> for ModelWrapper {
    fn from(model: bpe::BPE) -> Self {
        ModelWrapper::BPE(model)
    }
}

impl Model for ModelWrapper {
    fn tokenize_split(&self, sequence: &str) -> Result<Vec<Token>> {
        match self {
            ModelWrapper::WordPiece(model) => model.tokenize_split(sequence),
            ModelWrapper::BPE(model) => model.tokenize_split(sequence),
        }
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        match self {
            ModelWrapper::WordPiece(model) => model.token_to_id(token),
            ModelWrapper::BPE(model) => model.token_to_id(token),
        }
    }

    fn id_to_token(&self, id: u32) -> Option<&str> {
        match self {
            ModelWrapper::WordPiece(model) => model.id_to_token(id),
            ModelWrapper::BPE(model) => model.id_to_token(id),
        }
    }

    fn get_vocab(&self) -> &HashMap<String, u32> {
        match self {
            ModelWrapper::WordPiece(model) => model.get_vocab(),
            ModelWrapper::BPE(model) => model.get_vocab(),
        }
    }

    fn get_vocab_size(&self) -> usize {
        match self {
            ModelWrapper::WordPiece(model) => model.get_vocab_size(),
            ModelWrapper::BPE(model) => model.get_vocab_size(),
        }
    }
}
