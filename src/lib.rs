//! `subtok`: an inference-oriented subword tokenizer runtime.
//!
//! Loads a declarative JSON pipeline description (normalizer -> pre-tokenizer
//! -> model -> post-processor -> decoder, plus added-vocabulary, truncation
//! and padding) and exposes `encode`/`decode`. Training is out of scope; see
//! `tokenizer::TokenizerImpl` for the pipeline itself.

#[macro_use]
mod macros;

pub mod decoders;
pub mod models;
pub mod normalizers;
pub mod pre_tokenizers;
pub mod processors;
pub mod tokenizer;
pub mod utils;

pub use tokenizer::{
    AddedToken, Decoder, Encoding, Model, NormalizedString, Normalizer, PostProcessor,
    PreTokenizedString, PreTokenizer, Result, Token, TokenizerBuilder, TokenizerImpl,
};

use decoders::DecoderWrapper;
use models::ModelWrapper;
use normalizers::NormalizerWrapper;
use pre_tokenizers::PreTokenizerWrapper;
use processors::PostProcessorWrapper;

/// The JSON-configured tokenizer: every component is one of the closed
/// `*Wrapper` enums spec.md 6 tags by `type`.
pub type Tokenizer = TokenizerImpl<
    ModelWrapper,
    NormalizerWrapper,
    PreTokenizerWrapper,
    PostProcessorWrapper,
    DecoderWrapper,
>;
