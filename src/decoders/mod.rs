//! The decoders -- spec.md 4.8. `DecoderWrapper` is the closed enum the
//! JSON config's `decoder.type` tag resolves into.

pub mod byte_fallback;
pub mod byte_level;
pub mod fuse;
pub mod replace;
pub mod sequence;
pub mod strip;
pub mod wordpiece;

use serde::{Deserialize, Serialize};

use crate::decoders::byte_fallback::ByteFallbackDecoder;
use crate::decoders::byte_level::ByteLevelDecoder;
use crate::decoders::fuse::FuseDecoder;
use crate::decoders::replace::ReplaceDecoder;
use crate::decoders::sequence::SequenceDecoder;
use crate::decoders::strip::StripDecoder;
use crate::decoders::wordpiece::WordPieceDecoder;
use crate::pre_tokenizers::metaspace::Metaspace;
use crate::tokenizer::Decoder;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecoderWrapper {
    WordPiece(WordPieceDecoder),
    ByteLevel(ByteLevelDecoder),
    ByteFallback(ByteFallbackDecoder),
    Fuse(FuseDecoder),
    Strip(StripDecoder),
    Replace(ReplaceDecoder),
    Sequence(SequenceDecoder),
    Metaspace(Metaspace),
}

impl Decoder for DecoderWrapper {
    fn decode_chain(&self, tokens: Vec<String>) -> crate::Result<Vec<String>> {
        match self {
            DecoderWrapper::WordPiece(d) => d.decode_chain(tokens),
            DecoderWrapper::ByteLevel(d) => d.decode_chain(tokens),
            DecoderWrapper::ByteFallback(d) => d.decode_chain(tokens),
            DecoderWrapper::Fuse(d) => d.decode_chain(tokens),
            DecoderWrapper::Strip(d) => d.decode_chain(tokens),
            DecoderWrapper::Replace(d) => d.decode_chain(tokens),
            DecoderWrapper::Sequence(d) => d.decode_chain(tokens),
            DecoderWrapper::Metaspace(d) => d.decode_chain(tokens),
        }
    }
}

impl_enum_from!(WordPieceDecoder, DecoderWrapper, WordPiece);
impl_enum_from!(ByteLevelDecoder, DecoderWrapper, ByteLevel);
impl_enum_from!(ByteFallbackDecoder, DecoderWrapper, ByteFallback);
impl_enum_from!(FuseDecoder, DecoderWrapper, Fuse);
impl_enum_from!(StripDecoder, DecoderWrapper, Strip);
impl_enum_from!(ReplaceDecoder, DecoderWrapper, Replace);
impl_enum_from!(SequenceDecoder, DecoderWrapper, Sequence);
impl_enum_from!(Metaspace, DecoderWrapper, Metaspace);
