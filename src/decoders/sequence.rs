//! `SequenceDecoder([decoders])` -- spec.md 4.8: left-fold composition,
//! each stage's output list feeding the next stage's input.

use serde::{Deserialize, Serialize};

use crate::decoders::DecoderWrapper;
use crate::tokenizer::{Decoder, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDecoder {
    decoders: Vec<DecoderWrapper>,
}

impl SequenceDecoder {
    pub fn new(decoders: Vec<DecoderWrapper>) -> Self {
        Self { decoders }
    }
}

impl Decoder for SequenceDecoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>> {
        let mut tokens = tokens;
        for decoder in &self.decoders {
            tokens = decoder.decode_chain(tokens)?;
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::fuse::FuseDecoder;
    use crate::decoders::wordpiece::WordPieceDecoder;

    #[test]
    fn chains_stages_left_to_right() {
        let seq = SequenceDecoder::new(vec![
            DecoderWrapper::WordPiece(WordPieceDecoder::default()),
            DecoderWrapper::Fuse(FuseDecoder),
        ]);
        let out = seq
            .decode(vec!["hello".into(), "##world".into()])
            .unwrap();
        assert_eq!(out, "helloworld");
    }
}
