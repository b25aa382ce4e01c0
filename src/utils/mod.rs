//! Ambient length-shaping and fan-out helpers shared by the tokenizer
//! facade; none of this is a pipeline stage proper, it all lives around
//! `TokenizerImpl::encode`/`encode_batch` (spec.md 4.9, 5).

pub mod padding;
pub mod parallelism;
pub mod truncation;
