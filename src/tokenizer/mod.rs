//! Represents a tokenization pipeline.
//!
//! A [`TokenizerImpl`] is composed of some of the following parts.
//!   - [`Normalizer`]: Takes care of the text normalization (like unicode normalization).
//!   - [`PreTokenizer`]: Takes care of the pre-tokenization (ie. how to split the input into words
//!   and pre-process them).
//!   - [`Model`]: A model encapsulates the tokenization algorithm (like BPE or WordPiece).
//!   - [`PostProcessor`]: Takes care of any processing after tokenization (like adding special
//!   tokens).
//!   - [`Decoder`]: In charge of turning a list of ids/tokens back into readable text.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::prelude::*,
    io::BufReader,
    path::Path,
};

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

mod added_vocabulary;
mod encoding;
pub mod normalizer;
pub mod pattern;
pub mod serialization;

pub use crate::utils::padding::{pad_encodings, PaddingParams, PaddingStrategy};
pub use crate::utils::truncation::{truncate_encodings, TruncationParams, TruncationStrategy};
pub use added_vocabulary::*;
pub use encoding::*;
pub use normalizer::*;
pub use pattern::SplitPattern;

/// Crate-wide boxed error; component-specific error enums convert into it via `?`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
pub type Offsets = (usize, usize);

/// Cleans up text before the rest of the pipeline ever sees it.
pub trait Normalizer {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()>;
}

/// Splits a `PreTokenizedString` further, using the shared `split` primitive
/// defined on `PreTokenizedString` itself.
pub trait PreTokenizer {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> Result<()>;
}

/// Turns each not-yet-tokenized `Split` of a `PreTokenizedString` into a
/// sequence of sub-word `Token`s.
pub trait Model {
    fn tokenize(&self, pretokenized: PreTokenizedString) -> Result<PreTokenizedString> {
        let mut pretokenized = pretokenized;
        pretokenized.tokenize(|normalized| self.tokenize_split(normalized.get()))?;
        Ok(pretokenized)
    }
    /// Tokenizes a single already-split piece of text.
    fn tokenize_split(&self, sequence: &str) -> Result<Vec<Token>>;
    fn token_to_id(&self, token: &str) -> Option<u32>;
    fn id_to_token(&self, id: u32) -> Option<&str>;
    fn get_vocab(&self) -> &HashMap<String, u32>;
    fn get_vocab_size(&self) -> usize;
}

/// Finalizes an `Encoding`: inserting special tokens, re-stamping type ids,
/// merging a pair sequence in.
pub trait PostProcessor {
    /// The number of special tokens this processor adds, used so truncation
    /// can reserve room for them.
    fn added_tokens(&self, is_pair: bool) -> usize;
    fn process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding>;
}

/// The processing applied when no `PostProcessor` is configured: just merge
/// the pair encoding in, if there is one.
pub fn default_process(
    encoding: Encoding,
    pair_encoding: Option<Encoding>,
    _add_special_tokens: bool,
) -> Result<Encoding> {
    match pair_encoding {
        None => Ok(encoding),
        Some(pair) => {
            let mut encoding = encoding;
            encoding.merge_with(pair, true);
            Ok(encoding)
        }
    }
}

/// Turns a decoded token sequence back into a string, one stage at a time.
pub trait Decoder {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>>;
    fn decode(&self, tokens: Vec<String>) -> Result<String> {
        Ok(self.decode_chain(tokens)?.join(""))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: u32,
    pub value: String,
    pub offsets: Offsets,
}

impl Token {
    pub fn new(id: u32, value: String, offsets: Offsets) -> Self {
        Token { id, value, offsets }
    }
}

#[derive(Debug, Clone)]
pub enum InputSequence {
    Raw(String),
}

impl From<String> for InputSequence {
    fn from(input: String) -> Self {
        InputSequence::Raw(input)
    }
}

impl From<&str> for InputSequence {
    fn from(input: &str) -> Self {
        InputSequence::Raw(input.to_owned())
    }
}

#[derive(Debug, Clone)]
pub enum EncodeInput {
    Single(InputSequence),
    Dual(InputSequence, InputSequence),
}

impl<I: Into<InputSequence>> From<I> for EncodeInput {
    fn from(input: I) -> Self {
        EncodeInput::Single(input.into())
    }
}

impl<I1: Into<InputSequence>, I2: Into<InputSequence>> From<(I1, I2)> for EncodeInput {
    fn from(input: (I1, I2)) -> Self {
        EncodeInput::Dual(input.0.into(), input.1.into())
    }
}

#[derive(Debug)]
pub struct BuilderError(String);

impl std::error::Error for BuilderError {}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builder for `TokenizerImpl`; `build()` fails only if the model is
/// missing.
pub struct TokenizerBuilder<M, N, PT, PP, D> {
    model: Option<M>,
    normalizer: Option<N>,
    pre_tokenizer: Option<PT>,
    post_processor: Option<PP>,
    decoder: Option<D>,
    added_vocabulary: AddedVocabulary,
    truncation: Option<TruncationParams>,
    padding: Option<PaddingParams>,
}

impl<M, N, PT, PP, D> Default for TokenizerBuilder<M, N, PT, PP, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, N, PT, PP, D> TokenizerBuilder<M, N, PT, PP, D> {
    pub fn new() -> Self {
        TokenizerBuilder {
            model: None,
            normalizer: None,
            pre_tokenizer: None,
            post_processor: None,
            decoder: None,
            added_vocabulary: AddedVocabulary::new(),
            truncation: None,
            padding: None,
        }
    }

    pub fn build(self) -> Result<TokenizerImpl<M, N, PT, PP, D>> {
        let model = self
            .model
            .ok_or_else(|| Box::new(BuilderError("Model missing.".into())))?;
        Ok(TokenizerImpl {
            normalizer: self.normalizer,
            pre_tokenizer: self.pre_tokenizer,
            model,
            post_processor: self.post_processor,
            decoder: self.decoder,
            added_vocabulary: self.added_vocabulary,
            truncation: self.truncation,
            padding: self.padding,
        })
    }

    pub fn with_model(mut self, model: M) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Option<N>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_pre_tokenizer(mut self, pre_tokenizer: Option<PT>) -> Self {
        self.pre_tokenizer = pre_tokenizer;
        self
    }

    pub fn with_post_processor(mut self, post_processor: Option<PP>) -> Self {
        self.post_processor = post_processor;
        self
    }

    pub fn with_decoder(mut self, decoder: Option<D>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_truncation(mut self, trunc: Option<TruncationParams>) -> Self {
        self.truncation = trunc;
        self
    }

    pub fn with_padding(mut self, padding: Option<PaddingParams>) -> Self {
        self.padding = padding;
        self
    }
}

/// An immutable, seven-part tokenization pipeline capable of encoding and
/// decoding text. See spec.md 2 for the fixed data-flow order.
pub struct TokenizerImpl<M, N, PT, PP, D> {
    normalizer: Option<N>,
    pre_tokenizer: Option<PT>,
    model: M,
    post_processor: Option<PP>,
    decoder: Option<D>,
    added_vocabulary: AddedVocabulary,
    truncation: Option<TruncationParams>,
    padding: Option<PaddingParams>,
}

impl<M, N, PT, PP, D> TokenizerImpl<M, N, PT, PP, D>
where
    M: Model,
    N: Normalizer,
    PT: PreTokenizer,
    PP: PostProcessor,
    D: Decoder,
{
    pub fn new(model: M) -> Self {
        TokenizerImpl {
            normalizer: None,
            pre_tokenizer: None,
            model,
            post_processor: None,
            decoder: None,
            added_vocabulary: AddedVocabulary::new(),
            truncation: None,
            padding: None,
        }
    }

    pub fn with_normalizer(&mut self, normalizer: N) -> &mut Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn get_normalizer(&self) -> Option<&N> {
        self.normalizer.as_ref()
    }

    pub fn with_pre_tokenizer(&mut self, pre_tokenizer: PT) -> &mut Self {
        self.pre_tokenizer = Some(pre_tokenizer);
        self
    }

    pub fn get_pre_tokenizer(&self) -> Option<&PT> {
        self.pre_tokenizer.as_ref()
    }

    pub fn with_post_processor(&mut self, post_processor: PP) -> &mut Self {
        self.post_processor = Some(post_processor);
        self
    }

    pub fn get_post_processor(&self) -> Option<&PP> {
        self.post_processor.as_ref()
    }

    pub fn with_decoder(&mut self, decoder: D) -> &mut Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn get_decoder(&self) -> Option<&D> {
        self.decoder.as_ref()
    }

    pub fn with_model(&mut self, model: M) -> &mut Self {
        self.model = model;
        self
    }

    pub fn get_model(&self) -> &M {
        &self.model
    }

    pub fn with_truncation(&mut self, trunc: Option<TruncationParams>) -> &mut Self {
        self.truncation = trunc;
        self
    }

    pub fn get_truncation(&self) -> Option<&TruncationParams> {
        self.truncation.as_ref()
    }

    pub fn with_padding(&mut self, padding: Option<PaddingParams>) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn get_padding(&self) -> Option<&PaddingParams> {
        self.padding.as_ref()
    }

    pub fn get_vocab(&self, with_added_tokens: bool) -> HashMap<String, u32> {
        let mut final_vocab = self.model.get_vocab().clone();
        if with_added_tokens {
            for (token, id) in self.added_vocabulary.get_vocab() {
                final_vocab.insert(token.clone(), *id);
            }
        }
        final_vocab
    }

    pub fn get_vocab_size(&self, with_added_tokens: bool) -> usize {
        self.model.get_vocab_size()
            + if with_added_tokens {
                self.added_vocabulary.len()
            } else {
                0
            }
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.added_vocabulary.token_to_id(token, &self.model)
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.added_vocabulary.id_to_token(id, &self.model)
    }

    /// Runs one sequence through extraction/normalization, pre-tokenization
    /// and the model, producing a single-sequence `Encoding` (steps 1-4 of
    /// spec.md 4.10).
    fn encode_single_sequence(&self, sequence: &str, type_id: u32) -> Result<Encoding> {
        let pretokenized = self
            .added_vocabulary
            .extract_and_normalize(self.normalizer.as_ref(), sequence);

        let mut pretokenized = pretokenized;
        if let Some(pre_tokenizer) = &self.pre_tokenizer {
            // Splits already carrying a pre-assigned token (special/added
            // tokens) are skipped automatically by `PreTokenizedString::split`.
            pre_tokenizer.pre_tokenize(&mut pretokenized)?;
        }
        let pretokenized = self.model.tokenize(pretokenized)?;
        let tokens = pretokenized.into_tokens();

        let len = tokens.len();
        let mut ids = Vec::with_capacity(len);
        let mut values = Vec::with_capacity(len);
        let mut words = Vec::with_capacity(len);
        let mut offsets = Vec::with_capacity(len);
        for (token, word_idx) in tokens {
            ids.push(token.id);
            values.push(token.value);
            words.push(Some(word_idx));
            offsets.push(token.offsets);
        }

        Ok(Encoding::new(
            ids,
            vec![type_id; len],
            values,
            words,
            offsets,
            vec![0; len],
            vec![1; len],
            vec![],
        ))
    }

    /// Encodes a single sequence, or a pair of sequences, into a final
    /// `Encoding` (truncated, post-processed, padded).
    pub fn encode<E: Into<EncodeInput>>(
        &self,
        input: E,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let (sequence, pair) = match input.into() {
            EncodeInput::Single(s1) => (s1, None),
            EncodeInput::Dual(s1, s2) => (s1, Some(s2)),
        };

        let InputSequence::Raw(sequence) = sequence;
        let encoding = self.encode_single_sequence(&sequence, 0)?;
        let pair_encoding = match pair {
            Some(InputSequence::Raw(sequence)) => {
                Some(self.encode_single_sequence(&sequence, 1)?)
            }
            None => None,
        };

        self.post_process(encoding, pair_encoding, add_special_tokens)
    }

    /// Encodes every input, fanning the work out across threads (trivial
    /// batch scheduling -- see spec.md 1).
    pub fn encode_batch<E: Into<EncodeInput> + Send>(
        &self,
        inputs: Vec<E>,
        add_special_tokens: bool,
    ) -> Result<Vec<Encoding>>
    where
        Self: Sync,
    {
        let mut encodings = inputs
            .into_par_iter()
            .map(|input| self.encode(input, add_special_tokens))
            .collect::<Result<Vec<Encoding>>>()?;

        if let Some(params) = &self.padding {
            pad_encodings(&mut encodings, params)?;
        }

        Ok(encodings)
    }

    /// Resolves each id to a token -- preferring the added vocabulary over
    /// the model's own -- then runs the decoder chain.
    pub fn decode(&self, ids: Vec<u32>, skip_special_tokens: bool) -> Result<String> {
        let tokens = ids
            .into_iter()
            .filter_map(|id| {
                self.added_vocabulary
                    .id_to_token(id, &self.model)
                    .filter(|token| {
                        !skip_special_tokens || !self.added_vocabulary.is_special_token(token)
                    })
                    .map(|t| t.to_owned())
            })
            .collect::<Vec<_>>();

        if let Some(decoder) = &self.decoder {
            decoder.decode(tokens)
        } else {
            Ok(tokens.join(" "))
        }
    }

    pub fn decode_batch(
        &self,
        sentences: Vec<Vec<u32>>,
        skip_special_tokens: bool,
    ) -> Result<Vec<String>>
    where
        Self: Sync,
    {
        sentences
            .into_par_iter()
            .map(|sentence| self.decode(sentence, skip_special_tokens))
            .collect()
    }

    /// Truncates (reserving room for any tokens the post-processor will
    /// add), post-processes, then pads -- steps 5-7 of spec.md 4.10.
    pub fn post_process(
        &self,
        encoding: Encoding,
        pair_encoding: Option<Encoding>,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let (encoding, pair_encoding) = if let Some(trunc) = &self.truncation {
            let n_added_tokens = self
                .post_processor
                .as_ref()
                .map(|p| p.added_tokens(pair_encoding.is_some()))
                .unwrap_or(0);
            if add_special_tokens && n_added_tokens > 0 {
                let params = TruncationParams {
                    max_length: trunc.max_length.saturating_sub(n_added_tokens),
                    ..*trunc
                };
                truncate_encodings(encoding, pair_encoding, &params)?
            } else {
                truncate_encodings(encoding, pair_encoding, trunc)?
            }
        } else {
            (encoding, pair_encoding)
        };

        let mut final_encoding = match &self.post_processor {
            Some(processor) => processor.process(encoding, pair_encoding, add_special_tokens)?,
            None => default_process(encoding, pair_encoding, add_special_tokens)?,
        };

        if let Some(params) = &self.padding {
            let mut arr = [final_encoding];
            pad_encodings(&mut arr, params)?;
            let [e] = arr;
            final_encoding = e;
        }

        Ok(final_encoding)
    }

    pub fn add_special_tokens(&mut self, tokens: &[AddedToken]) -> usize {
        self.added_vocabulary
            .add_special_tokens(tokens, &self.model, self.normalizer.as_ref())
    }

    pub fn add_tokens(&mut self, tokens: &[AddedToken]) -> usize {
        self.added_vocabulary
            .add_tokens(tokens, &self.model, self.normalizer.as_ref())
    }
}

impl<M, N, PT, PP, D> TokenizerImpl<M, N, PT, PP, D>
where
    M: DeserializeOwned + Model,
    N: DeserializeOwned + Normalizer,
    PT: DeserializeOwned + PreTokenizer,
    PP: DeserializeOwned + PostProcessor,
    D: DeserializeOwned + Decoder,
{
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = File::open(file)?;
        let buf = BufReader::new(file);
        serialization::from_reader(buf)
    }

    pub fn from_str(s: &str) -> Result<Self> {
        serialization::from_str(s)
    }
}

impl<M, N, PT, PP, D> TokenizerImpl<M, N, PT, PP, D>
where
    M: Serialize,
    N: Serialize,
    PT: Serialize,
    PP: Serialize,
    D: Serialize,
{
    pub fn to_string(&self, pretty: bool) -> Result<String> {
        serialization::to_string(self, pretty)
    }

    pub fn save(&self, path: &str, pretty: bool) -> Result<()> {
        let serialized = self.to_string(pretty)?;
        let mut file = File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }
}
