//! The pre-tokenizers -- spec.md 4.3. `PreTokenizerWrapper` is the closed
//! enum the JSON config's `pre_tokenizer.type` tag resolves into.

pub mod bert;
pub mod byte_level;
pub mod delimiter;
pub mod digits;
pub mod metaspace;
pub mod punctuation;
pub mod sequence;
pub mod split;
pub mod unicode_scripts;
pub mod whitespace;

use serde::{Deserialize, Serialize};

use crate::pre_tokenizers::bert::BertPreTokenizer;
use crate::pre_tokenizers::byte_level::ByteLevel;
use crate::pre_tokenizers::delimiter::CharDelimiterSplit;
use crate::pre_tokenizers::digits::Digits;
use crate::pre_tokenizers::metaspace::Metaspace;
use crate::pre_tokenizers::punctuation::Punctuation;
use crate::pre_tokenizers::sequence::Sequence;
use crate::pre_tokenizers::split::Split;
use crate::pre_tokenizers::unicode_scripts::UnicodeScripts;
use crate::pre_tokenizers::whitespace::{Whitespace, WhitespaceSplit};
use crate::{PreTokenizedString, PreTokenizer};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreTokenizerWrapper {
    BertPreTokenizer(BertPreTokenizer),
    ByteLevel(ByteLevel),
    CharDelimiterSplit(CharDelimiterSplit),
    Digits(Digits),
    Metaspace(Metaspace),
    Punctuation(Punctuation),
    Sequence(Sequence),
    Split(Split),
    UnicodeScripts(UnicodeScripts),
    Whitespace(Whitespace),
    WhitespaceSplit(WhitespaceSplit),
}

impl PreTokenizer for PreTokenizerWrapper {
    fn pre_tokenize(&self, pretokenized: &mut PreTokenizedString) -> crate::Result<()> {
        match self {
            PreTokenizerWrapper::BertPreTokenizer(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::ByteLevel(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::CharDelimiterSplit(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Digits(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Metaspace(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Punctuation(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Sequence(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Split(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::UnicodeScripts(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::Whitespace(pt) => pt.pre_tokenize(pretokenized),
            PreTokenizerWrapper::WhitespaceSplit(pt) => pt.pre_tokenize(pretokenized),
        }
    }
}

impl_enum_from!(BertPreTokenizer, PreTokenizerWrapper, BertPreTokenizer);
impl_enum_from!(ByteLevel, PreTokenizerWrapper, ByteLevel);
impl_enum_from!(CharDelimiterSplit, PreTokenizerWrapper, CharDelimiterSplit);
impl_enum_from!(Digits, PreTokenizerWrapper, Digits);
impl_enum_from!(Metaspace, PreTokenizerWrapper, Metaspace);
impl_enum_from!(Punctuation, PreTokenizerWrapper, Punctuation);
impl_enum_from!(Sequence, PreTokenizerWrapper, Sequence);
impl_enum_from!(Split, PreTokenizerWrapper, Split);
impl_enum_from!(UnicodeScripts, PreTokenizerWrapper, UnicodeScripts);
impl_enum_from!(Whitespace, PreTokenizerWrapper, Whitespace);
impl_enum_from!(WhitespaceSplit, PreTokenizerWrapper, WhitespaceSplit);
