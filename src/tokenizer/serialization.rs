//! `Serialize`/`Deserialize` for `TokenizerImpl`, plus the `from_reader`/
//! `from_str`/`to_string` helpers `TokenizerImpl::from_file` and friends
//! call into. Field order follows spec.md 6: `version, truncation, padding,
//! added_tokens, normalizer, pre_tokenizer, post_processor, decoder, model`.

use std::io::Read;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, Error as DeError, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AddedTokenWithId, Decoder, Model, Normalizer, PostProcessor, PreTokenizer, Result, TokenizerImpl};

static SERIALIZATION_VERSION: &str = "1.0";

impl<M, N, PT, PP, D> Serialize for TokenizerImpl<M, N, PT, PP, D>
where
    M: Serialize,
    N: Serialize,
    PT: Serialize,
    PP: Serialize,
    D: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tokenizer = serializer.serialize_struct("Tokenizer", 9)?;
        tokenizer.serialize_field("version", SERIALIZATION_VERSION)?;
        tokenizer.serialize_field("truncation", &self.truncation)?;
        tokenizer.serialize_field("padding", &self.padding)?;
        tokenizer.serialize_field("added_tokens", &self.added_vocabulary)?;
        tokenizer.serialize_field("normalizer", &self.normalizer)?;
        tokenizer.serialize_field("pre_tokenizer", &self.pre_tokenizer)?;
        tokenizer.serialize_field("post_processor", &self.post_processor)?;
        tokenizer.serialize_field("decoder", &self.decoder)?;
        tokenizer.serialize_field("model", &self.model)?;
        tokenizer.end()
    }
}

impl<'de, M, N, PT, PP, D> Deserialize<'de> for TokenizerImpl<M, N, PT, PP, D>
where
    M: DeserializeOwned + Model,
    N: DeserializeOwned + Normalizer,
    PT: DeserializeOwned + PreTokenizer,
    PP: DeserializeOwned + PostProcessor,
    D: DeserializeOwned + Decoder,
{
    fn deserialize<De>(deserializer: De) -> std::result::Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        deserializer.deserialize_struct(
            "Tokenizer",
            &[
                "version",
                "truncation",
                "padding",
                "added_tokens",
                "normalizer",
                "pre_tokenizer",
                "post_processor",
                "decoder",
                "model",
            ],
            TokenizerVisitor(PhantomData),
        )
    }
}

struct TokenizerVisitor<M, N, PT, PP, D>(PhantomData<(M, N, PT, PP, D)>);

impl<'de, M, N, PT, PP, D> Visitor<'de> for TokenizerVisitor<M, N, PT, PP, D>
where
    M: DeserializeOwned + Model,
    N: DeserializeOwned + Normalizer,
    PT: DeserializeOwned + PreTokenizer,
    PP: DeserializeOwned + PostProcessor,
    D: DeserializeOwned + Decoder,
{
    type Value = TokenizerImpl<M, N, PT, PP, D>;

    fn expecting(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "struct Tokenizer")
    }

    fn visit_map<V>(self, mut map: V) -> std::result::Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut model: Option<M> = None;
        let mut normalizer: Option<N> = None;
        let mut pre_tokenizer: Option<PT> = None;
        let mut post_processor: Option<PP> = None;
        let mut decoder: Option<D> = None;
        let mut truncation = None;
        let mut padding = None;
        let mut added_tokens: Vec<AddedTokenWithId> = vec![];

        while let Some(key) = map.next_key::<String>()? {
            match key.as_ref() {
                "version" => {
                    let v: String = map.next_value()?;
                    if v != "1.0" {
                        return Err(V::Error::custom(format!("unknown tokenizer version {:?}", v)));
                    }
                }
                "truncation" => truncation = map.next_value()?,
                "padding" => padding = map.next_value()?,
                "added_tokens" => added_tokens = map.next_value()?,
                "normalizer" => normalizer = map.next_value()?,
                "pre_tokenizer" => pre_tokenizer = map.next_value()?,
                "post_processor" => post_processor = map.next_value()?,
                "decoder" => decoder = map.next_value()?,
                "model" => model = Some(map.next_value()?),
                _ => {
                    let _ignored: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }

        let model = model.ok_or_else(|| V::Error::missing_field("model"))?;
        let mut tokenizer = TokenizerImpl::new(model);
        if let Some(normalizer) = normalizer {
            tokenizer.with_normalizer(normalizer);
        }
        if let Some(pre_tokenizer) = pre_tokenizer {
            tokenizer.with_pre_tokenizer(pre_tokenizer);
        }
        if let Some(post_processor) = post_processor {
            tokenizer.with_post_processor(post_processor);
        }
        if let Some(decoder) = decoder {
            tokenizer.with_decoder(decoder);
        }
        tokenizer.with_truncation(truncation);
        tokenizer.with_padding(padding);

        for token in added_tokens {
            let content = token.token.content.clone();
            if token.token.special {
                tokenizer.add_special_tokens(&[token.token]);
            } else {
                tokenizer.add_tokens(&[token.token]);
            }
            let received_id = tokenizer.token_to_id(&content);
            if received_id != Some(token.id) {
                eprintln!(
                    "warning: token {:?} was expected to have id {} but was assigned {:?}",
                    content, token.id, received_id
                );
            }
        }

        Ok(tokenizer)
    }
}

pub fn from_reader<R, M, N, PT, PP, D>(reader: R) -> Result<TokenizerImpl<M, N, PT, PP, D>>
where
    R: Read,
    M: DeserializeOwned + Model,
    N: DeserializeOwned + Normalizer,
    PT: DeserializeOwned + PreTokenizer,
    PP: DeserializeOwned + PostProcessor,
    D: DeserializeOwned + Decoder,
{
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<M, N, PT, PP, D>(s: &str) -> Result<TokenizerImpl<M, N, PT, PP, D>>
where
    M: DeserializeOwned + Model,
    N: DeserializeOwned + Normalizer,
    PT: DeserializeOwned + PreTokenizer,
    PP: DeserializeOwned + PostProcessor,
    D: DeserializeOwned + Decoder,
{
    Ok(serde_json::from_str(s)?)
}

pub fn to_string<M, N, PT, PP, D>(tokenizer: &TokenizerImpl<M, N, PT, PP, D>, pretty: bool) -> Result<String>
where
    M: Serialize,
    N: Serialize,
    PT: Serialize,
    PP: Serialize,
    D: Serialize,
{
    Ok(if pretty {
        serde_json::to_string_pretty(tokenizer)?
    } else {
        serde_json::to_string(tokenizer)?
    })
}
