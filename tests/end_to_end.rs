//! End-to-end pipeline scenarios, mirroring spec.md 8's S1-S8 concrete
//! vectors plus its universal invariants.

use std::collections::HashMap;

use subtok::models::bpe::BpeBuilder;
use subtok::models::wordpiece::WordPieceBuilder;
use subtok::normalizers::bert::BertNormalizer;
use subtok::pre_tokenizers::bert::BertPreTokenizer;
use subtok::processors::template::{Piece, SequenceId, SpecialTokenEntry, TemplateProcessing};
use subtok::utils::padding::{PaddingDirectionParam, PaddingParams, PaddingStrategy};
use subtok::utils::truncation::{TruncationDirectionParam, TruncationParams, TruncationStrategy};
use subtok::{AddedToken, Tokenizer};

fn vocab(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
    pairs.iter().map(|(s, i)| (s.to_string(), *i)).collect()
}

/// S1: WordPiece greedy segmentation of a single run-on word.
#[test]
fn wordpiece_greedy_match() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("hello", 420), ("##world", 421), ("[UNK]", 333)]))
        .unk_token("[UNK]".into())
        .continuing_subword_prefix("##".into())
        .max_input_chars_per_word(100)
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());

    let encoding = tokenizer.encode("helloworld", false).unwrap();
    assert_eq!(encoding.get_ids(), &[420, 421]);
    assert_eq!(encoding.get_tokens(), &["hello", "##world"]);
    assert_eq!(encoding.get_offsets(), &[(0, 5), (5, 10)]);
}

/// S2: an unknown word anywhere in the input becomes a single `[UNK]`.
#[test]
fn wordpiece_unknown_word() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("hello", 420), ("##world", 421), ("[UNK]", 333)]))
        .unk_token("[UNK]".into())
        .continuing_subword_prefix("##".into())
        .max_input_chars_per_word(100)
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());

    let encoding = tokenizer.encode("hello world", false).unwrap();
    assert_eq!(encoding.get_ids(), &[420, 333]);
    assert_eq!(encoding.get_tokens(), &["hello", "[UNK]"]);
    assert_eq!(encoding.get_offsets(), &[(0, 5), (6, 11)]);
}

/// S3: BPE with empty merges and `fuse_unk` collapses a run of unknown
/// characters into one fused unk token.
#[test]
fn bpe_fused_unk() {
    let model = BpeBuilder::new()
        .vocab(vocab(&[("<unk>", 0), ("a", 1), ("b", 2)]))
        .merges(vec![])
        .unk_token("<unk>".into())
        .fuse_unk(true)
        .build()
        .unwrap();
    let tokenizer = Tokenizer::new(model.into());

    let encoding = tokenizer.encode("accb", false).unwrap();
    assert_eq!(encoding.get_ids(), &[1, 0, 2]);
    assert_eq!(encoding.get_offsets(), &[(0, 1), (1, 3), (3, 4)]);
}

/// S4: a full merge chain collapses "unrelated" into one token; with
/// dropout forced to 1.0 every merge is skipped and each code point
/// survives as its own token.
#[test]
fn bpe_full_merge_and_total_dropout() {
    let merged_vocab = vocab(&[
        ("u", 0),
        ("n", 1),
        ("r", 2),
        ("e", 3),
        ("l", 4),
        ("a", 5),
        ("t", 6),
        ("d", 7),
        ("un", 8),
        ("re", 9),
        ("rel", 10),
        ("rela", 11),
        ("relat", 12),
        ("relate", 13),
        ("related", 14),
        ("unrelated", 15),
    ]);
    let merges = vec![
        ("u".into(), "n".into()),
        ("r".into(), "e".into()),
        ("re".into(), "l".into()),
        ("rel".into(), "a".into()),
        ("rela".into(), "t".into()),
        ("relat".into(), "e".into()),
        ("relate".into(), "d".into()),
        ("un".into(), "related".into()),
    ];

    let model = BpeBuilder::new()
        .vocab(merged_vocab.clone())
        .merges(merges.clone())
        .build()
        .unwrap();
    let tokenizer = Tokenizer::new(model.into());
    let encoding = tokenizer.encode("unrelated", false).unwrap();
    assert_eq!(encoding.get_tokens(), &["unrelated"]);

    let dropout_model = BpeBuilder::new()
        .vocab(merged_vocab)
        .merges(merges)
        .dropout(1.0)
        .build()
        .unwrap();
    let dropout_tokenizer = Tokenizer::new(dropout_model.into());
    let encoding = dropout_tokenizer.encode("unrelated", false).unwrap();
    assert_eq!(
        encoding.get_tokens(),
        &["u", "n", "r", "e", "l", "a", "t", "e", "d"]
    );
}

/// S5: BertNormalizer + BertPreTokenizer + TemplateProcessing wraps every
/// sequence with `[CLS] ... [SEP]` and stamps the special-token mask.
#[test]
fn bert_pipeline_with_template_processing() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("[PAD]", 0), ("[UNK]", 333)]))
        .unk_token("[UNK]".into())
        .build()
        .unwrap();

    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_normalizer(BertNormalizer::default().into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());

    let special_tokens = HashMap::from([
        (
            "[CLS]".to_string(),
            SpecialTokenEntry {
                ids: vec![101],
                tokens: vec!["[CLS]".to_string()],
            },
        ),
        (
            "[SEP]".to_string(),
            SpecialTokenEntry {
                ids: vec![102],
                tokens: vec!["[SEP]".to_string()],
            },
        ),
    ]);
    let template = TemplateProcessing::new(
        vec![
            Piece::SpecialToken {
                id: "[CLS]".into(),
                type_id: 0,
            },
            Piece::Sequence {
                id: SequenceId::A,
                type_id: 0,
            },
            Piece::SpecialToken {
                id: "[SEP]".into(),
                type_id: 0,
            },
        ],
        vec![],
        special_tokens,
    );
    tokenizer.with_post_processor(template.into());

    let encoding = tokenizer.encode("Hello World!", true).unwrap();
    assert_eq!(encoding.get_ids()[0], 101);
    assert_eq!(*encoding.get_ids().last().unwrap(), 102);
    assert_eq!(encoding.get_special_tokens_mask()[0], 1);
    assert_eq!(*encoding.get_special_tokens_mask().last().unwrap(), 1);
    assert!(encoding.get_special_tokens_mask()[1..encoding.len() - 1]
        .iter()
        .all(|&m| m == 0));
    assert!(encoding.get_attention_mask().iter().all(|&m| m == 1));
}

/// S6: truncation with `LongestFirst`, `max_length = 1`, `stride = 0`
/// carves the second token off into a single overflowing encoding.
#[test]
fn truncation_longest_first_right() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("[UNK]", 0), ("a", 12), ("b", 14)]))
        .unk_token("[UNK]".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());
    tokenizer.with_truncation(Some(TruncationParams {
        direction: TruncationDirectionParam::Right,
        strategy: TruncationStrategy::LongestFirst,
        max_length: 1,
        stride: 0,
    }));

    let encoding = tokenizer.encode("a b", false).unwrap();
    assert_eq!(encoding.get_ids(), &[12]);
    assert_eq!(encoding.get_overflowing().len(), 1);
    assert_eq!(encoding.get_overflowing()[0].get_ids(), &[14]);
}

/// S7: padding to a batch target rounded up to a multiple of 3.
#[test]
fn padding_batch_longest_multiple_of_three() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("[UNK]", 0), ("a", 1), ("b", 2), ("c", 3), ("d", 4)]))
        .unk_token("[UNK]".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());
    tokenizer.with_padding(Some(PaddingParams {
        direction: PaddingDirectionParam::Right,
        strategy: PaddingStrategy::BatchLongest,
        pad_id: 0,
        pad_type_id: 0,
        pad_token: "[PAD]".into(),
        pad_to_multiple_of: Some(3),
    }));

    let encodings = tokenizer
        .encode_batch(vec!["a b c d".to_string()], false)
        .unwrap();
    let encoding = &encodings[0];
    assert_eq!(encoding.len(), 6);
    assert_eq!(
        encoding.get_attention_mask(),
        &[1, 1, 1, 1, 0, 0]
    );
}

/// S8: added special tokens are extracted whole, carving the input into
/// exactly four splits that alternate matched/unmatched.
#[test]
fn added_vocabulary_extraction() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("[UNK]", 0)]))
        .unk_token("[UNK]".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());

    let specials: Vec<AddedToken> = ["[CLS]", "[SEP]", "[MASK]", "[UNK]", "[PAD]"]
        .iter()
        .map(|t| AddedToken::from(*t, true).normalized(false))
        .collect();
    tokenizer.add_special_tokens(&specials);

    let input = "[CLS] my name is, SLIM SHADY? [MASK] is my name!";
    let encoding = tokenizer.encode(input, false).unwrap();
    // First and last tokens are the two special tokens that bound the
    // run-on text; the body is greedily unk'd by the trivial vocab.
    assert_eq!(encoding.get_tokens().first().unwrap(), "[CLS]");
    assert!(encoding.get_tokens().contains(&"[MASK]".to_string()));
}

/// Property 1 + 2: every produced offset lies within the original input's
/// byte range, and the seven primary sequences stay equal length.
#[test]
fn offsets_stay_within_input_and_sequences_stay_aligned() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[
            ("[UNK]", 0),
            ("the", 1),
            ("quick", 2),
            ("##er", 3),
        ]))
        .unk_token("[UNK]".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());

    let input = "the quicker fox";
    let encoding = tokenizer.encode(input, false).unwrap();
    let len_bytes = input.len();
    for &(start, end) in encoding.get_offsets() {
        assert!(start <= end);
        assert!(end <= len_bytes);
    }
    let n = encoding.get_ids().len();
    assert_eq!(encoding.get_type_ids().len(), n);
    assert_eq!(encoding.get_tokens().len(), n);
    assert_eq!(encoding.get_words().len(), n);
    assert_eq!(encoding.get_offsets().len(), n);
    assert_eq!(encoding.get_special_tokens_mask().len(), n);
    assert_eq!(encoding.get_attention_mask().len(), n);
}

/// Property 3: decode(encode(...)) is stable under idempotence once
/// special tokens are skipped.
#[test]
fn decode_encode_is_idempotent() {
    let model = WordPieceBuilder::new()
        .vocab(vocab(&[("[UNK]", 0), ("hello", 1), ("##world", 2)]))
        .unk_token("[UNK]".into())
        .continuing_subword_prefix("##".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(model.into());
    tokenizer.with_pre_tokenizer(BertPreTokenizer.into());
    tokenizer.with_decoder(subtok::decoders::wordpiece::WordPieceDecoder::new("##".into(), true).into());

    let first_ids = tokenizer.encode("helloworld", false).unwrap().get_ids().to_vec();
    let first_text = tokenizer.decode(first_ids, true).unwrap();
    let second_ids = tokenizer.encode(first_text.as_str(), false).unwrap().get_ids().to_vec();
    let second_text = tokenizer.decode(second_ids, true).unwrap();
    assert_eq!(first_text, second_text);
}
