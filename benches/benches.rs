#[macro_use]
extern crate criterion;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use criterion::{black_box, Criterion};

use subtok::decoders::byte_level::ByteLevelDecoder;
use subtok::decoders::wordpiece::WordPieceDecoder;
use subtok::decoders::DecoderWrapper;
use subtok::models::bpe::BPE;
use subtok::models::wordpiece::WordPiece;
use subtok::models::ModelWrapper;
use subtok::normalizers::bert::BertNormalizer;
use subtok::normalizers::NormalizerWrapper;
use subtok::pre_tokenizers::bert::BertPreTokenizer;
use subtok::pre_tokenizers::byte_level::ByteLevel;
use subtok::pre_tokenizers::PreTokenizerWrapper;
use subtok::processors::bert::BertProcessing;
use subtok::processors::PostProcessorWrapper;
use subtok::tokenizer::EncodeInput;
use subtok::{AddedToken, Tokenizer};

static BATCH_SIZE: usize = 1_000;

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "while", "a", "cat", "sleeps",
    "near", "warm", "fireplace", "during", "cold", "winter", "evening", "in", "small", "village",
    "tokenization", "encoding", "decoding", "subword", "vocabulary", "pretokenizer", "normalizer",
    "byte", "level", "wordpiece", "merges", "offsets", "truncation", "padding", "special", "tokens",
];

fn sample_corpus(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| {
            let mut words = Vec::with_capacity(8);
            for j in 0..8 {
                words.push(WORDS[(i * 7 + j * 3) % WORDS.len()]);
            }
            words.join(" ")
        })
        .collect()
}

/// Greedy byte-pair-merge over a small corpus -- just enough to hand
/// `BPE::builder` a non-trivial vocab/merges pair. Not a real trainer; see
/// the library's training non-goal.
fn build_bpe_vocab_and_merges(corpus: &[String]) -> (HashMap<String, u32>, Vec<(String, String)>) {
    use subtok::pre_tokenizers::byte_level::byte_to_char;

    let mut vocab: HashMap<String, u32> = HashMap::new();
    let mut next_id = 0u32;
    fn intern(vocab: &mut HashMap<String, u32>, next_id: &mut u32, s: &str) -> u32 {
        if let Some(&id) = vocab.get(s) {
            id
        } else {
            let id = *next_id;
            vocab.insert(s.to_string(), id);
            *next_id += 1;
            id
        }
    }

    for byte in 0u32..=255 {
        let ch = byte_to_char(byte as u8);
        intern(&mut vocab, &mut next_id, &ch.to_string());
    }

    let mut words: Vec<Vec<String>> = corpus
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(|word| word.bytes().map(|b| byte_to_char(b).to_string()).collect::<Vec<_>>())
        .collect();

    let mut merges = Vec::new();
    for _ in 0..200 {
        let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();
        for word in &words {
            for pair in word.windows(2) {
                *pair_counts.entry((pair[0].clone(), pair[1].clone())).or_insert(0) += 1;
            }
        }
        let best = pair_counts.into_iter().max_by_key(|(_, c)| *c);
        let ((left, right), count) = match best {
            Some(entry) => entry,
            None => break,
        };
        if count < 2 {
            break;
        }
        let merged = format!("{}{}", left, right);
        intern(&mut vocab, &mut next_id, &merged);
        merges.push((left.clone(), right.clone()));

        for word in &mut words {
            let mut i = 0;
            while i + 1 < word.len() {
                if word[i] == left && word[i + 1] == right {
                    word.splice(i..=i + 1, [merged.clone()]);
                } else {
                    i += 1;
                }
            }
        }
    }

    (vocab, merges)
}

fn build_wordpiece_vocab() -> HashMap<String, u32> {
    let mut vocab = HashMap::new();
    let mut next_id = 0u32;
    for special in ["[PAD]", "[UNK]", "[CLS]", "[SEP]"] {
        vocab.insert(special.to_string(), next_id);
        next_id += 1;
    }
    for word in WORDS {
        vocab.entry(word.to_string()).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        for (i, c) in word.char_indices().skip(1) {
            let piece = format!("##{}", &word[i..i + c.len_utf8()]);
            vocab.entry(piece).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            });
        }
    }
    for c in 'a'..='z' {
        vocab.entry(c.to_string()).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        let prefixed = format!("##{}", c);
        vocab.entry(prefixed).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
    }
    vocab
}

fn create_gpt2_like_tokenizer(corpus: &[String]) -> Tokenizer {
    let (vocab, merges) = build_bpe_vocab_and_merges(corpus);
    let bpe = BPE::builder().vocab(vocab).merges(merges).build().unwrap();
    let mut tokenizer = Tokenizer::new(ModelWrapper::BPE(bpe));
    tokenizer.with_pre_tokenizer(PreTokenizerWrapper::ByteLevel(ByteLevel::default()));
    tokenizer.with_decoder(DecoderWrapper::ByteLevel(ByteLevelDecoder));
    tokenizer.add_tokens(&[AddedToken::from("ing", false).single_word(false)]);
    tokenizer.add_special_tokens(&[AddedToken::from("[ENT]", true).single_word(true)]);
    tokenizer
}

fn create_bert_like_tokenizer() -> Tokenizer {
    let vocab = build_wordpiece_vocab();
    let wordpiece = WordPiece::builder()
        .vocab(vocab)
        .unk_token("[UNK]".into())
        .continuing_subword_prefix("##".into())
        .build()
        .unwrap();
    let mut tokenizer = Tokenizer::new(ModelWrapper::WordPiece(wordpiece));
    tokenizer.with_normalizer(NormalizerWrapper::BertNormalizer(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(PreTokenizerWrapper::BertPreTokenizer(BertPreTokenizer));
    tokenizer.with_decoder(DecoderWrapper::WordPiece(WordPieceDecoder::default()));
    tokenizer.with_post_processor(PostProcessorWrapper::BertProcessing(BertProcessing::new(
        ("[SEP]".into(), 3),
        ("[CLS]".into(), 2),
    )));
    tokenizer
}

fn iter_bench_encode(iters: u64, tokenizer: &Tokenizer, lines: &[EncodeInput]) -> Duration {
    let mut duration = Duration::new(0, 0);
    let mut line_index = 0usize;
    for _ in 0..iters {
        if line_index >= lines.len() {
            line_index = 0;
        }
        let input = lines[line_index].clone();
        let start = Instant::now();
        let _ = black_box(tokenizer.encode(input, true));
        duration = duration.checked_add(start.elapsed()).unwrap();
        line_index += 1;
    }
    duration
}

fn iter_bench_encode_batch(iters: u64, tokenizer: &Tokenizer, batches: &[Vec<EncodeInput>]) -> Duration {
    let mut duration = Duration::new(0, 0);
    let mut batch_index = 0usize;
    for _ in 0..iters {
        if batch_index >= batches.len() {
            batch_index = 0;
        }
        let batch = batches[batch_index].clone();
        let start = Instant::now();
        let _ = black_box(tokenizer.encode_batch(batch, true));
        duration = duration.checked_add(start.elapsed()).unwrap();
        batch_index += 1;
    }
    duration
}

fn lines_and_batches(corpus: &[String]) -> (Vec<EncodeInput>, Vec<Vec<EncodeInput>>) {
    let lines: Vec<EncodeInput> = corpus.iter().cloned().map(Into::into).collect();
    let mut batches: Vec<Vec<EncodeInput>> = vec![vec![]];
    for line in &lines {
        if batches.last().unwrap().len() >= BATCH_SIZE {
            batches.push(vec![]);
        }
        batches.last_mut().unwrap().push(line.clone());
    }
    (lines, batches)
}

fn bench_gpt2_like(c: &mut Criterion) {
    let corpus = sample_corpus(5_000);
    let tokenizer = create_gpt2_like_tokenizer(&corpus);
    let (lines, batches) = lines_and_batches(&corpus);

    c.bench_function("BPE byte-level encode", |b| {
        b.iter_custom(|iters| iter_bench_encode(iters, &tokenizer, &lines))
    });
    c.bench_function("BPE byte-level encode batch", |b| {
        b.iter_custom(|iters| iter_bench_encode_batch(iters, &tokenizer, &batches))
    });
}

fn bench_bert_like(c: &mut Criterion) {
    let corpus = sample_corpus(5_000);
    let tokenizer = create_bert_like_tokenizer();
    let (lines, batches) = lines_and_batches(&corpus);

    c.bench_function("WordPiece BERT encode", |b| {
        b.iter_custom(|iters| iter_bench_encode(iters, &tokenizer, &lines))
    });
    c.bench_function("WordPiece BERT encode batch", |b| {
        b.iter_custom(|iters| iter_bench_encode_batch(iters, &tokenizer, &batches))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_gpt2_like, bench_bert_like
}
criterion_main!(benches);
