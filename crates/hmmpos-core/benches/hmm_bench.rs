use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hmmpos_core::{Estimator, TaggedSentence, Tokenizer, ViterbiDecoder};

const TAGS: &[&str] = &["DT", "JJ", "NN", "NNS", "VBZ", "VBP", "IN", "RB", "."];

/// Deterministic synthetic corpus: word `w{k}` always carries tag `k % TAGS.len()`.
fn synthetic_corpus(sentences: usize, len: usize, vocab: usize) -> Vec<TaggedSentence> {
    let mut state = 0x2545_f491_u64;
    (0..sentences)
        .map(|_| {
            (0..len)
                .map(|_| {
                    state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                    let k = (state >> 33) as usize % vocab;
                    (format!("w{k}"), TAGS[k % TAGS.len()])
                })
                .collect()
        })
        .collect()
}

fn bench_estimate(c: &mut Criterion) {
    let corpus = synthetic_corpus(2000, 20, 3000);
    let estimator = Estimator::default();

    c.bench_function("estimate_2000_sentences", |b| {
        b.iter(|| estimator.estimate(black_box(&corpus)).unwrap());
    });
}

fn bench_decode(c: &mut Criterion) {
    let corpus = synthetic_corpus(2000, 20, 3000);
    let model = Estimator::default().estimate(&corpus).unwrap();
    let decoder = ViterbiDecoder::new(&model).unwrap();

    let short: Vec<String> = (0..8).map(|k| format!("w{}", k * 37)).collect();
    let long: Vec<String> = (0..60).map(|k| format!("w{}", k * 53)).collect();

    c.bench_function("viterbi_decode_8_tokens", |b| {
        b.iter(|| decoder.decode(black_box(&short)).unwrap());
    });

    c.bench_function("viterbi_decode_60_tokens", |b| {
        b.iter(|| decoder.decode(black_box(&long)).unwrap());
    });

    c.bench_function("viterbi_decoder_new", |b| {
        b.iter(|| ViterbiDecoder::new(black_box(&model)).unwrap());
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::new().unwrap();
    let input = "He said \"I can't believe it's already 5 o'clock,\" and left (quickly).";

    c.bench_function("tokenize_sentence", |b| {
        b.iter(|| tokenizer.tokenize(black_box(input)));
    });
}

criterion_group!(benches, bench_estimate, bench_decode, bench_tokenize);
criterion_main!(benches);
