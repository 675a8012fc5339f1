//! Property-based tests for estimation and decoding.
//!
//! - Every trained table row is a probability distribution
//! - No (tag, word-or-unknown) emission is zero
//! - Decoding is deterministic and length-preserving
//! - Viterbi scores at least as well as any other path

use proptest::prelude::*;

use hmmpos_core::{Estimator, EstimatorConfig, HmmModel, TaggedSentence, ViterbiDecoder};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const WORDS: &[&str] = &[
    "the", "a", "dog", "cat", "runs", "sleeps", "quickly", "big", "fish", "can", "swim", ".",
];
const TAGS: &[&str] = &["DT", "NN", "VBZ", "RB", "JJ", "MD", "VB", "."];

fn arb_sentence() -> impl Strategy<Value = TaggedSentence> {
    prop::collection::vec((0..WORDS.len(), 0..TAGS.len()), 1..12)
        .prop_map(|pairs| pairs.into_iter().map(|(w, t)| (WORDS[w], TAGS[t])).collect())
}

fn arb_corpus() -> impl Strategy<Value = Vec<TaggedSentence>> {
    prop::collection::vec(arb_sentence(), 1..20)
}

fn arb_config() -> impl Strategy<Value = EstimatorConfig> {
    (
        prop_oneof![Just(0.1f64), Just(1.0), (1u32..=50).prop_map(|v| v as f64 / 100.0)],
        prop_oneof![Just(0.0f64), Just(0.1), Just(1.0)],
        1usize..=3,
    )
        .prop_map(|(emission, transition, threshold)| {
            EstimatorConfig::new()
                .with_emission_smoothing(emission)
                .with_transition_smoothing(transition)
                .with_unknown_word_threshold(threshold)
        })
}

fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            (0..WORDS.len()).prop_map(|w| WORDS[w].to_string()),
            "[a-z]{1,8}",
        ],
        1..15,
    )
}

fn assert_distribution(row: &[f64]) -> Result<(), TestCaseError> {
    let sum: f64 = row.iter().sum();
    prop_assert!((sum - 1.0).abs() <= 1e-9, "row sums to {}", sum);
    Ok(())
}

fn train(corpus: &[TaggedSentence], config: EstimatorConfig) -> HmmModel {
    Estimator::new(config).estimate(corpus).unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_rows_sum_to_one(corpus in arb_corpus(), config in arb_config()) {
        let model = train(&corpus, config);
        assert_distribution(model.initial())?;
        for t in 0..model.num_tags() {
            assert_distribution(model.transition_row(t))?;
            assert_distribution(model.emission_row(t))?;
        }
    }

    #[test]
    fn prop_emissions_positive(corpus in arb_corpus(), config in arb_config()) {
        let model = train(&corpus, config);
        for t in 0..model.num_tags() {
            for (w, p) in model.emission_row(t).iter().enumerate() {
                prop_assert!(*p > 0.0, "P(word {} | tag {}) is zero", w, t);
            }
        }
    }

    #[test]
    fn prop_decode_deterministic_and_complete(
        corpus in arb_corpus(),
        config in arb_config(),
        tokens in arb_tokens(),
    ) {
        let model = train(&corpus, config);
        let decoder = ViterbiDecoder::new(&model).unwrap();

        let first = decoder.tag(&tokens).unwrap();
        let second = decoder.tag(&tokens).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), tokens.len());
        for (tagged, token) in first.iter().zip(&tokens) {
            prop_assert_eq!(&tagged.word, token);
            prop_assert!(model.tagset().contains(&tagged.tag));
        }
    }

    #[test]
    fn prop_viterbi_beats_gold_path(corpus in arb_corpus()) {
        let model = train(&corpus, EstimatorConfig::default());
        let decoder = ViterbiDecoder::new(&model).unwrap();

        for sentence in &corpus {
            let words: Vec<&str> = sentence.words().collect();
            let gold: Vec<usize> = sentence
                .tags()
                .map(|t| model.tagset().id(t).unwrap())
                .collect();
            let (_, best) = decoder.decode_with_score(&words).unwrap();
            let gold_score = decoder.score(&words, &gold).unwrap();
            prop_assert!(best >= gold_score - 1e-9);
        }
    }
}
