//! Train / held-out partitioning of a corpus.

use hmmpos_core::TaggedSentence;
use tracing::debug;

/// A corpus cut into a training portion and the remainder.
#[derive(Debug, Clone, Default)]
pub struct CorpusSplit {
    pub train: Vec<TaggedSentence>,
    pub held_out: Vec<TaggedSentence>,
}

/// Take the first `train_size` sentences for training and hold out the rest.
///
/// With a `shuffle_seed` the corpus is shuffled first (Fisher-Yates over a
/// seeded PCG generator), so the same seed always yields the same split.
pub fn split_corpus(
    mut sentences: Vec<TaggedSentence>,
    train_size: usize,
    shuffle_seed: Option<u64>,
) -> CorpusSplit {
    if let Some(seed) = shuffle_seed {
        let mut rng = oorandom::Rand64::new(u128::from(seed));
        for i in (1..sentences.len()).rev() {
            let j = rng.rand_range(0..(i as u64 + 1)) as usize;
            sentences.swap(i, j);
        }
    }

    let cut = train_size.min(sentences.len());
    let held_out = sentences.split_off(cut);
    debug!(
        train = sentences.len(),
        held_out = held_out.len(),
        shuffled = shuffle_seed.is_some(),
        "split corpus"
    );

    CorpusSplit {
        train: sentences,
        held_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<TaggedSentence> {
        (0..n)
            .map(|i| TaggedSentence::from_pairs([(format!("w{i}"), "NN")]))
            .collect()
    }

    fn first_words(sentences: &[TaggedSentence]) -> Vec<String> {
        sentences
            .iter()
            .filter_map(|s| s.words().next().map(String::from))
            .collect()
    }

    #[test]
    fn test_prefix_split() {
        let split = split_corpus(numbered(5), 3, None);
        assert_eq!(first_words(&split.train), ["w0", "w1", "w2"]);
        assert_eq!(first_words(&split.held_out), ["w3", "w4"]);
    }

    #[test]
    fn test_train_size_larger_than_corpus() {
        let split = split_corpus(numbered(2), 2000, None);
        assert_eq!(split.train.len(), 2);
        assert!(split.held_out.is_empty());
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = split_corpus(numbered(50), 40, Some(7));
        let b = split_corpus(numbered(50), 40, Some(7));
        assert_eq!(first_words(&a.train), first_words(&b.train));
        assert_eq!(a.held_out.len(), 10);

        let mut all = first_words(&a.train);
        all.extend(first_words(&a.held_out));
        all.sort();
        let mut expected = first_words(&numbered(50));
        expected.sort();
        assert_eq!(all, expected);
    }
}
