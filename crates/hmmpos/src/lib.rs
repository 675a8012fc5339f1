//! # hmmpos
//!
//! Part-of-speech tagging with a supervised Hidden Markov Model.
//!
//! ```rust
//! use hmmpos::{Estimator, PosTagger, TaggedSentence};
//!
//! let corpus = vec![
//!     TaggedSentence::from_pairs([("the", "DT"), ("dog", "NN"), ("runs", "VBZ")]),
//!     TaggedSentence::from_pairs([("a", "DT"), ("cat", "NN"), ("sleeps", "VBZ")]),
//! ];
//! let tagger = PosTagger::new(Estimator::default().estimate(&corpus).unwrap()).unwrap();
//!
//! let tagged = tagger.tag_text("the cat runs").unwrap();
//! println!("{}", tagger.describe(&tagged));
//! ```

pub use hmmpos_core::*;

/// Corpus loading, training sessions and evaluation.
pub mod trainer {
    pub use hmmpos_trainer::*;
}

pub use hmmpos_trainer::{
    CorpusFormat, Evaluation, TrainingConfig, TrainingOutcome, evaluate, load_corpus,
    train_or_load,
};
