//! # hmmpos Core
//!
//! Supervised Hidden Markov Model part-of-speech tagging: Lidstone-smoothed
//! parameter estimation from a tagged corpus, log-space Viterbi decoding,
//! a Treebank-style tokenizer, and JSON model persistence.
//!
//! ## Quick Start
//!
//! ```rust
//! use hmmpos_core::{Estimator, TaggedSentence, ViterbiDecoder};
//!
//! let corpus = vec![
//!     TaggedSentence::from_pairs([("the", "DT"), ("dog", "NN"), ("runs", "VBZ")]),
//!     TaggedSentence::from_pairs([("a", "DT"), ("cat", "NN"), ("sleeps", "VBZ")]),
//! ];
//! let model = Estimator::default().estimate(&corpus).unwrap();
//! let decoder = ViterbiDecoder::new(&model).unwrap();
//!
//! let tagged = decoder.tag(&["the", "elephant", "sleeps"]).unwrap();
//! assert_eq!(tagged.len(), 3);
//! ```
pub mod error;
pub mod hmm;
pub mod shared;
pub mod store;
pub mod tagger;
pub mod text;
pub mod types;

// Re-export primary API
pub use error::{HmmError, Result};
pub use hmm::{Estimator, EstimatorConfig, HmmModel, ViterbiDecoder};
pub use shared::SharedModel;
pub use store::ModelStore;
pub use tagger::PosTagger;
pub use text::{TagLabels, Token, Tokenizer};
pub use types::{TaggedSentence, TaggedWord, Vocabulary};
