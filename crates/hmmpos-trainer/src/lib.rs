//! # hmmpos Trainer
//!
//! Everything around the estimator that touches files: tagged-corpus
//! readers, train/held-out splitting, the train-or-load session backed by a
//! [`ModelStore`](hmmpos_core::ModelStore), and tagging accuracy reports.

pub mod data;
pub mod evaluation;
pub mod split;
pub mod trainer;

pub use data::{CorpusFormat, load_corpus, read_corpus};
pub use evaluation::{Evaluation, LabelMeasure, evaluate};
pub use split::{CorpusSplit, split_corpus};
pub use trainer::{
    DEFAULT_TRAIN_SIZE, TrainingConfig, TrainingOutcome, default_model_path, train_or_load,
};
