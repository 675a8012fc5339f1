//! Train-or-load session: reuse a stored model when one is usable, otherwise
//! estimate a fresh one from the configured corpus and store it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use hmmpos_core::store::DEFAULT_MODEL_FILE;
use hmmpos_core::{Estimator, EstimatorConfig, HmmModel, ModelStore, TaggedSentence};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{CorpusFormat, load_corpus};
use crate::split::split_corpus;

/// Default number of training sentences.
pub const DEFAULT_TRAIN_SIZE: usize = 2000;

/// Default location of the stored model.
pub fn default_model_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hmmpos")
        .join(DEFAULT_MODEL_FILE)
}

/// Configuration for a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Tagged corpus to train from; only read when no stored model is used.
    pub corpus: Option<PathBuf>,
    /// Corpus format; detected from the file name when unset.
    pub format: Option<CorpusFormat>,
    /// Number of sentences used for training.
    pub train_size: usize,
    /// Ignore any stored model and retrain.
    pub retrain: bool,
    /// Where the model is stored.
    pub model_path: PathBuf,
    /// Estimator settings.
    pub estimator: EstimatorConfig,
    /// Shuffle the corpus with this seed before taking the training portion.
    pub shuffle_seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            format: None,
            train_size: DEFAULT_TRAIN_SIZE,
            retrain: false,
            model_path: default_model_path(),
            estimator: EstimatorConfig::default(),
            shuffle_seed: None,
        }
    }
}

impl TrainingConfig {
    /// Create a new training configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus = Some(path.into());
        self
    }

    /// Set the corpus format; `None` detects it from the file name.
    pub fn with_format(mut self, format: Option<CorpusFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_train_size(mut self, train_size: usize) -> Self {
        self.train_size = train_size;
        self
    }

    pub fn with_retrain(mut self, retrain: bool) -> Self {
        self.retrain = retrain;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }
}

/// What a session produced.
#[derive(Debug, Clone)]
pub enum TrainingOutcome {
    /// A usable model was already stored.
    Loaded(HmmModel),
    /// A new model was estimated and stored.
    Trained {
        model: HmmModel,
        /// Corpus sentences not used for training.
        held_out: Vec<TaggedSentence>,
    },
}

impl TrainingOutcome {
    pub fn model(&self) -> &HmmModel {
        match self {
            Self::Loaded(model) | Self::Trained { model, .. } => model,
        }
    }

    pub fn into_model(self) -> HmmModel {
        match self {
            Self::Loaded(model) | Self::Trained { model, .. } => model,
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self, Self::Trained { .. })
    }

    pub fn held_out(&self) -> &[TaggedSentence] {
        match self {
            Self::Loaded(_) => &[],
            Self::Trained { held_out, .. } => held_out,
        }
    }
}

/// Load the stored model, or train and store a new one.
///
/// A missing or unusable stored model is not an error: the session falls
/// back to training. Training requires `config.corpus`.
pub fn train_or_load(config: &TrainingConfig) -> Result<TrainingOutcome> {
    let store = ModelStore::new(&config.model_path);

    if config.retrain {
        info!(path = %config.model_path.display(), "retraining requested");
    } else if let Some(model) = store.load_cached() {
        return Ok(TrainingOutcome::Loaded(model));
    }

    let Some(corpus) = config.corpus.as_deref() else {
        bail!(
            "no usable model at {} and no training corpus given",
            config.model_path.display()
        );
    };
    let (model, held_out) = train_from(corpus, config)?;

    store
        .save(&model)
        .with_context(|| format!("failed to save model to {}", config.model_path.display()))?;

    Ok(TrainingOutcome::Trained { model, held_out })
}

fn train_from(corpus: &Path, config: &TrainingConfig) -> Result<(HmmModel, Vec<TaggedSentence>)> {
    if config.train_size == 0 {
        bail!("train size must be at least 1");
    }

    let sentences = load_corpus(corpus, config.format)?;
    let split = split_corpus(sentences, config.train_size, config.shuffle_seed);

    let begin = Instant::now();
    let model = Estimator::new(config.estimator.clone())
        .estimate(&split.train)
        .with_context(|| format!("failed to estimate model from {}", corpus.display()))?;
    info!(
        sentences = split.train.len(),
        held_out = split.held_out.len(),
        elapsed_ms = begin.elapsed().as_millis() as u64,
        "training finished"
    );

    Ok((model, split.held_out))
}
