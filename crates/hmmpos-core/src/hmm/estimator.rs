//! # Supervised Parameter Estimation
//!
//! Counts initial tags, tag bigrams, and (tag, word) pairs over a tagged
//! corpus and normalizes them into an [`HmmModel`] with Lidstone smoothing.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HmmError, Result};
use crate::hmm::model::HmmModel;
use crate::hmm::smoothing::lidstone;
use crate::types::{TaggedSentence, Vocabulary};

/// Default Lidstone constant for all three tables.
pub const DEFAULT_SMOOTHING: f64 = 0.1;

/// Configuration for the parameter estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Add-γ constant for emission rows; must be positive so that unseen
    /// words and the unknown sentinel keep non-zero probability.
    pub emission_smoothing: f64,
    /// Add-γ constant for the initial and transition rows. Zero gives plain
    /// relative frequencies.
    pub transition_smoothing: f64,
    /// Words seen fewer times than this are folded into the unknown sentinel.
    pub unknown_word_threshold: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            emission_smoothing: DEFAULT_SMOOTHING,
            transition_smoothing: DEFAULT_SMOOTHING,
            unknown_word_threshold: 1,
        }
    }
}

impl EstimatorConfig {
    /// Create a new estimator configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the emission smoothing constant.
    pub fn with_emission_smoothing(mut self, gamma: f64) -> Self {
        self.emission_smoothing = gamma;
        self
    }

    /// Set the initial / transition smoothing constant.
    pub fn with_transition_smoothing(mut self, gamma: f64) -> Self {
        self.transition_smoothing = gamma;
        self
    }

    /// Set the minimum word frequency kept in the vocabulary.
    pub fn with_unknown_word_threshold(mut self, threshold: usize) -> Self {
        self.unknown_word_threshold = threshold;
        self
    }

    /// Rejects settings that would break the model invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.emission_smoothing.is_finite() && self.emission_smoothing > 0.0) {
            return Err(HmmError::InvalidInput(format!(
                "emission smoothing must be positive, got {}",
                self.emission_smoothing
            )));
        }
        if !(self.transition_smoothing.is_finite() && self.transition_smoothing >= 0.0) {
            return Err(HmmError::InvalidInput(format!(
                "transition smoothing must be non-negative, got {}",
                self.transition_smoothing
            )));
        }
        Ok(())
    }
}

/// Raw counts gathered in one pass, keyed by first-seen ids.
#[derive(Debug, Default)]
struct Counts {
    tag_ids: HashMap<String, usize>,
    tags: Vec<String>,
    word_ids: HashMap<String, usize>,
    words: Vec<String>,
    word_freq: Vec<u64>,
    initial: HashMap<usize, u64>,
    transition: HashMap<(usize, usize), u64>,
    emission: HashMap<(usize, usize), u64>,
    sentences: usize,
    tokens: usize,
}

impl Counts {
    fn intern_tag(&mut self, tag: &str) -> usize {
        if let Some(&id) = self.tag_ids.get(tag) {
            return id;
        }
        let id = self.tags.len();
        self.tag_ids.insert(tag.to_string(), id);
        self.tags.push(tag.to_string());
        id
    }

    fn intern_word(&mut self, word: &str) -> usize {
        if let Some(&id) = self.word_ids.get(word) {
            return id;
        }
        let id = self.words.len();
        self.word_ids.insert(word.to_string(), id);
        self.words.push(word.to_string());
        self.word_freq.push(0);
        id
    }

    fn add_sentence(&mut self, sentence: &TaggedSentence) {
        let mut prev: Option<usize> = None;
        for tw in sentence {
            let tag = self.intern_tag(&tw.tag);
            let word = self.intern_word(&tw.word);

            match prev {
                None => *self.initial.entry(tag).or_default() += 1,
                Some(p) => *self.transition.entry((p, tag)).or_default() += 1,
            }
            *self.emission.entry((tag, word)).or_default() += 1;
            self.word_freq[word] += 1;
            prev = Some(tag);
        }
        self.sentences += 1;
        self.tokens += sentence.len();
    }
}

/// Supervised HMM parameter estimator.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimates a model from a slice of tagged sentences.
    ///
    /// # Errors
    ///
    /// * `HmmError::InvalidInput` if the corpus is empty, a sentence has no
    ///   tokens, or the configuration is invalid.
    /// * `HmmError::NumericDegeneracy` if normalization produced a row that
    ///   does not sum to one.
    ///
    /// # Examples
    /// ```
    /// use hmmpos_core::{Estimator, TaggedSentence};
    ///
    /// let corpus = vec![
    ///     TaggedSentence::from_pairs([("the", "DT"), ("dog", "NN"), ("runs", "VBZ")]),
    ///     TaggedSentence::from_pairs([("a", "DT"), ("cat", "NN"), ("sleeps", "VBZ")]),
    /// ];
    /// let model = Estimator::default().estimate(&corpus).unwrap();
    /// assert_eq!(model.num_tags(), 3);
    /// assert_eq!(model.vocab_size(), 6);
    /// ```
    pub fn estimate(&self, corpus: &[TaggedSentence]) -> Result<HmmModel> {
        self.estimate_iter(corpus)
    }

    /// Estimates a model from any sequence of sentences in a single pass.
    pub fn estimate_iter<'a, I>(&self, corpus: I) -> Result<HmmModel>
    where
        I: IntoIterator<Item = &'a TaggedSentence>,
    {
        self.config.validate()?;
        let begin = Instant::now();

        let mut counts = Counts::default();
        for (idx, sentence) in corpus.into_iter().enumerate() {
            if sentence.is_empty() {
                return Err(HmmError::InvalidInput(format!(
                    "training sentence {idx} has no tokens"
                )));
            }
            counts.add_sentence(sentence);
        }
        if counts.sentences == 0 {
            return Err(HmmError::InvalidInput("training corpus is empty".into()));
        }

        let model = self.normalize(&counts)?;
        info!(
            sentences = counts.sentences,
            tokens = counts.tokens,
            tags = model.num_tags(),
            vocabulary = model.vocab_size(),
            elapsed = ?begin.elapsed(),
            "estimated HMM parameters"
        );
        Ok(model)
    }

    fn normalize(&self, counts: &Counts) -> Result<HmmModel> {
        let cfg = &self.config;
        debug!(
            emission_smoothing = cfg.emission_smoothing,
            transition_smoothing = cfg.transition_smoothing,
            unknown_word_threshold = cfg.unknown_word_threshold,
            "normalizing counts"
        );

        let tagset = Vocabulary::from_symbols(counts.tags.iter().cloned());
        let tag_map: Vec<usize> = counts
            .tags
            .iter()
            .map(|t| tagset.id(t).unwrap_or_default())
            .collect();

        let threshold = cfg.unknown_word_threshold as u64;
        let vocabulary = Vocabulary::from_symbols(
            counts
                .words
                .iter()
                .zip(&counts.word_freq)
                .filter(|&(_, &freq)| freq >= threshold)
                .map(|(w, _)| w.clone()),
        );
        let unknown = vocabulary.len();
        let word_map: Vec<usize> = counts
            .words
            .iter()
            .map(|w| vocabulary.id(w).unwrap_or(unknown))
            .collect();

        let n = tagset.len();
        let width = vocabulary.len() + 1;

        let mut initial_counts = vec![0u64; n];
        for (&tag, &c) in &counts.initial {
            initial_counts[tag_map[tag]] += c;
        }

        let mut transition_counts = vec![0u64; n * n];
        for (&(from, to), &c) in &counts.transition {
            transition_counts[tag_map[from] * n + tag_map[to]] += c;
        }

        let mut emission_counts = vec![0u64; n * width];
        for (&(tag, word), &c) in &counts.emission {
            emission_counts[tag_map[tag] * width + word_map[word]] += c;
        }

        let initial = lidstone(&initial_counts, cfg.transition_smoothing);
        let transition: Vec<f64> = transition_counts
            .chunks(n)
            .flat_map(|row| lidstone(row, cfg.transition_smoothing))
            .collect();
        let emission: Vec<f64> = emission_counts
            .chunks(width)
            .flat_map(|row| lidstone(row, cfg.emission_smoothing))
            .collect();

        HmmModel::from_parts(tagset, vocabulary, initial, transition, emission)
    }
}
