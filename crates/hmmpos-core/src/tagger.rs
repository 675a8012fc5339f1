//! # Tagging Pipeline
//!
//! Raw text in, tagged words out: tokenize, decode against the current model,
//! and render with human-readable labels.

use std::sync::Arc;

use tracing::debug;

use crate::error::{HmmError, Result};
use crate::hmm::HmmModel;
use crate::shared::SharedModel;
use crate::text::{TagLabels, Tokenizer};
use crate::types::TaggedWord;

/// Tokenizer, model and label table bundled for end-to-end tagging.
#[derive(Debug)]
pub struct PosTagger {
    tokenizer: Tokenizer,
    model: SharedModel,
    labels: TagLabels,
}

impl PosTagger {
    /// Create a tagger over `model` with the Penn label table.
    pub fn new(model: HmmModel) -> Result<Self> {
        Self::from_shared(SharedModel::new(model))
    }

    pub fn from_shared(model: SharedModel) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            model,
            labels: TagLabels::default(),
        })
    }

    /// Replace the label table.
    #[must_use]
    pub fn with_labels(mut self, labels: TagLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn model(&self) -> Arc<HmmModel> {
        self.model.current()
    }

    pub fn labels(&self) -> &TagLabels {
        &self.labels
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Swap in a retrained model; returns the previous one.
    pub fn replace_model(&self, model: HmmModel) -> Arc<HmmModel> {
        self.model.replace(model)
    }

    /// Tokenize `text` and tag the tokens.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::InvalidInput` if `text` contains no tokens.
    ///
    /// # Examples
    /// ```
    /// use hmmpos_core::{Estimator, PosTagger, TaggedSentence};
    ///
    /// let corpus = vec![
    ///     TaggedSentence::from_pairs([("The", "DT"), ("dog", "NN"), ("barks", "VBZ"), (".", ".")]),
    /// ];
    /// let model = Estimator::default().estimate(&corpus).unwrap();
    /// let tagger = PosTagger::new(model).unwrap();
    ///
    /// let tagged = tagger.tag_text("The dog barks.").unwrap();
    /// assert_eq!(tagged.len(), 4);
    /// assert_eq!(tagged[3].tag, ".");
    /// ```
    pub fn tag_text(&self, text: &str) -> Result<Vec<TaggedWord>> {
        let words = self.tokenizer.words(text);
        if words.is_empty() {
            return Err(HmmError::InvalidInput("text contains no tokens".into()));
        }
        debug!(tokens = words.len(), "tokenized input");
        self.tag_tokens(&words)
    }

    /// Tag pre-tokenized input.
    pub fn tag_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<TaggedWord>> {
        self.model.tag(tokens)
    }

    /// Render tagged words with expanded labels, one per line.
    pub fn describe(&self, tagged: &[TaggedWord]) -> String {
        self.labels.format_tagged(tagged)
    }
}
