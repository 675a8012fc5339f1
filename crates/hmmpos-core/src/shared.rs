//! Copy-on-retrain model handle.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::Result;
use crate::hmm::HmmModel;
use crate::types::TaggedWord;

/// A swappable reference to the current model.
///
/// Readers take an `Arc` snapshot with [`current`](Self::current) and decode
/// against it without holding the lock. Retraining builds a fresh model and
/// installs it with [`replace`](Self::replace); decodes already in flight
/// keep the snapshot they started with.
#[derive(Debug)]
pub struct SharedModel {
    inner: RwLock<Arc<HmmModel>>,
}

impl SharedModel {
    pub fn new(model: HmmModel) -> Self {
        Self::from_arc(Arc::new(model))
    }

    pub fn from_arc(model: Arc<HmmModel>) -> Self {
        Self {
            inner: RwLock::new(model),
        }
    }

    /// Snapshot of the current model.
    pub fn current(&self) -> Arc<HmmModel> {
        // The guarded value is a plain Arc, so a poisoned lock still holds a
        // valid model.
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Installs `model` for subsequent readers and returns the previous one.
    pub fn replace(&self, model: HmmModel) -> Arc<HmmModel> {
        let new = Arc::new(model);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let old = std::mem::replace(&mut *guard, new);
        info!(
            tags = guard.num_tags(),
            vocab = guard.vocab_size(),
            "installed new model"
        );
        old
    }

    /// Tags `tokens` against the current snapshot.
    pub fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<TaggedWord>> {
        self.current().tag(tokens)
    }
}

impl From<HmmModel> for SharedModel {
    fn from(model: HmmModel) -> Self {
        Self::new(model)
    }
}
