//! # HMM Parameter Set
//!
//! The immutable model shared by estimation and decoding: a tagset, a word
//! vocabulary, and the initial / transition / emission distributions.

use serde::{Deserialize, Serialize};

use crate::error::{HmmError, Result};
use crate::hmm::smoothing::{check_row, check_table};
use crate::hmm::viterbi::ViterbiDecoder;
use crate::types::{TaggedWord, Vocabulary};

/// A supervised HMM parameter set.
///
/// Tables are stored row-major in probability space:
///
/// * `initial[t]`: P(first tag = t)
/// * `transition[i * T + j]`: P(tag j | previous tag i)
/// * `emission[t * (V + 1) + w]`: P(word w | tag t), where column `V` is the
///   unknown-word sentinel
///
/// A model is never mutated after construction; share it by reference or
/// through `Arc` and build a new one to retrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmModel {
    #[serde(default)]
    tagset: Vocabulary,
    #[serde(default)]
    vocabulary: Vocabulary,
    #[serde(default)]
    initial: Vec<f64>,
    #[serde(default)]
    transition: Vec<f64>,
    #[serde(default)]
    emission: Vec<f64>,
}

impl HmmModel {
    /// Assembles a model from its parts after validating it.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::ModelError` if a table is missing or its dimensions
    /// disagree with the tagset / vocabulary, and `HmmError::NumericDegeneracy`
    /// if a row does not sum to one.
    pub fn from_parts(
        tagset: Vocabulary,
        vocabulary: Vocabulary,
        initial: Vec<f64>,
        transition: Vec<f64>,
        emission: Vec<f64>,
    ) -> Result<Self> {
        let model = Self {
            tagset,
            vocabulary,
            initial,
            transition,
            emission,
        };
        model.validate()?;
        Ok(model)
    }

    /// Full validation: structure first, then every distribution.
    pub fn validate(&self) -> Result<()> {
        self.check_structure()?;
        self.check_distributions()
    }

    /// Checks that every table is present and sized to the tagset and
    /// vocabulary, and that every value is a finite non-negative number.
    pub fn check_structure(&self) -> Result<()> {
        let n = self.tagset.len();
        let width = self.emission_width();

        if n == 0 {
            return Err(HmmError::ModelError("tagset is missing or empty".into()));
        }
        if !self.tagset.is_consistent() {
            return Err(HmmError::ModelError("tagset contains duplicate tags".into()));
        }
        if !self.vocabulary.is_consistent() {
            return Err(HmmError::ModelError(
                "vocabulary contains duplicate words".into(),
            ));
        }

        check_len("initial distribution", self.initial.len(), n)?;
        check_len("transition table", self.transition.len(), n * n)?;
        check_len("emission table", self.emission.len(), n * width)?;

        let tables = [
            ("initial distribution", &self.initial),
            ("transition table", &self.transition),
            ("emission table", &self.emission),
        ];
        for (name, values) in tables {
            if let Some(bad) = values.iter().find(|p| !p.is_finite() || **p < 0.0) {
                return Err(HmmError::ModelError(format!(
                    "{name} holds an invalid probability: {bad}"
                )));
            }
        }

        Ok(())
    }

    fn check_distributions(&self) -> Result<()> {
        check_row("initial", 0, &self.initial)?;
        check_table("transition", &self.transition, self.num_tags())?;
        check_table("emission", &self.emission, self.emission_width())
    }

    /// The tagset in canonical order.
    #[must_use]
    pub fn tagset(&self) -> &Vocabulary {
        &self.tagset
    }

    /// The training vocabulary (without the unknown sentinel).
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of tags.
    #[must_use]
    pub fn num_tags(&self) -> usize {
        self.tagset.len()
    }

    /// Number of known words.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Emission column reserved for words outside the vocabulary.
    #[must_use]
    pub fn unknown_index(&self) -> usize {
        self.vocabulary.len()
    }

    /// Width of an emission row: the vocabulary plus the unknown sentinel.
    #[must_use]
    pub fn emission_width(&self) -> usize {
        self.vocabulary.len() + 1
    }

    /// Emission column for `word`, falling back to the unknown sentinel.
    #[must_use]
    pub fn word_index(&self, word: &str) -> usize {
        self.vocabulary
            .id(word)
            .unwrap_or_else(|| self.unknown_index())
    }

    /// Returns `true` if `word` was kept in the training vocabulary.
    #[must_use]
    pub fn is_known(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    /// The initial distribution, indexed by tag.
    #[must_use]
    pub fn initial(&self) -> &[f64] {
        &self.initial
    }

    /// Transition row for predecessor tag `from`.
    #[must_use]
    pub fn transition_row(&self, from: usize) -> &[f64] {
        let n = self.num_tags();
        &self.transition[from * n..(from + 1) * n]
    }

    /// Emission row for tag `tag`, including the unknown column.
    #[must_use]
    pub fn emission_row(&self, tag: usize) -> &[f64] {
        let width = self.emission_width();
        &self.emission[tag * width..(tag + 1) * width]
    }

    /// P(next tag = `to` | tag = `from`).
    #[must_use]
    pub fn transition_prob(&self, from: usize, to: usize) -> f64 {
        self.transition[from * self.num_tags() + to]
    }

    /// P(word column `word` | tag `tag`).
    #[must_use]
    pub fn emission_prob(&self, tag: usize, word: usize) -> f64 {
        self.emission[tag * self.emission_width() + word]
    }

    /// P(`word` | `tag`) by name; `None` if `tag` is not in the tagset.
    ///
    /// Words outside the vocabulary get the unknown-sentinel probability.
    #[must_use]
    pub fn word_probability(&self, tag: &str, word: &str) -> Option<f64> {
        let t = self.tagset.id(tag)?;
        Some(self.emission_prob(t, self.word_index(word)))
    }

    /// Tags a token sequence with the most probable tag path.
    ///
    /// Shorthand for building a [`ViterbiDecoder`] and calling
    /// [`ViterbiDecoder::tag`].
    pub fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<TaggedWord>> {
        ViterbiDecoder::new(self)?.tag(tokens)
    }
}

fn check_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == 0 && expected > 0 {
        return Err(HmmError::ModelError(format!("{name} is missing")));
    }
    if actual != expected {
        return Err(HmmError::ModelError(format!(
            "{name} has {actual} entries, expected {expected}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_parts() -> (Vocabulary, Vocabulary, Vec<f64>, Vec<f64>, Vec<f64>) {
        let tags = Vocabulary::from_symbols(["A", "B"]);
        let words = Vocabulary::from_symbols(["x"]);
        let initial = vec![0.75, 0.25];
        let transition = vec![0.5, 0.5, 0.9, 0.1];
        let emission = vec![0.8, 0.2, 0.3, 0.7];
        (tags, words, initial, transition, emission)
    }

    #[test]
    fn from_parts_accepts_valid_model() {
        let (t, v, i, tr, e) = tiny_parts();
        let model = HmmModel::from_parts(t, v, i, tr, e).unwrap();
        assert_eq!(model.num_tags(), 2);
        assert_eq!(model.vocab_size(), 1);
        assert_eq!(model.unknown_index(), 1);
        assert_eq!(model.word_index("x"), 0);
        assert_eq!(model.word_index("y"), 1);
        assert_eq!(model.transition_prob(1, 0), 0.9);
        assert_eq!(model.emission_row(1), &[0.3, 0.7]);
        assert_eq!(model.word_probability("A", "zzz"), Some(0.2));
        assert_eq!(model.word_probability("C", "x"), None);
    }

    #[test]
    fn missing_table_is_model_error() {
        let (t, v, i, _, e) = tiny_parts();
        let err = HmmModel::from_parts(t, v, i, Vec::new(), e).unwrap_err();
        match err {
            HmmError::ModelError(msg) => assert!(msg.contains("transition table is missing")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn wrong_dimensions_are_model_error() {
        let (t, v, i, tr, _) = tiny_parts();
        let err = HmmModel::from_parts(t, v, i, tr, vec![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, HmmError::ModelError(_)));
    }

    #[test]
    fn negative_probability_is_model_error() {
        let (t, v, _, tr, e) = tiny_parts();
        let err = HmmModel::from_parts(t, v, vec![1.5, -0.5], tr, e).unwrap_err();
        assert!(matches!(err, HmmError::ModelError(_)));
    }

    #[test]
    fn unnormalized_row_is_degenerate() {
        let (t, v, i, _, e) = tiny_parts();
        let err = HmmModel::from_parts(t, v, i, vec![0.5, 0.5, 0.5, 0.1], e).unwrap_err();
        match err {
            HmmError::NumericDegeneracy { table, row, .. } => {
                assert_eq!(table, "transition");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn deserialized_model_without_emission_fails_validation() {
        let json = r#"{"tagset":["A"],"vocabulary":[],"initial":[1.0],"transition":[1.0]}"#;
        let model: HmmModel = serde_json::from_str(json).unwrap();
        assert!(matches!(model.validate(), Err(HmmError::ModelError(_))));
    }
}
