//! # Viterbi Decoding for HMM Tagging
//!
//! Implements the Viterbi algorithm in log space for finding the most likely
//! tag sequence given a parameter set and a token sequence.

use tracing::debug;

use crate::error::{HmmError, Result};
use crate::hmm::model::HmmModel;
use crate::types::TaggedWord;

/// Viterbi decoder bound to one immutable model.
///
/// Construction validates the model's structure and caches the log initial
/// and transition tables; emission logs are taken per lattice cell. Each
/// decode call allocates its own lattice, so one decoder can serve many
/// threads at once.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder<'m> {
    model: &'m HmmModel,
    log_initial: Vec<f64>,
    log_transition: Vec<f64>,
}

/// Path score and backpointer for one lattice cell.
#[derive(Debug, Clone, Copy)]
struct PathState {
    score: f64,
    prev_tag: usize,
}

impl<'m> ViterbiDecoder<'m> {
    /// Create a decoder for `model`.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::ModelError` if the model is missing a table or its
    /// dimensions are inconsistent.
    pub fn new(model: &'m HmmModel) -> Result<Self> {
        model.check_structure()?;

        let n = model.num_tags();
        let log_initial = model.initial().iter().map(|p| p.ln()).collect();
        let log_transition = (0..n)
            .flat_map(|from| model.transition_row(from).iter().map(|p| p.ln()))
            .collect();

        Ok(Self {
            model,
            log_initial,
            log_transition,
        })
    }

    /// The model this decoder reads from.
    pub fn model(&self) -> &'m HmmModel {
        self.model
    }

    /// Decode the most probable tag indices for `tokens`.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::InvalidInput` if `tokens` is empty.
    pub fn decode<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        self.decode_with_score(tokens).map(|(path, _)| path)
    }

    /// Decode the most probable tag indices together with the path's joint
    /// log-probability log P(tokens, tags).
    pub fn decode_with_score<S: AsRef<str>>(&self, tokens: &[S]) -> Result<(Vec<usize>, f64)> {
        let seq_len = tokens.len();
        if seq_len == 0 {
            return Err(HmmError::InvalidInput("token sequence is empty".into()));
        }

        let num_tags = self.model.num_tags();
        let observations: Vec<usize> = tokens
            .iter()
            .map(|t| self.model.word_index(t.as_ref()))
            .collect();

        // Initialize DP table: [seq_len][num_tags]
        let mut dp: Vec<Vec<PathState>> = vec![
            vec![
                PathState {
                    score: f64::NEG_INFINITY,
                    prev_tag: 0,
                };
                num_tags
            ];
            seq_len
        ];

        // Initialize first position
        for tag in 0..num_tags {
            dp[0][tag].score = self.log_initial[tag] + self.log_emission(tag, observations[0]);
        }

        // Forward pass
        for pos in 1..seq_len {
            let word = observations[pos];
            for curr_tag in 0..num_tags {
                let mut best_score = f64::NEG_INFINITY;
                let mut best_prev = None;

                for prev_tag in 0..num_tags {
                    let score = dp[pos - 1][prev_tag].score
                        + self.log_transition[prev_tag * num_tags + curr_tag];

                    // Strict comparison keeps the earliest tag on ties.
                    if best_prev.is_none() || score > best_score {
                        best_score = score;
                        best_prev = Some(prev_tag);
                    }
                }

                dp[pos][curr_tag] = PathState {
                    score: best_score + self.log_emission(curr_tag, word),
                    prev_tag: best_prev.unwrap_or(0),
                };
            }
        }

        // Find best final tag
        let last = &dp[seq_len - 1];
        let mut best_final_tag = 0;
        let mut best_final_score = last[0].score;
        for (tag, state) in last.iter().enumerate().skip(1) {
            if state.score > best_final_score {
                best_final_score = state.score;
                best_final_tag = tag;
            }
        }

        // Backtrack
        let mut path = vec![0usize; seq_len];
        path[seq_len - 1] = best_final_tag;
        for pos in (1..seq_len).rev() {
            path[pos - 1] = dp[pos][path[pos]].prev_tag;
        }

        debug!(
            tokens = seq_len,
            unknown = observations
                .iter()
                .filter(|&&w| w == self.model.unknown_index())
                .count(),
            log_prob = best_final_score,
            "decoded sentence"
        );

        Ok((path, best_final_score))
    }

    /// Decode and pair each token with its tag name.
    ///
    /// # Examples
    /// ```
    /// use hmmpos_core::{Estimator, TaggedSentence, ViterbiDecoder};
    ///
    /// let corpus = vec![
    ///     TaggedSentence::from_pairs([("the", "DT"), ("dog", "NN"), ("runs", "VBZ")]),
    ///     TaggedSentence::from_pairs([("a", "DT"), ("cat", "NN"), ("sleeps", "VBZ")]),
    /// ];
    /// let model = Estimator::default().estimate(&corpus).unwrap();
    /// let decoder = ViterbiDecoder::new(&model).unwrap();
    ///
    /// let tagged = decoder.tag(&["the", "cat", "runs"]).unwrap();
    /// let tags: Vec<_> = tagged.iter().map(|t| t.tag.as_str()).collect();
    /// assert_eq!(tags, ["DT", "NN", "VBZ"]);
    /// ```
    pub fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<TaggedWord>> {
        let path = self.decode(tokens)?;
        let tagset = self.model.tagset();

        tokens
            .iter()
            .zip(path)
            .map(|(token, tag)| {
                let name = tagset.symbol(tag).ok_or_else(|| {
                    HmmError::ModelError(format!("decoded tag index {tag} outside tagset"))
                })?;
                Ok(TaggedWord::new(token.as_ref(), name))
            })
            .collect()
    }

    /// Joint log-probability log P(tokens, tags) of a given tag path.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::InvalidInput` if the sequences are empty, differ in
    /// length, or a tag index is outside the tagset.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S], tags: &[usize]) -> Result<f64> {
        if tokens.is_empty() {
            return Err(HmmError::InvalidInput("token sequence is empty".into()));
        }
        if tokens.len() != tags.len() {
            return Err(HmmError::InvalidInput(format!(
                "{} tokens but {} tags",
                tokens.len(),
                tags.len()
            )));
        }
        let num_tags = self.model.num_tags();
        if let Some(bad) = tags.iter().find(|&&t| t >= num_tags) {
            return Err(HmmError::InvalidInput(format!(
                "tag index {bad} outside tagset of {num_tags}"
            )));
        }

        let mut prev = tags[0];
        let mut score = self.log_initial[prev]
            + self.log_emission(prev, self.model.word_index(tokens[0].as_ref()));
        for (token, &tag) in tokens.iter().zip(tags).skip(1) {
            score += self.log_transition[prev * num_tags + tag];
            score += self.log_emission(tag, self.model.word_index(token.as_ref()));
            prev = tag;
        }
        Ok(score)
    }

    #[inline]
    fn log_emission(&self, tag: usize, word: usize) -> f64 {
        self.model.emission_prob(tag, word).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vocabulary;

    /// Two-state weather model over three observations.
    fn weather_model() -> HmmModel {
        let tags = Vocabulary::from_symbols(["Rainy", "Sunny"]);
        let words = Vocabulary::from_symbols(["clean", "shop", "walk"]);
        HmmModel::from_parts(
            tags,
            words,
            vec![0.6, 0.4],
            vec![0.7, 0.3, 0.4, 0.6],
            // columns: clean, shop, walk, <unk>
            vec![0.45, 0.35, 0.1, 0.1, 0.1, 0.3, 0.5, 0.1],
        )
        .unwrap()
    }

    fn brute_force_best(decoder: &ViterbiDecoder<'_>, tokens: &[&str]) -> (Vec<usize>, f64) {
        let n = decoder.model().num_tags();
        let len = tokens.len();
        let mut best = (Vec::new(), f64::NEG_INFINITY);
        for code in 0..n.pow(len as u32) {
            let mut path = Vec::with_capacity(len);
            let mut c = code;
            for _ in 0..len {
                path.push(c % n);
                c /= n;
            }
            let s = decoder.score(tokens, &path).unwrap();
            if s > best.1 {
                best = (path, s);
            }
        }
        best
    }

    #[test]
    fn test_viterbi_matches_exhaustive_search() {
        let model = weather_model();
        let decoder = ViterbiDecoder::new(&model).unwrap();

        for tokens in [
            vec!["walk"],
            vec!["walk", "shop", "clean"],
            vec!["clean", "clean", "walk", "shop", "umbrella"],
        ] {
            let (path, score) = decoder.decode_with_score(&tokens).unwrap();
            let (expected_path, expected_score) = brute_force_best(&decoder, &tokens);
            assert_eq!(path, expected_path, "tokens: {tokens:?}");
            assert!((score - expected_score).abs() < 1e-9);
        }
    }

    #[test]
    fn test_viterbi_empty() {
        let model = weather_model();
        let decoder = ViterbiDecoder::new(&model).unwrap();
        let tokens: Vec<&str> = vec![];
        assert!(matches!(
            decoder.decode(&tokens),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_word_uses_sentinel() {
        let model = weather_model();
        let decoder = ViterbiDecoder::new(&model).unwrap();
        let tagged = decoder.tag(&["walk", "umbrella"]).unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[1].word, "umbrella");
    }

    #[test]
    fn test_ties_pick_first_tag() {
        let tags = Vocabulary::from_symbols(["A", "B", "C"]);
        let words = Vocabulary::from_symbols(["x"]);
        let third = 1.0 / 3.0;
        let model = HmmModel::from_parts(
            tags,
            words,
            vec![third; 3],
            vec![third; 9],
            vec![0.5; 6],
        )
        .unwrap();
        let decoder = ViterbiDecoder::new(&model).unwrap();
        assert_eq!(decoder.decode(&["x", "x", "x"]).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_zero_probability_transitions_still_decode() {
        let tags = Vocabulary::from_symbols(["A", "B"]);
        let words = Vocabulary::from_symbols(["x", "y"]);
        // A never follows A; B never starts.
        let model = HmmModel::from_parts(
            tags,
            words,
            vec![1.0, 0.0],
            vec![0.0, 1.0, 0.5, 0.5],
            vec![0.8, 0.1, 0.1, 0.1, 0.8, 0.1],
        )
        .unwrap();
        let decoder = ViterbiDecoder::new(&model).unwrap();
        assert_eq!(decoder.decode(&["x", "x", "y"]).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_score_rejects_mismatched_lengths() {
        let model = weather_model();
        let decoder = ViterbiDecoder::new(&model).unwrap();
        assert!(decoder.score(&["walk", "shop"], &[0]).is_err());
        assert!(decoder.score(&["walk"], &[5]).is_err());
    }

    #[test]
    fn test_decoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ViterbiDecoder<'static>>();
    }
}
