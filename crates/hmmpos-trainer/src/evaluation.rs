//! Tagging accuracy against a gold-standard corpus.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::iter::zip;

use hmmpos_core::{HmmModel, Result, TaggedSentence, ViterbiDecoder};

/// Per-tag counts and scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /// Number of times the tag was predicted.
    pub num_prediction: usize,
    /// Number of occurrences in the gold standard.
    pub num_observation: usize,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl LabelMeasure {
    fn finish(&mut self) {
        self.precision = ratio(self.num_correct, self.num_prediction);
        self.recall = ratio(self.num_correct, self.num_observation);
        self.fmeasure = if self.precision + self.recall > 0.0 {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        } else {
            0.0
        };
    }
}

/// Accumulated comparison of predicted and reference tag sequences.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    labels: BTreeMap<String, LabelMeasure>,
    item_correct: usize,
    item_total: usize,
    sequence_correct: usize,
    sequence_total: usize,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sentence. Extra items in the longer sequence are ignored.
    pub fn accumulate<R, P>(&mut self, reference: &[R], prediction: &[P])
    where
        R: AsRef<str>,
        P: AsRef<str>,
    {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.labels.entry(r.to_string()).or_default().num_observation += 1;
            self.labels.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.labels.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total += 1;
        }
        self.item_correct += matched;

        if matched == reference.len() && reference.len() == prediction.len() {
            self.sequence_correct += 1;
        }
        self.sequence_total += 1;

        for measure in self.labels.values_mut() {
            measure.finish();
        }
    }

    /// Per-tag measures in tag order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &LabelMeasure)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn label(&self, tag: &str) -> Option<&LabelMeasure> {
        self.labels.get(tag)
    }

    pub fn item_accuracy(&self) -> f64 {
        ratio(self.item_correct, self.item_total)
    }

    pub fn sequence_accuracy(&self) -> f64 {
        ratio(self.sequence_correct, self.sequence_total)
    }

    pub fn num_items(&self) -> usize {
        self.item_total
    }

    pub fn num_sequences(&self) -> usize {
        self.sequence_total
    }

    /// Macro-averaged (precision, recall, F1) over tags seen in the gold
    /// standard.
    pub fn macro_average(&self) -> (f64, f64, f64) {
        let observed: Vec<_> = self
            .labels
            .values()
            .filter(|m| m.num_observation > 0)
            .collect();
        if observed.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = observed.len() as f64;
        let sum = |f: fn(&LabelMeasure) -> f64| observed.iter().map(|m| f(m)).sum::<f64>() / n;
        (
            sum(|m| m.precision),
            sum(|m| m.recall),
            sum(|m| m.fmeasure),
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Performance by tag (#match, #model, #ref) (precision, recall, F1):"
        )?;
        for (tag, m) in &self.labels {
            if m.num_observation == 0 {
                writeln!(
                    f,
                    "\t{tag}: ({}, {}, {}) (******, ******, ******)",
                    m.num_correct, m.num_prediction, m.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{tag}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    m.num_correct, m.num_prediction, m.num_observation, m.precision, m.recall,
                    m.fmeasure
                )?;
            }
        }
        let (p, r, f1) = self.macro_average();
        writeln!(f, "Macro-average precision, recall, F1: ({p:.4}, {r:.4}, {f1:.4})")?;
        writeln!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.item_correct,
            self.item_total,
            self.item_accuracy()
        )?;
        write!(
            f,
            "Sequence accuracy: {}/{} => {:.4}",
            self.sequence_correct,
            self.sequence_total,
            self.sequence_accuracy()
        )
    }
}

/// Tag every sentence's words with `model` and score against its gold tags.
pub fn evaluate(model: &HmmModel, sentences: &[TaggedSentence]) -> Result<Evaluation> {
    let decoder = ViterbiDecoder::new(model)?;
    let mut eval = Evaluation::new();
    for sentence in sentences.iter().filter(|s| !s.is_empty()) {
        let words: Vec<&str> = sentence.words().collect();
        let gold: Vec<&str> = sentence.tags().collect();
        let predicted: Vec<String> = decoder.tag(&words)?.into_iter().map(|t| t.tag).collect();
        eval.accumulate(&gold, &predicted);
    }
    Ok(eval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut eval = Evaluation::new();
        eval.accumulate(&["DT", "NN", "VBZ"], &["DT", "NN", "VBZ"]);
        eval.accumulate(&["DT", "NN"], &["DT", "VBZ"]);

        assert_eq!(eval.num_items(), 5);
        assert_eq!(eval.num_sequences(), 2);
        assert!((eval.item_accuracy() - 0.8).abs() < 1e-12);
        assert!((eval.sequence_accuracy() - 0.5).abs() < 1e-12);

        let nn = eval.label("NN").unwrap();
        assert_eq!((nn.num_correct, nn.num_prediction, nn.num_observation), (1, 1, 2));
        assert!((nn.precision - 1.0).abs() < 1e-12);
        assert!((nn.recall - 0.5).abs() < 1e-12);

        let vbz = eval.label("VBZ").unwrap();
        assert!((vbz.precision - 0.5).abs() < 1e-12);
        assert!((vbz.recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_evaluation() {
        let eval = Evaluation::new();
        assert_eq!(eval.item_accuracy(), 0.0);
        assert_eq!(eval.macro_average(), (0.0, 0.0, 0.0));
        assert!(eval.to_string().contains("Item accuracy: 0/0"));
    }

    #[test]
    fn test_report_lists_prediction_only_tags() {
        let mut eval = Evaluation::new();
        eval.accumulate(&["NN"], &["JJ"]);
        let report = eval.to_string();
        assert!(report.contains("\tJJ: (0, 1, 0) (******, ******, ******)"));
        assert!(report.contains("\tNN: (0, 0, 1) (0.0000, 0.0000, 0.0000)"));
    }
}
