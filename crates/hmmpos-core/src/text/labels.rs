//! Human-readable names for Penn Treebank tags.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::types::TaggedWord;

/// The 36 Penn Treebank word-level tags and their descriptions.
pub const PENN_TAG_LABELS: &[(&str, &str)] = &[
    ("CC", "Coordinating conjunction"),
    ("CD", "Cardinal number"),
    ("DT", "Determiner"),
    ("EX", "Existential there"),
    ("FW", "Foreign word"),
    ("IN", "Preposition/Subordinating conjunction"),
    ("JJ", "Adjective"),
    ("JJR", "Adjective, comparative"),
    ("JJS", "Adjective, superlative"),
    ("LS", "List item marker"),
    ("MD", "Modal"),
    ("NN", "Noun, singular or mass"),
    ("NNS", "Noun, plural"),
    ("NNP", "Proper noun, singular"),
    ("NNPS", "Proper noun, plural"),
    ("PDT", "Predeterminer"),
    ("POS", "Possessive ending"),
    ("PRP", "Personal pronoun"),
    ("PRP$", "Possessive pronoun"),
    ("RB", "Adverb"),
    ("RBR", "Adverb, comparative"),
    ("RBS", "Adverb, superlative"),
    ("RP", "Particle"),
    ("SYM", "Symbol"),
    ("TO", "to"),
    ("UH", "Interjection"),
    ("VB", "Verb, base form"),
    ("VBD", "Verb, past tense"),
    ("VBG", "Verb, gerund/present participle"),
    ("VBN", "Verb, past participle"),
    ("VBP", "Verb, non-3rd person singular present"),
    ("VBZ", "Verb, 3rd person singular present"),
    ("WDT", "Wh-determiner"),
    ("WP", "Wh-pronoun"),
    ("WP$", "Possessive wh-pronoun"),
    ("WRB", "Wh-adverb"),
];

/// Lookup table from tag to description.
///
/// Tags without an entry (punctuation tags, corpus-specific tags) expand to
/// themselves.
#[derive(Debug, Clone)]
pub struct TagLabels {
    labels: HashMap<String, String>,
}

impl Default for TagLabels {
    fn default() -> Self {
        Self::penn()
    }
}

impl TagLabels {
    /// The Penn Treebank table.
    pub fn penn() -> Self {
        Self {
            labels: PENN_TAG_LABELS
                .iter()
                .map(|&(tag, label)| (tag.to_string(), label.to_string()))
                .collect(),
        }
    }

    /// An empty table: every tag expands to itself.
    pub fn empty() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }

    /// Add or replace a label.
    #[must_use]
    pub fn with_label(mut self, tag: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(tag.into(), label.into());
        self
    }

    /// The description for `tag`, or `tag` itself when none is known.
    pub fn expand<'a>(&'a self, tag: &'a str) -> &'a str {
        self.labels.get(tag).map_or(tag, String::as_str)
    }

    /// Number of labelled tags.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no tag has a label.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One line per word: the word left-aligned to 15 columns, an arrow,
    /// then the expanded tag.
    pub fn format_tagged(&self, tagged: &[TaggedWord]) -> String {
        let mut out = String::new();
        for (i, tw) in tagged.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{:<15} → {}", tw.word, self.expand(&tw.tag));
        }
        out
    }
}
