use std::fmt;

use serde::{Deserialize, Serialize};

/// A word paired with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedWord {
    /// The surface token.
    pub word: String,
    /// The part-of-speech tag (e.g. `NN`).
    pub tag: String,
}

impl TaggedWord {
    /// Creates a new `TaggedWord`.
    #[must_use]
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for TaggedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.word, self.tag)
    }
}

/// An ordered sequence of tagged words; the unit of supervised training data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaggedSentence {
    words: Vec<TaggedWord>,
}

impl TaggedSentence {
    /// Creates a sentence from already paired words.
    #[must_use]
    pub fn new(words: Vec<TaggedWord>) -> Self {
        Self { words }
    }

    /// Creates a sentence from `(word, tag)` pairs.
    pub fn from_pairs<I, W, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Appends a tagged word.
    pub fn push(&mut self, word: impl Into<String>, tag: impl Into<String>) {
        self.words.push(TaggedWord::new(word, tag));
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate the tagged words in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TaggedWord> {
        self.words.iter()
    }

    /// The words alone, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.word.as_str())
    }

    /// The tags alone, in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.tag.as_str())
    }

    /// Consumes the sentence, returning the tagged words.
    #[must_use]
    pub fn into_inner(self) -> Vec<TaggedWord> {
        self.words
    }
}

impl<W: Into<String>, T: Into<String>> FromIterator<(W, T)> for TaggedSentence {
    fn from_iter<I: IntoIterator<Item = (W, T)>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|(w, t)| TaggedWord::new(w, t))
                .collect(),
        }
    }
}

impl From<Vec<TaggedWord>> for TaggedSentence {
    fn from(words: Vec<TaggedWord>) -> Self {
        Self { words }
    }
}

impl<'a> IntoIterator for &'a TaggedSentence {
    type Item = &'a TaggedWord;
    type IntoIter = std::slice::Iter<'a, TaggedWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl fmt::Display for TaggedSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
