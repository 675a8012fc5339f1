use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Interned string table mapping symbols to dense indices.
///
/// Used for both the tagset and the word vocabulary. Tables built through
/// [`Vocabulary::from_symbols`] are kept in sorted order, which is the
/// canonical ordering the decoder uses to break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from arbitrary symbols, sorted and deduplicated.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = symbols.into_iter().map(Into::into).collect();
        Self::from(sorted.into_iter().collect::<Vec<_>>())
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the table holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Index of `symbol`, if present.
    #[must_use]
    pub fn id(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Symbol stored at `id`, if in range.
    #[must_use]
    pub fn symbol(&self, id: usize) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    /// Returns `true` if `symbol` is in the table.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Iterate symbols in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Returns `true` if every symbol maps back to its own position.
    ///
    /// A table deserialized from a list with repeated entries fails this.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.symbols.len()
            && self
                .symbols
                .iter()
                .enumerate()
                .all(|(i, s)| self.index.get(s) == Some(&i))
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(symbols: Vec<String>) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self { symbols, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.symbols
    }
}
