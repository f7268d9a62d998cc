//! Dictionary, letters pool and the set of words used in a session.
//!
//! All words are stored uppercase. Lookups normalize their argument, so callers
//! can pass raw player input.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use super::error::AssetError;

/// Normalized word set with prefix counting.
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    words: HashSet<String>,
    /// Same words as `words`, in load order, for counting scans
    ordered: Vec<String>,
}

impl DictionaryIndex {
    /// Empty dictionary. Nothing validates against it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from any list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for word in words {
            let upper = word.as_ref().to_uppercase();
            if index.words.insert(upper.clone()) {
                index.ordered.push(upper);
            }
        }
        index
    }

    /// Build from a word -> definition mapping. Definitions are ignored.
    pub fn from_definitions(definitions: &Map<String, Value>) -> Self {
        Self::from_words(definitions.keys())
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    /// Count words starting with `suffix` that have not been used yet.
    pub fn count_available(&self, suffix: &str, used: &WordsUsed) -> usize {
        let suffix = suffix.to_uppercase();
        self.ordered
            .iter()
            .filter(|w| w.starts_with(&suffix) && !used.contains_normalized(w))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

/// Fallback letters for seeding a turn. Never empty.
#[derive(Debug, Clone)]
pub struct LettersPool {
    letters: Vec<String>,
}

impl LettersPool {
    /// Build a pool from single-character entries.
    ///
    /// Surrounding whitespace is trimmed. Blank entries and entries of more than one
    /// character are skipped; a pool with nothing left cannot seed a turn and is
    /// rejected.
    pub fn new<I, S>(letters: I) -> Result<Self, AssetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let letters: Vec<String> = letters
            .into_iter()
            .map(Into::into)
            .filter_map(|entry| {
                let letter = entry.trim();
                match letter.chars().count() {
                    1 => Some(letter.to_string()),
                    0 => None,
                    _ => {
                        warn!(entry = %letter, "Skipping entry longer than one letter");
                        None
                    }
                }
            })
            .collect();
        if letters.is_empty() {
            return Err(AssetError::EmptyLetters);
        }
        Ok(Self { letters })
    }

    /// Letter at `index`, uppercased.
    pub fn get_upper(&self, index: usize) -> Option<String> {
        self.letters.get(index).map(|l| l.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.letters.iter().map(String::as_str)
    }
}

/// Words accepted in the current session.
///
/// Grows monotonically; only a session reset clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordsUsed {
    words: HashSet<String>,
}

impl WordsUsed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a word. Returns false if it was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        self.words.insert(word.to_uppercase())
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    fn contains_normalized(&self, upper: &str) -> bool {
        self.words.contains(upper)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.words.clear();
    }
}
