//! Word-legality oracle.
//!
//! Lookups are synchronous and in-memory, so the per-game lock may be
//! held across them during commit.

use super::error::EngineError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Answers whether a word is legal to play.
pub trait Lexicon: Send + Sync {
    /// Checks a word (uppercase, blanks already resolved to letters).
    fn contains(&self, word: &str) -> bool;
}

/// A [`Lexicon`] backed by an in-memory set of uppercase words.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Builds a word list from an iterator of words.
    ///
    /// Words are normalized to uppercase; one-letter entries are dropped
    /// since no playable word is shorter than two tiles.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| w.len() >= 2 && w.chars().all(|c| c.is_ascii_uppercase()))
            .collect();
        Self { words }
    }

    /// Loads a word list from a newline-delimited file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LexiconUnavailable`] when the file cannot
    /// be read. This is an engine fault, not a player error.
    #[instrument]
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| EngineError::LexiconUnavailable {
                path: path.display().to_string(),
                source,
            })?;
        let list = Self::from_words(contents.lines());
        info!(path = %path.display(), words = list.len(), "Loaded word list");
        Ok(list)
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Lexicon for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}
