use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

static VOCAB_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/vocab");

/// Deck loaded when nothing else is configured
pub const DEFAULT_DECK: &str = "basics";

/// Smallest number of words a session is played with
pub const MIN_WORDS: usize = 3;
/// Largest number of words a session is played with
pub const MAX_WORDS: usize = 15;

/// One vocabulary entry: the character form, its pinyin and two glosses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub hanzi: String,
    pub pinyin: String,
    pub english: String,
    pub spanish: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Deck {
    name: String,
    words: Vec<TranslationRecord>,
}

/// Immutable collection of translation records.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    name: String,
    records: Vec<TranslationRecord>,
}

impl VocabularyStore {
    pub fn new(name: impl Into<String>, records: Vec<TranslationRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::InsufficientData {
                requested: 1,
                available: 0,
            });
        }
        Ok(Self {
            name: name.into(),
            records,
        })
    }

    /// Load one of the decks compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self> {
        let file = VOCAB_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::invalid(format!("unknown vocabulary deck '{name}'")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::invalid(format!("deck '{name}' is not valid utf-8")))?;
        Self::from_json(contents)
    }

    /// Load a user supplied deck from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let store = Self::from_json(&contents)?;
        debug!(path = %path.as_ref().display(), words = store.len(), "loaded vocabulary file");
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let deck: Deck = serde_json::from_str(json)?;
        Self::new(deck.name, deck.words)
    }

    /// Names of the decks embedded in the binary, sorted.
    pub fn builtin_names() -> Vec<String> {
        let mut names: Vec<String> = VOCAB_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TranslationRecord] {
        &self.records
    }

    /// Pick `n` distinct records uniformly at random, without replacement.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<TranslationRecord>> {
        if n > self.records.len() {
            return Err(Error::InsufficientData {
                requested: n,
                available: self.records.len(),
            });
        }
        Ok(self.records.choose_multiple(rng, n).cloned().collect())
    }
}

/// Clamp a requested word count into `[MIN_WORDS, min(MAX_WORDS, available)]`.
///
/// Decks smaller than `MIN_WORDS` clamp to their own size.
pub fn clamp_word_count(requested: usize, available: usize) -> usize {
    let upper = MAX_WORDS.min(available);
    if upper < MIN_WORDS {
        return upper;
    }
    requested.clamp(MIN_WORDS, upper)
}
