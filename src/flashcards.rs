use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::mode::ProjectionMode;
use crate::vocabulary::TranslationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rating {
    #[strum(serialize = "Excellent work!")]
    Excellent,
    #[strum(serialize = "Good job! Keep practicing!")]
    Good,
    #[strum(serialize = "Keep studying! You'll improve!")]
    KeepStudying,
}

impl Rating {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Rating::Excellent
        } else if accuracy >= 70.0 {
            Rating::Good
        } else {
            Rating::KeepStudying
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashcardSummary {
    pub correct: usize,
    pub total: usize,
    /// percent, 0..=100
    pub accuracy: f64,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub prompt: String,
    pub answer: String,
}

/// Self-paced review: reveal the answer, then mark yourself right or wrong.
#[derive(Debug)]
pub struct FlashcardDeck {
    mode: ProjectionMode,
    cards: Vec<Card>,
    position: usize,
    answer_shown: bool,
    correct: usize,
}

impl FlashcardDeck {
    pub fn new(words: &[TranslationRecord], mode: ProjectionMode) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::invalid("a flashcard deck needs at least one word"));
        }
        let cards = words
            .iter()
            .map(|w| {
                let (prompt, answer) = mode.project(w);
                Card { prompt, answer }
            })
            .collect::<Vec<_>>();
        info!(mode = mode.id(), cards = cards.len(), "new flashcard deck");
        Ok(Self {
            mode,
            cards,
            position: 0,
            answer_shown: false,
            correct: 0,
        })
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.position)
    }

    /// Zero-based index of the card on screen
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn answer_shown(&self) -> bool {
        self.answer_shown
    }

    pub fn show_answer(&mut self) {
        if !self.is_finished() {
            self.answer_shown = true;
        }
    }

    /// Record a self-assessment for the current card and move on.
    pub fn answer(&mut self, correct: bool) {
        if self.is_finished() {
            return;
        }
        if correct {
            self.correct += 1;
        }
        debug!(position = self.position, correct, "flashcard answered");
        self.position += 1;
        self.answer_shown = false;
    }

    /// Fraction of the deck already reviewed, for the progress bar
    pub fn progress(&self) -> f64 {
        self.position as f64 / self.cards.len() as f64
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.cards.len()
    }

    pub fn summary(&self) -> FlashcardSummary {
        let total = self.cards.len();
        let accuracy = (self.correct as f64 / total as f64) * 100.0;
        FlashcardSummary {
            correct: self.correct,
            total,
            accuracy,
            rating: Rating::from_accuracy(accuracy),
        }
    }
}
