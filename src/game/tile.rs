/// Identifies the two tiles derived from the same word
pub type PairId = usize;

/// Lifecycle of one tile. Content is always face up; only this changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Idle,
    Selected,
    MatchedPendingRemoval,
    Removed,
}

/// Result of comparing two selected tiles, reported as feedback only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub content: String,
    pub pair_id: PairId,
    pub state: TileState,
}

impl Tile {
    pub fn new(content: impl Into<String>, pair_id: PairId) -> Self {
        Self {
            content: content.into(),
            pair_id,
            state: TileState::Idle,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.state == TileState::Idle
    }

    /// Matched tiles count toward progress even before they leave the board
    pub fn is_matched(&self) -> bool {
        matches!(
            self.state,
            TileState::MatchedPendingRemoval | TileState::Removed
        )
    }
}
