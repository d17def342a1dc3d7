use super::tile::Outcome;

/// Transition notifications emitted by a [`GameSession`](super::GameSession).
///
/// The render layer maps these onto visuals; the engine never touches the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TileSelected { index: usize },
    /// Two tiles are selected and the board is locked until the pair settles
    EvaluationScheduled { first: usize, second: usize },
    /// Immediate colouring of one evaluated tile; not a state change
    Feedback { index: usize, outcome: Outcome },
    PairRemoved { first: usize, second: usize },
    PairReset { first: usize, second: usize },
    Completed { score: u32 },
}

impl GameEvent {
    /// Tiles whose transient feedback should be cleared after this event
    pub fn settled_tiles(&self) -> Option<(usize, usize)> {
        match *self {
            GameEvent::PairRemoved { first, second } | GameEvent::PairReset { first, second } => {
                Some((first, second))
            }
            _ => None,
        }
    }
}
