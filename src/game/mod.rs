pub mod event;
pub mod session;
pub mod tile;

pub use event::GameEvent;
pub use session::{GameSession, GameSummary, SessionPhase, POINTS_PER_MATCH};
pub use tile::{Outcome, PairId, Tile, TileState};
