// Library surface for headless/integration tests and reuse.
// Keep this free of terminal rendering; the ui lives with the binary.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod flashcards;
pub mod game;
pub mod logging;
pub mod mode;
pub mod runtime;
pub mod scheduler;
pub mod vocabulary;

pub use error::{Error, Result};
