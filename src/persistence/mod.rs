//! High score persistence
//!
//! The only thing that outlives a process is a single integer. Loading is
//! best-effort: a missing or corrupt value reads as 0 and is logged, never
//! surfaced to the player.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::PersistenceError;

/// Where the high score lives between runs
pub trait HighScoreStore {
    /// Stored high score, or 0 if absent or unreadable
    fn load(&mut self) -> u64;

    fn save(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// Parse a stored high score; surrounding whitespace is allowed
pub(crate) fn parse_score(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}
