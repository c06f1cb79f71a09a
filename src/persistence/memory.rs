//! In-memory high score store (tests, headless runs)

use super::HighScoreStore;
use crate::error::PersistenceError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
    saves: usize,
}

impl MemoryStore {
    pub fn new(value: u64) -> Self {
        Self { value, saves: 0 }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.value
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.value = score;
        self.saves += 1;
        Ok(())
    }
}
