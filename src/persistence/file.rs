//! Plain-text high score file
//!
//! Writes go to a sibling `.tmp` file that is then renamed over the real one,
//! so a crash mid-write leaves the previous score intact.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{HighScoreStore, parse_score};
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => match parse_score(&text) {
                Some(score) => {
                    log::info!("Loaded high score {} from {:?}", score, self.path);
                    score
                }
                None => {
                    log::warn!("High score file {:?} is corrupt, starting from 0", self.path);
                    0
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high score yet at {:?}", self.path);
                0
            }
            Err(e) => {
                log::warn!("Could not read high score {:?}: {}", self.path, e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, format!("{score}\n")).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::info!("High score {} saved to {:?}", score, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("zoo-merge-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("highscore.txt")
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let mut store = FileStore::new(scratch("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("roundtrip");
        let mut store = FileStore::new(&path);
        store.save(4321).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "4321\n");
        assert_eq!(FileStore::new(&path).load(), 4321);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_corrupt_file_reads_zero() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not a number").unwrap();
        assert_eq!(FileStore::new(&path).load(), 0);
    }
}
