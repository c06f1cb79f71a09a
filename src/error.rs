//! Error types
//!
//! Idempotency guards (double removal, duplicate merge marking) are not errors
//! and never show up here.

use std::path::PathBuf;

use thiserror::Error;

/// Species catalog construction and lookup failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("unknown species '{0}'")]
    NotFound(String),
    #[error("species '{0}' is defined more than once")]
    Duplicate(String),
    #[error("species '{0}' must have a positive radius")]
    InvalidRadius(String),
    #[error("species '{0}' evolves into '{1}', which is not larger")]
    NonIncreasingRadius(String, String),
    #[error("catalog must have exactly one terminal species, found {0}")]
    TerminalCount(usize),
    #[error("catalog needs at least {needed} species, found {found}")]
    TooFew { needed: usize, found: usize },
}

/// High score storage failures (only raised on save; loads fall back to 0)
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("high score file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid species catalog: {0}")]
    Species(#[from] SpeciesError),
    #[error("invalid arena: {0}")]
    Arena(String),
}
