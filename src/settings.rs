//! Game configuration
//!
//! Defaults come from [`crate::consts`]. A JSON file may override any subset
//! of fields; missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::physics::Material;
use crate::sim::spawn::DropZone;
use crate::sim::species::{SpeciesDef, SpeciesTable, default_catalog};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub width: f32,
    pub height: f32,
    pub gravity: Vec2,
    pub wall_inset: f32,
    pub wall_thickness: f32,
    pub wall_material: Material,

    // === Tokens ===
    pub token_mass: f32,
    pub token_material: Material,
    pub spawn_y: f32,
    pub species: Vec<SpeciesDef>,

    // === Rules ===
    pub over_line_y: f32,
    /// Seconds above the line before the run ends
    pub grace_period: f32,

    // === Run ===
    /// Spawn RNG seed (None = seeded from the clock)
    pub seed: Option<u64>,
    pub high_score_path: PathBuf,

    // === Headless autoplay ===
    pub autoplay_drop_interval: u32,
    pub autoplay_max_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            gravity: GRAVITY,
            wall_inset: WALL_INSET,
            wall_thickness: WALL_THICKNESS,
            wall_material: Material {
                elasticity: WALL_ELASTICITY,
                friction: WALL_FRICTION,
            },

            token_mass: TOKEN_MASS,
            token_material: Material {
                elasticity: TOKEN_ELASTICITY,
                friction: TOKEN_FRICTION,
            },
            spawn_y: SPAWN_Y,
            species: default_catalog(),

            over_line_y: OVER_LINE_Y,
            grace_period: GRACE_PERIOD,

            seed: None,
            high_score_path: PathBuf::from("highscore.txt"),

            autoplay_drop_interval: FPS,
            autoplay_max_ticks: 60 * 60 * FPS as u64,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the arena is usable and build the species table
    pub fn validate(&self) -> Result<SpeciesTable, ConfigError> {
        if self.wall_inset * 2.0 >= self.width || self.wall_inset * 2.0 >= self.height {
            return Err(ConfigError::Arena(format!(
                "wall inset {} leaves no room in a {}x{} screen",
                self.wall_inset, self.width, self.height
            )));
        }
        if self.grace_period.is_nan() || self.grace_period < 0.0 {
            return Err(ConfigError::Arena("grace period must be non-negative".into()));
        }
        Ok(SpeciesTable::new(&self.species)?)
    }

    /// Inner face of the left wall
    pub fn left_wall(&self) -> f32 {
        self.wall_inset + self.wall_thickness
    }

    /// Inner face of the right wall
    pub fn right_wall(&self) -> f32 {
        self.width - self.wall_inset - self.wall_thickness
    }

    /// Inner face of the floor
    pub fn floor(&self) -> f32 {
        self.height - self.wall_inset - self.wall_thickness
    }

    pub fn drop_zone(&self) -> DropZone {
        DropZone {
            left: self.left_wall(),
            right: self.right_wall(),
            spawn_y: self.spawn_y,
        }
    }

    /// Wall segments (floor, left, right) as endpoint pairs
    pub fn wall_segments(&self) -> [(Vec2, Vec2); 3] {
        let (w, h, inset) = (self.width, self.height, self.wall_inset);
        [
            (Vec2::new(inset, h - inset), Vec2::new(w - inset, h - inset)),
            (Vec2::new(inset, h - inset), Vec2::new(inset, inset)),
            (Vec2::new(w - inset, h - inset), Vec2::new(w - inset, inset)),
        ]
    }
}
