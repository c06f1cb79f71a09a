//! Zoo Merge - drop animals, merge matching pairs, keep the pile below the line
//!
//! Core modules:
//! - `sim`: Game logic (species, merges, spawning, game state, tick driver)
//! - `persistence`: High score storage
//! - `settings`: Data-driven game configuration

pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PersistenceError, SpeciesError};
pub use settings::GameConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Screen dimensions
    pub const WIDTH: f32 = 600.0;
    pub const HEIGHT: f32 = 800.0;
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FPS as f32;

    /// Gravity (screen space, y points down)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 900.0);

    /// Wall properties
    pub const WALL_INSET: f32 = 50.0;
    pub const WALL_THICKNESS: f32 = 5.0;
    pub const WALL_ELASTICITY: f32 = 0.5;
    pub const WALL_FRICTION: f32 = 0.5;

    /// Token (animal) body properties
    pub const TOKEN_MASS: f32 = 1.0;
    pub const TOKEN_ELASTICITY: f32 = 0.8;
    pub const TOKEN_FRICTION: f32 = 0.5;
    pub const SPAWN_Y: f32 = 50.0;

    /// Collision group shared by every animal token
    pub const ANIMAL_GROUP: u32 = 1;

    /// Number of low-tier species the player can be handed
    pub const SPAWNABLE_COUNT: usize = 3;

    /// Over-line: a token whose top edge sits above this y is in breach
    pub const OVER_LINE_Y: f32 = 150.0;
    /// Seconds of continuous breach before the run ends
    pub const GRACE_PERIOD: f32 = 2.0;

    /// Score for a merge into rank r is r * MERGE_POINTS_PER_RANK + MERGE_POINTS_BASE
    pub const MERGE_POINTS_PER_RANK: u64 = 10;
    pub const MERGE_POINTS_BASE: u64 = 10;
}

/// Arithmetic midpoint of two points
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let m = midpoint(Vec2::new(0.0, 10.0), Vec2::new(20.0, 30.0));
        assert_eq!(m, Vec2::new(10.0, 20.0));
    }
}
