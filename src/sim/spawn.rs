//! Spawn queue: what the player drops next, and where it lands
//!
//! The next species is always drawn uniformly from the spawnable pool, no
//! matter what is on the board. Draws come from a seeded PCG stream so a run
//! can be replayed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::PhysicsEngine;
use super::registry::{Token, TokenRegistry};
use super::species::{SpeciesId, SpeciesTable};

/// Horizontal extent a dropped token must stay inside, and the drop height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub left: f32,
    pub right: f32,
    pub spawn_y: f32,
}

impl DropZone {
    /// Clamp a requested x so a circle of `radius` fits between the walls.
    /// If it cannot fit at all, it is centered.
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let lo = self.left + radius;
        let hi = self.right - radius;
        if lo > hi {
            return (self.left + self.right) * 0.5;
        }
        if x.is_nan() {
            return (lo + hi) * 0.5;
        }
        x.clamp(lo, hi)
    }
}

#[derive(Debug, Clone)]
pub struct SpawnQueue {
    rng: Pcg32,
    current: SpeciesId,
}

impl SpawnQueue {
    pub fn new(seed: u64, species: &SpeciesTable) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = draw(&mut rng, species);
        Self { rng, current }
    }

    /// The species that will be dropped next
    #[inline]
    pub fn current(&self) -> SpeciesId {
        self.current
    }

    /// Draw a new `current` from the spawnable pool
    pub fn advance(&mut self, species: &SpeciesTable) -> SpeciesId {
        self.current = draw(&mut self.rng, species);
        self.current
    }

    /// Spawn `current()` at the clamped drop position, then advance
    pub fn request_drop<P: PhysicsEngine>(
        &mut self,
        x: f32,
        zone: &DropZone,
        physics: &mut P,
        registry: &mut TokenRegistry,
        species: &SpeciesTable,
    ) -> Token {
        let id = self.current;
        let x = zone.clamp_x(x, species.get(id).radius);
        let token = registry.spawn(physics, species, Vec2::new(x, zone.spawn_y), id);
        self.advance(species);
        token
    }
}

fn draw(rng: &mut Pcg32, species: &SpeciesTable) -> SpeciesId {
    let pool = species.spawnable_pool().len();
    SpeciesId(rng.random_range(0..pool))
}
