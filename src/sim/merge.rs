//! Merge resolution
//!
//! Contacts arrive after the physics step has resolved them. The resolver only
//! stages work: the two consumed bodies go into the pending-removal set and the
//! evolved token into the pending-spawn list. The driver drains both after the
//! step (all removals first, then all spawns), so nothing touches the physics
//! world while contacts are being reported and no merge effect outlives its
//! tick.

use std::collections::HashSet;

use glam::Vec2;

use super::physics::{BodyHandle, Contact, PhysicsEngine};
use super::registry::{Token, TokenRegistry};
use super::species::{SpeciesId, SpeciesTable};
use crate::consts::{MERGE_POINTS_BASE, MERGE_POINTS_PER_RANK};
use crate::midpoint;

/// A merge staged during the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub consumed: SpeciesId,
    pub produced: SpeciesId,
    pub position: Vec2,
    pub points: u64,
}

/// Points awarded for merging into `produced`
#[inline]
pub fn merge_points(species: &SpeciesTable, produced: SpeciesId) -> u64 {
    species.rank(produced) as u64 * MERGE_POINTS_PER_RANK + MERGE_POINTS_BASE
}

/// Per-tick merge buffers
#[derive(Debug, Default, Clone)]
pub struct StagedEffects {
    pending_removal: HashSet<BodyHandle>,
    pending_spawn: Vec<(Vec2, SpeciesId)>,
}

impl StagedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a contact merges, and stage it if so.
    ///
    /// Ignored: either body already consumed this step, an untagged body,
    /// different species, or a terminal species.
    pub fn resolve(
        &mut self,
        contact: &Contact,
        registry: &TokenRegistry,
        species: &SpeciesTable,
    ) -> Option<Merge> {
        if self.pending_removal.contains(&contact.a) || self.pending_removal.contains(&contact.b) {
            return None;
        }
        let tag_a = registry.tag(contact.a)?;
        let tag_b = registry.tag(contact.b)?;
        if tag_a.species != tag_b.species {
            return None;
        }
        let produced = species.successor(tag_a.species)?;

        self.pending_removal.insert(contact.a);
        self.pending_removal.insert(contact.b);

        let position = midpoint(contact.position_a, contact.position_b);
        self.pending_spawn.push((position, produced));

        let merge = Merge {
            consumed: tag_a.species,
            produced,
            position,
            points: merge_points(species, produced),
        };
        log::debug!(
            "merge {} + {} -> {} at ({:.1}, {:.1})",
            species.get(merge.consumed).name,
            species.get(merge.consumed).name,
            species.get(produced).name,
            position.x,
            position.y
        );
        Some(merge)
    }

    /// Drain the buffers into the world: removals first, then spawns.
    /// Returns the newly spawned tokens.
    pub fn apply<P: PhysicsEngine>(
        &mut self,
        physics: &mut P,
        registry: &mut TokenRegistry,
        species: &SpeciesTable,
    ) -> Vec<Token> {
        for handle in self.pending_removal.drain() {
            registry.despawn(physics, handle);
        }
        self.pending_spawn
            .drain(..)
            .map(|(position, id)| registry.spawn(physics, species, position, id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending_removal.clear();
        self.pending_spawn.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending_removal.is_empty() && self.pending_spawn.is_empty()
    }
}
