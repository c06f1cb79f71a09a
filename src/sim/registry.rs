//! Token registry: which physics body is which animal
//!
//! Species tags live in a side table keyed by body handle instead of on the
//! engine's objects. Every registered handle has a live body in the engine and
//! every animal body in the engine is registered; `spawn` and `despawn` are
//! the only ways in and out, and they update both sides together.

use std::collections::HashMap;

use glam::Vec2;

use super::physics::{BodyHandle, CircleDesc, CollisionGroup, Material, PhysicsEngine};
use super::species::{SpeciesId, SpeciesTable};

/// Tag attached to a token's body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenTag {
    pub species: SpeciesId,
    pub radius: f32,
    pub group: CollisionGroup,
}

/// A live token as seen at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub handle: BodyHandle,
    pub species: SpeciesId,
    pub position: Vec2,
    pub radius: f32,
}

impl Token {
    /// Highest y the circle reaches (screen space, y down)
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y - self.radius
    }
}

/// Physical properties shared by all token bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenBody {
    pub mass: f32,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub struct TokenRegistry {
    body: TokenBody,
    group: CollisionGroup,
    tags: HashMap<BodyHandle, TokenTag>,
}

impl TokenRegistry {
    pub fn new(body: TokenBody, group: CollisionGroup) -> Self {
        Self {
            body,
            group,
            tags: HashMap::new(),
        }
    }

    /// The collision group every token is created in
    pub fn group(&self) -> CollisionGroup {
        self.group
    }

    /// Create a token body at `position` and register it
    pub fn spawn<P: PhysicsEngine>(
        &mut self,
        physics: &mut P,
        species: &SpeciesTable,
        position: Vec2,
        id: SpeciesId,
    ) -> Token {
        let radius = species.get(id).radius;
        let handle = physics.spawn_dynamic_circle(CircleDesc {
            position,
            radius,
            mass: self.body.mass,
            material: self.body.material,
            group: self.group,
        });
        self.tags.insert(
            handle,
            TokenTag {
                species: id,
                radius,
                group: self.group,
            },
        );
        Token {
            handle,
            species: id,
            position,
            radius,
        }
    }

    /// Remove a token from the engine and the registry.
    /// Unknown handles are ignored; returns whether anything was removed.
    pub fn despawn<P: PhysicsEngine>(&mut self, physics: &mut P, handle: BodyHandle) -> bool {
        if self.tags.remove(&handle).is_none() {
            return false;
        }
        physics.remove_body(handle);
        true
    }

    /// Remove every dynamic body from the engine and forget all tags
    pub fn clear<P: PhysicsEngine>(&mut self, physics: &mut P) -> usize {
        let handles: Vec<_> = physics.bodies().into_iter().map(|(h, _)| h).collect();
        for &handle in &handles {
            physics.remove_body(handle);
        }
        self.tags.clear();
        handles.len()
    }

    pub fn tag(&self, handle: BodyHandle) -> Option<&TokenTag> {
        self.tags.get(&handle)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.tags.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Every live token, in the engine's body order
    pub fn all_tokens<P: PhysicsEngine>(&self, physics: &P) -> Vec<Token> {
        physics
            .bodies()
            .into_iter()
            .filter_map(|(handle, position)| {
                self.tags.get(&handle).map(|tag| Token {
                    handle,
                    species: tag.species,
                    position,
                    radius: tag.radius,
                })
            })
            .collect()
    }
}
