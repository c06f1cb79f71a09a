//! Species catalog and evolution chain
//!
//! The catalog is an ordered, immutable list. A species' position in the list
//! is its rank (which drives merge scoring), and the first `SPAWNABLE_COUNT`
//! entries are the only ones the player is ever handed. Successors are stored
//! as catalog indices, so the chain never needs shared pointers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::SPAWNABLE_COUNT;
use crate::error::SpeciesError;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Index of a species in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub usize);

/// Species definition as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub name: String,
    pub radius: f32,
    pub color: Rgb,
    /// Name of the species two of these merge into (None = terminal)
    #[serde(default)]
    pub successor: Option<String>,
}

impl SpeciesDef {
    pub fn new(name: &str, radius: f32, color: Rgb, successor: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            radius,
            color,
            successor: successor.map(str::to_string),
        }
    }
}

/// A resolved species record
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    pub radius: f32,
    pub color: Rgb,
    pub successor: Option<SpeciesId>,
}

impl Species {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.successor.is_none()
    }
}

/// The built-in eight-animal catalog
pub fn default_catalog() -> Vec<SpeciesDef> {
    vec![
        SpeciesDef::new("mouse", 18.0, Rgb(150, 150, 165), Some("rabbit")),
        SpeciesDef::new("rabbit", 26.0, Rgb(235, 225, 215), Some("cat")),
        SpeciesDef::new("cat", 34.0, Rgb(250, 160, 60), Some("dog")),
        SpeciesDef::new("dog", 43.0, Rgb(165, 110, 60), Some("sheep")),
        SpeciesDef::new("sheep", 52.0, Rgb(245, 245, 240), Some("pig")),
        SpeciesDef::new("pig", 62.0, Rgb(245, 170, 185), Some("cow")),
        SpeciesDef::new("cow", 74.0, Rgb(60, 60, 60), Some("elephant")),
        SpeciesDef::new("elephant", 88.0, Rgb(140, 150, 170), None),
    ]
}

/// Ordered species catalog
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    species: Vec<Species>,
    by_name: HashMap<String, SpeciesId>,
}

impl SpeciesTable {
    /// Resolve and validate a catalog.
    ///
    /// Every successor must be strictly larger than its predecessor, which
    /// also rules out cycles (including a species naming itself).
    pub fn new(defs: &[SpeciesDef]) -> Result<Self, SpeciesError> {
        if defs.len() < SPAWNABLE_COUNT {
            return Err(SpeciesError::TooFew {
                needed: SPAWNABLE_COUNT,
                found: defs.len(),
            });
        }

        let mut by_name = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if !(def.radius.is_finite() && def.radius > 0.0) {
                return Err(SpeciesError::InvalidRadius(def.name.clone()));
            }
            if by_name.insert(def.name.clone(), SpeciesId(i)).is_some() {
                return Err(SpeciesError::Duplicate(def.name.clone()));
            }
        }

        let mut species = Vec::with_capacity(defs.len());
        for def in defs {
            let successor = match &def.successor {
                Some(name) => {
                    let id = *by_name
                        .get(name)
                        .ok_or_else(|| SpeciesError::NotFound(name.clone()))?;
                    if defs[id.0].radius <= def.radius {
                        return Err(SpeciesError::NonIncreasingRadius(
                            def.name.clone(),
                            name.clone(),
                        ));
                    }
                    Some(id)
                }
                None => None,
            };
            species.push(Species {
                name: def.name.clone(),
                radius: def.radius,
                color: def.color,
                successor,
            });
        }

        let terminals = species.iter().filter(|s| s.is_terminal()).count();
        if terminals != 1 {
            return Err(SpeciesError::TerminalCount(terminals));
        }

        Ok(Self { species, by_name })
    }

    /// Look a species up by name
    pub fn lookup(&self, name: &str) -> Result<SpeciesId, SpeciesError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SpeciesError::NotFound(name.to_string()))
    }

    /// Species record for an id handed out by this table
    #[inline]
    pub fn get(&self, id: SpeciesId) -> &Species {
        &self.species[id.0]
    }

    /// Catalog position (0-based)
    #[inline]
    pub fn rank(&self, id: SpeciesId) -> usize {
        id.0
    }

    #[inline]
    pub fn successor(&self, id: SpeciesId) -> Option<SpeciesId> {
        self.get(id).successor
    }

    /// The low-tier species eligible to be dropped by the player
    pub fn spawnable_pool(&self) -> &[Species] {
        &self.species[..SPAWNABLE_COUNT]
    }

    pub fn spawnable_ids(&self) -> impl Iterator<Item = SpeciesId> + use<> {
        (0..SPAWNABLE_COUNT).map(SpeciesId)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &Species)> {
        self.species
            .iter()
            .enumerate()
            .map(|(i, s)| (SpeciesId(i), s))
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        // The built-in catalog is known-good
        Self::new(&default_catalog()).unwrap_or_else(|e| panic!("default catalog: {e}"))
    }
}
