//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Physics behind the `PhysicsEngine` trait (rapier2d in `world`)
//! - No rendering or platform dependencies

pub mod merge;
pub mod physics;
pub mod registry;
pub mod spawn;
pub mod species;
pub mod state;
pub mod tick;
pub mod world;

pub use merge::{Merge, StagedEffects, merge_points};
pub use physics::{BodyHandle, CircleDesc, CollisionGroup, Contact, Material, PhysicsEngine};
pub use registry::{Token, TokenBody, TokenRegistry, TokenTag};
pub use spawn::{DropZone, SpawnQueue};
pub use species::{Rgb, Species, SpeciesDef, SpeciesId, SpeciesTable, default_catalog};
pub use state::{GameEvent, GamePhase, GameState, any_above_line};
pub use tick::{DEFAULT_SEED, DropPreview, Flow, Frame, Session, TickInput, TokenView};
pub use world::PhysicsWorld;
