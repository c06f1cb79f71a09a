//! Fixed timestep game loop driver
//!
//! One tick: handle inbound requests, step physics (the merge resolver runs as
//! the contact callback), apply the staged merge effects, then judge the
//! over-line. Rendering reads a [`Frame`] afterwards. Events only live until
//! the start of the next tick.

use glam::Vec2;
use serde::Serialize;

use super::merge::StagedEffects;
use super::physics::{CollisionGroup, PhysicsEngine};
use super::registry::{Token, TokenBody, TokenRegistry};
use super::species::{Rgb, SpeciesId, SpeciesTable};
use super::state::{GameEvent, GamePhase, GameState, any_above_line};
use crate::consts::ANIMAL_GROUP;
use crate::error::ConfigError;
use crate::persistence::HighScoreStore;
use crate::settings::GameConfig;

/// Seed used when the config does not name one
pub const DEFAULT_SEED: u64 = 0x5eed_2025;

/// Inbound requests for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop the next token at this x (clamped between the walls)
    pub drop_x: Option<f32>,
    /// Start a new run
    pub reset: bool,
    /// Leave the game loop
    pub quit: bool,
}

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A token as the renderer needs it
#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub species: String,
    pub position: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

/// The species waiting to be dropped
#[derive(Debug, Clone, Serialize)]
pub struct DropPreview {
    pub species: String,
    pub radius: f32,
    pub color: Rgb,
}

/// Everything a renderer draws for one tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub tokens: Vec<TokenView>,
    pub phase: GamePhase,
    /// Ticks simulated this run
    pub time_ticks: u64,
    pub grace_timer: f32,
    pub score: u64,
    pub high_score: u64,
    pub next: DropPreview,
    pub over_line_y: f32,
    pub left_wall: f32,
    pub right_wall: f32,
    pub floor: f32,
}

/// A running game: world, tokens, rules and high score store
pub struct Session<P: PhysicsEngine, S: HighScoreStore> {
    config: GameConfig,
    species: SpeciesTable,
    physics: P,
    registry: TokenRegistry,
    staged: StagedEffects,
    state: GameState,
    store: S,
}

impl<P: PhysicsEngine, S: HighScoreStore> Session<P, S> {
    /// Validate the config, build the walls and load the high score
    pub fn new(config: GameConfig, mut physics: P, mut store: S) -> Result<Self, ConfigError> {
        let species = config.validate()?;
        for (a, b) in config.wall_segments() {
            physics.add_static_segment(a, b, config.wall_thickness, config.wall_material);
        }

        let registry = TokenRegistry::new(
            TokenBody {
                mass: config.token_mass,
                material: config.token_material,
            },
            CollisionGroup(ANIMAL_GROUP),
        );
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        let high_score = store.load();
        let state = GameState::new(seed, high_score, &species);
        log::info!(
            "Session ready: {} species, seed {}, high score {}",
            species.len(),
            seed,
            high_score
        );

        Ok(Self {
            config,
            species,
            physics,
            registry,
            staged: StagedEffects::new(),
            state,
            store,
        })
    }

    /// Advance the game by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Flow {
        self.state.clear_events();
        if input.quit {
            log::info!("Quit requested");
            return Flow::Quit;
        }
        if input.reset {
            self.reset();
        }
        if self.state.is_over() {
            return Flow::Continue;
        }

        self.state.time_ticks += 1;

        if let Some(x) = input.drop_x {
            self.drop_token(x);
        }

        let Self {
            config,
            species,
            physics,
            registry,
            staged,
            state,
            store,
        } = self;

        let group = registry.group();
        physics.step(dt, group, &mut |contact| {
            if let Some(merge) = staged.resolve(&contact, registry, species) {
                state.record_merge(&merge);
            }
        });
        staged.apply(physics, registry, species);

        let tokens = registry.all_tokens(&*physics);
        let breach = any_above_line(&tokens, config.over_line_y);
        state.judge_over_line(breach, dt, config.grace_period, store);

        Flow::Continue
    }

    /// Drop the queued species at `x`. Ignored once the game is over.
    pub fn drop_token(&mut self, x: f32) -> Option<Token> {
        if self.state.is_over() {
            log::debug!("Drop at {:.1} ignored: game over", x);
            return None;
        }
        let zone = self.config.drop_zone();
        let token = self.state.spawn.request_drop(
            x,
            &zone,
            &mut self.physics,
            &mut self.registry,
            &self.species,
        );
        self.state.push_event(GameEvent::Dropped {
            species: token.species,
            x: token.position.x,
        });
        Some(token)
    }

    /// Put a token of a given species straight into the world
    pub fn place(&mut self, position: Vec2, species: SpeciesId) -> Token {
        self.registry
            .spawn(&mut self.physics, &self.species, position, species)
    }

    /// Clear the board and start a new run; the high score is kept
    pub fn reset(&mut self) {
        let removed = self.registry.clear(&mut self.physics);
        self.staged.clear();
        self.state.reset(&self.species);
        log::info!("Reset: cleared {} tokens", removed);
    }

    /// Where a drop at `x` would appear
    pub fn preview_position(&self, x: f32) -> Vec2 {
        let zone = self.config.drop_zone();
        let radius = self.species.get(self.state.next_spawn_species()).radius;
        Vec2::new(zone.clamp_x(x, radius), zone.spawn_y)
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> Frame {
        let tokens = self
            .registry
            .all_tokens(&self.physics)
            .into_iter()
            .map(|t| {
                let s = self.species.get(t.species);
                TokenView {
                    species: s.name.clone(),
                    position: t.position,
                    radius: t.radius,
                    color: s.color,
                }
            })
            .collect();
        let next = self.species.get(self.state.next_spawn_species());
        Frame {
            tokens,
            phase: self.state.phase,
            time_ticks: self.state.time_ticks,
            grace_timer: self.state.grace_timer,
            score: self.state.score,
            high_score: self.state.high_score,
            next: DropPreview {
                species: next.name.clone(),
                radius: next.radius,
                color: next.color,
            },
            over_line_y: self.config.over_line_y,
            left_wall: self.config.left_wall(),
            right_wall: self.config.right_wall(),
            floor: self.config.floor(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.registry.all_tokens(&self.physics)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
