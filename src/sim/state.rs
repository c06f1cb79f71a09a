//! Game state: phase, over-line timer, score
//!
//! The over-line check has hysteresis: the run only ends once some token has
//! stayed above the line for the whole grace period. Any tick with the board
//! clear of the line resets the timer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::merge::Merge;
use super::registry::Token;
use super::spawn::SpawnQueue;
use super::species::{SpeciesId, SpeciesTable};
use crate::persistence::HighScoreStore;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Running,
    /// Something is above the over-line; the grace timer is counting
    OverLineGrace,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Things that happened during a tick, for logging, audio and effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Dropped { species: SpeciesId, x: f32 },
    Merged {
        consumed: SpeciesId,
        produced: SpeciesId,
        position: Vec2,
        points: u64,
    },
    GraceStarted,
    GraceCleared,
    GameOver { score: u64, new_high_score: bool },
    Reset,
}

/// True if any token's top edge is above `over_line_y`
pub fn any_above_line(tokens: &[Token], over_line_y: f32) -> bool {
    tokens.iter().any(|t| t.top() < over_line_y)
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Seconds spent continuously above the over-line
    pub grace_timer: f32,
    pub score: u64,
    /// Best score ever; never lowered
    pub high_score: u64,
    pub spawn: SpawnQueue,
    /// Ticks simulated this run
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, high_score: u64, species: &SpeciesTable) -> Self {
        Self {
            phase: GamePhase::Running,
            grace_timer: 0.0,
            score: 0,
            high_score,
            spawn: SpawnQueue::new(seed, species),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Species the next drop will use
    #[inline]
    pub fn next_spawn_species(&self) -> SpeciesId {
        self.spawn.current()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop undrained events from the previous tick
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Credit a staged merge
    pub fn record_merge(&mut self, merge: &Merge) {
        self.score += merge.points;
        self.events.push(GameEvent::Merged {
            consumed: merge.consumed,
            produced: merge.produced,
            position: merge.position,
            points: merge.points,
        });
    }

    /// Run the over-line judgment for one tick.
    ///
    /// Does nothing once the game is over. On the transition to `GameOver` the
    /// high score is saved through `store` if this run beat it.
    pub fn judge_over_line(
        &mut self,
        breach: bool,
        dt: f32,
        grace_period: f32,
        store: &mut dyn HighScoreStore,
    ) {
        match (self.phase, breach) {
            (GamePhase::GameOver, _) => {}
            (GamePhase::OverLineGrace, true) => {
                self.grace_timer += dt;
                if self.grace_timer > grace_period {
                    self.finish(store);
                }
            }
            (GamePhase::Running, true) => {
                self.phase = GamePhase::OverLineGrace;
                self.grace_timer = 0.0;
                self.events.push(GameEvent::GraceStarted);
                log::debug!("over-line breach, grace timer started");
            }
            (GamePhase::OverLineGrace, false) => {
                self.phase = GamePhase::Running;
                self.grace_timer = 0.0;
                self.events.push(GameEvent::GraceCleared);
                log::debug!("over-line cleared");
            }
            (GamePhase::Running, false) => {
                self.grace_timer = 0.0;
            }
        }
    }

    fn finish(&mut self, store: &mut dyn HighScoreStore) {
        self.phase = GamePhase::GameOver;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            if let Err(e) = store.save(self.score) {
                log::warn!("Failed to save high score {}: {}", self.score, e);
            }
        }
        log::info!(
            "Game over after {} ticks: score {} (high score {}{})",
            self.time_ticks,
            self.score,
            self.high_score,
            if new_high_score { ", new!" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
    }

    /// Start a fresh run. The high score and RNG stream carry over.
    pub fn reset(&mut self, species: &SpeciesTable) {
        self.phase = GamePhase::Running;
        self.grace_timer = 0.0;
        self.score = 0;
        self.time_ticks = 0;
        self.spawn.advance(species);
        self.events.push(GameEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::physics::BodyHandle;

    const DT: f32 = 1.0 / 60.0;
    const GRACE: f32 = 2.0;

    fn state(high_score: u64) -> GameState {
        GameState::new(5, high_score, &SpeciesTable::default())
    }

    fn ticks(seconds: f32) -> usize {
        (seconds / DT).round() as usize
    }

    #[test]
    fn test_short_breach_never_ends_run() {
        let mut s = state(0);
        let mut store = MemoryStore::new(0);

        for _ in 0..ticks(1.5) {
            s.judge_over_line(true, DT, GRACE, &mut store);
        }
        assert_eq!(s.phase, GamePhase::OverLineGrace);

        s.judge_over_line(false, DT, GRACE, &mut store);
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.grace_timer, 0.0);

        // Timer restarted from zero: another 1.5s is still safe
        for _ in 0..ticks(1.5) {
            s.judge_over_line(true, DT, GRACE, &mut store);
        }
        assert_eq!(s.phase, GamePhase::OverLineGrace);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_sustained_breach_ends_run_once() {
        let mut s = state(10);
        s.score = 50;
        let mut store = MemoryStore::new(10);

        for _ in 0..ticks(3.0) {
            s.judge_over_line(true, DT, GRACE, &mut store);
        }
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.high_score, 50);
        assert_eq!(store.saves(), 1);
        assert_eq!(store.value(), 50);

        let over_events = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(over_events, 1);

        // Frozen once over
        s.judge_over_line(false, DT, GRACE, &mut store);
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_lower_score_does_not_persist() {
        let mut s = state(100);
        s.score = 40;
        let mut store = MemoryStore::new(100);
        for _ in 0..ticks(3.0) {
            s.judge_over_line(true, DT, GRACE, &mut store);
        }
        assert!(s.is_over());
        assert_eq!(s.high_score, 100);
        assert_eq!(store.saves(), 0);
        assert!(s.drain_events().contains(&GameEvent::GameOver {
            score: 40,
            new_high_score: false
        }));
    }

    #[test]
    fn test_entering_grace_starts_at_zero() {
        let mut s = state(0);
        let mut store = MemoryStore::new(0);
        s.judge_over_line(true, DT, GRACE, &mut store);
        assert_eq!(s.phase, GamePhase::OverLineGrace);
        assert_eq!(s.grace_timer, 0.0);
        s.judge_over_line(true, DT, GRACE, &mut store);
        assert_eq!(s.grace_timer, DT);
    }

    #[test]
    fn test_game_over_needs_timer_past_grace() {
        let mut s = state(0);
        let mut store = MemoryStore::new(0);
        let dt = 0.5;

        // Enter grace at 0, then four ticks bring the timer to exactly 2.0
        for _ in 0..5 {
            s.judge_over_line(true, dt, GRACE, &mut store);
        }
        assert_eq!(s.grace_timer, GRACE);
        assert_eq!(s.phase, GamePhase::OverLineGrace);

        s.judge_over_line(true, dt, GRACE, &mut store);
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_clear_events_drops_backlog() {
        let mut s = state(0);
        s.push_event(GameEvent::GraceStarted);
        s.push_event(GameEvent::GraceCleared);
        s.clear_events();
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let table = SpeciesTable::default();
        let mut s = state(300);
        s.score = 120;
        s.phase = GamePhase::GameOver;
        s.grace_timer = 2.5;
        s.time_ticks = 900;

        s.reset(&table);

        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert_eq!(s.time_ticks, 0);
        assert_eq!(s.grace_timer, 0.0);
        assert_eq!(s.high_score, 300);
        assert!(s.next_spawn_species().0 < 3);
    }

    #[test]
    fn test_any_above_line_uses_top_edge() {
        let token = |y: f32, radius: f32| Token {
            handle: BodyHandle(1),
            species: SpeciesId(0),
            position: Vec2::new(300.0, y),
            radius,
        };
        assert!(!any_above_line(&[token(200.0, 40.0)], 150.0));
        assert!(any_above_line(&[token(180.0, 40.0)], 150.0));
        assert!(!any_above_line(&[], 150.0));
    }

    #[test]
    fn test_record_merge_adds_points() {
        let mut s = state(0);
        let merge = Merge {
            consumed: SpeciesId(0),
            produced: SpeciesId(1),
            position: Vec2::ZERO,
            points: 20,
        };
        s.record_merge(&merge);
        s.record_merge(&merge);
        assert_eq!(s.score, 40);
        assert_eq!(s.drain_events().len(), 2);
        assert!(s.drain_events().is_empty());
    }
}
