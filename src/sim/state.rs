//! Game state and core simulation types
//!
//! Entity data only: presentation handles never live here. Everything the
//! presentation layer needs to know is published as a [`GameEvent`].

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Targets are live and can be captured
    Playing,
    /// Last target captured, its removal animation is still running
    Clearing,
    /// Between levels, waiting for the clearing delay to elapse
    Advancing,
    /// Every level cleared; only a restart leaves this phase
    Victory,
}

/// A capturable creature, fixed in place for the level it was spawned in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub name: String,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
}

impl Target {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Projectile lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Spawned this tick, not yet integrated
    Launching,
    InFlight,
    Captured,
    OutOfBounds,
}

impl ProjectileState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectileState::Captured | ProjectileState::OutOfBounds)
    }
}

/// The thrown pokeball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: ProjectileState,
}

impl Projectile {
    /// Create a projectile at the launch origin aimed at `aim`
    pub fn aimed(id: u32, aim: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            pos: tuning.launch_origin,
            vel: tuning.launch_velocity(aim),
            radius: tuning.projectile_radius,
            state: ProjectileState::Launching,
        }
    }

    /// Advance one fixed step (explicit Euler: position first, then gravity)
    pub fn integrate(&mut self, gravity: f32) {
        if self.state.is_terminal() {
            return;
        }
        self.state = ProjectileState::InFlight;
        self.pos += self.vel;
        self.vel.y += gravity;
    }
}

/// How a throw ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    Hit { target_id: u32 },
    Missed,
}

/// Thrower sprite animation; the projectile is released part way through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowAnimation {
    /// Current frame (1-based)
    pub frame: u8,
    /// Time spent on the current frame
    pub elapsed_ms: f32,
    pub aim: Vec2,
    /// Whether the projectile has left the hand (or the throw was cancelled)
    pub released: bool,
}

impl ThrowAnimation {
    pub fn new(aim: Vec2) -> Self {
        Self {
            frame: 1,
            elapsed_ms: 0.0,
            aim,
            released: false,
        }
    }
}

/// A visual waiting for its cosmetic animation before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDespawn {
    pub id: u32,
    pub ticks_left: u32,
}

/// Cosmetic effects attached to a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEffect {
    /// Target flashes bright, then scales to nothing
    Vanish,
    /// Projectile bounces in place
    Bounce,
}

/// Things that happened during a simulation step, for presentation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted {
        level: usize,
    },
    TargetSpawned {
        id: u32,
        name: String,
        pos: Vec2,
        size: Vec2,
    },
    /// Thrower sprite frame changed (1 = idle)
    ThrowerFrame {
        frame: u8,
    },
    ProjectileLaunched {
        id: u32,
        pos: Vec2,
        radius: f32,
    },
    ProjectileMoved {
        id: u32,
        pos: Vec2,
    },
    TargetCaptured {
        target_id: u32,
        projectile_id: Option<u32>,
        name: String,
        /// First time this name enters the pokedex
        new_entry: bool,
    },
    ProjectileMissed {
        id: u32,
    },
    Effect {
        id: u32,
        effect: CaptureEffect,
    },
    /// Stop displaying an entity
    Despawn {
        id: u32,
    },
    PokedexChanged {
        captured: usize,
        total: usize,
    },
    LevelCleared {
        level: usize,
    },
    Victory,
    Restarted,
}

/// Complete session state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Current level index (0-based)
    pub level_index: usize,
    pub phase: GamePhase,
    /// Ticks remaining in a timed phase (Clearing/Advancing)
    pub phase_ticks: u32,
    /// Live targets of the current level, in spawn order
    pub targets: Vec<Target>,
    /// Unique names captured this session
    pub captured: BTreeSet<String>,
    /// Single outstanding throw guard
    pub throw_in_flight: bool,
    pub throw_anim: Option<ThrowAnimation>,
    pub projectile: Option<Projectile>,
    pub pending_despawns: Vec<PendingDespawn>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Throws and captures in the current level
    pub level_throws: u32,
    pub level_captures: u32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session and spawn the first level
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level_index: 0,
            phase: GamePhase::Playing,
            phase_ticks: 0,
            targets: Vec::new(),
            captured: BTreeSet::new(),
            throw_in_flight: false,
            throw_anim: None,
            projectile: None,
            pending_despawns: Vec::new(),
            time_ticks: 0,
            level_throws: 0,
            level_captures: 0,
            events: Vec::new(),
            next_id: 1,
        };

        if state.tuning.levels.is_empty() {
            log::warn!("No levels configured, nothing to play");
            state.phase = GamePhase::Victory;
        } else {
            state.start_level(0);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level_count(&self) -> usize {
        self.tuning.levels.len()
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    pub fn total_targets(&self) -> usize {
        self.tuning.total_targets()
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn emit_pokedex(&mut self) {
        let event = GameEvent::PokedexChanged {
            captured: self.captured_count(),
            total: self.total_targets(),
        };
        self.emit(event);
    }

    /// Schedule a cosmetic removal `ms` from now
    pub(crate) fn despawn_after(&mut self, id: u32, ms: f32) {
        let ticks_left = self.tuning.ticks_for(ms);
        if ticks_left == 0 {
            self.emit(GameEvent::Despawn { id });
        } else {
            self.pending_despawns.push(PendingDespawn { id, ticks_left });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_spawns_first_level() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.targets.len(), 3);
        assert!(!state.throw_in_flight);
        assert_eq!(state.captured_count(), 0);
        assert_eq!(state.total_targets(), 9);
    }

    #[test]
    fn test_new_without_levels_is_over() {
        let state = GameState::new(Tuning::with_levels(Vec::<Vec<String>>::new()), 7);
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_projectile_integrates_position_then_gravity() {
        let tuning = Tuning::default();
        let mut p = Projectile::aimed(1, Vec2::new(100.0, 250.0), &tuning);
        assert_eq!(p.state, ProjectileState::Launching);
        let v0 = p.vel;

        p.integrate(tuning.gravity);
        assert_eq!(p.state, ProjectileState::InFlight);
        assert!((p.pos.x - (780.0 + v0.x)).abs() < 1e-4);
        assert!((p.pos.y - (20.0 + v0.y)).abs() < 1e-4);
        assert!((p.vel.y - (v0.y + 0.5)).abs() < 1e-4);
        assert_eq!(p.vel.x, v0.x);

        p.integrate(tuning.gravity);
        assert!((p.pos.y - (20.0 + v0.y + (v0.y + 0.5))).abs() < 1e-4);
    }

    #[test]
    fn test_terminal_projectile_does_not_move() {
        let tuning = Tuning::default();
        let mut p = Projectile::aimed(1, Vec2::new(100.0, 250.0), &tuning);
        p.state = ProjectileState::Captured;
        p.integrate(tuning.gravity);
        assert_eq!(p.pos, tuning.launch_origin);
    }
}
