//! Pokeball Toss - A browser arcade capture game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectile physics, placement, level progression)
//! - `game`: Controller that drives the simulation and forwards events to presentation
//! - `renderer`: Renderer/HUD contracts plus the DOM renderer used on the web
//! - `audio`: Sound cue contract plus the `<audio>` backed player used on the web
//! - `tuning`: Data-driven game balance and level lists

pub mod audio;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation step in milliseconds (one physics integration per step)
    pub const SIM_STEP_MS: f32 = 20.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 300.0;
    /// Projectiles are only discarded once they fall past this line (below the arena floor)
    pub const ESCAPE_HEIGHT: f32 = 400.0;

    /// Target placement
    pub const TARGET_SIZE: f32 = 80.0;
    pub const PLACEMENT_MARGIN: f32 = 10.0;
    pub const MIN_SEPARATION: f32 = 80.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 100;

    /// Throw origin, just right of the thrower sprite's hand
    pub const LAUNCH_ORIGIN: (f32, f32) = (780.0, 20.0);
    /// Steps a throw takes to cover the horizontal distance to the aim point
    pub const FLIGHT_STEPS: f32 = 30.0;
    /// Upward bias added to the initial vertical velocity so every throw arcs
    pub const ARC_LIFT: f32 = 5.0;
    /// Gravity (units per step²)
    pub const GRAVITY: f32 = 0.5;
    pub const PROJECTILE_RADIUS: f32 = 15.0;

    /// Thrower animation
    pub const THROW_FRAME_MS: f32 = 95.0;
    pub const THROW_FRAMES: u8 = 5;
    pub const RELEASE_FRAME: u8 = 4;

    /// Cosmetic delays
    pub const CAPTURE_REMOVAL_MS: f32 = 600.0;
    pub const PROJECTILE_BOUNCE_MS: f32 = 500.0;
    /// Pause between a level's last capture animation and the next level
    pub const LEVEL_CLEAR_DELAY_MS: f32 = 1000.0;
}
