//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{first_hit, out_of_bounds, projectile_hits_target};
pub use placement::{Placed, Placement};
pub use state::{
    CaptureEffect, GameEvent, GamePhase, GameState, Projectile, ProjectileOutcome,
    ProjectileState, Target, ThrowAnimation,
};
pub use tick::{TickInput, tick};
