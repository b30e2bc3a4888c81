//! Data-driven game balance
//!
//! Every number the simulation depends on lives in [`Tuning`], defaulting to
//! [`crate::consts`]. A JSON document may override any subset of fields.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error raised while loading or validating a [`Tuning`]
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// No levels are configured
    NoLevels,
    /// A level has no targets, so it could never be cleared
    EmptyLevel { index: usize },
    /// A dimension, delay or count that must be positive is not
    NonPositive { name: &'static str, value: f32 },
    /// The projectile is released on a frame the animation never reaches
    ReleaseFrameOutOfRange { release_frame: u8, frames: u8 },
    /// The placement area (arena minus footprint and margins) is empty
    ArenaTooSmall { width: f32, height: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {e}"),
            TuningError::NoLevels => write!(f, "at least one level is required"),
            TuningError::EmptyLevel { index } => write!(f, "level {index} has no targets"),
            TuningError::NonPositive { name, value } => {
                write!(f, "{name} must be positive (got {value})")
            }
            TuningError::ReleaseFrameOutOfRange {
                release_frame,
                frames,
            } => write!(
                f,
                "release frame {release_frame} is outside the animation (1..={frames})"
            ),
            TuningError::ArenaTooSmall { width, height } => write!(
                f,
                "arena {width}x{height} leaves no room to place a target"
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Game balance and level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Vertical line below which a projectile counts as lost
    pub escape_height: f32,

    // === Placement ===
    pub target_size: f32,
    pub placement_margin: f32,
    pub min_separation: f32,
    pub placement_attempts: u32,

    // === Throw physics ===
    pub launch_origin: Vec2,
    pub flight_steps: f32,
    pub arc_lift: f32,
    pub gravity: f32,
    pub projectile_radius: f32,

    // === Timing (milliseconds) ===
    pub step_ms: f32,
    pub throw_frame_ms: f32,
    pub throw_frames: u8,
    pub release_frame: u8,
    pub capture_removal_ms: f32,
    pub projectile_bounce_ms: f32,
    pub level_clear_delay_ms: f32,

    /// Target names per level, in play order
    pub levels: Vec<Vec<String>>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            escape_height: ESCAPE_HEIGHT,

            target_size: TARGET_SIZE,
            placement_margin: PLACEMENT_MARGIN,
            min_separation: MIN_SEPARATION,
            placement_attempts: PLACEMENT_ATTEMPTS,

            launch_origin: Vec2::new(LAUNCH_ORIGIN.0, LAUNCH_ORIGIN.1),
            flight_steps: FLIGHT_STEPS,
            arc_lift: ARC_LIFT,
            gravity: GRAVITY,
            projectile_radius: PROJECTILE_RADIUS,

            step_ms: SIM_STEP_MS,
            throw_frame_ms: THROW_FRAME_MS,
            throw_frames: THROW_FRAMES,
            release_frame: RELEASE_FRAME,
            capture_removal_ms: CAPTURE_REMOVAL_MS,
            projectile_bounce_ms: PROJECTILE_BOUNCE_MS,
            level_clear_delay_ms: LEVEL_CLEAR_DELAY_MS,

            levels: default_levels(),
        }
    }
}

/// The three routes of the stock game: starters, common, forest
fn default_levels() -> Vec<Vec<String>> {
    [
        ["Torchic", "Treecko", "Mudkip"],
        ["Poochyena", "Zigzagoon", "Wurmple"],
        ["Seedot", "Shroomish", "Slakoth"],
    ]
    .iter()
    .map(|level| level.iter().map(|name| name.to_string()).collect())
    .collect()
}

impl Tuning {
    /// Default tuning with a custom level list
    pub fn with_levels<L, N>(levels: L) -> Self
    where
        L: IntoIterator<Item = N>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            levels: levels
                .into_iter()
                .map(|names| names.into_iter().map(Into::into).collect())
                .collect(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the configuration can produce a playable session
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.levels.is_empty() {
            return Err(TuningError::NoLevels);
        }
        if let Some(index) = self.levels.iter().position(Vec::is_empty) {
            return Err(TuningError::EmptyLevel { index });
        }

        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("escape_height", self.escape_height),
            ("target_size", self.target_size),
            ("flight_steps", self.flight_steps),
            ("projectile_radius", self.projectile_radius),
            ("step_ms", self.step_ms),
            ("throw_frame_ms", self.throw_frame_ms),
        ];
        for (name, value) in positive {
            // Written as a negated comparison so NaN is rejected too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        if self.release_frame == 0 || self.release_frame > self.throw_frames {
            return Err(TuningError::ReleaseFrameOutOfRange {
                release_frame: self.release_frame,
                frames: self.throw_frames,
            });
        }

        let room = self.target_size + 2.0 * self.placement_margin;
        if self.arena_width < room || self.arena_height < room {
            return Err(TuningError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
            });
        }

        Ok(())
    }

    /// Number of fixed steps covering `ms` (rounded up)
    pub fn ticks_for(&self, ms: f32) -> u32 {
        if ms <= 0.0 {
            0
        } else {
            (ms / self.step_ms).ceil() as u32
        }
    }

    /// Total target count across all levels (duplicated names count every time)
    pub fn total_targets(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Initial velocity for a throw from the launch origin toward `aim`
    pub fn launch_velocity(&self, aim: Vec2) -> Vec2 {
        let delta = (aim - self.launch_origin) / self.flight_steps;
        Vec2::new(delta.x, delta.y - self.arc_lift)
    }

    /// Aim point that makes a throw pass through `point` after `flight_steps` steps.
    ///
    /// With explicit Euler integration the projectile ends up
    /// `g·N(N-1)/2 - K·N` below the naive aim point; this cancels that drop.
    pub fn aim_for(&self, point: Vec2) -> Vec2 {
        let n = self.flight_steps;
        let drop = self.gravity * n * (n - 1.0) / 2.0 - self.arc_lift * n;
        Vec2::new(point.x, point.y - drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.levels.len(), 3);
        assert_eq!(tuning.total_targets(), 9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.75, "levels": [["A", "B"], ["C"]] }"#)
            .expect("valid tuning");
        assert_eq!(tuning.gravity, 0.75);
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
        assert_eq!(tuning.total_targets(), 3);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "levels": [] }"#),
            Err(TuningError::NoLevels)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "levels": [["A"], []] }"#),
            Err(TuningError::EmptyLevel { index: 1 })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "release_frame": 6 }"#),
            Err(TuningError::ReleaseFrameOutOfRange { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "arena_width": 90.0 }"#),
            Err(TuningError::ArenaTooSmall { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "step_ms": 0.0 }"#),
            Err(TuningError::NonPositive { name: "step_ms", .. })
        ));
    }

    #[test]
    fn test_ticks_for_rounds_up() {
        let tuning = Tuning::default();
        assert_eq!(tuning.ticks_for(1000.0), 50);
        assert_eq!(tuning.ticks_for(95.0), 5);
        assert_eq!(tuning.ticks_for(0.0), 0);
    }

    #[test]
    fn test_launch_velocity_formula() {
        let tuning = Tuning::default();
        let vel = tuning.launch_velocity(Vec2::new(100.0, 250.0));
        assert!((vel.x - (100.0 - 780.0) / 30.0).abs() < 1e-4);
        assert!((vel.y - ((250.0 - 20.0) / 30.0 - 5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_aim_for_cancels_drop() {
        let tuning = Tuning::default();
        // 0.5 * 30 * 29 / 2 - 5 * 30 = 67.5
        let aim = tuning.aim_for(Vec2::new(200.0, 150.0));
        assert_eq!(aim.x, 200.0);
        assert!((aim.y - 82.5).abs() < 1e-4);
    }
}
