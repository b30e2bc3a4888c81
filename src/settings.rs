//! Presentation preferences
//!
//! Kept apart from [`crate::Tuning`]: nothing here changes how the game plays.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioCue, MusicTrack};

/// Player-facing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Pause music while the tab is hidden
    pub mute_on_hidden: bool,

    // === Accessibility ===
    /// Reduced motion (no capture flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            mute_on_hidden: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective volume for a sound effect
    pub fn cue_volume(&self, cue: AudioCue) -> f32 {
        self.scaled(self.sfx_volume, cue.base_volume())
    }

    /// Effective volume for a music track
    pub fn track_volume(&self, track: MusicTrack) -> f32 {
        self.scaled(self.music_volume, track.base_volume())
    }

    fn scaled(&self, channel: f32, base: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume.clamp(0.0, 1.0) * channel.clamp(0.0, 1.0) * base).clamp(0.0, 1.0)
        }
    }
}
