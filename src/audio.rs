//! Sound cues and background music
//!
//! The game only names what should be heard; [`AudioPlayer`] implementations
//! decide how. On the web the [`AudioManager`] plays the stock mp3 files
//! through `<audio>` elements.

use crate::renderer::Headless;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Pokeball leaves the hand
    Throw,
    /// Creature caught
    Capture,
}

impl AudioCue {
    pub fn file(self) -> &'static str {
        match self {
            AudioCue::Throw => "./audio/throw.mp3",
            AudioCue::Capture => "./audio/capture.mp3",
        }
    }

    /// Mix level before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            AudioCue::Throw => 0.08,
            AudioCue::Capture => 0.08,
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Title screen
    Menu,
    /// In game
    Level,
}

impl MusicTrack {
    pub fn file(self) -> &'static str {
        match self {
            MusicTrack::Menu => "./audio/littleroot.mp3",
            MusicTrack::Level => "./audio/route101.mp3",
        }
    }

    pub fn base_volume(self) -> f32 {
        match self {
            MusicTrack::Menu => 0.05,
            MusicTrack::Level => 0.01,
        }
    }
}

/// Plays cues and music
pub trait AudioPlayer {
    fn play_cue(&mut self, cue: AudioCue);
    /// Switch to `track` from the start, stopping any other track
    fn play_music(&mut self, track: MusicTrack);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
}

impl AudioPlayer for Headless {
    fn play_cue(&mut self, _cue: AudioCue) {}
    fn play_music(&mut self, _track: MusicTrack) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::HtmlAudioElement;

    use super::{AudioCue, AudioPlayer, MusicTrack};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        throw: Option<HtmlAudioElement>,
        capture: Option<HtmlAudioElement>,
        menu: Option<HtmlAudioElement>,
        level: Option<HtmlAudioElement>,
        current: Option<MusicTrack>,
        settings: Settings,
    }

    fn load(src: &str, volume: f32, looping: bool) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(src) {
            Ok(el) => {
                el.set_volume(volume as f64);
                el.set_loop(looping);
                Some(el)
            }
            Err(_) => {
                log::warn!("Failed to create audio element for {}", src);
                None
            }
        }
    }

    /// Restart from the beginning; autoplay may be blocked until a user gesture
    fn restart(el: &HtmlAudioElement) {
        el.set_current_time(0.0);
        if el.play().is_err() {
            log::info!("Autoplay blocked by the browser");
        }
    }

    impl AudioManager {
        pub fn new(settings: Settings) -> Self {
            Self {
                throw: load(AudioCue::Throw.file(), settings.cue_volume(AudioCue::Throw), false),
                capture: load(
                    AudioCue::Capture.file(),
                    settings.cue_volume(AudioCue::Capture),
                    false,
                ),
                menu: load(MusicTrack::Menu.file(), settings.track_volume(MusicTrack::Menu), true),
                level: load(
                    MusicTrack::Level.file(),
                    settings.track_volume(MusicTrack::Level),
                    true,
                ),
                current: None,
                settings,
            }
        }

        fn cue_element(&self, cue: AudioCue) -> Option<&HtmlAudioElement> {
            match cue {
                AudioCue::Throw => self.throw.as_ref(),
                AudioCue::Capture => self.capture.as_ref(),
            }
        }

        fn track_element(&self, track: MusicTrack) -> Option<&HtmlAudioElement> {
            match track {
                MusicTrack::Menu => self.menu.as_ref(),
                MusicTrack::Level => self.level.as_ref(),
            }
        }
    }

    impl AudioPlayer for AudioManager {
        fn play_cue(&mut self, cue: AudioCue) {
            if self.settings.muted {
                return;
            }
            if let Some(el) = self.cue_element(cue) {
                restart(el);
            }
        }

        fn play_music(&mut self, track: MusicTrack) {
            if let Some(current) = self.current.filter(|t| *t != track) {
                if let Some(el) = self.track_element(current) {
                    let _ = el.pause();
                }
            }
            self.current = Some(track);
            if self.settings.muted {
                return;
            }
            if let Some(el) = self.track_element(track) {
                restart(el);
            }
        }

        fn pause_music(&mut self) {
            if let Some(el) = self.current.and_then(|t| self.track_element(t)) {
                if !el.paused() {
                    let _ = el.pause();
                }
            }
        }

        fn resume_music(&mut self) {
            if self.settings.muted {
                return;
            }
            if let Some(el) = self.current.and_then(|t| self.track_element(t)) {
                let _ = el.play();
            }
        }
    }
}
