//! Game controller
//!
//! Owns the session state and the presentation collaborators. Input handlers
//! hold a handle to the `Game` and call into it; the controller runs the
//! simulation and forwards the resulting events to the renderer, HUD and audio.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::audio::{AudioCue, AudioPlayer, MusicTrack};
use crate::consts::MAX_SUBSTEPS;
use crate::renderer::{Effect, Headless, Hud, Renderer, Sprite, SpriteKind, VisualId};
use crate::sim::{CaptureEffect, GameEvent, GameState, ProjectileOutcome, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator will catch up on (ms)
const MAX_FRAME_MS: f32 = 100.0;

/// Game instance holding all state
pub struct Game {
    state: GameState,
    renderer: Box<dyn Renderer>,
    hud: Box<dyn Hud>,
    audio: Box<dyn AudioPlayer>,
    /// Entity id -> visual, only for entities the renderer agreed to show
    visuals: BTreeMap<u32, VisualId>,
    accumulator_ms: f32,
    input: TickInput,
}

impl Game {
    /// New headless session; attach collaborators with the `with_*` builders
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(tuning, seed),
            renderer: Box::new(Headless),
            hud: Box::new(Headless),
            audio: Box::new(Headless),
            visuals: BTreeMap::new(),
            accumulator_ms: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_hud(mut self, hud: impl Hud + 'static) -> Self {
        self.hud = Box::new(hud);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioPlayer + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioPlayer {
        self.audio.as_mut()
    }

    // === Operations ===

    /// Respawn the targets of level `index`
    pub fn start_level(&mut self, index: usize) {
        self.state.start_level(index);
        self.present();
    }

    /// Throw toward `aim` right away. Ignored (returns false) while a throw is in flight.
    pub fn request_throw(&mut self, aim: Vec2) -> bool {
        let accepted = self.state.request_throw(aim);
        self.present();
        accepted
    }

    /// Apply the outcome of a throw resolved outside the simulation tick
    pub fn on_projectile_resolved(&mut self, outcome: ProjectileOutcome) {
        self.state.resolve_projectile(outcome);
        self.present();
    }

    /// Back to level 0 with an empty pokedex
    pub fn restart(&mut self) {
        self.state.restart();
        self.accumulator_ms = 0.0;
        self.present();
    }

    // === Input queue (applied on the next tick) ===

    pub fn queue_throw(&mut self, aim: Vec2) {
        self.input.aim = Some(aim);
    }

    pub fn queue_restart(&mut self) {
        self.input.restart = true;
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    // === Time ===

    /// Run one fixed step
    pub fn step(&mut self) {
        let input = self.input.clone();
        tick(&mut self.state, &input);

        // Clear one-shot inputs after processing
        self.input.aim = None;
        self.input.restart = false;

        self.present();
    }

    /// Run as many fixed steps as `elapsed_ms` of wall time covers. Returns the step count.
    pub fn update(&mut self, elapsed_ms: f32) -> u32 {
        let step_ms = self.state.tuning.step_ms;
        self.accumulator_ms += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator_ms >= step_ms && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator_ms -= step_ms;
            substeps += 1;
        }
        substeps
    }

    // === Presentation ===

    /// Forward all pending simulation events to the collaborators
    pub fn present(&mut self) {
        for event in self.state.drain_events() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::LevelStarted { level } => self.renderer.set_backdrop(level),
            GameEvent::TargetSpawned {
                id,
                name,
                pos,
                size,
            } => {
                let sprite = Sprite {
                    kind: SpriteKind::Target { name },
                    pos,
                    size,
                };
                if let Some(visual) = self.show(id, &sprite) {
                    self.renderer.play_effect(visual, Effect::Appear);
                }
            }
            GameEvent::ThrowerFrame { frame } => self.renderer.set_thrower_frame(frame),
            GameEvent::ProjectileLaunched { id, pos, radius } => {
                let sprite = Sprite {
                    kind: SpriteKind::Projectile,
                    pos,
                    size: Vec2::splat(radius * 2.0),
                };
                self.show(id, &sprite);
                self.audio.play_cue(AudioCue::Throw);
            }
            GameEvent::ProjectileMoved { id, pos } => {
                if let Some(&visual) = self.visuals.get(&id) {
                    self.renderer.move_to(visual, pos);
                }
            }
            GameEvent::TargetCaptured { .. } => self.audio.play_cue(AudioCue::Capture),
            GameEvent::Effect { id, effect } => {
                let Some(&visual) = self.visuals.get(&id) else {
                    return;
                };
                match effect {
                    CaptureEffect::Vanish => {
                        self.renderer.play_effect(visual, Effect::Flash);
                        self.renderer.play_effect(visual, Effect::Vanish);
                    }
                    CaptureEffect::Bounce => self.renderer.play_effect(visual, Effect::Bounce),
                }
            }
            GameEvent::Despawn { id } => {
                if let Some(visual) = self.visuals.remove(&id) {
                    self.renderer.remove(visual);
                }
            }
            GameEvent::PokedexChanged { captured, total } => {
                self.hud.update_pokedex(captured, total)
            }
            GameEvent::Victory => self.hud.show_victory(),
            GameEvent::Restarted => {
                self.hud.hide_victory();
                self.audio.play_music(MusicTrack::Level);
            }
            GameEvent::ProjectileMissed { .. } | GameEvent::LevelCleared { .. } => {}
        }
    }

    fn show(&mut self, id: u32, sprite: &Sprite) -> Option<VisualId> {
        let visual = self.renderer.show(sprite)?;
        self.visuals.insert(id, visual);
        Some(visual)
    }
}
