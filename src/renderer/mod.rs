//! Presentation contracts
//!
//! The simulation never owns a visual. The controller turns simulation events
//! into calls on these traits and keeps the entity -> visual mapping itself.
//! A renderer may decline to show something (`show` returns `None`); every
//! later call for that entity is then skipped.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomHud, DomRenderer};

use glam::Vec2;

/// Handle to something a renderer is displaying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u32);

/// What a sprite depicts
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteKind {
    Target { name: String },
    Projectile,
}

/// Everything needed to put an entity on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left corner in arena coordinates
    pub pos: Vec2,
    pub size: Vec2,
}

/// Transient effects; renderers play them on their own clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fade/scale in after spawning
    Appear,
    /// Bright flash on capture
    Flash,
    /// Scale to nothing
    Vanish,
    /// Pokeball wobble after a catch
    Bounce,
}

/// Draws entities, the thrower and the level backdrop
pub trait Renderer {
    fn show(&mut self, sprite: &Sprite) -> Option<VisualId>;
    fn move_to(&mut self, visual: VisualId, pos: Vec2);
    fn play_effect(&mut self, visual: VisualId, effect: Effect);
    fn remove(&mut self, visual: VisualId);
    /// Thrower sprite frame (1 = idle)
    fn set_thrower_frame(&mut self, frame: u8);
    fn set_backdrop(&mut self, level: usize);
}

/// Pokedex counter and win screen
pub trait Hud {
    fn update_pokedex(&mut self, captured: usize, total: usize);
    fn show_victory(&mut self);
    fn hide_victory(&mut self);
}

/// No presentation at all (tests, native autoplay)
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Renderer for Headless {
    fn show(&mut self, _sprite: &Sprite) -> Option<VisualId> {
        None
    }
    fn move_to(&mut self, _visual: VisualId, _pos: Vec2) {}
    fn play_effect(&mut self, _visual: VisualId, _effect: Effect) {}
    fn remove(&mut self, _visual: VisualId) {}
    fn set_thrower_frame(&mut self, _frame: u8) {}
    fn set_backdrop(&mut self, _level: usize) {}
}

impl Hud for Headless {
    fn update_pokedex(&mut self, _captured: usize, _total: usize) {}
    fn show_victory(&mut self) {}
    fn hide_victory(&mut self) {}
}

/// Pokedex counter text, e.g. `Pokédex: 3/9`
pub fn pokedex_label(captured: usize, total: usize) -> String {
    format!("Pokédex: {}/{}", captured, total)
}

/// Image path for a target sprite
pub fn target_image(name: &str) -> String {
    format!("./img/{}.png", name.to_lowercase())
}

/// Image path for a thrower frame
pub fn thrower_image(frame: u8) -> String {
    format!("./img/sprite-{}.png", frame)
}
