//! DOM renderer: every entity is an absolutely positioned `<div>` in the game container
//!
//! Effects are CSS classes (`appear`, `flash`, `vanish`, `bounce`) animated by the stylesheet.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{Effect, Hud, Renderer, Sprite, SpriteKind, VisualId};
use super::{pokedex_label, target_image, thrower_image};

pub struct DomRenderer {
    document: Document,
    container: HtmlElement,
    thrower: Option<HtmlElement>,
    elements: HashMap<VisualId, HtmlElement>,
    next_visual: u32,
    /// Skip the capture flash
    reduced_motion: bool,
}

impl DomRenderer {
    /// Attach to `#game-container` (and `#thrower-sprite` if present)
    pub fn new(document: Document, reduced_motion: bool) -> Option<Self> {
        let container = document
            .get_element_by_id("game-container")?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let thrower = document
            .get_element_by_id("thrower-sprite")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if thrower.is_none() {
            log::warn!("No #thrower-sprite element, thrower animation disabled");
        }
        Some(Self {
            document,
            container,
            thrower,
            elements: HashMap::new(),
            next_visual: 1,
            reduced_motion,
        })
    }

    fn create_div(&self, class: &str) -> Option<HtmlElement> {
        let el = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        el.set_class_name(class);
        Some(el)
    }

    fn create_img(&self, src: &str, alt: &str) -> Option<Element> {
        let img = self.document.create_element("img").ok()?;
        let _ = img.set_attribute("src", src);
        let _ = img.set_attribute("alt", alt);
        let _ = img.set_attribute("style", "width: 100%; height: 100%");
        Some(img)
    }
}

fn place(el: &HtmlElement, pos: Vec2) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{}px", pos.x));
    let _ = style.set_property("top", &format!("{}px", pos.y));
}

impl Renderer for DomRenderer {
    fn show(&mut self, sprite: &Sprite) -> Option<VisualId> {
        let el = match &sprite.kind {
            SpriteKind::Target { name } => {
                let el = self.create_div("pokemon")?;
                let img = self.create_img(&target_image(name), name)?;
                let _ = el.append_child(&img);
                el
            }
            SpriteKind::Projectile => self.create_div("pokeball")?,
        };

        place(&el, sprite.pos);
        let style = el.style();
        let _ = style.set_property("width", &format!("{}px", sprite.size.x));
        let _ = style.set_property("height", &format!("{}px", sprite.size.y));

        if self.container.append_child(&el).is_err() {
            log::warn!("Failed to attach sprite {:?}", sprite.kind);
            return None;
        }

        let id = VisualId(self.next_visual);
        self.next_visual += 1;
        self.elements.insert(id, el);
        Some(id)
    }

    fn move_to(&mut self, visual: VisualId, pos: Vec2) {
        if let Some(el) = self.elements.get(&visual) {
            place(el, pos);
        }
    }

    fn play_effect(&mut self, visual: VisualId, effect: Effect) {
        let Some(el) = self.elements.get(&visual) else {
            return;
        };
        let class = match effect {
            Effect::Appear => "appear",
            Effect::Flash if self.reduced_motion => return,
            Effect::Flash => "flash",
            Effect::Vanish => "vanish",
            Effect::Bounce => "bounce",
        };
        let _ = el.class_list().add_1(class);
    }

    fn remove(&mut self, visual: VisualId) {
        if let Some(el) = self.elements.remove(&visual) {
            el.remove();
        }
    }

    fn set_thrower_frame(&mut self, frame: u8) {
        if let Some(thrower) = &self.thrower {
            let _ = thrower.style().set_property(
                "background-image",
                &format!("url('{}')", thrower_image(frame)),
            );
        }
    }

    fn set_backdrop(&mut self, level: usize) {
        self.container.set_class_name(&format!("level-{}", level));
    }
}

/// `#pokedex-counter` text and the `#win-modal` overlay
pub struct DomHud {
    counter: Option<Element>,
    win_modal: Option<Element>,
}

impl DomHud {
    pub fn new(document: &Document) -> Self {
        Self {
            counter: document.get_element_by_id("pokedex-counter"),
            win_modal: document.get_element_by_id("win-modal"),
        }
    }
}

impl Hud for DomHud {
    fn update_pokedex(&mut self, captured: usize, total: usize) {
        if let Some(el) = &self.counter {
            el.set_text_content(Some(&pokedex_label(captured, total)));
        }
    }

    fn show_victory(&mut self) {
        if let Some(el) = &self.win_modal {
            let _ = el.class_list().remove_1("hidden");
        }
    }

    fn hide_victory(&mut self) {
        if let Some(el) = &self.win_modal {
            let _ = el.class_list().add_1("hidden");
        }
    }
}
