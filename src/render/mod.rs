//! DOM renderer
//!
//! Pure consumer of simulation snapshots: once per frame it reconciles one
//! absolutely-positioned node per live entity, keyed by entity id, and
//! refreshes the HUD. It never mutates simulation state.
//!
//! Splats are the one collection the simulation never trims - their fade-out
//! is a CSS animation owned entirely by this layer.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::consts::PLAYER_WIDTH;
use crate::sim::{Enemy, EnemySide, FieldSize, GameState, Hazard, HazardKind, PowerUpKind};

const PLAYER_SPRITE: &str = "\u{1F9CD}"; // standing person
const HAZARD_SPRITE: &str = "\u{1F4A9}";
const ENEMY_SPRITE: &str = "\u{1F426}"; // bird
const HEART_SPRITE: &str = "\u{2764}\u{FE0F}";

pub struct DomRenderer {
    document: Document,
    field: HtmlElement,
    player: HtmlElement,
    hazards: HashMap<u32, HtmlElement>,
    splats: HashMap<u32, HtmlElement>,
    power_ups: HashMap<u32, HtmlElement>,
    enemy: Option<(u32, HtmlElement)>,
}

impl DomRenderer {
    /// Attach to the `#game-field` element and create the player node
    pub fn new(document: &Document) -> Option<Self> {
        let field: HtmlElement = document.get_element_by_id("game-field")?.dyn_into().ok()?;

        let player: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        player.set_class_name("player");
        player.set_text_content(Some(PLAYER_SPRITE));
        field.append_child(&player).ok()?;

        Some(Self {
            document: document.clone(),
            field,
            player,
            hazards: HashMap::new(),
            splats: HashMap::new(),
            power_ups: HashMap::new(),
            enemy: None,
        })
    }

    /// Measure the play field. Returns a zero size until layout has settled;
    /// the simulation defers everything for such frames.
    pub fn measure(&self) -> FieldSize {
        let rect = self.field.get_bounding_client_rect();
        FieldSize::new(rect.width() as f32, rect.height() as f32)
    }

    /// Reconcile the DOM against the current snapshot
    pub fn sync(&mut self, state: &GameState) {
        self.sync_hazards(&state.hazards);
        self.sync_splats(state);
        self.sync_power_ups(state);
        self.sync_enemy(state.enemy.as_ref());
        self.sync_player(state);
        self.sync_hud(state);
    }

    /// Remove every entity node (round restart)
    pub fn clear(&mut self) {
        for (_, el) in self.hazards.drain() {
            el.remove();
        }
        for (_, el) in self.splats.drain() {
            el.remove();
        }
        for (_, el) in self.power_ups.drain() {
            el.remove();
        }
        if let Some((_, el)) = self.enemy.take() {
            el.remove();
        }
    }

    fn spawn_node(&self, class: &str, text: &str) -> Option<HtmlElement> {
        let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(class);
        el.set_text_content(Some(text));
        self.field.append_child(&el).ok()?;
        Some(el)
    }

    fn sync_hazards(&mut self, hazards: &[Hazard]) {
        self.hazards.retain(|id, el| {
            let alive = hazards.iter().any(|h| h.id == *id);
            if !alive {
                el.remove();
            }
            alive
        });

        for h in hazards {
            if !self.hazards.contains_key(&h.id) {
                let class = match h.kind {
                    HazardKind::Normal => "hazard normal",
                    HazardKind::Fast => "hazard fast",
                    HazardKind::Big => "hazard big",
                    HazardKind::Mega => "hazard mega",
                };
                if let Some(el) = self.spawn_node(class, HAZARD_SPRITE) {
                    self.hazards.insert(h.id, el);
                }
            }
            if let Some(el) = self.hazards.get(&h.id) {
                let style = el.style();
                style.set_property("left", &format!("{}%", h.pos.x)).ok();
                style.set_property("top", &format!("{}%", h.pos.y)).ok();
                style.set_property("font-size", &format!("{}px", h.size)).ok();
                style
                    .set_property("transform", &format!("rotate({}deg)", h.rotation))
                    .ok();
            }
        }
    }

    fn sync_splats(&mut self, state: &GameState) {
        // Splats only accumulate during a round; position them once and let
        // the CSS fade run
        for s in &state.splats {
            if self.splats.contains_key(&s.id) {
                continue;
            }
            if let Some(el) = self.spawn_node("splat", HAZARD_SPRITE) {
                let style = el.style();
                style.set_property("left", &format!("{}%", s.x)).ok();
                style.set_property("font-size", &format!("{}px", s.size)).ok();
                style
                    .set_property(
                        "transform",
                        &format!("translateX(-50%) rotate({}deg) scaleY(0.4)", s.rotation),
                    )
                    .ok();
                self.splats.insert(s.id, el);
            }
        }
    }

    fn sync_power_ups(&mut self, state: &GameState) {
        self.power_ups.retain(|id, el| {
            let alive = state.power_ups.iter().any(|p| p.id == *id);
            if !alive {
                el.remove();
            }
            alive
        });

        for p in &state.power_ups {
            if !self.power_ups.contains_key(&p.id) {
                let sprite = match p.kind {
                    PowerUpKind::Shield => "\u{2B50}",
                    PowerUpKind::Umbrella => "\u{2602}\u{FE0F}",
                    PowerUpKind::ScoreDoubler => "2\u{FE0F}\u{20E3}",
                };
                if let Some(el) = self.spawn_node("power-up", sprite) {
                    self.power_ups.insert(p.id, el);
                }
            }
            if let Some(el) = self.power_ups.get(&p.id) {
                let style = el.style();
                style.set_property("left", &format!("{}%", p.pos.x)).ok();
                style.set_property("top", &format!("{}%", p.pos.y)).ok();
            }
        }
    }

    fn sync_enemy(&mut self, enemy: Option<&Enemy>) {
        let Some(e) = enemy else {
            if let Some((_, el)) = self.enemy.take() {
                el.remove();
            }
            return;
        };

        let stale = self.enemy.as_ref().is_none_or(|(id, _)| *id != e.id);
        if stale {
            if let Some((_, el)) = self.enemy.take() {
                el.remove();
            }
            // The drift across the field is a CSS animation; the simulation
            // only fixes the entry point and side
            let class = match e.side {
                EnemySide::Left => "enemy from-left",
                EnemySide::Right => "enemy from-right",
            };
            if let Some(el) = self.spawn_node(class, ENEMY_SPRITE) {
                let style = el.style();
                style.set_property("left", &format!("{}%", e.pos.x)).ok();
                style.set_property("top", &format!("{}%", e.pos.y)).ok();
                self.enemy = Some((e.id, el));
            }
        }
    }

    fn sync_player(&mut self, state: &GameState) {
        let mut class = String::from("player");
        if state.effects.invincible() {
            class.push_str(" invincible");
        }
        if state.effects.shielded() {
            class.push_str(" shielded");
        }
        if state.effects.umbrella() {
            class.push_str(" umbrella");
        }
        self.player.set_class_name(&class);
        self.player
            .style()
            .set_property(
                "left",
                &format!("calc({}% - {}px)", state.player.x, PLAYER_WIDTH / 2.0),
            )
            .ok();
    }

    fn sync_hud(&self, state: &GameState) {
        if let Some(el) = self.document.get_element_by_id("hud-lives") {
            el.set_text_content(Some(&HEART_SPRITE.repeat(state.lives as usize)));
        }
        if let Some(el) = self.document.get_element_by_id("hud-score") {
            el.set_text_content(Some(&format!("Score: {}", state.score)));
        }
        self.toggle("hud-doubler", "hud-badge", !state.effects.score_doubled());
        self.toggle("storm-warning", "storm-warning", !state.storm_warning);
    }

    fn toggle(&self, id: &str, base_class: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let class = if hidden {
                format!("{} hidden", base_class)
            } else {
                base_class.to_string()
            };
            let _ = el.set_attribute("class", &class);
        }
    }
}
