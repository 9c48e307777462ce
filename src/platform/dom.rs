//! DOM presentation and input for the browser build
//!
//! Every entity is an absolutely positioned `div` inside the arena element.
//! Nodes are created, moved and removed to match each frame's snapshot.

use std::collections::{HashMap, HashSet};

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::*;
use crate::sim::{Snapshot, TickInput};

/// Arena element id used when the host does not name one
pub const ARENA_ELEMENT_ID: &str = "game";

pub struct DomView {
    document: Document,
    arena: HtmlElement,
    score: HtmlElement,
    nodes: HashMap<NodeKey, HtmlElement>,
    last_score: String,
}

impl DomView {
    /// Attach to the element with `element_id`, creating it under `<body>`
    /// if missing
    pub fn attach(
        document: Document,
        element_id: &str,
        width: f32,
        height: f32,
    ) -> Result<Self, JsValue> {
        let arena: HtmlElement = match document.get_element_by_id(element_id) {
            Some(el) => el.dyn_into()?,
            None => {
                let el: HtmlElement = document.create_element("div")?.dyn_into()?;
                el.set_id(element_id);
                document
                    .body()
                    .ok_or_else(|| JsValue::from_str("no body"))?
                    .append_child(&el)?;
                el
            }
        };
        arena.style().set_css_text(&format!(
            "position:relative;overflow:hidden;width:{}px;height:{}px",
            width, height
        ));

        let score = create_div(&document, &arena, &[CLASS_SCORE])?;

        Ok(Self {
            document,
            arena,
            score,
            nodes: HashMap::new(),
            last_score: String::new(),
        })
    }

    pub fn arena(&self) -> &HtmlElement {
        &self.arena
    }

    /// Bring the DOM in line with the snapshot
    pub fn render(&mut self, snapshot: &Snapshot) {
        let mut live = HashSet::with_capacity(self.nodes.len());

        for meteor in &snapshot.meteors {
            let key = NodeKey::Meteor(meteor.id);
            live.insert(key);
            self.place(key, &meteor_classes(meteor), &meteor.bounds());
        }
        for shot in &snapshot.projectiles {
            let key = NodeKey::Projectile(shot.id);
            live.insert(key);
            self.place(key, &[projectile_class(shot)], &shot.bounds());
        }
        for combatant in [&snapshot.player, &snapshot.ai] {
            let key = NodeKey::Combatant(combatant.side);
            live.insert(key);
            self.place(key, &[combatant_class(combatant.side)], &combatant.bounds());
        }

        self.nodes.retain(|key, node| {
            let keep = live.contains(key);
            if !keep {
                node.remove();
            }
            keep
        });

        let score = scoreboard_html(&snapshot.scoreboard.lines());
        if score != self.last_score {
            self.score.set_inner_html(&score);
            self.last_score = score;
        }
    }

    fn place(&mut self, key: NodeKey, classes: &[&str], rect: &Rect) {
        let node = match self.nodes.get(&key) {
            Some(node) => node.clone(),
            None => match create_div(&self.document, &self.arena, classes) {
                Ok(node) => {
                    self.nodes.insert(key, node.clone());
                    node
                }
                Err(e) => {
                    log::warn!("Failed to create node for {:?}: {:?}", key, e);
                    return;
                }
            },
        };
        // Classes only ever get added (a meteor starts exploding, never stops)
        let list = node.class_list();
        for class in classes {
            if !list.contains(class) {
                list.add_1(class).ok();
            }
        }
        node.style().set_css_text(&rect_style(rect));
    }

    /// Remove every node this view created
    pub fn clear(&mut self) {
        for (_, node) in self.nodes.drain() {
            node.remove();
        }
        self.score.remove();
        self.last_score.clear();
    }
}

fn create_div(document: &Document, parent: &Element, classes: &[&str]) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    for class in classes {
        el.class_list().add_1(class)?;
    }
    parent.append_child(&el)?;
    Ok(el)
}

/// Pointer x in arena coordinates
pub fn arena_pointer_x(arena: &HtmlElement, event: &MouseEvent, arena_width: f32) -> f32 {
    let rect = arena.get_bounding_client_rect();
    pointer_to_arena_x(
        event.client_x() as f32,
        rect.left() as f32,
        rect.width() as f32,
        arena_width,
    )
}

type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

/// Mouse listeners on the arena, removed again by [`InputListeners::detach`]
pub struct InputListeners {
    target: HtmlElement,
    handlers: Vec<(&'static str, MouseHandler)>,
}

impl InputListeners {
    /// Hook mouse input on the arena. Each event is handed to `on_input` as
    /// it arrives.
    pub fn install<F>(arena: &HtmlElement, arena_width: f32, on_input: F) -> Result<Self, JsValue>
    where
        F: Fn(TickInput) + Clone + 'static,
    {
        let mut listeners = Self {
            target: arena.clone(),
            handlers: Vec::with_capacity(3),
        };

        {
            let target = arena.clone();
            let on_input = on_input.clone();
            let closure = MouseHandler::new(move |event: MouseEvent| {
                on_input(TickInput {
                    pointer_x: Some(arena_pointer_x(&target, &event, arena_width)),
                    fire: false,
                });
            });
            listeners.add("mousemove", closure)?;
        }

        // Primary click and context click both fire
        for name in ["mousedown", "contextmenu"] {
            let on_input = on_input.clone();
            let prevent = name == "contextmenu";
            let closure = MouseHandler::new(move |event: MouseEvent| {
                if prevent {
                    event.prevent_default();
                }
                on_input(TickInput {
                    pointer_x: None,
                    fire: true,
                });
            });
            listeners.add(name, closure)?;
        }

        Ok(listeners)
    }

    fn add(&mut self, name: &'static str, closure: MouseHandler) -> Result<(), JsValue> {
        self.target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        self.handlers.push((name, closure));
        Ok(())
    }

    /// Unhook every listener. Calling it again does nothing.
    pub fn detach(&mut self) {
        for (name, closure) in self.handlers.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}
