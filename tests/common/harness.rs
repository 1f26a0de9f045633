//! Frame-driving test harness.
//!
//! Plays the host: submits a small scene every frame, feeds synthetic mouse
//! input and applies created/destroyed links back to its own link list the way
//! an application would.

#![allow(dead_code)]

use super::EventTracker;
use slint_immediate_nodes::{
    AttributeFlag, DrawList, EditorContext, InputState, Modifiers, MouseButtonState, NodeBuilder,
    PinKind, PinShape, Rect, Vec2,
};
use std::collections::HashMap;

pub const CANVAS: Rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0));

/// Every attribute reserves this much content.
pub const ATTRIBUTE_SIZE: Vec2 = Vec2::new(40.0, 20.0);

/// A point inside node 1's body, away from its pins.
pub const NODE_1_BODY: Vec2 = Vec2::new(128.0, 104.0);
/// A point inside node 2's body, away from its pins.
pub const NODE_2_BODY: Vec2 = Vec2::new(328.0, 104.0);
/// A point on the canvas far from everything in the default scene.
pub const EMPTY_SPACE: Vec2 = Vec2::new(500.0, 400.0);

pub const LINK_ID: i32 = 100;

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: i32,
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    /// Plain content reserved before the attributes.
    pub body: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLink {
    pub id: i32,
    pub start: i32,
    pub end: i32,
}

pub struct EditorHarness {
    pub ctx: EditorContext,
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
    /// Attribute flags pushed around a pin's attribute.
    pub pin_flags: HashMap<i32, Vec<AttributeFlag>>,
    pub events: EventTracker,
    pub canvas: DrawList,
    pub modifiers: Modifiers,
    mouse: Vec2,
    next_link_id: i32,
}

impl EditorHarness {
    /// Two nodes side by side, nothing linked.
    ///
    /// Node 1 sits at grid (100, 100) with input pin 10 and output pin 11.
    /// Node 2 sits at grid (300, 100) with input pin 20 and output pin 21.
    /// With default padding both nodes are 56 x 56, so the pins are at:
    /// 10 = (100, 118), 11 = (156, 138), 20 = (300, 118), 21 = (356, 138).
    pub fn new() -> Self {
        let mut harness = Self::empty();
        harness.add_node(1, Vec2::new(100.0, 100.0), &[10], &[11]);
        harness.add_node(2, Vec2::new(300.0, 100.0), &[20], &[21]);
        harness
    }

    /// No nodes and no links.
    pub fn empty() -> Self {
        Self {
            ctx: EditorContext::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            pin_flags: HashMap::new(),
            events: EventTracker::new(),
            canvas: DrawList::new(),
            modifiers: Modifiers::default(),
            mouse: Vec2::ZERO,
            next_link_id: LINK_ID,
        }
    }

    /// Add a node with one attribute per pin, placed at `origin` in grid space.
    pub fn add_node(&mut self, id: i32, origin: Vec2, inputs: &[i32], outputs: &[i32]) {
        self.ctx.set_node_grid_space_pos(id, origin);
        self.nodes.push(SceneNode {
            id,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            body: None,
        });
    }

    /// Add a pinless node whose rectangle is exactly `size`.
    pub fn add_block(&mut self, id: i32, origin: Vec2, size: Vec2) {
        let padding = self.ctx.style().node_padding;
        self.ctx.set_node_grid_space_pos(id, origin);
        self.nodes.push(SceneNode {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
            body: Some(size - padding * 2.0),
        });
    }

    /// The default scene with link 100 from pin 11 to pin 20.
    pub fn with_link() -> Self {
        let mut harness = Self::new();
        harness.add_link(11, 20);
        harness
    }

    pub fn add_link(&mut self, start: i32, end: i32) -> i32 {
        let id = self.next_link_id;
        self.next_link_id += 1;
        self.links.push(SceneLink { id, start, end });
        id
    }

    pub fn flag_pin(&mut self, pin: i32, flag: AttributeFlag) {
        self.pin_flags.entry(pin).or_default().push(flag);
    }

    pub fn pin_pos(&self, pin: i32) -> Vec2 {
        self.ctx
            .pin_screen_space_pos(pin)
            .unwrap_or_else(|| panic!("pin {} was not drawn last frame", pin))
    }

    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    /// Run one frame with the given input and apply the results to the scene.
    pub fn frame(&mut self, input: InputState) {
        self.canvas.clear();
        let mut frame = self.ctx.begin_editor(input, CANVAS).expect("begin_editor");

        for node in &self.nodes {
            let mut builder = frame.begin_node(node.id).expect("begin_node");
            if let Some(size) = node.body {
                builder.item(size).expect("item");
            }
            for &pin in &node.inputs {
                submit_attribute(&mut builder, pin, PinKind::Input, &self.pin_flags);
            }
            for &pin in &node.outputs {
                submit_attribute(&mut builder, pin, PinKind::Output, &self.pin_flags);
            }
            builder.end().expect("end_node");
        }
        for link in &self.links {
            frame.link(link.id, link.start, link.end).expect("link");
        }
        frame.end(&mut self.canvas).expect("end_editor");

        self.events.record(&self.ctx);

        if let Some(link) = self.ctx.link_created() {
            self.add_link(link.start_pin, link.end_pin);
        }
        if let Some(id) = self.ctx.link_destroyed() {
            self.links.retain(|l| l.id != id);
        }
    }

    fn step(&mut self, pos: Vec2, primary: MouseButtonState, alt: MouseButtonState) {
        let input = InputState {
            mouse_pos: pos,
            mouse_delta: pos - self.mouse,
            primary,
            alt,
            modifiers: self.modifiers,
            item_hovered: false,
            item_active: false,
            canvas_hovered: true,
            delta_time: 1.0 / 60.0,
        };
        self.mouse = pos;
        self.frame(input);
    }

    /// A frame with no buttons held.
    pub fn hover(&mut self, pos: Vec2) {
        self.step(pos, MouseButtonState::IDLE, MouseButtonState::IDLE);
    }

    /// Move to `pos`, then press the primary button there.
    pub fn press(&mut self, pos: Vec2) {
        if pos != self.mouse {
            self.hover(pos);
        }
        self.step(pos, MouseButtonState::pressed(), MouseButtonState::IDLE);
    }

    pub fn drag_to(&mut self, pos: Vec2) {
        self.step(pos, MouseButtonState::dragged(), MouseButtonState::IDLE);
    }

    /// A frame with the primary button still held and the mouse still.
    pub fn hold(&mut self) {
        let held = MouseButtonState {
            down: true,
            ..MouseButtonState::IDLE
        };
        self.step(self.mouse, held, MouseButtonState::IDLE);
    }

    pub fn release(&mut self) {
        self.step(self.mouse, MouseButtonState::released(), MouseButtonState::IDLE);
    }

    pub fn click(&mut self, pos: Vec2) {
        self.press(pos);
        self.release();
    }

    pub fn drag(&mut self, from: Vec2, to: Vec2) {
        self.press(from);
        self.drag_to(to);
        self.release();
    }

    pub fn pan_press(&mut self, pos: Vec2) {
        if pos != self.mouse {
            self.hover(pos);
        }
        self.step(pos, MouseButtonState::IDLE, MouseButtonState::pressed());
    }

    pub fn pan_drag_to(&mut self, pos: Vec2) {
        self.step(pos, MouseButtonState::IDLE, MouseButtonState::dragged());
    }

    pub fn pan_release(&mut self) {
        self.step(self.mouse, MouseButtonState::IDLE, MouseButtonState::released());
    }
}

fn submit_attribute(
    node: &mut NodeBuilder<'_>,
    pin: i32,
    kind: PinKind,
    flags: &HashMap<i32, Vec<AttributeFlag>>,
) {
    let flags = flags.get(&pin).map(Vec::as_slice).unwrap_or(&[]);
    for &flag in flags {
        node.styles().push_attribute_flag(flag);
    }

    let mut attribute = node
        .begin_attribute(pin, kind, PinShape::CircleFilled)
        .expect("begin_attribute");
    attribute.content(ATTRIBUTE_SIZE).expect("content");
    attribute.end().expect("end_attribute");

    for _ in flags {
        node.styles().pop_attribute_flag().expect("pop_attribute_flag");
    }
}

pub fn approx_eq(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
}
