//! Persistent editor state and the query surface.
//!
//! One [`EditorContext`] per node-editor workspace. Everything that must
//! survive between frames lives here: node origins, panning, selection, depth
//! order and the in-flight click interaction. The per-frame records in the
//! pools are rebuilt from the host's submissions every frame.

use crate::frame::Scope;
use crate::hit_test::{LinkGeometry, NodeGeometry};
use crate::input::{InputState, Io};
use crate::interaction::{ClickInteraction, CreatedLink, InteractionEvents};
use crate::links::{CompositeValidator, LinkValidator};
use crate::math::{Rect, Vec2};
use crate::pool::ObjectPool;
use crate::records::{LinkRecord, NodeRecord, PinRecord};
use crate::selection::SelectionManager;
use crate::style::{Style, StyleStack};
use std::collections::{HashMap, HashSet};

/// Grid-space origin given to nodes the host never positioned.
pub const DEFAULT_NODE_ORIGIN: Vec2 = Vec2::new(100.0, 100.0);

/// State that lives for a single frame.
#[derive(Debug, Default)]
pub(crate) struct FrameState {
    pub input: InputState,
    pub submitted_nodes: HashSet<i32>,
    pub submitted_pins: HashSet<i32>,
    pub cursor: Vec2,
    pub hovered_node: Option<i32>,
    pub hovered_pin: Option<i32>,
    pub hovered_link: Option<i32>,
    pub active_attribute: Option<i32>,
    /// In-use nodes, bottom to top.
    pub node_geometry: Vec<NodeGeometry>,
    /// Well-formed links in submission order.
    pub link_geometry: Vec<LinkGeometry>,
    pub box_selector: Option<Rect>,
    pub events: InteractionEvents,
}

impl FrameState {
    pub fn new(input: InputState) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn link_geometry(&self, id: i32) -> Option<&LinkGeometry> {
        self.link_geometry.iter().find(|l| l.id == id)
    }

    pub fn nothing_hovered(&self) -> bool {
        self.hovered_node.is_none() && self.hovered_pin.is_none() && self.hovered_link.is_none()
    }
}

pub struct EditorContext {
    pub(crate) nodes: ObjectPool<NodeRecord>,
    pub(crate) pins: ObjectPool<PinRecord>,
    pub(crate) links: ObjectPool<LinkRecord>,

    pub(crate) origins_by_id: HashMap<i32, Vec2>,
    /// Node ids, bottom to top.
    pub(crate) node_depth_order: Vec<i32>,
    pub(crate) selected_nodes: SelectionManager,
    pub(crate) selected_links: SelectionManager,
    pub(crate) panning: Vec2,
    pub(crate) auto_panning_delta: Vec2,
    pub(crate) click_interaction: ClickInteraction,

    pub(crate) styles: StyleStack,
    pub(crate) io: Io,
    pub(crate) validator: Box<dyn LinkValidator>,

    pub(crate) scope: Scope,
    /// Canvas rectangle of the most recent frame, in screen space.
    pub(crate) canvas_rect: Rect,
    pub(crate) frame: FrameState,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("nodes", &self.nodes.len())
            .field("pins", &self.pins.len())
            .field("links", &self.links.len())
            .field("panning", &self.panning)
            .field("click_interaction", &self.click_interaction)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl EditorContext {
    pub fn new() -> Self {
        Self::with_style(Style::default())
    }

    pub fn with_style(style: Style) -> Self {
        Self {
            nodes: ObjectPool::new(),
            pins: ObjectPool::new(),
            links: ObjectPool::new(),
            origins_by_id: HashMap::new(),
            node_depth_order: Vec::new(),
            selected_nodes: SelectionManager::new(),
            selected_links: SelectionManager::new(),
            panning: Vec2::ZERO,
            auto_panning_delta: Vec2::ZERO,
            click_interaction: ClickInteraction::None,
            styles: StyleStack::new(style),
            io: Io::default(),
            validator: Box::new(CompositeValidator::editor_default()),
            scope: Scope::None,
            canvas_rect: Rect::default(),
            frame: FrameState::default(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn style(&self) -> &Style {
        self.styles.style()
    }

    pub fn styles_mut(&mut self) -> &mut StyleStack {
        &mut self.styles
    }

    pub fn io(&self) -> &Io {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    /// Replace the rules deciding which pins a dragged link may snap to.
    pub fn set_link_validator(&mut self, validator: impl LinkValidator + 'static) {
        self.validator = Box::new(validator);
    }

    // ========================================================================
    // Coordinate spaces
    // ========================================================================
    //
    // grid   -- node origins, independent of panning
    // editor -- grid + panning
    // screen -- editor + canvas origin

    pub(crate) fn grid_to_screen(&self, p: Vec2) -> Vec2 {
        p + self.panning + self.canvas_rect.min
    }

    pub(crate) fn screen_to_grid(&self, p: Vec2) -> Vec2 {
        p - self.panning - self.canvas_rect.min
    }

    pub(crate) fn mouse_in_canvas(&self) -> bool {
        self.frame.input.canvas_hovered && self.canvas_rect.contains(self.frame.input.mouse_pos)
    }

    pub fn panning(&self) -> Vec2 {
        self.panning
    }

    pub fn set_panning(&mut self, panning: Vec2) {
        self.panning = panning;
    }

    /// Canvas rectangle passed to the most recent frame.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// The panning that centres node `id` in the canvas.
    pub fn panning_offset_to_node(&self, id: i32) -> Option<Vec2> {
        let origin = *self.origins_by_id.get(&id)?;
        let size = self.node_dimensions(id).unwrap_or(Vec2::ZERO);
        Some(self.canvas_rect.size() * 0.5 - (origin + size * 0.5))
    }

    /// Pan so node `id` sits in the middle of the canvas. Returns false for an
    /// unknown node.
    pub fn move_to_node(&mut self, id: i32) -> bool {
        match self.panning_offset_to_node(id) {
            Some(panning) => {
                self.panning = panning;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Node positions
    // ========================================================================

    pub fn set_node_grid_space_pos(&mut self, id: i32, pos: Vec2) {
        self.origins_by_id.insert(id, pos);
        if let Some(node) = self.nodes.get_by_id_mut(id) {
            node.origin = pos;
        }
    }

    pub fn set_node_editor_space_pos(&mut self, id: i32, pos: Vec2) {
        self.set_node_grid_space_pos(id, pos - self.panning);
    }

    pub fn set_node_screen_space_pos(&mut self, id: i32, pos: Vec2) {
        let grid = self.screen_to_grid(pos);
        self.set_node_grid_space_pos(id, grid);
    }

    pub fn node_grid_space_pos(&self, id: i32) -> Option<Vec2> {
        self.origins_by_id.get(&id).copied()
    }

    pub fn node_editor_space_pos(&self, id: i32) -> Option<Vec2> {
        self.node_grid_space_pos(id).map(|p| p + self.panning)
    }

    pub fn node_screen_space_pos(&self, id: i32) -> Option<Vec2> {
        self.node_grid_space_pos(id).map(|p| self.grid_to_screen(p))
    }

    /// Size of the node as laid out in the last frame it was submitted.
    pub fn node_dimensions(&self, id: i32) -> Option<Vec2> {
        self.nodes.get_by_id(id).map(|node| node.rect.size())
    }

    /// Returns false if the node has no live record.
    pub fn set_node_draggable(&mut self, id: i32, draggable: bool) -> bool {
        match self.nodes.get_by_id_mut(id) {
            Some(node) => {
                node.draggable = draggable;
                true
            }
            None => false,
        }
    }

    /// Node ids from bottom to top.
    pub fn node_depth_order(&self) -> &[i32] {
        &self.node_depth_order
    }

    pub(crate) fn raise_node(&mut self, id: i32) {
        if let Some(pos) = self.node_depth_order.iter().position(|&n| n == id) {
            self.node_depth_order.remove(pos);
        }
        self.node_depth_order.push(id);
    }

    // ========================================================================
    // Per-frame records
    // ========================================================================

    /// The pin record for `id`, if the pin was submitted this frame.
    pub(crate) fn pin_this_frame(&self, id: i32) -> Option<&PinRecord> {
        let index = self.pins.find(id)?;
        if !self.pins.is_in_use(index) {
            return None;
        }
        self.pins.get(index)
    }

    /// Where pin `id` was drawn in the last frame.
    pub fn pin_screen_space_pos(&self, id: i32) -> Option<Vec2> {
        self.pin_this_frame(id).map(|pin| pin.screen_pos)
    }

    pub(crate) fn node_id_of_pin(&self, pin_id: i32) -> Option<i32> {
        let pin = self.pin_this_frame(pin_id)?;
        self.nodes.get(pin.parent_node).map(|node| node.id)
    }

    // ========================================================================
    // Hover & interaction queries (valid after the frame ended)
    // ========================================================================

    pub fn hovered_node(&self) -> Option<i32> {
        self.frame.hovered_node
    }

    pub fn hovered_link(&self) -> Option<i32> {
        self.frame.hovered_link
    }

    pub fn hovered_pin(&self) -> Option<i32> {
        self.frame.hovered_pin
    }

    pub fn is_editor_hovered(&self) -> bool {
        self.mouse_in_canvas()
    }

    /// Attribute the host reported active this frame.
    pub fn active_attribute(&self) -> Option<i32> {
        self.frame.active_attribute
    }

    pub fn click_interaction(&self) -> &ClickInteraction {
        &self.click_interaction
    }

    /// Pin a new link was dragged out of this frame.
    pub fn link_started(&self) -> Option<i32> {
        self.frame.events.link_started
    }

    /// Start pin of a link released over empty space this frame.
    ///
    /// Links pulled off an existing link only count with `including_detached`.
    pub fn link_dropped(&self, including_detached: bool) -> Option<i32> {
        self.frame
            .events
            .link_dropped
            .filter(|d| including_detached || !d.from_detach)
            .map(|d| d.start_pin)
    }

    /// Link completed this frame, output pin first. Not reported again for
    /// the same gesture.
    pub fn link_created(&self) -> Option<CreatedLink> {
        self.frame.events.link_created
    }

    /// Link detached this frame. The host should stop submitting it.
    pub fn link_destroyed(&self) -> Option<i32> {
        self.frame.events.link_destroyed
    }

    /// All events raised during the last frame.
    pub fn events(&self) -> &InteractionEvents {
        &self.frame.events
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn num_selected_nodes(&self) -> usize {
        self.selected_nodes.len()
    }

    pub fn num_selected_links(&self) -> usize {
        self.selected_links.len()
    }

    /// Selected node ids in ascending order.
    pub fn selected_nodes(&self) -> Vec<i32> {
        self.selected_nodes.sorted_ids()
    }

    /// Selected link ids in ascending order.
    pub fn selected_links(&self) -> Vec<i32> {
        self.selected_links.sorted_ids()
    }

    pub fn is_node_selected(&self, id: i32) -> bool {
        self.selected_nodes.contains(id)
    }

    pub fn is_link_selected(&self, id: i32) -> bool {
        self.selected_links.contains(id)
    }

    pub fn select_node(&mut self, id: i32) {
        self.selected_nodes.select(id);
    }

    pub fn deselect_node(&mut self, id: i32) {
        self.selected_nodes.deselect(id);
    }

    pub fn clear_node_selection(&mut self) {
        self.selected_nodes.clear();
    }

    pub fn select_link(&mut self, id: i32) {
        self.selected_links.select(id);
    }

    pub fn deselect_link(&mut self, id: i32) {
        self.selected_links.deselect(id);
    }

    pub fn clear_link_selection(&mut self) {
        self.selected_links.clear();
    }

    /// Node selection manager, e.g. for syncing with a Slint model.
    pub fn node_selection(&self) -> &SelectionManager {
        &self.selected_nodes
    }

    pub fn link_selection(&self) -> &SelectionManager {
        &self.selected_links
    }
}
