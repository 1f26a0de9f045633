//! Frame driver: the begin/end submission API.
//!
//! ```ignore
//! let mut frame = ctx.begin_editor(input, canvas_rect)?;
//! {
//!     let mut node = frame.begin_node(1)?;
//!     node.title_bar(Vec2::new(80.0, 16.0))?;
//!     let mut attr = node.begin_attribute(2, PinKind::Output, PinShape::CircleFilled)?;
//!     attr.content(Vec2::new(60.0, 16.0))?;
//!     attr.end()?;
//!     node.end()?;
//! }
//! frame.link(100, 2, 5)?;
//! frame.end(&mut canvas)?;
//!
//! if let Some(link) = ctx.link_created() { /* add it to the graph */ }
//! ```
//!
//! Builders borrow the context mutably, so queries are only possible once the
//! frame has ended. A builder dropped without `end()` leaves its scope open and
//! the next call on its parent fails with [`EditorError::ScopeViolation`].

use crate::context::{EditorContext, FrameState, DEFAULT_NODE_ORIGIN};
use crate::error::{EditorError, EditorResult};
use crate::grid::draw_grid;
use crate::hit_test::{
    find_link_at, find_node_at, find_pin_at, occluded_pins, LinkGeometry, NodeGeometry, PinGeometry,
};
use crate::input::InputState;
use crate::interaction::ClickInteraction;
use crate::links::{BasicLinkValidator, LinkValidator, ValidationResult};
use crate::math::{Rect, Vec2};
use crate::path::{distance_to_bezier, CubicBezier};
use crate::records::{PinKind, PinShape};
use crate::render::{draw_box_selector, draw_node, draw_pin, Canvas};
use crate::style::{ColorStyle, StyleStack};

/// Where the frame driver currently is in the begin/end nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    None,
    Editor,
    Node,
    Attribute,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Scope::None => "none",
            Scope::Editor => "editor",
            Scope::Node => "node",
            Scope::Attribute => "attribute",
        };
        f.write_str(name)
    }
}

impl Scope {
    /// The scope that `begin_*`/`end` calls move to from here.
    fn can_enter(self, next: Scope) -> bool {
        matches!(
            (self, next),
            (Scope::None, Scope::Editor)
                | (Scope::Editor, Scope::Node)
                | (Scope::Node, Scope::Attribute)
                | (Scope::Attribute, Scope::Node)
                | (Scope::Node, Scope::Editor)
                | (Scope::Editor, Scope::None)
        )
    }
}

impl EditorContext {
    fn expect_scope(&self, call: &'static str, expected: Scope) -> EditorResult<()> {
        if self.scope == expected {
            return Ok(());
        }
        let err = EditorError::ScopeViolation {
            call,
            expected,
            found: self.scope,
        };
        log::error!("{}", err);
        Err(err)
    }

    fn enter_scope(&mut self, next: Scope) {
        debug_assert!(self.scope.can_enter(next), "{} -> {}", self.scope, next);
        self.scope = next;
    }

    /// Start a frame.
    ///
    /// Reclaims records that were not submitted last frame and prunes the
    /// selection and depth order of their ids.
    pub fn begin_editor(
        &mut self,
        input: InputState,
        canvas_rect: Rect,
    ) -> EditorResult<EditorFrame<'_>> {
        self.expect_scope("begin_editor", Scope::None)?;
        self.enter_scope(Scope::Editor);

        self.frame = FrameState::new(input);
        self.canvas_rect = canvas_rect;
        self.auto_panning_delta = Vec2::ZERO;

        let reclaimed_nodes = self.nodes.update();
        self.nodes.reset_in_use();
        self.pins.update();
        self.pins.reset_in_use();
        let reclaimed_links = self.links.update();
        self.links.reset_in_use();

        if !reclaimed_nodes.is_empty() {
            self.selected_nodes.retain(|id| !reclaimed_nodes.contains(&id));
            self.node_depth_order.retain(|id| !reclaimed_nodes.contains(id));
        }
        if !reclaimed_links.is_empty() {
            self.selected_links.retain(|id| !reclaimed_links.contains(&id));
        }

        if !self.styles.is_balanced() {
            log::warn!("style stack not balanced at frame start");
        }

        log::trace!(
            "begin_editor: canvas {:?}, mouse {:?}",
            canvas_rect,
            input.mouse_pos
        );
        Ok(EditorFrame { ctx: self })
    }

    /// Forget an unfinished frame so the next [`begin_editor`](Self::begin_editor)
    /// succeeds. Nothing of the abandoned frame is drawn.
    pub fn abandon_frame(&mut self) {
        if self.scope != Scope::None {
            log::warn!("abandoning frame left open in {} scope", self.scope);
        }
        self.scope = Scope::None;
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    fn finish_frame(&mut self, canvas: &mut impl Canvas) {
        self.compute_pin_positions();
        self.collect_geometry();
        self.resolve_hover();

        self.begin_click_interaction();
        self.apply_auto_panning();
        self.update_click_interaction();

        canvas.push_clip_rect(self.canvas_rect);
        self.draw(canvas);
        canvas.pop_clip_rect();
    }

    fn compute_pin_positions(&mut self) {
        let pin_offset = self.styles.style().pin_offset;
        let nodes = &self.nodes;
        for (_, pin) in self.pins.iter_in_use_mut() {
            let Some(node) = nodes.get(pin.parent_node) else {
                continue;
            };
            let x = match pin.kind {
                PinKind::Input => node.rect.min.x - pin_offset,
                PinKind::Output => node.rect.max.x + pin_offset,
            };
            pin.screen_pos = Vec2::new(x, pin.attribute_rect.center().y);
        }
    }

    fn collect_geometry(&mut self) {
        let mut node_geometry = Vec::with_capacity(self.node_depth_order.len());
        for &id in &self.node_depth_order {
            let Some(index) = self.nodes.find(id) else {
                continue;
            };
            if !self.nodes.is_in_use(index) {
                continue;
            }
            if let Some(node) = self.nodes.get(index) {
                node_geometry.push(NodeGeometry { id, rect: node.rect });
            }
        }
        self.frame.node_geometry = node_geometry;

        let mut link_geometry = Vec::new();
        for (_, link) in self.links.iter_in_use() {
            let (Some(start), Some(end)) = (
                self.pin_this_frame(link.start_pin_id),
                self.pin_this_frame(link.end_pin_id),
            ) else {
                log::warn!(
                    "skipping link {}: pin {} or {} was not submitted",
                    link.id,
                    link.start_pin_id,
                    link.end_pin_id
                );
                continue;
            };
            if let ValidationResult::Invalid(reason) = BasicLinkValidator.validate(start, end, &[])
            {
                log::warn!("skipping link {}: {}", link.id, reason);
                continue;
            }
            link_geometry.push(LinkGeometry {
                id: link.id,
                start_pin_id: start.id,
                end_pin_id: end.id,
                start: start.screen_pos,
                end: end.screen_pos,
                start_kind: start.kind,
            });
        }
        self.frame.link_geometry = link_geometry;
    }

    fn resolve_hover(&mut self) {
        if !self.mouse_in_canvas() || self.frame.input.item_active {
            return;
        }
        let mouse = self.frame.input.mouse_pos;
        let style = self.styles.style();

        let pins: Vec<PinGeometry> = self
            .pins
            .iter_in_use()
            .filter_map(|(_, pin)| {
                let node = self.nodes.get(pin.parent_node)?;
                Some(PinGeometry {
                    id: pin.id,
                    node_id: node.id,
                    position: pin.screen_pos,
                })
            })
            .collect();
        let occluded = occluded_pins(&pins, &self.frame.node_geometry);

        let hovered_pin = find_pin_at(mouse, pins, style.pin_hover_radius, &occluded);
        let hovered_node = match hovered_pin {
            Some(_) => None,
            None => find_node_at(mouse, self.frame.node_geometry.iter().copied()),
        };
        let mut hovered_link = match (hovered_pin, hovered_node) {
            (None, None) => find_link_at(
                mouse,
                &self.frame.link_geometry,
                style.link_hover_distance,
                style.link_line_segments_per_length,
            ),
            _ => None,
        };

        // Hovering a drag-detach pin hovers the link attached to it.
        if let Some(pin_id) = hovered_pin {
            let detachable = self
                .pin_this_frame(pin_id)
                .map_or(false, |pin| pin.flags.detach_with_drag_click);
            if detachable {
                let segments = style.link_line_segments_per_length;
                hovered_link = self
                    .frame
                    .link_geometry
                    .iter()
                    .filter(|l| l.start_pin_id == pin_id || l.end_pin_id == pin_id)
                    .map(|l| (l.id, distance_to_bezier(mouse, &l.curve(segments))))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(id, _)| id);
            }
        }

        self.frame.hovered_pin = hovered_pin;
        self.frame.hovered_node = hovered_node;
        self.frame.hovered_link = hovered_link;
    }

    fn draw(&self, canvas: &mut impl Canvas) {
        let style = self.styles.style();
        draw_grid(canvas, self.canvas_rect, self.panning, style);

        let segments = style.link_line_segments_per_length;
        for link in &self.frame.link_geometry {
            if self.frame.events.link_destroyed == Some(link.id) {
                continue;
            }
            let Some(record) = self.links.get_by_id(link.id) else {
                continue;
            };
            let color = if self.selected_links.contains(link.id) {
                record.colors.selected
            } else if self.frame.hovered_link == Some(link.id) {
                record.colors.hovered
            } else {
                record.colors.base
            };
            canvas.bezier_cubic(&link.curve(segments), color, style.link_thickness);
        }

        for geometry in &self.frame.node_geometry {
            let Some(node) = self.nodes.get_by_id(geometry.id) else {
                continue;
            };
            draw_node(
                canvas,
                node,
                self.frame.hovered_node == Some(node.id),
                self.selected_nodes.contains(node.id),
                style,
            );
            for &pin_index in &node.pin_indices {
                if let Some(pin) = self.pins.get(pin_index) {
                    draw_pin(canvas, pin, self.frame.hovered_pin == Some(pin.id), style);
                }
            }
        }

        if let ClickInteraction::LinkCreation(creation) = self.click_interaction {
            if let Some(start) = self.pin_this_frame(creation.start_pin) {
                let end = creation
                    .end_pin
                    .and_then(|id| self.pin_this_frame(id))
                    .map_or(self.frame.input.mouse_pos, |pin| pin.screen_pos);
                let curve = CubicBezier::for_link(start.screen_pos, end, start.kind, segments);
                canvas.bezier_cubic(&curve, style.color(ColorStyle::Link), style.link_thickness);
            }
        }

        if let Some(rect) = self.frame.box_selector {
            if matches!(self.click_interaction, ClickInteraction::BoxSelection { .. }) {
                draw_box_selector(canvas, rect, style);
            }
        }
    }
}

/// Submission handle for one editor frame.
#[derive(Debug)]
pub struct EditorFrame<'a> {
    ctx: &'a mut EditorContext,
}

impl<'a> EditorFrame<'a> {
    pub fn input(&self) -> &InputState {
        &self.ctx.frame.input
    }

    /// Style stack for pushes that should affect the following submissions.
    pub fn styles(&mut self) -> &mut StyleStack {
        &mut self.ctx.styles
    }

    /// Start submitting node `id`.
    pub fn begin_node(&mut self, id: i32) -> EditorResult<NodeBuilder<'_>> {
        let ctx = &mut *self.ctx;
        ctx.expect_scope("begin_node", Scope::Editor)?;
        if !ctx.frame.submitted_nodes.insert(id) {
            let err = EditorError::DuplicateNodeId(id);
            log::error!("{}", err);
            return Err(err);
        }
        ctx.enter_scope(Scope::Node);

        if !ctx.node_depth_order.contains(&id) {
            ctx.node_depth_order.push(id);
        }
        let origin = *ctx.origins_by_id.entry(id).or_insert(DEFAULT_NODE_ORIGIN);
        let screen_origin = ctx.grid_to_screen(origin);
        let colors = ctx.styles.style().node_colors();
        let layout = ctx.styles.style().node_layout();

        let (index, node) = ctx.nodes.find_or_create_mut(id);
        node.origin = origin;
        node.colors = colors;
        node.layout = layout;
        node.rect = Rect::from_min_size(screen_origin, Vec2::ZERO);
        node.title_bar_rect = None;
        node.content_rect = Rect::empty();
        node.pin_indices.clear();

        ctx.frame.cursor = screen_origin + layout.padding;

        Ok(NodeBuilder { ctx, index, id })
    }

    /// Submit a link between two pins. Order of the pins does not matter.
    pub fn link(&mut self, id: i32, start_pin: i32, end_pin: i32) -> EditorResult<()> {
        let ctx = &mut *self.ctx;
        ctx.expect_scope("link", Scope::Editor)?;
        let colors = ctx.styles.style().link_colors();
        let (_, link) = ctx.links.find_or_create_mut(id);
        link.start_pin_id = start_pin;
        link.end_pin_id = end_pin;
        link.colors = colors;
        Ok(())
    }

    /// Finish the frame: resolve hover, run the click interaction and draw.
    pub fn end(self, canvas: &mut impl Canvas) -> EditorResult<()> {
        self.ctx.expect_scope("end_editor", Scope::Editor)?;
        self.ctx.finish_frame(canvas);
        self.ctx.enter_scope(Scope::None);
        Ok(())
    }
}

/// Submission handle for one node.
#[derive(Debug)]
pub struct NodeBuilder<'f> {
    ctx: &'f mut EditorContext,
    index: usize,
    id: i32,
}

impl<'f> NodeBuilder<'f> {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn styles(&mut self) -> &mut StyleStack {
        &mut self.ctx.styles
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        if let Some(node) = self.ctx.nodes.get_mut(self.index) {
            node.draggable = draggable;
        }
    }

    /// Place a content rectangle of `size` at the layout cursor.
    fn place(&mut self, size: Vec2) -> Rect {
        let rect = Rect::from_min_size(self.ctx.frame.cursor, size);
        if let Some(node) = self.ctx.nodes.get_mut(self.index) {
            node.content_rect.add_rect(&rect);
        }
        self.ctx.frame.cursor.y = rect.max.y;
        rect
    }

    /// Reserve the title bar content. Returns its screen rectangle.
    pub fn title_bar(&mut self, size: Vec2) -> EditorResult<Rect> {
        self.ctx.expect_scope("title_bar", Scope::Node)?;
        let rect = self.place(size);
        let padding = self.ctx.styles.style().node_padding;
        if let Some(node) = self.ctx.nodes.get_mut(self.index) {
            node.title_bar_rect = Some(rect);
        }
        // Title bar padding below, then the body's own top padding.
        self.ctx.frame.cursor.y = rect.max.y + 2.0 * padding.y;
        Ok(rect)
    }

    /// Reserve space for host content that is not an attribute.
    pub fn item(&mut self, size: Vec2) -> EditorResult<Rect> {
        self.ctx.expect_scope("item", Scope::Node)?;
        Ok(self.place(size))
    }

    /// Start an attribute with a pin of `kind`.
    pub fn begin_attribute(
        &mut self,
        id: i32,
        kind: PinKind,
        shape: PinShape,
    ) -> EditorResult<AttributeBuilder<'_>> {
        self.ctx.expect_scope("begin_attribute", Scope::Node)?;
        if !self.ctx.frame.submitted_pins.insert(id) {
            log::warn!("pin id {} submitted twice this frame; the last one wins", id);
        }
        self.ctx.enter_scope(Scope::Attribute);

        let flags = self.ctx.styles.attribute_flags();
        let colors = self.ctx.styles.style().pin_colors();
        let node_index = self.index;
        let (pin_index, pin) = self.ctx.pins.find_or_create_mut(id);
        pin.parent_node = node_index;
        pin.kind = kind;
        pin.shape = shape;
        pin.flags = flags;
        pin.colors = colors;
        pin.attribute_rect = Rect::empty();

        Ok(AttributeBuilder {
            ctx: &mut *self.ctx,
            node_index,
            pin_index,
            id,
            rect: Rect::empty(),
        })
    }

    /// Close the node. Its rectangle is the content bounds plus padding.
    pub fn end(self) -> EditorResult<()> {
        self.ctx.expect_scope("end_node", Scope::Node)?;
        if let Some(node) = self.ctx.nodes.get_mut(self.index) {
            let padding = node.layout.padding;
            node.rect = if node.content_rect.is_inverted() {
                Rect::from_min_size(node.rect.min, padding * 2.0)
            } else {
                node.content_rect.expand(padding)
            };
        }
        self.ctx.enter_scope(Scope::Editor);
        Ok(())
    }
}

/// Submission handle for one attribute (pin) inside a node.
#[derive(Debug)]
pub struct AttributeBuilder<'n> {
    ctx: &'n mut EditorContext,
    node_index: usize,
    pin_index: usize,
    id: i32,
    rect: Rect,
}

impl<'n> AttributeBuilder<'n> {
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Reserve attribute content. The pin is centred on the content vertically.
    pub fn content(&mut self, size: Vec2) -> EditorResult<Rect> {
        self.ctx.expect_scope("attribute content", Scope::Attribute)?;
        let rect = Rect::from_min_size(self.ctx.frame.cursor, size);
        self.rect.add_rect(&rect);
        if let Some(node) = self.ctx.nodes.get_mut(self.node_index) {
            node.content_rect.add_rect(&rect);
        }
        self.ctx.frame.cursor.y = rect.max.y;
        Ok(rect)
    }

    /// Report whether the host widget of this attribute is active.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.ctx.frame.active_attribute = Some(self.id);
        }
    }

    pub fn end(self) -> EditorResult<()> {
        self.ctx.expect_scope("end_attribute", Scope::Attribute)?;
        let rect = if self.rect.is_inverted() {
            Rect::from_min_size(self.ctx.frame.cursor, Vec2::ZERO)
        } else {
            self.rect
        };
        if let Some(pin) = self.ctx.pins.get_mut(self.pin_index) {
            pin.attribute_rect = rect;
        }
        if let Some(node) = self.ctx.nodes.get_mut(self.node_index) {
            node.pin_indices.push(self.pin_index);
        }
        self.ctx.enter_scope(Scope::Node);
        Ok(())
    }
}
