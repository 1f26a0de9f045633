//! The click-interaction state machine.
//!
//! A gesture starts on the frame the mouse button goes down and lives in
//! [`EditorContext`] until the button is released. Each frame
//! [`EditorContext::begin_click_interaction`] may start one, then
//! [`EditorContext::update_click_interaction`] advances it.

use crate::context::{EditorContext, DEFAULT_NODE_ORIGIN};
use crate::hit_test::{links_in_selection_box, nodes_in_selection_box, LinkGeometry};
use crate::links::{LinkEnds, ValidationError, ValidationResult};
use crate::math::{Rect, Vec2};
use crate::records::PinKind;

/// How a dragged link came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCreationSource {
    /// Dragged out of a pin.
    Pin,
    /// Pulled off an existing link, which was destroyed.
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCreation {
    pub start_pin: i32,
    /// Pin the link is snapped to this frame.
    pub end_pin: Option<i32>,
    pub source: LinkCreationSource,
    /// Output-first pin pair already reported as created during this drag.
    pub(crate) created: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClickInteraction {
    #[default]
    None,
    /// Dragging the selected nodes.
    Node,
    /// A link was selected by clicking it.
    Link,
    LinkCreation(LinkCreation),
    /// Rubber-band selection anchored at a grid-space point.
    BoxSelection { anchor: Vec2 },
    Panning,
    /// A host widget inside a node owns the mouse.
    HostItem,
}

/// A link the user finished dragging onto a compatible pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedLink {
    /// Always the output pin.
    pub start_pin: i32,
    /// Always the input pin.
    pub end_pin: i32,
    pub start_node: i32,
    pub end_node: i32,
    /// Created by snapping onto a `create_on_snap` pin while the button was
    /// still held.
    pub from_snap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedLink {
    pub start_pin: i32,
    pub from_detach: bool,
}

/// Link events raised during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionEvents {
    pub link_started: Option<i32>,
    pub link_created: Option<CreatedLink>,
    pub link_dropped: Option<DroppedLink>,
    pub link_destroyed: Option<i32>,
}

impl EditorContext {
    /// Start a gesture if a button went down this frame.
    pub(crate) fn begin_click_interaction(&mut self) {
        if self.click_interaction != ClickInteraction::None {
            return;
        }

        let input = self.frame.input;
        let emulating = matches!(
            self.io.emulate_three_button_mouse,
            Some(modifier) if input.modifiers.is_held(modifier)
        );
        let left_clicked = input.primary.clicked && !emulating;
        let pan_clicked = input.panning_button(&self.io).clicked;

        if left_clicked {
            if let Some(link_id) = self.frame.hovered_link {
                self.begin_link_interaction(link_id);
            } else if let Some(pin_id) = self.frame.hovered_pin {
                self.begin_link_creation(pin_id);
            } else if let Some(node_id) = self.frame.hovered_node {
                self.begin_node_selection(node_id);
            } else if input.item_active || input.item_hovered {
                self.set_interaction(ClickInteraction::HostItem);
            } else if self.mouse_in_canvas() {
                let anchor = self.screen_to_grid(input.mouse_pos);
                self.set_interaction(ClickInteraction::BoxSelection { anchor });
            }
        } else if pan_clicked
            && self.frame.nothing_hovered()
            && !input.item_hovered
            && self.mouse_in_canvas()
        {
            self.set_interaction(ClickInteraction::Panning);
        }
    }

    fn set_interaction(&mut self, next: ClickInteraction) {
        if self.click_interaction != next {
            log::debug!("click interaction {:?} -> {:?}", self.click_interaction, next);
        }
        self.click_interaction = next;
    }

    fn begin_link_interaction(&mut self, link_id: i32) {
        let Some(link) = self.frame.link_geometry(link_id).copied() else {
            return;
        };

        // A pin flagged for drag-detach takes precedence over selection.
        if let Some(pin_id) = self.frame.hovered_pin {
            let detachable = self
                .pin_this_frame(pin_id)
                .map_or(false, |pin| pin.flags.detach_with_drag_click);
            if detachable && (pin_id == link.start_pin_id || pin_id == link.end_pin_id) {
                self.begin_link_detach(&link, pin_id);
                return;
            }
        }

        let modifier_held = self
            .io
            .link_detach_with_modifier_click
            .map_or(false, |m| self.frame.input.modifiers.is_held(m));
        if modifier_held {
            let mouse = self.frame.input.mouse_pos;
            let closest = if link.start.distance_sq(mouse) < link.end.distance_sq(mouse) {
                link.start_pin_id
            } else {
                link.end_pin_id
            };
            self.begin_link_detach(&link, closest);
            return;
        }

        let multi_select = self
            .frame
            .input
            .modifiers
            .is_held(self.io.multiple_select_modifier);

        if !multi_select {
            self.selected_nodes.clear();
        }
        self.selected_links.handle_click(link_id, multi_select);
        self.set_interaction(ClickInteraction::Link);
    }

    fn begin_link_detach(&mut self, link: &LinkGeometry, detach_pin: i32) {
        let start_pin = if detach_pin == link.start_pin_id {
            link.end_pin_id
        } else {
            link.start_pin_id
        };
        log::debug!("link {} detached from pin {}", link.id, detach_pin);
        self.frame.events.link_destroyed = Some(link.id);
        self.selected_links.deselect(link.id);
        self.set_interaction(ClickInteraction::LinkCreation(LinkCreation {
            start_pin,
            end_pin: None,
            source: LinkCreationSource::Detach,
            created: None,
        }));
    }

    fn begin_link_creation(&mut self, pin_id: i32) {
        log::debug!("link started from pin {}", pin_id);
        self.frame.events.link_started = Some(pin_id);
        self.set_interaction(ClickInteraction::LinkCreation(LinkCreation {
            start_pin: pin_id,
            end_pin: None,
            source: LinkCreationSource::Pin,
            created: None,
        }));
    }

    fn begin_node_selection(&mut self, node_id: i32) {
        let multi_select = self
            .frame
            .input
            .modifiers
            .is_held(self.io.multiple_select_modifier);

        if !multi_select && !self.selected_nodes.contains(node_id) {
            self.selected_links.clear();
        }
        self.selected_nodes.handle_click(node_id, multi_select);
        self.raise_node(node_id);
        self.set_interaction(ClickInteraction::Node);
    }

    /// Advance the current gesture by one frame.
    pub(crate) fn update_click_interaction(&mut self) {
        let input = self.frame.input;

        match self.click_interaction {
            ClickInteraction::None => {}
            ClickInteraction::Node => {
                if input.primary.dragging {
                    self.translate_selected_nodes(input.mouse_delta - self.auto_panning_delta);
                }
                if !input.primary.down {
                    self.set_interaction(ClickInteraction::None);
                }
            }
            ClickInteraction::Link | ClickInteraction::HostItem => {
                if !input.primary.down {
                    self.set_interaction(ClickInteraction::None);
                }
            }
            ClickInteraction::BoxSelection { anchor } => {
                let rect = Rect::from_corners(self.grid_to_screen(anchor), input.mouse_pos);
                self.apply_box_selection(rect);
                self.frame.box_selector = Some(rect);

                if !input.primary.down {
                    let selected: Vec<i32> = self
                        .node_depth_order
                        .iter()
                        .copied()
                        .filter(|&id| self.selected_nodes.contains(id))
                        .collect();
                    for id in selected {
                        self.raise_node(id);
                    }
                    self.set_interaction(ClickInteraction::None);
                }
            }
            ClickInteraction::Panning => {
                let button = input.panning_button(&self.io);
                if button.down {
                    self.panning += input.mouse_delta;
                } else {
                    self.set_interaction(ClickInteraction::None);
                }
            }
            ClickInteraction::LinkCreation(state) => self.update_link_creation(state),
        }
    }

    fn update_link_creation(&mut self, mut state: LinkCreation) {
        let input = self.frame.input;

        let Some(start_kind) = self.pin_this_frame(state.start_pin).map(|p| p.kind) else {
            log::warn!(
                "pin {} vanished while a link was dragged from it",
                state.start_pin
            );
            self.set_interaction(ClickInteraction::None);
            return;
        };

        let snap_target = self
            .frame
            .hovered_pin
            .filter(|&pin| self.should_link_snap_to_pin(state.start_pin, pin, state.created));
        state.end_pin = snap_target;

        let create_on_snap = snap_target
            .and_then(|pin| self.pin_this_frame(pin))
            .map_or(false, |pin| pin.flags.create_on_snap);
        let released = !input.primary.down;
        let create_link = snap_target.is_some() && (released || create_on_snap);

        if let (true, Some(end_pin)) = (create_link, snap_target) {
            let pair = match start_kind {
                PinKind::Output => (state.start_pin, end_pin),
                PinKind::Input => (end_pin, state.start_pin),
            };
            if state.created != Some(pair) {
                let created = CreatedLink {
                    start_pin: pair.0,
                    end_pin: pair.1,
                    start_node: self.node_id_of_pin(pair.0).unwrap_or_default(),
                    end_node: self.node_id_of_pin(pair.1).unwrap_or_default(),
                    from_snap: !released,
                };
                log::debug!("link created: {:?}", created);
                self.frame.events.link_created = Some(created);
                state.created = Some(pair);
            }
        }

        if released {
            if !create_link {
                let dropped = DroppedLink {
                    start_pin: state.start_pin,
                    from_detach: state.source == LinkCreationSource::Detach,
                };
                log::debug!("link dropped: {:?}", dropped);
                self.frame.events.link_dropped = Some(dropped);
            }
            self.set_interaction(ClickInteraction::None);
        } else {
            self.click_interaction = ClickInteraction::LinkCreation(state);
        }
    }

    /// Whether a link dragged from `start_pin` should snap onto `hovered_pin`.
    ///
    /// The validator decides; a duplicate is still accepted when it is the link
    /// this drag already created on snap, so the preview stays attached.
    fn should_link_snap_to_pin(
        &self,
        start_pin: i32,
        hovered_pin: i32,
        created: Option<(i32, i32)>,
    ) -> bool {
        let (Some(start), Some(end)) =
            (self.pin_this_frame(start_pin), self.pin_this_frame(hovered_pin))
        else {
            return false;
        };

        let existing: Vec<LinkEnds> = self
            .links
            .iter_in_use()
            .filter(|(_, link)| self.frame.events.link_destroyed != Some(link.id))
            .map(|(_, link)| LinkEnds::new(link.start_pin_id, link.end_pin_id))
            .collect();

        match self.validator.validate(start, end, &existing) {
            ValidationResult::Valid => true,
            ValidationResult::Invalid(ValidationError::DuplicateLink) => created
                .map_or(false, |(a, b)| {
                    LinkEnds::new(a, b).connects(start_pin, hovered_pin)
                }),
            ValidationResult::Invalid(_) => false,
        }
    }

    fn apply_box_selection(&mut self, rect: Rect) {
        let nodes = nodes_in_selection_box(&rect, self.frame.node_geometry.iter().copied());
        self.selected_nodes.replace_selection(nodes);

        let links = links_in_selection_box(
            &rect,
            &self.frame.link_geometry,
            self.styles.style().link_line_segments_per_length,
        );
        self.selected_links.replace_selection(links);
    }

    fn translate_selected_nodes(&mut self, delta: Vec2) {
        for id in self.selected_nodes.sorted_ids() {
            let draggable = self.nodes.get_by_id(id).map_or(true, |node| node.draggable);
            if !draggable {
                continue;
            }
            let origin = self.origins_by_id.entry(id).or_insert(DEFAULT_NODE_ORIGIN);
            *origin += delta;
            let origin = *origin;
            if let Some(node) = self.nodes.get_by_id_mut(id) {
                node.origin = origin;
            }
        }
    }

    /// Scroll the canvas while a drag leaves it.
    pub(crate) fn apply_auto_panning(&mut self) {
        let dragging = matches!(
            self.click_interaction,
            ClickInteraction::Node
                | ClickInteraction::LinkCreation(_)
                | ClickInteraction::BoxSelection { .. }
        );
        let mouse = self.frame.input.mouse_pos;
        if !dragging || self.canvas_rect.contains(mouse) {
            return;
        }

        let direction = (self.canvas_rect.center() - mouse).normalized();
        let step = self.frame.input.delta_time * self.io.auto_panning_speed;
        self.auto_panning_delta = direction * step;
        self.panning += self.auto_panning_delta;
        log::trace!("auto panning by {:?}", self.auto_panning_delta);
    }
}
