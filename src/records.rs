//! Per-frame records for nodes, pins and links.

use crate::math::{Rect, Vec2};
use crate::pool::PoolItem;
use crate::style::{LinkColors, NodeColors, NodeLayout, PinColors};

/// Direction of an attribute's pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinKind {
    Input,
    Output,
}

impl PinKind {
    pub fn opposite(self) -> PinKind {
        match self {
            PinKind::Input => PinKind::Output,
            PinKind::Output => PinKind::Input,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinShape {
    Circle,
    #[default]
    CircleFilled,
    Triangle,
    TriangleFilled,
    Quad,
    QuadFilled,
}

/// Behaviour flags captured from the attribute flag stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinFlags {
    pub detach_with_drag_click: bool,
    pub create_on_snap: bool,
}

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: i32,
    /// Top-left corner in grid space.
    pub origin: Vec2,
    /// Screen-space bounds including padding, valid after the node ends.
    pub rect: Rect,
    pub title_bar_rect: Option<Rect>,
    pub colors: NodeColors,
    pub layout: NodeLayout,
    pub pin_indices: Vec<usize>,
    pub draggable: bool,
    pub(crate) content_rect: Rect,
}

impl NodeRecord {
    /// Title bar including padding, spanning the full node width.
    pub fn title_bar_bounds(&self) -> Option<Rect> {
        let title = self.title_bar_rect?;
        Some(Rect::new(
            self.rect.min,
            Vec2::new(self.rect.max.x, title.max.y + self.layout.padding.y),
        ))
    }
}

impl PoolItem for NodeRecord {
    fn from_id(id: i32) -> Self {
        Self {
            id,
            origin: crate::context::DEFAULT_NODE_ORIGIN,
            rect: Rect::default(),
            title_bar_rect: None,
            colors: NodeColors::default(),
            layout: NodeLayout::default(),
            pin_indices: Vec::new(),
            draggable: true,
            content_rect: Rect::empty(),
        }
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct PinRecord {
    pub id: i32,
    /// Slot index of the owning node in the node pool, valid for this frame.
    pub parent_node: usize,
    pub attribute_rect: Rect,
    pub kind: PinKind,
    pub shape: PinShape,
    /// Screen-space pin centre, computed at end of frame.
    pub screen_pos: Vec2,
    pub flags: PinFlags,
    pub colors: PinColors,
}

impl PoolItem for PinRecord {
    fn from_id(id: i32) -> Self {
        Self {
            id,
            parent_node: 0,
            attribute_rect: Rect::default(),
            kind: PinKind::Input,
            shape: PinShape::default(),
            screen_pos: Vec2::ZERO,
            flags: PinFlags::default(),
            colors: PinColors::default(),
        }
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub id: i32,
    pub start_pin_id: i32,
    pub end_pin_id: i32,
    pub colors: LinkColors,
}

impl PoolItem for LinkRecord {
    fn from_id(id: i32) -> Self {
        Self {
            id,
            start_pin_id: 0,
            end_pin_id: 0,
            colors: LinkColors::default(),
        }
    }

    fn id(&self) -> i32 {
        self.id
    }
}
