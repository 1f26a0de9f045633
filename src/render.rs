//! Drawing surface abstraction and the editor's draw routines.
//!
//! The editor draws through [`Canvas`] only. [`DrawList`] records the calls
//! verbatim; [`SvgPathCanvas`](crate::svg::SvgPathCanvas) turns them into
//! Slint path commands.

use crate::math::{Rect, Vec2};
use crate::path::CubicBezier;
use crate::records::{NodeRecord, PinRecord, PinShape};
use crate::style::{ColorStyle, Style};
use slint::Color;

/// Segments used to approximate pin circles.
pub const CIRCLE_SEGMENTS: usize = 8;

/// Which corners of a rectangle get the corner rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundedCorners {
    All,
    Top,
    Bottom,
    None,
}

/// A 2D drawing surface.
///
/// All coordinates are in screen space.
pub trait Canvas {
    fn push_clip_rect(&mut self, rect: Rect);
    fn pop_clip_rect(&mut self);

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f32);

    fn rect(
        &mut self,
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
        thickness: f32,
    );
    fn rect_filled(&mut self, rect: Rect, color: Color, rounding: f32, corners: RoundedCorners);

    fn circle(&mut self, center: Vec2, radius: f32, color: Color, segments: usize, thickness: f32);
    fn circle_filled(&mut self, center: Vec2, radius: f32, color: Color, segments: usize);

    fn triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color, thickness: f32);
    fn triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color);

    fn quad(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color, thickness: f32);
    fn quad_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color);

    fn bezier_cubic(&mut self, curve: &CubicBezier, color: Color, thickness: f32);
}

/// One recorded [`Canvas`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PushClip(Rect),
    PopClip,
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        thickness: f32,
    },
    Rect {
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
        thickness: f32,
    },
    RectFilled {
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        segments: usize,
        thickness: f32,
    },
    CircleFilled {
        center: Vec2,
        radius: f32,
        color: Color,
        segments: usize,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
        thickness: f32,
    },
    TriangleFilled {
        points: [Vec2; 3],
        color: Color,
    },
    Quad {
        points: [Vec2; 4],
        color: Color,
        thickness: f32,
    },
    QuadFilled {
        points: [Vec2; 4],
        color: Color,
    },
    Bezier {
        curve: CubicBezier,
        color: Color,
        thickness: f32,
    },
}

/// A [`Canvas`] that records every call in order.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Curves drawn with `color`, in draw order.
    pub fn beziers_with_color(&self, color: Color) -> Vec<&CubicBezier> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Bezier { curve, color: c, .. } if *c == color => Some(curve),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles drawn with `color`, in draw order.
    pub fn filled_rects_with_color(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::RectFilled { rect, color: c, .. } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for DrawList {
    fn push_clip_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip_rect(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, thickness });
    }

    fn rect(
        &mut self,
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
        thickness: f32,
    ) {
        self.commands.push(DrawCommand::Rect { rect, color, rounding, corners, thickness });
    }

    fn rect_filled(&mut self, rect: Rect, color: Color, rounding: f32, corners: RoundedCorners) {
        self.commands.push(DrawCommand::RectFilled { rect, color, rounding, corners });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color, segments: usize, thickness: f32) {
        self.commands.push(DrawCommand::Circle { center, radius, color, segments, thickness });
    }

    fn circle_filled(&mut self, center: Vec2, radius: f32, color: Color, segments: usize) {
        self.commands.push(DrawCommand::CircleFilled { center, radius, color, segments });
    }

    fn triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Triangle { points: [p1, p2, p3], color, thickness });
    }

    fn triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color) {
        self.commands.push(DrawCommand::TriangleFilled { points: [p1, p2, p3], color });
    }

    fn quad(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Quad { points: [p1, p2, p3, p4], color, thickness });
    }

    fn quad_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color) {
        self.commands.push(DrawCommand::QuadFilled { points: [p1, p2, p3, p4], color });
    }

    fn bezier_cubic(&mut self, curve: &CubicBezier, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Bezier { curve: *curve, color, thickness });
    }
}

/// Draw a node's background, title bar and outline. Pins are drawn separately.
pub(crate) fn draw_node(
    canvas: &mut impl Canvas,
    node: &NodeRecord,
    hovered: bool,
    selected: bool,
    style: &Style,
) {
    let colors = &node.colors;
    let (background, titlebar) = if selected {
        (colors.background_selected, colors.titlebar_selected)
    } else if hovered {
        (colors.background_hovered, colors.titlebar_hovered)
    } else {
        (colors.background, colors.titlebar)
    };
    let rounding = node.layout.corner_rounding;

    canvas.rect_filled(node.rect, background, rounding, RoundedCorners::All);

    if let Some(title_bar) = node.title_bar_bounds() {
        canvas.rect_filled(title_bar, titlebar, rounding, RoundedCorners::Top);
    }

    if style.flags.node_outline {
        canvas.rect(
            node.rect,
            colors.outline,
            rounding,
            RoundedCorners::All,
            node.layout.border_thickness,
        );
    }
}

pub(crate) fn draw_pin(canvas: &mut impl Canvas, pin: &PinRecord, hovered: bool, style: &Style) {
    let color = if hovered {
        pin.colors.hovered
    } else {
        pin.colors.background
    };
    let pos = pin.screen_pos;

    match pin.shape {
        PinShape::Circle => canvas.circle(
            pos,
            style.pin_circle_radius,
            color,
            CIRCLE_SEGMENTS,
            style.pin_line_thickness,
        ),
        PinShape::CircleFilled => {
            canvas.circle_filled(pos, style.pin_circle_radius, color, CIRCLE_SEGMENTS)
        }
        PinShape::Quad | PinShape::QuadFilled => {
            let half = 0.5 * style.pin_quad_side_length;
            let p1 = pos + Vec2::new(-half, half);
            let p2 = pos + Vec2::new(half, half);
            let p3 = pos + Vec2::new(half, -half);
            let p4 = pos + Vec2::new(-half, -half);
            if pin.shape == PinShape::Quad {
                canvas.quad(p1, p2, p3, p4, color, style.pin_line_thickness);
            } else {
                canvas.quad_filled(p1, p2, p3, p4, color);
            }
        }
        PinShape::Triangle | PinShape::TriangleFilled => {
            // Centroid of the triangle sits on the pin position.
            let side = style.pin_triangle_side_length;
            let left = -side / 6.0;
            let right = side / 3.0;
            let vertical = 0.5 * side;
            let p1 = pos + Vec2::new(left, vertical);
            let p2 = pos + Vec2::new(right, 0.0);
            let p3 = pos + Vec2::new(left, -vertical);
            if pin.shape == PinShape::Triangle {
                canvas.triangle(p1, p2, p3, color, 2.0 * style.pin_line_thickness);
            } else {
                canvas.triangle_filled(p1, p2, p3, color);
            }
        }
    }
}

pub(crate) fn draw_box_selector(canvas: &mut impl Canvas, rect: Rect, style: &Style) {
    canvas.rect_filled(rect, style.color(ColorStyle::BoxSelector), 0.0, RoundedCorners::None);
    canvas.rect(
        rect,
        style.color(ColorStyle::BoxSelectorOutline),
        0.0,
        RoundedCorners::None,
        1.0,
    );
}
