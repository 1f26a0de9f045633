//! [`Canvas`] implementation producing SVG path commands for Slint `Path`
//! elements.
//!
//! Consecutive primitives with the same colour, fill mode and stroke width are
//! merged into one [`PathLayer`], so a typical frame becomes a handful of
//! `Path { commands: layer.commands; ... }` elements in draw order.
//!
//! ```ignore
//! let model = Rc::new(VecModel::<EditorPath>::default());
//! let mut canvas = SvgPathCanvas::new();
//! canvas.bind_model(model.clone(), |layer| EditorPath {
//!     commands: layer.commands.clone(),
//!     fill: if layer.filled { layer.color } else { Color::default() },
//!     stroke: if layer.filled { Color::default() } else { layer.color },
//!     stroke_width: layer.thickness,
//! });
//! window.set_editor_paths(ModelRc::from(model));
//!
//! frame.end(&mut canvas)?;
//! canvas.finish(); // syncs the bound model
//! ```

use crate::math::{Rect, Vec2};
use crate::path::CubicBezier;
use crate::render::{Canvas, RoundedCorners};
use slint::{Color, Model, SharedString, VecModel};
use std::fmt::Write;
use std::rc::Rc;

/// A run of primitives sharing one paint.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLayer {
    pub commands: SharedString,
    pub color: Color,
    pub filled: bool,
    pub thickness: f32,
}

struct PendingLayer {
    commands: String,
    color: Color,
    filled: bool,
    thickness: f32,
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, layers: &[PathLayer]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&PathLayer) -> P,
{
    fn sync(&self, layers: &[PathLayer]) {
        // Update existing rows or add new ones
        for (i, layer) in layers.iter().enumerate() {
            let item = (self.constructor)(layer);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > layers.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

#[derive(Default)]
pub struct SvgPathCanvas {
    pending: Vec<PendingLayer>,
    layers: Vec<PathLayer>,
    clip_stack: Vec<Rect>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl SvgPathCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a Slint model that receives the layers on every [`finish`](Self::finish).
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&PathLayer) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Innermost clip rectangle pushed by the editor, if any.
    ///
    /// Slint clips `Path` elements to their parent, so hosts usually size the
    /// parent to this rectangle instead of clipping every primitive.
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Convert the recorded primitives into layers and sync the bound model.
    pub fn finish(&mut self) -> &[PathLayer] {
        self.layers = self
            .pending
            .drain(..)
            .map(|p| PathLayer {
                commands: SharedString::from(p.commands.as_str()),
                color: p.color,
                filled: p.filled,
                thickness: p.thickness,
            })
            .collect();
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.layers);
        }
        log::trace!("svg canvas produced {} path layers", self.layers.len());
        &self.layers
    }

    pub fn layers(&self) -> &[PathLayer] {
        &self.layers
    }

    fn layer(&mut self, color: Color, filled: bool, thickness: f32) -> &mut String {
        let thickness = if filled { 0.0 } else { thickness };
        let reuse = matches!(
            self.pending.last(),
            Some(last)
                if last.color == color && last.filled == filled && last.thickness == thickness
        );
        if !reuse {
            self.pending.push(PendingLayer {
                commands: String::new(),
                color,
                filled,
                thickness,
            });
        }
        let last = self.pending.len() - 1;
        let commands = &mut self.pending[last].commands;
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands
    }

    fn polygon(&mut self, points: &[Vec2], color: Color, filled: bool, thickness: f32) {
        let out = self.layer(color, filled, thickness);
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { "M" } else { "L" };
            let _ = write!(out, "{} {} {} ", op, p.x, p.y);
        }
        out.push('Z');
    }

    fn rounded_rect(
        &mut self,
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
        filled: bool,
        thickness: f32,
    ) {
        let out = self.layer(color, filled, thickness);
        let r = rounding
            .min(rect.width() * 0.5)
            .min(rect.height() * 0.5)
            .max(0.0);
        let (top, bottom) = match corners {
            RoundedCorners::All => (r, r),
            RoundedCorners::Top => (r, 0.0),
            RoundedCorners::Bottom => (0.0, r),
            RoundedCorners::None => (0.0, 0.0),
        };
        let Rect { min, max } = rect;

        let _ = write!(out, "M {} {}", min.x + top, min.y);
        let _ = write!(out, " L {} {}", max.x - top, min.y);
        if top > 0.0 {
            let _ = write!(out, " A {} {} 0 0 1 {} {}", top, top, max.x, min.y + top);
        }
        let _ = write!(out, " L {} {}", max.x, max.y - bottom);
        if bottom > 0.0 {
            let _ = write!(out, " A {} {} 0 0 1 {} {}", bottom, bottom, max.x - bottom, max.y);
        }
        let _ = write!(out, " L {} {}", min.x + bottom, max.y);
        if bottom > 0.0 {
            let _ = write!(out, " A {} {} 0 0 1 {} {}", bottom, bottom, min.x, max.y - bottom);
        }
        let _ = write!(out, " L {} {}", min.x, min.y + top);
        if top > 0.0 {
            let _ = write!(out, " A {} {} 0 0 1 {} {}", top, top, min.x + top, min.y);
        }
        out.push_str(" Z");
    }

    fn circle_path(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Color,
        filled: bool,
        thickness: f32,
    ) {
        let out = self.layer(color, filled, thickness);
        let _ = write!(
            out,
            "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
            center.x - radius,
            center.y,
            radius,
            radius,
            center.x + radius,
            center.y,
            radius,
            radius,
            center.x - radius,
            center.y
        );
    }
}

impl Canvas for SvgPathCanvas {
    fn push_clip_rect(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
    }

    fn pop_clip_rect(&mut self) {
        self.clip_stack.pop();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f32) {
        let out = self.layer(color, false, thickness);
        let _ = write!(out, "M {} {} L {} {}", from.x, from.y, to.x, to.y);
    }

    fn rect(
        &mut self,
        rect: Rect,
        color: Color,
        rounding: f32,
        corners: RoundedCorners,
        thickness: f32,
    ) {
        self.rounded_rect(rect, color, rounding, corners, false, thickness);
    }

    fn rect_filled(&mut self, rect: Rect, color: Color, rounding: f32, corners: RoundedCorners) {
        self.rounded_rect(rect, color, rounding, corners, true, 0.0);
    }

    fn circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Color,
        _segments: usize,
        thickness: f32,
    ) {
        self.circle_path(center, radius, color, false, thickness);
    }

    fn circle_filled(&mut self, center: Vec2, radius: f32, color: Color, _segments: usize) {
        self.circle_path(center, radius, color, true, 0.0);
    }

    fn triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color, thickness: f32) {
        self.polygon(&[p1, p2, p3], color, false, thickness);
    }

    fn triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color) {
        self.polygon(&[p1, p2, p3], color, true, 0.0);
    }

    fn quad(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color, thickness: f32) {
        self.polygon(&[p1, p2, p3, p4], color, false, thickness);
    }

    fn quad_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, color: Color) {
        self.polygon(&[p1, p2, p3, p4], color, true, 0.0);
    }

    fn bezier_cubic(&mut self, curve: &CubicBezier, color: Color, thickness: f32) {
        let out = self.layer(color, false, thickness);
        let _ = write!(
            out,
            "M {} {} C {} {} {} {} {} {}",
            curve.p0.x,
            curve.p0.y,
            curve.p1.x,
            curve.p1.y,
            curve.p2.x,
            curve.p2.y,
            curve.p3.x,
            curve.p3.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue() -> Color {
        Color::from_rgb_u8(0, 0, 255)
    }

    #[test]
    fn test_bezier_command_format() {
        let mut canvas = SvgPathCanvas::new();
        let curve = CubicBezier::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(25.0, 0.0),
            Vec2::new(75.0, 100.0),
            Vec2::new(100.0, 100.0),
            10,
        );
        canvas.bezier_cubic(&curve, blue(), 3.0);

        let layers = canvas.finish();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].commands.as_str(), "M 0 0 C 25 0 75 100 100 100");
        assert_eq!(layers[0].thickness, 3.0);
        assert!(!layers[0].filled);
    }

    #[test]
    fn test_same_paint_merges_into_one_layer() {
        let mut canvas = SvgPathCanvas::new();
        canvas.line(Vec2::ZERO, Vec2::new(10.0, 0.0), blue(), 1.0);
        canvas.line(Vec2::ZERO, Vec2::new(0.0, 10.0), blue(), 1.0);

        let layers = canvas.finish();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].commands.as_str(), "M 0 0 L 10 0 M 0 0 L 0 10");
    }

    #[test]
    fn test_paint_change_starts_new_layer_in_order() {
        let red = Color::from_rgb_u8(255, 0, 0);
        let mut canvas = SvgPathCanvas::new();
        canvas.line(Vec2::ZERO, Vec2::new(10.0, 0.0), blue(), 1.0);
        let rect = Rect::new(Vec2::ZERO, Vec2::new(5.0, 5.0));
        canvas.rect_filled(rect, red, 0.0, RoundedCorners::None);
        canvas.line(Vec2::ZERO, Vec2::new(0.0, 10.0), blue(), 1.0);

        let layers = canvas.finish();
        assert_eq!(layers.len(), 3);
        assert!(layers[1].filled);
        assert_eq!(layers[1].color, red);
    }

    #[test]
    fn test_square_rect_path_is_closed() {
        let mut canvas = SvgPathCanvas::new();
        canvas.rect_filled(
            Rect::new(Vec2::ZERO, Vec2::new(10.0, 20.0)),
            blue(),
            0.0,
            RoundedCorners::All,
        );
        let layers = canvas.finish();
        assert_eq!(
            layers[0].commands.as_str(),
            "M 0 0 L 10 0 L 10 20 L 0 20 L 0 0 Z"
        );
    }

    #[test]
    fn test_rounded_rect_uses_arcs_only_where_requested() {
        let mut canvas = SvgPathCanvas::new();
        canvas.rect_filled(
            Rect::new(Vec2::ZERO, Vec2::new(40.0, 20.0)),
            blue(),
            4.0,
            RoundedCorners::Top,
        );
        let commands = canvas.finish()[0].commands.to_string();
        assert_eq!(commands.matches(" A ").count(), 2);
    }

    #[test]
    fn test_finish_syncs_bound_model() {
        let model: Rc<VecModel<SharedString>> = Rc::new(VecModel::from(vec![
            SharedString::from("stale"),
            SharedString::from("stale"),
            SharedString::from("stale"),
        ]));
        let mut canvas = SvgPathCanvas::new();
        canvas.bind_model(model.clone(), |layer| layer.commands.clone());

        canvas.line(Vec2::ZERO, Vec2::new(1.0, 1.0), blue(), 1.0);
        canvas.finish();

        assert_eq!(model.row_count(), 1);
        assert_eq!(model.row_data(0).unwrap().as_str(), "M 0 0 L 1 1");
    }

    #[test]
    fn test_clip_stack() {
        let mut canvas = SvgPathCanvas::new();
        let r = Rect::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        canvas.push_clip_rect(r);
        assert_eq!(canvas.clip_rect(), Some(r));
        canvas.pop_clip_rect();
        assert_eq!(canvas.clip_rect(), None);
    }
}
