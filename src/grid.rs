use crate::math::{Rect, Vec2};
use crate::render::{Canvas, RoundedCorners};
use crate::style::{ColorStyle, Style};

/// Grids denser than this are not drawn.
const MIN_VISIBLE_SPACING: f32 = 4.0;

/// Grid line segments for a canvas of `size`, in canvas-local coordinates.
///
/// The grid scrolls with `panning`; `rem_euclid` keeps the first line inside
/// the canvas for negative offsets too.
///
/// # Returns
/// Vertical lines first (left to right), then horizontal lines (top to bottom).
pub fn grid_lines(size: Vec2, panning: Vec2, spacing: f32) -> Vec<(Vec2, Vec2)> {
    if spacing < MIN_VISIBLE_SPACING || size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }

    let offset_x = panning.x.rem_euclid(spacing);
    let offset_y = panning.y.rem_euclid(spacing);

    let mut lines = Vec::with_capacity((size.x / spacing + size.y / spacing) as usize + 2);

    let mut x = offset_x;
    while x < size.x {
        lines.push((Vec2::new(x, 0.0), Vec2::new(x, size.y)));
        x += spacing;
    }

    let mut y = offset_y;
    while y < size.y {
        lines.push((Vec2::new(0.0, y), Vec2::new(size.x, y)));
        y += spacing;
    }

    lines
}

/// Draw the grid background and, if enabled, the grid lines.
pub(crate) fn draw_grid(canvas: &mut impl Canvas, canvas_rect: Rect, panning: Vec2, style: &Style) {
    canvas.rect_filled(
        canvas_rect,
        style.color(ColorStyle::GridBackground),
        0.0,
        RoundedCorners::None,
    );

    if !style.flags.grid_lines {
        return;
    }

    let color = style.color(ColorStyle::GridLine);
    for (from, to) in grid_lines(canvas_rect.size(), panning, style.grid_spacing) {
        canvas.line(canvas_rect.min + from, canvas_rect.min + to, color, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, DrawList};

    // ========================================================================
    // grid_lines()
    // ========================================================================

    #[test]
    fn test_grid_lines_start_at_origin() {
        let lines = grid_lines(Vec2::new(100.0, 100.0), Vec2::ZERO, 25.0);
        assert_eq!(lines[0], (Vec2::new(0.0, 0.0), Vec2::new(0.0, 100.0)));
        assert_eq!(lines[1], (Vec2::new(25.0, 0.0), Vec2::new(25.0, 100.0)));
        assert!(lines.contains(&(Vec2::new(0.0, 25.0), Vec2::new(100.0, 25.0))));
        // 4 vertical + 4 horizontal
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_grid_lines_pan_wraps_with_modulo() {
        let a = grid_lines(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        let b = grid_lines(Vec2::new(100.0, 100.0), Vec2::new(20.0, -40.0), 20.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_lines_negative_pan_stays_inside() {
        let lines = grid_lines(Vec2::new(100.0, 100.0), Vec2::new(-10.0, -10.0), 32.0);
        assert!(!lines.is_empty());
        for (from, to) in lines {
            assert!(from.x >= 0.0 && from.y >= 0.0);
            assert!(to.x <= 100.0 && to.y <= 100.0);
        }
    }

    #[test]
    fn test_grid_lines_too_dense_is_empty() {
        assert!(grid_lines(Vec2::new(100.0, 100.0), Vec2::ZERO, 3.9).is_empty());
        assert!(!grid_lines(Vec2::new(100.0, 100.0), Vec2::ZERO, 4.0).is_empty());
    }

    #[test]
    fn test_grid_lines_empty_canvas() {
        assert!(grid_lines(Vec2::ZERO, Vec2::ZERO, 32.0).is_empty());
    }

    // ========================================================================
    // draw_grid()
    // ========================================================================

    #[test]
    fn test_draw_grid_offsets_by_canvas_origin() {
        let style = Style::default();
        let canvas_rect = Rect::from_min_size(Vec2::new(50.0, 20.0), Vec2::new(64.0, 64.0));
        let mut list = DrawList::new();

        draw_grid(&mut list, canvas_rect, Vec2::ZERO, &style);

        assert!(matches!(
            list.commands[0],
            DrawCommand::RectFilled { rect, .. } if rect == canvas_rect
        ));
        assert!(matches!(
            list.commands[1],
            DrawCommand::Line { from, .. } if from == Vec2::new(50.0, 20.0)
        ));
    }

    #[test]
    fn test_draw_grid_without_lines_only_fills() {
        let mut style = Style::default();
        style.flags.grid_lines = false;
        let mut list = DrawList::new();

        draw_grid(&mut list, Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)), Vec2::ZERO, &style);

        assert_eq!(list.commands.len(), 1);
    }
}
