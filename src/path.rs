//! Cubic bezier kernel used for link rendering, hover and box selection.
//!
//! Everything in here is pure math. Degenerate input (coincident control points,
//! zero-length links, empty rectangles) produces finite results, never NaN.

use crate::math::{Rect, Vec2};
use crate::records::PinKind;

/// Number of segments the closest-point search splits its range into.
const CLOSEST_POINT_SEGMENTS: usize = 5;
/// Refinement iterations per unit of control-polygon length.
const ITERATIONS_PER_LENGTH: f32 = 0.01;
const MIN_ITERATIONS: f32 = 2.0;
const MAX_ITERATIONS: f32 = 8.0;

/// Cubic bezier curve with a tessellation hint for rendering and polyline tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // Control point 1
    pub p2: Vec2, // Control point 2
    pub p3: Vec2, // End point
    pub num_segments: usize,
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, num_segments: usize) -> Self {
        Self {
            p0,
            p1,
            p2,
            p3,
            num_segments: num_segments.max(1),
        }
    }

    /// Build the curve drawn for a link between two pins.
    ///
    /// The curve always leaves the output side to the right and enters the input
    /// side from the left, so when `start_kind` is [`PinKind::Input`] the
    /// endpoints are swapped first. The horizontal control offset is a quarter
    /// of the link length.
    ///
    /// # Arguments
    /// * `start`, `end` - Pin centers in screen space
    /// * `start_kind` - Kind of the pin at `start`
    /// * `segments_per_length` - Tessellation density (segments per pixel)
    pub fn for_link(start: Vec2, end: Vec2, start_kind: PinKind, segments_per_length: f32) -> Self {
        let (start, end) = match start_kind {
            PinKind::Input => (end, start),
            PinKind::Output => (start, end),
        };

        let link_length = start.distance(end);
        let offset = Vec2::new(0.25 * link_length, 0.0);
        let num_segments = (link_length * segments_per_length) as usize;

        Self::new(start, start + offset, end - offset, end, num_segments)
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0), Bernstein form.
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// Length of the control polygon, an upper bound of the arc length.
    pub fn control_polygon_length(&self) -> f32 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Iterate the tessellated polyline points, `num_segments + 1` of them.
    pub fn polyline(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.num_segments.max(1);
        (0..=n).map(move |i| self.eval(i as f32 / n as f32))
    }
}

/// Approximate parameter of the point on `curve` closest to `point`.
///
/// Coarse-to-fine search: split `[tstart, tend]` into five segments, evaluate
/// the midpoints, keep the best, then shrink the range to that segment and
/// repeat. Longer curves get more iterations (2 to 8). The answer is bounded
/// in cost, not exact.
pub fn closest_point_param(curve: &CubicBezier, point: Vec2) -> f32 {
    let iterations = (curve.control_polygon_length() * ITERATIONS_PER_LENGTH)
        .clamp(MIN_ITERATIONS, MAX_ITERATIONS) as usize;

    let mut tstart = 0.0_f32;
    let mut tend = 1.0_f32;
    let mut tbest = 0.5_f32;
    let mut best_distance_sq = f32::MAX;

    for _ in 0..iterations {
        let dt = (tend - tstart) / CLOSEST_POINT_SEGMENTS as f32;
        for s in 0..CLOSEST_POINT_SEGMENTS {
            let tmid = tstart + dt * (s as f32 + 0.5);
            let distance_sq = curve.eval(tmid).distance_sq(point);
            if distance_sq < best_distance_sq {
                best_distance_sq = distance_sq;
                tbest = tmid;
            }
        }
        tstart = tbest - 0.5 * dt;
        tend = tbest + 0.5 * dt;
    }

    tbest
}

/// Distance from `point` to the (approximate) closest point on `curve`.
pub fn distance_to_bezier(point: Vec2, curve: &CubicBezier) -> f32 {
    let t = closest_point_param(curve, point);
    curve.eval(t).distance(point)
}

/// Bounding box of the four control points.
///
/// Contains the curve (convex hull property) but is not tight. Only meant as a
/// cheap broad phase before [`distance_to_bezier`].
pub fn bounding_rect_of_bezier(curve: &CubicBezier) -> Rect {
    let mut rect = Rect::from_corners(curve.p0, curve.p3);
    rect.add_point(curve.p1);
    rect.add_point(curve.p2);
    rect
}

/// Signed implicit line equation for the line through `p1` and `p2`.
fn eval_implicit_line_eq(p1: Vec2, p2: Vec2, p: Vec2) -> f32 {
    (p2.y - p1.y) * p.x + (p1.x - p2.x) * p.y + (p2.x * p1.y - p1.x * p2.y)
}

fn sign(value: f32) -> i32 {
    (value > 0.0) as i32 - (value < 0.0) as i32
}

/// Does the segment `p1`-`p2` touch `rect`?
pub fn rect_overlaps_segment(rect: &Rect, p1: Vec2, p2: Vec2) -> bool {
    // Trivial case: an endpoint is inside
    if rect.contains(p1) || rect.contains(p2) {
        return true;
    }

    let rect = Rect::from_corners(rect.min, rect.max);

    // Segment entirely to one side of the rectangle
    if (p1.x < rect.min.x && p2.x < rect.min.x)
        || (p1.x > rect.max.x && p2.x > rect.max.x)
        || (p1.y < rect.min.y && p2.y < rect.min.y)
        || (p1.y > rect.max.y && p2.y > rect.max.y)
    {
        return false;
    }

    // Otherwise the segment crosses the rectangle iff the corners are not all on
    // the same side of its supporting line.
    let corners = [
        rect.min,
        Vec2::new(rect.min.x, rect.max.y),
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
    ];
    let mut sum = 0;
    let mut sum_abs = 0;
    for corner in corners {
        let s = sign(eval_implicit_line_eq(p1, p2, corner));
        sum += s;
        sum_abs += s.abs();
    }

    sum.abs() != sum_abs
}

/// Polyline approximation of curve/rectangle overlap.
pub fn rect_overlaps_bezier(rect: &Rect, curve: &CubicBezier) -> bool {
    let mut points = curve.polyline();
    let Some(mut current) = points.next() else {
        return false;
    };
    for next in points {
        if rect_overlaps_segment(rect, current, next) {
            return true;
        }
        current = next;
    }
    false
}

/// Box-selection test for a link.
///
/// Broad phase against the endpoint box, then endpoint containment, then the
/// tessellated curve.
pub fn rect_overlaps_link(
    rect: &Rect,
    start: Vec2,
    end: Vec2,
    start_kind: PinKind,
    segments_per_length: f32,
) -> bool {
    let link_rect = Rect::from_corners(start, end);
    let rect = Rect::from_corners(rect.min, rect.max);

    // Horizontal and vertical links have a zero-area endpoint box; compare
    // inclusively so they are not rejected by the strict overlap test.
    let broad_phase = link_rect.min.x <= rect.max.x
        && link_rect.max.x >= rect.min.x
        && link_rect.min.y <= rect.max.y
        && link_rect.max.y >= rect.min.y;
    if !broad_phase {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let curve = CubicBezier::for_link(start, end, start_kind, segments_per_length);
    rect_overlaps_bezier(&rect, &curve)
}
