//! Analytic signed-distance shapes.
//!
//! Distances are negative inside, zero on the boundary and positive outside. Rounded rectangles
//! and ellipses are evaluated in shape-local coordinates with the origin at the shape center;
//! lines are evaluated in whatever frame their endpoints were given in.

use crate::foundation::core::{PixelRect, Point};

/// A shape that can report signed distance at a point.
pub trait Sdf {
    /// Signed distance from `(x, y)` to the shape boundary.
    fn distance(&self, x: f64, y: f64) -> f64;

    /// Return `true` when `(x, y)` is inside or on the boundary.
    #[inline]
    fn contains(&self, x: f64, y: f64) -> bool {
        self.distance(x, y) <= 0.0
    }
}

/// A convex, vertically symmetric shape whose horizontal extent can be solved per scanline.
pub trait SpanSdf: Sdf {
    /// Horizontal extent `[left, right]` of the shape at local `y`.
    ///
    /// Rows that miss the shape return the empty span `(0, 0)`.
    fn span_at_y(&self, y: f64) -> Span;

    /// Half extents `(hx, hy)` of the shape's bounding box.
    fn half_extents(&self) -> (f64, f64);
}

/// Horizontal run of a shape on one scanline, in shape-local x.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Span {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
}

impl Span {
    /// The row-miss sentinel.
    pub const EMPTY: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    /// Return `true` when the span covers nothing.
    pub fn is_empty(self) -> bool {
        self.right <= self.left
    }

    /// Overlap of two spans; empty if either is empty.
    pub fn intersect(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        let left = self.left.max(other.left);
        let right = self.right.min(other.right);
        if right <= left {
            Self::EMPTY
        } else {
            Self { left, right }
        }
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Distance to an axis-aligned ellipse centered at the origin.
///
/// First-order approximation (implicit value over gradient length); exact for circles and
/// always sign-correct, which is all coverage classification needs.
#[inline]
fn ellipse_distance(px: f64, py: f64, rx: f64, ry: f64) -> f64 {
    if rx <= 0.0 || ry <= 0.0 {
        return px.abs().max(py.abs());
    }
    let nx = px / rx;
    let ny = py / ry;
    let len = (nx * nx + ny * ny).sqrt();
    if len < 1e-12 {
        return -rx.min(ry);
    }
    let grad = (nx * nx / rx / rx + ny * ny / ry / ry).sqrt() / len;
    (len - 1.0) / grad
}

/// Half-width of an ellipse with radii `(rx, ry)` at height `y` from its center.
#[inline]
fn ellipse_half_width(y: f64, rx: f64, ry: f64) -> Option<f64> {
    if ry <= 0.0 {
        return None;
    }
    let t = y / ry;
    let k = 1.0 - t * t;
    if k < 0.0 { None } else { Some(rx * k.sqrt()) }
}

/// Rounded rectangle with independent horizontal and vertical corner radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRectSdf {
    hx: f64,
    hy: f64,
    rx: f64,
    ry: f64,
}

impl RoundedRectSdf {
    /// Rounded rectangle of `width x height`; radii are clamped to half of each dimension.
    pub fn new(width: f64, height: f64, rx: f64, ry: f64) -> Self {
        let hx = sanitize_extent(width) * 0.5;
        let hy = sanitize_extent(height) * 0.5;
        Self {
            hx,
            hy,
            rx: sanitize_extent(rx).min(hx),
            ry: sanitize_extent(ry).min(hy),
        }
    }

    /// Effective (clamped) corner radii.
    pub fn radii(&self) -> (f64, f64) {
        (self.rx, self.ry)
    }

    /// Return `true` when the shape has zero area.
    pub fn is_empty(&self) -> bool {
        self.hx <= 0.0 || self.hy <= 0.0
    }
}

impl Sdf for RoundedRectSdf {
    #[inline]
    fn distance(&self, x: f64, y: f64) -> f64 {
        let ax = x.abs();
        let ay = y.abs();
        if self.rx <= 0.0 || self.ry <= 0.0 {
            let qx = ax - self.hx;
            let qy = ay - self.hy;
            let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
            return outside + qx.max(qy).min(0.0);
        }
        // Offset from the corner-ellipse centers; positive on both axes means the corner arc.
        let qx = ax - (self.hx - self.rx);
        let qy = ay - (self.hy - self.ry);
        if qx > 0.0 && qy > 0.0 {
            ellipse_distance(qx, qy, self.rx, self.ry)
        } else {
            (ax - self.hx).max(ay - self.hy)
        }
    }
}

impl SpanSdf for RoundedRectSdf {
    fn span_at_y(&self, y: f64) -> Span {
        let ay = y.abs();
        if self.is_empty() || ay > self.hy {
            return Span::EMPTY;
        }
        let straight = self.hy - self.ry;
        let half = if ay <= straight || self.rx <= 0.0 {
            self.hx
        } else {
            match ellipse_half_width(ay - straight, self.rx, self.ry) {
                Some(w) => self.hx - self.rx + w,
                None => return Span::EMPTY,
            }
        };
        if half <= 0.0 {
            return Span::EMPTY;
        }
        Span {
            left: -half,
            right: half,
        }
    }

    fn half_extents(&self) -> (f64, f64) {
        (self.hx, self.hy)
    }
}

/// Axis-aligned ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseSdf {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl EllipseSdf {
    /// Ellipse centered at `(cx, cy)` with radii `(rx, ry)`.
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self {
            cx,
            cy,
            rx: sanitize_extent(rx),
            ry: sanitize_extent(ry),
        }
    }

    /// Radii `(rx, ry)`.
    pub fn radii(&self) -> (f64, f64) {
        (self.rx, self.ry)
    }

    /// Return `true` when the ellipse has zero area.
    pub fn is_empty(&self) -> bool {
        self.rx <= 0.0 || self.ry <= 0.0
    }
}

impl Sdf for EllipseSdf {
    #[inline]
    fn distance(&self, x: f64, y: f64) -> f64 {
        ellipse_distance((x - self.cx).abs(), (y - self.cy).abs(), self.rx, self.ry)
    }
}

impl SpanSdf for EllipseSdf {
    fn span_at_y(&self, y: f64) -> Span {
        if self.is_empty() {
            return Span::EMPTY;
        }
        match ellipse_half_width(y - self.cy, self.rx, self.ry) {
            Some(w) if w > 0.0 => Span {
                left: self.cx - w,
                right: self.cx + w,
            },
            _ => Span::EMPTY,
        }
    }

    fn half_extents(&self) -> (f64, f64) {
        (self.rx, self.ry)
    }
}

/// Capsule: all points within `thickness / 2` of the segment `a..b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSdf {
    a: Point,
    b: Point,
    half_thickness: f64,
}

impl LineSdf {
    /// Capsule around segment `a..b`.
    pub fn new(a: Point, b: Point, thickness: f64) -> Self {
        Self {
            a,
            b,
            half_thickness: sanitize_extent(thickness) * 0.5,
        }
    }

    /// First endpoint.
    pub fn start(&self) -> Point {
        self.a
    }

    /// Second endpoint.
    pub fn end(&self) -> Point {
        self.b
    }

    /// Full stroke thickness.
    pub fn thickness(&self) -> f64 {
        self.half_thickness * 2.0
    }

    /// Return `true` for perfectly horizontal or vertical segments.
    pub fn is_axis_aligned(&self) -> bool {
        self.a.x == self.b.x || self.a.y == self.b.y
    }

    /// Return `true` when the segment has zero length or the capsule zero thickness.
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b || self.half_thickness <= 0.0
    }

    /// Pixel rectangle covering the capsule plus `padding` pixels on every side.
    ///
    /// Returns `None` for non-finite geometry.
    pub fn pixel_bounds(&self, padding: u32) -> Option<PixelRect> {
        if ![self.a.x, self.a.y, self.b.x, self.b.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        let pad = self.half_thickness + f64::from(padding);
        let rect = kurbo::Rect::new(
            self.a.x.min(self.b.x) - pad,
            self.a.y.min(self.b.y) - pad,
            self.a.x.max(self.b.x) + pad,
            self.a.y.max(self.b.y) + pad,
        );
        PixelRect::enclosing(rect)
    }
}

impl Sdf for LineSdf {
    #[inline]
    fn distance(&self, x: f64, y: f64) -> f64 {
        let (dx, dy) = (self.b.x - self.a.x, self.b.y - self.a.y);
        let (px, py) = (x - self.a.x, y - self.a.y);
        let len2 = dx * dx + dy * dy;
        let t = if len2 > 0.0 {
            ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (ex, ey) = (px - t * dx, py - t * dy);
        (ex * ex + ey * ey).sqrt() - self.half_thickness
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/sdf.rs"]
mod tests;
