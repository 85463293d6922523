//! Anti-aliased fills and inside-aligned strokes for rounded rectangles, ellipses and lines.
//!
//! Every operation picks one of two strategies:
//!
//! - a fast path for opaque, pixel-aligned shapes that paints straight interior regions with the
//!   target's native opaque fill and samples only the four corner tiles;
//! - a general path that rasterizes the (clipped) shape footprint into a pooled surface and
//!   blends it onto the target once.
//!
//! Oversized work, failed allocations and degenerate geometry are logged and skipped; a draw
//! call never fails.

use smallvec::SmallVec;

use crate::foundation::core::{Bgra8, PixelRect, Point, Rect};
use crate::foundation::math::is_integral;
use crate::raster::coverage::{AlphaRow, PremulLut};
use crate::raster::pool::AaSurfacePool;
use crate::raster::sampler::EdgeSampler;
use crate::raster::surface::AaSurface;
use crate::render::target::{DomainId, NativeTarget};
use crate::shape::sdf::{EllipseSdf, LineSdf, RoundedRectSdf, Sdf, Span, SpanSdf};

/// Draws shapes through an [`AaSurfacePool`] and an [`EdgeSampler`].
///
/// Borrow one per draw call (or per frame); it carries no state beyond a scanline buffer.
#[derive(Debug)]
pub struct ShapeRenderer<'a> {
    pool: &'a mut AaSurfacePool,
    sampler: EdgeSampler,
    row: AlphaRow,
}

/// Shape footprint in device space, with its center and size precomputed.
#[derive(Clone, Copy, Debug)]
struct Footprint {
    rect: Rect,
    cx: f64,
    cy: f64,
}

impl Footprint {
    fn new(rect: Rect) -> Option<Self> {
        let finite = [rect.x0, rect.y0, rect.x1, rect.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || rect.x1 <= rect.x0 || rect.y1 <= rect.y0 {
            return None;
        }
        Some(Self {
            rect,
            cx: (rect.x0 + rect.x1) * 0.5,
            cy: (rect.y0 + rect.y1) * 0.5,
        })
    }

    fn width(&self) -> f64 {
        self.rect.x1 - self.rect.x0
    }

    fn height(&self) -> f64 {
        self.rect.y1 - self.rect.y0
    }

    fn is_pixel_aligned(&self) -> bool {
        [self.rect.x0, self.rect.y0, self.rect.x1, self.rect.y1]
            .iter()
            .all(|&v| is_integral(v))
    }

    fn pixels(&self) -> Option<PixelRect> {
        PixelRect::enclosing(self.rect)
    }
}

/// Corner tiles and straight bands of a pixel-aligned shape.
#[derive(Debug, Default)]
struct FastLayout {
    tiles: SmallVec<[PixelRect; 4]>,
    bands: SmallVec<[PixelRect; 4]>,
}

impl FastLayout {
    /// Largest tile, i.e. the scratch surface size needed to sample any of them.
    fn tile_extent(&self) -> (u32, u32) {
        self.tiles.iter().fold((0, 0), |(w, h), t| {
            (w.max(t.width), h.max(t.height))
        })
    }
}

/// Split a `w x h` pixel-aligned box at `(x0, y0)` into corner tiles of `rx x ry` and the
/// interior cross. Odd sizes put the extra column/row in the leading tile.
fn corner_layout(area: PixelRect, rx: f64, ry: f64) -> (FastLayout, [u32; 4]) {
    let (w, h) = (area.width, area.height);
    let left = (rx.ceil() as u32).min(w.div_ceil(2));
    let right = (rx.ceil() as u32).min(w - left);
    let top = (ry.ceil() as u32).min(h.div_ceil(2));
    let bottom = (ry.ceil() as u32).min(h - top);
    let (x1, y1) = (area.right(), area.bottom());

    let mut layout = FastLayout::default();
    for tile in [
        PixelRect::new(area.x, area.y, left, top),
        PixelRect::new(x1 - right as i32, area.y, right, top),
        PixelRect::new(area.x, y1 - bottom as i32, left, bottom),
        PixelRect::new(x1 - right as i32, y1 - bottom as i32, right, bottom),
    ] {
        if !tile.is_empty() {
            layout.tiles.push(tile);
        }
    }
    (layout, [left, right, top, bottom])
}

fn push_band(bands: &mut SmallVec<[PixelRect; 4]>, band: PixelRect) {
    if !band.is_empty() {
        bands.push(band);
    }
}

/// Sample `coverage` for every pixel of `area` into `surface`, then blend it onto `target`.
fn rasterize_area<T, F>(
    target: &mut T,
    surface: &mut AaSurface,
    row: &mut AlphaRow,
    area: PixelRect,
    lut: &PremulLut,
    mut coverage: F,
) where
    T: NativeTarget + ?Sized,
    F: FnMut(i32, i32) -> u8,
{
    row.reset(area.width as usize);
    for j in 0..area.height {
        let py = area.y + j as i32;
        for i in 0..area.width {
            row.set(i as usize, coverage(area.x + i as i32, py));
        }
        row.write_premul(lut, surface.row_span_mut(0, j, area.width));
    }
    blit_surface(target, surface, area);
}

fn blit_surface<T: NativeTarget + ?Sized>(target: &mut T, surface: &AaSurface, area: PixelRect) {
    target.blit_premul(
        surface.view(),
        PixelRect::new(0, 0, area.width, area.height),
        area.x,
        area.y,
    );
}

/// Device-pixel columns `[x0, x1)` fully covered by `span` (shape-local, offset by `cx`).
fn solid_columns(span: Span, cx: f64) -> Option<(i32, i32)> {
    if span.is_empty() {
        return None;
    }
    let x0 = (span.left + cx).ceil() as i32;
    let x1 = (span.right + cx).floor() as i32;
    (x0 < x1).then_some((x0, x1))
}

/// Span fully covering the pixel row `[top, top + 1)` of a convex, centered shape.
fn row_solid_span<S: SpanSdf + ?Sized>(sdf: &S, top: f64) -> Span {
    sdf.span_at_y(top).intersect(sdf.span_at_y(top + 1.0))
}

/// Widest span touched by the pixel row `[top, top + 1)`.
fn row_outer_span<S: SpanSdf + ?Sized>(sdf: &S, top: f64) -> Span {
    let bottom = top + 1.0;
    let y = if top >= 0.0 {
        top
    } else if bottom <= 0.0 {
        bottom
    } else {
        0.0
    };
    sdf.span_at_y(y)
}

impl<'a> ShapeRenderer<'a> {
    /// Renderer drawing through `pool` with `sampler`'s supersample factor.
    pub fn new(pool: &'a mut AaSurfacePool, sampler: EdgeSampler) -> Self {
        Self {
            pool,
            sampler,
            row: AlphaRow::new(),
        }
    }

    /// Fill a rounded rectangle with corner radii `(rx, ry)`.
    pub fn fill_rounded_rectangle<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        (rx, ry): (f64, f64),
        color: Bgra8,
    ) {
        let Some(fp) = Footprint::new(rect) else {
            tracing::debug!(?rect, "fill_rounded_rectangle: degenerate bounds, skipped");
            return;
        };
        if color.a == 0 {
            return;
        }
        let sdf = RoundedRectSdf::new(fp.width(), fp.height(), rx, ry);
        let (rx, ry) = sdf.radii();
        self.fill_shape(target, &fp, &sdf, (rx, ry), color);
    }

    /// Fill the ellipse inscribed in `rect`.
    pub fn fill_ellipse<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        color: Bgra8,
    ) {
        let Some(fp) = Footprint::new(rect) else {
            tracing::debug!(?rect, "fill_ellipse: degenerate bounds, skipped");
            return;
        };
        if color.a == 0 {
            return;
        }
        let (rx, ry) = (fp.width() * 0.5, fp.height() * 0.5);
        let sdf = EllipseSdf::new(0.0, 0.0, rx, ry);
        self.fill_shape(target, &fp, &sdf, (rx, ry), color);
    }

    /// Inside-aligned stroke of a rounded rectangle.
    pub fn draw_rounded_rectangle<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        (rx, ry): (f64, f64),
        stroke_width: f64,
        color: Bgra8,
    ) {
        let Some(fp) = Footprint::new(rect) else {
            tracing::debug!(?rect, "draw_rounded_rectangle: degenerate bounds, skipped");
            return;
        };
        if !(stroke_width > 0.0 && stroke_width.is_finite()) || color.a == 0 {
            return;
        }
        let outer = RoundedRectSdf::new(fp.width(), fp.height(), rx, ry);
        let (rx, ry) = outer.radii();
        let inner = inner_extent(&fp, stroke_width).map(|(w, h)| {
            RoundedRectSdf::new(
                w,
                h,
                (rx - stroke_width).max(0.0),
                (ry - stroke_width).max(0.0),
            )
        });
        self.stroke_shape(target, &fp, &outer, inner.as_ref(), (rx, ry), stroke_width, color);
    }

    /// Inside-aligned stroke of the ellipse inscribed in `rect`.
    pub fn draw_ellipse<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        stroke_width: f64,
        color: Bgra8,
    ) {
        let Some(fp) = Footprint::new(rect) else {
            tracing::debug!(?rect, "draw_ellipse: degenerate bounds, skipped");
            return;
        };
        if !(stroke_width > 0.0 && stroke_width.is_finite()) || color.a == 0 {
            return;
        }
        let (rx, ry) = (fp.width() * 0.5, fp.height() * 0.5);
        let outer = EllipseSdf::new(0.0, 0.0, rx, ry);
        let inner = inner_extent(&fp, stroke_width)
            .map(|(w, h)| EllipseSdf::new(0.0, 0.0, w * 0.5, h * 0.5));
        self.stroke_shape(target, &fp, &outer, inner.as_ref(), (rx, ry), stroke_width, color);
    }

    /// Straight line from `a` to `b` with round caps.
    pub fn draw_line<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        a: Point,
        b: Point,
        thickness: f64,
        color: Bgra8,
    ) {
        let line = LineSdf::new(a, b, thickness);
        if line.is_degenerate() || color.a == 0 || !thickness.is_finite() {
            tracing::debug!(?a, ?b, thickness, "draw_line: degenerate line, skipped");
            return;
        }

        if line.is_axis_aligned() && thickness <= 1.0 && color.is_opaque() {
            if let Some(px) = aliased_footprint(a, b) {
                tracing::trace!(?px, "draw_line: native fast path");
                target.fill_opaque(px, color);
            }
            return;
        }

        let Some(bounds) = line.pixel_bounds(1) else {
            tracing::debug!(?a, ?b, "draw_line: non-finite bounds, skipped");
            return;
        };
        let area = bounds.intersect(target.bounds());
        if area.is_empty() {
            return;
        }
        let Some(mut surface) = self.rent(target.domain(), area) else {
            return;
        };
        tracing::trace!(?area, "draw_line: sdf path");
        let lut = PremulLut::new(color);
        let sampler = self.sampler;
        rasterize_area(target, &mut surface, &mut self.row, area, &lut, |px, py| {
            sampler.fill_coverage(&line, f64::from(px), f64::from(py), color.a)
        });
        self.pool.give_back(surface);
    }

    fn rent(&mut self, domain: DomainId, area: PixelRect) -> Option<AaSurface> {
        let surface = self.pool.rent(domain, area.width, area.height);
        if surface.is_valid() {
            Some(surface)
        } else {
            tracing::debug!(?area, "no aa surface available, draw skipped");
            None
        }
    }

    fn fill_shape<T, S>(
        &mut self,
        target: &mut T,
        fp: &Footprint,
        sdf: &S,
        radii: (f64, f64),
        color: Bgra8,
    ) where
        T: NativeTarget + ?Sized,
        S: SpanSdf,
    {
        let Some(px) = fp.pixels() else {
            tracing::debug!(rect = ?fp.rect, "shape outside addressable range, skipped");
            return;
        };
        if px.intersect(target.bounds()).is_empty() {
            return;
        }

        if color.is_opaque() && radii.0 > 0.0 && radii.1 > 0.0 && fp.is_pixel_aligned() {
            tracing::trace!(?px, "fill: corner-tile fast path");
            let (mut layout, [left, right, top, bottom]) = corner_layout(px, radii.0, radii.1);
            let (x1, y1) = (px.right(), px.bottom());
            // Interior cross: full-height middle column plus the side bands between the tiles.
            push_band(
                &mut layout.bands,
                PixelRect::from_edges(px.x + left as i32, px.y, x1 - right as i32, y1),
            );
            push_band(
                &mut layout.bands,
                PixelRect::from_edges(px.x, px.y + top as i32, px.x + left as i32, y1 - bottom as i32),
            );
            push_band(
                &mut layout.bands,
                PixelRect::from_edges(x1 - right as i32, px.y + top as i32, x1, y1 - bottom as i32),
            );
            let (cx, cy) = (fp.cx, fp.cy);
            let sampler = self.sampler;
            self.draw_fast(target, &layout, color, |x, y| {
                sampler.fill_coverage(sdf, f64::from(x) - cx, f64::from(y) - cy, 255)
            });
            return;
        }

        tracing::trace!(?px, "fill: general span path");
        self.fill_general(target, fp, px, sdf, color);
    }

    /// Paint `layout.bands` natively and sample only the corner tiles.
    ///
    /// The scratch surface is rented before anything is painted so a rejected rent leaves the
    /// target untouched.
    fn draw_fast<T, F>(&mut self, target: &mut T, layout: &FastLayout, color: Bgra8, mut coverage: F)
    where
        T: NativeTarget + ?Sized,
        F: FnMut(i32, i32) -> u8,
    {
        let bounds = target.bounds();
        let (tw, th) = layout.tile_extent();
        let mut surface = None;
        if tw > 0 && th > 0 {
            let Some(s) = self.rent(target.domain(), PixelRect::new(0, 0, tw, th)) else {
                return;
            };
            surface = Some(s);
        }

        for band in &layout.bands {
            target.fill_opaque(*band, color);
        }
        if let Some(mut surface) = surface {
            let lut = PremulLut::new(color);
            for tile in &layout.tiles {
                let area = tile.intersect(bounds);
                if area.is_empty() {
                    continue;
                }
                rasterize_area(target, &mut surface, &mut self.row, area, &lut, &mut coverage);
            }
            self.pool.give_back(surface);
        }
    }

    fn fill_general<T, S>(&mut self, target: &mut T, fp: &Footprint, px: PixelRect, sdf: &S, color: Bgra8)
    where
        T: NativeTarget + ?Sized,
        S: SpanSdf,
    {
        let area = px.intersect(target.bounds());
        let Some(mut surface) = self.rent(target.domain(), area) else {
            return;
        };
        let lut = PremulLut::new(color);
        let sampler = self.sampler;
        let window = sampler.factor().edge_window();
        let (x_lo, x_hi) = (area.x, area.right());
        let (cx, cy) = (fp.cx, fp.cy);
        let row = &mut self.row;

        for j in 0..area.height {
            row.reset(area.width as usize);
            let top = f64::from(area.y + j as i32) - cy;
            let outer = row_outer_span(sdf, top);
            if !outer.is_empty() {
                let edge_lo = ((outer.left + cx).floor() as i32 - window).max(x_lo);
                let edge_hi = ((outer.right + cx).ceil() as i32 + window).min(x_hi);
                let mut sample = |from: i32, to: i32, row: &mut AlphaRow| {
                    for x in from..to {
                        let c = sampler.fill_coverage(sdf, f64::from(x) - cx, top, color.a);
                        row.set((x - x_lo) as usize, c);
                    }
                };
                // Only the pixels between the outer and the solid span need sampling.
                match solid_columns(row_solid_span(sdf, top), cx)
                    .map(|(s0, s1)| (s0.clamp(edge_lo, edge_hi), s1.clamp(edge_lo, edge_hi)))
                    .filter(|(s0, s1)| s0 < s1)
                {
                    Some((s0, s1)) => {
                        sample(edge_lo, s0, row);
                        row.fill_run((s0 - x_lo) as usize, (s1 - x_lo) as usize, color.a);
                        sample(s1, edge_hi, row);
                    }
                    None => sample(edge_lo, edge_hi, row),
                }
            }
            row.write_premul(&lut, surface.row_span_mut(0, j, area.width));
        }
        blit_surface(target, &surface, area);
        self.pool.give_back(surface);
    }

    #[allow(clippy::too_many_arguments)]
    fn stroke_shape<T, S>(
        &mut self,
        target: &mut T,
        fp: &Footprint,
        outer: &S,
        inner: Option<&S>,
        radii: (f64, f64),
        stroke_width: f64,
        color: Bgra8,
    ) where
        T: NativeTarget + ?Sized,
        S: SpanSdf,
    {
        let Some(px) = fp.pixels() else {
            tracing::debug!(rect = ?fp.rect, "stroke outside addressable range, skipped");
            return;
        };
        let (rx, ry) = radii;
        let fast = color.is_opaque()
            && inner.is_some()
            && rx > 0.0
            && ry > 0.0
            && stroke_width < rx
            && stroke_width < ry
            && fp.is_pixel_aligned()
            && is_integral(stroke_width);

        let (cx, cy) = (fp.cx, fp.cy);
        let sampler = self.sampler;
        if fast {
            if px.intersect(target.bounds()).is_empty() {
                return;
            }
            tracing::trace!(?px, stroke_width, "stroke: corner-tile fast path");
            let sw = stroke_width as i32;
            let (mut layout, [left, right, top, bottom]) = corner_layout(px, rx, ry);
            let (x1, y1) = (px.right(), px.bottom());
            let (mid_x0, mid_x1) = (px.x + left as i32, x1 - right as i32);
            let (mid_y0, mid_y1) = (px.y + top as i32, y1 - bottom as i32);
            push_band(&mut layout.bands, PixelRect::from_edges(mid_x0, px.y, mid_x1, px.y + sw));
            push_band(&mut layout.bands, PixelRect::from_edges(mid_x0, y1 - sw, mid_x1, y1));
            push_band(&mut layout.bands, PixelRect::from_edges(px.x, mid_y0, px.x + sw, mid_y1));
            push_band(&mut layout.bands, PixelRect::from_edges(x1 - sw, mid_y0, x1, mid_y1));
            self.draw_fast(target, &layout, color, |x, y| {
                sampler.stroke_coverage(outer, inner, f64::from(x) - cx, f64::from(y) - cy, 255)
            });
            return;
        }

        // Padding keeps samples of the outermost edge pixels inside the working surface.
        let area = px.inflate(1).intersect(target.bounds());
        if area.is_empty() {
            return;
        }
        let Some(mut surface) = self.rent(target.domain(), area) else {
            return;
        };
        tracing::trace!(?area, stroke_width, "stroke: general path");
        let lut = PremulLut::new(color);
        let mut hole_row = i32::MIN;
        let mut hole: Option<(i32, i32)> = None;
        rasterize_area(target, &mut surface, &mut self.row, area, &lut, |x, y| {
            if y != hole_row {
                hole_row = y;
                hole = inner.and_then(|s| solid_columns(row_solid_span(s, f64::from(y) - cy), cx));
            }
            if hole.is_some_and(|(h0, h1)| x >= h0 && x < h1) {
                return 0;
            }
            sampler.stroke_coverage(outer, inner, f64::from(x) - cx, f64::from(y) - cy, color.a)
        });
        self.pool.give_back(surface);
    }
}

/// Size of the stroke's inner boundary, or `None` when the stroke fills the whole shape.
fn inner_extent(fp: &Footprint, stroke_width: f64) -> Option<(f64, f64)> {
    let w = fp.width() - 2.0 * stroke_width;
    let h = fp.height() - 2.0 * stroke_width;
    (w > 0.0 && h > 0.0).then_some((w, h))
}

/// One-pixel footprint of an axis-aligned hairline, endpoints inclusive.
fn aliased_footprint(a: Point, b: Point) -> Option<PixelRect> {
    let rect = Rect::new(
        a.x.min(b.x).floor(),
        a.y.min(b.y).floor(),
        a.x.max(b.x).floor() + 1.0,
        a.y.max(b.y).floor() + 1.0,
    );
    PixelRect::enclosing(rect)
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
