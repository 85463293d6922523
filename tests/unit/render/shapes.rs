use super::*;
use crate::foundation::core::Bgra8Premul;
use crate::raster::pool::PoolOpts;
use crate::raster::sampler::SupersampleFactor;
use crate::render::target::BitmapTarget;

const RED: Bgra8 = Bgra8::opaque(255, 0, 0);
const WHITE: Bgra8 = Bgra8::opaque(255, 255, 255);

fn pool() -> AaSurfacePool {
    AaSurfacePool::new(PoolOpts::default(), 4096)
}

fn target(w: u32, h: u32) -> BitmapTarget {
    BitmapTarget::new(DomainId(1), w, h).unwrap()
}

fn px(t: &BitmapTarget, x: u32, y: u32) -> Bgra8Premul {
    t.pixel(x, y).unwrap()
}

#[test]
fn corner_layout_splits_odd_sizes_without_overlap() {
    let (layout, [left, right, top, bottom]) = corner_layout(PixelRect::new(0, 0, 11, 7), 5.5, 9.0);
    assert_eq!((left, right), (6, 5));
    assert_eq!((top, bottom), (4, 3));
    assert_eq!(layout.tiles.len(), 4);
    let area: u32 = layout.tiles.iter().map(|t| t.width * t.height).sum();
    assert_eq!(area, 11 * 7);
}

#[test]
fn opaque_rounded_rect_on_white_blends_only_corners() {
    let mut t = target(100, 60);
    t.clear(WHITE.premultiply());
    let mut pool = pool();
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).fill_rounded_rectangle(
        &mut t,
        Rect::new(10.0, 10.0, 90.0, 50.0),
        (10.0, 10.0),
        RED,
    );

    // Straight edges and interior are painted solid.
    assert_eq!(px(&t, 50, 30), RED.premultiply());
    assert_eq!(px(&t, 10, 30), RED.premultiply());
    assert_eq!(px(&t, 50, 10), RED.premultiply());
    assert_eq!(px(&t, 89, 49), WHITE.premultiply());
    // Outside the footprint and the extreme corner stay white.
    assert_eq!(px(&t, 5, 5), WHITE.premultiply());
    assert_eq!(px(&t, 10, 10), WHITE.premultiply());
    assert_eq!(px(&t, 90, 30), WHITE.premultiply());

    let mut blended = 0;
    for y in 10..20 {
        for x in 10..20 {
            let p = px(&t, x, y);
            assert_eq!(p.a, 255);
            assert_eq!(p.r, 255);
            if p.g > 0 && p.g < 255 {
                blended += 1;
            }
        }
    }
    assert!(blended > 0, "corner arc should be anti-aliased");
    // The fast path rents only a tile-sized surface.
    assert!(pool.stats().alloc_bytes <= 32 * 32 * 4);
}

#[test]
fn ellipse_matches_fully_rounded_rect() {
    for color in [RED, Bgra8::from_rgba(0, 128, 255, 100)] {
        for rect in [
            Rect::new(3.0, 4.0, 27.0, 20.0),
            Rect::new(2.25, 1.5, 19.75, 18.5),
        ] {
            let mut a = target(32, 24);
            let mut b = target(32, 24);
            let mut pool = pool();
            let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
            let mut r = ShapeRenderer::new(&mut pool, EdgeSampler::default());
            r.fill_ellipse(&mut a, rect, color);
            r.fill_rounded_rectangle(&mut b, rect, (rx, ry), color);
            for (pa, pb) in a.data().iter().zip(b.data()) {
                assert!(pa.abs_diff(*pb) <= 1, "{pa} vs {pb} for {rect:?}");
            }
        }
    }
}

#[test]
fn stroke_leaves_inner_hole() {
    let mut t = target(20, 20);
    let mut pool = pool();
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).draw_rounded_rectangle(
        &mut t,
        Rect::new(5.0, 5.0, 15.0, 15.0),
        (0.0, 0.0),
        1.0,
        RED,
    );
    for y in 6..14 {
        for x in 6..14 {
            assert_eq!(px(&t, x, y).a, 0, "hole pixel ({x},{y})");
        }
    }
    for i in 5..15 {
        assert_eq!(px(&t, i, 5), RED.premultiply());
        assert_eq!(px(&t, 5, i), RED.premultiply());
        assert_eq!(px(&t, i, 14), RED.premultiply());
        assert_eq!(px(&t, 14, i), RED.premultiply());
    }
    assert_eq!(px(&t, 4, 4).a, 0);
    assert_eq!(px(&t, 15, 10).a, 0);
}

#[test]
fn opaque_rounded_stroke_fills_bands_natively() {
    let mut t = target(40, 40);
    let mut pool = pool();
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).draw_rounded_rectangle(
        &mut t,
        Rect::new(0.0, 0.0, 40.0, 40.0),
        (10.0, 10.0),
        2.0,
        RED,
    );
    assert_eq!(px(&t, 20, 0), RED.premultiply());
    assert_eq!(px(&t, 20, 1), RED.premultiply());
    assert_eq!(px(&t, 20, 2).a, 0);
    assert_eq!(px(&t, 0, 20), RED.premultiply());
    assert_eq!(px(&t, 39, 20), RED.premultiply());
    assert_eq!(px(&t, 20, 38), RED.premultiply());
    assert_eq!(px(&t, 20, 20).a, 0);
    assert_eq!(px(&t, 0, 0).a, 0);
}

#[test]
fn thick_stroke_consumes_whole_shape() {
    let mut a = target(16, 16);
    let mut b = target(16, 16);
    let mut pool = pool();
    let mut r = ShapeRenderer::new(&mut pool, EdgeSampler::default());
    let rect = Rect::new(2.0, 2.0, 14.0, 14.0);
    r.draw_ellipse(&mut a, rect, 8.0, RED);
    r.fill_ellipse(&mut b, rect, RED);
    assert_eq!(a.data(), b.data());
}

#[test]
fn translucent_fill_uses_exact_alpha_inside() {
    let mut t = target(24, 24);
    let mut pool = pool();
    let color = Bgra8::from_rgba(255, 0, 0, 128);
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).fill_rounded_rectangle(
        &mut t,
        Rect::new(2.0, 2.0, 22.0, 22.0),
        (0.0, 0.0),
        color,
    );
    assert_eq!(px(&t, 2, 2), color.premultiply());
    assert_eq!(px(&t, 12, 12), color.premultiply());
    assert_eq!(px(&t, 21, 21), color.premultiply());
    assert_eq!(px(&t, 1, 2).a, 0);
    assert_eq!(px(&t, 22, 12).a, 0);
}

#[test]
fn unaligned_edges_are_antialiased() {
    let mut t = target(16, 16);
    let mut pool = pool();
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).fill_rounded_rectangle(
        &mut t,
        Rect::new(2.5, 2.0, 12.5, 12.0),
        (0.0, 0.0),
        RED,
    );
    let edge = px(&t, 2, 6).a;
    assert!(edge > 100 && edge < 200, "edge alpha {edge}");
    assert_eq!(px(&t, 6, 6).a, 255);
}

#[test]
fn interior_is_fully_covered_for_every_factor() {
    for factor in [
        SupersampleFactor::X1,
        SupersampleFactor::X2,
        SupersampleFactor::X3,
    ] {
        let mut t = target(24, 24);
        let mut pool = pool();
        let mut r = ShapeRenderer::new(&mut pool, EdgeSampler::new(factor));
        r.fill_rounded_rectangle(&mut t, Rect::new(0.3, 0.3, 20.7, 20.7), (4.0, 4.0), RED);
        assert_eq!(px(&t, 10, 10), RED.premultiply(), "{factor:?}");
        r.fill_ellipse(&mut t, Rect::new(0.3, 0.3, 20.7, 20.7), WHITE);
        assert_eq!(px(&t, 10, 10), WHITE.premultiply(), "{factor:?}");
    }
}

#[test]
fn diagonal_line_uses_capsule_sampling() {
    let mut t = target(12, 12);
    let mut pool = pool();
    let black = Bgra8::opaque(0, 0, 0);
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).draw_line(
        &mut t,
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        1.0,
        black,
    );
    assert_eq!(px(&t, 5, 5).a, 255);
    let side = px(&t, 5, 6).a;
    assert!(side > 0 && side < 255, "side alpha {side}");
    assert_eq!(px(&t, 5, 8).a, 0);
    assert_eq!(pool.stats().alloc_surfaces, 1);
}

#[test]
fn axis_aligned_hairline_skips_the_pool() {
    let mut t = target(10, 6);
    let mut pool = pool();
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).draw_line(
        &mut t,
        Point::new(7.0, 3.0),
        Point::new(2.0, 3.0),
        1.0,
        RED,
    );
    for x in 2..=7 {
        assert_eq!(px(&t, x, 3), RED.premultiply());
    }
    assert_eq!(px(&t, 8, 3).a, 0);
    assert_eq!(px(&t, 2, 2).a, 0);
    assert_eq!(pool.stats().alloc_surfaces, 0);
}

#[test]
fn oversized_work_is_a_silent_no_op() {
    let mut t = target(64, 64);
    let mut pool = AaSurfacePool::new(PoolOpts::default(), 16);
    ShapeRenderer::new(&mut pool, EdgeSampler::default()).fill_rounded_rectangle(
        &mut t,
        Rect::new(0.0, 0.0, 40.0, 40.0),
        (3.0, 3.0),
        Bgra8::from_rgba(0, 0, 255, 200),
    );
    assert!(t.data().iter().all(|&b| b == 0));
    assert_eq!(pool.stats().rejected, 1);
}

#[test]
fn degenerate_input_draws_nothing() {
    let mut t = target(16, 16);
    let mut pool = pool();
    let mut r = ShapeRenderer::new(&mut pool, EdgeSampler::default());
    r.fill_rounded_rectangle(&mut t, Rect::new(4.0, 4.0, 4.0, 10.0), (1.0, 1.0), RED);
    r.fill_ellipse(&mut t, Rect::new(f64::NAN, 0.0, 5.0, 5.0), RED);
    r.fill_ellipse(&mut t, Rect::new(0.0, 0.0, 5.0, 5.0), Bgra8::from_rgba(1, 2, 3, 0));
    r.draw_ellipse(&mut t, Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, RED);
    r.draw_line(&mut t, Point::new(3.0, 3.0), Point::new(3.0, 3.0), 2.0, RED);
    r.draw_line(&mut t, Point::new(1.0, 1.0), Point::new(9.0, 4.0), 0.0, RED);
    assert!(t.data().iter().all(|&b| b == 0));
}

#[test]
fn shapes_are_clipped_to_the_target() {
    let mut t = target(8, 8);
    let mut pool = pool();
    let mut r = ShapeRenderer::new(&mut pool, EdgeSampler::default());
    r.fill_ellipse(&mut t, Rect::new(-10.0, -10.0, 10.0, 10.0), Bgra8::from_rgba(0, 0, 255, 128));
    r.draw_rounded_rectangle(&mut t, Rect::new(-5.0, 2.0, 30.0, 30.0), (6.0, 6.0), 2.0, RED);
    r.draw_line(&mut t, Point::new(-20.0, 4.5), Point::new(40.0, 6.5), 3.0, WHITE);
    assert!(px(&t, 0, 0).a > 0);
    assert_eq!(px(&t, 3, 2), RED.premultiply());
}
