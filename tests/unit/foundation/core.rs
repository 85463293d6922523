use super::*;

#[test]
fn premultiply_opaque_is_identity() {
    let c = Bgra8::opaque(10, 200, 30);
    let p = c.premultiply();
    assert_eq!(p.to_bytes(), [30, 200, 10, 255]);
}

#[test]
fn premultiply_half_alpha_rounds() {
    let c = Bgra8::from_rgba(255, 100, 0, 128);
    let p = c.premultiply();
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 50);
    assert_eq!(p.b, 0);
    assert_eq!(p.a, 128);
}

#[test]
fn straight_rgba_recovers_color() {
    let p = Bgra8::from_rgba(200, 100, 50, 255).premultiply();
    assert_eq!(p.to_straight_rgba(), [200, 100, 50, 255]);
    assert_eq!(Bgra8Premul::TRANSPARENT.to_straight_rgba(), [0, 0, 0, 0]);
}

#[test]
fn pixel_rect_intersect_and_empty() {
    let a = PixelRect::new(0, 0, 10, 10);
    let b = PixelRect::new(5, -5, 10, 10);
    assert_eq!(a.intersect(b), PixelRect::new(5, 0, 5, 5));

    let c = PixelRect::new(20, 20, 4, 4);
    assert!(a.intersect(c).is_empty());
    assert!(PixelRect::from_edges(5, 5, 2, 9).is_empty());
}

#[test]
fn pixel_rect_enclosing_rounds_outward() {
    let r = PixelRect::enclosing(Rect::new(0.5, 1.2, 9.1, 4.0)).unwrap();
    assert_eq!(r, PixelRect::new(0, 1, 10, 3));
    assert!(PixelRect::enclosing(Rect::new(0.0, 0.0, f64::NAN, 1.0)).is_none());
}

#[test]
fn pixel_rect_inflate_and_contains() {
    let r = PixelRect::new(2, 2, 4, 4).inflate(1);
    assert_eq!(r, PixelRect::new(1, 1, 6, 6));
    assert!(r.contains(1, 1));
    assert!(!r.contains(7, 1));
}

#[test]
fn pixel_view_rejects_short_buffers() {
    let data = vec![0u8; 15];
    assert!(PixelView::new(2, 2, 8, &data).is_err());
    assert!(PixelView::new(2, 2, 4, &[0u8; 64]).is_err());

    let data = vec![7u8; 16];
    let v = PixelView::new(2, 2, 8, &data).unwrap();
    assert_eq!(v.row(1).len(), 8);
    assert_eq!(v.pixel(1, 1).unwrap().a, 7);
    assert!(v.pixel(2, 0).is_none());
}
