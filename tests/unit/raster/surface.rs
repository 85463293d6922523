use super::*;

#[test]
fn allocate_is_zeroed_and_valid() {
    let s = AaSurface::allocate(DomainId(1), 4, 3);
    assert!(s.is_valid());
    assert_eq!(s.stride(), 16);
    assert_eq!(s.byte_len(), 48);
    assert!(s.view().row(2).iter().all(|&b| b == 0));
}

#[test]
fn zero_sized_allocation_is_invalid() {
    let s = AaSurface::allocate(DomainId(1), 0, 3);
    assert!(!s.is_valid());
    assert_eq!(s.view().width(), 0);
}

#[test]
fn clear_only_touches_requested_rect() {
    let mut s = AaSurface::allocate(DomainId(1), 4, 4);
    let red = Bgra8Premul {
        b: 0,
        g: 0,
        r: 255,
        a: 255,
    };
    s.fill(s.bounds(), red);
    s.clear(PixelRect::new(1, 1, 2, 2));
    assert_eq!(s.pixel(0, 0), Some(red));
    assert_eq!(s.pixel(1, 1), Some(Bgra8Premul::TRANSPARENT));
    assert_eq!(s.pixel(2, 2), Some(Bgra8Premul::TRANSPARENT));
    assert_eq!(s.pixel(3, 3), Some(red));
}

#[test]
fn fill_is_clipped_to_bounds() {
    let mut s = AaSurface::allocate(DomainId(1), 2, 2);
    let px = Bgra8Premul {
        b: 1,
        g: 2,
        r: 3,
        a: 4,
    };
    s.fill(PixelRect::new(-5, -5, 6, 6), px);
    assert_eq!(s.pixel(0, 0), Some(px));
    assert_eq!(s.pixel(1, 1), Some(Bgra8Premul::TRANSPARENT));
    assert!(s.pixel(2, 0).is_none());
}

#[test]
#[should_panic]
fn row_span_past_width_panics() {
    let mut s = AaSurface::allocate(DomainId(1), 2, 2);
    let _ = s.row_span_mut(1, 0, 2);
}
