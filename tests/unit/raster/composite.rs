use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [0, 0, 255, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_red_on_white() {
    let white = [255, 255, 255, 255];
    let half_red = [0, 0, 128, 128];
    assert_eq!(over(white, half_red), [127, 127, 255, 255]);
}

#[test]
fn clip_blit_trims_negative_destination() {
    let data = vec![0u8; 4 * 4 * 4];
    let v = PixelView::new(4, 4, 16, &data).unwrap();
    let (sr, dx, dy) = clip_blit(&v, v.bounds(), -1, -2, 10, 10).unwrap();
    assert_eq!(sr, PixelRect::new(1, 2, 3, 2));
    assert_eq!((dx, dy), (0, 0));

    assert!(clip_blit(&v, v.bounds(), 10, 0, 10, 10).is_none());
}

#[test]
fn blend_onto_places_sub_rect() {
    let mut src = vec![0u8; 2 * 2 * 4];
    src[12..16].copy_from_slice(&[1, 2, 3, 255]);
    let v = PixelView::new(2, 2, 8, &src).unwrap();

    let mut dst = vec![0u8; 3 * 3 * 4];
    blend_onto(&mut dst, 12, (3, 3), &v, PixelRect::new(1, 1, 1, 1), (2, 2));
    assert_eq!(&dst[32..36], &[1, 2, 3, 255]);
    assert_eq!(dst.iter().filter(|&&b| b != 0).count(), 4);
}
