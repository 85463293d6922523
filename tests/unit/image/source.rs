use super::*;

#[test]
fn rejects_mismatched_buffers() {
    assert!(SourceImage::from_premul_bgra(2, 2, vec![0; 12]).is_err());
    assert!(SourceImage::from_premul_bgra(0, 2, vec![]).is_err());
    assert!(SourceImage::from_straight_rgba(1, 1, &[1, 2, 3]).is_err());
}

#[test]
fn straight_rgba_is_premultiplied_and_swizzled() {
    let img = SourceImage::from_straight_rgba(1, 1, &[255, 0, 100, 128]).unwrap();
    let p = img.pixel(0, 0).unwrap();
    assert_eq!((p.r, p.g, p.b, p.a), (128, 0, 50, 128));
}

#[test]
fn scaled_handles_follow_the_version() {
    let mut img = SourceImage::from_premul_bgra(4, 4, [10u8, 20, 30, 255].repeat(16)).unwrap();
    let rect = img.bounds();
    let a = img
        .try_get_or_create_scaled(rect, 2, 2, ImageQuality::Normal)
        .unwrap();
    let b = img
        .try_get_or_create_scaled(rect, 2, 2, ImageQuality::Normal)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(img.cached_len(), 1);

    img.write(|px| px.fill(0));
    assert_eq!(img.version(), 1);
    let c = img
        .try_get_or_create_scaled(rect, 2, 2, ImageQuality::Normal)
        .unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_ne!(a.data, c.data);
    assert_eq!(img.cached_len(), 1);
}

#[test]
fn fast_quality_bypasses_the_cache() {
    let img = SourceImage::from_premul_bgra(2, 2, vec![0; 16]).unwrap();
    assert!(
        img.try_get_or_create_scaled(img.bounds(), 4, 4, ImageQuality::Fast)
            .is_none()
    );
    assert_eq!(img.cached_len(), 0);
}
