use super::*;

fn checker(w: u32, h: u32) -> Vec<u8> {
    (0..w * h)
        .flat_map(|i| {
            let v = if (i % w + i / w) % 2 == 0 { 255 } else { 0 };
            [v, v, v, 255]
        })
        .collect()
}

#[test]
fn identical_keys_share_one_bitmap() {
    let data = checker(16, 16);
    let view = PixelView::new(16, 16, 64, &data).unwrap();
    let mut cache = ScaledBitmapCache::default();
    let rect = PixelRect::new(0, 0, 16, 16);
    let a = cache
        .get_or_create(&view, 0, rect, (8, 8), ImageQuality::Normal)
        .unwrap();
    let b = cache
        .get_or_create(&view, 0, rect, (8, 8), ImageQuality::Normal)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let c = cache
        .get_or_create(&view, 0, rect, (8, 8), ImageQuality::HighQuality)
        .unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_ne!(a.id, c.id);
    assert_eq!(cache.len(), 2);
}

#[test]
fn version_change_drops_everything() {
    let data = checker(8, 8);
    let view = PixelView::new(8, 8, 32, &data).unwrap();
    let mut cache = ScaledBitmapCache::default();
    let rect = PixelRect::new(0, 0, 8, 8);
    let first = cache
        .get_or_create(&view, 0, rect, (4, 4), ImageQuality::Normal)
        .unwrap();
    cache.get_or_create(&view, 0, PixelRect::new(0, 0, 4, 4), (2, 2), ImageQuality::Normal);
    assert_eq!(cache.len(), 2);
    let second = cache
        .get_or_create(&view, 1, rect, (4, 4), ImageQuality::Normal)
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn fast_quality_and_bad_geometry_are_not_cached() {
    let data = checker(8, 8);
    let view = PixelView::new(8, 8, 32, &data).unwrap();
    let mut cache = ScaledBitmapCache::default();
    let full = PixelRect::new(0, 0, 8, 8);
    assert!(cache.get_or_create(&view, 0, full, (4, 4), ImageQuality::Fast).is_none());
    assert!(
        cache
            .get_or_create(&view, 0, PixelRect::new(4, 4, 8, 8), (4, 4), ImageQuality::Normal)
            .is_none()
    );
    assert!(
        cache
            .get_or_create(&view, 0, PixelRect::new(0, 0, 0, 8), (4, 4), ImageQuality::Normal)
            .is_none()
    );
    assert!(cache.get_or_create(&view, 0, full, (0, 4), ImageQuality::Normal).is_none());
    assert!(
        cache
            .get_or_create(&view, 0, full, (MAX_SCALED_SIDE + 1, 4), ImageQuality::Normal)
            .is_none()
    );
    assert!(cache.is_empty());
}

#[test]
fn quality_names_round_trip_through_serde() {
    let q: ImageQuality = serde_json::from_str("\"high\"").unwrap();
    assert_eq!(q, ImageQuality::HighQuality);
    assert_eq!(serde_json::to_string(&ImageQuality::Fast).unwrap(), "\"fast\"");
    assert_eq!(ImageQuality::default(), ImageQuality::Normal);
}
