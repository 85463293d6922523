use super::*;

#[test]
fn lut_endpoints() {
    let lut = PremulLut::new(Bgra8::opaque(255, 128, 0));
    assert_eq!(lut.get(0), [0, 0, 0, 0]);
    assert_eq!(lut.get(255), [0, 128, 255, 255]);
    assert_eq!(lut.get(128), [0, 64, 128, 128]);
}

#[test]
fn lut_ignores_color_alpha() {
    let lut = PremulLut::new(Bgra8::from_rgba(255, 255, 255, 10));
    assert_eq!(lut.get(255), [255, 255, 255, 255]);
}

#[test]
fn lut_entries_stay_premultiplied() {
    let lut = PremulLut::new(Bgra8::opaque(250, 3, 77));
    for c in 0..=255u8 {
        let px = lut.get(c);
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
}

#[test]
fn row_runs_and_write() {
    let mut row = AlphaRow::new();
    row.reset(5);
    row.fill_run(1, 3, 255);
    row.set(4, 128);
    row.fill_run(4, 99, 128);
    assert_eq!(row.as_slice(), &[0, 255, 255, 0, 128]);

    let lut = PremulLut::new(Bgra8::opaque(0, 0, 255));
    let mut dst = vec![9u8; 20];
    row.write_premul(&lut, &mut dst);
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst[4..8], &[255, 0, 0, 255]);
    assert_eq!(&dst[16..20], &[128, 0, 0, 128]);
}

#[test]
fn reset_clears_previous_contents() {
    let mut row = AlphaRow::new();
    row.reset(3);
    row.fill_run(0, 3, 7);
    row.reset(2);
    assert_eq!(row.as_slice(), &[0, 0]);
}
