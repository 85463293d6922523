use super::*;
use crate::foundation::core::{Bgra8, PixelRect};

#[derive(Default)]
struct FakeWindow {
    outer: (i32, i32),
    client: (i32, i32),
    refuse: bool,
    submitted: Vec<((i32, i32), u32, u32, Vec<u8>, u8)>,
}

impl LayeredWindow for FakeWindow {
    fn outer_origin(&self) -> (i32, i32) {
        self.outer
    }

    fn client_origin(&self) -> (i32, i32) {
        self.client
    }

    fn update_layered(
        &mut self,
        origin: (i32, i32),
        width: u32,
        height: u32,
        premul_bgra: &[u8],
        opacity: u8,
    ) -> bool {
        self.submitted
            .push((origin, width, height, premul_bgra.to_vec(), opacity));
        !self.refuse
    }
}

#[test]
fn fix_alpha_only_touches_colored_zero_alpha_pixels() {
    let mut px = vec![
        10, 20, 30, 0, // colored, alpha 0 -> opaque
        0, 0, 0, 0, // transparent black stays
        1, 2, 3, 255, // opaque stays
        5, 5, 5, 128, // translucent stays
    ];
    assert_eq!(fix_alpha(&mut px), 1);
    assert_eq!(&px[0..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..16], &[1, 2, 3, 255, 5, 5, 5, 128]);
}

#[test]
fn fix_alpha_is_idempotent() {
    let mut once: Vec<u8> = (0..=255u8).flat_map(|v| [v, v / 2, 0, v % 3]).collect();
    fix_alpha(&mut once);
    let mut twice = once.clone();
    assert_eq!(fix_alpha(&mut twice), 0);
    assert_eq!(once, twice);
}

#[test]
fn opacity_is_clamped_and_rounded() {
    assert_eq!(opacity_byte(1.0), 255);
    assert_eq!(opacity_byte(0.5), 128);
    assert_eq!(opacity_byte(-3.0), 0);
    assert_eq!(opacity_byte(7.0), 255);
    assert_eq!(opacity_byte(f32::NAN), 255);
}

#[test]
fn present_submits_fixed_frame_at_outer_origin() {
    let mut frame = BitmapTarget::new(DomainId(3), 2, 1).unwrap();
    frame.data_mut()[0..4].copy_from_slice(&[0, 0, 200, 0]);
    let mut window = FakeWindow {
        outer: (100, 50),
        client: (108, 80),
        ..FakeWindow::default()
    };

    assert!(present(&mut window, &mut frame, 0.5));

    let (origin, w, h, bytes, opacity) = &window.submitted[0];
    assert_eq!(*origin, (100, 50));
    assert_eq!((*w, *h), (2, 1));
    assert_eq!(&bytes[0..4], &[0, 0, 200, 255]);
    assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
    assert_eq!(*opacity, 128);
    // The fix is applied to the frame itself.
    assert_eq!(frame.pixel(0, 0).unwrap().a, 255);
}

#[test]
fn refused_update_reports_false() {
    let mut frame = BitmapTarget::new(DomainId(3), 1, 1).unwrap();
    let mut window = FakeWindow {
        refuse: true,
        ..FakeWindow::default()
    };
    assert!(!present(&mut window, &mut frame, 1.0));
    assert_eq!(window.submitted.len(), 1);
}

#[test]
fn presenter_reuses_and_resizes_its_frame() {
    let presenter = LayeredPresenter::new(DomainId(9));
    let mut window = FakeWindow::default();
    assert!(!presenter.present(&mut window, 1.0));
    assert!(presenter.frame_size().is_none());

    presenter
        .with_frame(4, 4, |f| {
            assert_eq!(f.domain(), DomainId(9));
            f.fill_opaque(PixelRect::new(0, 0, 4, 4), Bgra8::opaque(0, 255, 0));
        })
        .unwrap();
    assert_eq!(presenter.frame_size(), Some((4, 4)));

    // A new frame starts transparent.
    let first = presenter
        .with_frame(4, 4, |f| f.pixel(1, 1).unwrap())
        .unwrap();
    assert_eq!(first, Bgra8Premul::TRANSPARENT);

    presenter
        .with_frame(6, 3, |f| {
            f.fill_opaque(PixelRect::new(0, 0, 1, 1), Bgra8::opaque(255, 0, 0));
        })
        .unwrap();
    assert_eq!(presenter.frame_size(), Some((6, 3)));

    assert!(presenter.present(&mut window, 1.0));
    let (_, w, h, bytes, opacity) = &window.submitted[0];
    assert_eq!((*w, *h), (6, 3));
    assert_eq!(bytes.len(), 6 * 3 * 4);
    assert_eq!(&bytes[0..4], &[0, 0, 255, 255]);
    assert_eq!(*opacity, 255);
}
