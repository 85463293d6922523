use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn mul_div255_identity_and_zero() {
    for x in 0u16..=255 {
        assert_eq!(mul_div255_u16(x, 255), x);
        assert_eq!(mul_div255_u16(x, 0), 0);
    }
}

#[test]
fn round_u8_saturates() {
    assert_eq!(round_u8(-3.0), 0);
    assert_eq!(round_u8(254.6), 255);
    assert_eq!(round_u8(300.0), 255);
    assert_eq!(round_u8(127.49), 127);
    assert_eq!(round_u8(f32::NAN), 0);
}

#[test]
fn integral_check() {
    assert!(is_integral(3.0));
    assert!(!is_integral(3.25));
    assert!(!is_integral(f64::INFINITY));
}
