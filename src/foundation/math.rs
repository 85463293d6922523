pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Round a `[0, 255]` float to the nearest byte, saturating out-of-range input.
pub(crate) fn round_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v + 0.5).clamp(0.0, 255.0) as u8
}

/// Return `true` when `v` is a whole number.
pub(crate) fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
