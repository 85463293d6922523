//! Premultiplied BGRA8 resampling kernels.
//!
//! All kernels treat the four channels identically, so interpolation stays alpha-correct as long
//! as the input is premultiplied. Sample positions use pixel-center mapping and clamp to the
//! source rectangle's edges.

use smallvec::SmallVec;

use crate::foundation::core::{BYTES_PER_PIXEL, PixelRect, PixelView};
use crate::foundation::math::round_u8;

/// Resampling filter for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kernel {
    /// Nearest neighbour.
    Nearest,
    /// Linear interpolation between the two nearest samples per axis.
    Bilinear,
    /// Catmull-Rom cubic (a = -0.5), four samples per axis.
    CatmullRom,
}

/// Owned, tightly packed premultiplied BGRA8 buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PremulBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl PremulBuffer {
    /// Borrow as a [`PixelView`].
    pub fn view(&self) -> PixelView<'_> {
        PixelView::from_parts(
            self.width,
            self.height,
            self.width as usize * BYTES_PER_PIXEL,
            &self.data,
        )
    }

    fn copy_of(src: &PixelView<'_>, rect: PixelRect) -> Option<Self> {
        let mut data = try_alloc(rect.width, rect.height)?;
        let x0 = rect.x as usize * BYTES_PER_PIXEL;
        let x1 = x0 + rect.width as usize * BYTES_PER_PIXEL;
        for y in rect.y..rect.bottom() {
            data.extend_from_slice(&src.row(y as u32)[x0..x1]);
        }
        Some(Self {
            width: rect.width,
            height: rect.height,
            data,
        })
    }
}

/// Empty byte buffer with room for `width x height` pixels, or `None` if the allocator refuses.
fn try_alloc(width: u32, height: u32) -> Option<Vec<u8>> {
    let len = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)?;
    let mut data = Vec::new();
    if data.try_reserve_exact(len).is_err() {
        tracing::debug!(width, height, "resample: buffer allocation failed");
        return None;
    }
    Some(data)
}

type Taps = SmallVec<[(u32, f32); 4]>;

#[inline]
fn catmull_rom(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

/// Source taps for destination indices `window.0..window.1` along one axis.
fn axis_taps(
    kernel: Kernel,
    origin: i32,
    src_len: u32,
    dst_len: u32,
    window: (u32, u32),
) -> Vec<Taps> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let last = i64::from(src_len) - 1;
    let at = |i: i64| -> u32 { (i64::from(origin) + i.clamp(0, last)) as u32 };
    (window.0..window.1)
        .map(|d| {
            let center = (f64::from(d) + 0.5) * scale - 0.5;
            let mut taps = Taps::new();
            match kernel {
                Kernel::Nearest => {
                    let i = ((f64::from(d) + 0.5) * scale).floor() as i64;
                    taps.push((at(i), 1.0));
                }
                Kernel::Bilinear => {
                    let i = center.floor();
                    let t = (center - i) as f32;
                    let i = i as i64;
                    taps.push((at(i), 1.0 - t));
                    taps.push((at(i + 1), t));
                }
                Kernel::CatmullRom => {
                    let i = center.floor();
                    let w = catmull_rom((center - i) as f32);
                    let i = i as i64;
                    for (k, wk) in w.into_iter().enumerate() {
                        taps.push((at(i - 1 + k as i64), wk));
                    }
                }
            }
            taps
        })
        .collect()
}

/// Resample `rect` of `src` to `dst_w x dst_h` with `kernel`.
///
/// `rect` must lie inside `src` and both sizes must be non-zero. `None` if the output buffer
/// cannot be allocated.
pub fn resample(
    src: &PixelView<'_>,
    rect: PixelRect,
    dst_w: u32,
    dst_h: u32,
    kernel: Kernel,
) -> Option<PremulBuffer> {
    resample_window(
        src,
        rect,
        (dst_w, dst_h),
        PixelRect::new(0, 0, dst_w, dst_h),
        (kernel, kernel),
    )
}

/// Resample only `window` of the `dst_w x dst_h` output, with a kernel per axis.
///
/// `window` is in output coordinates and must lie inside the output; the returned buffer is
/// `window`-sized. Output pixels match the same positions of a full [`resample`].
pub fn resample_window(
    src: &PixelView<'_>,
    rect: PixelRect,
    (dst_w, dst_h): (u32, u32),
    window: PixelRect,
    (kernel_x, kernel_y): (Kernel, Kernel),
) -> Option<PremulBuffer> {
    debug_assert!(!rect.is_empty() && rect.intersect(src.bounds()) == rect);
    debug_assert!(window.intersect(PixelRect::new(0, 0, dst_w, dst_h)) == window);
    if window.is_empty() {
        return None;
    }
    let mut data = try_alloc(window.width, window.height)?;
    data.resize(window.width as usize * window.height as usize * BYTES_PER_PIXEL, 0);
    let (wx, wy) = (window.x as u32, window.y as u32);
    let xs = axis_taps(kernel_x, rect.x, rect.width, dst_w, (wx, wx + window.width));
    let ys = axis_taps(kernel_y, rect.y, rect.height, dst_h, (wy, wy + window.height));

    for (row_out, y_taps) in data
        .chunks_exact_mut(window.width as usize * BYTES_PER_PIXEL)
        .zip(&ys)
    {
        for (px, x_taps) in row_out.chunks_exact_mut(BYTES_PER_PIXEL).zip(&xs) {
            let mut acc = [0f32; 4];
            for &(sy, wy) in y_taps {
                let row = src.row(sy);
                for &(sx, wx) in x_taps {
                    let w = wx * wy;
                    let i = sx as usize * BYTES_PER_PIXEL;
                    for c in 0..4 {
                        acc[c] += f32::from(row[i + c]) * w;
                    }
                }
            }
            let a = round_u8(acc[3]);
            px[3] = a;
            // Cubic overshoot must not produce color brighter than its alpha.
            for c in 0..3 {
                px[c] = round_u8(acc[c]).min(a);
            }
        }
    }

    Some(PremulBuffer {
        width: window.width,
        height: window.height,
        data,
    })
}

/// Halve `src` along the requested axes with a 2-tap box filter per axis.
///
/// Odd trailing rows/columns are averaged with themselves.
pub fn box_downsample(src: &PixelView<'_>, halve_x: bool, halve_y: bool) -> Option<PremulBuffer> {
    let w = if halve_x { src.width().div_ceil(2) } else { src.width() };
    let h = if halve_y { src.height().div_ceil(2) } else { src.height() };
    let (fx, fy) = (1 + u32::from(halve_x), 1 + u32::from(halve_y));
    let mut data = try_alloc(w, h)?;

    for y in 0..h {
        let r0 = src.row(y * fy);
        let r1 = src.row((y * fy + fy - 1).min(src.height() - 1));
        for x in 0..w {
            let i0 = (x * fx) as usize * BYTES_PER_PIXEL;
            let i1 = ((x * fx + fx - 1).min(src.width() - 1)) as usize * BYTES_PER_PIXEL;
            for c in 0..4 {
                let sum = u32::from(r0[i0 + c])
                    + u32::from(r0[i1 + c])
                    + u32::from(r1[i0 + c])
                    + u32::from(r1[i1 + c]);
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }

    Some(PremulBuffer {
        width: w,
        height: h,
        data,
    })
}

/// Number of 2x box passes the mip chain applies to shrink `src` toward `dst`.
pub fn mip_passes(src: u32, dst: u32) -> u32 {
    let mut len = src;
    let mut passes = 0;
    while dst > 0 && len > dst.saturating_mul(2) {
        len = len.div_ceil(2);
        passes += 1;
    }
    passes
}

/// High-quality resample: a mip chain of 2x box downsamples until each axis is within 2x of
/// the target, then per axis bilinear for the remaining downscale or Catmull-Rom for upscale.
pub fn high_quality(
    src: &PixelView<'_>,
    rect: PixelRect,
    dst_w: u32,
    dst_h: u32,
) -> Option<PremulBuffer> {
    let (px, py) = (mip_passes(rect.width, dst_w), mip_passes(rect.height, dst_h));
    if px == 0 && py == 0 {
        return resample_window(
            src,
            rect,
            (dst_w, dst_h),
            PixelRect::new(0, 0, dst_w, dst_h),
            final_kernels(rect, dst_w, dst_h),
        );
    }

    let mut level = PremulBuffer::copy_of(src, rect)?;
    for pass in 0..px.max(py) {
        level = box_downsample(&level.view(), pass < px, pass < py)?;
    }
    let full = PixelRect::new(0, 0, level.width, level.height);
    resample_window(
        &level.view(),
        full,
        (dst_w, dst_h),
        PixelRect::new(0, 0, dst_w, dst_h),
        final_kernels(full, dst_w, dst_h),
    )
}

/// Final kernel per axis: Catmull-Rom where that axis grows, bilinear where it shrinks or stays.
pub fn final_kernels(rect: PixelRect, dst_w: u32, dst_h: u32) -> (Kernel, Kernel) {
    let pick = |src: u32, dst: u32| {
        if dst > src {
            Kernel::CatmullRom
        } else {
            Kernel::Bilinear
        }
    };
    (pick(rect.width, dst_w), pick(rect.height, dst_h))
}

#[cfg(test)]
#[path = "../../tests/unit/image/resample.rs"]
mod tests;
