use crate::foundation::core::{BYTES_PER_PIXEL, PixelRect, PixelView};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied pixel in buffer byte order.
pub type PremulBgra8 = [u8; 4];

/// Premultiplied source-over of one pixel.
#[inline]
pub fn over(dst: PremulBgra8, src: PremulBgra8) -> PremulBgra8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Source-over a row of premultiplied pixels onto an equally long destination row.
#[inline]
pub fn over_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(src.chunks_exact(BYTES_PER_PIXEL))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

/// Clip a blit of `src_rect` (in `src` space) placed at `(dst_x, dst_y)` against a destination
/// of `dst_w x dst_h`.
///
/// Returns the clipped source rect and its destination origin, or `None` if nothing overlaps.
pub fn clip_blit(
    src: &PixelView<'_>,
    src_rect: PixelRect,
    dst_x: i32,
    dst_y: i32,
    dst_w: u32,
    dst_h: u32,
) -> Option<(PixelRect, i32, i32)> {
    let sr = src_rect.intersect(src.bounds());
    if sr.is_empty() {
        return None;
    }
    // Move the destination by however much the source rect was trimmed.
    let dx = dst_x + (sr.x - src_rect.x);
    let dy = dst_y + (sr.y - src_rect.y);
    let placed = PixelRect::new(dx, dy, sr.width, sr.height);
    let visible = placed.intersect(PixelRect::new(0, 0, dst_w, dst_h));
    if visible.is_empty() {
        return None;
    }
    let src_clip = PixelRect::new(
        sr.x + (visible.x - dx),
        sr.y + (visible.y - dy),
        visible.width,
        visible.height,
    );
    Some((src_clip, visible.x, visible.y))
}

/// Source-over `src_rect` of `src` onto a tightly described destination buffer.
pub fn blend_onto(
    dst: &mut [u8],
    dst_stride: usize,
    (dst_w, dst_h): (u32, u32),
    src: &PixelView<'_>,
    src_rect: PixelRect,
    (dst_x, dst_y): (i32, i32),
) {
    let Some((sr, dx, dy)) = clip_blit(src, src_rect, dst_x, dst_y, dst_w, dst_h) else {
        return;
    };
    let bytes = sr.width as usize * BYTES_PER_PIXEL;
    for row in 0..sr.height {
        let s_row = src.row(sr.y as u32 + row);
        let s0 = sr.x as usize * BYTES_PER_PIXEL;
        let d0 = (dy as usize + row as usize) * dst_stride + dx as usize * BYTES_PER_PIXEL;
        over_row(&mut dst[d0..d0 + bytes], &s_row[s0..s0 + bytes]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
