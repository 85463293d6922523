//! Text onto targets that need real per-pixel alpha.
//!
//! Native glyph rasterizers assume an opaque destination. Over opaque pixels they are used
//! as-is; elsewhere the glyphs are drawn in white onto a cleared scratch surface and the
//! result is turned into alpha coverage for the requested color.

use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8, PixelRect};
use crate::foundation::math::mul_div255_u8;
use crate::raster::coverage::PremulLut;
use crate::raster::pool::AaSurfacePool;
use crate::render::target::NativeTarget;
use crate::text::rasterizer::{GlyphRasterizer, TextRun};

const SYNTH_INK: Bgra8 = Bgra8::opaque(255, 255, 255);

/// Draw `run` in `color` onto `target`.
///
/// Never fails: rasterizer errors are logged and the draw is dropped.
pub fn draw_text<T, G>(
    target: &mut T,
    pool: &mut AaSurfacePool,
    glyphs: &mut G,
    run: &TextRun<'_>,
    color: Bgra8,
) where
    T: NativeTarget,
    G: GlyphRasterizer + ?Sized,
{
    if run.text.is_empty() || color.a == 0 {
        return;
    }
    let area = run.rect.intersect(target.bounds());
    if area.is_empty() {
        return;
    }

    if is_opaque_under(target, area) {
        tracing::trace!(?area, "text: opaque destination, direct draw");
        draw_direct(target, glyphs, run, color);
        return;
    }

    let mut surface = pool.rent(target.domain(), area.width, area.height);
    if !surface.is_valid() {
        tracing::debug!(?area, "text: no scratch surface, direct draw");
        draw_direct(target, glyphs, run, color);
        return;
    }

    let local = PixelRect::new(0, 0, area.width, area.height);
    surface.clear(local);
    if let Err(err) = glyphs.draw_glyphs(&mut surface, &run.offset(-area.x, -area.y), SYNTH_INK) {
        tracing::warn!(%err, "glyph rasterizer failed");
        pool.give_back(surface);
        return;
    }

    let lut = PremulLut::new(color);
    for y in 0..area.height {
        for px in surface
            .row_span_mut(0, y, area.width)
            .chunks_exact_mut(BYTES_PER_PIXEL)
        {
            let alpha = synthesized_alpha([px[0], px[1], px[2]], color.a);
            px.copy_from_slice(&lut.get(alpha));
        }
    }
    target.blit_premul(surface.view(), local, area.x, area.y);
    pool.give_back(surface);
}

/// Alpha for one white-ink pixel: strongest channel, squared, then scaled by `alpha`.
pub(crate) fn synthesized_alpha(bgr: [u8; 3], alpha: u8) -> u8 {
    let c = u32::from(bgr[0].max(bgr[1]).max(bgr[2]));
    let curved = (c * c / 255) as u16;
    mul_div255_u8(curved, u16::from(alpha))
}

/// Corners, edge midpoints and center of `area` are all fully opaque.
fn is_opaque_under<T: NativeTarget + ?Sized>(target: &T, area: PixelRect) -> bool {
    let xs = [
        area.x,
        area.x + (area.width as i32 - 1) / 2,
        area.right() - 1,
    ];
    let ys = [
        area.y,
        area.y + (area.height as i32 - 1) / 2,
        area.bottom() - 1,
    ];
    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| (x, y)))
        .all(|(x, y)| target.read_pixel(x, y).is_some_and(|p| p.a == 255))
}

fn draw_direct<T, G>(target: &mut T, glyphs: &mut G, run: &TextRun<'_>, color: Bgra8)
where
    T: NativeTarget,
    G: GlyphRasterizer + ?Sized,
{
    if let Err(err) = glyphs.draw_glyphs(target, run, color) {
        tracing::warn!(%err, "glyph rasterizer failed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/renderer.rs"]
mod tests;
