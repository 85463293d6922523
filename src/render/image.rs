use crate::foundation::core::PixelRect;
use crate::image::cache::{ImageQuality, MAX_SCALED_SIDE};
use crate::image::resample::{self, Kernel};
use crate::image::source::SourceImage;
use crate::render::target::NativeTarget;

/// Draw `src_rect` of `image` stretched into `dest_rect` of `target`.
///
/// [`ImageQuality::Fast`] stretches with nearest neighbour on every call; other qualities go
/// through the image's scaled-bitmap cache so a stable draw size resamples only once.
pub fn draw_image<T: NativeTarget + ?Sized>(
    target: &mut T,
    image: &SourceImage,
    src_rect: PixelRect,
    dest_rect: PixelRect,
    quality: ImageQuality,
) {
    if dest_rect.intersect(target.bounds()).is_empty() {
        return;
    }
    if src_rect.is_empty() || src_rect.intersect(image.bounds()) != src_rect {
        tracing::debug!(?src_rect, "draw_image: source rect outside image, skipped");
        return;
    }

    // Same size needs no resampling at all.
    if src_rect.width == dest_rect.width && src_rect.height == dest_rect.height {
        target.blit_premul(image.view(), src_rect, dest_rect.x, dest_rect.y);
        return;
    }

    match quality {
        ImageQuality::Fast => {
            if dest_rect.width > MAX_SCALED_SIDE || dest_rect.height > MAX_SCALED_SIDE {
                tracing::debug!(?dest_rect, "draw_image: destination too large, skipped");
                return;
            }
            // Only the on-target part of the stretch is ever computed.
            let visible = dest_rect.intersect(target.bounds());
            let window = visible.offset(-dest_rect.x, -dest_rect.y);
            let Some(scaled) = resample::resample_window(
                &image.view(),
                src_rect,
                (dest_rect.width, dest_rect.height),
                window,
                (Kernel::Nearest, Kernel::Nearest),
            ) else {
                tracing::debug!(?dest_rect, "draw_image: allocation failed, skipped");
                return;
            };
            target.blit_premul(scaled.view(), scaled_bounds(visible), visible.x, visible.y);
        }
        _ => {
            let Some(scaled) = image.try_get_or_create_scaled(
                src_rect,
                dest_rect.width,
                dest_rect.height,
                quality,
            ) else {
                return;
            };
            target.blit_premul(scaled.view(), scaled_bounds(dest_rect), dest_rect.x, dest_rect.y);
        }
    }
}

fn scaled_bounds(dest: PixelRect) -> PixelRect {
    PixelRect::new(0, 0, dest.width, dest.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/image.rs"]
mod tests;
