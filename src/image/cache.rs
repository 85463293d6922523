use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{BYTES_PER_PIXEL, PixelRect, PixelView};
use crate::image::resample::{self, Kernel};

/// Largest destination side the cache will produce.
pub const MAX_SCALED_SIDE: u32 = 16_384;

/// Resampling quality requested by a draw call.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    /// Nearest neighbour, never cached.
    Fast,
    /// Bilinear.
    #[default]
    Normal,
    /// Mip chain + bilinear (downscale) or Catmull-Rom (upscale).
    #[serde(alias = "high")]
    HighQuality,
}

/// A resampled copy of part of a source image.
#[derive(Debug, PartialEq, Eq)]
pub struct ScaledBitmap {
    /// Identifier unique among the bitmaps produced for one source image.
    pub id: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied BGRA8, tightly packed.
    pub data: Vec<u8>,
}

impl ScaledBitmap {
    /// Borrow as a [`PixelView`].
    pub fn view(&self) -> PixelView<'_> {
        PixelView::from_parts(
            self.width,
            self.height,
            self.width as usize * BYTES_PER_PIXEL,
            &self.data,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ScaleKey {
    src: PixelRect,
    dest_w: u32,
    dest_h: u32,
    quality: ImageQuality,
}

/// Per-image cache of resampled bitmaps, keyed by geometry and quality.
///
/// The whole cache is dropped when the owning image's version changes.
#[derive(Debug, Default)]
pub struct ScaledBitmapCache {
    version: u64,
    next_id: u64,
    entries: HashMap<ScaleKey, Arc<ScaledBitmap>>,
}

impl ScaledBitmapCache {
    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cached or freshly resampled `src_rect` of `src` at `dest_w x dest_h`.
    ///
    /// `version` is the source's current mutation counter. Returns `None` for
    /// [`ImageQuality::Fast`] and for rectangles or sizes that cannot be resampled.
    pub fn get_or_create(
        &mut self,
        src: &PixelView<'_>,
        version: u64,
        src_rect: PixelRect,
        (dest_w, dest_h): (u32, u32),
        quality: ImageQuality,
    ) -> Option<Arc<ScaledBitmap>> {
        if quality == ImageQuality::Fast {
            return None;
        }
        if src_rect.is_empty() || src_rect.intersect(src.bounds()) != src_rect {
            tracing::debug!(?src_rect, "scaled bitmap: source rect outside image");
            return None;
        }
        if dest_w == 0 || dest_h == 0 || dest_w > MAX_SCALED_SIDE || dest_h > MAX_SCALED_SIDE {
            tracing::debug!(dest_w, dest_h, "scaled bitmap: unsupported destination size");
            return None;
        }

        if version != self.version {
            if !self.entries.is_empty() {
                tracing::trace!(
                    old = self.version,
                    new = version,
                    dropped = self.entries.len(),
                    "scaled bitmap cache invalidated"
                );
            }
            self.entries.clear();
            self.version = version;
        }

        let key = ScaleKey {
            src: src_rect,
            dest_w,
            dest_h,
            quality,
        };
        if let Some(hit) = self.entries.get(&key) {
            return Some(Arc::clone(hit));
        }

        let scaled = match quality {
            ImageQuality::HighQuality => resample::high_quality(src, src_rect, dest_w, dest_h),
            _ => resample::resample(src, src_rect, dest_w, dest_h, Kernel::Bilinear),
        };
        let Some(buf) = scaled else {
            tracing::debug!(dest_w, dest_h, "scaled bitmap: allocation failed");
            return None;
        };
        self.next_id += 1;
        let bitmap = Arc::new(ScaledBitmap {
            id: self.next_id,
            width: buf.width,
            height: buf.height,
            data: buf.data,
        });
        self.entries.insert(key, Arc::clone(&bitmap));
        Some(bitmap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/cache.rs"]
mod tests;
