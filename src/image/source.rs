use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8, Bgra8Premul, PixelRect, PixelView};
use crate::foundation::error::{RasterError, RasterResult};
use crate::image::cache::{ImageQuality, ScaledBitmap, ScaledBitmapCache};

/// A drawable image backed by a writable premultiplied BGRA8 buffer.
///
/// Every mutation bumps `version`, which invalidates the image's scaled-bitmap cache on the
/// next lookup.
#[derive(Debug)]
pub struct SourceImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    version: u64,
    scaled: Mutex<ScaledBitmapCache>,
}

impl SourceImage {
    /// Wrap premultiplied BGRA8 bytes (tightly packed).
    pub fn from_premul_bgra(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| RasterError::validation("image size overflow"))?;
        if width == 0 || height == 0 {
            return Err(RasterError::validation("image must be non-empty"));
        }
        if data.len() != expected {
            return Err(RasterError::validation(format!(
                "image expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            version: 0,
            scaled: Mutex::new(ScaledBitmapCache::default()),
        })
    }

    /// Premultiply and swizzle straight-alpha RGBA8 (e.g. a decoded PNG).
    pub fn from_straight_rgba(width: u32, height: u32, rgba: &[u8]) -> RasterResult<Self> {
        let data = rgba
            .chunks_exact(BYTES_PER_PIXEL)
            .flat_map(|p| Bgra8::from_rgba(p[0], p[1], p[2], p[3]).premultiply().to_bytes())
            .collect();
        Self::from_premul_bgra(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full image rectangle.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Mutation counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Borrow the pixels.
    pub fn view(&self) -> PixelView<'_> {
        PixelView::from_parts(
            self.width,
            self.height,
            self.width as usize * BYTES_PER_PIXEL,
            &self.data,
        )
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Bgra8Premul> {
        self.view().pixel(x, y)
    }

    /// Mutate the pixel buffer in place; bumps the version.
    pub fn write<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let out = f(&mut self.data);
        self.bump_version();
        out
    }

    /// Mark the pixels as changed.
    pub fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Number of cached scaled bitmaps.
    pub fn cached_len(&self) -> usize {
        self.scaled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resampled `src_rect` at `dest_w x dest_h`, shared with later identical requests.
    ///
    /// Returns `None` for [`ImageQuality::Fast`] (callers stretch directly) and for invalid
    /// geometry.
    #[tracing::instrument(level = "debug", skip(self), fields(version = self.version))]
    pub fn try_get_or_create_scaled(
        &self,
        src_rect: PixelRect,
        dest_w: u32,
        dest_h: u32,
        quality: ImageQuality,
    ) -> Option<Arc<ScaledBitmap>> {
        let mut cache = self.scaled.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_create(&self.view(), self.version, src_rect, (dest_w, dest_h), quality)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/source.rs"]
mod tests;
