//! Presentation of per-pixel-alpha frames to layered windows.

use std::sync::{Mutex, PoisonError};

use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8Premul};
use crate::foundation::error::RasterResult;
use crate::foundation::math::round_u8;
use crate::render::target::{BitmapTarget, DomainId, NativeTarget};

/// Window side of layered presentation.
pub trait LayeredWindow {
    /// Screen position of the window's outer top-left corner (including any frame).
    fn outer_origin(&self) -> (i32, i32);

    /// Screen position of the client area's top-left corner.
    fn client_origin(&self) -> (i32, i32);

    /// Hand a premultiplied BGRA8 frame to the window system.
    ///
    /// `origin` is the outer top-left screen position; returns `false` if the system refused.
    fn update_layered(
        &mut self,
        origin: (i32, i32),
        width: u32,
        height: u32,
        premul_bgra: &[u8],
        opacity: u8,
    ) -> bool;
}

/// Mark pixels with zero alpha but visible color as opaque.
///
/// Drawing paths that assume an opaque destination leave alpha at 0 under solid content.
/// Returns the number of pixels changed; a second pass changes nothing.
pub fn fix_alpha(premul_bgra: &mut [u8]) -> usize {
    let mut fixed = 0;
    for px in premul_bgra.chunks_exact_mut(BYTES_PER_PIXEL) {
        if px[3] == 0 && (px[0] | px[1] | px[2]) != 0 {
            px[3] = 255;
            fixed += 1;
        }
    }
    fixed
}

/// Global window opacity as a byte; NaN means fully opaque.
pub(crate) fn opacity_byte(opacity: f32) -> u8 {
    if opacity.is_nan() {
        return 255;
    }
    round_u8(opacity.clamp(0.0, 1.0) * 255.0)
}

/// Alpha-fix `frame` and submit it at the window's outer origin.
#[tracing::instrument(
    level = "debug",
    skip(window, frame),
    fields(width = frame.width(), height = frame.height())
)]
pub fn present<W: LayeredWindow + ?Sized>(
    window: &mut W,
    frame: &mut BitmapTarget,
    opacity: f32,
) -> bool {
    if frame.width() == 0 || frame.height() == 0 {
        tracing::debug!("present: empty frame, skipped");
        return false;
    }
    let fixed = fix_alpha(frame.data_mut());
    if fixed > 0 {
        tracing::trace!(fixed, "alpha fix pass");
    }

    let outer = window.outer_origin();
    let client = window.client_origin();
    if outer != client {
        tracing::warn!(
            ?outer,
            ?client,
            "layered window has a non-client border; content will be offset"
        );
    }

    let ok = window.update_layered(
        outer,
        frame.width(),
        frame.height(),
        frame.data(),
        opacity_byte(opacity),
    );
    if !ok {
        tracing::warn!("layered window update rejected");
    }
    ok
}

/// Window-scoped offscreen frame for layered presentation.
///
/// Creation and resize of the frame happen under one lock so a resize racing a paint never
/// sees a half-built buffer.
#[derive(Debug)]
pub struct LayeredPresenter {
    domain: DomainId,
    frame: Mutex<Option<BitmapTarget>>,
}

impl LayeredPresenter {
    /// Presenter whose frames belong to `domain`.
    pub fn new(domain: DomainId) -> Self {
        Self {
            domain,
            frame: Mutex::new(None),
        }
    }

    /// Size of the current frame, if one was rendered.
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        frame.as_ref().map(|f| (f.width(), f.height()))
    }

    /// Render into the `width x height` frame, creating or resizing it first.
    ///
    /// The frame is cleared to transparent before `f` runs.
    pub fn with_frame<R>(
        &self,
        width: u32,
        height: u32,
        f: impl FnOnce(&mut BitmapTarget) -> R,
    ) -> RasterResult<R> {
        let mut slot = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        let frame = match slot.as_mut() {
            Some(frame) if frame.width() == width && frame.height() == height => frame,
            Some(frame) => {
                tracing::debug!(width, height, "layered frame resized");
                frame.resize(width, height)?;
                frame
            }
            None => slot.insert(BitmapTarget::new(self.domain, width, height)?),
        };
        frame.clear(Bgra8Premul::TRANSPARENT);
        Ok(f(frame))
    }

    /// Present the last rendered frame; `false` if there is none or the window refused it.
    pub fn present<W: LayeredWindow + ?Sized>(&self, window: &mut W, opacity: f32) -> bool {
        let mut slot = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(frame) = slot.as_mut() else {
            tracing::warn!("present called before any frame was rendered");
            return false;
        };
        present(window, frame, opacity)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/layered.rs"]
mod tests;
