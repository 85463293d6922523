use std::sync::Arc;

use crate::config::RasterOpts;
use crate::foundation::core::{Bgra8, PixelRect, Point, Rect};
use crate::foundation::error::RasterResult;
use crate::image::cache::ImageQuality;
use crate::image::source::SourceImage;
use crate::present::layered::{LayeredPresenter, LayeredWindow};
use crate::raster::pool::{AaSurfacePool, PoolStats};
use crate::raster::sampler::EdgeSampler;
use crate::render::shapes::ShapeRenderer;
use crate::render::target::{BitmapTarget, DomainId, NativeTarget};
use crate::text::font::{FontKey, FontRegistry};
use crate::text::rasterizer::{GlyphRasterizer, ParleyGlyphRasterizer, TextLayoutFlags, TextRun};

/// Everything one window or render target needs to draw anti-aliased content.
///
/// Owns the surface pool, the font registry and the layered presenter, so their lifetime is the
/// window's. Not meant to be shared between threads; only the presenter is, via
/// [`RasterContext::presenter`].
pub struct RasterContext {
    domain: DomainId,
    opts: RasterOpts,
    pool: AaSurfacePool,
    sampler: EdgeSampler,
    fonts: FontRegistry,
    presenter: Arc<LayeredPresenter>,
    glyphs: Box<dyn GlyphRasterizer>,
}

impl std::fmt::Debug for RasterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterContext")
            .field("domain", &self.domain)
            .field("opts", &self.opts)
            .field("pool", &self.pool.stats())
            .field("fonts", &self.fonts.len())
            .finish_non_exhaustive()
    }
}

impl RasterContext {
    /// Context for targets of `domain`, drawing text with [`ParleyGlyphRasterizer`].
    pub fn new(domain: DomainId, opts: RasterOpts) -> Self {
        Self {
            domain,
            opts,
            pool: AaSurfacePool::new(opts.pool, opts.max_aa_surface_size),
            sampler: EdgeSampler::new(opts.supersample),
            fonts: FontRegistry::new(),
            presenter: Arc::new(LayeredPresenter::new(domain)),
            glyphs: Box::new(ParleyGlyphRasterizer::new()),
        }
    }

    /// Swap in another backend's glyph rasterizer.
    pub fn with_glyph_rasterizer(mut self, glyphs: Box<dyn GlyphRasterizer>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Compatibility domain of this context's surfaces.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Options this context was built with.
    pub fn opts(&self) -> &RasterOpts {
        &self.opts
    }

    /// Surface pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Loaded fonts.
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Load (or share) face `index` of a font file.
    pub fn acquire_font(&mut self, bytes: &[u8], index: u32) -> RasterResult<FontKey> {
        self.fonts.acquire(bytes, index)
    }

    /// Release a font obtained from [`RasterContext::acquire_font`].
    ///
    /// When the last reference goes, the glyph rasterizer drops its copy of the face too.
    pub fn release_font(&mut self, key: FontKey) -> bool {
        let freed = self.fonts.release(key);
        if freed {
            self.glyphs.forget_font(key);
        }
        freed
    }

    /// Layered presenter for this window; clone it for resize paths that run outside painting.
    pub fn presenter(&self) -> Arc<LayeredPresenter> {
        Arc::clone(&self.presenter)
    }

    fn shapes(&mut self) -> ShapeRenderer<'_> {
        ShapeRenderer::new(&mut self.pool, self.sampler)
    }

    /// See [`ShapeRenderer::fill_rounded_rectangle`].
    pub fn fill_rounded_rectangle<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        radii: (f64, f64),
        color: Bgra8,
    ) {
        self.shapes().fill_rounded_rectangle(target, rect, radii, color);
    }

    /// See [`ShapeRenderer::draw_rounded_rectangle`].
    pub fn draw_rounded_rectangle<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        radii: (f64, f64),
        stroke_width: f64,
        color: Bgra8,
    ) {
        self.shapes()
            .draw_rounded_rectangle(target, rect, radii, stroke_width, color);
    }

    /// See [`ShapeRenderer::fill_ellipse`].
    pub fn fill_ellipse<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        color: Bgra8,
    ) {
        self.shapes().fill_ellipse(target, rect, color);
    }

    /// See [`ShapeRenderer::draw_ellipse`].
    pub fn draw_ellipse<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        rect: Rect,
        stroke_width: f64,
        color: Bgra8,
    ) {
        self.shapes().draw_ellipse(target, rect, stroke_width, color);
    }

    /// See [`ShapeRenderer::draw_line`].
    pub fn draw_line<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        a: Point,
        b: Point,
        thickness: f64,
        color: Bgra8,
    ) {
        self.shapes().draw_line(target, a, b, thickness, color);
    }

    /// Draw `text` inside `rect` with a font from this context's registry.
    ///
    /// Unknown font keys are a logged no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text<T: NativeTarget>(
        &mut self,
        target: &mut T,
        text: &str,
        rect: PixelRect,
        font: FontKey,
        size_px: f32,
        color: Bgra8,
        flags: TextLayoutFlags,
    ) {
        let Some(face) = self.fonts.get(font) else {
            tracing::debug!(font = font.get(), "draw_text: font not loaded, skipped");
            return;
        };
        let run = TextRun {
            text,
            font: face,
            size_px,
            rect,
            flags,
        };
        crate::text::renderer::draw_text(
            target,
            &mut self.pool,
            self.glyphs.as_mut(),
            &run,
            color,
        );
    }

    /// See [`crate::draw_image`].
    pub fn draw_image<T: NativeTarget + ?Sized>(
        &mut self,
        target: &mut T,
        image: &SourceImage,
        src_rect: PixelRect,
        dest_rect: PixelRect,
        quality: ImageQuality,
    ) {
        crate::render::image::draw_image(target, image, src_rect, dest_rect, quality);
    }

    /// Render a `width x height` layered frame with this context.
    pub fn render_layered<R>(
        &mut self,
        width: u32,
        height: u32,
        f: impl FnOnce(&mut Self, &mut BitmapTarget) -> R,
    ) -> RasterResult<R> {
        let presenter = Arc::clone(&self.presenter);
        presenter.with_frame(width, height, |frame| f(self, frame))
    }

    /// Present the last layered frame to `window`.
    pub fn present<W: LayeredWindow + ?Sized>(&self, window: &mut W, opacity: f32) -> bool {
        self.presenter.present(window, opacity)
    }
}

#[cfg(test)]
#[path = "../tests/unit/context.rs"]
mod tests;
