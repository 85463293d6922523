//! Software anti-aliasing fallback for a 2D drawing contract whose native layer cannot
//! anti-alias.
//!
//! - Shapes: analytic SDFs sampled on a supersample grid, with a hybrid path that fills opaque
//!   interiors natively and only blends the corner tiles ([`ShapeRenderer`])
//! - Text: direct native glyphs over opaque pixels, synthesized per-pixel alpha elsewhere
//!   ([`draw_text`])
//! - Images: a per-image cache of resampled copies with a box-filter mip chain
//!   ([`SourceImage::try_get_or_create_scaled`])
//! - Presentation: alpha-fixed frames handed to layered windows ([`present()`])
//!
//! [`RasterContext`] bundles the per-window state (surface pool, fonts, presenter).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Crate-wide rasterizer options.
pub mod config;
/// Per-window drawing context.
pub mod context;
pub mod image;
pub mod present;
pub mod raster;
pub mod render;
pub mod scene;
pub mod shape;
pub mod text;

pub use crate::foundation::core::{
    BYTES_PER_PIXEL, Bgra8, Bgra8Premul, PixelRect, PixelView, Point, Rect, Vec2,
};
pub use crate::foundation::error::{RasterError, RasterResult};

pub use crate::config::RasterOpts;
pub use crate::context::RasterContext;
pub use crate::image::cache::{ImageQuality, MAX_SCALED_SIDE, ScaledBitmap, ScaledBitmapCache};
pub use crate::image::resample::{Kernel, PremulBuffer};
pub use crate::image::source::SourceImage;
pub use crate::present::layered::{LayeredPresenter, LayeredWindow, fix_alpha, present};
pub use crate::raster::pool::{AaSurfacePool, PoolOpts, PoolStats};
pub use crate::raster::sampler::{EdgeSampler, SupersampleFactor};
pub use crate::raster::surface::AaSurface;
pub use crate::render::image::draw_image;
pub use crate::render::shapes::ShapeRenderer;
pub use crate::render::target::{BitmapTarget, DomainId, NativeTarget};
pub use crate::scene::{DrawCommand, Scene};
pub use crate::shape::sdf::{EllipseSdf, LineSdf, RoundedRectSdf, Sdf, Span, SpanSdf};
pub use crate::text::font::{FontFace, FontKey, FontRegistry};
pub use crate::text::rasterizer::{
    GlyphRasterizer, ParleyGlyphRasterizer, TextLayoutFlags, TextRun,
};
pub use crate::text::renderer::draw_text;
