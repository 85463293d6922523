//! JSON scene files: a canvas plus an ordered list of draw commands.
//!
//! Colors are straight-alpha `[r, g, b, a]`. Shape rectangles are `[x, y, width, height]` in
//! device pixels; text and image rectangles are integer [`PixelRect`]s. Font and image paths
//! are resolved against the directory passed to [`Scene::render`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::RasterOpts;
use crate::context::RasterContext;
use crate::foundation::core::{Bgra8, PixelRect, Point, Rect};
use crate::foundation::error::{RasterError, RasterResult};
use crate::image::cache::ImageQuality;
use crate::image::source::SourceImage;
use crate::render::target::{BitmapTarget, DomainId};
use crate::text::font::FontKey;
use crate::text::rasterizer::TextLayoutFlags;

const SCENE_DOMAIN: DomainId = DomainId(0);

/// A frame description.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Background color; transparent when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<[u8; 4]>,
    /// Rasterizer options; defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opts: Option<RasterOpts>,
    /// Draw commands in paint order.
    #[serde(default)]
    pub commands: Vec<DrawCommand>,
}

/// One draw call.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Filled rounded rectangle.
    FillRoundedRect {
        /// `[x, y, width, height]`.
        rect: [f64; 4],
        /// Corner radii `[rx, ry]`.
        #[serde(default)]
        radius: [f64; 2],
        /// Fill color.
        color: [u8; 4],
    },
    /// Inside-aligned rounded rectangle outline.
    StrokeRoundedRect {
        /// `[x, y, width, height]`.
        rect: [f64; 4],
        /// Corner radii `[rx, ry]`.
        #[serde(default)]
        radius: [f64; 2],
        /// Stroke width in pixels.
        stroke_width: f64,
        /// Stroke color.
        color: [u8; 4],
    },
    /// Filled ellipse inscribed in `rect`.
    FillEllipse {
        /// `[x, y, width, height]`.
        rect: [f64; 4],
        /// Fill color.
        color: [u8; 4],
    },
    /// Inside-aligned ellipse outline.
    StrokeEllipse {
        /// `[x, y, width, height]`.
        rect: [f64; 4],
        /// Stroke width in pixels.
        stroke_width: f64,
        /// Stroke color.
        color: [u8; 4],
    },
    /// Round-capped line.
    Line {
        /// Start point `[x, y]`.
        from: [f64; 2],
        /// End point `[x, y]`.
        to: [f64; 2],
        /// Line thickness in pixels.
        thickness: f64,
        /// Line color.
        color: [u8; 4],
    },
    /// Text in a layout rectangle.
    Text {
        /// UTF-8 text.
        text: String,
        /// Font file path.
        font: PathBuf,
        /// Face index inside the font file.
        #[serde(default)]
        face_index: u32,
        /// Font size in pixels.
        size_px: f32,
        /// Layout rectangle.
        rect: PixelRect,
        /// Text color.
        color: [u8; 4],
        /// Alignment and wrapping.
        #[serde(default)]
        flags: TextLayoutFlags,
    },
    /// Image stretched into a destination rectangle.
    Image {
        /// Image file path (any format the `image` crate decodes).
        path: PathBuf,
        /// Source sub-rectangle; the whole image when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<PixelRect>,
        /// Destination rectangle.
        dest: PixelRect,
        /// Resampling quality.
        #[serde(default)]
        quality: ImageQuality,
    },
}

fn color(c: [u8; 4]) -> Bgra8 {
    Bgra8::from_rgba(c[0], c[1], c[2], c[3])
}

fn rect(r: [f64; 4]) -> Rect {
    Rect::new(r[0], r[1], r[0] + r[2], r[1] + r[3])
}

impl Scene {
    /// Parse a scene from JSON text.
    pub fn from_json_str(s: &str) -> RasterResult<Self> {
        let scene: Self = serde_json::from_str(s)
            .map_err(|e| RasterError::validation(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read and parse a scene file.
    pub fn from_path(path: &Path) -> RasterResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check the canvas and options.
    pub fn validate(&self) -> RasterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::validation("scene width/height must be > 0"));
        }
        if let Some(opts) = &self.opts {
            opts.validate()?;
        }
        Ok(())
    }

    /// Render every command into a fresh frame; relative paths resolve against `root`.
    ///
    /// Missing or undecodable fonts and images are errors; bad geometry is skipped like any
    /// other draw.
    pub fn render(&self, root: &Path) -> RasterResult<BitmapTarget> {
        self.validate()?;
        let mut ctx = RasterContext::new(SCENE_DOMAIN, self.opts.unwrap_or_default());
        let mut target = BitmapTarget::new(SCENE_DOMAIN, self.width, self.height)?;
        if let Some(c) = self.clear {
            target.clear(color(c).premultiply());
        }

        let mut fonts: HashMap<(PathBuf, u32), FontKey> = HashMap::new();
        let mut images: HashMap<PathBuf, SourceImage> = HashMap::new();

        for (i, cmd) in self.commands.iter().enumerate() {
            tracing::trace!(index = i, ?cmd, "scene command");
            match cmd {
                DrawCommand::FillRoundedRect {
                    rect: r,
                    radius,
                    color: c,
                } => ctx.fill_rounded_rectangle(
                    &mut target,
                    rect(*r),
                    (radius[0], radius[1]),
                    color(*c),
                ),
                DrawCommand::StrokeRoundedRect {
                    rect: r,
                    radius,
                    stroke_width,
                    color: c,
                } => ctx.draw_rounded_rectangle(
                    &mut target,
                    rect(*r),
                    (radius[0], radius[1]),
                    *stroke_width,
                    color(*c),
                ),
                DrawCommand::FillEllipse { rect: r, color: c } => {
                    ctx.fill_ellipse(&mut target, rect(*r), color(*c));
                }
                DrawCommand::StrokeEllipse {
                    rect: r,
                    stroke_width,
                    color: c,
                } => ctx.draw_ellipse(&mut target, rect(*r), *stroke_width, color(*c)),
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    color: c,
                } => ctx.draw_line(
                    &mut target,
                    Point::new(from[0], from[1]),
                    Point::new(to[0], to[1]),
                    *thickness,
                    color(*c),
                ),
                DrawCommand::Text {
                    text,
                    font,
                    face_index,
                    size_px,
                    rect: r,
                    color: c,
                    flags,
                } => {
                    let key = match fonts.entry((root.join(font), *face_index)) {
                        Entry::Occupied(e) => *e.get(),
                        Entry::Vacant(e) => {
                            let (path, index) = e.key();
                            let bytes = std::fs::read(path)
                                .with_context(|| format!("read font '{}'", path.display()))?;
                            let key = ctx.acquire_font(&bytes, *index)?;
                            *e.insert(key)
                        }
                    };
                    ctx.draw_text(&mut target, text, *r, key, *size_px, color(*c), *flags);
                }
                DrawCommand::Image {
                    path,
                    src,
                    dest,
                    quality,
                } => {
                    let img = match images.entry(root.join(path)) {
                        Entry::Occupied(e) => e.into_mut(),
                        Entry::Vacant(e) => {
                            let img = load_image(e.key())?;
                            e.insert(img)
                        }
                    };
                    let src = src.unwrap_or_else(|| img.bounds());
                    ctx.draw_image(&mut target, img, src, *dest, *quality);
                }
            }
        }

        tracing::debug!(
            commands = self.commands.len(),
            pool = ?ctx.pool_stats(),
            "scene rendered"
        );
        Ok(target)
    }
}

/// Decode an image file into a premultiplied [`SourceImage`].
pub fn load_image(path: &Path) -> RasterResult<SourceImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let rgba = ::image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight_rgba(width, height, rgba.as_raw())
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
