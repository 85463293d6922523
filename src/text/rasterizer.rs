use std::borrow::Cow;
use std::collections::HashMap;

use bitflags::bitflags;

use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8, PixelRect, PixelView};
use crate::foundation::error::{RasterError, RasterResult};
use crate::render::target::NativeTarget;
use crate::text::font::{FontFace, FontKey};

bitflags! {
    /// Placement of text inside its layout rectangle. Default is top-left, single line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct TextLayoutFlags: u32 {
        /// Center each line horizontally.
        const CENTER = 1 << 0;
        /// Right-align each line.
        const RIGHT = 1 << 1;
        /// Center the text block vertically.
        const VCENTER = 1 << 2;
        /// Align the text block to the bottom edge.
        const BOTTOM = 1 << 3;
        /// Break lines at the rectangle width.
        const WORD_WRAP = 1 << 4;
    }
}

/// One text draw: what to draw, with which face, where.
#[derive(Clone, Copy, Debug)]
pub struct TextRun<'a> {
    /// UTF-8 text; `\n` starts a new line.
    pub text: &'a str,
    /// Face to shape with.
    pub font: &'a FontFace,
    /// Font size in device pixels.
    pub size_px: f32,
    /// Layout rectangle in target pixels; glyphs are clipped to it.
    pub rect: PixelRect,
    /// Alignment and wrapping.
    pub flags: TextLayoutFlags,
}

impl TextRun<'_> {
    /// Same run with its rectangle translated by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            rect: self.rect.offset(dx, dy),
            ..*self
        }
    }
}

/// A backend's native glyph rasterizer.
///
/// Implementations composite glyph coverage in `ink` over whatever `target` already holds,
/// clipped to `run.rect`.
pub trait GlyphRasterizer {
    /// Shape and draw `run` onto `target`.
    fn draw_glyphs(
        &mut self,
        target: &mut dyn NativeTarget,
        run: &TextRun<'_>,
        ink: Bgra8,
    ) -> RasterResult<()>;

    /// Drop anything cached for `key`; called once its last registry reference is released.
    fn forget_font(&mut self, _key: FontKey) {}
}

/// Glyph rasterizer built on `parley` layout and `vello_cpu` glyph rendering.
pub struct ParleyGlyphRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<FontKey, FaceSelector>,
}

/// How a registered face is addressed through a Parley font stack.
#[derive(Clone, Debug)]
struct FaceSelector {
    family: String,
    weight: parley::style::FontWeight,
    style: parley::style::FontStyle,
}

impl Default for ParleyGlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParleyGlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyGlyphRasterizer")
            .field("faces", &self.faces.len())
            .finish_non_exhaustive()
    }
}

impl ParleyGlyphRasterizer {
    /// Rasterizer with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    /// Number of faces currently registered with the Parley font collection.
    pub fn registered_faces(&self) -> usize {
        self.faces.len()
    }

    fn face_for(&mut self, font: &FontFace) -> RasterResult<FaceSelector> {
        if let Some(face) = self.faces.get(&font.key()) {
            return Ok(face.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let (family_id, info) = families
            .iter()
            .find_map(|(id, infos)| {
                infos
                    .iter()
                    .find(|info| info.index() == font.index())
                    .map(|info| (*id, info))
            })
            .ok_or_else(|| {
                RasterError::text(format!("font bytes have no face at index {}", font.index()))
            })?;
        let face = FaceSelector {
            family: self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| RasterError::text("registered font family has no name"))?
                .to_string(),
            weight: info.weight(),
            style: info.style(),
        };
        self.faces.insert(font.key(), face.clone());
        Ok(face)
    }

    fn layout(&mut self, run: &TextRun<'_>) -> RasterResult<parley::Layout<()>> {
        if !run.size_px.is_finite() || run.size_px <= 0.0 {
            return Err(RasterError::validation("text size_px must be finite and > 0"));
        }
        let face = self.face_for(run.font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, run.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style));
        builder.push_default(parley::style::StyleProperty::FontSize(run.size_px));
        let mut layout: parley::Layout<()> = builder.build(run.text);
        let wrap = run
            .flags
            .contains(TextLayoutFlags::WORD_WRAP)
            .then_some(run.rect.width as f32);
        layout.break_all_lines(wrap);
        Ok(layout)
    }
}

impl GlyphRasterizer for ParleyGlyphRasterizer {
    fn draw_glyphs(
        &mut self,
        target: &mut dyn NativeTarget,
        run: &TextRun<'_>,
        ink: Bgra8,
    ) -> RasterResult<()> {
        let area = run.rect.intersect(target.bounds());
        if area.is_empty() || run.text.is_empty() {
            return Ok(());
        }
        let layout = self.layout(run)?;
        let w: u16 = area
            .width
            .try_into()
            .map_err(|_| RasterError::text("text area width exceeds u16"))?;
        let h: u16 = area
            .height
            .try_into()
            .map_err(|_| RasterError::text("text area height exceeds u16"))?;

        let (rect_w, rect_h) = (run.rect.width as f32, run.rect.height as f32);
        let block_dy = if run.flags.contains(TextLayoutFlags::VCENTER) {
            (rect_h - layout.height()) * 0.5
        } else if run.flags.contains(TextLayoutFlags::BOTTOM) {
            rect_h - layout.height()
        } else {
            0.0
        };
        let origin_x = f64::from(run.rect.x - area.x);
        let origin_y = f64::from(run.rect.y - area.y) + f64::from(block_dy);
        let font = run.font.font_data();

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(ink.r, ink.g, ink.b, ink.a));
        for line in layout.lines() {
            let advance = line.metrics().advance;
            let line_dx = if run.flags.contains(TextLayoutFlags::CENTER) {
                (rect_w - advance) * 0.5
            } else if run.flags.contains(TextLayoutFlags::RIGHT) {
                rect_w - advance
            } else {
                0.0
            };
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                origin_x + f64::from(line_dx),
                origin_y,
            )));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        // Pixmap bytes are premultiplied RGBA; targets take premultiplied BGRA.
        let mut bgra = pixmap.data_as_u8_slice().to_vec();
        for px in bgra.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        let stride = area.width as usize * BYTES_PER_PIXEL;
        let view = PixelView::new(area.width, area.height, stride, &bgra)?;
        target.blit_premul(
            view,
            PixelRect::new(0, 0, area.width, area.height),
            area.x,
            area.y,
        );
        Ok(())
    }

    fn forget_font(&mut self, key: FontKey) {
        if self.faces.remove(&key).is_none() {
            return;
        }
        // The collection cannot unregister a blob; start over and let live faces re-register.
        self.font_ctx = parley::FontContext::default();
        self.faces.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/rasterizer.rs"]
mod tests;
