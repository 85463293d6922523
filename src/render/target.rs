use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8, Bgra8Premul, PixelRect, PixelView};
use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::composite::blend_onto;
use crate::raster::surface::AaSurface;

/// Identifies a family of drawing contexts whose surfaces can be blended into each other.
///
/// Off-screen surfaces rented for one domain must not be blitted onto a target of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId(pub u64);

/// The native drawing layer as seen by the rasterizer.
///
/// One implementation exists per backend. The rasterizer only ever needs an opaque solid fill,
/// a premultiplied source-over blit and a framebuffer read; everything else stays in the
/// backend's own drawing contract.
pub trait NativeTarget {
    /// Compatibility domain of this target.
    fn domain(&self) -> DomainId;

    /// Width in device pixels.
    fn width(&self) -> u32;

    /// Height in device pixels.
    fn height(&self) -> u32;

    /// Replace the pixels of `rect` (clipped) with `color`, without blending.
    fn fill_opaque(&mut self, rect: PixelRect, color: Bgra8);

    /// Source-over `src_rect` of a premultiplied buffer with its top-left at `(dst_x, dst_y)`.
    fn blit_premul(&mut self, src: PixelView<'_>, src_rect: PixelRect, dst_x: i32, dst_y: i32);

    /// Read back one framebuffer pixel; `None` outside the target.
    fn read_pixel(&self, x: i32, y: i32) -> Option<Bgra8Premul>;

    /// Full target rectangle.
    fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }
}

/// Software render target: an owned premultiplied BGRA8 framebuffer.
#[derive(Debug, Clone)]
pub struct BitmapTarget {
    domain: DomainId,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BitmapTarget {
    /// Transparent `width x height` target.
    pub fn new(domain: DomainId, width: u32, height: u32) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| {
            RasterError::allocation(format!("bitmap target {width}x{height} allocation failed"))
        })?;
        data.resize(len, 0);
        Ok(Self {
            domain,
            width,
            height,
            data,
        })
    }

    /// Wrap existing premultiplied BGRA8 bytes (tightly packed).
    pub fn from_premul_bgra(
        domain: DomainId,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> RasterResult<Self> {
        if data.len() != byte_len(width, height)? {
            return Err(RasterError::validation(
                "bitmap target expects width*height*4 bytes",
            ));
        }
        Ok(Self {
            domain,
            width,
            height,
            data,
        })
    }

    /// Row pitch in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Premultiplied BGRA8 bytes, row-major, tightly packed.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied BGRA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrow as a [`PixelView`].
    pub fn view(&self) -> PixelView<'_> {
        PixelView::from_parts(self.width, self.height, self.stride(), &self.data)
    }

    /// Pixel at `(x, y)`, or `None` outside the target.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Bgra8Premul> {
        self.view().pixel(x, y)
    }

    /// Overwrite every pixel with `px`.
    pub fn clear(&mut self, px: Bgra8Premul) {
        let bytes = px.to_bytes();
        for dst in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            dst.copy_from_slice(&bytes);
        }
    }

    /// Reallocate to `width x height` if the size changed; contents become transparent.
    pub fn resize(&mut self, width: u32, height: u32) -> RasterResult<()> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        *self = Self::new(self.domain, width, height)?;
        Ok(())
    }

    /// Convert to straight-alpha RGBA8, e.g. for PNG export.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(BYTES_PER_PIXEL) {
            out.extend_from_slice(&Bgra8Premul::from_bytes(px).to_straight_rgba());
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> RasterResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| RasterError::validation("bitmap size overflow"))
}

fn fill_rows(data: &mut [u8], stride: usize, rect: PixelRect, px: [u8; 4]) {
    for y in rect.y..rect.bottom() {
        let start = y as usize * stride + rect.x as usize * BYTES_PER_PIXEL;
        let end = start + rect.width as usize * BYTES_PER_PIXEL;
        for dst in data[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
            dst.copy_from_slice(&px);
        }
    }
}

impl NativeTarget for BitmapTarget {
    fn domain(&self) -> DomainId {
        self.domain
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_opaque(&mut self, rect: PixelRect, color: Bgra8) {
        let r = rect.intersect(self.bounds());
        if r.is_empty() {
            return;
        }
        let stride = self.stride();
        fill_rows(&mut self.data, stride, r, color.premultiply().to_bytes());
    }

    fn blit_premul(&mut self, src: PixelView<'_>, src_rect: PixelRect, dst_x: i32, dst_y: i32) {
        let stride = self.stride();
        blend_onto(
            &mut self.data,
            stride,
            (self.width, self.height),
            &src,
            src_rect,
            (dst_x, dst_y),
        );
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Bgra8Premul> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixel(x as u32, y as u32)
    }
}

impl NativeTarget for AaSurface {
    fn domain(&self) -> DomainId {
        AaSurface::domain(self)
    }

    fn width(&self) -> u32 {
        AaSurface::width(self)
    }

    fn height(&self) -> u32 {
        AaSurface::height(self)
    }

    fn fill_opaque(&mut self, rect: PixelRect, color: Bgra8) {
        self.fill(rect, color.premultiply());
    }

    fn blit_premul(&mut self, src: PixelView<'_>, src_rect: PixelRect, dst_x: i32, dst_y: i32) {
        let size = (AaSurface::width(self), AaSurface::height(self));
        let stride = self.stride();
        blend_onto(
            self.data_mut(),
            stride,
            size,
            &src,
            src_rect,
            (dst_x, dst_y),
        );
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Bgra8Premul> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixel(x as u32, y as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
