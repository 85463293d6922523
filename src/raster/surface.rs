use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8Premul, PixelRect, PixelView};
use crate::render::target::DomainId;

/// Off-screen premultiplied BGRA8 surface rented from an [`crate::AaSurfacePool`].
///
/// A surface may be larger than what the caller asked for; callers clear and write only the
/// sub-rectangle they use. An invalid surface has no pixels at all.
#[derive(Debug)]
pub struct AaSurface {
    domain: DomainId,
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
    valid: bool,
}

impl AaSurface {
    /// Allocate a zeroed surface, or an invalid one if the allocation cannot be made.
    pub(crate) fn allocate(domain: DomainId, width: u32, height: u32) -> Self {
        let stride = (width as usize).saturating_mul(BYTES_PER_PIXEL);
        let Some(len) = stride.checked_mul(height as usize) else {
            return Self::invalid(domain);
        };
        if len == 0 {
            return Self::invalid(domain);
        }
        let mut data = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            return Self::invalid(domain);
        }
        data.resize(len, 0);
        Self {
            domain,
            width,
            height,
            stride,
            data,
            valid: true,
        }
    }

    /// Surface that reports `is_valid() == false`.
    pub(crate) fn invalid(domain: DomainId) -> Self {
        Self {
            domain,
            width: 0,
            height: 0,
            stride: 0,
            data: Vec::new(),
            valid: false,
        }
    }

    /// Return `false` if allocation failed or the request exceeded the size cap.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Compatibility domain this surface was created for.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Allocated width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Allocated height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Allocated size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Full allocated rectangle.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Bytes of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds ({})", self.height);
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Mutable bytes of row `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds ({})", self.height);
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }

    /// Mutable bytes of `width` pixels of row `y` starting at column `x`.
    pub fn row_span_mut(&mut self, x: u32, y: u32, width: u32) -> &mut [u8] {
        assert!(
            x.saturating_add(width) <= self.width,
            "span {x}+{width} exceeds surface width {}",
            self.width
        );
        let row = self.row_mut(y);
        let start = x as usize * BYTES_PER_PIXEL;
        &mut row[start..start + width as usize * BYTES_PER_PIXEL]
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Bgra8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = x as usize * BYTES_PER_PIXEL;
        Some(Bgra8Premul::from_bytes(&self.row(y)[i..i + 4]))
    }

    /// Zero the pixels of `rect` (clipped to the surface).
    pub fn clear(&mut self, rect: PixelRect) {
        let r = rect.intersect(self.bounds());
        if r.is_empty() {
            return;
        }
        for y in r.y..r.bottom() {
            self.row_span_mut(r.x as u32, y as u32, r.width).fill(0);
        }
    }

    /// Fill `rect` (clipped to the surface) with a premultiplied pixel.
    pub fn fill(&mut self, rect: PixelRect, px: Bgra8Premul) {
        let r = rect.intersect(self.bounds());
        if r.is_empty() {
            return;
        }
        let bytes = px.to_bytes();
        for y in r.y..r.bottom() {
            for dst in self
                .row_span_mut(r.x as u32, y as u32, r.width)
                .chunks_exact_mut(BYTES_PER_PIXEL)
            {
                dst.copy_from_slice(&bytes);
            }
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrow the whole surface as a [`PixelView`].
    pub fn view(&self) -> PixelView<'_> {
        PixelView::from_parts(self.width, self.height, self.stride, &self.data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
