use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::mul_div255_u8;

pub use kurbo::{Point, Rect, Vec2};

/// Bytes per BGRA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Straight-alpha solid color, as handed over by the drawing contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bgra8 {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Bgra8 {
    /// Build a color from straight-alpha RGBA components.
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Fully opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a: 255 }
    }

    /// Return `true` when alpha is 255.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Premultiply by the color's own alpha.
    pub fn premultiply(self) -> Bgra8Premul {
        self.premultiply_with(self.a)
    }

    /// Premultiply RGB by `alpha`, ignoring the color's own alpha channel.
    pub fn premultiply_with(self, alpha: u8) -> Bgra8Premul {
        let a = u16::from(alpha);
        Bgra8Premul {
            b: mul_div255_u8(u16::from(self.b), a),
            g: mul_div255_u8(u16::from(self.g), a),
            r: mul_div255_u8(u16::from(self.r), a),
            a: alpha,
        }
    }
}

/// Premultiplied BGRA8 pixel (b,g,r already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bgra8Premul {
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Bgra8Premul {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        b: 0,
        g: 0,
        r: 0,
        a: 0,
    };

    /// Read a pixel from the first four bytes of `px` (B,G,R,A order).
    pub fn from_bytes(px: &[u8]) -> Self {
        Self {
            b: px[0],
            g: px[1],
            r: px[2],
            a: px[3],
        }
    }

    /// Pixel in buffer byte order.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Undo premultiplication, returning straight-alpha RGBA.
    pub fn to_straight_rgba(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u32::from(self.a);
        let unpremul = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }
}

/// Integer device-pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Construct a rectangle from origin and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from inclusive-exclusive edges; inverted edges yield an empty rect.
    pub fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0).max(0) as u32,
            height: y1.saturating_sub(y0).max(0) as u32,
        }
    }

    /// Smallest pixel rectangle fully containing `r`.
    ///
    /// Returns `None` for non-finite input or coordinates outside the `i32` range.
    pub fn enclosing(r: Rect) -> Option<Self> {
        let (x0, y0, x1, y1) = (r.x0.floor(), r.y0.floor(), r.x1.ceil(), r.y1.ceil());
        let lim = f64::from(i32::MAX / 2);
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite() && v.abs() < lim) {
            return None;
        }
        Some(Self::from_edges(x0 as i32, y0 as i32, x1 as i32, y1 as i32))
    }

    /// Exclusive right edge.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Return `true` when the rect covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Return `true` when pixel `(x, y)` lies inside.
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection of two rects (possibly empty).
    pub fn intersect(self, other: Self) -> Self {
        Self::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Grow by `pad` pixels on every side.
    pub fn inflate(self, pad: u32) -> Self {
        let p = pad as i32;
        Self::from_edges(
            self.x.saturating_sub(p),
            self.y.saturating_sub(p),
            self.right().saturating_add(p),
            self.bottom().saturating_add(p),
        )
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Borrowed premultiplied BGRA8 pixel buffer.
///
/// This is the only form in which pixels cross into a [`crate::NativeTarget`].
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    width: u32,
    height: u32,
    stride: usize,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    /// Wrap `data` as a `width x height` image whose rows are `stride` bytes apart.
    pub fn new(width: u32, height: u32, stride: usize, data: &'a [u8]) -> RasterResult<Self> {
        let row_bytes = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| RasterError::validation("pixel view width overflow"))?;
        if stride < row_bytes {
            return Err(RasterError::validation("pixel view stride shorter than a row"));
        }
        let needed = match height {
            0 => 0,
            h => stride
                .checked_mul(h as usize - 1)
                .and_then(|v| v.checked_add(row_bytes))
                .ok_or_else(|| RasterError::validation("pixel view size overflow"))?,
        };
        if data.len() < needed {
            return Err(RasterError::validation(
                "pixel view buffer shorter than width*height",
            ));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Wrap a buffer whose layout the caller already guarantees.
    pub(crate) fn from_parts(width: u32, height: u32, stride: usize, data: &'a [u8]) -> Self {
        debug_assert!(stride >= width as usize * BYTES_PER_PIXEL);
        debug_assert!(data.len() >= stride * height as usize);
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Full rectangle covered by the view.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Bytes of row `y` (exactly `width * 4` long).
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of bounds ({})", self.height);
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Pixel at `(x, y)`, or `None` outside the view.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Bgra8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = x as usize * BYTES_PER_PIXEL;
        Some(Bgra8Premul::from_bytes(&self.row(y)[i..i + 4]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
