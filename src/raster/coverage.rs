use crate::foundation::core::{BYTES_PER_PIXEL, Bgra8};

/// Premultiplied pixel for every coverage byte of one solid color.
///
/// Built once per draw call so writing a coverage row is a table lookup per pixel.
#[derive(Clone)]
pub struct PremulLut {
    entries: [[u8; 4]; 256],
}

impl PremulLut {
    /// Table for `color`; entry `c` is the color premultiplied by coverage `c`.
    ///
    /// The color's own alpha is ignored: callers fold it into coverage before lookup.
    pub fn new(color: Bgra8) -> Self {
        let mut entries = [[0u8; 4]; 256];
        for (c, e) in entries.iter_mut().enumerate() {
            *e = color.premultiply_with(c as u8).to_bytes();
        }
        Self { entries }
    }

    /// Premultiplied BGRA bytes for coverage `c`.
    #[inline]
    pub fn get(&self, c: u8) -> [u8; 4] {
        self.entries[c as usize]
    }
}

impl std::fmt::Debug for PremulLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PremulLut")
            .field("full", &self.entries[255])
            .finish()
    }
}

/// Transient per-scanline coverage buffer.
#[derive(Debug, Default, Clone)]
pub struct AlphaRow {
    coverage: Vec<u8>,
}

impl AlphaRow {
    /// Empty row; grows on first `reset`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero `len` entries, reusing the allocation.
    pub fn reset(&mut self, len: usize) {
        self.coverage.clear();
        self.coverage.resize(len, 0);
    }

    /// Number of pixels in the row.
    pub fn len(&self) -> usize {
        self.coverage.len()
    }

    /// Return `true` when the row is empty.
    pub fn is_empty(&self) -> bool {
        self.coverage.is_empty()
    }

    /// Set coverage at `x`.
    #[inline]
    pub fn set(&mut self, x: usize, c: u8) {
        self.coverage[x] = c;
    }

    /// Coverage at `x`.
    #[inline]
    pub fn get(&self, x: usize) -> u8 {
        self.coverage[x]
    }

    /// Set coverage for `[x0, x1)`, clamped to the row.
    pub fn fill_run(&mut self, x0: usize, x1: usize, c: u8) {
        let x1 = x1.min(self.coverage.len());
        if x0 < x1 {
            self.coverage[x0..x1].fill(c);
        }
    }

    /// Raw coverage bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.coverage
    }

    /// Expand coverage into premultiplied BGRA bytes via `lut`.
    ///
    /// `dst` must hold at least `len() * 4` bytes.
    pub fn write_premul(&self, lut: &PremulLut, dst: &mut [u8]) {
        for (&c, px) in self
            .coverage
            .iter()
            .zip(dst.chunks_exact_mut(BYTES_PER_PIXEL))
        {
            px.copy_from_slice(&lut.get(c));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/coverage.rs"]
mod tests;
