use crate::shape::sdf::Sdf;

/// Sub-pixel grid density used for edge coverage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SupersampleFactor {
    /// One sample per pixel (aliased).
    X1,
    /// 2x2 samples per pixel.
    X2,
    /// 3x3 samples per pixel.
    #[default]
    X3,
}

impl SupersampleFactor {
    /// Samples per axis.
    pub fn per_axis(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X3 => 3,
        }
    }

    /// Pixels sampled on each side of an analytic edge crossing.
    pub(crate) fn edge_window(self) -> i32 {
        match self {
            Self::X1 | Self::X2 => 1,
            Self::X3 => 2,
        }
    }
}

impl TryFrom<u8> for SupersampleFactor {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            3 => Ok(Self::X3),
            other => Err(format!("supersample factor must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<SupersampleFactor> for u8 {
    fn from(f: SupersampleFactor) -> Self {
        f.per_axis() as u8
    }
}

/// Converts SDF classification at N x N sub-pixel offsets into one coverage byte.
///
/// Stateless apart from the precomputed offsets; identical inputs always produce identical
/// coverage.
#[derive(Clone, Copy, Debug)]
pub struct EdgeSampler {
    factor: SupersampleFactor,
    n: u32,
    offsets: [f64; 3],
}

impl EdgeSampler {
    /// Sampler for `factor`.
    pub fn new(factor: SupersampleFactor) -> Self {
        let n = factor.per_axis();
        let mut offsets = [0.5; 3];
        for (i, o) in offsets.iter_mut().enumerate().take(n as usize) {
            *o = (i as f64 + 0.5) / f64::from(n);
        }
        Self { factor, n, offsets }
    }

    /// Configured factor.
    pub fn factor(&self) -> SupersampleFactor {
        self.factor
    }

    /// Fill coverage of the pixel whose top-left corner is `(x, y)` in the SDF's frame.
    #[inline]
    pub fn fill_coverage<S: Sdf + ?Sized>(&self, sdf: &S, x: f64, y: f64, base_alpha: u8) -> u8 {
        let offs = &self.offsets[..self.n as usize];
        let mut inside = 0u32;
        for &oy in offs {
            for &ox in offs {
                inside += u32::from(sdf.distance(x + ox, y + oy) <= 0.0);
            }
        }
        self.scale(inside, base_alpha)
    }

    /// Stroke coverage: samples inside `outer` and outside `inner`.
    ///
    /// `inner == None` means the stroke consumes the whole shape.
    #[inline]
    pub fn stroke_coverage<O: Sdf + ?Sized, I: Sdf + ?Sized>(
        &self,
        outer: &O,
        inner: Option<&I>,
        x: f64,
        y: f64,
        base_alpha: u8,
    ) -> u8 {
        let offs = &self.offsets[..self.n as usize];
        let mut inside = 0u32;
        for &oy in offs {
            for &ox in offs {
                let (sx, sy) = (x + ox, y + oy);
                let in_outer = outer.distance(sx, sy) <= 0.0;
                let in_inner = inner.is_some_and(|s| s.distance(sx, sy) < 0.0);
                inside += u32::from(in_outer & !in_inner);
            }
        }
        self.scale(inside, base_alpha)
    }

    #[inline]
    fn scale(&self, inside: u32, base_alpha: u8) -> u8 {
        let total = self.n * self.n;
        ((inside * u32::from(base_alpha) + total / 2) / total) as u8
    }
}

impl Default for EdgeSampler {
    fn default() -> Self {
        Self::new(SupersampleFactor::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/sampler.rs"]
mod tests;
