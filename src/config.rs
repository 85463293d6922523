use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::pool::PoolOpts;
use crate::raster::sampler::SupersampleFactor;

/// Environment variable overriding [`RasterOpts::supersample`] (`1`, `2` or `3`).
pub const ENV_SUPERSAMPLE: &str = "AARASTER_SUPERSAMPLE";
/// Environment variable overriding [`RasterOpts::max_aa_surface_size`].
pub const ENV_MAX_SURFACE_SIZE: &str = "AARASTER_MAX_SURFACE_SIZE";

/// Rasterizer options for one window or render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterOpts {
    /// Sub-pixel grid used for edge coverage.
    pub supersample: SupersampleFactor,
    /// Largest AA surface side in pixels; bigger draws are skipped (or drawn directly for text).
    pub max_aa_surface_size: u32,
    /// Surface pool limits.
    pub pool: PoolOpts,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            supersample: SupersampleFactor::X3,
            max_aa_surface_size: 4096,
            pool: PoolOpts::default(),
        }
    }
}

impl RasterOpts {
    /// Parse options from JSON; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> RasterResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| RasterError::config(format!("parse raster options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check invariants not expressed in the types.
    pub fn validate(&self) -> RasterResult<()> {
        if self.max_aa_surface_size == 0 {
            return Err(RasterError::config("max_aa_surface_size must be non-zero"));
        }
        Ok(())
    }

    /// Apply `AARASTER_*` environment overrides. Unparseable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(factor) = lookup(ENV_SUPERSAMPLE)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .and_then(|v| SupersampleFactor::try_from(v).ok())
        {
            self.supersample = factor;
        }
        if let Some(size) = lookup(ENV_MAX_SURFACE_SIZE)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.max_aa_surface_size = size;
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
