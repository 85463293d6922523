use std::collections::HashMap;

use crate::raster::surface::AaSurface;
use crate::render::target::DomainId;

/// Fresh allocations round each side up to this many pixels so later, slightly larger requests
/// can reuse them.
const SIZE_GRANULE: u32 = 32;

/// Pool configuration for cached AA surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PoolOpts {
    /// Maximum bytes retained across all domains.
    pub max_pool_bytes: usize,
    /// Maximum number of retained surfaces per compatibility domain.
    pub max_surfaces_per_domain: usize,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 64 * 1024 * 1024,
            max_surfaces_per_domain: 8,
        }
    }
}

/// Counters describing pool behavior since creation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Surfaces currently retained.
    pub retained_surfaces: usize,
    /// Bytes currently retained.
    pub retained_bytes: usize,
    /// Surfaces allocated because no retained one fit.
    pub alloc_surfaces: u64,
    /// Bytes allocated because no retained one fit.
    pub alloc_bytes: u64,
    /// Surfaces dropped on release because a cap was hit.
    pub dropped_on_release: u64,
    /// Rent requests refused for exceeding the size cap or failing allocation.
    pub rejected: u64,
}

/// Reusable premultiplied surfaces bound to a compatibility domain.
///
/// Rent/return happen once per draw call, never per pixel. The pool is owned by a window or
/// render target and torn down with it.
#[derive(Debug)]
pub struct AaSurfacePool {
    opts: PoolOpts,
    max_surface_size: u32,
    stats: PoolStats,
    // Hash lookup is acceptable here: this is per draw call, not per pixel.
    buckets: HashMap<DomainId, Vec<AaSurface>>,
}

impl AaSurfacePool {
    /// Pool whose surfaces never exceed `max_surface_size` pixels on either side.
    pub fn new(opts: PoolOpts, max_surface_size: u32) -> Self {
        Self {
            opts,
            max_surface_size,
            stats: PoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Largest side length this pool will hand out.
    pub fn max_surface_size(&self) -> u32 {
        self.max_surface_size
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        self.stats.clone()
    }

    /// Rent a surface at least `width x height`, compatible with `domain`.
    ///
    /// Requests of zero size or above the size cap, and failed allocations, return a surface
    /// with `is_valid() == false`. Retained surfaces keep stale pixels; clear what you use.
    pub fn rent(&mut self, domain: DomainId, width: u32, height: u32) -> AaSurface {
        if width == 0
            || height == 0
            || width > self.max_surface_size
            || height > self.max_surface_size
        {
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            tracing::debug!(width, height, max = self.max_surface_size, "aa surface rejected");
            return AaSurface::invalid(domain);
        }

        if let Some(bucket) = self.buckets.get_mut(&domain) {
            let best = bucket
                .iter()
                .enumerate()
                .filter(|(_, s)| s.width() >= width && s.height() >= height)
                .min_by_key(|(_, s)| s.byte_len())
                .map(|(i, _)| i);
            if let Some(i) = best {
                let s = bucket.swap_remove(i);
                self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
                self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(s.byte_len());
                return s;
            }
        }

        let w = round_up(width, SIZE_GRANULE).min(self.max_surface_size);
        let h = round_up(height, SIZE_GRANULE).min(self.max_surface_size);
        let s = AaSurface::allocate(domain, w, h);
        if !s.is_valid() {
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            tracing::debug!(width = w, height = h, "aa surface allocation failed");
            return s;
        }
        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(s.byte_len() as u64);
        s
    }

    /// Hand a surface back to the pool (not to the allocator).
    pub fn give_back(&mut self, surface: AaSurface) {
        if !surface.is_valid() {
            return;
        }
        if self.opts.max_pool_bytes == 0 || self.opts.max_surfaces_per_domain == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bytes = surface.byte_len();
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(surface.domain()).or_default();
        if bucket.len() >= self.opts.max_surfaces_per_domain {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.push(surface);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every retained surface bound to `domain`.
    pub fn clear_domain(&mut self, domain: DomainId) {
        if let Some(bucket) = self.buckets.remove(&domain) {
            let bytes: usize = bucket.iter().map(AaSurface::byte_len).sum();
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(bucket.len());
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
        }
    }
}

fn round_up(v: u32, granule: u32) -> u32 {
    v.div_ceil(granule).saturating_mul(granule)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pool.rs"]
mod tests;
