//! Coverage sampling and the premultiplied surfaces it is written into.

/// Source-over blending of premultiplied BGRA8 buffers.
pub mod composite;
/// Coverage rows and per-color premultiply tables.
pub mod coverage;
/// Off-screen surface pool keyed by compatibility domain.
pub mod pool;
/// Supersampled edge coverage.
pub mod sampler;
/// Pooled off-screen surfaces.
pub mod surface;
