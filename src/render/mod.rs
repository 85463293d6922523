//! Draw calls against a native target.

/// Image draws through the scaled-bitmap cache.
pub mod image;
/// Hybrid direct-fill and AA-corner shape rendering.
pub mod shapes;
/// The native target contract and the software bitmap target.
pub mod target;
