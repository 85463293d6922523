//! Source images and their resampled copies.

/// Scaled-bitmap cache keyed by geometry and quality.
pub mod cache;
/// Nearest, bilinear, bicubic and box-filter resampling.
pub mod resample;
/// Writable, versioned source images.
pub mod source;
