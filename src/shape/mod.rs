//! Analytic signed-distance shapes.

/// SDFs for rounded rectangles, ellipses and capsule lines.
pub mod sdf;
