//! Handing finished frames to the window system.

/// Layered (per-pixel-alpha) window presentation.
pub mod layered;
