//! Fonts, glyph rasterization and per-pixel-alpha text.

/// Content-addressed font faces.
pub mod font;
/// Glyph rasterizer contract and the Parley/vello_cpu implementation.
pub mod rasterizer;
/// Text drawing with alpha synthesis for transparent targets.
pub mod renderer;
