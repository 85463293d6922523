/// Crate-wide result alias.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors surfaced at construction and configuration boundaries.
///
/// Draw calls never return these: a failing draw degrades to a logged no-op so one bad shape
/// cannot abort a frame.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Caller-supplied geometry or buffer did not satisfy a documented precondition.
    #[error("validation error: {0}")]
    Validation(String),

    /// A pixel buffer could not be allocated.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Text layout or glyph rasterization failed.
    #[error("text error: {0}")]
    Text(String),

    /// Options could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Any other failure, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::Allocation`].
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`RasterError::Text`].
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`RasterError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
