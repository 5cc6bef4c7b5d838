/// Convenience result type used across lcrkit.
pub type LcrResult<T> = Result<T, LcrError>;

/// Top-level error taxonomy used by encoder APIs.
///
/// Every variant aborts the construction as a whole: no partially valid
/// container is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum LcrError {
    /// A required static resource blob could not be provided.
    #[error("resource missing: {0}")]
    ResourceMissing(String),

    /// A string, identifier or region exceeds its fixed field width.
    #[error("encoding overflow: {0}")]
    EncodingOverflow(String),

    /// Alpha-channel compression produced no usable output.
    #[error("compression failure: {0}")]
    CompressionFailure(String),

    /// A source image could not be rasterized (zero size, bad backing store).
    #[error("rasterization failure: {0}")]
    RasterizationFailure(String),

    /// Invalid user-provided input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LcrError {
    /// Build a [`LcrError::ResourceMissing`] value.
    pub fn resource_missing(msg: impl Into<String>) -> Self {
        Self::ResourceMissing(msg.into())
    }

    /// Build a [`LcrError::EncodingOverflow`] value.
    pub fn encoding_overflow(msg: impl Into<String>) -> Self {
        Self::EncodingOverflow(msg.into())
    }

    /// Build a [`LcrError::CompressionFailure`] value.
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::CompressionFailure(msg.into())
    }

    /// Build a [`LcrError::RasterizationFailure`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::RasterizationFailure(msg.into())
    }

    /// Build a [`LcrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
