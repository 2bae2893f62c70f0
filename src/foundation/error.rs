/// Convenience result type used across inkform.
pub type InkformResult<T> = Result<T, InkformError>;

/// Error taxonomy for template resolution, composition and encoding.
#[derive(thiserror::Error, Debug)]
pub enum InkformError {
    /// A caller-supplied argument is unusable (for example a blank binding name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation needs template metadata the document does not have.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Declared field geometry or layout data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The asset source could not provide the requested bytes.
    #[error("asset error: {0}")]
    Asset(String),

    /// The page rasterization collaborator failed.
    #[error("rasterization error: {0}")]
    Raster(String),

    /// Serializing pages into the output document failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkformError {
    /// Build an [`InkformError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build an [`InkformError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build an [`InkformError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InkformError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build an [`InkformError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build an [`InkformError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`InkformError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for InkformError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
