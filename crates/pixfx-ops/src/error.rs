//! Error types for raster operations.

use thiserror::Error;

/// Error type for raster operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Kernel shape or weights are malformed.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Rasters have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Compositing operator name or id not recognised.
    #[error("unknown compositing operator: {0}")]
    UnknownOperator(String),

    /// Error from the core raster types.
    #[error(transparent)]
    Core(#[from] pixfx_core::Error),
}

/// Result type for raster operations.
pub type OpsResult<T> = Result<T, OpsError>;
