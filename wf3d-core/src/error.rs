/// Error type shared by the geometry and rendering engine
use std::io;

/// Everything the engine can fail with.
///
/// Geometry and transform failures are reported before any state is
/// touched, so a caller can skip the offending command and keep going.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Matrix shapes are incompatible for the requested operation
    #[error("{op}: dimension mismatch ({left:?} vs {right:?})")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Pop or peek on a transform stack with no frames
    #[error("transform stack is empty")]
    EmptyStack,

    /// Negative radius or extent, non-positive step, or a step too small to sample
    #[error("invalid geometry parameters: {0}")]
    InvalidGeometryParameters(String),

    /// Sampling a curve would produce fewer than two points
    #[error("invalid curve parameters: {0}")]
    InvalidCurveParameters(String),

    #[error("unknown rotation axis '{0}' (expected x, y or z)")]
    UnknownAxis(String),

    /// PPM data that could not be decoded
    #[error("invalid image data: {0}")]
    InvalidImage(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
