/// Parametric step validation shared by the tessellators
use crate::error::{Error, Result};

/// Step used by the script layer unless configured otherwise
pub const DEFAULT_STEP: f64 = 0.01;

/// Most segments a single curve or circle may be split into
pub const MAX_CURVE_SEGMENTS: usize = 100_000;

/// Most samples along one axis of a surface grid
pub const MAX_SURFACE_SEGMENTS: usize = 1_000;

/// Number of segments a unit parameter range splits into at `step`.
///
/// Rejects non-finite or non-positive steps, and steps so small the count
/// would exceed `max`, before any sampling starts.
pub fn segments(step: f64, max: usize) -> Result<usize> {
    if !step.is_finite() || step <= 0.0 {
        return Err(Error::InvalidGeometryParameters(format!(
            "step must be positive, got {step}"
        )));
    }
    let n = (1.0 / step).round();
    if n > max as f64 {
        return Err(Error::InvalidGeometryParameters(format!(
            "step {step} needs {n} segments, limit is {max}"
        )));
    }
    Ok(n as usize)
}

pub(crate) fn check_radius(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidGeometryParameters(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
