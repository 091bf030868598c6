/// Rendering configuration for script runs
use wf3d_core::{sampling, Color, Error, DEFAULT_STEP};

pub const DEFAULT_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Parametric step for curves and solids
    pub step: f64,
    pub background: Color,
    pub edge_color: Color,
    pub polygon_color: Color,
}

impl Config {
    /// Fails on an empty image or a step the tessellators would reject
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidGeometryParameters(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        sampling::segments(self.step, sampling::MAX_SURFACE_SEGMENTS)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            step: DEFAULT_STEP,
            background: Color::BLACK,
            edge_color: Color::RED,
            polygon_color: Color::BLUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.width, config.height), (500, 500));
    }

    #[test]
    fn test_rejects_empty_image_and_bad_step() {
        let empty = Config {
            width: 0,
            ..Config::default()
        };
        assert!(empty.validate().is_err());

        let fine = Config {
            step: 1e-5,
            ..Config::default()
        };
        assert!(fine.validate().is_err());
    }
}
