/// WF3D Core Library - Geometry and rendering engine
///
/// Point matrices in homogeneous coordinates, 4x4 transform builders and a
/// transform stack, tessellators for curves and solids, and a rasterizer
/// that draws edge and polygon matrices into an image saved as PPM.

pub mod curve;
pub mod error;
pub mod geometry;
pub mod image;
pub mod matrix;
pub mod ppm;
pub mod raster;
pub mod sampling;
pub mod stack;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use curve::{CubicCurve, CurveKind};
pub use error::{Error, Result};
pub use geometry::{Segment, Triangle};
pub use image::{Color, Image, Origin};
pub use matrix::Matrix;
pub use ppm::PpmFormat;
pub use sampling::DEFAULT_STEP;
pub use stack::TransformStack;
pub use surface::SurfaceGrid;
pub use transform::{Axis, Transform};
