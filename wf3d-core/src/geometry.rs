/// Geometry views over point matrix columns
use nalgebra::{Point3, Vector3};

/// Direction from the scene toward the viewer.
///
/// The viewer sits on the +z axis looking toward -z, so a face is visible
/// when its normal has a positive z component.
pub fn toward_viewer() -> Vector3<f64> {
    Vector3::z()
}

/// A line segment read from two consecutive edge matrix columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// A triangle face read from three consecutive polygon matrix columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the vertex winding, `(v1 - v0) x (v2 - v0)`.
    ///
    /// Not normalized: a degenerate triangle yields the zero vector instead
    /// of NaNs.
    pub fn normal(&self) -> Vector3<f64> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2)
    }

    /// Whether the face points toward the viewer. Edge-on and degenerate
    /// faces do not.
    pub fn faces_viewer(&self) -> bool {
        self.normal().dot(&toward_viewer()) > 0.0
    }

    #[cfg(test)]
    pub(crate) fn centroid(&self) -> Point3<f64> {
        let [v0, v1, v2] = self.vertices;
        Point3::from((v0.coords + v1.coords + v2.coords) / 3.0)
    }
}
