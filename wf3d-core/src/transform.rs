/// Elementary 4x4 transformation matrices
use std::str::FromStr;

use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Coordinate axis for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(Error::UnknownAxis(s.to_string())),
        }
    }
}

/// Transform builder for 3D transformations.
///
/// Every builder returns a fresh 4x4 matrix. Rotations are right-handed:
/// a positive angle turns counter-clockwise when looking from the positive
/// end of the axis toward the origin, so `rotate_z(90.0)` maps +x onto +y.
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix {
        Matrix::identity(4)
    }

    /// Diagonal matrix `(sx, sy, sz, 1)`
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)).into()
    }

    /// Identity with a translation column
    pub fn translate(tx: f64, ty: f64, tz: f64) -> Matrix {
        Matrix4::new_translation(&Vector3::new(tx, ty, tz)).into()
    }

    /// Rotation about `axis` by `degrees`
    pub fn rotate(axis: Axis, degrees: f64) -> Matrix {
        Matrix4::new_rotation(axis.unit() * degrees.to_radians()).into()
    }

    pub fn rotate_x(degrees: f64) -> Matrix {
        Self::rotate(Axis::X, degrees)
    }

    pub fn rotate_y(degrees: f64) -> Matrix {
        Self::rotate(Axis::Y, degrees)
    }

    pub fn rotate_z(degrees: f64) -> Matrix {
        Self::rotate(Axis::Z, degrees)
    }

    /// Compose `a * b`: `b` acts on points first, then `a`
    pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.mul(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const EPS: f64 = 1e-9;

    fn transform_point(m: &Matrix, p: Point3<f64>) -> Point3<f64> {
        let mut points = Matrix::points();
        points.add_edge(p, p).unwrap();
        points.apply(m).unwrap();
        points.point(0)
    }

    fn assert_close(a: Point3<f64>, b: Point3<f64>) {
        assert!((a - b).norm() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_full_turn_is_identity() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!(Transform::rotate(axis, 360.0).approx_eq(&Transform::identity(), EPS));
        }
        assert!(Transform::rotate_z(360.0).approx_eq(&Transform::identity(), EPS));
    }

    #[test]
    fn test_rotation_handedness() {
        assert_close(
            transform_point(&Transform::rotate_z(90.0), Point3::new(1.0, 0.0, 0.0)),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_close(
            transform_point(&Transform::rotate_x(90.0), Point3::new(0.0, 1.0, 0.0)),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert_close(
            transform_point(&Transform::rotate_y(90.0), Point3::new(0.0, 0.0, 1.0)),
            Point3::new(1.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_scale_and_translate() {
        let p = Point3::new(1.0, -2.0, 3.0);
        let scaled = transform_point(&Transform::scale(2.0, 3.0, -1.0), p);
        assert_close(scaled, Point3::new(2.0, -6.0, -3.0));
        let moved = transform_point(&Transform::translate(5.0, 5.0, 5.0), p);
        assert_close(moved, Point3::new(6.0, 3.0, 8.0));
    }

    #[test]
    fn test_unit_scale_leaves_points_unchanged() {
        let mut points = Matrix::points();
        points.add_edge(Point3::new(1.5, -2.0, 7.0), Point3::new(0.0, 3.25, -4.0)).unwrap();
        let before = points.clone();
        points.apply(&Transform::scale(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(points, before);
    }

    #[test]
    fn test_composition_applies_newest_first() {
        // move then scale: the point is scaled first, then moved
        let translate = Transform::translate(10.0, 0.0, 0.0);
        let scale = Transform::scale(2.0, 2.0, 2.0);
        let t = Transform::multiply(&translate, &scale).unwrap();
        assert_close(transform_point(&t, Point3::new(1.0, 1.0, 1.0)), Point3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_multiply_with_identity() {
        let a = Transform::rotate_x(33.0);
        let b = Transform::translate(1.0, 2.0, 3.0);
        let ab = Transform::multiply(&a, &b).unwrap();
        assert_eq!(Transform::multiply(&ab, &Transform::identity()).unwrap(), ab);
        assert!(Transform::multiply(&ab, &Matrix::new(3, 3)).is_err());
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!(" Y ".parse::<Axis>().unwrap(), Axis::Y);
        assert!(matches!("w".parse::<Axis>(), Err(Error::UnknownAxis(_))));
    }
}
