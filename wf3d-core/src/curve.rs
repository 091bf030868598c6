/// Curve tessellation into edge matrices
use std::f64::consts::TAU;

use log::debug;
use nalgebra::{Matrix4, Point2, Point3, Vector4};

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::sampling::{self, MAX_CURVE_SEGMENTS};

/// Fewest samples that still close a circle into a loop
const MIN_CIRCLE_SEGMENTS: usize = 3;

/// Cubic curve families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Endpoints `p0`, `p1` and tangents `r0`, `r1`
    Hermite,
    /// Endpoints `p0`, `p3` and control points `p1`, `p2`
    Bezier,
}

impl CurveKind {
    /// Maps the geometry vector to the polynomial coefficients `[a, b, c, d]`
    /// of `a t^3 + b t^2 + c t + d`
    fn basis(self) -> Matrix4<f64> {
        match self {
            CurveKind::Hermite => Matrix4::new(
                2.0, -2.0, 1.0, 1.0, //
                -3.0, 3.0, -2.0, -1.0, //
                0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ),
            CurveKind::Bezier => Matrix4::new(
                -1.0, 3.0, -3.0, 1.0, //
                3.0, -6.0, 3.0, 0.0, //
                -3.0, 3.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ),
        }
    }
}

/// A planar cubic in the `z = 0` plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub kind: CurveKind,
    pub points: [Point2<f64>; 4],
}

impl CubicCurve {
    pub fn hermite(p0: Point2<f64>, p1: Point2<f64>, r0: Point2<f64>, r1: Point2<f64>) -> Self {
        Self {
            kind: CurveKind::Hermite,
            points: [p0, p1, r0, r1],
        }
    }

    pub fn bezier(p0: Point2<f64>, p1: Point2<f64>, p2: Point2<f64>, p3: Point2<f64>) -> Self {
        Self {
            kind: CurveKind::Bezier,
            points: [p0, p1, p2, p3],
        }
    }

    /// Build from the eight script arguments, x/y interleaved
    pub fn from_args(kind: CurveKind, args: [f64; 8]) -> Self {
        let p = |i: usize| Point2::new(args[2 * i], args[2 * i + 1]);
        Self {
            kind,
            points: [p(0), p(1), p(2), p(3)],
        }
    }

    /// Polynomial coefficients for x and y
    pub fn coefficients(&self) -> (Vector4<f64>, Vector4<f64>) {
        let basis = self.kind.basis();
        let [g0, g1, g2, g3] = self.points;
        let gx = Vector4::new(g0.x, g1.x, g2.x, g3.x);
        let gy = Vector4::new(g0.y, g1.y, g2.y, g3.y);
        (basis * gx, basis * gy)
    }

    /// Curve position at `t` in `[0, 1]`
    pub fn eval(&self, t: f64) -> Point3<f64> {
        let (cx, cy) = self.coefficients();
        Point3::new(horner(&cx, t), horner(&cy, t), 0.0)
    }
}

fn horner(c: &Vector4<f64>, t: f64) -> f64 {
    ((c[0] * t + c[1]) * t + c[2]) * t + c[3]
}

impl Matrix {
    /// Append a cubic as a polyline of `round(1 / step)` segments
    pub fn add_curve(&mut self, curve: &CubicCurve, step: f64) -> Result<()> {
        self.ensure_points("add_curve")?;
        let n = sampling::segments(step, MAX_CURVE_SEGMENTS)?;
        if n == 0 {
            return Err(Error::InvalidCurveParameters(format!(
                "step {step} yields fewer than 2 samples"
            )));
        }
        if curve.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidCurveParameters(
                "control points must be finite".to_string(),
            ));
        }

        let (cx, cy) = curve.coefficients();
        let samples: Vec<Point3<f64>> = (0..=n)
            .map(|i| {
                let t = i as f64 / n as f64;
                Point3::new(horner(&cx, t), horner(&cy, t), 0.0)
            })
            .collect();

        for pair in samples.windows(2) {
            self.push_point(pair[0]);
            self.push_point(pair[1]);
        }
        debug!("{:?} curve: {} segments", curve.kind, n);
        Ok(())
    }

    pub fn add_hermite(&mut self, args: [f64; 8], step: f64) -> Result<()> {
        self.add_curve(&CubicCurve::from_args(CurveKind::Hermite, args), step)
    }

    pub fn add_bezier(&mut self, args: [f64; 8], step: f64) -> Result<()> {
        self.add_curve(&CubicCurve::from_args(CurveKind::Bezier, args), step)
    }

    /// Append a circle in the plane `z = center.z`.
    ///
    /// The final segment ends on exactly the first sample.
    pub fn add_circle(&mut self, center: Point3<f64>, radius: f64, step: f64) -> Result<()> {
        self.ensure_points("add_circle")?;
        sampling::check_radius("radius", radius)?;
        let n = sampling::segments(step, MAX_CURVE_SEGMENTS)?.max(MIN_CIRCLE_SEGMENTS);

        let samples: Vec<Point3<f64>> = (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                Point3::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                    center.z,
                )
            })
            .collect();

        for i in 0..n {
            self.push_point(samples[i]);
            self.push_point(samples[(i + 1) % n]);
        }
        debug!("circle r={}: {} segments", radius, n);
        Ok(())
    }
}
