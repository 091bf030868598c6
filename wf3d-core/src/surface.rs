/// Solid tessellation into polygon matrices
///
/// Spheres and toruses are sampled into a `SurfaceGrid`: points addressed
/// by `(ring, segment)` with explicit wrap-around, so seam and pole handling
/// lives in one indexing function instead of being spread across loops.
use std::f64::consts::{PI, TAU};

use log::debug;
use nalgebra::Point3;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::sampling::{self, MAX_SURFACE_SEGMENTS};

const MIN_SPHERE_RINGS: usize = 2;
const MIN_SEGMENTS: usize = 3;

/// How grid rows close up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTopology {
    /// Rows run pole to pole; ring 0 and ring `rings` collapse to one point each
    Poles,
    /// Rows wrap around, ring `rings` is ring 0 again
    Wrapped,
}

/// Sampled parametric surface
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    topology: GridTopology,
    rings: usize,
    segments: usize,
    points: Vec<Point3<f64>>,
}

impl SurfaceGrid {
    /// Sphere grid. Ring `i` sits at polar angle `pi * i / rings` measured
    /// from +y, segment `j` at azimuth `2 pi * j / segments`. Counts are
    /// raised to at least 2 rings and 3 segments.
    pub fn sphere(center: Point3<f64>, radius: f64, rings: usize, segments: usize) -> Self {
        let rings = rings.max(MIN_SPHERE_RINGS);
        let segments = segments.max(MIN_SEGMENTS);
        let at = |theta: f64, phi: f64| {
            Point3::new(
                center.x + radius * theta.sin() * phi.cos(),
                center.y + radius * theta.cos(),
                center.z - radius * theta.sin() * phi.sin(),
            )
        };

        let mut points = Vec::with_capacity((rings - 1) * segments + 2);
        points.push(at(0.0, 0.0));
        for ring in 1..rings {
            let theta = PI * ring as f64 / rings as f64;
            for segment in 0..segments {
                points.push(at(theta, TAU * segment as f64 / segments as f64));
            }
        }
        points.push(at(PI, 0.0));

        Self {
            topology: GridTopology::Poles,
            rings,
            segments,
            points,
        }
    }

    /// Torus grid around the y axis. Ring `i` is the revolution angle,
    /// segment `j` the angle around the tube. Both counts are raised to at
    /// least 3.
    pub fn torus(
        center: Point3<f64>,
        tube_radius: f64,
        revolution_radius: f64,
        rings: usize,
        segments: usize,
    ) -> Self {
        let rings = rings.max(MIN_SEGMENTS);
        let segments = segments.max(MIN_SEGMENTS);
        let mut points = Vec::with_capacity(rings * segments);
        for ring in 0..rings {
            let phi = TAU * ring as f64 / rings as f64;
            for segment in 0..segments {
                let theta = TAU * segment as f64 / segments as f64;
                let reach = revolution_radius + tube_radius * theta.cos();
                points.push(Point3::new(
                    center.x + reach * phi.cos(),
                    center.y + tube_radius * theta.sin(),
                    center.z - reach * phi.sin(),
                ));
            }
        }

        Self {
            topology: GridTopology::Wrapped,
            rings,
            segments,
            points,
        }
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    pub fn rings(&self) -> usize {
        self.rings
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Point index for a grid position. Segments always wrap; rings wrap
    /// on a torus and collapse to the pole points on a sphere.
    pub fn index(&self, ring: usize, segment: usize) -> usize {
        let segment = segment % self.segments;
        match self.topology {
            GridTopology::Wrapped => (ring % self.rings) * self.segments + segment,
            GridTopology::Poles => {
                if ring == 0 {
                    0
                } else if ring >= self.rings {
                    self.points.len() - 1
                } else {
                    1 + (ring - 1) * self.segments + segment
                }
            }
        }
    }

    /// Triangles as point indices, two per grid cell, outward CCW.
    ///
    /// Cells touching a pole lose the triangle whose corners collapse,
    /// leaving one fan per pole.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut triangles = Vec::with_capacity(2 * self.rings * self.segments);
        for ring in 0..self.rings {
            for segment in 0..self.segments {
                let a = self.index(ring, segment);
                let b = self.index(ring + 1, segment);
                let c = self.index(ring + 1, segment + 1);
                let d = self.index(ring, segment + 1);
                for tri in [[a, b, c], [a, c, d]] {
                    if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                        triangles.push(tri);
                    }
                }
            }
        }
        triangles
    }

    fn append_to(&self, polygons: &mut Matrix) {
        for [a, b, c] in self.triangles() {
            polygons.push_point(self.points[a]);
            polygons.push_point(self.points[b]);
            polygons.push_point(self.points[c]);
        }
    }
}

impl Matrix {
    /// Append an axis-aligned box as 12 outward-facing triangles.
    ///
    /// `corner` is the left-top-front corner: the box spans
    /// `x..x+width`, `y-height..y` and `z-depth..z`.
    pub fn add_box(
        &mut self,
        corner: Point3<f64>,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Result<()> {
        self.ensure_points("add_box")?;
        sampling::check_radius("width", width)?;
        sampling::check_radius("height", height)?;
        sampling::check_radius("depth", depth)?;

        let (x0, x1) = (corner.x, corner.x + width);
        let (y0, y1) = (corner.y, corner.y - height);
        let (z0, z1) = (corner.z, corner.z - depth);
        let p = Point3::new;

        // each face listed CCW as seen from outside
        let faces = [
            [p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)], // front
            [p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1), p(x0, y0, z1)], // back
            [p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)], // right
            [p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0), p(x0, y0, z0)], // left
            [p(x0, y0, z1), p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1)], // top
            [p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)], // bottom
        ];
        for [a, b, c, d] in faces {
            for tri in [[a, b, c], [a, c, d]] {
                tri.into_iter().for_each(|v| self.push_point(v));
            }
        }
        Ok(())
    }

    pub fn add_sphere(&mut self, center: Point3<f64>, radius: f64, step: f64) -> Result<()> {
        self.ensure_points("add_sphere")?;
        sampling::check_radius("radius", radius)?;
        let n = sampling::segments(step, MAX_SURFACE_SEGMENTS)?;

        let grid = SurfaceGrid::sphere(center, radius, n / 2, n);
        grid.append_to(self);
        debug!("sphere r={}: {}x{} grid", radius, grid.rings, grid.segments);
        Ok(())
    }

    /// Append a torus revolving about the y axis through `center`
    pub fn add_torus(
        &mut self,
        center: Point3<f64>,
        tube_radius: f64,
        revolution_radius: f64,
        step: f64,
    ) -> Result<()> {
        self.ensure_points("add_torus")?;
        sampling::check_radius("tube radius", tube_radius)?;
        sampling::check_radius("revolution radius", revolution_radius)?;
        let n = sampling::segments(step, MAX_SURFACE_SEGMENTS)?;

        let grid = SurfaceGrid::torus(center, tube_radius, revolution_radius, n, n);
        grid.append_to(self);
        debug!(
            "torus r1={} r2={}: {}x{} grid",
            tube_radius, revolution_radius, grid.rings, grid.segments
        );
        Ok(())
    }
}
