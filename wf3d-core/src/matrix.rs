/// Homogeneous point matrix shared by edges, polygons and transforms
use std::fmt;

use nalgebra::{DMatrix, Matrix4, Point3};

use crate::error::{Error, Result};
use crate::geometry::{Segment, Triangle};

/// Rows in a homogeneous point or transform matrix
pub const HOMOGENEOUS_ROWS: usize = 4;

/// A matrix with a fixed row count and a growable column count.
///
/// Storage is column-major, so every column is one contiguous slice. Point
/// matrices hold one `(x, y, z, 1)` point per column; transforms are 4x4.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Empty 4-row matrix ready to receive edges or polygons
    pub fn points() -> Self {
        Self::new(HOMOGENEOUS_ROWS, 0)
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        m.ident();
        m
    }

    /// Build from column-major data
    pub fn from_column_slice(rows: usize, cols: usize, data: &[f64]) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                op: "from_column_slice",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: data.to_vec(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0
    }

    /// # Panics
    /// If `row` or `col` is out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "matrix index out of range");
        self.data[col * self.rows + row]
    }

    /// # Panics
    /// If `col` is out of range.
    pub fn column(&self, col: usize) -> &[f64] {
        assert!(col < self.cols, "matrix column out of range");
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn push_column(&mut self, column: &[f64]) -> Result<()> {
        if column.len() != self.rows {
            return Err(Error::DimensionMismatch {
                op: "push_column",
                left: self.shape(),
                right: (column.len(), 1),
            });
        }
        self.data.extend_from_slice(column);
        self.cols += 1;
        Ok(())
    }

    /// Fails unless this matrix can hold homogeneous points
    pub(crate) fn ensure_points(&self, op: &'static str) -> Result<()> {
        if self.rows != HOMOGENEOUS_ROWS {
            return Err(Error::DimensionMismatch {
                op,
                left: self.shape(),
                right: (HOMOGENEOUS_ROWS, self.cols),
            });
        }
        Ok(())
    }

    /// Caller has checked `ensure_points`
    pub(crate) fn push_point(&mut self, p: Point3<f64>) {
        debug_assert_eq!(self.rows, HOMOGENEOUS_ROWS);
        self.data.extend_from_slice(&[p.x, p.y, p.z, 1.0]);
        self.cols += 1;
    }

    /// Append one line segment (two columns)
    pub fn add_edge(&mut self, p0: Point3<f64>, p1: Point3<f64>) -> Result<()> {
        self.ensure_points("add_edge")?;
        self.push_point(p0);
        self.push_point(p1);
        Ok(())
    }

    /// Append one triangle (three columns), CCW for a front face
    pub fn add_polygon(&mut self, p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>) -> Result<()> {
        self.ensure_points("add_polygon")?;
        self.push_point(p0);
        self.push_point(p1);
        self.push_point(p2);
        Ok(())
    }

    /// Matrix product `self * rhs`
    pub fn mul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                op: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        let product = self.to_nalgebra() * rhs.to_nalgebra();
        Self::from_column_slice(product.nrows(), product.ncols(), product.as_slice())
    }

    /// Left-multiply every column by a 4x4 transform, in place.
    ///
    /// Leaves `self` untouched on error.
    pub fn apply(&mut self, transform: &Matrix) -> Result<()> {
        let square = (HOMOGENEOUS_ROWS, HOMOGENEOUS_ROWS);
        if self.rows != HOMOGENEOUS_ROWS || transform.shape() != square {
            return Err(Error::DimensionMismatch {
                op: "apply",
                left: transform.shape(),
                right: self.shape(),
            });
        }
        *self = transform.mul(self)?;
        Ok(())
    }

    /// Reset to ones on the main diagonal, zeros elsewhere
    pub fn ident(&mut self) {
        self.data.fill(0.0);
        for i in 0..self.rows.min(self.cols) {
            self.data[i * self.rows + i] = 1.0;
        }
    }

    /// Drop every column, keeping the row count
    pub fn clear(&mut self) {
        self.data.clear();
        self.cols = 0;
    }

    /// Cartesian point stored in a column.
    ///
    /// # Panics
    /// If the matrix has fewer than three rows or `col` is out of range.
    pub fn point(&self, col: usize) -> Point3<f64> {
        let c = self.column(col);
        Point3::new(c[0], c[1], c[2])
    }

    /// Consecutive column pairs
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.cols / 2).map(move |i| Segment::new(self.point(2 * i), self.point(2 * i + 1)))
    }

    /// Consecutive column triples
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.cols / 3).map(move |i| {
            Triangle::new(self.point(3 * i), self.point(3 * i + 1), self.point(3 * i + 2))
        })
    }

    /// Same shape and every entry within `eps`
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    fn to_nalgebra(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.rows, self.cols, &self.data)
    }
}

impl From<Matrix4<f64>> for Matrix {
    fn from(m: Matrix4<f64>) -> Self {
        Self {
            rows: 4,
            cols: 4,
            data: m.as_slice().to_vec(),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:8.2}", self.get(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_column_slice(4, 4, &(1..=16).map(f64::from).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = sample();
        let data: Vec<f64> = (0..16).map(|v| f64::from(v) * 0.5 - 3.0).collect();
        let b = Matrix::from_column_slice(4, 4, &data).unwrap();
        let ab = a.mul(&b).unwrap();
        assert_eq!(ab.mul(&Matrix::identity(4)).unwrap(), ab);
        assert_eq!(Matrix::identity(4).mul(&ab).unwrap(), ab);
    }

    #[test]
    fn test_column_major_layout() {
        let m = sample();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 0), 2.0);
        assert_eq!(m.get(0, 1), 5.0);
        assert_eq!(m.column(3), &[13.0, 14.0, 15.0, 16.0]);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::new(4, 3);
        let b = Matrix::new(4, 4);
        assert!(matches!(a.mul(&b), Err(Error::DimensionMismatch { .. })));
        assert_eq!(b.mul(&Matrix::new(4, 7)).unwrap().shape(), (4, 7));
    }

    #[test]
    fn test_push_column_checks_length() {
        assert!(Matrix::from_column_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());

        let mut m = Matrix::points();
        assert!(m.push_column(&[1.0, 2.0, 3.0]).is_err());
        assert!(m.is_empty());
        m.push_column(&[1.0, 2.0, 3.0, 1.0]).unwrap();
        assert_eq!(m.cols(), 1);
    }

    #[test]
    fn test_edges_and_polygons_keep_column_multiples() {
        let mut edges = Matrix::points();
        edges.add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(edges.cols(), 2);
        assert_eq!(edges.column(1), &[1.0, 2.0, 3.0, 1.0]);

        let mut polygons = Matrix::points();
        polygons
            .add_polygon(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(polygons.cols(), 3);
        assert_eq!(polygons.triangles().count(), 1);

        let mut wrong = Matrix::new(3, 0);
        assert!(wrong.add_edge(Point3::origin(), Point3::origin()).is_err());
        assert_eq!(wrong.cols(), 0);
    }

    #[test]
    fn test_apply_transforms_every_column() {
        let mut edges = Matrix::points();
        edges.add_edge(Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.0, 4.0)).unwrap();

        let mut doubled = Matrix::identity(4);
        for i in 0..3 {
            doubled.data[i * 4 + i] = 2.0;
        }
        edges.apply(&doubled).unwrap();

        let segment = edges.edges().next().unwrap();
        assert_eq!(segment.start, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(segment.end, Point3::new(-2.0, 0.0, 8.0));
        assert_eq!(edges.get(3, 1), 1.0);
    }

    #[test]
    fn test_apply_rejects_wrong_shapes_without_mutation() {
        let mut edges = Matrix::points();
        edges.add_edge(Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)).unwrap();
        let before = edges.clone();

        assert!(matches!(
            edges.apply(&Matrix::identity(3)),
            Err(Error::DimensionMismatch { op: "apply", .. })
        ));
        assert_eq!(edges, before);

        let mut short = Matrix::new(3, 2);
        assert!(short.apply(&Matrix::identity(4)).is_err());
    }

    #[test]
    fn test_ident_and_clear() {
        let mut m = sample();
        m.ident();
        assert_eq!(m, Matrix::identity(4));

        let mut points = Matrix::points();
        points.add_edge(Point3::origin(), Point3::origin()).unwrap();
        points.clear();
        assert!(points.is_empty());
        assert_eq!(points.rows(), 4);
    }

    #[test]
    fn test_display_prints_one_line_per_row() {
        let text = Matrix::identity(4).to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().next().unwrap().trim_start().starts_with("1.00"));
    }
}
