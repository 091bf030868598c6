/// Line and triangle rasterization into an `Image`
use log::debug;

use crate::error::Result;
use crate::geometry::Triangle;
use crate::image::{Color, Image};
use crate::matrix::Matrix;

/// Rounded coordinates are kept well inside `i64` so edge functions
/// cannot overflow
const COORD_LIMIT: f64 = (1i64 << 30) as f64;

/// Round half away from zero into pixel space
fn to_pixel(v: f64) -> i64 {
    v.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i64
}

/// Liang-Barsky clip of `p0 -> p1` to the box `min..=max`.
///
/// Returns `None` when the segment misses the box or a coordinate or
/// extent is not finite. Endpoints already inside come back unchanged.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    if ![p0.0, p0.1, dx, dy].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let bounds = [
        (-dx, p0.0 - min.0),
        (dx, max.0 - p0.0),
        (-dy, p0.1 - min.1),
        (dy, max.1 - p0.1),
    ];
    for (p, q) in bounds {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| (p0.0 + t * dx, p0.1 + t * dy);
    let start = if t0 > 0.0 { at(t0) } else { p0 };
    let end = if t1 < 1.0 { at(t1) } else { p1 };
    Some((start, end))
}

/// Twice the signed area of `(a, b, p)`; positive when `p` lies left of
/// `a -> b` in y-up coordinates
fn edge_function(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> i64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Top-left fill rule for a CCW triangle in y-up space: left edges run
/// downward, top edges run horizontally right to left
fn is_top_left(a: (i64, i64), b: (i64, i64)) -> bool {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    dy < 0 || (dy == 0 && dx < 0)
}

/// Visit every pixel center covered by a triangle inside `0..width, 0..height`.
///
/// Pixels on a left or top edge are covered, pixels on a right or bottom
/// edge are not, so triangles sharing an edge never overlap or gap.
fn scan_triangle(
    vertices: [(i64, i64); 3],
    width: i64,
    height: i64,
    mut visit: impl FnMut(i64, i64),
) {
    let [v0, mut v1, mut v2] = vertices;
    let area = edge_function(v0, v1, v2);
    if area == 0 {
        return;
    }
    if area < 0 {
        std::mem::swap(&mut v1, &mut v2);
    }

    let min_x = v0.0.min(v1.0).min(v2.0).max(0);
    let max_x = v0.0.max(v1.0).max(v2.0).min(width - 1);
    let min_y = v0.1.min(v1.1).min(v2.1).max(0);
    let max_y = v0.1.max(v1.1).max(v2.1).min(height - 1);

    let edges = [(v1, v2), (v2, v0), (v0, v1)];
    let bias = edges.map(|(a, b)| if is_top_left(a, b) { 0 } else { 1 });

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let inside = edges
                .iter()
                .zip(bias)
                .all(|(&(a, b), bias)| edge_function(a, b, (x, y)) >= bias);
            if inside {
                visit(x, y);
            }
        }
    }
}

impl Image {
    /// Bresenham line between two points, endpoints included.
    ///
    /// Endpoints are rounded to the nearest pixel. The segment is first
    /// clipped to one pixel beyond each image edge, so the walk never leaves
    /// that border however far away the endpoints are. Lines with a
    /// non-finite coordinate are skipped.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let max = (w as f64, h as f64);
        let Some(((x0, y0), (x1, y1))) = clip_segment((x0, y0), (x1, y1), (-1.0, -1.0), max) else {
            return;
        };
        let (x0, y0, x1, y1) = (to_pixel(x0), to_pixel(y0), to_pixel(x1), to_pixel(y1));

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw every edge matrix segment
    pub fn draw_lines(&mut self, edges: &Matrix, color: Color) -> Result<()> {
        edges.ensure_points("draw_lines")?;
        let mut count = 0;
        for segment in edges.edges() {
            self.draw_line(segment.start.x, segment.start.y, segment.end.x, segment.end.y, color);
            count += 1;
        }
        debug!("drew {} lines", count);
        Ok(())
    }

    /// Fill a triangle given in drawing coordinates, after rounding its
    /// vertices to pixels. Winding does not matter here.
    pub fn fill_triangle(&mut self, triangle: &Triangle, color: Color) {
        let vertices = triangle.vertices.map(|v| (to_pixel(v.x), to_pixel(v.y)));
        let (w, h) = (self.width() as i64, self.height() as i64);
        scan_triangle(vertices, w, h, |x, y| self.set(x, y, color));
    }

    /// Fill every polygon matrix triangle that faces the viewer.
    ///
    /// Faces whose normal does not point toward +z are skipped. There is no
    /// depth test: later faces overwrite earlier ones.
    pub fn draw_polygons(&mut self, polygons: &Matrix, color: Color) -> Result<()> {
        polygons.ensure_points("draw_polygons")?;
        let (mut drawn, mut culled) = (0, 0);
        for triangle in polygons.triangles() {
            if !triangle.faces_viewer() {
                culled += 1;
                continue;
            }
            self.fill_triangle(&triangle, color);
            drawn += 1;
        }
        debug!("drew {} polygons, culled {}", drawn, culled);
        Ok(())
    }
}
