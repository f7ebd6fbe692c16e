use super::{Shape, ShapeKind};
use crate::distance::DistanceProxy;
use crate::settings::{polygon_radius, MAX_POLYGON_VERTICES};
use std::borrow::Cow;
use xmath::{Aabb, Rot, Transform, Vec2};

/// A convex polygon with outward unit-length face normals parallel to its
/// vertex array (spec.md §3 "Polygon: vertices[], normals[], centroid").
#[derive(Debug, Clone)]
pub struct Polygon {
    pub centroid: Vec2,
    pub vertices: Vec<Vec2>,
    pub normals: Vec<Vec2>,
}

impl Polygon {
    /// Builds the convex hull of `points` via gift wrapping, discarding
    /// near-duplicate points, and derives centroid and face normals from it.
    /// Mirrors the construction the teacher's polygon shape performs, since
    /// every collider in this crate assumes a pre-validated convex polygon.
    pub fn new(points: &[Vec2]) -> Polygon {
        assert!(points.len() >= 3, "a polygon needs at least 3 vertices");

        let mut unique: Vec<Vec2> = Vec::with_capacity(points.len());
        for &p in points {
            let tol_sq = (0.5 * polygon_radius()).powi(2);
            if !unique.iter().any(|&q: &Vec2| (p - q).length_squared() < tol_sq) {
                unique.push(p);
            }
        }
        assert!(unique.len() >= 3, "degenerate polygon: fewer than 3 distinct vertices");
        assert!(unique.len() <= MAX_POLYGON_VERTICES);

        let hull = convex_hull(&unique);
        assert!(hull.len() >= 3, "convex hull collapsed to a degenerate shape");

        let count = hull.len();
        let mut normals = Vec::with_capacity(count);
        for i in 0..count {
            let edge = hull[(i + 1) % count] - hull[i];
            assert!(edge.length_squared() > f64::EPSILON * f64::EPSILON);
            normals.push(Vec2::new(edge.y, -edge.x).normalize());
        }

        let centroid = compute_centroid(&hull);

        Polygon {
            centroid,
            vertices: hull,
            normals,
        }
    }

    /// A box centered at the origin, half-width `hx`, half-height `hy`.
    pub fn new_box(hx: f64, hy: f64) -> Polygon {
        Polygon {
            centroid: Vec2::zero(),
            vertices: vec![
                Vec2::new(-hx, -hy),
                Vec2::new(hx, -hy),
                Vec2::new(hx, hy),
                Vec2::new(-hx, hy),
            ],
            normals: vec![
                Vec2::new(0.0, -1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.0),
            ],
        }
    }

    /// A box centered at `center`, rotated by `angle`.
    pub fn new_box_center(hx: f64, hy: f64, center: Vec2, angle: f64) -> Polygon {
        let xf = Transform::new(center, Rot::new(angle));
        let local = Polygon::new_box(hx, hy);
        Polygon {
            centroid: xf.multiply(local.centroid),
            vertices: local.vertices.iter().map(|&v| xf.multiply(v)).collect(),
            normals: local.normals.iter().map(|&n| xf.q.multiply(n)).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.vertices.len()
    }
}

fn compute_centroid(vertices: &[Vec2]) -> Vec2 {
    let count = vertices.len();
    let mut centroid = Vec2::zero();
    let mut area = 0.0;
    let origin = vertices[0];

    for i in 0..count {
        let e1 = vertices[i] - origin;
        let e2 = vertices[(i + 1) % count] - origin;
        let d = e1.cross(e2);
        let triangle_area = 0.5 * d;
        area += triangle_area;
        centroid += (e1 + e2) * (triangle_area / 3.0);
    }

    assert!(area > f64::EPSILON);
    centroid * (1.0 / area) + origin
}

fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    let mut right_most = 0;
    let mut max_x = points[0].x;
    for i in 1..n {
        let x = points[i].x;
        if x > max_x || (x == max_x && points[i].y < points[right_most].y) {
            right_most = i;
            max_x = x;
        }
    }

    let mut hull = Vec::with_capacity(n);
    let mut ih = right_most;

    loop {
        hull.push(ih);
        let mut ie = 0;
        for j in 1..n {
            if ie == ih {
                ie = j;
                continue;
            }
            let r = points[ie] - points[hull[hull.len() - 1]];
            let v = points[j] - points[hull[hull.len() - 1]];
            let c = r.cross(v);
            if c < 0.0 || (c == 0.0 && v.length_squared() > r.length_squared()) {
                ie = j;
            }
        }
        ih = ie;
        if ih == right_most {
            break;
        }
    }

    hull.into_iter().map(|i| points[i]).collect()
}

impl Shape for Polygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn radius(&self) -> f64 {
        polygon_radius()
    }

    fn compute_aabb(&self, xf: &Transform) -> Aabb {
        let mut lower = xf.multiply(self.vertices[0]);
        let mut upper = lower;
        for &v in &self.vertices[1..] {
            let p = xf.multiply(v);
            lower = lower.min(p);
            upper = upper.max(p);
        }
        let r = Vec2::new(self.radius(), self.radius());
        Aabb::new(lower - r, upper + r)
    }

    fn distance_proxy(&self, _child_index: usize) -> DistanceProxy<'_> {
        DistanceProxy {
            vertices: Cow::Borrowed(&self.vertices),
            radius: self.radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_four_outward_normals() {
        let p = Polygon::new_box(1.0, 2.0);
        assert_eq!(p.count(), 4);
        for &n in &p.normals {
            assert!((n.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn hull_drops_interior_points() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(1.0, 1.0), // interior, must be dropped
        ];
        let p = Polygon::new(&pts);
        assert_eq!(p.count(), 4);
    }

    #[test]
    fn centroid_of_box_is_origin() {
        let p = Polygon::new_box(1.0, 1.0);
        assert!(p.centroid.length() < 1e-9);
    }

    #[test]
    fn generic_constructor_normals_point_outward() {
        let pts = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let p = Polygon::new(&pts);
        for i in 0..p.count() {
            let j = (i + 1) % p.count();
            let edge_mid = (p.vertices[i] + p.vertices[j]) * 0.5;
            // the centroid must lie behind every face plane (inside the hull).
            assert!(p.normals[i].dot(p.centroid - edge_mid) < 0.0);
        }
    }
}
