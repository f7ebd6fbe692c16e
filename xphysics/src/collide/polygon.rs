//! Polygon-polygon manifolds via SAT + Sutherland-Hodgman clipping (spec.md
//! §4.4). Ported from the teacher's `collision::collide_polygon`.

use crate::clip::{clip_segment_to_line, ClipVertex};
use crate::manifold::{ContactFeatureType, ContactId, Manifold, ManifoldPoint, ManifoldType};
use crate::settings::k_tol;
use crate::shapes::{Polygon, Shape as _};
use xmath::Transform;

/// Returns `(edge_index, separation)`: the edge of `poly1` with the largest
/// minimum separation from `poly2`, found by projecting every vertex of
/// `poly2` onto each of `poly1`'s face normals.
pub fn find_max_separation(poly1: &Polygon, xf1: Transform, poly2: &Polygon, xf2: Transform) -> (usize, f64) {
    let count1 = poly1.count();
    let count2 = poly2.count();
    let xf = xf2.transpose_multiply_transform(xf1);

    let mut best_index = 0;
    let mut best_separation = f64::MIN;

    for i in 0..count1 {
        let n = xf.q.multiply(poly1.normals[i]);
        let v1 = xf.multiply(poly1.vertices[i]);

        let mut si = f64::MAX;
        for j in 0..count2 {
            let sij = n.dot(poly2.vertices[j] - v1);
            if sij < si {
                si = sij;
            }
        }

        if si > best_separation {
            best_separation = si;
            best_index = i;
        }
    }

    (best_index, best_separation)
}

fn find_incident_edge(poly1: &Polygon, xf1: Transform, edge1: usize, poly2: &Polygon, xf2: Transform) -> [ClipVertex; 2] {
    let count2 = poly2.count();
    let normal1 = xf2.q.transpose_multiply(xf1.q.multiply(poly1.normals[edge1]));

    let mut index = 0;
    let mut min_dot = f64::MAX;
    for i in 0..count2 {
        let dot = normal1.dot(poly2.normals[i]);
        if dot < min_dot {
            min_dot = dot;
            index = i;
        }
    }

    let i1 = index;
    let i2 = if i1 + 1 < count2 { i1 + 1 } else { 0 };

    [
        ClipVertex {
            v: xf2.multiply(poly2.vertices[i1]),
            id: ContactId::new(edge1 as u8, i1 as u8, ContactFeatureType::Face, ContactFeatureType::Vertex),
        },
        ClipVertex {
            v: xf2.multiply(poly2.vertices[i2]),
            id: ContactId::new(edge1 as u8, i2 as u8, ContactFeatureType::Face, ContactFeatureType::Vertex),
        },
    ]
}

pub fn collide_polygons(poly_a: &Polygon, xf_a: Transform, poly_b: &Polygon, xf_b: Transform) -> Manifold {
    let total_radius = poly_a.radius() + poly_b.radius();

    let (edge_a, separation_a) = find_max_separation(poly_a, xf_a, poly_b, xf_b);
    if separation_a > total_radius {
        return Manifold::empty();
    }

    let (edge_b, separation_b) = find_max_separation(poly_b, xf_b, poly_a, xf_a);
    if separation_b > total_radius {
        return Manifold::empty();
    }

    let (poly1, xf1, poly2, xf2, edge1, manifold_type, flip) = if separation_b > separation_a + k_tol() {
        (poly_b, xf_b, poly_a, xf_a, edge_b, ManifoldType::FaceB, true)
    } else {
        (poly_a, xf_a, poly_b, xf_b, edge_a, ManifoldType::FaceA, false)
    };

    let incident_edge = find_incident_edge(poly1, xf1, edge1, poly2, xf2);

    let count1 = poly1.count();
    let iv1 = edge1;
    let iv2 = if edge1 + 1 < count1 { edge1 + 1 } else { 0 };

    let v11 = poly1.vertices[iv1];
    let v12 = poly1.vertices[iv2];

    let local_tangent = (v12 - v11).normalize();
    let local_normal = local_tangent.skew() * -1.0;
    let plane_point = (v11 + v12) * 0.5;

    let tangent = xf1.q.multiply(local_tangent);
    let normal = tangent.skew() * -1.0;

    let v11 = xf1.multiply(v11);
    let v12 = xf1.multiply(v12);

    let front_offset = normal.dot(v11);
    let side_offset1 = -tangent.dot(v11) + total_radius;
    let side_offset2 = tangent.dot(v12) + total_radius;

    let clip1 = clip_segment_to_line(incident_edge, -tangent, side_offset1, iv1 as u8);
    if clip1.len() < 2 {
        return Manifold::empty();
    }
    let clip_in = [clip1[0], clip1[1]];
    let clip2 = clip_segment_to_line(clip_in, tangent, side_offset2, iv2 as u8);
    if clip2.len() < 2 {
        return Manifold::empty();
    }

    let mut points = Vec::with_capacity(2);
    for cp in &clip2 {
        let separation = normal.dot(cp.v) - front_offset;
        if separation <= total_radius {
            let mut id = cp.id;
            if flip {
                id = id.flip();
            }
            points.push(ManifoldPoint {
                local_point: xf2.transpose_multiply(cp.v),
                normal_impulse: 0.0,
                tangent_impulse: 0.0,
                id,
            });
        }
    }

    Manifold {
        manifold_type,
        local_point: plane_point,
        local_normal,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmath::{Rot, Vec2};

    #[test]
    fn overlapping_boxes_produce_two_point_manifold() {
        let a = Polygon::new_box(1.0, 1.0);
        let b = Polygon::new_box(1.0, 1.0);
        let xf_b = Transform::new(Vec2::new(1.5, 0.0), Rot::identity());
        let m = collide_polygons(&a, Transform::identity(), &b, xf_b);
        assert_eq!(m.point_count(), 2);
    }

    #[test]
    fn distant_boxes_have_no_manifold() {
        let a = Polygon::new_box(1.0, 1.0);
        let b = Polygon::new_box(1.0, 1.0);
        let xf_b = Transform::new(Vec2::new(10.0, 0.0), Rot::identity());
        let m = collide_polygons(&a, Transform::identity(), &b, xf_b);
        assert_eq!(m.point_count(), 0);
    }

    #[test]
    fn unit_squares_at_point_nine_offset_match_literal_scenario() {
        let a = Polygon::new_box(0.5, 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_b = Transform::new(Vec2::new(0.9, 0.0), Rot::identity());
        let m = collide_polygons(&a, Transform::identity(), &b, xf_b);
        assert_eq!(m.point_count(), 2);
        assert_eq!(m.manifold_type, ManifoldType::FaceA);
        assert_eq!(m.local_normal, Vec2::new(1.0, 0.0));
        let mut ys: Vec<f64> = m.points.iter().map(|p| p.local_point.y).collect();
        ys.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert!((ys[0] - (-0.5)).abs() < 1e-9);
        assert!((ys[1] - 0.5).abs() < 1e-9);
        for p in &m.points {
            assert!((p.local_point.x - (-0.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn manifold_normal_is_unit_length() {
        let a = Polygon::new_box(1.0, 1.0);
        let b = Polygon::new_box(1.0, 1.0);
        let xf_b = Transform::new(Vec2::new(1.9, 0.0), Rot::identity());
        let m = collide_polygons(&a, Transform::identity(), &b, xf_b);
        assert!(m.point_count() > 0);
        assert!((m.local_normal.length() - 1.0).abs() < 1e-9);
    }
}
