//! Circle-circle and polygon-circle manifolds (spec.md §4.2, §4.3). Ported
//! from the teacher's `collision::collide_circle`.

use crate::manifold::{ContactFeatureType, ContactId, Manifold, ManifoldPoint, ManifoldType};
use crate::shapes::{Circle, Polygon, Shape as _};
use xmath::Transform;

pub fn collide_circles(circle_a: &Circle, xf_a: Transform, circle_b: &Circle, xf_b: Transform) -> Manifold {
    let p_a = xf_a.multiply(circle_a.position);
    let p_b = xf_b.multiply(circle_b.position);

    let d = p_b - p_a;
    let dist_sqr = d.dot(d);
    let radius = circle_a.radius + circle_b.radius;

    if dist_sqr > radius * radius {
        return Manifold::empty();
    }

    Manifold {
        manifold_type: ManifoldType::Circles,
        local_point: circle_a.position,
        local_normal: xmath::Vec2::zero(),
        points: vec![ManifoldPoint {
            local_point: circle_b.position,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            id: ContactId::new(0, 0, ContactFeatureType::Vertex, ContactFeatureType::Vertex),
        }],
    }
}

pub fn collide_polygon_and_circle(polygon_a: &Polygon, xf_a: Transform, circle_b: &Circle, xf_b: Transform) -> Manifold {
    let radius = polygon_a.radius() + circle_b.radius;
    let c = xf_b.multiply(circle_b.position);
    let c_local = xf_a.transpose_multiply(c);

    let count = polygon_a.count();
    let mut separation = f64::MIN;
    let mut vert_index1 = 0usize;
    for i in 0..count {
        let s = polygon_a.normals[i].dot(c_local - polygon_a.vertices[i]);
        if s > radius {
            return Manifold::empty();
        }
        if s > separation {
            separation = s;
            vert_index1 = i;
        }
    }

    let vert_index2 = (vert_index1 + 1) % count;
    let v1 = polygon_a.vertices[vert_index1];
    let v2 = polygon_a.vertices[vert_index2];

    let point = |local_normal: xmath::Vec2, local_point: xmath::Vec2| Manifold {
        manifold_type: ManifoldType::FaceA,
        local_point,
        local_normal,
        points: vec![ManifoldPoint {
            local_point: circle_b.position,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            id: ContactId::new(0, 0, ContactFeatureType::Vertex, ContactFeatureType::Vertex),
        }],
    };

    if separation < f64::EPSILON {
        return point(polygon_a.normals[vert_index1], (v1 + v2) * 0.5);
    }

    let u1 = (c_local - v1).dot(v2 - v1);
    let u2 = (c_local - v2).dot(v1 - v2);

    if u1 <= 0.0 {
        if c_local.distance_squared(v1) > radius * radius {
            return Manifold::empty();
        }
        point((c_local - v1).normalize(), v1)
    } else if u2 <= 0.0 {
        if c_local.distance_squared(v2) > radius * radius {
            return Manifold::empty();
        }
        point((c_local - v2).normalize(), v2)
    } else {
        let face_center = (v1 + v2) * 0.5;
        let s = (c_local - face_center).dot(polygon_a.normals[vert_index1]);
        if s > radius {
            return Manifold::empty();
        }
        point(polygon_a.normals[vert_index1], face_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmath::{Rot, Vec2};

    #[test]
    fn concentric_circles_overlap_fully() {
        let a = Circle::new(Vec2::zero(), 1.0);
        let b = Circle::new(Vec2::zero(), 1.0);
        let m = collide_circles(&a, Transform::identity(), &b, Transform::identity());
        assert_eq!(m.point_count(), 1);
        assert_eq!(m.manifold_type, ManifoldType::Circles);
        assert_eq!(m.local_normal, Vec2::zero());
    }

    #[test]
    fn unit_circles_at_one_point_five_overlap_by_half() {
        let a = Circle::new(Vec2::zero(), 1.0);
        let b = Circle::new(Vec2::zero(), 1.0);
        let xf_b = Transform::new(Vec2::new(1.5, 0.0), Rot::identity());
        let m = collide_circles(&a, Transform::identity(), &b, xf_b);
        assert_eq!(m.point_count(), 1);
        // localPoint of the manifold point is circle B's center in B's own frame.
        assert_eq!(m.points[0].local_point, Vec2::zero());
        let overlap = (a.radius + b.radius) - 1.5;
        assert!((overlap - 0.5).abs() < 1e-9);
    }

    #[test]
    fn distant_circles_have_no_manifold() {
        let a = Circle::new(Vec2::zero(), 1.0);
        let b = Circle::new(Vec2::zero(), 1.0);
        let xf_b = Transform::new(Vec2::new(10.0, 0.0), Rot::identity());
        let m = collide_circles(&a, Transform::identity(), &b, xf_b);
        assert_eq!(m.point_count(), 0);
    }

    #[test]
    fn circle_resting_on_box_face() {
        let poly = Polygon::new_box(1.0, 1.0);
        let circle = Circle::new(Vec2::zero(), 0.5);
        let xf_b = Transform::new(Vec2::new(0.0, 1.2), Rot::identity());
        let m = collide_polygon_and_circle(&poly, Transform::identity(), &circle, xf_b);
        assert_eq!(m.point_count(), 1);
        assert_eq!(m.manifold_type, ManifoldType::FaceA);
    }

    #[test]
    fn circle_past_box_corner_has_no_manifold() {
        let poly = Polygon::new_box(1.0, 1.0);
        let circle = Circle::new(Vec2::zero(), 0.2);
        let xf_b = Transform::new(Vec2::new(2.0, 2.0), Rot::identity());
        let m = collide_polygon_and_circle(&poly, Transform::identity(), &circle, xf_b);
        assert_eq!(m.point_count(), 0);
    }
}
