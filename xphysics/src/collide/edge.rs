//! Edge-circle and edge-polygon manifolds (spec.md §4.5, §4.6). The edge
//! shape carries optional "ghost" neighbor vertices so a circle or polygon
//! resting exactly on a shared vertex between two edges of a chain picks up
//! a contact normal consistent with whichever edge it is actually touching,
//! instead of the two edges fighting over the vertex.
//!
//! Ported from the teacher's `collision::collide_edge`, with
//! `EPCollider::compute_polygon_separation` completed (the teacher left it
//! `unimplemented!()`) and a public `collide_edge_and_polygon` entry point
//! added to match the other four colliders' call shape.

use crate::clip::{clip_segment_to_line, ClipVertex};
use crate::manifold::{ContactFeatureType, ContactId, Manifold, ManifoldPoint, ManifoldType};
use crate::settings::{angular_slop, k_absolute_tol, k_relative_tol};
use crate::shapes::{Circle, Edge, Polygon, Shape as _};
use xmath::{Transform, Vec2};

pub fn collide_edge_and_circle(edge_a: &Edge, xf_a: Transform, circle_b: &Circle, xf_b: Transform) -> Manifold {
    let q = xf_a.transpose_multiply(xf_b.multiply(circle_b.position));

    let a = edge_a.vertex1;
    let b = edge_a.vertex2;
    let e = b - a;

    let u = e.dot(b - q);
    let v = e.dot(q - a);

    let radius = edge_a.radius() + circle_b.radius;

    let circle_point = |local_point: Vec2, index_a: u8, type_a: ContactFeatureType| Manifold {
        manifold_type: ManifoldType::Circles,
        local_point,
        local_normal: Vec2::zero(),
        points: vec![ManifoldPoint {
            local_point: circle_b.position,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            id: ContactId::new(index_a, 0, type_a, ContactFeatureType::Vertex),
        }],
    };

    if v <= 0.0 {
        let p = a;
        let d = q - p;
        if d.dot(d) > radius * radius {
            return Manifold::empty();
        }

        if let Some(v0) = edge_a.vertex0 {
            let a1 = v0;
            let b1 = a;
            let e1 = b1 - a1;
            let u1 = e1.dot(b1 - q);
            if u1 > 0.0 {
                return Manifold::empty();
            }
        }

        return circle_point(p, 0, ContactFeatureType::Vertex);
    }

    if u <= 0.0 {
        let p = b;
        let d = q - p;
        if d.dot(d) > radius * radius {
            return Manifold::empty();
        }

        if let Some(v3) = edge_a.vertex3 {
            let b2 = v3;
            let a2 = b;
            let e2 = b2 - a2;
            let v2 = e2.dot(q - a2);
            if v2 > 0.0 {
                return Manifold::empty();
            }
        }

        return circle_point(p, 1, ContactFeatureType::Vertex);
    }

    let den = e.dot(e);
    debug_assert!(den > 0.0);
    let p = (a * u + b * v) * (1.0 / den);
    let d = q - p;
    if d.dot(d) > radius * radius {
        return Manifold::empty();
    }

    let mut n = Vec2::new(-e.y, e.x);
    if n.dot(q - a) < 0.0 {
        n = -n;
    }
    let n = n.normalize();

    Manifold {
        manifold_type: ManifoldType::FaceA,
        local_point: a,
        local_normal: n,
        points: vec![ManifoldPoint {
            local_point: circle_b.position,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            id: ContactId::new(0, 0, ContactFeatureType::Face, ContactFeatureType::Vertex),
        }],
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum EpAxisType {
    Unknown,
    EdgeA,
    EdgeB,
}

#[derive(Debug, Copy, Clone)]
struct EpAxis {
    axis_type: EpAxisType,
    index: i32,
    separation: f64,
}

struct TempPolygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

struct ReferenceFace {
    i1: usize,
    i2: usize,
    v1: Vec2,
    v2: Vec2,
    normal: Vec2,
    side_normal1: Vec2,
    side_offset1: f64,
    side_normal2: Vec2,
    side_offset2: f64,
}

/// Computes an edge-vs-polygon manifold, resolving the edge's ambiguous
/// "thick segment" normal against its optional ghost neighbors before
/// falling back to ordinary SAT against the polygon's own faces.
struct EpCollider {
    xf: Transform,
    centroid_b: Vec2,
    v0: Option<Vec2>,
    v1: Vec2,
    v2: Vec2,
    v3: Option<Vec2>,
    normal0: Vec2,
    normal1: Vec2,
    normal2: Vec2,
    normal: Vec2,
    lower_limit: Vec2,
    upper_limit: Vec2,
    radius: f64,
    front: bool,
    polygon_b: TempPolygon,
}

impl EpCollider {
    fn collide(edge_a: &Edge, xf_a: Transform, polygon_b: &Polygon, xf_b: Transform) -> Manifold {
        let xf = xf_a.transpose_multiply_transform(xf_b);
        let centroid_b = xf.multiply(polygon_b.centroid);

        let v1 = edge_a.vertex1;
        let v2 = edge_a.vertex2;
        let has_vertex0 = edge_a.vertex0.is_some();
        let has_vertex3 = edge_a.vertex3.is_some();

        let edge1 = (v2 - v1).normalize();
        let normal1 = Vec2::new(edge1.y, -edge1.x);
        let offset1 = normal1.dot(centroid_b - v1);

        let mut offset0 = 0.0;
        let mut offset2 = 0.0;
        let mut convex1 = false;
        let mut convex2 = false;
        let mut normal0 = Vec2::zero();
        let mut normal2 = Vec2::zero();

        if let Some(v0) = edge_a.vertex0 {
            let edge0 = (v1 - v0).normalize();
            normal0 = Vec2::new(edge0.y, -edge0.x);
            convex1 = edge0.cross(edge1) >= 0.0;
            offset0 = normal0.dot(centroid_b - v0);
        }

        if let Some(v3) = edge_a.vertex3 {
            let edge2 = (v3 - v2).normalize();
            normal2 = Vec2::new(edge2.y, -edge2.x);
            convex2 = edge1.cross(edge2) > 0.0;
            offset2 = normal2.dot(centroid_b - v2);
        }

        let (front, normal, lower_limit, upper_limit) = if has_vertex0 && has_vertex3 {
            if convex1 && convex2 {
                let front = offset0 >= 0.0 || offset1 >= 0.0 || offset2 >= 0.0;
                if front {
                    (true, normal1, normal0, normal2)
                } else {
                    (false, -normal1, -normal1, -normal1)
                }
            } else if convex1 {
                let front = offset0 >= 0.0 || (offset1 >= 0.0 && offset2 >= 0.0);
                if front {
                    (true, normal1, normal0, normal1)
                } else {
                    (false, -normal1, -normal2, -normal1)
                }
            } else if convex2 {
                let front = offset2 >= 0.0 || (offset0 >= 0.0 && offset1 >= 0.0);
                if front {
                    (true, normal1, normal1, normal2)
                } else {
                    (false, -normal1, -normal1, -normal0)
                }
            } else {
                let front = offset0 >= 0.0 && offset1 >= 0.0 && offset2 >= 0.0;
                if front {
                    (true, normal1, normal1, normal1)
                } else {
                    (false, -normal1, -normal2, -normal0)
                }
            }
        } else if has_vertex0 {
            if convex1 {
                let front = offset0 >= 0.0 || offset1 >= 0.0;
                if front {
                    (true, normal1, normal0, -normal1)
                } else {
                    (false, -normal1, normal1, -normal1)
                }
            } else {
                let front = offset0 >= 0.0 && offset1 >= 0.0;
                if front {
                    (true, normal1, normal1, -normal1)
                } else {
                    (false, -normal1, normal1, -normal0)
                }
            }
        } else if has_vertex3 {
            if convex2 {
                let front = offset1 >= 0.0 || offset2 >= 0.0;
                if front {
                    (true, normal1, -normal1, normal2)
                } else {
                    (false, -normal1, -normal1, normal1)
                }
            } else {
                let front = offset1 >= 0.0 && offset2 >= 0.0;
                if front {
                    (true, normal1, -normal1, normal1)
                } else {
                    (false, -normal1, -normal2, normal1)
                }
            }
        } else {
            let front = offset1 >= 0.0;
            if front {
                (true, normal1, -normal1, -normal1)
            } else {
                (false, -normal1, normal1, normal1)
            }
        };

        let count_b = polygon_b.count();
        let mut vertices = Vec::with_capacity(count_b);
        let mut normals = Vec::with_capacity(count_b);
        for i in 0..count_b {
            vertices.push(xf.multiply(polygon_b.vertices[i]));
            normals.push(xf.q.multiply(polygon_b.normals[i]));
        }

        let mut collider = EpCollider {
            xf,
            centroid_b,
            v0: edge_a.vertex0,
            v1,
            v2,
            v3: edge_a.vertex3,
            normal0,
            normal1,
            normal2,
            normal,
            lower_limit,
            upper_limit,
            radius: polygon_b.radius() + edge_a.radius(),
            front,
            polygon_b: TempPolygon { vertices, normals },
        };

        collider.finish(polygon_b)
    }

    fn compute_edge_separation(&self) -> EpAxis {
        let index = if self.front { 0 } else { 1 };
        let mut separation = f64::MAX;
        for v in &self.polygon_b.vertices {
            let s = self.normal.dot(*v - self.v1);
            if s < separation {
                separation = s;
            }
        }
        EpAxis {
            axis_type: EpAxisType::EdgeA,
            index,
            separation,
        }
    }

    fn compute_polygon_separation(&self) -> EpAxis {
        let mut axis = EpAxis {
            axis_type: EpAxisType::Unknown,
            index: -1,
            separation: f64::MIN,
        };

        let perp = Vec2::new(-self.normal.y, self.normal.x);

        for i in 0..self.polygon_b.vertices.len() {
            let n = -self.polygon_b.normals[i];
            let v = self.polygon_b.vertices[i];

            let s1 = n.dot(v - self.v1);
            let s2 = n.dot(v - self.v2);
            let s = s1.min(s2);

            if s > self.radius {
                return EpAxis {
                    axis_type: EpAxisType::EdgeB,
                    index: i as i32,
                    separation: s,
                };
            }

            if n.dot(perp) >= 0.0 {
                if (n - self.upper_limit).dot(self.normal) < -angular_slop() {
                    continue;
                }
            } else if (n - self.lower_limit).dot(self.normal) < -angular_slop() {
                continue;
            }

            if s > axis.separation {
                axis = EpAxis {
                    axis_type: EpAxisType::EdgeB,
                    index: i as i32,
                    separation: s,
                };
            }
        }

        axis
    }

    fn finish(&mut self, polygon_b: &Polygon) -> Manifold {
        let edge_axis = self.compute_edge_separation();
        if edge_axis.axis_type == EpAxisType::Unknown {
            return Manifold::empty();
        }
        if edge_axis.separation > self.radius {
            return Manifold::empty();
        }

        let polygon_axis = self.compute_polygon_separation();
        if polygon_axis.axis_type != EpAxisType::Unknown && polygon_axis.separation > self.radius {
            return Manifold::empty();
        }

        let primary_axis = if polygon_axis.axis_type == EpAxisType::Unknown {
            edge_axis
        } else if polygon_axis.separation > k_relative_tol() * edge_axis.separation + k_absolute_tol() {
            polygon_axis
        } else {
            edge_axis
        };

        let (ie, rf, manifold_type) = if primary_axis.axis_type == EpAxisType::EdgeA {
            let mut best_index = 0;
            let mut best_value = self.normal.dot(self.polygon_b.normals[0]);
            for i in 1..self.polygon_b.normals.len() {
                let value = self.normal.dot(self.polygon_b.normals[i]);
                if value < best_value {
                    best_value = value;
                    best_index = i;
                }
            }

            let i1 = best_index;
            let i2 = if i1 + 1 < self.polygon_b.vertices.len() { i1 + 1 } else { 0 };

            let ie = [
                ClipVertex {
                    v: self.polygon_b.vertices[i1],
                    id: ContactId::new(0, i1 as u8, ContactFeatureType::Face, ContactFeatureType::Vertex),
                },
                ClipVertex {
                    v: self.polygon_b.vertices[i2],
                    id: ContactId::new(0, i2 as u8, ContactFeatureType::Face, ContactFeatureType::Vertex),
                },
            ];

            let rf = if self.front {
                ReferenceFace {
                    i1: 0,
                    i2: 1,
                    v1: self.v1,
                    v2: self.v2,
                    normal: self.normal1,
                    side_normal1: Vec2::zero(),
                    side_offset1: 0.0,
                    side_normal2: Vec2::zero(),
                    side_offset2: 0.0,
                }
            } else {
                ReferenceFace {
                    i1: 1,
                    i2: 0,
                    v1: self.v2,
                    v2: self.v1,
                    normal: -self.normal1,
                    side_normal1: Vec2::zero(),
                    side_offset1: 0.0,
                    side_normal2: Vec2::zero(),
                    side_offset2: 0.0,
                }
            };

            (ie, rf, ManifoldType::FaceA)
        } else {
            let ie = [
                ClipVertex {
                    v: self.v1,
                    id: ContactId::new(0, primary_axis.index as u8, ContactFeatureType::Vertex, ContactFeatureType::Face),
                },
                ClipVertex {
                    v: self.v2,
                    id: ContactId::new(0, primary_axis.index as u8, ContactFeatureType::Vertex, ContactFeatureType::Face),
                },
            ];

            let i1 = primary_axis.index as usize;
            let i2 = if i1 + 1 < self.polygon_b.vertices.len() { i1 + 1 } else { 0 };

            let rf = ReferenceFace {
                i1,
                i2,
                v1: self.polygon_b.vertices[i1],
                v2: self.polygon_b.vertices[i2],
                normal: self.polygon_b.normals[i1],
                side_normal1: Vec2::zero(),
                side_offset1: 0.0,
                side_normal2: Vec2::zero(),
                side_offset2: 0.0,
            };

            (ie, rf, ManifoldType::FaceB)
        };

        let mut rf = rf;
        rf.side_normal1 = Vec2::new(rf.normal.y, -rf.normal.x);
        rf.side_normal2 = -rf.side_normal1;
        rf.side_offset1 = rf.side_normal1.dot(rf.v1);
        rf.side_offset2 = rf.side_normal2.dot(rf.v2);

        let clip1 = clip_segment_to_line(ie, rf.side_normal1, rf.side_offset1, rf.i1 as u8);
        if clip1.len() < 2 {
            return Manifold::empty();
        }
        let clip_in = [clip1[0], clip1[1]];
        let clip2 = clip_segment_to_line(clip_in, rf.side_normal2, rf.side_offset2, rf.i2 as u8);
        if clip2.len() < 2 {
            return Manifold::empty();
        }

        let (local_normal, local_point) = if primary_axis.axis_type == EpAxisType::EdgeA {
            (rf.normal, rf.v1)
        } else {
            (polygon_b.normals[rf.i1], polygon_b.vertices[rf.i1])
        };

        let mut points = Vec::with_capacity(2);
        for cp in &clip2 {
            let separation = rf.normal.dot(cp.v - rf.v1);
            if separation <= self.radius {
                let (local_point, id) = if primary_axis.axis_type == EpAxisType::EdgeA {
                    (self.xf.transpose_multiply(cp.v), cp.id)
                } else {
                    (cp.v, cp.id.flip())
                };
                points.push(ManifoldPoint {
                    local_point,
                    normal_impulse: 0.0,
                    tangent_impulse: 0.0,
                    id,
                });
            }
        }

        Manifold {
            manifold_type,
            local_point,
            local_normal,
            points,
        }
    }
}

/// spec.md §4.6: edge-vs-polygon manifold generation, with a normal-limit
/// cone derived from the edge's ghost vertices.
pub fn collide_edge_and_polygon(edge_a: &Edge, xf_a: Transform, polygon_b: &Polygon, xf_b: Transform) -> Manifold {
    EpCollider::collide(edge_a, xf_a, polygon_b, xf_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmath::Rot;

    #[test]
    fn circle_resting_on_edge_face() {
        let edge = Edge::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let circle = Circle::new(Vec2::zero(), 0.3);
        let xf_b = Transform::new(Vec2::new(0.0, 0.35), Rot::identity());
        let m = collide_edge_and_circle(&edge, Transform::identity(), &circle, xf_b);
        assert_eq!(m.point_count(), 1);
        assert_eq!(m.manifold_type, ManifoldType::FaceA);
    }

    #[test]
    fn edge_with_ghosts_region_ab_literal_scenario() {
        let edge = Edge::with_ghosts(
            Vec2::new(-2.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        );
        let circle = Circle::new(Vec2::zero(), 0.5);
        let xf_b = Transform::new(Vec2::new(0.0, 0.4), Rot::identity());
        let m = collide_edge_and_circle(&edge, Transform::identity(), &circle, xf_b);
        assert_eq!(m.manifold_type, ManifoldType::FaceA);
        assert_eq!(m.local_normal, Vec2::new(0.0, 1.0));
        assert_eq!(m.local_point, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn edge_with_ghosts_region_b_is_deferred_to_next_edge() {
        let edge = Edge::with_ghosts(
            Vec2::new(-2.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        );
        let circle = Circle::new(Vec2::zero(), 0.5);
        let xf_b = Transform::new(Vec2::new(1.4, 0.4), Rot::identity());
        let m = collide_edge_and_circle(&edge, Transform::identity(), &circle, xf_b);
        assert_eq!(m.point_count(), 0);
    }

    #[test]
    fn circle_beyond_ghost_vertex_is_deferred() {
        // A chain v0 -> v1(=vertex1) -> v2(=vertex2), circle sits past v1 in
        // the region the *previous* edge owns; this edge must not claim it.
        let edge = Edge::with_ghosts(
            Vec2::new(-2.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        );
        let circle = Circle::new(Vec2::zero(), 0.1);
        let xf_b = Transform::new(Vec2::new(-1.5, 0.05), Rot::identity());
        let m = collide_edge_and_circle(&edge, Transform::identity(), &circle, xf_b);
        assert_eq!(m.point_count(), 0);
    }

    #[test]
    fn box_resting_on_edge_produces_manifold() {
        let edge = Edge::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        let poly = Polygon::new_box(0.5, 0.5);
        let xf_b = Transform::new(Vec2::new(0.0, 0.95), Rot::identity());
        let m = collide_edge_and_polygon(&edge, Transform::identity(), &poly, xf_b);
        assert!(m.point_count() > 0);
    }

    #[test]
    fn box_far_from_edge_has_no_manifold() {
        let edge = Edge::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        let poly = Polygon::new_box(0.5, 0.5);
        let xf_b = Transform::new(Vec2::new(0.0, 10.0), Rot::identity());
        let m = collide_edge_and_polygon(&edge, Transform::identity(), &poly, xf_b);
        assert_eq!(m.point_count(), 0);
    }
}
