use super::{Shape, ShapeKind};
use crate::distance::DistanceProxy;
use crate::settings::polygon_radius;
use std::borrow::Cow;
use xmath::{Aabb, Transform, Vec2};

/// A line segment, with optional "ghost" vertices adjacent to it on either
/// side (spec.md §3 "Edge: vertex1, vertex2, optional vertex0/vertex3").
/// The ghost vertices let edge-vs-edge-chain collisions pick a contact
/// normal consistent with the neighboring edge instead of snapping to the
/// segment's own perpendicular at a shared vertex.
#[derive(Debug, Copy, Clone)]
pub struct Edge {
    pub vertex1: Vec2,
    pub vertex2: Vec2,
    pub vertex0: Option<Vec2>,
    pub vertex3: Option<Vec2>,
}

impl Edge {
    pub fn new(vertex1: Vec2, vertex2: Vec2) -> Edge {
        Edge {
            vertex1,
            vertex2,
            vertex0: None,
            vertex3: None,
        }
    }

    pub fn with_ghosts(vertex0: Vec2, vertex1: Vec2, vertex2: Vec2, vertex3: Vec2) -> Edge {
        Edge {
            vertex1,
            vertex2,
            vertex0: Some(vertex0),
            vertex3: Some(vertex3),
        }
    }
}

impl Shape for Edge {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Edge
    }

    fn radius(&self) -> f64 {
        polygon_radius()
    }

    fn compute_aabb(&self, xf: &Transform) -> Aabb {
        let v1 = xf.multiply(self.vertex1);
        let v2 = xf.multiply(self.vertex2);
        let r = Vec2::new(self.radius(), self.radius());
        Aabb::new(v1.min(v2) - r, v1.max(v2) + r)
    }

    fn distance_proxy(&self, _child_index: usize) -> DistanceProxy<'_> {
        DistanceProxy {
            vertices: Cow::Owned(vec![self.vertex1, self.vertex2]),
            radius: self.radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_covers_both_endpoints() {
        let e = Edge::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let aabb = e.compute_aabb(&Transform::identity());
        assert!(aabb.lower_bound.x <= -1.0);
        assert!(aabb.upper_bound.x >= 1.0);
    }
}
