use super::{Shape, ShapeKind};
use crate::distance::DistanceProxy;
use crate::settings::linear_slop;
use std::borrow::Cow;
use xmath::{Aabb, Transform, Vec2};

/// A solid circle, in its local frame (spec.md §3 "Circle: center, radius").
#[derive(Debug, Copy, Clone)]
pub struct Circle {
    pub position: Vec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(position: Vec2, radius: f64) -> Circle {
        Circle { position, radius }
    }

    /// A circle of the default skin radius, used by tests that only care
    /// about a round shape's centroid.
    pub fn with_radius(radius: f64) -> Circle {
        Circle::new(Vec2::zero(), radius.max(linear_slop()))
    }
}

impl Shape for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn compute_aabb(&self, xf: &Transform) -> Aabb {
        let center = xf.multiply(self.position);
        let r = Vec2::new(self.radius, self.radius);
        Aabb::new(center - r, center + r)
    }

    fn distance_proxy(&self, _child_index: usize) -> DistanceProxy<'_> {
        DistanceProxy {
            vertices: Cow::Owned(vec![self.position]),
            radius: self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_is_centered_on_transformed_position() {
        let c = Circle::new(Vec2::new(1.0, 2.0), 0.5);
        let aabb = c.compute_aabb(&Transform::identity());
        assert_eq!(aabb.lower_bound, Vec2::new(0.5, 1.5));
        assert_eq!(aabb.upper_bound, Vec2::new(1.5, 2.5));
    }
}
