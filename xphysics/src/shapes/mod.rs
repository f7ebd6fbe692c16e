//! Read-only shape data views (spec.md §3 "Shape data views").
//!
//! These are pure data: the collider routines borrow them and never mutate
//! them. Fixture-level concerns the teacher's `Shape` trait also carried —
//! ray casting, mass computation, point containment — belong to body/fixture
//! bookkeeping, which is out of scope here (spec.md §1), so this trait only
//! exposes what the narrow-phase and the distance oracle actually read.

mod circle;
mod edge;
mod polygon;

pub use circle::Circle;
pub use edge::Edge;
pub use polygon::Polygon;

use crate::distance::DistanceProxy;
use xmath::{Aabb, Transform};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeKind {
    Circle,
    Edge,
    Polygon,
}

pub trait Shape {
    fn kind(&self) -> ShapeKind;

    /// Skin thickness added around the shape's geometric surface.
    fn radius(&self) -> f64;

    fn compute_aabb(&self, xf: &Transform) -> Aabb;

    /// A GJK support proxy (used only by [`crate::distance::test_overlap`]).
    /// `child_index` is reserved for shapes with more than one collision
    /// child (e.g. an edge chain); none of the three shapes here have more
    /// than one, so it is always 0.
    fn distance_proxy(&self, child_index: usize) -> DistanceProxy<'_>;
}

/// Tagged union over the three shape kinds, so pairwise dispatch (spec.md
/// §9 "Dispatch over shape type") can match on a single enum instead of a
/// 3x3 trait-object table.
pub enum ShapeRef<'a> {
    Circle(&'a Circle),
    Edge(&'a Edge),
    Polygon(&'a Polygon),
}

impl<'a> ShapeRef<'a> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRef::Circle(s) => s.kind(),
            ShapeRef::Edge(s) => s.kind(),
            ShapeRef::Polygon(s) => s.kind(),
        }
    }
}
