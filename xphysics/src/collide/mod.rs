//! The five narrow-phase collider routines (spec.md §4) plus a
//! shape-kind dispatcher (spec.md §9 "Dispatch over shape type") that picks
//! the right one and flips the result back for the off-diagonal pairs.

mod circle;
mod edge;
mod polygon;

pub use circle::{collide_circles, collide_polygon_and_circle};
pub use edge::{collide_edge_and_circle, collide_edge_and_polygon};
pub use polygon::{collide_polygons, find_max_separation};

use crate::manifold::Manifold;
use crate::shapes::ShapeRef;
use xmath::Transform;

/// Generates the manifold between any two shapes, in whichever order they
/// are given. Three of the nine possible `(kind_a, kind_b)` pairs are coded
/// directly; the mirror-image pairs call the same routine with the shapes
/// swapped and flip the resulting manifold back (`Manifold::flip`), so the
/// edge-vs-polygon and polygon-vs-circle algorithms are each written once.
pub fn collide(shape_a: &ShapeRef<'_>, xf_a: Transform, shape_b: &ShapeRef<'_>, xf_b: Transform) -> Manifold {
    use ShapeRef::*;

    match (shape_a, shape_b) {
        (Circle(a), Circle(b)) => collide_circles(a, xf_a, b, xf_b),
        (Polygon(a), Circle(b)) => collide_polygon_and_circle(a, xf_a, b, xf_b),
        (Circle(a), Polygon(b)) => {
            let mut m = collide_polygon_and_circle(b, xf_b, a, xf_a);
            m.flip();
            m
        }
        (Polygon(a), Polygon(b)) => collide_polygons(a, xf_a, b, xf_b),
        (Edge(a), Circle(b)) => collide_edge_and_circle(a, xf_a, b, xf_b),
        (Circle(a), Edge(b)) => {
            let mut m = collide_edge_and_circle(b, xf_b, a, xf_a);
            m.flip();
            m
        }
        (Edge(a), Polygon(b)) => collide_edge_and_polygon(a, xf_a, b, xf_b),
        (Polygon(a), Edge(b)) => {
            let mut m = collide_edge_and_polygon(b, xf_b, a, xf_a);
            m.flip();
            m
        }
        (Edge(_), Edge(_)) => Manifold::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Polygon};
    use xmath::{Rot, Vec2};

    #[test]
    fn dispatch_is_symmetric_under_flip() {
        let circle = Circle::new(Vec2::zero(), 0.5);
        let poly = Polygon::new_box(1.0, 1.0);
        let xf_b = Transform::new(Vec2::new(1.2, 0.0), Rot::identity());

        let direct = collide(&ShapeRef::Polygon(&poly), Transform::identity(), &ShapeRef::Circle(&circle), xf_b);
        let flipped = collide(&ShapeRef::Circle(&circle), xf_b, &ShapeRef::Polygon(&poly), Transform::identity());

        assert_eq!(direct.point_count(), flipped.point_count());
    }
}
