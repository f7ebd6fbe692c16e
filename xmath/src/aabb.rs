use crate::Vec2;

/// An axis-aligned bounding box. Used by the narrow-phase's callers for
/// broad-phase pruning; kept here only so the narrow-phase can express
/// "shapes whose AABBs are far apart never get a manifold" in tests.
#[derive(Debug, Copy, Clone)]
pub struct Aabb {
    pub lower_bound: Vec2,
    pub upper_bound: Vec2,
}

impl Aabb {
    pub fn new(lower_bound: Vec2, upper_bound: Vec2) -> Aabb {
        Aabb {
            lower_bound,
            upper_bound,
        }
    }

    pub fn extend(self, margin: f64) -> Aabb {
        let r = Vec2::new(margin, margin);
        Aabb {
            lower_bound: self.lower_bound - r,
            upper_bound: self.upper_bound + r,
        }
    }

    pub fn overlaps(self, other: Aabb) -> bool {
        self.lower_bound.x <= other.upper_bound.x
            && other.lower_bound.x <= self.upper_bound.x
            && self.lower_bound.y <= other.upper_bound.y
            && other.lower_bound.y <= self.upper_bound.y
    }
}
