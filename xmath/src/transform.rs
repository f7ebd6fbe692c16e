use crate::{Rot, Vec2};

/// A rigid transform: applying it to a vector is `q * v + p`.
#[derive(Debug, Copy, Clone)]
pub struct Transform {
    pub p: Vec2,
    pub q: Rot,
}

impl Transform {
    pub fn new(p: Vec2, q: Rot) -> Transform {
        Transform { p, q }
    }

    pub fn identity() -> Transform {
        Transform {
            p: Vec2::zero(),
            q: Rot::identity(),
        }
    }

    pub fn multiply(self, v: Vec2) -> Vec2 {
        self.q.multiply(v) + self.p
    }

    pub fn transpose_multiply(self, v: Vec2) -> Vec2 {
        self.q.transpose_multiply(v - self.p)
    }

    /// Composes two transforms: `self` applied after `rhs`.
    pub fn multiply_transform(self, rhs: Transform) -> Transform {
        Transform {
            p: self.q.multiply(rhs.p) + self.p,
            q: self.q.multiply_rot(rhs.q),
        }
    }

    /// The relative transform from `self` to `rhs`.
    pub fn transpose_multiply_transform(self, rhs: Transform) -> Transform {
        Transform {
            p: self.q.transpose_multiply(rhs.p - self.p),
            q: self.q.transpose_multiply_rot(rhs.q),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn roundtrip() {
        let xf = Transform::new(Vec2::new(1.0, -2.0), Rot::new(0.4));
        let v = Vec2::new(5.0, 6.0);
        let back = xf.transpose_multiply(xf.multiply(v));
        assert_relative_eq!(back.x, v.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-9);
    }

    #[test]
    fn relative_transform_matches_chaining() {
        let a = Transform::new(Vec2::new(1.0, 0.0), Rot::new(0.2));
        let b = Transform::new(Vec2::new(-2.0, 3.0), Rot::new(1.1));
        let rel = a.transpose_multiply_transform(b);
        let v = Vec2::new(0.3, -0.7);
        let via_rel = a.multiply(rel.multiply(v));
        let direct = b.multiply(v);
        assert_relative_eq!(via_rel.x, direct.x, epsilon = 1e-9);
        assert_relative_eq!(via_rel.y, direct.y, epsilon = 1e-9);
    }
}
