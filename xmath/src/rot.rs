use crate::Vec2;

/// A 2D rotation stored as (cos, sin) rather than an angle, so composing
/// rotations is a handful of multiplies instead of a trig call.
#[derive(Debug, Copy, Clone)]
pub struct Rot {
    pub s: f64,
    pub c: f64,
}

impl Rot {
    pub fn new(angle: f64) -> Rot {
        Rot {
            s: angle.sin(),
            c: angle.cos(),
        }
    }

    pub fn identity() -> Rot {
        Rot { s: 0.0, c: 1.0 }
    }

    pub fn angle(self) -> f64 {
        self.s.atan2(self.c)
    }

    pub fn x_axis(self) -> Vec2 {
        Vec2::new(self.c, self.s)
    }

    pub fn y_axis(self) -> Vec2 {
        Vec2::new(-self.s, self.c)
    }

    /// Rotates `v` by `self`.
    pub fn multiply(self, v: Vec2) -> Vec2 {
        Vec2::new(self.c * v.x - self.s * v.y, self.s * v.x + self.c * v.y)
    }

    /// Rotates `v` by the inverse of `self`.
    pub fn transpose_multiply(self, v: Vec2) -> Vec2 {
        Vec2::new(self.c * v.x + self.s * v.y, -self.s * v.x + self.c * v.y)
    }

    /// Composes two rotations: `self` applied after `rhs`.
    pub fn multiply_rot(self, rhs: Rot) -> Rot {
        Rot {
            s: self.s * rhs.c + self.c * rhs.s,
            c: self.c * rhs.c - self.s * rhs.s,
        }
    }

    /// The relative rotation from `self` to `rhs`: `self^T * rhs`.
    pub fn transpose_multiply_rot(self, rhs: Rot) -> Rot {
        Rot {
            s: self.c * rhs.s - self.s * rhs.c,
            c: self.c * rhs.c + self.s * rhs.s,
        }
    }
}
