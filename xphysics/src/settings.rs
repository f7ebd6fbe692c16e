//! Tuning constants. This is the crate's configuration surface: free
//! functions rather than a config file, matching how the rest of the
//! narrow-phase is written (no runtime-loaded config here — these are
//! compile-time physical tolerances, not deployment parameters).

/// Maximum number of contact points in a manifold.
pub const MAX_MANIFOLD_POINTS: usize = 2;

/// Maximum number of vertices in a convex polygon.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// A small length used as a collision and constraint tolerance. Points
/// closer than this are considered touching.
#[inline]
pub fn linear_slop() -> f64 {
    0.005
}

/// A small angle used as a collision tolerance, mostly to prevent vertices
/// from snapping onto faces at concave joints.
#[inline]
pub fn angular_slop() -> f64 {
    2.0_f64.to_radians()
}

/// The skin thickness every polygon and edge shape carries, so resting
/// contacts generate stable manifolds instead of flickering at exactly
/// zero separation.
#[inline]
pub fn polygon_radius() -> f64 {
    2.0 * linear_slop()
}

/// Maximum amount a position correction may move a body in a single solver
/// iteration, to avoid overshoot on deeply overlapping shapes.
#[inline]
pub fn max_linear_correction() -> f64 {
    0.2
}

/// Hysteresis bias (spec §4.4, §4.6): in polygon-vs-polygon and
/// edge-vs-polygon SAT, the reference face only changes when a candidate
/// separation beats the incumbent by more than this, which keeps the
/// reference face from flip-flopping between two nearly tied axes.
#[inline]
pub fn k_tol() -> f64 {
    0.1 * linear_slop()
}

/// Relative hysteresis factor used by the EPCollider's edge-axis vs.
/// polygon-axis selection (spec §4.6).
#[inline]
pub fn k_relative_tol() -> f64 {
    0.98
}

/// Absolute hysteresis offset paired with [`k_relative_tol`].
#[inline]
pub fn k_absolute_tol() -> f64 {
    0.001
}

/// Baumgarte stabilization factor: the fraction of a constraint's position
/// error fed back into the velocity solve as bias each step, so an
/// equality constraint (e.g. [`crate::joint::DistanceJoint`]'s rest length)
/// is restored gradually instead of drifting uncorrected.
#[inline]
pub fn baumgarte() -> f64 {
    0.2
}
