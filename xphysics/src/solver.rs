//! The velocity/position solver interface a joint is evaluated against
//! (spec.md §6 "SolverData", "TimeStep", "Position", "Velocity"). The
//! teacher's own `dynamic::time_step` module sketched this as a commented-out
//! `SolverData` struct with a `// TODO: joints` marker; this fills that gap
//! with exactly the slice-of-bodies shape a joint needs and nothing more
//! (no island/contact bookkeeping, which stays out of scope).

use xmath::Vec2;

/// Fixed simulation step parameters, threaded through every solver call.
#[derive(Debug, Copy, Clone)]
pub struct TimeStep {
    pub dt: f64,
    pub inv_dt: f64,
    /// Ratio of this step's `dt` to the previous step's, used to rescale a
    /// warm-started impulse when the frame rate changes.
    pub dt_ratio: f64,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    pub warm_starting: bool,
}

impl TimeStep {
    pub fn new(dt: f64, velocity_iterations: usize, position_iterations: usize, warm_starting: bool) -> TimeStep {
        TimeStep {
            dt,
            inv_dt: if dt > 0.0 { 1.0 / dt } else { 0.0 },
            dt_ratio: 1.0,
            velocity_iterations,
            position_iterations,
            warm_starting,
        }
    }
}

/// A body's center-of-mass position and orientation, as tracked by the
/// solver's position buffer (radians, not a [`xmath::Rot`], since the
/// solver integrates angle directly).
#[derive(Debug, Copy, Clone, Default)]
pub struct Position {
    pub c: Vec2,
    pub a: f64,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct Velocity {
    pub v: Vec2,
    pub w: f64,
}

/// What a joint needs to know about one of its bodies: where it sits in the
/// solver's flat position/velocity buffers, its mass and inverse mass
/// (spec.md §6: "Bodies expose islandIndex, invMass, mass" — a
/// constant-volume joint has no use for inverse inertia, since it constrains
/// the ring's enclosed area, not any body's orientation).
#[derive(Debug, Copy, Clone)]
pub struct JointBody {
    pub island_index: usize,
    pub inv_mass: f64,
    pub mass: f64,
}

impl JointBody {
    pub fn new(island_index: usize, mass: f64) -> JointBody {
        JointBody {
            island_index,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            mass,
        }
    }
}

/// The slice-of-bodies view a joint's `init_velocity_constraints` /
/// `solve_velocity_constraints` / `solve_position_constraints` methods are
/// called with, indexed by each [`JointBody::island_index`].
pub struct SolverData<'a> {
    pub step: TimeStep,
    pub positions: &'a mut [Position],
    pub velocities: &'a mut [Velocity],
}
