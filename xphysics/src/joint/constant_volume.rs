//! An N-body ring joint that keeps the signed area enclosed by its bodies'
//! positions close to a target volume fixed at construction time (spec.md
//! §4.7 "ConstantVolumeJoint"). Unlike every other unit in this crate this
//! is not a narrow-phase query: it is a constraint solved the way a contact
//! is solved, against the same [`crate::solver::SolverData`] a contact
//! constraint would use.
//!
//! No teacher module implements this (grepping the whole retrieval pack
//! turns up nothing named `constant_volume` anywhere); it is built fresh,
//! in the idiom of the teacher's solver-facing types (`SolverData`,
//! `Position`, `Velocity`), following spec.md §4.8's formulas literally:
//! the velocity constraint is written against the raw (non-unit) vector
//! `d_i = c_{i+1} - c_{i-1}`, not a per-body normal, and the position pass
//! computes its own separate per-edge outward normals.

use crate::joint::distance::DistanceJoint;
use crate::settings::max_linear_correction;
use crate::solver::{JointBody, Position, SolverData};
use std::fmt;
use xmath::Vec2;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConstantVolumeJointError {
    TooFewBodies { count: usize },
    PositionCountMismatch { bodies: usize, positions: usize },
}

impl fmt::Display for ConstantVolumeJointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantVolumeJointError::TooFewBodies { count } => {
                write!(f, "a constant volume joint needs at least 3 bodies, got {count}")
            }
            ConstantVolumeJointError::PositionCountMismatch { bodies, positions } => {
                write!(f, "{bodies} bodies but {positions} initial positions")
            }
        }
    }
}

impl std::error::Error for ConstantVolumeJointError {}

fn shoelace_area(positions: &[Vec2]) -> f64 {
    let n = positions.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += positions[i].cross(positions[j]);
    }
    0.5 * area
}

pub struct ConstantVolumeJoint {
    bodies: Vec<JointBody>,
    joints: Vec<DistanceJoint>,
    target_lengths: Vec<f64>,
    target_volume: f64,
    normals: Vec<Vec2>,
    impulse: f64,
}

impl ConstantVolumeJoint {
    /// Builds the ring: a [`DistanceJoint`] between every consecutive pair
    /// of bodies (wrapping around), with its target area fixed to whatever
    /// `initial_positions` encloses.
    pub fn new(bodies: Vec<JointBody>, initial_positions: &[Vec2]) -> Result<ConstantVolumeJoint, ConstantVolumeJointError> {
        let count = bodies.len();
        if count < 3 {
            return Err(ConstantVolumeJointError::TooFewBodies { count });
        }
        if initial_positions.len() != count {
            return Err(ConstantVolumeJointError::PositionCountMismatch {
                bodies: count,
                positions: initial_positions.len(),
            });
        }

        let mut target_lengths = Vec::with_capacity(count);
        let mut joints = Vec::with_capacity(count);
        for i in 0..count {
            let j = (i + 1) % count;
            let rest_length = initial_positions[i].distance(initial_positions[j]);
            target_lengths.push(rest_length);
            joints.push(DistanceJoint::new(i, j, rest_length));
        }

        let target_volume = shoelace_area(initial_positions);

        Ok(ConstantVolumeJoint {
            bodies,
            joints,
            target_lengths,
            target_volume,
            normals: vec![Vec2::zero(); count],
            impulse: 0.0,
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn target_volume(&self) -> f64 {
        self.target_volume
    }

    /// Rest length of edge `(i, i+1 mod n)`, fixed at construction time.
    pub fn target_lengths(&self) -> &[f64] {
        &self.target_lengths
    }

    /// Rescales the target volume by `factor`, e.g. to simulate inflating
    /// or deflating a soft-body envelope over time.
    pub fn inflate(&mut self, factor: f64) {
        self.target_volume *= factor;
    }

    /// `d_i = c_{i+1} - c_{i-1}` (spec.md §4.8), the per-body vector the
    /// velocity constraint is written against — not a unit normal.
    fn d(&self, positions: &[Position], i: usize) -> Vec2 {
        let count = self.bodies.len();
        let prev = if i == 0 { count - 1 } else { i - 1 };
        let next = if i == count - 1 { 0 } else { i + 1 };
        let ia_prev = self.bodies[prev].island_index;
        let ia_next = self.bodies[next].island_index;
        positions[ia_next].c - positions[ia_prev].c
    }

    pub fn init_velocity_constraints(&mut self, data: &mut SolverData<'_>) {
        if data.step.warm_starting {
            self.impulse *= data.step.dt_ratio;
            for i in 0..self.bodies.len() {
                let d = self.d(data.positions, i);
                let idx = self.bodies[i].island_index;
                let delta = Vec2::new(d.y, -d.x) * (self.bodies[i].inv_mass * 0.5 * self.impulse);
                data.velocities[idx].v += delta;
            }
        } else {
            self.impulse = 0.0;
        }

        for joint in &mut self.joints {
            joint.init_velocity_constraints(&self.bodies, data);
        }
    }

    /// A single Gauss-Seidel pass: one scalar impulse shared by every body,
    /// sized so the ring's rate of change of enclosed area (`crossMassSum`,
    /// spec.md §4.8) is driven to zero, plus one velocity solve per ring
    /// edge to keep edge lengths from drifting independently of area.
    pub fn solve_velocity_constraints(&mut self, data: &mut SolverData<'_>) {
        let count = self.bodies.len();
        let mut dot_mass_sum = 0.0;
        let mut cross_mass_sum = 0.0;
        for i in 0..count {
            let idx = self.bodies[i].island_index;
            let d = self.d(data.positions, i);
            dot_mass_sum += d.length_squared() / self.bodies[i].mass;
            cross_mass_sum += data.velocities[idx].v.cross(d);
        }

        if dot_mass_sum > 0.0 {
            let lambda = -2.0 * cross_mass_sum / dot_mass_sum;
            self.impulse += lambda;
            for i in 0..count {
                let d = self.d(data.positions, i);
                let idx = self.bodies[i].island_index;
                data.velocities[idx].v += Vec2::new(d.y, -d.x) * (self.bodies[i].inv_mass * 0.5 * lambda);
            }
        }

        for joint in &mut self.joints {
            joint.solve_velocity_constraints(&self.bodies, data);
        }
    }

    /// Extrudes every body outward (or inward) along the average of its two
    /// adjacent edges' outward normals to push the enclosed area back
    /// toward the target, each displacement clamped to
    /// [`max_linear_correction`]. Returns whether every displacement was
    /// already within `linear_slop` (spec.md §4.8).
    pub fn solve_position_constraints(&mut self, data: &mut SolverData<'_>) -> bool {
        let count = self.bodies.len();

        let mut current_positions = Vec::with_capacity(count);
        for i in 0..count {
            let idx = self.bodies[i].island_index;
            current_positions.push(data.positions[idx].c);
        }

        let mut perimeter = 0.0;
        for i in 0..count {
            let j = (i + 1) % count;
            let e = current_positions[j] - current_positions[i];
            let mut dist = e.length();
            if dist < f64::EPSILON {
                dist = 1.0;
            }
            self.normals[i] = Vec2::new(e.y / dist, -e.x / dist);
            perimeter += dist;
        }

        let area = shoelace_area(&current_positions);
        let delta_area = self.target_volume - area;
        let to_extrude = 0.5 * delta_area / perimeter;

        let mut done = true;
        for i in 0..count {
            let j = (i + 1) % count;
            let mut delta = (self.normals[i] + self.normals[j]) * to_extrude;
            let norm = delta.length();
            if norm > max_linear_correction() {
                delta *= max_linear_correction() / norm;
            }
            if norm > crate::settings::linear_slop() {
                done = false;
            }
            let idx = self.bodies[j].island_index;
            data.positions[idx].c += delta;
        }

        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{TimeStep, Velocity};

    fn triangle_bodies() -> (Vec<JointBody>, Vec<Vec2>) {
        let bodies = vec![JointBody::new(0, 1.0), JointBody::new(1, 1.0), JointBody::new(2, 1.0)];
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(1.0, 2.0)];
        (bodies, positions)
    }

    #[test]
    fn rejects_fewer_than_three_bodies() {
        let bodies = vec![JointBody::new(0, 1.0), JointBody::new(1, 1.0)];
        let positions = vec![Vec2::zero(), Vec2::new(1.0, 0.0)];
        let err = ConstantVolumeJoint::new(bodies, &positions).unwrap_err();
        assert_eq!(err, ConstantVolumeJointError::TooFewBodies { count: 2 });
    }

    #[test]
    fn rejects_mismatched_position_count() {
        let (bodies, positions) = triangle_bodies();
        let err = ConstantVolumeJoint::new(bodies, &positions[..2]).unwrap_err();
        assert_eq!(
            err,
            ConstantVolumeJointError::PositionCountMismatch {
                bodies: 3,
                positions: 2
            }
        );
    }

    #[test]
    fn target_volume_matches_shoelace_area_of_triangle() {
        let (bodies, positions) = triangle_bodies();
        let joint = ConstantVolumeJoint::new(bodies, &positions).unwrap();
        // base 2, height 2 => area 2
        assert!((joint.target_volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn target_lengths_match_initial_edge_distances() {
        let (bodies, positions) = triangle_bodies();
        let joint = ConstantVolumeJoint::new(bodies, &positions).unwrap();
        assert_eq!(joint.target_lengths().len(), 3);
        assert!((joint.target_lengths()[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn equilateral_triangle_displaced_body_converges_back_to_target_area() {
        // Equilateral triangle, side 2, one body nudged 0.1 outward along its
        // own radius (spec.md §8's literal scenario).
        let side = 2.0_f64;
        let center = Vec2::new(side / 2.0, side * 3.0_f64.sqrt() / 6.0);
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(side, 0.0),
            Vec2::new(side / 2.0, side * 3.0_f64.sqrt() / 2.0),
        ];
        let bodies = vec![JointBody::new(0, 1.0), JointBody::new(1, 1.0), JointBody::new(2, 1.0)];
        let mut joint = ConstantVolumeJoint::new(bodies, &positions).unwrap();

        let mut displaced = positions.clone();
        let outward = (displaced[2] - center).normalize();
        displaced[2] += outward * 0.1;

        let mut solver_positions: Vec<Position> = displaced.iter().map(|&p| Position { c: p, a: 0.0 }).collect();
        let mut velocities = vec![Velocity::default(); 3];

        for _ in 0..200 {
            let mut data = SolverData {
                step: TimeStep::new(1.0 / 60.0, 8, 3, true),
                positions: &mut solver_positions,
                velocities: &mut velocities,
            };
            if joint.solve_position_constraints(&mut data) {
                break;
            }
        }

        let final_positions: Vec<Vec2> = solver_positions.iter().map(|p| p.c).collect();
        let perimeter: f64 = (0..3).map(|i| final_positions[i].distance(final_positions[(i + 1) % 3])).sum();
        let final_area = shoelace_area(&final_positions);
        assert!((final_area - joint.target_volume()).abs() <= crate::settings::linear_slop() * perimeter);
    }

    #[test]
    fn position_solve_converges_toward_target_area() {
        let (bodies, positions) = triangle_bodies();
        let mut joint = ConstantVolumeJoint::new(bodies.clone(), &positions).unwrap();

        // Shrink the triangle uniformly so its area drops, then check the
        // position pass pushes the area back up over a few iterations.
        let mut solver_positions: Vec<Position> = positions
            .iter()
            .map(|&p| Position { c: p * 0.5, a: 0.0 })
            .collect();
        let mut velocities = vec![Velocity::default(); 3];

        let shrunk_area = shoelace_area(&solver_positions.iter().map(|p| p.c).collect::<Vec<_>>());
        assert!(shrunk_area < joint.target_volume());

        for _ in 0..50 {
            let mut data = SolverData {
                step: TimeStep::new(1.0 / 60.0, 8, 3, true),
                positions: &mut solver_positions,
                velocities: &mut velocities,
            };
            joint.solve_position_constraints(&mut data);
        }

        let final_area = shoelace_area(&solver_positions.iter().map(|p| p.c).collect::<Vec<_>>());
        assert!((final_area - joint.target_volume()).abs() < (shrunk_area - joint.target_volume()).abs());
    }

    #[test]
    fn velocity_solve_drives_area_rate_toward_zero() {
        let (bodies, positions) = triangle_bodies();
        let mut joint = ConstantVolumeJoint::new(bodies, &positions).unwrap();

        let mut solver_positions: Vec<Position> = positions.iter().map(|&p| Position { c: p, a: 0.0 }).collect();
        // Every body moving outward at once is expanding the enclosed area.
        let mut velocities = vec![
            Velocity { v: Vec2::new(-1.0, -1.0), w: 0.0 },
            Velocity { v: Vec2::new(1.0, -1.0), w: 0.0 },
            Velocity { v: Vec2::new(0.0, 1.0), w: 0.0 },
        ];

        let mut data = SolverData {
            step: TimeStep::new(1.0 / 60.0, 8, 3, true),
            positions: &mut solver_positions,
            velocities: &mut velocities,
        };

        // The constraint's rate term is `sum(cross(v_i, d_i))` (spec.md
        // §4.8's `crossMassSum`), not a dot with a stored normal — there is
        // no per-body normal until a position solve computes one.
        let area_rate = |data: &SolverData<'_>| -> f64 {
            (0..3).map(|i| data.velocities[i].v.cross(joint.d(data.positions, i))).sum()
        };

        joint.init_velocity_constraints(&mut data);
        let c_dot_before = area_rate(&data);
        joint.solve_velocity_constraints(&mut data);
        let c_dot_after = area_rate(&data);

        assert!(c_dot_after.abs() < c_dot_before.abs());
    }
}
