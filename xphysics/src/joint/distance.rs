//! A rigid point-to-point distance constraint between two bodies, the unit
//! [`crate::joint::ConstantVolumeJoint`] wires into a ring around its body
//! list to keep adjacent bodies a fixed distance apart (spec.md §4.7
//! "owns a ring of distance joints").

use crate::settings::baumgarte;
use crate::solver::{JointBody, SolverData};
use xmath::Vec2;

#[derive(Debug, Copy, Clone)]
pub struct DistanceJoint {
    pub body_a: usize,
    pub body_b: usize,
    pub rest_length: f64,
    impulse: f64,
}

impl DistanceJoint {
    pub fn new(body_a: usize, body_b: usize, rest_length: f64) -> DistanceJoint {
        DistanceJoint {
            body_a,
            body_b,
            rest_length,
            impulse: 0.0,
        }
    }

    fn anchor_direction(&self, bodies: &[JointBody], data: &SolverData<'_>) -> Vec2 {
        let ia = bodies[self.body_a].island_index;
        let ib = bodies[self.body_b].island_index;
        let d = data.positions[ib].c - data.positions[ia].c;
        d.normalize()
    }

    /// `length - rest_length`: positive when the rod is stretched, negative
    /// when compressed. Fed back into the velocity solve as a Baumgarte bias
    /// (spec.md §9's "numerical robustness" note applies here the same way
    /// it does to the constant-volume joint's own position pass) so the
    /// ring's edges don't drift off their rest length with nothing else to
    /// correct them, since this joint has no separate position-solve pass.
    fn length_error(&self, bodies: &[JointBody], data: &SolverData<'_>) -> f64 {
        let ia = bodies[self.body_a].island_index;
        let ib = bodies[self.body_b].island_index;
        let d = data.positions[ib].c - data.positions[ia].c;
        d.length() - self.rest_length
    }

    pub fn init_velocity_constraints(&mut self, bodies: &[JointBody], data: &mut SolverData<'_>) {
        if !data.step.warm_starting {
            self.impulse = 0.0;
            return;
        }

        self.impulse *= data.step.dt_ratio;
        let n = self.anchor_direction(bodies, data);
        let ia = bodies[self.body_a].island_index;
        let ib = bodies[self.body_b].island_index;
        let p = n * self.impulse;
        data.velocities[ia].v -= p * bodies[self.body_a].inv_mass;
        data.velocities[ib].v += p * bodies[self.body_b].inv_mass;
    }

    pub fn solve_velocity_constraints(&mut self, bodies: &[JointBody], data: &mut SolverData<'_>) {
        let ia = bodies[self.body_a].island_index;
        let ib = bodies[self.body_b].island_index;
        let n = self.anchor_direction(bodies, data);

        let inv_mass_sum = bodies[self.body_a].inv_mass + bodies[self.body_b].inv_mass;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let bias = baumgarte() * data.step.inv_dt * self.length_error(bodies, data);
        let cdot = n.dot(data.velocities[ib].v - data.velocities[ia].v) + bias;
        let impulse = -cdot / inv_mass_sum;
        self.impulse += impulse;

        let p = n * impulse;
        data.velocities[ia].v -= p * bodies[self.body_a].inv_mass;
        data.velocities[ib].v += p * bodies[self.body_b].inv_mass;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Position, TimeStep, Velocity};

    #[test]
    fn solving_removes_separating_velocity_along_rod() {
        let bodies = [JointBody::new(0, 1.0), JointBody::new(1, 1.0)];
        let mut positions = [Position { c: Vec2::zero(), a: 0.0 }, Position { c: Vec2::new(1.0, 0.0), a: 0.0 }];
        let mut velocities = [Velocity { v: Vec2::new(-1.0, 0.0), w: 0.0 }, Velocity { v: Vec2::new(1.0, 0.0), w: 0.0 }];
        let mut data = SolverData {
            step: TimeStep::new(1.0 / 60.0, 8, 3, true),
            positions: &mut positions,
            velocities: &mut velocities,
        };

        let mut joint = DistanceJoint::new(0, 1, 1.0);
        joint.solve_velocity_constraints(&bodies, &mut data);

        let rel = data.velocities[1].v - data.velocities[0].v;
        assert!(rel.dot(Vec2::new(1.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn stretched_rod_is_pulled_back_toward_rest_length() {
        let bodies = [JointBody::new(0, 1.0), JointBody::new(1, 1.0)];
        let mut positions = [Position { c: Vec2::zero(), a: 0.0 }, Position { c: Vec2::new(1.5, 0.0), a: 0.0 }];
        let mut velocities = [Velocity::default(), Velocity::default()];
        let mut joint = DistanceJoint::new(0, 1, 1.0);

        for _ in 0..30 {
            let mut data = SolverData {
                step: TimeStep::new(1.0 / 60.0, 8, 3, true),
                positions: &mut positions,
                velocities: &mut velocities,
            };
            joint.solve_velocity_constraints(&bodies, &mut data);
            positions[0].c += velocities[0].v * (1.0 / 60.0);
            positions[1].c += velocities[1].v * (1.0 / 60.0);
        }

        let length = positions[1].c.distance(positions[0].c);
        assert!((length - joint.rest_length).abs() < (1.5 - joint.rest_length).abs());
    }
}
