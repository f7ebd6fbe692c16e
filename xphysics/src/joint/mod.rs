//! Constraint joints solved against the shared [`crate::solver`] interface
//! (spec.md §4.7).

mod constant_volume;
mod distance;

pub use constant_volume::{ConstantVolumeJoint, ConstantVolumeJointError};
pub use distance::DistanceJoint;
