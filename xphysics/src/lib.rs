//! Narrow-phase contact manifold generation and the constant-volume joint:
//! the collision-detection core of a 2D rigid-body engine, without the
//! body/world/island bookkeeping that would normally drive it.

pub mod clip;
pub mod collide;
pub mod distance;
pub mod joint;
pub mod manifold;
pub mod settings;
pub mod shapes;
pub mod solver;

pub use clip::{clip_segment_to_line, ClipVertex};
pub use collide::collide;
pub use distance::{test_overlap, DistanceInput, DistanceOutput, DistanceProxy, SimpleCache};
pub use manifold::{
    get_point_states, ContactFeatureType, ContactId, Manifold, ManifoldPoint, ManifoldType, PointState, WorldManifold,
};
pub use shapes::{Circle, Edge, Polygon, Shape, ShapeKind, ShapeRef};
pub use solver::{JointBody, Position, SolverData, TimeStep, Velocity};
