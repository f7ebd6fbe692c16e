//! Contact manifold types (spec.md §3 "ContactID", "Manifold",
//! "WorldManifold", "PointState") and the point-state diff between two
//! manifolds across a frame. Ported from the teacher's
//! `collision::{ContactId, Manifold, WorldManifold, PointState}`.

use xmath::{Transform, Vec2};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContactFeatureType {
    Vertex,
    Face,
}

impl Default for ContactFeatureType {
    fn default() -> Self {
        ContactFeatureType::Vertex
    }
}

/// The four indices/types that identify which vertex/face pair produced a
/// contact point, used to carry a warm-start impulse from one frame's
/// manifold to the next even though the manifold itself is rebuilt from
/// scratch every frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ContactId {
    pub index_a: u8,
    pub index_b: u8,
    pub type_a: ContactFeatureType,
    pub type_b: ContactFeatureType,
}

impl ContactId {
    pub fn new(index_a: u8, index_b: u8, type_a: ContactFeatureType, type_b: ContactFeatureType) -> ContactId {
        ContactId {
            index_a,
            index_b,
            type_a,
            type_b,
        }
    }

    /// Swaps the A/B roles, used when a collider is evaluated with its two
    /// shapes reversed and the caller expects the original order back.
    pub fn flip(self) -> ContactId {
        ContactId {
            index_a: self.index_b,
            index_b: self.index_a,
            type_a: self.type_b,
            type_b: self.type_a,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ManifoldPoint {
    /// Local point, in the frame documented by the owning [`Manifold`]'s
    /// `manifold_type` (incident shape's frame, not a fixed world frame).
    pub local_point: Vec2,
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
    pub id: ContactId,
}

impl Default for ManifoldPoint {
    fn default() -> Self {
        ManifoldPoint {
            local_point: Vec2::zero(),
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            id: ContactId::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ManifoldType {
    Circles,
    FaceA,
    FaceB,
}

#[derive(Debug, Clone)]
pub struct Manifold {
    pub manifold_type: ManifoldType,
    /// Meaning depends on `manifold_type`: circle center (Circles), or the
    /// reference face's anchor vertex (FaceA/FaceB), both in shape-A's
    /// local frame.
    pub local_point: Vec2,
    /// Reference face normal, in shape-A's local frame for FaceA/FaceB;
    /// unused (zero) for Circles.
    pub local_normal: Vec2,
    pub points: Vec<ManifoldPoint>,
}

impl Manifold {
    pub fn empty() -> Manifold {
        Manifold {
            manifold_type: ManifoldType::Circles,
            local_point: Vec2::zero(),
            local_normal: Vec2::zero(),
            points: Vec::new(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Swaps the manifold's A/B roles: FaceA becomes FaceB and vice versa,
    /// each point's feature indices are swapped, and Circles manifolds
    /// swap their local point with the (single) contact point's local
    /// point. Lets the off-diagonal shape pairs in the collider dispatch
    /// (spec.md §9) run the single coded routine for a pair and flip the
    /// result back, instead of coding both orders.
    pub fn flip(&mut self) {
        match self.manifold_type {
            ManifoldType::Circles => {
                if let Some(p) = self.points.first_mut() {
                    std::mem::swap(&mut self.local_point, &mut p.local_point);
                }
            }
            ManifoldType::FaceA => self.manifold_type = ManifoldType::FaceB,
            ManifoldType::FaceB => self.manifold_type = ManifoldType::FaceA,
        }
        for p in &mut self.points {
            p.id = p.id.flip();
        }
    }
}

/// World-space reconstruction of a manifold: a single shared normal, the
/// world position of each contact point (mid-way between the two shape
/// surfaces), and each point's separation (negative when penetrating)
/// (spec.md §3 "WorldManifold").
#[derive(Debug, Clone)]
pub struct WorldManifold {
    pub normal: Vec2,
    pub points: Vec<Vec2>,
    pub separations: Vec<f64>,
}

impl WorldManifold {
    pub fn new(manifold: &Manifold, xf_a: Transform, radius_a: f64, xf_b: Transform, radius_b: f64) -> WorldManifold {
        if manifold.points.is_empty() {
            return WorldManifold {
                normal: Vec2::new(1.0, 0.0),
                points: Vec::new(),
                separations: Vec::new(),
            };
        }

        let mut points = Vec::with_capacity(manifold.points.len());
        let mut separations = Vec::with_capacity(manifold.points.len());

        let normal = match manifold.manifold_type {
            ManifoldType::Circles => {
                let point_a = xf_a.multiply(manifold.local_point);
                let point_b = xf_b.multiply(manifold.points[0].local_point);
                let normal = if point_a.distance_squared(point_b) > f64::EPSILON * f64::EPSILON {
                    (point_b - point_a).normalize()
                } else {
                    Vec2::new(1.0, 0.0)
                };
                let c_a = point_a + normal * radius_a;
                let c_b = point_b - normal * radius_b;
                points.push((c_a + c_b) * 0.5);
                separations.push((c_b - c_a).dot(normal));
                normal
            }
            ManifoldType::FaceA => {
                let normal = xf_a.q.multiply(manifold.local_normal);
                let plane_point = xf_a.multiply(manifold.local_point);
                for p in &manifold.points {
                    let clip_point = xf_b.multiply(p.local_point);
                    let c_a = clip_point + normal * (radius_a - (clip_point - plane_point).dot(normal));
                    let c_b = clip_point - normal * radius_b;
                    points.push((c_a + c_b) * 0.5);
                    separations.push((c_b - c_a).dot(normal));
                }
                normal
            }
            ManifoldType::FaceB => {
                let normal = xf_b.q.multiply(manifold.local_normal);
                let plane_point = xf_b.multiply(manifold.local_point);
                for p in &manifold.points {
                    let clip_point = xf_a.multiply(p.local_point);
                    let c_b = clip_point + normal * (radius_b - (clip_point - plane_point).dot(normal));
                    let c_a = clip_point - normal * radius_a;
                    points.push((c_a + c_b) * 0.5);
                    separations.push((c_a - c_b).dot(normal));
                }
                // the manifold's own normal points from B into A; the world
                // convention here always points from A to B.
                -normal
            }
        };

        WorldManifold {
            normal,
            points,
            separations,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointState {
    Null,
    Add,
    Persist,
    Remove,
}

/// Diffs two manifolds by contact feature ID (spec.md §3 "point-state
/// diffing"): a point present only in `manifold2` is `Add`, present in
/// both is `Persist`, present only in `manifold1` is `Remove`.
pub fn get_point_states(manifold1: &Manifold, manifold2: &Manifold) -> (Vec<PointState>, Vec<PointState>) {
    let mut state1 = vec![PointState::Null; manifold1.points.len()];
    let mut state2 = vec![PointState::Null; manifold2.points.len()];

    for (i, p1) in manifold1.points.iter().enumerate() {
        state1[i] = PointState::Remove;
        for p2 in &manifold2.points {
            if p2.id == p1.id {
                state1[i] = PointState::Persist;
                break;
            }
        }
    }

    for (j, p2) in manifold2.points.iter().enumerate() {
        state2[j] = PointState::Add;
        for p1 in &manifold1.points {
            if p1.id == p2.id {
                state2[j] = PointState::Persist;
                break;
            }
        }
    }

    (state1, state2)
}
