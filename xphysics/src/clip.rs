//! Sutherland-Hodgman segment clipping against a single half-plane, used by
//! the polygon and edge colliders to cut the incident edge down to the
//! reference face's extent (spec.md §4.4/§4.6 "clip the incident edge").
//! Ported from the teacher's `collision::{ClipVertex, clip_segment_to_line}`.

use crate::manifold::ContactId;
use xmath::Vec2;

#[derive(Debug, Copy, Clone)]
pub struct ClipVertex {
    pub v: Vec2,
    pub id: ContactId,
}

/// Clips the segment `[v[0], v[1]]` against the half-plane `dot(normal, p) <= offset`,
/// returning the (0, 1 or 2) vertices that survive, with a new feature id
/// assigned to any vertex created by clipping (`vertex_index_a` identifies
/// which reference-face feature the clip introduces).
pub fn clip_segment_to_line(v: [ClipVertex; 2], normal: Vec2, offset: f64, vertex_index_a: u8) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(2);

    let distance0 = normal.dot(v[0].v) - offset;
    let distance1 = normal.dot(v[1].v) - offset;

    if distance0 <= 0.0 {
        out.push(v[0]);
    }
    if distance1 <= 0.0 {
        out.push(v[1]);
    }

    if distance0 * distance1 < 0.0 {
        let interp = distance0 / (distance0 - distance1);
        let point = v[0].v + (v[1].v - v[0].v) * interp;
        let id = ContactId::new(
            vertex_index_a,
            v[0].id.index_b,
            crate::manifold::ContactFeatureType::Vertex,
            crate::manifold::ContactFeatureType::Face,
        );
        out.push(ClipVertex { v: point, id });
    }

    out
}
