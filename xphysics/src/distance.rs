//! GJK distance query, kept only as the overlap oracle behind
//! [`test_overlap`] (spec.md §1: "Distance/GJK — used only as a yes/no
//! overlap oracle via a small input/output pair"; spec.md §6 lists
//! `test_overlap` itself as a narrow-phase entry point). Ported from the
//! teacher's `collision::distance` module.

use crate::shapes::{Shape, ShapeRef};
use std::borrow::Cow;
use xmath::{Transform, Vec2};

pub struct DistanceProxy<'a> {
    pub vertices: Cow<'a, [Vec2]>,
    pub radius: f64,
}

impl<'a> DistanceProxy<'a> {
    pub fn support(&self, d: Vec2) -> usize {
        let mut best_index = 0;
        let mut best_value = self.vertices[0].dot(d);
        for (i, v) in self.vertices.iter().enumerate().skip(1) {
            let value = v.dot(d);
            if value > best_value {
                best_index = i;
                best_value = value;
            }
        }
        best_index
    }
}

#[derive(Default, Clone)]
pub struct SimpleCache {
    pub metric: f64,
    pub count: usize,
    pub index_a: [usize; 3],
    pub index_b: [usize; 3],
}

pub struct DistanceInput<'a> {
    pub proxy_a: &'a DistanceProxy<'a>,
    pub proxy_b: &'a DistanceProxy<'a>,
    pub transform_a: Transform,
    pub transform_b: Transform,
    pub use_radii: bool,
}

pub struct DistanceOutput {
    pub point_a: Vec2,
    pub point_b: Vec2,
    pub distance: f64,
    pub iterations: usize,
}

#[derive(Clone, Copy, Default)]
struct SimplexVertex {
    wa: Vec2,
    wb: Vec2,
    w: Vec2,
    a: f64,
    index_a: usize,
    index_b: usize,
}

#[derive(Default)]
struct Simplex {
    vertices: [SimplexVertex; 3],
    count: usize,
}

impl Simplex {
    fn read_cache(
        &mut self,
        cache: &SimpleCache,
        proxy_a: &DistanceProxy<'_>,
        transform_a: &Transform,
        proxy_b: &DistanceProxy<'_>,
        transform_b: &Transform,
    ) {
        debug_assert!(cache.count <= 3);
        self.count = cache.count;

        for i in 0..self.count {
            let v = &mut self.vertices[i];
            v.index_a = cache.index_a[i];
            v.index_b = cache.index_b[i];
            let wa_local = proxy_a.vertices[v.index_a];
            let wb_local = proxy_b.vertices[v.index_b];
            v.wa = transform_a.multiply(wa_local);
            v.wb = transform_b.multiply(wb_local);
            v.w = v.wb - v.wa;
            v.a = 0.0;
        }

        if self.count > 1 {
            let metric1 = cache.metric;
            let metric2 = self.metric();
            if metric2 < 0.5 * metric1 || 2.0 * metric1 < metric2 || metric2 < f64::EPSILON {
                self.count = 0;
            }
        }

        if self.count == 0 {
            let v = &mut self.vertices[0];
            v.index_a = 0;
            v.index_b = 0;
            v.wa = transform_a.multiply(proxy_a.vertices[0]);
            v.wb = transform_b.multiply(proxy_b.vertices[0]);
            v.w = v.wb - v.wa;
            v.a = 0.0;
            self.count = 1;
        }
    }

    fn write_cache(&self, cache: &mut SimpleCache) {
        cache.metric = self.metric();
        cache.count = self.count;
        for i in 0..self.count {
            cache.index_a[i] = self.vertices[i].index_a;
            cache.index_b[i] = self.vertices[i].index_b;
        }
    }

    fn search_direction(&self) -> Vec2 {
        match self.count {
            1 => -self.vertices[0].w,
            2 => {
                let e12 = self.vertices[1].w - self.vertices[0].w;
                let sgn = e12.cross(-self.vertices[0].w);
                if sgn > 0.0 {
                    e12.skew()
                } else {
                    -e12.skew()
                }
            }
            _ => unreachable!("simplex only ever searches with 1 or 2 vertices"),
        }
    }

    fn witness_points(&self) -> (Vec2, Vec2) {
        match self.count {
            1 => (self.vertices[0].wa, self.vertices[0].wb),
            2 => {
                let v0 = &self.vertices[0];
                let v1 = &self.vertices[1];
                (v0.wa * v0.a + v1.wa * v1.a, v0.wb * v0.a + v1.wb * v1.a)
            }
            3 => {
                let pa = self.vertices[0].wa * self.vertices[0].a
                    + self.vertices[1].wa * self.vertices[1].a
                    + self.vertices[2].wa * self.vertices[2].a;
                (pa, pa)
            }
            _ => unreachable!(),
        }
    }

    fn metric(&self) -> f64 {
        match self.count {
            1 => 0.0,
            2 => self.vertices[0].w.distance(self.vertices[1].w),
            3 => (self.vertices[1].w - self.vertices[0].w).cross(self.vertices[2].w - self.vertices[0].w),
            _ => unreachable!(),
        }
    }

    fn solve2(&mut self) {
        let w1 = self.vertices[0].w;
        let w2 = self.vertices[1].w;
        let e12 = w2 - w1;

        let d12_2 = -w1.dot(e12);
        if d12_2 <= 0.0 {
            self.vertices[0].a = 1.0;
            self.count = 1;
            return;
        }

        let d12_1 = w2.dot(e12);
        if d12_1 <= 0.0 {
            self.vertices[1].a = 1.0;
            self.count = 1;
            self.vertices[0] = self.vertices[1];
            return;
        }

        let inv_d12 = 1.0 / (d12_1 + d12_2);
        self.vertices[0].a = d12_1 * inv_d12;
        self.vertices[1].a = d12_2 * inv_d12;
        self.count = 2;
    }

    fn solve3(&mut self) {
        let w1 = self.vertices[0].w;
        let w2 = self.vertices[1].w;
        let w3 = self.vertices[2].w;

        let e12 = w2 - w1;
        let w1e12 = w1.dot(e12);
        let w2e12 = w2.dot(e12);
        let d12_1 = w2e12;
        let d12_2 = -w1e12;

        let e13 = w3 - w1;
        let w1e13 = w1.dot(e13);
        let w3e13 = w3.dot(e13);
        let d13_1 = w3e13;
        let d13_2 = -w1e13;

        let e23 = w3 - w2;
        let w2e23 = w2.dot(e23);
        let w3e23 = w3.dot(e23);
        let d23_1 = w3e23;
        let d23_2 = -w2e23;

        let n123 = e12.cross(e13);

        let d123_1 = n123 * w2.cross(w3);
        let d123_2 = n123 * w3.cross(w1);
        let d123_3 = n123 * w1.cross(w2);

        if d12_2 <= 0.0 && d13_2 <= 0.0 {
            self.vertices[0].a = 1.0;
            self.count = 1;
            return;
        }

        if d12_1 > 0.0 && d12_2 > 0.0 && d123_3 <= 0.0 {
            let inv_d12 = 1.0 / (d12_1 + d12_2);
            self.vertices[0].a = d12_1 * inv_d12;
            self.vertices[1].a = d12_2 * inv_d12;
            self.count = 2;
            return;
        }

        if d13_1 > 0.0 && d13_2 > 0.0 && d123_2 <= 0.0 {
            let inv_d13 = 1.0 / (d13_1 + d13_2);
            self.vertices[0].a = d13_1 * inv_d13;
            self.vertices[2].a = d13_2 * inv_d13;
            self.count = 2;
            self.vertices[1] = self.vertices[2];
            return;
        }

        if d12_1 <= 0.0 && d23_2 <= 0.0 {
            self.vertices[1].a = 1.0;
            self.count = 1;
            self.vertices[0] = self.vertices[1];
            return;
        }

        if d13_1 <= 0.0 && d23_1 <= 0.0 {
            self.vertices[2].a = 1.0;
            self.count = 1;
            self.vertices[0] = self.vertices[2];
            return;
        }

        if d23_1 > 0.0 && d23_2 > 0.0 && d123_1 <= 0.0 {
            let inv_d23 = 1.0 / (d23_1 + d23_2);
            self.vertices[1].a = d23_1 * inv_d23;
            self.vertices[2].a = d23_2 * inv_d23;
            self.count = 2;
            self.vertices[0] = self.vertices[2];
            return;
        }

        let inv_d123 = 1.0 / (d123_1 + d123_2 + d123_3);
        self.vertices[0].a = d123_1 * inv_d123;
        self.vertices[1].a = d123_2 * inv_d123;
        self.vertices[2].a = d123_3 * inv_d123;
        self.count = 3;
    }
}

const MAX_ITERS: usize = 20;

pub fn distance(input: &DistanceInput<'_>, cache: &mut SimpleCache) -> DistanceOutput {
    let proxy_a = input.proxy_a;
    let proxy_b = input.proxy_b;
    let transform_a = input.transform_a;
    let transform_b = input.transform_b;

    let mut simplex = Simplex::default();
    simplex.read_cache(cache, proxy_a, &transform_a, proxy_b, &transform_b);

    let mut save_a = [0usize; 3];
    let mut save_b = [0usize; 3];
    let mut iter = 0;

    while iter < MAX_ITERS {
        let save_count = simplex.count;
        for i in 0..save_count {
            save_a[i] = simplex.vertices[i].index_a;
            save_b[i] = simplex.vertices[i].index_b;
        }

        match simplex.count {
            1 => break,
            2 => simplex.solve2(),
            3 => simplex.solve3(),
            _ => unreachable!(),
        }

        if simplex.count == 3 {
            break;
        }

        let d = simplex.search_direction();
        if d.length_squared() < f64::EPSILON * f64::EPSILON {
            break;
        }

        let index_a = proxy_a.support(transform_a.q.transpose_multiply(-d));
        let index_b = proxy_b.support(transform_b.q.transpose_multiply(d));

        iter += 1;

        let mut duplicate = false;
        for i in 0..save_count {
            if index_a == save_a[i] && index_b == save_b[i] {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            break;
        }

        let next = simplex.count;
        simplex.vertices[next] = SimplexVertex {
            index_a,
            index_b,
            wa: transform_a.multiply(proxy_a.vertices[index_a]),
            wb: transform_b.multiply(proxy_b.vertices[index_b]),
            w: Vec2::zero(),
            a: 0.0,
        };
        simplex.vertices[next].w = simplex.vertices[next].wb - simplex.vertices[next].wa;
        simplex.count += 1;
    }

    let (mut point_a, mut point_b) = simplex.witness_points();
    let mut dist = point_a.distance(point_b);
    let iterations = iter;

    simplex.write_cache(cache);

    if input.use_radii {
        let ra = proxy_a.radius;
        let rb = proxy_b.radius;

        if dist > ra + rb && dist > f64::EPSILON {
            dist -= ra + rb;
            let normal = (point_b - point_a).normalize();
            point_a += normal * ra;
            point_b -= normal * rb;
        } else {
            let p = (point_a + point_b) * 0.5;
            point_a = p;
            point_b = p;
            dist = 0.0;
        }
    }

    DistanceOutput {
        point_a,
        point_b,
        distance: dist,
        iterations,
    }
}

fn proxy_of<'a>(shape: &'a ShapeRef<'a>, child_index: usize) -> DistanceProxy<'a> {
    match shape {
        ShapeRef::Circle(s) => s.distance_proxy(child_index),
        ShapeRef::Edge(s) => s.distance_proxy(child_index),
        ShapeRef::Polygon(s) => s.distance_proxy(child_index),
    }
}

/// spec.md §6: `test_overlap(shapeA, idxA, shapeB, idxB, xfA, xfB) -> bool`.
/// Delegates entirely to [`distance`]; two shapes are considered touching
/// when GJK (with radii) reports a near-zero gap.
pub fn test_overlap(
    shape_a: &ShapeRef<'_>,
    index_a: usize,
    shape_b: &ShapeRef<'_>,
    index_b: usize,
    xf_a: Transform,
    xf_b: Transform,
) -> bool {
    let proxy_a = proxy_of(shape_a, index_a);
    let proxy_b = proxy_of(shape_b, index_b);

    let input = DistanceInput {
        proxy_a: &proxy_a,
        proxy_b: &proxy_b,
        transform_a: xf_a,
        transform_b: xf_b,
        use_radii: true,
    };

    let mut cache = SimpleCache::default();
    let output = distance(&input, &mut cache);
    output.distance < 10.0 * f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Polygon};
    use xmath::Rot;

    #[test]
    fn overlap_is_symmetric_for_circles() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let xf = Transform::identity();

        let ab = test_overlap(&ShapeRef::Circle(&a), 0, &ShapeRef::Circle(&b), 0, xf, xf);
        let ba = test_overlap(&ShapeRef::Circle(&b), 0, &ShapeRef::Circle(&a), 0, xf, xf);
        assert_eq!(ab, ba);
        assert!(ab);
    }

    #[test]
    fn disjoint_shapes_do_not_overlap() {
        let a = Circle::new(Vec2::zero(), 0.5);
        let b = Polygon::new_box(0.5, 0.5);
        let xf_a = Transform::identity();
        let xf_b = Transform::new(Vec2::new(10.0, 10.0), Rot::identity());

        assert!(!test_overlap(
            &ShapeRef::Circle(&a),
            0,
            &ShapeRef::Polygon(&b),
            0,
            xf_a,
            xf_b
        ));
    }
}
