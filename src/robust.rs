// Copyright 2025 Lars Brubaker
// License: MIT
//
// Exact 2D orientation and in-circle predicates.
//
// Each predicate evaluates its determinant in plain floating point first and
// only falls back to exact expansion arithmetic when the result is within the
// propagated rounding-error bound of zero. An expansion is a sequence of
// non-overlapping f64 components sorted by increasing magnitude whose exact sum
// is the represented value, so its last component always carries the sign.
//
// Intermediate expansions of the exact paths live in a per-thread
// `BufferPool`, so repeated exact evaluations do not allocate.

use crate::pool::{BufferPool, WorkBuffer};

pub type Real = f64;

/// A 2D point, `[x, y]`.
pub type Point = [Real; 2];

/// Half an ulp of 1.0.
const EPSILON: Real = 1.110_223_024_625_156_5e-16;
/// 2^27 + 1, splits an f64 mantissa into two non-overlapping halves.
const SPLITTER: Real = 134_217_729.0;
const ORIENT_ERRBOUND: Real = (3.0 + 16.0 * EPSILON) * EPSILON;
const INCIRCLE_ERRBOUND: Real = (10.0 + 96.0 * EPSILON) * EPSILON;

/// Error-free sum: returns `(lo, hi)` with `hi = fl(a + b)` and `lo + hi == a + b` exactly.
#[inline]
pub fn two_sum(a: Real, b: Real) -> (Real, Real) {
    let x = a + b;
    let bv = x - a;
    let av = x - bv;
    let br = b - bv;
    let ar = a - av;
    (ar + br, x)
}

/// Like `two_sum` but requires `|a| >= |b|`.
#[inline]
fn fast_two_sum(a: Real, b: Real) -> (Real, Real) {
    let x = a + b;
    let bv = x - a;
    (b - bv, x)
}

#[inline]
fn split(a: Real) -> (Real, Real) {
    let c = SPLITTER * a;
    let abig = c - a;
    let hi = c - abig;
    (hi, a - hi)
}

/// Error-free product: returns `(lo, hi)` with `hi = fl(a * b)` and `lo + hi == a * b` exactly.
#[inline]
pub fn two_product(a: Real, b: Real) -> (Real, Real) {
    let x = a * b;
    let (ahi, alo) = split(a);
    let (bhi, blo) = split(b);
    let err1 = x - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    (alo * blo - err3, x)
}

/// Merge two expansions into `out`, negating `f` when `sign` is -1.
/// Zero components are dropped; an exact zero is written as `[0.0]`.
fn merge_sum(e: &[Real], f: &[Real], sign: Real, out: &mut Vec<Real>) {
    out.clear();
    if e.len() == 1 && f.len() == 1 {
        let (lo, hi) = two_sum(e[0], sign * f[0]);
        if lo != 0.0 {
            out.push(lo);
        }
        out.push(hi);
        return;
    }

    let (mut i, mut j) = (0usize, 0usize);
    let mut next = || {
        let take_e = j >= f.len() || (i < e.len() && e[i].abs() < f[j].abs());
        if take_e {
            i += 1;
            e[i - 1]
        } else {
            j += 1;
            sign * f[j - 1]
        }
    };

    let n = e.len() + f.len();
    let b = next();
    let a = next();
    let (mut q0, mut q1) = fast_two_sum(a, b);
    for _ in 2..n {
        let a = next();
        let (y, x) = fast_two_sum(a, q0);
        if y != 0.0 {
            out.push(y);
        }
        let (lo, hi) = two_sum(q1, x);
        q0 = lo;
        q1 = hi;
    }
    if q0 != 0.0 {
        out.push(q0);
    }
    if q1 != 0.0 {
        out.push(q1);
    }
    if out.is_empty() {
        out.push(0.0);
    }
}

/// Exact sum of two expansions, written to `out`.
pub fn sum(e: &[Real], f: &[Real], out: &mut Vec<Real>) {
    merge_sum(e, f, 1.0, out);
}

/// Exact difference `e - f` of two expansions, written to `out`.
pub fn subtract(e: &[Real], f: &[Real], out: &mut Vec<Real>) {
    merge_sum(e, f, -1.0, out);
}

/// Exact product of an expansion and a scalar, written to `out`.
pub fn scale(e: &[Real], b: Real, out: &mut Vec<Real>) {
    out.clear();
    if e.len() == 1 {
        let (lo, hi) = two_product(e[0], b);
        if lo != 0.0 {
            out.push(lo);
        }
        out.push(hi);
        return;
    }

    let (lo, mut q) = two_product(e[0], b);
    if lo != 0.0 {
        out.push(lo);
    }
    for &ei in &e[1..] {
        let (t_lo, t_hi) = two_product(ei, b);
        let (lo, hi) = two_sum(q, t_lo);
        if lo != 0.0 {
            out.push(lo);
        }
        let (y, x) = fast_two_sum(t_hi, hi);
        q = x;
        if y != 0.0 {
            out.push(y);
        }
    }
    if q != 0.0 {
        out.push(q);
    }
    if out.is_empty() {
        out.push(0.0);
    }
}

#[inline]
fn product(a: Real, b: Real) -> [Real; 2] {
    let (lo, hi) = two_product(a, b);
    [lo, hi]
}

thread_local! {
    static SCRATCH: BufferPool<Real> = BufferPool::new();
}

fn summed<'p>(pool: &'p BufferPool<Real>, e: &[Real], f: &[Real]) -> WorkBuffer<'p, Real> {
    let mut out = pool.get();
    sum(e, f, &mut out);
    out
}

fn subtracted<'p>(pool: &'p BufferPool<Real>, e: &[Real], f: &[Real]) -> WorkBuffer<'p, Real> {
    let mut out = pool.get();
    subtract(e, f, &mut out);
    out
}

fn scaled<'p>(pool: &'p BufferPool<Real>, e: &[Real], b: Real) -> WorkBuffer<'p, Real> {
    let mut out = pool.get();
    scale(e, b, &mut out);
    out
}

#[inline]
fn most_significant(e: &[Real]) -> Real {
    e.last().copied().unwrap_or(0.0)
}

/// Orientation of the triangle `(a, b, c)`.
///
/// Positive when the points are in counter-clockwise order, negative when
/// clockwise and exactly zero when collinear. The magnitude is only meaningful
/// on the fast path; callers must rely on the sign alone.
pub fn orient2d(a: Point, b: Point, c: Point) -> Real {
    let l = (a[0] - c[0]) * (b[1] - c[1]);
    let r = (a[1] - c[1]) * (b[0] - c[0]);
    let det = l - r;
    let s = if l > 0.0 {
        if r <= 0.0 {
            return det;
        }
        l + r
    } else if l < 0.0 {
        if r >= 0.0 {
            return det;
        }
        -(l + r)
    } else {
        return det;
    };

    let tol = ORIENT_ERRBOUND * s;
    if det >= tol || det <= -tol {
        return det;
    }
    orient2d_exact(a, b, c)
}

fn orient2d_exact(a: Point, b: Point, c: Point) -> Real {
    SCRATCH.with(|pool| {
        // det = (ay*cx - cy*ax) - (by*cx - cy*bx + ay*bx - by*ax)
        let p_l = summed(pool, &product(b[1], c[0]), &product(-c[1], b[0]));
        let p_r = summed(pool, &product(a[1], b[0]), &product(-b[1], a[0]));
        let p = summed(pool, &p_l, &p_r);
        let n = summed(pool, &product(a[1], c[0]), &product(-c[1], a[0]));
        let det = subtracted(pool, &n, &p);
        most_significant(&det)
    })
}

/// In-circle test of `d` against the circle through `a`, `b`, `c`.
///
/// With `(a, b, c)` counter-clockwise the result is positive when `d` lies
/// inside the circle, negative outside and exactly zero on it. Clockwise
/// input flips the sign.
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> Real {
    let adx = a[0] - d[0];
    let ady = a[1] - d[1];
    let bdx = b[0] - d[0];
    let bdy = b[1] - d[1];
    let cdx = c[0] - d[0];
    let cdy = c[1] - d[1];

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let a_lift = adx * adx + ady * ady;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let b_lift = bdx * bdx + bdy * bdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let c_lift = cdx * cdx + cdy * cdy;

    let det = a_lift * (bdxcdy - cdxbdy) + b_lift * (cdxady - adxcdy) + c_lift * (adxbdy - bdxady);
    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * a_lift
        + (cdxady.abs() + adxcdy.abs()) * b_lift
        + (adxbdy.abs() + bdxady.abs()) * c_lift;
    let errbound = INCIRCLE_ERRBOUND * permanent;
    if det > errbound || -det > errbound {
        return det;
    }
    in_circle_exact([a, b, c, d])
}

fn in_circle_exact(m: [Point; 4]) -> Real {
    SCRATCH.with(|pool| {
        let lift = m.map(|p| summed(pool, &product(p[0], p[0]), &product(p[1], p[1])));
        // cross(i, j) = |m_i|^2 * x_j - |m_j|^2 * x_i
        let cross = |i: usize, j: usize| {
            let l = scaled(pool, &lift[i], m[j][0]);
            let r = scaled(pool, &lift[j], m[i][0]);
            subtracted(pool, &l, &r)
        };
        let c10 = cross(1, 0);
        let c20 = cross(2, 0);
        let c21 = cross(2, 1);
        let c30 = cross(3, 0);
        let c31 = cross(3, 1);
        let c32 = cross(3, 2);

        let p_l = triple(pool, [(&c32[..], m[1][1]), (&c31[..], m[2][1]), (&c21[..], m[3][1])]);
        let p_r = triple(pool, [(&c31[..], m[0][1]), (&c30[..], m[1][1]), (&c10[..], m[3][1])]);
        let n_l = triple(pool, [(&c32[..], m[0][1]), (&c30[..], m[2][1]), (&c20[..], m[3][1])]);
        let n_r = triple(pool, [(&c21[..], m[0][1]), (&c20[..], m[1][1]), (&c10[..], m[2][1])]);

        let p = summed(pool, &p_l, &p_r);
        let n = summed(pool, &n_l, &n_r);
        let det = subtracted(pool, &p, &n);
        most_significant(&det)
    })
}

/// `u * yu - v * yv + w * yw` for `[(u, yu), (v, yv), (w, yw)]`.
fn triple<'p>(pool: &'p BufferPool<Real>, terms: [(&[Real], Real); 3]) -> WorkBuffer<'p, Real> {
    let [(u, yu), (v, yv), (w, yw)] = terms;
    let sv = scaled(pool, v, -yv);
    let sw = scaled(pool, w, yw);
    let tail = summed(pool, &sv, &sw);
    let su = scaled(pool, u, yu);
    summed(pool, &su, &tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(e: &[Real]) -> Real {
        e.iter().sum()
    }

    fn sign(x: Real) -> i32 {
        if x > 0.0 {
            1
        } else if x < 0.0 {
            -1
        } else {
            0
        }
    }

    #[test]
    fn two_sum_captures_rounding() {
        let (lo, hi) = two_sum(1.0, 1e-20);
        assert_eq!(hi, 1.0);
        assert_eq!(lo, 1e-20);
    }

    #[test]
    fn two_product_is_exact() {
        let a = 1.0 + Real::EPSILON;
        let (lo, hi) = two_product(a, a);
        // (1 + e)^2 = 1 + 2e + e^2, the e^2 term is lost in hi.
        assert_eq!(hi, 1.0 + 2.0 * Real::EPSILON);
        assert_eq!(lo, Real::EPSILON * Real::EPSILON);
    }

    #[test]
    fn expansion_sum_cancels_to_zero() {
        let mut out = Vec::new();
        sum(&[1e-30, 1.0], &[-1e-30, -1.0], &mut out);
        assert_eq!(out, vec![0.0]);
    }

    #[test]
    fn expansion_subtract_keeps_tiny_component() {
        let mut out = Vec::new();
        subtract(&[1e-30, 1.0], &[1.0], &mut out);
        assert_eq!(most_significant(&out), 1e-30);
    }

    #[test]
    fn expansion_scale_matches_value() {
        let mut out = Vec::new();
        scale(&[0.25, 8.0], 3.0, &mut out);
        assert_eq!(value(&out), 24.75);
    }

    #[test]
    fn orient2d_signs() {
        assert!(orient2d([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]) > 0.0);
        assert!(orient2d([0.0, 0.0], [0.0, 1.0], [1.0, 0.0]) < 0.0);
        assert_eq!(orient2d([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]), 0.0);
    }

    #[test]
    fn orient2d_collinear_permutations_are_zero() {
        let p = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        for &(i, j, k) in &[(0, 1, 2), (0, 2, 1), (1, 0, 2), (1, 2, 0), (2, 0, 1), (2, 1, 0)] {
            assert_eq!(orient2d(p[i], p[j], p[k]), 0.0);
        }
    }

    #[test]
    fn orient2d_exact_path_resolves_near_collinear() {
        // Points a hair off the line y = x where the naive determinant rounds badly.
        let ulp = 2.0f64.powi(-53);
        for x in 0..32i32 {
            for y in 0..32i32 {
                let a = [0.5 + x as Real * ulp, 0.5 + y as Real * ulp];
                let got = orient2d(a, [12.0, 12.0], [24.0, 24.0]);
                // Exact: (ax - 24)(12 - 24) - (ay - 24)(12 - 24) = 12 (ay - ax)
                assert_eq!(sign(got), (y - x).signum(), "x={} y={}", x, y);
            }
        }
    }

    #[test]
    fn orient2d_exact_matches_direct_expansion() {
        let r = orient2d_exact([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]);
        assert_eq!(r, 1.0);
    }

    #[test]
    fn in_circle_signs() {
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];
        let c = [0.0, 1.0];
        assert!(in_circle(a, b, c, [0.25, 0.25]) > 0.0);
        assert!(in_circle(a, b, c, [2.0, 2.0]) < 0.0);
        assert_eq!(in_circle(a, b, c, [1.0, 1.0]), 0.0);
        // Clockwise winding flips the sign.
        assert!(in_circle(a, c, b, [0.25, 0.25]) < 0.0);
    }

    #[test]
    fn in_circle_exact_agrees_with_fast_path() {
        let a = [0.0, 0.0];
        let b = [4.0, 0.0];
        let c = [0.0, 3.0];
        for d in [[1.0, 1.0], [5.0, 5.0], [4.0, 3.0]] {
            let fast = in_circle(a, b, c, d);
            let exact = in_circle_exact([a, b, c, d]);
            assert_eq!(sign(fast), sign(exact), "d={:?}", d);
        }
    }

    #[test]
    fn in_circle_cocircular_after_translation() {
        // Unit-square corners translated far from the origin stay exactly cocircular.
        let o = 1.0e8;
        let r = in_circle([o, o], [o + 1.0, o], [o + 1.0, o + 1.0], [o, o + 1.0]);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn exact_paths_reuse_scratch_buffers() {
        let o = 1.0e8;
        let square = [[o, o], [o + 1.0, o], [o + 1.0, o + 1.0], [o, o + 1.0]];
        assert_eq!(in_circle_exact(square), 0.0);
        assert!(orient2d_exact(square[0], square[1], square[2]) > 0.0);
        let parked = SCRATCH.with(|pool| pool.idle());
        assert!(parked > 0);
        for _ in 0..10 {
            assert_eq!(in_circle_exact(square), 0.0);
            assert!(orient2d_exact(square[0], square[1], square[2]) > 0.0);
        }
        assert_eq!(SCRATCH.with(|pool| pool.idle()), parked);
    }
}
