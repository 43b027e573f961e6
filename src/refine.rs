// Copyright 2025 Lars Brubaker
// License: MIT
//
// Delaunay refinement by edge flipping.
//
// Every interior, unconstrained edge whose opposite vertex falls strictly
// inside the circumcircle of its neighbor is flipped. Each flip can only
// invalidate the four outer edges of the quad it rewrites, so those are
// re-queued and the loop runs until the stack is empty. Constraint edges are
// never flipped and cocircular quads are left as they are.

use tracing::{trace, warn};

use crate::error::CdtError;
use crate::robust::{in_circle, Point};
use crate::triangles::Triangles;

impl Triangles<'_> {
    /// Flip edges until every unconstrained edge is locally Delaunay.
    ///
    /// Returns the number of flips performed, or
    /// [`CdtError::RefinementDidNotConverge`] once more than `max_flips` would
    /// be needed. The index is left valid either way.
    pub fn refine_delaunay(&mut self, points: &[Point], max_flips: usize) -> Result<usize, CdtError> {
        let p = |v: u32| points[v as usize];
        let pool = self.pool;
        let mut stack = pool.pairs.get();

        for a in 0..self.num_points() as u32 {
            let star = self.star(a);
            for &[x, b] in star {
                if b < a || self.is_constraint(a, b) {
                    continue;
                }
                let Some(y) = star.iter().find(|s| s[0] == b).map(|s| s[1]) else {
                    continue;
                };
                if in_circle(p(a), p(b), p(x), p(y)) < 0.0 {
                    stack.push([a, b]);
                }
            }
        }

        let mut flips = 0;
        while let Some([a, b]) = stack.pop() {
            let (mut x, mut y) = (None, None);
            for &[s, t] in self.star(a) {
                if s == b {
                    y = Some(t);
                } else if t == b {
                    x = Some(s);
                }
            }
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            if in_circle(p(a), p(b), p(x), p(y)) >= 0.0 {
                continue;
            }

            if flips >= max_flips {
                warn!(flips, limit = max_flips, "Delaunay refinement hit the flip limit");
                return Err(CdtError::RefinementDidNotConverge {
                    flips,
                    limit: max_flips,
                });
            }
            if !self.flip(a, b) {
                continue;
            }
            flips += 1;
            trace!(a, b, x, y, "flip");

            self.queue_if_illegal(points, &mut stack, x, a, y);
            self.queue_if_illegal(points, &mut stack, a, y, x);
            self.queue_if_illegal(points, &mut stack, y, b, x);
            self.queue_if_illegal(points, &mut stack, b, x, y);
        }

        Ok(flips)
    }

    /// Push edge `(a, b)` if the vertex across it lies inside the circle
    /// through `a`, `b` and `x`.
    fn queue_if_illegal(
        &self,
        points: &[Point],
        stack: &mut Vec<[u32; 2]>,
        mut a: u32,
        mut b: u32,
        mut x: u32,
    ) {
        let Some(mut y) = self.opposite(a, b) else {
            return;
        };
        if b < a {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut x, &mut y);
        }
        if self.is_constraint(a, b) {
            return;
        }
        let p = |v: u32| points[v as usize];
        if in_circle(p(a), p(b), p(x), p(y)) < 0.0 {
            stack.push([a, b]);
        }
    }

    /// Number of unconstrained interior edges that fail the empty-circle test.
    pub fn count_illegal_edges(&self, points: &[Point]) -> usize {
        let p = |v: u32| points[v as usize];
        let mut count = 0;
        for a in 0..self.num_points() as u32 {
            let star = self.star(a);
            for &[x, b] in star {
                if b < a || self.is_constraint(a, b) {
                    continue;
                }
                if let Some(y) = star.iter().find(|s| s[0] == b).map(|s| s[1]) {
                    if in_circle(p(a), p(b), p(x), p(y)) < 0.0 {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}
