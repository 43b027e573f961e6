// Copyright 2025 Lars Brubaker
// License: MIT
//
// Per-vertex star index over a triangulation.
//
// The star of vertex `v` is a list of pairs `[a, b]`, one per incident triangle
// `(v, a, b)`. Every triangle is therefore recorded three times, once in the
// star of each corner, with the winding preserved. Constraint edges are kept
// canonicalized (`min, max`), sorted and deduplicated for binary search.

use crate::pool::{WorkBuffer, WorkBufferPool};

pub struct Triangles<'p> {
    pub(crate) pool: &'p WorkBufferPool,
    stars: Vec<WorkBuffer<'p, [u32; 2]>>,
    edges: WorkBuffer<'p, [u32; 2]>,
}

impl<'p> Triangles<'p> {
    /// Index `cells` over `num_points` vertices with `constraints` as the fixed edges.
    pub fn new(
        pool: &'p WorkBufferPool,
        num_points: usize,
        constraints: &[[u32; 2]],
        cells: &[[u32; 3]],
    ) -> Self {
        let stars = (0..num_points).map(|_| pool.pairs.get()).collect();

        let mut edges = pool.pairs.get();
        edges.extend(constraints.iter().map(|&[a, b]| [a.min(b), a.max(b)]));
        edges.sort_unstable();
        edges.dedup();

        let mut triangles = Triangles { pool, stars, edges };
        for &[i, j, k] in cells {
            triangles.add_triangle(i, j, k);
        }
        triangles
    }

    pub fn num_points(&self) -> usize {
        self.stars.len()
    }

    /// The star of `v`: pairs `[a, b]` for every triangle `(v, a, b)`.
    #[inline]
    pub fn star(&self, v: u32) -> &[[u32; 2]] {
        &self.stars[v as usize]
    }

    pub fn add_triangle(&mut self, i: u32, j: u32, k: u32) {
        self.stars[i as usize].push([j, k]);
        self.stars[j as usize].push([k, i]);
        self.stars[k as usize].push([i, j]);
    }

    /// Remove triangle `(i, j, k)`. Pairs that are not present are left alone.
    pub fn remove_triangle(&mut self, i: u32, j: u32, k: u32) {
        self.remove_pair(i, j, k);
        self.remove_pair(j, k, i);
        self.remove_pair(k, i, j);
    }

    fn remove_pair(&mut self, v: u32, a: u32, b: u32) {
        let star = &mut self.stars[v as usize];
        if let Some(pos) = star.iter().position(|&s| s == [a, b]) {
            star.swap_remove(pos);
        }
    }

    /// The vertex `k` such that triangle `(j, i, k)` exists, if any.
    pub fn opposite(&self, j: u32, i: u32) -> Option<u32> {
        self.stars[i as usize]
            .iter()
            .find(|s| s[1] == j)
            .map(|s| s[0])
    }

    /// Replace the diagonal `(i, j)` of the quad formed by its two triangles with
    /// the other diagonal. Returns `false`, leaving the mesh untouched, when
    /// `(i, j)` is a boundary edge.
    pub fn flip(&mut self, i: u32, j: u32) -> bool {
        let (Some(a), Some(b)) = (self.opposite(i, j), self.opposite(j, i)) else {
            return false;
        };
        self.remove_triangle(i, j, a);
        self.remove_triangle(j, i, b);
        self.add_triangle(i, b, a);
        self.add_triangle(j, a, b);
        true
    }

    /// Is `(i, j)`, in either direction, a constraint edge?
    pub fn is_constraint(&self, i: u32, j: u32) -> bool {
        let key = [i.min(j), i.max(j)];
        self.edges.binary_search(&key).is_ok()
    }

    /// The canonical constraint edges.
    pub fn constraints(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Write every triangle once, pivoted on its smallest vertex.
    pub fn fill(&self, out: &mut Vec<[u32; 3]>) {
        out.clear();
        for (i, star) in self.stars.iter().enumerate() {
            let i = i as u32;
            out.extend(
                star.iter()
                    .filter(|s| i < s[0].min(s[1]))
                    .map(|s| [i, s[0], s[1]]),
            );
        }
    }

    /// All triangles, see [`Triangles::fill`].
    pub fn cells(&self) -> Vec<[u32; 3]> {
        let mut out = Vec::new();
        self.fill(&mut out);
        out
    }

    pub fn num_triangles(&self) -> usize {
        self.stars.iter().map(|s| s.len()).sum::<usize>() / 3
    }
}
