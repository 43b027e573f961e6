// Copyright 2025 Lars Brubaker
// License: MIT
//
// Inside/outside classification of a constrained triangulation.
//
// Faces are flooded from the mesh boundary. A flood never crosses a constraint
// edge within a round; faces reached through one are deferred to the next
// round, which paints the opposite side. The outer region that touches the hull
// through an unconstrained edge is +1, the region inside the first constraint
// loop is -1, a hole inside that is +1 again, and so on.

use crate::triangles::Triangles;

/// Marks a missing neighbor in the face adjacency table.
pub const INVALID: u32 = u32::MAX;

/// Which faces to keep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Faces enclosed by an odd number of constraint loops.
    Interior,
    /// Faces enclosed by an even number of constraint loops, including the outer region.
    Exterior,
    /// Every face, no flood fill.
    All,
}

impl Target {
    fn side(self) -> i8 {
        match self {
            Target::Interior => -1,
            Target::Exterior => 1,
            Target::All => 0,
        }
    }
}

/// Rotate a triangle so its smallest vertex comes first, keeping the winding.
#[inline]
pub fn canonical([x, y, z]: [u32; 3]) -> [u32; 3] {
    if y < z {
        if y < x {
            return [y, z, x];
        }
    } else if z < x {
        return [z, x, y];
    }
    [x, y, z]
}

fn locate(cells: &[[u32; 3]], cell: [u32; 3]) -> Option<usize> {
    cells.binary_search(&canonical(cell)).ok()
}

/// Classify the faces of `triangles` and write those matching `target` to `out`.
///
/// With `infinity`, every directed boundary edge `[a, b]` of the mesh is
/// written to `ring`; each stands for the unbounded face `(a, b, ∞)`. Both
/// outputs are cleared first. Faces come out canonical and sorted.
pub fn filter(
    triangles: &Triangles<'_>,
    target: Target,
    infinity: bool,
    out: &mut Vec<[u32; 3]>,
    ring: &mut Vec<[u32; 2]>,
) {
    let pool = triangles.pool;
    out.clear();
    ring.clear();

    let mut cells = pool.cells.get();
    triangles.fill(&mut cells);
    for c in cells.iter_mut() {
        *c = canonical(*c);
    }
    cells.sort_unstable();

    let n = cells.len();
    let mut flags = pool.sides.get_filled(0, n);
    let mut neighbor = pool.indices.get_filled(INVALID, 3 * n);
    let mut constraint = pool.flags.get_filled(false, 3 * n);
    let mut active = pool.indices.get();
    let mut next = pool.indices.get();

    for (i, &c) in cells.iter().enumerate() {
        for j in 0..3 {
            let (x, y) = (c[j], c[(j + 1) % 3]);
            let fixed = triangles.is_constraint(x, y);
            constraint[3 * i + j] = fixed;
            match triangles.opposite(y, x).and_then(|k| locate(&cells, [y, x, k])) {
                Some(f) => neighbor[3 * i + j] = f as u32,
                None => {
                    if fixed {
                        next.push(i as u32);
                    } else {
                        active.push(i as u32);
                        flags[i] = 1;
                    }
                    if infinity {
                        ring.push([y, x]);
                    }
                }
            }
        }
    }

    if target == Target::All {
        out.extend_from_slice(&cells);
        return;
    }

    let mut side: i8 = 1;
    while !active.is_empty() || !next.is_empty() {
        while let Some(t) = active.pop() {
            let t = t as usize;
            if flags[t] == -side {
                continue;
            }
            flags[t] = side;
            for j in 0..3 {
                let f = neighbor[3 * t + j];
                if f == INVALID || flags[f as usize] != 0 {
                    continue;
                }
                if constraint[3 * t + j] {
                    next.push(f);
                } else {
                    active.push(f);
                    flags[f as usize] = side;
                }
            }
        }
        std::mem::swap(&mut active, &mut next);
        side = -side;
    }

    let keep = target.side();
    out.extend(
        cells
            .iter()
            .zip(flags.iter())
            .filter(|&(_, &flag)| flag == keep)
            .map(|(&c, _)| c),
    );
}
