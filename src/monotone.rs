// Copyright 2025 Lars Brubaker
// License: MIT
//
// Sweep-line monotone triangulation.
//
// Events are swept left to right. The sweep keeps an ordered list of partial
// hulls, one per slab between consecutive constraint edges crossing the sweep
// line. Each hull owns a lower and an upper chain of vertex ids; adding a point
// clips every reflex corner it exposes on those chains, emitting one triangle
// per clipped corner. Constraint edges split a hull when they start and merge
// the two hulls on either side when they end, so no triangle ever crosses one.
//
// The result covers the convex hull of the input and contains every non-vertical
// constraint edge, but is not Delaunay.

use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::bsearch;
use crate::bucketalloc::BucketAlloc;
use crate::pool::WorkBufferPool;
use crate::robust::{orient2d, Point, Real};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EventKind {
    Point = 0,
    End = 1,
    Start = 2,
}

/// A sweep event. For edge events `a` is the event position and `b` the other endpoint.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Event {
    a: Point,
    b: Point,
    kind: EventKind,
    /// Vertex id for point events, edge id for edge events.
    index: u32,
}

/// A slab of the sweep bounded below by the edge `a -> b`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PartialHull {
    a: Point,
    b: Point,
    /// Edge that bounds this hull from below; `None` for the sentinel.
    edge: Option<u32>,
    /// Handle of the lower chain in the chain arena.
    lower: u32,
    /// Handle of the upper chain in the chain arena.
    upper: u32,
}

#[inline]
fn cmp_real(a: Real, b: Real) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// `Less` when `c` lies left of the directed line `a -> b`, `Greater` when right.
#[inline]
fn side(a: Point, b: Point, c: Point) -> Ordering {
    cmp_real(0.0, orient2d(a, b, c))
}

/// Sweep order: by position, then point < end < start, then by edge direction,
/// then by index.
fn compare_events(a: &Event, b: &Event) -> Ordering {
    cmp_real(a.a[0], b.a[0])
        .then_with(|| cmp_real(a.a[1], b.a[1]))
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| {
            if a.kind != EventKind::Point {
                side(a.a, a.b, b.b)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.index.cmp(&b.index))
}

fn test_point(hull: &PartialHull, p: &Point) -> Ordering {
    side(hull.a, hull.b, *p)
}

fn find_split(hull: &PartialHull, edge: &Event) -> Ordering {
    let d = if hull.a[0] < edge.a[0] {
        side(hull.a, hull.b, edge.a)
    } else {
        side(edge.b, edge.a, hull.a)
    };
    d.then_with(|| {
        if edge.b[0] < hull.b[0] {
            side(hull.a, hull.b, edge.b)
        } else {
            side(edge.b, edge.a, hull.b)
        }
    })
    .then_with(|| hull.edge.cmp(&Some(edge.index)))
}

/// Triangulate `points` so that every constraint in `edges` is a mesh edge.
///
/// Triangles are appended to `cells` in counter-clockwise order. Constraint
/// edges must not cross; vertical constraints produce no events and are
/// honored only through the sweep's tie-breaking.
pub fn triangulate(
    pool: &WorkBufferPool,
    points: &[Point],
    edges: &[[u32; 2]],
    cells: &mut Vec<[u32; 3]>,
) {
    let mut events = pool.events.get();
    events.reserve(points.len() + 2 * edges.len());

    for (i, &p) in points.iter().enumerate() {
        events.push(Event {
            a: p,
            b: [0.0, 0.0],
            kind: EventKind::Point,
            index: i as u32,
        });
    }

    for (i, &[ia, ib]) in edges.iter().enumerate() {
        let a = points[ia as usize];
        let b = points[ib as usize];
        let (left, right) = if a[0] < b[0] {
            (a, b)
        } else if a[0] > b[0] {
            (b, a)
        } else {
            continue;
        };
        events.push(Event {
            a: left,
            b: right,
            kind: EventKind::Start,
            index: i as u32,
        });
        events.push(Event {
            a: right,
            b: left,
            kind: EventKind::End,
            index: i as u32,
        });
    }

    events.sort_by(compare_events);

    let Some(first) = events.first() else {
        return;
    };
    let min_x = first.a[0] - 1.0;

    cells.reserve(points.len() * 2);
    let mut chains = pool.chains();
    let mut hulls = pool.hulls.get();
    let sentinel = PartialHull {
        a: [min_x, 1.0],
        b: [min_x, 0.0],
        edge: None,
        lower: chains.alloc(),
        upper: chains.alloc(),
    };
    hulls.push(sentinel);

    for e in events.iter() {
        match e.kind {
            EventKind::Point => add_point(cells, &hulls, &mut chains, points, e.a, e.index),
            EventKind::Start => split_hulls(&mut hulls, &mut chains, e),
            EventKind::End => merge_hulls(&mut hulls, &mut chains, e),
        }
    }

    chains.reset();
}

fn add_point(
    cells: &mut Vec<[u32; 3]>,
    hulls: &[PartialHull],
    chains: &mut BucketAlloc<Vec<u32>>,
    points: &[Point],
    p: Point,
    idx: u32,
) {
    let lo = bsearch::lt(hulls, &p, test_point).unwrap_or(0);
    let hi = bsearch::gt(hulls, &p, test_point);

    for hull in hulls.iter().take(hi).skip(lo) {
        if let Some(lower) = chains.get_mut(hull.lower) {
            while let [.., p0, p1] = lower[..] {
                if orient2d(points[p0 as usize], points[p1 as usize], p) >= 0.0 {
                    break;
                }
                cells.push([p1, p0, idx]);
                lower.pop();
            }
            lower.push(idx);
        }

        if let Some(upper) = chains.get_mut(hull.upper) {
            while let [.., p0, p1] = upper[..] {
                if orient2d(points[p0 as usize], points[p1 as usize], p) <= 0.0 {
                    break;
                }
                cells.push([p0, p1, idx]);
                upper.pop();
            }
            upper.push(idx);
        }
    }
}

fn split_hulls(hulls: &mut Vec<PartialHull>, chains: &mut BucketAlloc<Vec<u32>>, e: &Event) {
    let Some(split) = bsearch::le(&hulls[..], e, find_split) else {
        warn!(edge = e.index, "no hull below starting edge");
        return;
    };

    let old_upper = hulls[split].upper;
    let pivot = chains.get(old_upper).and_then(|c| c.last().copied());
    let upper = chains.alloc();
    let lower = chains.alloc();
    for handle in [upper, lower] {
        if let Some(chain) = chains.get_mut(handle) {
            chain.extend(pivot);
        }
    }

    hulls[split].upper = upper;
    hulls.insert(
        split + 1,
        PartialHull {
            a: e.a,
            b: e.b,
            edge: Some(e.index),
            lower,
            upper: old_upper,
        },
    );
    trace!(edge = e.index, at = split, hulls = hulls.len(), "split hull");
}

fn merge_hulls(hulls: &mut Vec<PartialHull>, chains: &mut BucketAlloc<Vec<u32>>, e: &Event) {
    // Hulls are keyed by their left-to-right edge, the end event runs right to left.
    let key = Event {
        a: e.b,
        b: e.a,
        ..*e
    };
    let Some(at) = bsearch::eq(&hulls[..], &key, find_split).filter(|&i| i > 0) else {
        warn!(edge = e.index, "no hull found for ending edge");
        return;
    };

    let upper = hulls.remove(at);
    let lower = &mut hulls[at - 1];
    chains.free(lower.upper);
    chains.free(upper.lower);
    lower.upper = upper.upper;
    trace!(edge = e.index, at, hulls = hulls.len(), "merge hulls");
}
