// Copyright 2025 Lars Brubaker
// Shared test utilities for cdt2d-rust tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use cdt2d_rust::{in_circle, orient2d, Point, Triangulation};

/// Signed area of a triangle, positive when counter-clockwise.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

/// Total signed area of all output triangles.
pub fn total_area(points: &[Point], result: &Triangulation) -> f64 {
    result
        .triangles
        .iter()
        .map(|&[i, j, k]| triangle_area(points[i as usize], points[j as usize], points[k as usize]))
        .sum()
}

/// Signed area of a simple polygon.
pub fn polygon_signed_area(verts: &[Point]) -> f64 {
    let n = verts.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i][0] * verts[j][1];
        area -= verts[j][0] * verts[i][1];
    }
    area * 0.5
}

/// Area of the convex hull (Andrew's monotone chain).
pub fn convex_hull_area(points: &[Point]) -> f64 {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    pts.dedup();
    if pts.len() < 3 {
        return 0.0;
    }
    let mut hull: Vec<Point> = Vec::new();
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &Point>> = if pass == 0 {
            Box::new(pts.iter())
        } else {
            Box::new(pts.iter().rev())
        };
        for &p in iter {
            while hull.len() >= start + 2
                && orient2d(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
            {
                hull.pop();
            }
            hull.push(p);
        }
        hull.pop();
    }
    polygon_signed_area(&hull)
}

/// Undirected edge set of the output.
pub fn edge_set(result: &Triangulation) -> BTreeSet<(u32, u32)> {
    let mut edges = BTreeSet::new();
    for t in &result.triangles {
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            edges.insert((a.min(b), a.max(b)));
        }
    }
    edges
}

pub fn has_edge(result: &Triangulation, a: u32, b: u32) -> bool {
    edge_set(result).contains(&(a.min(b), a.max(b)))
}

/// Indices in range, every triangle counter-clockwise, no triangle repeated.
pub fn verify_valid_output(points: &[Point], result: &Triangulation) {
    let mut seen = BTreeSet::new();
    for (i, t) in result.triangles.iter().enumerate() {
        for &v in t {
            assert!(
                (v as usize) < points.len(),
                "triangle[{}] = {:?} out of range (points={})",
                i,
                t,
                points.len()
            );
        }
        let o = orient2d(points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]);
        assert!(o > 0.0, "triangle[{}] = {:?} is not counter-clockwise ({})", i, t, o);

        let mut key = *t;
        key.sort_unstable();
        assert!(seen.insert(key), "triangle {:?} appears twice", t);
    }
}

/// Every edge shared by two output triangles and not in `constraints` has an
/// empty circumcircle.
pub fn verify_delaunay(points: &[Point], result: &Triangulation, constraints: &[[u32; 2]]) {
    let fixed: BTreeSet<(u32, u32)> = constraints
        .iter()
        .map(|&[a, b]| (a.min(b), a.max(b)))
        .collect();
    let mut apex = BTreeMap::new();
    for t in &result.triangles {
        for k in 0..3 {
            apex.insert((t[k], t[(k + 1) % 3]), t[(k + 2) % 3]);
        }
    }
    for (&(a, b), &c) in &apex {
        if fixed.contains(&(a.min(b), a.max(b))) {
            continue;
        }
        if let Some(&d) = apex.get(&(b, a)) {
            let p = |v: u32| points[v as usize];
            let s = in_circle(p(a), p(b), p(c), p(d));
            assert!(
                s <= 0.0,
                "vertex {} lies inside the circumcircle of ({}, {}, {})",
                d,
                a,
                b,
                c
            );
        }
    }
}

/// A closed loop over `first..first + n`.
pub fn loop_edges(first: u32, n: u32) -> Vec<[u32; 2]> {
    (0..n).map(|i| [first + i, first + (i + 1) % n]).collect()
}
