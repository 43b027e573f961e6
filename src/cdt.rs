// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public triangulation API: options, input validation and the pipeline that
// runs sweep, refinement and classification in turn.

use tracing::debug;

use crate::error::CdtError;
use crate::filter::{filter, Target};
use crate::monotone;
use crate::pool::WorkBufferPool;
use crate::robust::Point;
use crate::triangles::Triangles;

// ─────────────────────────────── Public types ──────────────────────────────────

/// Stands for the point at infinity in [`Triangulation::flat_indices_with_infinity`].
pub const INFINITE_VERTEX: u32 = u32::MAX;

/// Largest accepted point count. A triangulation of `n` points has fewer than
/// `2n` faces, so vertex and face ids both stay below the `u32::MAX` sentinels.
pub const MAX_POINTS: usize = (u32::MAX / 2) as usize;

/// Largest accepted constraint edge count.
pub const MAX_EDGES: usize = (u32::MAX - 1) as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CdtOption {
    Delaunay,
    Interior,
    Exterior,
    Infinity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CdtOptions {
    /// Flip unconstrained edges until the mesh is constrained Delaunay.
    pub delaunay: bool,
    /// Keep faces inside the constraint loops.
    pub interior: bool,
    /// Keep faces outside the constraint loops.
    pub exterior: bool,
    /// Report the hull edges bounding the unbounded outer face.
    pub infinity: bool,
    /// Upper bound on refinement flips. `None` picks a bound from the input size.
    pub max_flips: Option<usize>,
}

impl Default for CdtOptions {
    fn default() -> Self {
        CdtOptions {
            delaunay: true,
            interior: true,
            exterior: true,
            infinity: false,
            max_flips: None,
        }
    }
}

impl CdtOptions {
    pub fn set(&mut self, option: CdtOption, value: bool) {
        match option {
            CdtOption::Delaunay => self.delaunay = value,
            CdtOption::Interior => self.interior = value,
            CdtOption::Exterior => self.exterior = value,
            CdtOption::Infinity => self.infinity = value,
        }
    }

    pub fn get(&self, option: CdtOption) -> bool {
        match option {
            CdtOption::Delaunay => self.delaunay,
            CdtOption::Interior => self.interior,
            CdtOption::Exterior => self.exterior,
            CdtOption::Infinity => self.infinity,
        }
    }
}

/// Output of a triangulation. Indices refer to the input points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangulation {
    /// Counter-clockwise triangles.
    pub triangles: Vec<[u32; 3]>,
    /// Directed hull edges `[a, b]`, each closing the outer face `(a, b, ∞)`.
    /// Empty unless [`CdtOptions::infinity`] is set.
    pub infinite_edges: Vec<[u32; 2]>,
    /// Edge flips performed by refinement.
    pub flips: usize,
}

impl Triangulation {
    /// Number of finite triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles as a flat index list, three per triangle.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Like [`flat_indices`](Self::flat_indices), followed by one triple
    /// `a, b, INFINITE_VERTEX` per infinite edge.
    pub fn flat_indices_with_infinity(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(3 * (self.triangles.len() + self.infinite_edges.len()));
        out.extend(self.triangles.iter().flatten());
        for &[a, b] in &self.infinite_edges {
            out.extend([a, b, INFINITE_VERTEX]);
        }
        out
    }
}

// ─────────────────────────────── Pipeline ─────────────────────────────────────

/// The flip bound used when [`CdtOptions::max_flips`] is `None`.
pub fn default_flip_limit(cells: usize) -> usize {
    cells.saturating_mul(cells).saturating_mul(4).saturating_add(16)
}

fn check_sizes(points: usize, edges: usize) -> Result<(), CdtError> {
    if points > MAX_POINTS {
        return Err(CdtError::TooManyPoints {
            len: points,
            max: MAX_POINTS,
        });
    }
    if edges > MAX_EDGES {
        return Err(CdtError::TooManyEdges {
            len: edges,
            max: MAX_EDGES,
        });
    }
    Ok(())
}

fn validate(points: &[Point], edges: &[[u32; 2]]) -> Result<(), CdtError> {
    check_sizes(points.len(), edges.len())?;
    if let Some((index, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !(p[0].is_finite() && p[1].is_finite()))
    {
        return Err(CdtError::NonFiniteCoordinate {
            index,
            x: p[0],
            y: p[1],
        });
    }
    for (edge, &[a, b]) in edges.iter().enumerate() {
        for vertex in [a, b] {
            if vertex as usize >= points.len() {
                return Err(CdtError::VertexOutOfRange {
                    edge,
                    vertex,
                    len: points.len(),
                });
            }
        }
        if a == b {
            return Err(CdtError::DegenerateEdge { edge, vertex: a });
        }
    }
    Ok(())
}

/// Triangulate `points` so that every edge in `edges` appears in the result.
///
/// Edges must not cross each other and points should be distinct; neither is
/// checked. Uses a fresh [`WorkBufferPool`]; reuse a [`Triangulator`] to keep
/// scratch storage between calls.
pub fn triangulate(
    points: &[Point],
    edges: &[[u32; 2]],
    options: &CdtOptions,
) -> Result<Triangulation, CdtError> {
    let pool = WorkBufferPool::new();
    triangulate_with_pool(&pool, points, edges, options)
}

/// [`triangulate`] drawing its scratch storage from `pool`.
pub fn triangulate_with_pool(
    pool: &WorkBufferPool,
    points: &[Point],
    edges: &[[u32; 2]],
    options: &CdtOptions,
) -> Result<Triangulation, CdtError> {
    validate(points, edges)?;

    let mut result = Triangulation::default();
    if !(options.interior || options.exterior) || points.is_empty() {
        debug!(points = points.len(), "nothing to triangulate");
        return Ok(result);
    }

    let mut cells = pool.cells.get();
    monotone::triangulate(pool, points, edges, &mut cells);

    if !options.delaunay && options.interior && options.exterior && !options.infinity {
        result.triangles.extend_from_slice(&cells);
        debug!(
            points = points.len(),
            edges = edges.len(),
            triangles = result.triangles.len(),
            "monotone triangulation"
        );
        return Ok(result);
    }

    let mut index = Triangles::new(pool, points.len(), edges, &cells);
    if options.delaunay {
        let limit = options
            .max_flips
            .unwrap_or_else(|| default_flip_limit(cells.len()));
        result.flips = index.refine_delaunay(points, limit)?;
    }

    let target = match (options.interior, options.exterior) {
        (true, false) => Target::Interior,
        (false, true) => Target::Exterior,
        _ => Target::All,
    };
    filter(
        &index,
        target,
        options.infinity,
        &mut result.triangles,
        &mut result.infinite_edges,
    );

    debug!(
        points = points.len(),
        edges = edges.len(),
        cells = cells.len(),
        flips = result.flips,
        triangles = result.triangles.len(),
        infinite_edges = result.infinite_edges.len(),
        ?target,
        "constrained triangulation"
    );
    Ok(result)
}

// ─────────────────────────── Triangulator ─────────────────────────────────────

/// Accumulates points and constraint edges, then triangulates them.
///
/// Keeps its input and scratch storage between calls, so options can be
/// changed and the same input run again cheaply.
#[derive(Debug, Default)]
pub struct Triangulator {
    points: Vec<Point>,
    edges: Vec<[u32; 2]>,
    options: CdtOptions,
    pool: WorkBufferPool,
}

impl Triangulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CdtOptions) -> Self {
        Triangulator {
            options,
            ..Self::default()
        }
    }

    pub fn set_option(&mut self, option: CdtOption, value: bool) {
        self.options.set(option, value);
    }

    pub fn set_max_flips(&mut self, max_flips: Option<usize>) {
        self.options.max_flips = max_flips;
    }

    pub fn options(&self) -> &CdtOptions {
        &self.options
    }

    /// Add a free vertex, returning its id. Ids past [`MAX_POINTS`] are
    /// rejected by [`Triangulator::triangulate`].
    pub fn add_point(&mut self, p: Point) -> u32 {
        let id = self.points.len() as u32;
        self.points.push(p);
        id
    }

    /// Add vertices, returning the id of the first one.
    pub fn add_points(&mut self, points: &[Point]) -> u32 {
        let first = self.points.len() as u32;
        self.points.extend_from_slice(points);
        first
    }

    /// Add a constraint edge between two vertex ids.
    pub fn add_edge(&mut self, a: u32, b: u32) {
        self.edges.push([a, b]);
    }

    /// Add a closed polygon. A two-vertex contour adds a single edge.
    pub fn add_contour(&mut self, vertices: &[Point]) {
        let first = self.add_points(vertices);
        let n = vertices.len() as u32;
        match n {
            0 | 1 => {}
            2 => self.add_edge(first, first + 1),
            _ => {
                for i in 0..n {
                    self.add_edge(first + i, first + (i + 1) % n);
                }
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Drop all points and edges. Options and scratch storage are kept.
    pub fn clear(&mut self) {
        self.points.clear();
        self.edges.clear();
    }

    pub fn triangulate(&mut self) -> Result<Triangulation, CdtError> {
        triangulate_with_pool(&self.pool, &self.points, &self.edges, &self.options)
    }
}
