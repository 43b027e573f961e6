// Copyright 2025 Lars Brubaker
// License: MIT

use thiserror::Error;

/// Errors reported by [`triangulate`](crate::triangulate) and [`Triangulator`](crate::Triangulator).
///
/// Only cheap preconditions are checked. Crossing constraint edges and
/// coincident points are not detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CdtError {
    #[error("point {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: f64, y: f64 },

    #[error("edge {edge} references vertex {vertex}, but only {len} points were given")]
    VertexOutOfRange { edge: usize, vertex: u32, len: usize },

    #[error("edge {edge} connects vertex {vertex} to itself")]
    DegenerateEdge { edge: usize, vertex: u32 },

    #[error("{len} points exceed the limit of {max}")]
    TooManyPoints { len: usize, max: usize },

    #[error("{len} constraint edges exceed the limit of {max}")]
    TooManyEdges { len: usize, max: usize },

    #[error("Delaunay refinement did not converge after {flips} flips (limit {limit})")]
    RefinementDidNotConverge { flips: usize, limit: usize },
}
