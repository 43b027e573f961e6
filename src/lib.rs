// cdt2d-rust: 2D constrained Delaunay triangulation
// Copyright 2025 Lars Brubaker
// License: MIT

//! Constrained Delaunay triangulation of planar point sets.
//!
//! ```
//! use cdt2d_rust::{triangulate, CdtOptions};
//!
//! let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let edges = [[0, 1], [1, 2], [2, 3], [3, 0]];
//! let options = CdtOptions { exterior: false, ..CdtOptions::default() };
//! let result = triangulate(&square, &edges, &options).unwrap();
//! assert_eq!(result.len(), 2);
//! ```

pub mod bsearch;
pub mod bucketalloc;
pub mod cdt;
pub mod error;
pub mod filter;
pub mod monotone;
pub mod pool;
mod refine;
pub mod robust;
pub mod triangles;

pub use cdt::{
    default_flip_limit, triangulate, triangulate_with_pool, CdtOption, CdtOptions, Triangulation,
    Triangulator, INFINITE_VERTEX, MAX_EDGES, MAX_POINTS,
};
pub use error::CdtError;
pub use pool::WorkBufferPool;
pub use robust::{in_circle, orient2d, Point, Real};
