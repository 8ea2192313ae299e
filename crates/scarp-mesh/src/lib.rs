//! # Scarp Mesh
//!
//! Marching-squares triangulation for Scarp terrain chunks.
//!
//! This crate turns one chunk's [`ScalarField`](scarp_common::ScalarField)
//! into render and collision geometry:
//! - Control-node grid (one node per sample, plus its edge midpoints)
//! - Cell grid with 4-bit corner configurations
//! - A fixed 16-case polygon table, fan-triangulated from point 0
//! - Deduplicated vertex buffer and flat triangle index buffer
//! - One boundary polygon per non-empty, non-solid cell for colliders
//!
//! ## Pipeline
//!
//! ```text
//! ScalarField ──► CellGrid ──► case table ──► MeshBuffers ──► RenderSink
//!                                        └──► boundary polygons ──► CollisionSink
//! ```
//!
//! Every build starts from a fresh [`CellGrid`], so vertex indices assigned
//! during one build never leak into the next.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cell;
pub mod grid;
pub mod mesher;
pub mod node;
pub mod sink;
pub mod table;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cell::*;
    pub use crate::grid::*;
    pub use crate::mesher::*;
    pub use crate::node::*;
    pub use crate::sink::*;
    pub use crate::table::*;
}

pub use prelude::*;
