//! # Scarp Common
//!
//! Common types shared by every Scarp crate:
//! - Chunk coordinates and chunk-grid indexing
//! - Scalar fields (per-chunk sample grids) and the chunk field grid
//! - The configuration error taxonomy
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod field;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::field::*;
}

pub use prelude::*;
