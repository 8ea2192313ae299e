//! # Scarp World
//!
//! Terrain map generation and chunk streaming for Scarp.
//!
//! This crate provides:
//! - Scalar field generation (uniform random or Perlin, block or circle mask)
//! - Frustum planes and padded box culling
//! - An orthographic camera that produces frustum planes
//! - The chunk mesh manager that builds and tears down chunks per tick
//!
//! ## Example
//!
//! ```
//! use scarp_mesh::RecordingSink;
//! use scarp_world::{
//!     ChunkLayout, ChunkMeshManager, FieldGenerator, GeneratorConfig, OrthoCamera,
//! };
//!
//! let config = GeneratorConfig {
//!     seed: Some(1),
//!     ..GeneratorConfig::default()
//! };
//! let layout = ChunkLayout::new(config.layout()?, 1.0)?;
//! let mut generator = FieldGenerator::new(config);
//! let mut manager = ChunkMeshManager::new(layout, Default::default());
//! let mut sink = RecordingSink::default();
//!
//! manager.load_fields(generator.generate()?, &mut sink)?;
//! let report = manager.tick(&OrthoCamera::new(64, 64), &mut sink)?;
//! assert!(report.visible > 0);
//! # Ok::<(), scarp_common::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod frustum;
pub mod generation;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::frustum::*;
    pub use crate::generation::*;
    pub use crate::streaming::*;
}

pub use prelude::*;
