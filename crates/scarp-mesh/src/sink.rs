//! Boundaries to the rendering and collision collaborators.
//!
//! The mesher never owns engine objects. It pushes finished buffers and
//! boundary polygons through these traits and tells them when to drop
//! what they hold for a chunk.

use std::collections::HashMap;

use glam::Vec2;
use scarp_common::ChunkCoord;

use crate::mesher::MeshBuffers;

/// Axis-aligned box covering a chunk's cell region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    /// Centre in world space
    pub center: Vec2,
    /// Full size (not half extents)
    pub size: Vec2,
}

/// Receives chunk meshes for upload and display.
///
/// Implementations own any derived data (normals, GPU buffers).
pub trait RenderSink {
    /// A chunk's mesh was (re)built.
    fn upload_mesh(&mut self, chunk: ChunkCoord, mesh: &MeshBuffers);

    /// A chunk's mesh was torn down.
    fn clear_mesh(&mut self, chunk: ChunkCoord);
}

/// Receives collision geometry.
pub trait CollisionSink {
    /// Attach one boundary polygon to a chunk.
    fn attach_polygon(&mut self, chunk: ChunkCoord, points: &[Vec2]);

    /// Destroy every polygon attached to a chunk.
    fn clear_polygons(&mut self, chunk: ChunkCoord);

    /// Update the box covering the whole chunk.
    fn set_bounds(&mut self, chunk: ChunkCoord, bounds: ChunkBounds);
}

/// Both collaborators at once.
pub trait TerrainSink: RenderSink + CollisionSink {}

impl<T: RenderSink + CollisionSink + ?Sized> TerrainSink for T {}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn upload_mesh(&mut self, _chunk: ChunkCoord, _mesh: &MeshBuffers) {}
    fn clear_mesh(&mut self, _chunk: ChunkCoord) {}
}

impl CollisionSink for NullSink {
    fn attach_polygon(&mut self, _chunk: ChunkCoord, _points: &[Vec2]) {}
    fn clear_polygons(&mut self, _chunk: ChunkCoord) {}
    fn set_bounds(&mut self, _chunk: ChunkCoord, _bounds: ChunkBounds) {}
}

/// Counts calls and tracks what each chunk currently holds.
///
/// Useful for headless runs and for asserting lifecycle behaviour.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Number of `upload_mesh` calls
    pub uploads: usize,
    /// Number of `clear_mesh` calls
    pub mesh_clears: usize,
    /// Number of `attach_polygon` calls
    pub polygons_attached: usize,
    /// Number of `clear_polygons` calls
    pub polygon_clears: usize,
    /// Number of `set_bounds` calls
    pub bounds_updates: usize,
    /// Vertex and triangle-index counts of each chunk's live mesh
    pub live_meshes: HashMap<ChunkCoord, (usize, usize)>,
    /// Live polygon count per chunk
    pub live_polygons: HashMap<ChunkCoord, usize>,
    /// Most recent bounds per chunk
    pub bounds: HashMap<ChunkCoord, ChunkBounds>,
}

impl RecordingSink {
    /// Total polygons currently attached across all chunks.
    #[must_use]
    pub fn total_live_polygons(&self) -> usize {
        self.live_polygons.values().sum()
    }
}

impl RenderSink for RecordingSink {
    fn upload_mesh(&mut self, chunk: ChunkCoord, mesh: &MeshBuffers) {
        self.uploads += 1;
        self.live_meshes
            .insert(chunk, (mesh.vertex_count(), mesh.triangles().len()));
    }

    fn clear_mesh(&mut self, chunk: ChunkCoord) {
        self.mesh_clears += 1;
        self.live_meshes.remove(&chunk);
    }
}

impl CollisionSink for RecordingSink {
    fn attach_polygon(&mut self, chunk: ChunkCoord, _points: &[Vec2]) {
        self.polygons_attached += 1;
        *self.live_polygons.entry(chunk).or_insert(0) += 1;
    }

    fn clear_polygons(&mut self, chunk: ChunkCoord) {
        self.polygon_clears += 1;
        self.live_polygons.remove(&chunk);
    }

    fn set_bounds(&mut self, chunk: ChunkCoord, bounds: ChunkBounds) {
        self.bounds_updates += 1;
        self.bounds.insert(chunk, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_tracks_live_polygons() {
        let mut sink = RecordingSink::default();
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(1, 0);

        sink.attach_polygon(a, &[Vec2::ZERO]);
        sink.attach_polygon(a, &[Vec2::ZERO]);
        sink.attach_polygon(b, &[Vec2::ZERO]);
        assert_eq!(sink.total_live_polygons(), 3);

        sink.clear_polygons(a);
        assert_eq!(sink.total_live_polygons(), 1);
        assert_eq!(sink.polygons_attached, 3);
        assert_eq!(sink.polygon_clears, 1);
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let mut sink = NullSink;
        let dyn_sink: &mut dyn TerrainSink = &mut sink;
        dyn_sink.clear_mesh(ChunkCoord::new(0, 0));
    }
}
