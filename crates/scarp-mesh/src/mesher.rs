//! Per-chunk mesh builder.
//!
//! A [`ChunkMesher`] owns one chunk's vertex/triangle buffers and boundary
//! polygons. Buffers are cleared and refilled on every build, never
//! reallocated, and a build is skipped entirely while the chunk is marked
//! ready.

use glam::{Vec2, Vec3};
use scarp_common::{ChunkCoord, ScalarField};
use tracing::{debug, trace};

use crate::grid::CellGrid;
use crate::sink::{ChunkBounds, TerrainSink};

/// Geometry parameters for one chunk build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    /// Cell edge length in world units
    pub cell_size: f32,
    /// World-space centre of the chunk
    pub origin: Vec2,
}

impl MeshParams {
    /// Creates mesh parameters.
    #[must_use]
    pub const fn new(cell_size: f32, origin: Vec2) -> Self {
        Self { cell_size, origin }
    }
}

/// Position-only vertex list plus flat triangle index list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) triangles: Vec<u32>,
}

impl MeshBuffers {
    /// Vertex positions (z is always 0).
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle indices; each consecutive triple is one triangle.
    #[must_use]
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Whether both buffers are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Raw vertex bytes for GPU upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Clears both buffers, keeping their allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }
}

/// Ordered world-space outline of one cell's polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    points: Vec<Vec2>,
}

impl BoundaryPolygon {
    /// Wraps an ordered point list.
    #[must_use]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// The outline points, in case-table order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// Builds and tears down one chunk's mesh.
#[derive(Debug)]
pub struct ChunkMesher {
    coord: ChunkCoord,
    buffers: MeshBuffers,
    boundaries: Vec<BoundaryPolygon>,
    /// Set while the sinks hold anything from a build, even an empty mesh
    uploaded: bool,
    mesh_ready: bool,
    collision_ready: bool,
}

impl ChunkMesher {
    /// Creates an empty, not-ready mesher for a chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            buffers: MeshBuffers::default(),
            boundaries: Vec::new(),
            uploaded: false,
            mesh_ready: false,
            collision_ready: false,
        }
    }

    /// The chunk this mesher builds.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Whether a mesh is currently built.
    #[must_use]
    pub const fn is_mesh_ready(&self) -> bool {
        self.mesh_ready
    }

    /// Whether collision polygons are currently attached.
    #[must_use]
    pub const fn is_collision_ready(&self) -> bool {
        self.collision_ready
    }

    /// Current mesh buffers.
    #[must_use]
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Boundary polygons from the last build.
    #[must_use]
    pub fn boundaries(&self) -> &[BoundaryPolygon] {
        &self.boundaries
    }

    /// Whether the sinks currently hold this chunk's mesh or bounds.
    #[must_use]
    pub const fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    /// Clears both ready flags so the next [`generate`](Self::generate) rebuilds.
    ///
    /// Geometry already handed to the sinks stays until it is replaced or
    /// torn down.
    pub fn invalidate(&mut self) {
        self.mesh_ready = false;
        self.collision_ready = false;
    }

    /// Triangulates `field` and hands the result to `sink`.
    ///
    /// Returns `false` without touching anything if the mesh is already
    /// ready.
    pub fn generate<S: TerrainSink + ?Sized>(
        &mut self,
        field: &ScalarField,
        params: MeshParams,
        sink: &mut S,
    ) -> bool {
        if self.mesh_ready {
            trace!("Chunk {} already built, skipping", self.coord);
            return false;
        }

        let mut grid = CellGrid::new(field, params.cell_size, params.origin);

        self.buffers.clear();
        if !self.boundaries.is_empty() {
            self.boundaries.clear();
            sink.clear_polygons(self.coord);
        }

        grid.triangulate(&mut self.buffers, &mut self.boundaries);

        sink.upload_mesh(self.coord, &self.buffers);
        for polygon in &self.boundaries {
            sink.attach_polygon(self.coord, polygon.points());
        }
        sink.set_bounds(
            self.coord,
            ChunkBounds {
                center: params.origin,
                size: Vec2::new(grid.cells_x() as f32, grid.cells_y() as f32) * params.cell_size,
            },
        );

        debug!(
            "Built chunk {}: {} vertices, {} triangles, {} boundary polygons",
            self.coord,
            self.buffers.vertex_count(),
            self.buffers.triangle_count(),
            self.boundaries.len()
        );

        self.uploaded = true;
        self.mesh_ready = true;
        self.collision_ready = true;
        true
    }

    /// Discards the mesh and its collision polygons.
    ///
    /// Returns `false` if there was nothing to tear down.
    pub fn destroy<S: TerrainSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if !self.uploaded {
            return false;
        }

        self.buffers.clear();
        sink.clear_mesh(self.coord);
        if !self.boundaries.is_empty() {
            self.boundaries.clear();
            sink.clear_polygons(self.coord);
        }

        debug!("Tore down chunk {}", self.coord);

        self.uploaded = false;
        self.mesh_ready = false;
        self.collision_ready = false;
        true
    }
}
