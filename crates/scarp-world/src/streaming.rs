//! Chunk visibility and mesh lifecycle.
//!
//! Every tick the manager tests each chunk's padded box against the current
//! frustum, builds visible chunks that are not ready and tears down the
//! ones that left the view.

use glam::{Vec2, Vec3};
use scarp_common::{ChunkCoord, ConfigError, FieldGrid, ScalarField};
use scarp_mesh::{ChunkMesher, MeshParams, TerrainSink};
use tracing::{debug, info, warn};

use crate::frustum::{Aabb, Frustum, FrustumSource};
use crate::generation::MapLayout;

/// World units added to each side of a chunk's box before culling.
pub const VISIBILITY_MARGIN: f32 = 20.0;

/// World-space placement of the chunk grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLayout {
    chunks_x: u32,
    chunks_y: u32,
    chunk_width: u32,
    chunk_height: u32,
    cell_size: f32,
}

impl ChunkLayout {
    /// Places a validated map layout in world space.
    pub fn new(map: MapLayout, cell_size: f32) -> Result<Self, ConfigError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            chunks_x: map.chunks_x,
            chunks_y: map.chunks_y,
            chunk_width: map.chunk_width(),
            chunk_height: map.chunk_height(),
            cell_size,
        })
    }

    /// Chunk count along x.
    #[must_use]
    pub const fn chunks_x(&self) -> u32 {
        self.chunks_x
    }

    /// Chunk count along y.
    #[must_use]
    pub const fn chunks_y(&self) -> u32 {
        self.chunks_y
    }

    /// Total chunk count.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks_x as usize * self.chunks_y as usize
    }

    /// Cell edge length in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Chunk size in world units.
    #[must_use]
    pub fn chunk_world_size(&self) -> Vec2 {
        Vec2::new(self.chunk_width as f32, self.chunk_height as f32) * self.cell_size
    }

    /// Whole map size in world units.
    #[must_use]
    pub fn map_world_size(&self) -> Vec2 {
        self.chunk_world_size() * Vec2::new(self.chunks_x as f32, self.chunks_y as f32)
    }

    /// Centre of a chunk in world space.
    #[must_use]
    pub fn chunk_center(&self, coord: ChunkCoord) -> Vec2 {
        let size = self.chunk_world_size();
        size / 2.0 + Vec2::new(coord.x as f32, coord.y as f32) * size
    }

    /// The chunk's culling box, padded by [`VISIBILITY_MARGIN`].
    #[must_use]
    pub fn chunk_aabb(&self, coord: ChunkCoord) -> Aabb {
        let half = self.chunk_world_size() / 2.0 + Vec2::splat(VISIBILITY_MARGIN);
        Aabb::new(self.chunk_center(coord).extend(0.0), Vec3::new(half.x, half.y, 0.0))
    }

    /// Geometry parameters for building a chunk.
    #[must_use]
    pub fn mesh_params(&self, coord: ChunkCoord) -> MeshParams {
        MeshParams::new(self.cell_size, self.chunk_center(coord))
    }

    fn check_grid(&self, grid: &FieldGrid) -> Result<(), ConfigError> {
        if grid.chunks_x() != self.chunks_x || grid.chunks_y() != self.chunks_y {
            return Err(ConfigError::ChunkCountMismatch {
                expected: self.chunk_count(),
                actual: grid.len(),
            });
        }
        if grid.chunk_width() != self.chunk_width || grid.chunk_height() != self.chunk_height {
            return Err(ConfigError::FieldSizeMismatch {
                expected_x: self.chunk_width,
                expected_y: self.chunk_height,
                actual_x: grid.chunk_width(),
                actual_y: grid.chunk_height(),
            });
        }
        Ok(())
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks whose mesh was built this pass
    pub built: Vec<ChunkCoord>,
    /// Chunks whose mesh was torn down this pass
    pub torn_down: Vec<ChunkCoord>,
    /// Chunks considered visible
    pub visible: usize,
}

impl TickReport {
    /// Returns true if nothing was built or torn down.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.built.is_empty() && self.torn_down.is_empty()
    }
}

/// Owns one [`ChunkMesher`] per chunk and the current field grid.
#[derive(Debug)]
pub struct ChunkMeshManager {
    layout: ChunkLayout,
    meshers: Vec<ChunkMesher>,
    fields: Option<FieldGrid>,
    frustum: Frustum,
}

impl ChunkMeshManager {
    /// Creates a manager with no fields loaded.
    #[must_use]
    pub fn new(layout: ChunkLayout, frustum: Frustum) -> Self {
        let meshers = ChunkCoord::iter_grid(layout.chunks_x, layout.chunks_y)
            .map(ChunkMesher::new)
            .collect();
        Self {
            layout,
            meshers,
            fields: None,
            frustum,
        }
    }

    /// Returns the chunk layout.
    #[must_use]
    pub const fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Returns the frustum used by the last reconciliation.
    #[must_use]
    pub const fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Returns the loaded field grid, if any.
    #[must_use]
    pub const fn fields(&self) -> Option<&FieldGrid> {
        self.fields.as_ref()
    }

    /// Returns a chunk's mesher.
    #[must_use]
    pub fn mesher(&self, coord: ChunkCoord) -> Option<&ChunkMesher> {
        coord
            .to_index(self.layout.chunks_x, self.layout.chunks_y)
            .and_then(|i| self.meshers.get(i))
    }

    /// Returns whether a chunk's mesh is currently built.
    #[must_use]
    pub fn is_chunk_ready(&self, coord: ChunkCoord) -> bool {
        self.mesher(coord).is_some_and(ChunkMesher::is_mesh_ready)
    }

    /// Returns the number of chunks with a built mesh.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.meshers.iter().filter(|m| m.is_mesh_ready()).count()
    }

    /// Tests a chunk's padded box against the current frustum.
    #[must_use]
    pub fn is_chunk_visible(&self, coord: ChunkCoord) -> bool {
        self.frustum.intersects_aabb(&self.layout.chunk_aabb(coord))
    }

    /// Refreshes the frustum from `source`, then reconciles every chunk.
    ///
    /// The frustum is left unchanged if no field grid is loaded.
    pub fn tick<F, S>(&mut self, source: &F, sink: &mut S) -> Result<TickReport, ConfigError>
    where
        F: FrustumSource + ?Sized,
        S: TerrainSink + ?Sized,
    {
        if self.fields.is_none() {
            warn!("Tick requested before any field grid was loaded");
            return Err(ConfigError::NoFieldLoaded);
        }
        self.frustum = source.frustum();
        self.reconcile(sink)
    }

    /// Builds visible chunks and tears down invisible ones against the
    /// current frustum.
    pub fn reconcile<S: TerrainSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<TickReport, ConfigError> {
        let Some(fields) = self.fields.as_ref() else {
            warn!("Reconcile requested before any field grid was loaded");
            return Err(ConfigError::NoFieldLoaded);
        };

        let mut report = TickReport::default();
        for (mesher, (coord, field)) in self.meshers.iter_mut().zip(fields.iter()) {
            reconcile_chunk(
                &self.layout,
                &self.frustum,
                mesher,
                coord,
                field,
                sink,
                &mut report,
            );
        }

        if !report.is_idle() {
            debug!(
                "Reconciled: {} built, {} torn down, {} visible",
                report.built.len(),
                report.torn_down.len(),
                report.visible
            );
        }
        Ok(report)
    }

    /// Replaces the whole field grid and reconciles.
    ///
    /// Chunks that are already built keep their meshes.
    pub fn load_fields<S: TerrainSink + ?Sized>(
        &mut self,
        grid: FieldGrid,
        sink: &mut S,
    ) -> Result<TickReport, ConfigError> {
        if let Err(e) = self.layout.check_grid(&grid) {
            warn!("Rejected field grid: {e}");
            return Err(e);
        }
        info!(
            "Loaded field grid of {}x{} chunks",
            grid.chunks_x(),
            grid.chunks_y()
        );
        self.fields = Some(grid);
        self.reconcile(sink)
    }

    /// Replaces one chunk's field and forces that chunk to rebuild if it
    /// is visible.
    ///
    /// Nothing changes if no grid is loaded, the coordinate is outside the
    /// chunk grid or the field has the wrong size.
    pub fn reload_chunk<S: TerrainSink + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        field: ScalarField,
        sink: &mut S,
    ) -> Result<TickReport, ConfigError> {
        let Some(fields) = self.fields.as_mut() else {
            warn!("Chunk {coord} reload requested before any field grid was loaded");
            return Err(ConfigError::NoFieldLoaded);
        };
        let index = match coord
            .checked_index(self.layout.chunks_x, self.layout.chunks_y)
            .and_then(|index| fields.replace(coord, field).map(|_| index))
        {
            Ok(index) => index,
            Err(e) => {
                warn!("Rejected reload of chunk {coord}: {e}");
                return Err(e);
            },
        };

        info!("Reloading chunk {coord}");
        let mut report = TickReport::default();
        if let (Some(mesher), Some(field)) = (self.meshers.get_mut(index), fields.get(coord)) {
            mesher.invalidate();
            reconcile_chunk(
                &self.layout,
                &self.frustum,
                mesher,
                coord,
                field,
                sink,
                &mut report,
            );
        }
        Ok(report)
    }

    /// Tears down every chunk, e.g. on shutdown.
    pub fn destroy_all<S: TerrainSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        self.meshers
            .iter_mut()
            .filter_map(|m| m.destroy(sink).then_some(()))
            .count()
    }
}

fn reconcile_chunk<S: TerrainSink + ?Sized>(
    layout: &ChunkLayout,
    frustum: &Frustum,
    mesher: &mut ChunkMesher,
    coord: ChunkCoord,
    field: &ScalarField,
    sink: &mut S,
    report: &mut TickReport,
) {
    if frustum.intersects_aabb(&layout.chunk_aabb(coord)) {
        report.visible += 1;
        if mesher.generate(field, layout.mesh_params(coord), sink) {
            report.built.push(coord);
        }
    } else if mesher.destroy(sink) {
        report.torn_down.push(coord);
    }
}
