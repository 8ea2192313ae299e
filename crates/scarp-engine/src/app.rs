//! Headless driving loop.
//!
//! Generates a map, pans an orthographic camera across it and reconciles
//! chunks every tick. Halfway through the run the whole map is regenerated
//! and the chunk under the camera is reloaded with a fresh field.

use anyhow::{Context, Result};
use glam::Vec2;
use scarp_common::ChunkCoord;
use scarp_mesh::{ChunkBounds, CollisionSink, MeshBuffers, RecordingSink, RenderSink};
use scarp_world::{
    ChunkLayout, ChunkMeshManager, FieldGenerator, FrustumSource, OrthoCamera, TickReport,
};
use tracing::{debug, info, trace};

use crate::config::TerrainConfig;

/// Records sink traffic and traces it.
#[derive(Debug, Default)]
pub struct LoggingSink {
    record: RecordingSink,
    uploaded_bytes: usize,
}

impl LoggingSink {
    /// Call counts and live state so far.
    pub fn record(&self) -> &RecordingSink {
        &self.record
    }

    /// Total vertex and index bytes handed to the renderer.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }
}

impl RenderSink for LoggingSink {
    fn upload_mesh(&mut self, chunk: ChunkCoord, mesh: &MeshBuffers) {
        let bytes = mesh.vertex_bytes().len() + mesh.index_bytes().len();
        trace!(
            "Upload chunk {chunk}: {} vertices, {} triangles, {bytes} bytes",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.uploaded_bytes += bytes;
        self.record.upload_mesh(chunk, mesh);
    }

    fn clear_mesh(&mut self, chunk: ChunkCoord) {
        trace!("Clear mesh of chunk {chunk}");
        self.record.clear_mesh(chunk);
    }
}

impl CollisionSink for LoggingSink {
    fn attach_polygon(&mut self, chunk: ChunkCoord, points: &[Vec2]) {
        self.record.attach_polygon(chunk, points);
    }

    fn clear_polygons(&mut self, chunk: ChunkCoord) {
        trace!("Clear colliders of chunk {chunk}");
        self.record.clear_polygons(chunk);
    }

    fn set_bounds(&mut self, chunk: ChunkCoord, bounds: ChunkBounds) {
        self.record.set_bounds(chunk, bounds);
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks driven
    pub ticks: u32,
    /// Chunk builds across all ticks and reloads
    pub builds: usize,
    /// Chunk teardowns across all ticks and reloads
    pub teardowns: usize,
    /// Grids generated
    pub generations: u64,
}

impl RunSummary {
    fn add(&mut self, report: &TickReport) {
        self.builds += report.built.len();
        self.teardowns += report.torn_down.len();
    }
}

/// Run the driver with the given configuration.
pub fn run(config: &TerrainConfig) -> Result<RunSummary> {
    let layout = ChunkLayout::new(
        config.map.layout().context("Invalid map configuration")?,
        config.cell_size,
    )
    .context("Invalid world configuration")?;

    let mut camera = OrthoCamera::new(config.viewport_width, config.viewport_height);
    camera.set_zoom(config.zoom);
    camera.center_on(layout.chunk_center(ChunkCoord::new(0, 0)));

    let mut generator = FieldGenerator::new(config.map.clone());
    let mut manager = ChunkMeshManager::new(layout, camera.frustum());
    let mut sink = LoggingSink::default();
    let mut summary = RunSummary::default();

    let grid = generator.generate().context("Map generation failed")?;
    summary.add(&manager.load_fields(grid, &mut sink)?);

    let map_size = layout.map_world_size();
    let row_step = layout.chunk_world_size().y;
    let halfway = config.ticks / 2;

    for tick in 0..config.ticks {
        pan(&mut camera, config.pan_speed, row_step, map_size);

        if tick == halfway {
            regenerate(&mut generator, &mut manager, &camera, &mut sink, &mut summary)?;
        }

        let report = manager.tick(&camera, &mut sink)?;
        if !report.is_idle() {
            debug!(
                "Tick {tick}: camera ({:.1}, {:.1}), {} built, {} torn down, {} visible",
                camera.position.x,
                camera.position.y,
                report.built.len(),
                report.torn_down.len(),
                report.visible
            );
        }
        summary.add(&report);
        summary.ticks += 1;
    }

    summary.teardowns += manager.destroy_all(&mut sink);
    summary.generations = generator.generation();

    info!(
        "Run complete: {} ticks, {} builds, {} teardowns, {} uploads ({} bytes), {} live polygons",
        summary.ticks,
        summary.builds,
        summary.teardowns,
        sink.record().uploads,
        sink.uploaded_bytes(),
        sink.record().total_live_polygons()
    );
    Ok(summary)
}

/// Sweep the camera along x, stepping up one chunk row at each wrap.
fn pan(camera: &mut OrthoCamera, speed: f32, row_step: f32, map_size: Vec2) {
    camera.translate(Vec2::new(speed, 0.0));
    if camera.position.x > map_size.x {
        camera.position.x = 0.0;
        camera.position.y += row_step;
        if camera.position.y > map_size.y {
            camera.position.y = 0.0;
        }
    }
}

/// Load a fresh grid, then reload the chunk under the camera from another.
fn regenerate(
    generator: &mut FieldGenerator,
    manager: &mut ChunkMeshManager,
    camera: &OrthoCamera,
    sink: &mut LoggingSink,
    summary: &mut RunSummary,
) -> Result<()> {
    let grid = generator.generate().context("Map regeneration failed")?;
    summary.add(&manager.load_fields(grid, sink)?);

    let size = manager.layout().chunk_world_size();
    let under = ChunkCoord::new(
        (camera.position.x / size.x).floor() as i32,
        (camera.position.y / size.y).floor() as i32,
    );
    let Some(coord) = under
        .is_within(manager.layout().chunks_x(), manager.layout().chunks_y())
        .then_some(under)
    else {
        debug!("Camera is outside the map, skipping chunk reload");
        return Ok(());
    };

    let fresh = generator.generate().context("Chunk regeneration failed")?;
    if let Some(field) = fresh.get(coord).cloned() {
        summary.add(&manager.reload_chunk(coord, field, sink)?);
    }
    Ok(())
}
