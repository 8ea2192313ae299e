//! The cell grid built from one chunk's scalar field.

use glam::Vec2;
use scarp_common::ScalarField;
use tracing::trace;

use crate::cell::Cell;
use crate::mesher::{BoundaryPolygon, MeshBuffers};
use crate::node::{ControlNode, Node, NodeId};
use crate::table::{fan_triangles, MAX_POLYGON_POINTS};

/// Control nodes, their edge nodes and the `(nx-1) × (ny-1)` cells over them.
///
/// Rebuilt from scratch for every triangulation pass.
#[derive(Debug, Clone)]
pub struct CellGrid {
    node_count_x: u32,
    node_count_y: u32,
    cell_size: f32,
    map_width: f32,
    map_height: f32,
    /// Control nodes, x-major
    controls: Vec<ControlNode>,
    /// Three nodes per control node, see [`NodeId`]
    nodes: Vec<Node>,
    /// Cells, x-major
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Builds the grid for `field`, centred on `origin`.
    ///
    /// Control node `(x, y)` sits at
    /// `-map_size / 2 + (x, y) * cell_size + origin - cell_size / 2`,
    /// where `map_size` is the node count times `cell_size`.
    #[must_use]
    pub fn new(field: &ScalarField, cell_size: f32, origin: Vec2) -> Self {
        let node_count_x = field.width();
        let node_count_y = field.height();
        let map_width = node_count_x as f32 * cell_size;
        let map_height = node_count_y as f32 * cell_size;

        trace!(
            "Building cell grid {}x{} at ({}, {}), map {}x{}",
            node_count_x,
            node_count_y,
            origin.x,
            origin.y,
            map_width,
            map_height
        );

        let base = Vec2::new(-map_width / 2.0, -map_height / 2.0) + origin
            - Vec2::splat(cell_size / 2.0);

        let control_count = node_count_x as usize * node_count_y as usize;
        let mut controls = Vec::with_capacity(control_count);
        let mut nodes = Vec::with_capacity(NodeId::slots_for(control_count));

        // ScalarField is x-major too, so samples() lines up with the loop.
        let mut samples = field.samples().iter();
        for x in 0..node_count_x {
            for y in 0..node_count_y {
                let sample = samples.next().copied().unwrap_or(-1);
                let position = base + Vec2::new(x as f32, y as f32) * cell_size;
                let control = ControlNode::new(position, sample);

                nodes.push(Node::new(control.position));
                nodes.push(Node::new(control.above_position(cell_size)));
                nodes.push(Node::new(control.right_position(cell_size)));
                controls.push(control);
            }
        }

        let cells_x = node_count_x.saturating_sub(1);
        let cells_y = node_count_y.saturating_sub(1);
        let rows = node_count_y as usize;
        let control_index = |x: u32, y: u32| x as usize * rows + y as usize;

        let mut cells = Vec::with_capacity(cells_x as usize * cells_y as usize);
        for x in 0..cells_x {
            for y in 0..cells_y {
                // Row y is the bottom edge of cell y.
                cells.push(Cell::new(
                    control_index(x, y + 1),
                    control_index(x + 1, y + 1),
                    control_index(x + 1, y),
                    control_index(x, y),
                    &controls,
                ));
            }
        }

        Self {
            node_count_x,
            node_count_y,
            cell_size,
            map_width,
            map_height,
            controls,
            nodes,
            cells,
        }
    }

    /// Cells along x.
    #[must_use]
    pub const fn cells_x(&self) -> u32 {
        self.node_count_x.saturating_sub(1)
    }

    /// Cells along y.
    #[must_use]
    pub const fn cells_y(&self) -> u32 {
        self.node_count_y.saturating_sub(1)
    }

    /// Cell edge length in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Node count times cell size along x.
    #[must_use]
    pub const fn map_width(&self) -> f32 {
        self.map_width
    }

    /// Node count times cell size along y.
    #[must_use]
    pub const fn map_height(&self) -> f32 {
        self.map_height
    }

    /// All cells, x-major.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Gets the cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        if x >= self.cells_x() || y >= self.cells_y() {
            return None;
        }
        self.cells
            .get(x as usize * self.cells_y() as usize + y as usize)
    }

    /// Gets the control node for sample `(x, y)`.
    #[must_use]
    pub fn control(&self, x: u32, y: u32) -> Option<&ControlNode> {
        if x >= self.node_count_x || y >= self.node_count_y {
            return None;
        }
        self.controls
            .get(x as usize * self.node_count_y as usize + y as usize)
    }

    /// Gets a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Triangulates every cell into `buffers`, appending one boundary
    /// polygon per cell that has one.
    ///
    /// Nodes get their vertex index the first time any cell references
    /// them, so shared corners and edge midpoints produce one vertex each.
    pub fn triangulate(&mut self, buffers: &mut MeshBuffers, boundaries: &mut Vec<BoundaryPolygon>) {
        let Self { cells, nodes, .. } = self;

        for cell in cells.iter() {
            let polygon = cell.polygon();
            if polygon.is_empty() {
                continue;
            }

            let mut indices = [0u32; MAX_POLYGON_POINTS];
            for (slot, &point) in indices.iter_mut().zip(polygon) {
                *slot = nodes[cell.node(point).index()].vertex_index_or_insert(&mut buffers.vertices);
            }

            for [a, b, c] in fan_triangles(polygon.len()) {
                buffers
                    .triangles
                    .extend_from_slice(&[indices[a], indices[b], indices[c]]);
            }

            if cell.has_boundary() {
                let points = polygon
                    .iter()
                    .map(|&point| nodes[cell.node(point).index()].position)
                    .collect();
                boundaries.push(BoundaryPolygon::new(points));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellPoint;
    use std::collections::HashSet;

    fn field_from_rows(rows: &[&[i32]]) -> ScalarField {
        // rows[0] is the top row.
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        ScalarField::from_fn(width, height, |x, y| {
            rows[(height - 1 - y) as usize][x as usize]
        })
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = CellGrid::new(&ScalarField::new(5, 3), 1.0, Vec2::ZERO);
        assert_eq!(grid.cells_x(), 4);
        assert_eq!(grid.cells_y(), 2);
        assert_eq!(grid.cells().len(), 8);
        assert!((grid.map_width() - 5.0).abs() < f32::EPSILON);
        assert!((grid.map_height() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_degenerate_field_has_no_cells() {
        let grid = CellGrid::new(&ScalarField::new(1, 4), 1.0, Vec2::ZERO);
        assert_eq!(grid.cells_x(), 0);
        assert!(grid.cells().is_empty());
    }

    #[test]
    fn test_control_positions() {
        let grid = CellGrid::new(&ScalarField::new(4, 2), 2.0, Vec2::new(10.0, 20.0));
        // -8/2 + 0 + 10 - 1 = 5, -4/2 + 0 + 20 - 1 = 17
        let first = grid.control(0, 0).expect("control exists");
        assert_eq!(first.position, Vec2::new(5.0, 17.0));
        let last = grid.control(3, 1).expect("control exists");
        assert_eq!(last.position, Vec2::new(11.0, 19.0));
    }

    #[test]
    fn test_edge_node_positions() {
        let grid = CellGrid::new(&ScalarField::new(2, 2), 2.0, Vec2::ZERO);
        let cell = grid.cell(0, 0).expect("cell exists");
        let bl = grid
            .node(cell.node(CellPoint::BottomLeft))
            .expect("node")
            .position;
        let centre_left = grid
            .node(cell.node(CellPoint::CentreLeft))
            .expect("node")
            .position;
        let centre_bottom = grid
            .node(cell.node(CellPoint::CentreBottom))
            .expect("node")
            .position;
        assert_eq!(centre_left, bl + Vec2::new(0.0, 1.0));
        assert_eq!(centre_bottom, bl + Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_corner_order_inverts_y() {
        // Only the sample at row y=1 (top) is solid.
        let field = field_from_rows(&[&[5, -5], &[-5, -5]]);
        let grid = CellGrid::new(&field, 1.0, Vec2::ZERO);
        assert_eq!(grid.cell(0, 0).expect("cell").configuration(), 8);
    }

    #[test]
    fn test_diagonal_example() {
        // top-left and bottom-right solid
        let field = field_from_rows(&[&[60, -10], &[-5, 70]]);
        let mut grid = CellGrid::new(&field, 1.0, Vec2::ZERO);
        let cell = *grid.cell(0, 0).expect("cell");
        assert_eq!(cell.configuration(), 10);
        assert_eq!(
            cell.polygon(),
            &[
                CellPoint::TopLeft,
                CellPoint::CentreTop,
                CellPoint::CentreRight,
                CellPoint::BottomRight,
                CellPoint::CentreBottom,
                CellPoint::CentreLeft,
            ]
        );

        let mut buffers = MeshBuffers::default();
        let mut boundaries = Vec::new();
        grid.triangulate(&mut buffers, &mut boundaries);
        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(buffers.triangles(), &[0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5]);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].points().len(), 6);
    }

    #[test]
    fn test_neighbouring_cells_share_edge_nodes() {
        let grid = CellGrid::new(&ScalarField::new(3, 3), 1.0, Vec2::ZERO);
        let left = grid.cell(0, 0).expect("cell");
        let right = grid.cell(1, 0).expect("cell");
        let above = grid.cell(0, 1).expect("cell");

        assert_eq!(
            left.node(CellPoint::CentreRight),
            right.node(CellPoint::CentreLeft)
        );
        assert_eq!(
            left.node(CellPoint::CentreTop),
            above.node(CellPoint::CentreBottom)
        );
        assert_eq!(left.node(CellPoint::TopRight), right.node(CellPoint::TopLeft));
    }

    #[test]
    fn test_solid_grid_dedups_vertices() {
        let field = ScalarField::from_fn(4, 4, |_, _| 50);
        let mut grid = CellGrid::new(&field, 1.0, Vec2::ZERO);
        let mut buffers = MeshBuffers::default();
        let mut boundaries = Vec::new();
        grid.triangulate(&mut buffers, &mut boundaries);

        // Every corner is used once, no midpoints.
        assert_eq!(buffers.vertex_count(), 16);
        assert_eq!(buffers.triangle_count(), 9 * 2);
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_vertex_count_matches_distinct_nodes() {
        let field = field_from_rows(&[
            &[10, -3, 40, 40],
            &[-1, 20, -9, 40],
            &[30, 30, -2, -4],
            &[-7, 60, 15, -8],
        ]);
        let mut grid = CellGrid::new(&field, 1.0, Vec2::ZERO);
        let distinct: HashSet<NodeId> = grid
            .cells()
            .iter()
            .flat_map(|cell| cell.polygon().iter().map(move |&p| cell.node(p)))
            .collect();

        let mut buffers = MeshBuffers::default();
        let mut boundaries = Vec::new();
        grid.triangulate(&mut buffers, &mut boundaries);

        assert_eq!(buffers.vertex_count(), distinct.len());
        for id in &distinct {
            let node = grid.node(*id).expect("node");
            let index = node.vertex_index().expect("assigned") as usize;
            assert_eq!(buffers.vertices()[index], node.position.extend(0.0));
        }
    }
}
