//! Cells: 2×2 windows of control nodes classified by corner activity.

use crate::node::{ControlNode, NodeId};
use crate::table;

/// Bit weight of each corner in a cell configuration.
pub mod corner_weight {
    /// Top-left corner.
    pub const TOP_LEFT: u8 = 8;
    /// Top-right corner.
    pub const TOP_RIGHT: u8 = 4;
    /// Bottom-right corner.
    pub const BOTTOM_RIGHT: u8 = 2;
    /// Bottom-left corner.
    pub const BOTTOM_LEFT: u8 = 1;
}

/// The eight named points of a cell: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellPoint {
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Bottom-right corner
    BottomRight,
    /// Bottom-left corner
    BottomLeft,
    /// Midpoint of the top edge
    CentreTop,
    /// Midpoint of the right edge
    CentreRight,
    /// Midpoint of the bottom edge
    CentreBottom,
    /// Midpoint of the left edge
    CentreLeft,
}

impl CellPoint {
    /// Returns whether this point is a corner (a sample) rather than a midpoint.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft
        )
    }
}

/// Computes the 4-bit configuration of a cell from its corners' activity.
#[must_use]
pub const fn configuration(
    top_left: bool,
    top_right: bool,
    bottom_right: bool,
    bottom_left: bool,
) -> u8 {
    let mut config = 0;
    if top_left {
        config += corner_weight::TOP_LEFT;
    }
    if top_right {
        config += corner_weight::TOP_RIGHT;
    }
    if bottom_right {
        config += corner_weight::BOTTOM_RIGHT;
    }
    if bottom_left {
        config += corner_weight::BOTTOM_LEFT;
    }
    config
}

/// A cell of the marching-squares grid.
///
/// Holds indices of its four corner control nodes. Its edge midpoints are
/// not stored: they are the `right`/`above` nodes of its corners, which is
/// what makes neighbouring cells share them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    top_left: usize,
    top_right: usize,
    bottom_right: usize,
    bottom_left: usize,
    configuration: u8,
}

impl Cell {
    /// Creates a cell from four control-node indices into `controls`.
    #[must_use]
    pub fn new(
        top_left: usize,
        top_right: usize,
        bottom_right: usize,
        bottom_left: usize,
        controls: &[ControlNode],
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            configuration: configuration(
                controls[top_left].active,
                controls[top_right].active,
                controls[bottom_right].active,
                controls[bottom_left].active,
            ),
        }
    }

    /// The cell's configuration in `0..=15`.
    #[must_use]
    pub const fn configuration(&self) -> u8 {
        self.configuration
    }

    /// Resolves a named cell point to the node it refers to.
    #[must_use]
    pub const fn node(&self, point: CellPoint) -> NodeId {
        match point {
            CellPoint::TopLeft => NodeId::corner(self.top_left),
            CellPoint::TopRight => NodeId::corner(self.top_right),
            CellPoint::BottomRight => NodeId::corner(self.bottom_right),
            CellPoint::BottomLeft => NodeId::corner(self.bottom_left),
            CellPoint::CentreTop => NodeId::right(self.top_left),
            CellPoint::CentreRight => NodeId::above(self.bottom_right),
            CellPoint::CentreBottom => NodeId::right(self.bottom_left),
            CellPoint::CentreLeft => NodeId::above(self.bottom_left),
        }
    }

    /// The polygon this cell emits, in table order.
    #[must_use]
    pub const fn polygon(&self) -> &'static [CellPoint] {
        table::polygon(self.configuration)
    }

    /// Whether this cell emits a boundary polygon for collision.
    #[must_use]
    pub const fn has_boundary(&self) -> bool {
        table::emits_boundary(self.configuration)
    }
}
