//! Chunk coordinates and chunk-grid indexing.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Chunk coordinate (identifies a chunk in the map's chunk grid).
///
/// Signed so that callers can hand in arbitrary coordinates; range
/// checking against a concrete grid happens in [`ChunkCoord::to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns whether the coordinate lies inside a `chunks_x × chunks_y` grid.
    #[must_use]
    pub const fn is_within(self, chunks_x: u32, chunks_y: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < chunks_x && (self.y as u32) < chunks_y
    }

    /// Converts to a linear index into an x-major chunk array.
    ///
    /// Returns `None` if the coordinate is outside the grid.
    #[must_use]
    pub const fn to_index(self, chunks_x: u32, chunks_y: u32) -> Option<usize> {
        if !self.is_within(chunks_x, chunks_y) {
            return None;
        }
        Some(self.x as usize * chunks_y as usize + self.y as usize)
    }

    /// Like [`ChunkCoord::to_index`], but reports out-of-range coordinates
    /// as a [`ConfigError`].
    pub fn checked_index(self, chunks_x: u32, chunks_y: u32) -> Result<usize, ConfigError> {
        self.to_index(chunks_x, chunks_y)
            .ok_or(ConfigError::ChunkOutOfRange {
                x: self.x,
                y: self.y,
                chunks_x,
                chunks_y,
            })
    }

    /// Creates from a linear index into an x-major chunk array.
    ///
    /// Returns `None` for a grid with no rows.
    #[must_use]
    pub const fn from_index(index: usize, chunks_y: u32) -> Option<Self> {
        let rows = chunks_y as usize;
        match (index.checked_div(rows), index.checked_rem(rows)) {
            (Some(x), Some(y)) => Some(Self {
                x: x as i32,
                y: y as i32,
            }),
            _ => None,
        }
    }

    /// Iterates every coordinate of a `chunks_x × chunks_y` grid in index order.
    pub fn iter_grid(chunks_x: u32, chunks_y: u32) -> impl Iterator<Item = Self> {
        (0..chunks_x).flat_map(move |x| (0..chunks_y).map(move |y| Self::new(x as i32, y as i32)))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
