//! Scalar fields: the signed sample grids chunks are triangulated from.
//!
//! A sample's sign encodes activation (`value >= 0` means solid) and its
//! magnitude is the raw iso-value the generator drew.

use serde::{Deserialize, Serialize};

use crate::coords::ChunkCoord;
use crate::error::ConfigError;

/// A `width × height` grid of signed iso-samples for one chunk.
///
/// Indexed `(x, y)` with `y` growing upward in world space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarField {
    width: u32,
    height: u32,
    /// Samples, x-major (`x * height + y`)
    data: Vec<i32>,
}

impl ScalarField {
    /// Creates a field of all-zero samples.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Creates a field by evaluating `f(x, y)` at every sample.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> i32) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns the width in samples.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in samples.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    const fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x as usize * self.height as usize + y as usize)
    }

    /// Gets the sample at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<i32> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Returns whether the sample at `(x, y)` is active (solid).
    #[must_use]
    pub fn is_active(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some_and(|v| v >= 0)
    }

    /// Returns the number of active samples.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.data.iter().filter(|&&v| v >= 0).count()
    }

    /// Returns all samples, x-major.
    #[must_use]
    pub fn samples(&self) -> &[i32] {
        &self.data
    }
}

/// The full map: one [`ScalarField`] per chunk of a `chunks_x × chunks_y` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGrid {
    chunks_x: u32,
    chunks_y: u32,
    chunk_width: u32,
    chunk_height: u32,
    fields: Vec<ScalarField>,
}

impl FieldGrid {
    /// Builds a grid from fields in [`ChunkCoord::iter_grid`] order.
    ///
    /// Every field must be `chunk_width × chunk_height` and there must be
    /// exactly `chunks_x * chunks_y` of them.
    pub fn from_fields(
        chunks_x: u32,
        chunks_y: u32,
        chunk_width: u32,
        chunk_height: u32,
        fields: Vec<ScalarField>,
    ) -> Result<Self, ConfigError> {
        if fields.len() != chunks_x as usize * chunks_y as usize {
            return Err(ConfigError::ChunkCountMismatch {
                expected: chunks_x as usize * chunks_y as usize,
                actual: fields.len(),
            });
        }
        for field in &fields {
            check_shape(field, chunk_width, chunk_height)?;
        }
        Ok(Self {
            chunks_x,
            chunks_y,
            chunk_width,
            chunk_height,
            fields,
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

    /// Samples per chunk along x.
    #[must_use]
    pub const fn chunk_width(&self) -> u32 {
        self.chunk_width
    }

    /// Samples per chunk along y.
    #[must_use]
    pub const fn chunk_height(&self) -> u32 {
        self.chunk_height
    }

    /// Returns the number of chunk fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the grid holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Gets the field for a chunk.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&ScalarField> {
        coord
            .to_index(self.chunks_x, self.chunks_y)
            .and_then(|i| self.fields.get(i))
    }

    /// Replaces one chunk's field, returning the previous one.
    ///
    /// Nothing is mutated if the coordinate or the field shape is wrong.
    pub fn replace(
        &mut self,
        coord: ChunkCoord,
        field: ScalarField,
    ) -> Result<ScalarField, ConfigError> {
        let index = coord.checked_index(self.chunks_x, self.chunks_y)?;
        check_shape(&field, self.chunk_width, self.chunk_height)?;
        Ok(std::mem::replace(&mut self.fields[index], field))
    }

    /// Iterates `(coord, field)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &ScalarField)> {
        let chunks_y = self.chunks_y;
        self.fields
            .iter()
            .enumerate()
            .filter_map(move |(i, f)| ChunkCoord::from_index(i, chunks_y).map(|c| (c, f)))
    }
}

fn check_shape(field: &ScalarField, width: u32, height: u32) -> Result<(), ConfigError> {
    if field.width() != width || field.height() != height {
        return Err(ConfigError::FieldSizeMismatch {
            expected_x: width,
            expected_y: height,
            actual_x: field.width(),
            actual_y: field.height(),
        });
    }
    Ok(())
}
