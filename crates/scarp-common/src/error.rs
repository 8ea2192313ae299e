//! Error types for Scarp.

use thiserror::Error;

/// Top-level error type for Scarp operations.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Configuration errors.
///
/// Raised before any state is mutated; the triggering operation is
/// abandoned and must be re-triggered by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Map dimensions must be positive
    #[error("Map dimension is not valid: {width}x{height}")]
    InvalidDimensions {
        /// Map width in samples
        width: i64,
        /// Map height in samples
        height: i64,
    },

    /// Chunk counts must be positive
    #[error("Chunk count is not valid: {chunks_x}x{chunks_y}")]
    InvalidChunkCount {
        /// Chunk count along x
        chunks_x: i64,
        /// Chunk count along y
        chunks_y: i64,
    },

    /// Map dimensions must be divisible by the chunk counts
    #[error("Map dimension {width}x{height} is not divisible by chunk grid {chunks_x}x{chunks_y}")]
    NotDivisible {
        /// Map width in samples
        width: i64,
        /// Map height in samples
        height: i64,
        /// Chunk count along x
        chunks_x: i64,
        /// Chunk count along y
        chunks_y: i64,
    },

    /// Chunk coordinate outside the chunk grid
    #[error("Chunk coordinate ({x}, {y}) outside chunk grid {chunks_x}x{chunks_y}")]
    ChunkOutOfRange {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
        /// Chunk count along x
        chunks_x: u32,
        /// Chunk count along y
        chunks_y: u32,
    },

    /// No scalar field grid has been loaded yet
    #[error("No scalar field grid loaded")]
    NoFieldLoaded,

    /// A scalar field (or field grid) has the wrong shape
    #[error("Field size mismatch: expected {expected_x}x{expected_y}, got {actual_x}x{actual_y}")]
    FieldSizeMismatch {
        /// Expected size along x
        expected_x: u32,
        /// Expected size along y
        expected_y: u32,
        /// Actual size along x
        actual_x: u32,
        /// Actual size along y
        actual_y: u32,
    },

    /// A field grid holds the wrong number of chunk fields
    #[error("Field grid holds {actual} chunk fields, expected {expected}")]
    ChunkCountMismatch {
        /// Expected field count
        expected: usize,
        /// Actual field count
        actual: usize,
    },

    /// Activation threshold outside `[0, 100]`
    #[error("Threshold {0} outside [0, 100]")]
    ThresholdOutOfRange(i32),

    /// Cell size must be positive and finite
    #[error("Cell size {0} must be positive")]
    InvalidCellSize(f32),

    /// Perlin scale must be finite
    #[error("Noise scale {0} must be finite")]
    InvalidScale(f32),
}

/// Result type alias for Scarp operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
