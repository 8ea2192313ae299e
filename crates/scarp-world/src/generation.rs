//! Procedural scalar field generation.

use std::time::{SystemTime, UNIX_EPOCH};

use noise::{NoiseFn, Perlin};
use scarp_common::{ChunkCoord, ConfigError, FieldGrid, ScalarField};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Exclusive upper bound of raw iso-values.
pub const ISO_RANGE: i32 = 100;

/// Lattice seed used for Perlin sampling when no seed is configured.
pub const DEFAULT_PERLIN_SEED: u32 = 0;

/// Map shape: a sampling strategy combined with a shape mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapShape {
    /// Uniform random samples, every sample eligible
    #[default]
    Block,
    /// Uniform random samples inside the inscribed circle
    Circle,
    /// Perlin samples, every sample eligible
    PerlinBlock,
    /// Perlin samples inside the inscribed circle
    PerlinCircle,
}

impl MapShape {
    /// The sampling strategy of this shape.
    #[must_use]
    pub const fn sampling(self) -> Sampling {
        match self {
            Self::Block | Self::Circle => Sampling::Random,
            Self::PerlinBlock | Self::PerlinCircle => Sampling::Perlin,
        }
    }

    /// The shape mask of this shape.
    #[must_use]
    pub const fn mask(self) -> ShapeMask {
        match self {
            Self::Block | Self::PerlinBlock => ShapeMask::Block,
            Self::Circle | Self::PerlinCircle => ShapeMask::Circle,
        }
    }
}

/// How raw iso-values are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Uniform in `[0, 100)` from a freshly seeded generator
    Random,
    /// `floor(perlin * 100)` at chunk-relative scaled coordinates
    Perlin,
}

/// Which samples may become solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMask {
    /// Every sample
    Block,
    /// Samples with `(x - r)² + (y - r)² <= r²`, `r = min(width, height) / 2`
    Circle,
}

impl ShapeMask {
    /// Whether the sample at absolute map coordinates `(x, y)` is eligible.
    #[must_use]
    pub fn accepts(self, x: u32, y: u32, radius: f32) -> bool {
        match self {
            Self::Block => true,
            Self::Circle => {
                let dx = x as f32 - radius;
                let dy = y as f32 - radius;
                dx * dx + dy * dy <= radius * radius
            },
        }
    }
}

/// Generator configuration.
///
/// Dimensions are signed so that invalid values coming from a config file
/// can be reported instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Map width in samples (dX)
    pub width: i32,
    /// Map height in samples (dY)
    pub height: i32,
    /// Chunk count along x
    pub chunks_x: i32,
    /// Chunk count along y
    pub chunks_y: i32,
    /// Sampling strategy and mask
    pub shape: MapShape,
    /// Iso-values below this become empty, `[0, 100]`
    pub threshold: i32,
    /// Perlin cycles per chunk
    pub scale: f32,
    /// Fixed seed; `None` reseeds from the clock on every generation
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            chunks_x: 4,
            chunks_y: 4,
            shape: MapShape::Block,
            threshold: 50,
            scale: 1.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Validates the configuration and derives the chunk layout.
    pub fn layout(&self) -> Result<MapLayout, ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width.into(),
                height: self.height.into(),
            });
        }
        if self.chunks_x <= 0 || self.chunks_y <= 0 {
            return Err(ConfigError::InvalidChunkCount {
                chunks_x: self.chunks_x.into(),
                chunks_y: self.chunks_y.into(),
            });
        }
        if self.width % self.chunks_x != 0 || self.height % self.chunks_y != 0 {
            return Err(ConfigError::NotDivisible {
                width: self.width.into(),
                height: self.height.into(),
                chunks_x: self.chunks_x.into(),
                chunks_y: self.chunks_y.into(),
            });
        }
        if !(0..=ISO_RANGE).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if !self.scale.is_finite() {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        Ok(MapLayout {
            width: self.width as u32,
            height: self.height as u32,
            chunks_x: self.chunks_x as u32,
            chunks_y: self.chunks_y as u32,
        })
    }
}

/// Validated map and chunk dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayout {
    /// Map width in samples
    pub width: u32,
    /// Map height in samples
    pub height: u32,
    /// Chunk count along x
    pub chunks_x: u32,
    /// Chunk count along y
    pub chunks_y: u32,
}

impl MapLayout {
    /// Samples per chunk along x.
    #[must_use]
    pub const fn chunk_width(&self) -> u32 {
        self.width / self.chunks_x
    }

    /// Samples per chunk along y.
    #[must_use]
    pub const fn chunk_height(&self) -> u32 {
        self.height / self.chunks_y
    }

    /// Radius of the circle inscribed in the map.
    #[must_use]
    pub fn fit_radius(&self) -> f32 {
        self.width.min(self.height) as f32 / 2.0
    }

    /// Total chunk count.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks_x as usize * self.chunks_y as usize
    }
}

/// Encodes a raw iso-value as a signed sample.
///
/// Rejected zeros become `-1` so that they still read as empty.
#[must_use]
pub const fn encode_sample(iso_value: i32, accepted: bool) -> i32 {
    if accepted {
        iso_value
    } else if iso_value == 0 {
        -1
    } else {
        -iso_value
    }
}

/// Produces the per-chunk scalar fields of a map.
#[derive(Debug)]
pub struct FieldGenerator {
    config: GeneratorConfig,
    /// Number of completed generations, mixed into clock seeds
    generation: u64,
}

impl FieldGenerator {
    /// Creates a generator. The configuration is validated on each
    /// [`generate`](Self::generate) call.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            generation: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the configuration for tuning (threshold, shape, scale).
    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        &mut self.config
    }

    /// Returns how many grids have been generated.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Generates every chunk's field.
    ///
    /// All fields are produced before the grid is returned; nothing is
    /// generated if the configuration is invalid.
    pub fn generate(&mut self) -> Result<FieldGrid, ConfigError> {
        let layout = self.config.layout()?;
        let mask = self.config.shape.mask();
        let radius = layout.fit_radius();
        let threshold = self.config.threshold;

        let fields = match self.config.shape.sampling() {
            Sampling::Random => {
                let seed = self.config.seed.unwrap_or_else(|| self.clock_seed());
                debug!("Random sampling with seed {seed}");
                let mut rng = fastrand::Rng::with_seed(seed);
                fill_chunks(&layout, mask, radius, threshold, |_, _| rng.i32(0..ISO_RANGE))
            },
            Sampling::Perlin => {
                let perlin = Perlin::new(
                    self.config
                        .seed
                        .map_or(DEFAULT_PERLIN_SEED, |s| s as u32),
                );
                let scale = f64::from(self.config.scale);
                let chunk_width = f64::from(layout.chunk_width());
                let chunk_height = f64::from(layout.chunk_height());
                fill_chunks(&layout, mask, radius, threshold, |x, y| {
                    let value = perlin.get([
                        f64::from(x) / chunk_width * scale,
                        f64::from(y) / chunk_height * scale,
                    ]);
                    perlin_iso(value)
                })
            },
        };

        let grid = FieldGrid::from_fields(
            layout.chunks_x,
            layout.chunks_y,
            layout.chunk_width(),
            layout.chunk_height(),
            fields,
        )?;

        self.generation += 1;
        info!(
            "Generated {:?} map {}x{} in {}x{} chunks (generation {})",
            self.config.shape,
            layout.width,
            layout.height,
            layout.chunks_x,
            layout.chunks_y,
            self.generation
        );
        Ok(grid)
    }

    /// A seed that differs between calls, even within one clock tick.
    fn clock_seed(&self) -> u64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        nanos ^ self.generation.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Maps Perlin output (`[-1, 1]`) to an iso-value in `[0, 100)`.
fn perlin_iso(value: f64) -> i32 {
    let unit = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    ((unit * f64::from(ISO_RANGE)).floor() as i32).min(ISO_RANGE - 1)
}

/// Fills every chunk, sampling `iso(x, y)` at absolute map coordinates.
fn fill_chunks(
    layout: &MapLayout,
    mask: ShapeMask,
    radius: f32,
    threshold: i32,
    mut iso: impl FnMut(u32, u32) -> i32,
) -> Vec<ScalarField> {
    let chunk_width = layout.chunk_width();
    let chunk_height = layout.chunk_height();

    ChunkCoord::iter_grid(layout.chunks_x, layout.chunks_y)
        .map(|coord| {
            let base_x = coord.x as u32 * chunk_width;
            let base_y = coord.y as u32 * chunk_height;
            ScalarField::from_fn(chunk_width, chunk_height, |lx, ly| {
                let (x, y) = (base_x + lx, base_y + ly);
                let value = iso(x, y);
                encode_sample(value, mask.accepts(x, y, radius) && value >= threshold)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(shape: MapShape) -> GeneratorConfig {
        GeneratorConfig {
            width: 16,
            height: 16,
            chunks_x: 2,
            chunks_y: 2,
            shape,
            threshold: 50,
            scale: 1.0,
            seed: Some(7),
        }
    }

    /// Absolute-coordinate sample lookup across chunks.
    fn sample_at(grid: &FieldGrid, x: u32, y: u32) -> i32 {
        let coord = ChunkCoord::new(
            (x / grid.chunk_width()) as i32,
            (y / grid.chunk_height()) as i32,
        );
        grid.get(coord)
            .and_then(|f| f.get(x % grid.chunk_width(), y % grid.chunk_height()))
            .expect("sample in range")
    }

    #[test]
    fn test_shape_split() {
        assert_eq!(MapShape::Block.sampling(), Sampling::Random);
        assert_eq!(MapShape::PerlinCircle.sampling(), Sampling::Perlin);
        assert_eq!(MapShape::PerlinCircle.mask(), ShapeMask::Circle);
        assert_eq!(MapShape::PerlinBlock.mask(), ShapeMask::Block);
    }

    #[test]
    fn test_rejects_non_divisible() {
        let mut gen = FieldGenerator::new(GeneratorConfig {
            width: 10,
            chunks_x: 3,
            ..config(MapShape::Block)
        });
        assert!(matches!(
            gen.generate(),
            Err(ConfigError::NotDivisible { .. })
        ));
        assert_eq!(gen.generation(), 0);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        for (width, height) in [(0, 16), (16, 0), (-4, 16)] {
            let mut gen = FieldGenerator::new(GeneratorConfig {
                width,
                height,
                ..config(MapShape::Block)
            });
            assert!(matches!(
                gen.generate(),
                Err(ConfigError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_zero_chunks() {
        let cfg = GeneratorConfig {
            chunks_y: 0,
            ..config(MapShape::Block)
        };
        assert!(matches!(
            cfg.layout(),
            Err(ConfigError::InvalidChunkCount { .. })
        ));
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        for threshold in [-1, 101] {
            let cfg = GeneratorConfig {
                threshold,
                ..config(MapShape::Block)
            };
            assert_eq!(
                cfg.layout(),
                Err(ConfigError::ThresholdOutOfRange(threshold))
            );
        }
    }

    #[test]
    fn test_rejects_nan_scale() {
        let cfg = GeneratorConfig {
            scale: f32::NAN,
            ..config(MapShape::PerlinBlock)
        };
        assert!(matches!(cfg.layout(), Err(ConfigError::InvalidScale(_))));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let a = FieldGenerator::new(config(MapShape::Block))
            .generate()
            .expect("valid");
        let b = FieldGenerator::new(config(MapShape::Block))
            .generate()
            .expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_clock_seed_differs_per_request() {
        let mut gen = FieldGenerator::new(GeneratorConfig {
            seed: None,
            ..config(MapShape::Block)
        });
        let a = gen.generate().expect("valid");
        let b = gen.generate().expect("valid");
        assert_ne!(a, b);
        assert_eq!(gen.generation(), 2);
    }

    #[test]
    fn test_random_magnitudes_in_range() {
        let grid = FieldGenerator::new(config(MapShape::Block))
            .generate()
            .expect("valid");
        for (_, field) in grid.iter() {
            for &v in field.samples() {
                assert!(v.unsigned_abs() < 100);
            }
        }
    }

    #[test]
    fn test_threshold_applied() {
        let grid = FieldGenerator::new(config(MapShape::Block))
            .generate()
            .expect("valid");
        for (_, field) in grid.iter() {
            for &v in field.samples() {
                if v >= 0 {
                    assert!(v >= 50);
                } else {
                    assert!(-v < 50 || v == -1);
                }
            }
        }
    }

    #[test]
    fn test_threshold_extremes() {
        let all = FieldGenerator::new(GeneratorConfig {
            threshold: 0,
            ..config(MapShape::Block)
        })
        .generate()
        .expect("valid");
        assert!(all.iter().all(|(_, f)| f.active_count() == 64));

        let none = FieldGenerator::new(GeneratorConfig {
            threshold: 100,
            ..config(MapShape::Block)
        })
        .generate()
        .expect("valid");
        assert!(none.iter().all(|(_, f)| f.active_count() == 0));
    }

    #[test]
    fn test_circle_masks_corner_sample() {
        for seed in 0..20 {
            let grid = FieldGenerator::new(GeneratorConfig {
                width: 10,
                height: 10,
                chunks_x: 1,
                chunks_y: 1,
                threshold: 0,
                seed: Some(seed),
                ..config(MapShape::Circle)
            })
            .generate()
            .expect("valid");
            assert!(sample_at(&grid, 9, 9) < 0, "seed {seed}");
            // The centre is always eligible at threshold 0.
            assert!(sample_at(&grid, 5, 5) >= 0, "seed {seed}");
        }
    }

    #[test]
    fn test_circle_mask_predicate() {
        let r = 5.0;
        assert!(ShapeMask::Circle.accepts(5, 5, r));
        assert!(ShapeMask::Circle.accepts(0, 5, r));
        assert!(!ShapeMask::Circle.accepts(9, 9, r));
        assert!(!ShapeMask::Circle.accepts(0, 0, r));
        assert!(ShapeMask::Block.accepts(9, 9, r));
    }

    #[test]
    fn test_encode_sample() {
        assert_eq!(encode_sample(42, true), 42);
        assert_eq!(encode_sample(42, false), -42);
        assert_eq!(encode_sample(0, true), 0);
        assert_eq!(encode_sample(0, false), -1);
    }

    #[test]
    fn test_perlin_is_deterministic() {
        let mut gen = FieldGenerator::new(GeneratorConfig {
            seed: None,
            ..config(MapShape::PerlinBlock)
        });
        let a = gen.generate().expect("valid");
        let b = gen.generate().expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_perlin_lattice_points_sit_mid_range() {
        // Chunk-relative scaling puts every chunk origin on a lattice point.
        let grid = FieldGenerator::new(GeneratorConfig {
            threshold: 0,
            seed: None,
            ..config(MapShape::PerlinBlock)
        })
        .generate()
        .expect("valid");
        assert_eq!(sample_at(&grid, 0, 0), 50);
        assert_eq!(sample_at(&grid, 8, 0), 50);
        assert_eq!(sample_at(&grid, 8, 8), 50);
    }

    #[test]
    fn test_perlin_iso_range() {
        assert_eq!(perlin_iso(-1.0), 0);
        assert_eq!(perlin_iso(0.0), 50);
        assert_eq!(perlin_iso(1.0), 99);
        assert_eq!(perlin_iso(3.0), 99);
    }

    proptest! {
        #[test]
        fn prop_grid_dimensions(
            chunks_x in 1i32..5,
            chunks_y in 1i32..5,
            chunk_w in 1i32..9,
            chunk_h in 1i32..9,
            perlin in any::<bool>(),
        ) {
            let shape = if perlin { MapShape::PerlinCircle } else { MapShape::Circle };
            let mut gen = FieldGenerator::new(GeneratorConfig {
                width: chunks_x * chunk_w,
                height: chunks_y * chunk_h,
                chunks_x,
                chunks_y,
                ..config(shape)
            });
            let grid = gen.generate().expect("valid");
            prop_assert_eq!(grid.len(), (chunks_x * chunks_y) as usize);
            for (_, field) in grid.iter() {
                prop_assert_eq!(field.width(), chunk_w as u32);
                prop_assert_eq!(field.height(), chunk_h as u32);
            }
        }
    }
}
