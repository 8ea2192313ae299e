//! Driver configuration.
//!
//! Map generation, world geometry and camera settings, loaded from and
//! saved to a TOML file.

use scarp_common::{TerrainError, TerrainResult};
use scarp_world::{GeneratorConfig, MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "scarp.toml";

/// Driver configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    // === World ===
    /// Cell edge length in world units
    pub cell_size: f32,

    // === Camera ===
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Camera zoom
    pub zoom: f32,
    /// Camera pan per tick in world units
    pub pan_speed: f32,

    // === Run ===
    /// Number of ticks to drive
    pub ticks: u32,

    // === Map ===
    /// Map generation settings
    pub map: GeneratorConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            viewport_width: 64,
            viewport_height: 48,
            zoom: 1.0,
            pan_speed: 4.0,
            ticks: 120,
            map: GeneratorConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from a specific path, reporting any failure.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| TerrainError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join("scarp").join(CONFIG_FILE),
        )
    }

    /// Clamp presentation values to sensible ranges.
    ///
    /// Map dimensions, threshold, scale and cell size are left alone; the
    /// generator and chunk layout reject invalid values themselves.
    pub fn validate(&mut self) {
        // Camera
        self.viewport_width = self.viewport_width.clamp(16, 7680);
        self.viewport_height = self.viewport_height.clamp(16, 4320);
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        self.pan_speed = if self.pan_speed.is_finite() {
            self.pan_speed.clamp(0.0, 1000.0)
        } else {
            0.0
        };

        // Run
        self.ticks = self.ticks.clamp(1, 100_000);
    }
}
