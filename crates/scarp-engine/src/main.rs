//! # Scarp
//!
//! Headless driver for the Scarp destructible-terrain core.
//!
//! Ties the subsystems together:
//! - World: map generation, culling and chunk lifecycle
//! - Mesh: marching-squares triangulation and collider polygons
//!
//! Usage: `scarp [CONFIG_PATH]` runs the driver. Without a path the
//! platform config directory is used, falling back to defaults.
//! `scarp --init [CONFIG_PATH]` writes a default config file and exits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::TerrainConfig;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("scarp=info".parse()?))
        .init();

    info!("Scarp starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let mut config = match args.next().as_deref() {
        Some("--init") => {
            let path = args.next().map_or_else(TerrainConfig::config_path, Into::into);
            TerrainConfig::default().save_to(path)?;
            return Ok(());
        },
        Some(path) => TerrainConfig::load_from(path),
        None => TerrainConfig::load(),
    };
    config.validate();

    let summary = app::run(&config)?;

    info!(
        "Scarp shutdown complete after {} generations",
        summary.generations
    );
    Ok(())
}
