pub mod image_search;
pub mod init;
pub mod nearby;
pub mod output;
pub mod product;
pub mod related;
pub mod search;
pub mod seller;
pub mod status;
pub mod tags;
pub mod trending;
pub mod validate;

use std::path::PathBuf;

use anyhow::{ensure, Context as _, Result};

use fabidrop::core::location::is_valid_radius;
use fabidrop::core::sample::sample_catalog;
use fabidrop::{load_catalog, Catalog, DiscoveryConfig, Location};

/// Where the catalog and config come from, as given on the command line.
pub struct Source {
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub struct Context {
    pub config: DiscoveryConfig,
    pub catalog: Catalog,
}

impl Source {
    /// Load the config, then the catalog: `--catalog`, then the config's
    /// `catalog`, then the built-in sample.
    pub fn load(&self) -> Result<Context> {
        let config =
            DiscoveryConfig::load(self.config.as_deref()).context("Failed to load config")?;

        let catalog = match self.catalog.as_ref().or(config.catalog.as_ref()) {
            Some(path) => load_catalog(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
            None => {
                tracing::info!("no catalog configured, using the built-in sample");
                sample_catalog().context("Built-in sample catalog is invalid")?
            }
        };

        Ok(Context { config, catalog })
    }
}

pub fn check_location(location: &Location) -> Result<()> {
    ensure!(
        location.is_valid(),
        "Invalid position ({}, {}): latitude must be in [-90, 90], longitude in [-180, 180]",
        location.latitude,
        location.longitude
    );
    Ok(())
}

pub fn check_radius(meters: f64) -> Result<()> {
    ensure!(
        is_valid_radius(meters),
        "Invalid distance {}: must be a non-negative number of meters",
        meters
    );
    Ok(())
}
