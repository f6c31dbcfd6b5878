use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::location::DEFAULT_MAX_DISTANCE_M;

pub const DEFAULT_CONFIG_FILE: &str = "fabidrop.yaml";
pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_IMAGE_MATCH_THRESHOLD: f32 = 0.25;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Discovery settings, read from `fabidrop.yaml` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Catalog document to load instead of the built-in sample.
    pub catalog: Option<PathBuf>,
    pub default_max_distance_m: f64,
    pub default_limit: usize,
    pub image_match_threshold: f32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            default_max_distance_m: DEFAULT_MAX_DISTANCE_M,
            default_limit: DEFAULT_LIMIT,
            image_match_threshold: DEFAULT_IMAGE_MATCH_THRESHOLD,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or defaults if `path` is `None` and no `fabidrop.yaml`
    /// exists in the working directory. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&text, &path)?;

        // Catalog paths are relative to the config file.
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() && !dir.as_os_str().is_empty() {
                *catalog = dir.join(&*catalog);
            }
        }

        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_max_distance_m.is_finite() && self.default_max_distance_m > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_max_distance_m must be positive, got {}",
                self.default_max_distance_m
            )));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid("default_limit must be at least 1".into()));
        }
        if !(-1.0..=1.0).contains(&self.image_match_threshold) {
            return Err(ConfigError::Invalid(format!(
                "image_match_threshold must be in [-1, 1], got {}",
                self.image_match_threshold
            )));
        }
        Ok(())
    }
}
