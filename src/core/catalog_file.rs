//! Catalog documents on disk (YAML or JSON).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CatalogError};
use super::product::Product;
use super::schema::{self, CatalogViolation};
use super::seller::Seller;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported catalog format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Raw, unvalidated catalog records as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub sellers: Vec<Seller>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl CatalogFile {
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let format = Format::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format)
    }

    pub fn parse(text: &str, format: Format) -> Result<Self, LoadError> {
        let file = match format {
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Json => serde_json::from_str(text)?,
        };
        Ok(file)
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            sellers: catalog.sellers().to_vec(),
            products: catalog.products().to_vec(),
        }
    }

    pub fn render(&self, format: Format) -> Result<String, LoadError> {
        let text = match format {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(text)
    }

    pub fn violations(&self) -> Vec<CatalogViolation> {
        schema::validate_records(&self.sellers, &self.products)
    }

    pub fn into_catalog(self) -> Result<Catalog, LoadError> {
        Ok(Catalog::new(self.sellers, self.products)?)
    }
}

/// Read and validate a catalog document.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let catalog = CatalogFile::read(path)?.into_catalog()?;
    tracing::info!(
        path = %path.display(),
        sellers = catalog.sellers().len(),
        products = catalog.products().len(),
        "catalog loaded"
    );
    Ok(catalog)
}
