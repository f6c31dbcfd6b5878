//! fabidrop library
//!
//! Product and seller discovery for the Fabidrop storefront.
//!
//! # Modules
//!
//! - `core`: Catalog Store, data model, catalog files, configuration
//! - `search`: Discovery Engine (keyword/image search, distance filter, ranking)

pub mod core;
pub mod search;

// Re-exports for convenience
pub use core::catalog::{Catalog, CatalogError};
pub use core::catalog_file::{load_catalog, CatalogFile, LoadError};
pub use core::config::DiscoveryConfig;
pub use core::location::{format_distance, Location, DEFAULT_MAX_DISTANCE_M};
pub use core::product::{Product, ProductCategory};
pub use core::schema::CatalogViolation;
pub use core::seller::Seller;
pub use search::{DiscoveryEngine, DiscoveryQuery, DiscoveryResult, ImageDescriptor, SortMode};
