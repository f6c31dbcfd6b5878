//! Discovery Engine
//!
//! Keyword and image search over the catalog, followed by category,
//! availability and distance filters and one of five sort modes.

pub mod embedding;
pub mod engine;
pub mod image;
pub mod keyword;
pub mod query;
pub mod ranking;

pub use engine::{DiscoveryEngine, DiscoveryResult, NearbySeller, RelatedProduct, SellerProfile};
pub use image::{EmbeddingImageMatcher, ImageDescriptor, ImageMatch, ImageMatcher};
pub use query::{DiscoveryQuery, Radius, SearchKind, SortMode};
pub use ranking::{rank_products, RankedProduct};
