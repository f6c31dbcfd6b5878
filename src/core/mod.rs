pub mod catalog;
pub mod catalog_file;
pub mod config;
pub mod location;
pub mod product;
pub mod sample;
pub mod schema;
pub mod seller;
pub mod stats;
