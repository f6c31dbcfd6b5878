use anyhow::Result;
use colored::*;

use fabidrop::{DiscoveryEngine, DiscoveryQuery, DiscoveryResult, ProductCategory, SortMode};

use super::output::{print_json, print_more, print_product_rows};
use super::Source;
use crate::LocationArgs;

pub struct Options {
    pub keyword: String,
    pub category: Option<ProductCategory>,
    pub sort: SortMode,
    pub location: LocationArgs,
    pub available: bool,
    pub limit: Option<usize>,
    pub json: bool,
}

pub fn run(source: &Source, opts: Options) -> Result<()> {
    let ctx = source.load()?;
    let limit = opts.limit.unwrap_or(ctx.config.default_limit);

    let mut query = opts
        .location
        .apply(DiscoveryQuery::keyword(opts.keyword))?
        .sort(opts.sort)
        .limit(limit);
    if let Some(category) = opts.category {
        query = query.category(category);
    }
    if opts.available {
        query = query.available_only();
    }

    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());
    let result = engine.search(&query);

    if opts.json {
        return print_json(&result);
    }
    print_result("Search Results", &result);
    Ok(())
}

/// Shared by keyword and image search.
pub fn print_result(title: &str, result: &DiscoveryResult) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
    println!("Query: \"{}\"", result.query);
    println!("Sort: {}", result.sort.display_name());
    println!("Found: {} products", result.total);
    println!();

    if result.products.is_empty() {
        println!("{}", "No matches found.".yellow());
        return;
    }

    print_product_rows(&result.products);
    print_more(result.products.len(), result.total);
}
