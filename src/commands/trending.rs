use anyhow::Result;
use colored::*;

use fabidrop::DiscoveryEngine;

use super::output::{print_json, print_product_rows};
use super::Source;

pub fn run(source: &Source, limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let limit = limit.unwrap_or(ctx.config.default_limit);

    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());
    let trending = engine.trending(limit);

    if json {
        return print_json(&trending);
    }

    println!("{}", "Trending".bold());
    println!("{}", "=".repeat(60));
    println!();

    if trending.is_empty() {
        println!("{}", "No products in stock.".yellow());
    } else {
        print_product_rows(&trending);
    }

    Ok(())
}
