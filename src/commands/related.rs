use anyhow::{anyhow, Result};
use colored::*;

use fabidrop::DiscoveryEngine;

use super::output::{format_price, pad, print_json};
use super::Source;

const SHOW_MAX: usize = 20;

pub fn run(source: &Source, product_id: &str, min_tags: Option<usize>, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let target = ctx
        .catalog
        .get_product(product_id)
        .ok_or_else(|| anyhow!("Product not found: {}", product_id))?;

    let min_shared = min_tags.unwrap_or(1);
    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());
    let related = engine.related_products(product_id, min_shared);

    if json {
        return print_json(&related);
    }

    println!("{}", "Related Products".bold());
    println!("{}", "=".repeat(60));
    println!("Source: {}", target.name.cyan());
    println!("Tags: {}", target.tags.join(", "));
    println!("Minimum shared tags: {}", min_shared);
    println!();

    if target.tags.is_empty() {
        println!("{}", format!("Product '{}' has no tags.", product_id).yellow());
        return Ok(());
    }

    if related.is_empty() {
        println!("{}", "No related products found.".yellow());
        return Ok(());
    }

    println!("Found {} related products:", related.len());
    println!();
    for r in related.iter().take(SHOW_MAX) {
        println!(
            "  {} {:>12}  ({} shared: {})",
            pad(&r.product.name, 30).cyan(),
            format_price(r.product.price),
            r.shared_tags.len(),
            r.shared_tags.join(", ")
        );
    }

    if related.len() > SHOW_MAX {
        println!();
        println!("{}", format!("... and {} more", related.len() - SHOW_MAX).dimmed());
    }

    Ok(())
}
