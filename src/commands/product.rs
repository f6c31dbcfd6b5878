use anyhow::{anyhow, Result};
use colored::*;

use fabidrop::{format_distance, DiscoveryEngine};

use super::output::{format_price, print_json};
use super::Source;
use crate::LocationArgs;

pub fn run(source: &Source, id: &str, location: &LocationArgs, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());

    let origin = location.location()?;
    let details = engine
        .product_details(id, origin.as_ref())
        .ok_or_else(|| anyhow!("Product not found: {}", id))?;

    if json {
        return print_json(&details);
    }

    let p = &details.product;
    println!("{}", p.name.bold());
    println!("{}", "=".repeat(60));
    println!("ID:        {}", p.id);
    println!("Category:  {}", p.category.display_name());
    println!("Price:     {}", format_price(p.price));
    if p.is_available() {
        println!("Stock:     {}", p.stock.to_string().green());
    } else {
        println!("Stock:     {}", "rupture de stock".red());
    }

    let seller = details.seller_name.as_deref().unwrap_or("?");
    match (&details.city, details.seller_rating) {
        (Some(city), Some(rating)) => {
            println!("Seller:    {} ({}, ★ {:.1})", seller, city, rating)
        }
        (None, Some(rating)) => println!("Seller:    {} (★ {:.1})", seller, rating),
        _ => println!("Seller:    {} [{}]", seller, p.seller_id),
    }
    if let Some(d) = details.distance_m {
        println!("Distance:  {}", format_distance(d));
    }
    if !p.tags.is_empty() {
        println!("Tags:      {}", p.tags.join(", ").cyan());
    }

    if !p.description.is_empty() {
        println!();
        println!("{}", p.description);
    }

    if !p.images.is_empty() {
        println!();
        println!("{}", "Images".dimmed());
        for image in &p.images {
            println!("  {}", image.dimmed());
        }
    }

    Ok(())
}
