use anyhow::{anyhow, Result};
use colored::*;

use fabidrop::{format_distance, DiscoveryEngine};

use super::output::{format_price, format_rating, pad, print_json};
use super::Source;
use crate::LocationArgs;

pub fn run(source: &Source, id: &str, location: &LocationArgs, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());

    let origin = location.location()?;
    let profile = engine
        .seller_profile(id, origin.as_ref())
        .ok_or_else(|| anyhow!("Seller not found: {}", id))?;

    if json {
        return print_json(&profile);
    }

    let s = &profile.seller;
    let title = if s.is_verified {
        format!("{} {}", s.name.bold(), "✓ vérifié".green())
    } else {
        s.name.bold().to_string()
    };
    println!("{}", title);
    println!("{}", "=".repeat(60));
    println!("ID:       {}", s.id);
    println!("Rating:   {}", format_rating(s.rating, s.review_count));
    println!("Contact:  {}", s.contact_info);
    match s.city() {
        Some(city) => println!(
            "Location: {} ({:.4}, {:.4})",
            city, s.location.latitude, s.location.longitude
        ),
        None => println!("Location: {:.4}, {:.4}", s.location.latitude, s.location.longitude),
    }
    if let Some(d) = profile.distance_m {
        println!("Distance: {}", format_distance(d));
    }
    if let Some(description) = &s.description {
        println!();
        println!("{}", description);
    }

    println!();
    println!("{}", format!("Produits ({})", profile.products.len()).cyan());
    println!("{}", "-".repeat(30));
    if profile.products.is_empty() {
        println!("   {}", "Aucun produit".dimmed());
    }
    for p in &profile.products {
        let stock = if p.is_available() {
            format!("stock {}", p.stock).normal()
        } else {
            "rupture".red()
        };
        println!("   {} {:>12}  {}", pad(&p.name, 30), format_price(p.price), stock);
    }

    Ok(())
}
