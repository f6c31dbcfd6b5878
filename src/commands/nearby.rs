use anyhow::Result;
use colored::*;

use fabidrop::{format_distance, DiscoveryEngine, Location};

use super::output::{format_rating, pad, print_json};
use super::{check_location, check_radius, Source};

pub fn run(
    source: &Source,
    location: Location,
    max_distance: Option<f64>,
    json: bool,
) -> Result<()> {
    check_location(&location)?;
    let ctx = source.load()?;
    let radius = max_distance.unwrap_or(ctx.config.default_max_distance_m);
    check_radius(radius)?;

    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());
    let sellers = engine.nearby_sellers(&location, Some(radius));

    if json {
        return print_json(&sellers);
    }

    println!("{}", "Nearby Sellers".bold());
    println!("{}", "=".repeat(60));
    println!(
        "Position: {:.4}, {:.4} (rayon {})",
        location.latitude,
        location.longitude,
        format_distance(radius)
    );
    println!("Found: {} sellers", sellers.len());
    println!();

    if sellers.is_empty() {
        println!("{}", "No sellers within range.".yellow());
        return Ok(());
    }

    for n in &sellers {
        let badge = if n.seller.is_verified { "✓".green() } else { " ".normal() };
        println!(
            "{:>7}  {} {} {}  {} produits",
            format_distance(n.distance_m),
            badge,
            pad(&n.seller.name, 28).cyan(),
            format_rating(n.seller.rating, n.seller.review_count),
            n.product_count
        );
        if let Some(city) = n.seller.city() {
            println!("           {}", city.dimmed());
        }
    }

    Ok(())
}
