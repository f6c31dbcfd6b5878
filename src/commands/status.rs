use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Local;
use colored::*;
use serde::Serialize;

use fabidrop::core::stats::CatalogStats;

use super::output::{format_price, print_json};
use super::Source;

#[derive(Serialize)]
struct CatalogStatus {
    timestamp: String,
    #[serde(flatten)]
    stats: CatalogStats,
    warnings: Vec<Warning>,
}

#[derive(Serialize)]
struct Warning {
    target: String,
    warning_type: String,
    message: String,
}

pub fn run(source: &Source, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let stats = CatalogStats::compute(&ctx.catalog);

    let mut warnings = Vec::new();
    for p in ctx.catalog.products().iter().filter(|p| !p.is_available()) {
        warnings.push(Warning {
            target: p.id.clone(),
            warning_type: "out_of_stock".to_string(),
            message: format!("{} en rupture de stock", p.name),
        });
    }
    for id in &stats.sellers_without_products {
        warnings.push(Warning {
            target: id.clone(),
            warning_type: "no_products".to_string(),
            message: "vendeur sans produit".to_string(),
        });
    }

    let status = CatalogStatus {
        timestamp: Local::now().to_rfc3339(),
        stats,
        warnings,
    };

    if json {
        return print_json(&status);
    }
    print_status(&status);
    Ok(())
}

fn print_status(status: &CatalogStatus) {
    let stats = &status.stats;

    println!("{}", "Catalog Status".bold());
    println!("{}", "=".repeat(50));
    println!();
    println!("Checked at: {}", status.timestamp);
    println!();

    println!("{}", "Totals".cyan());
    println!("{}", "-".repeat(30));
    println!("   {:<16} {:>4}", "Products", stats.total_products);
    println!("   {:<16} {:>4}", "Available", stats.available_products);
    println!("   {:<16} {:>4}", "Out of stock", stats.out_of_stock);
    println!("   {:<16} {:>4}", "Sellers", stats.total_sellers);
    println!("   {:<16} {:>4}", "Verified", stats.verified_sellers);
    if let (Some(min), Some(max)) = (stats.min_price, stats.max_price) {
        println!("   {:<16} {} - {}", "Prices", format_price(min), format_price(max));
    }
    println!();

    print_distribution("Products by category", &stats.by_category, stats.total_products);
    print_distribution("Sellers by city", &stats.by_city, stats.total_sellers);

    if !status.warnings.is_empty() {
        println!("{}", "⚠️  Needs attention".yellow());
        println!("{}", "-".repeat(30));
        for w in &status.warnings {
            println!("   {}: {}", w.target, w.message);
        }
        println!();
    }

    println!("{}", "=".repeat(50));
}

fn print_distribution(title: &str, dist: &BTreeMap<String, usize>, total: usize) {
    println!("{}", title.cyan());
    println!("{}", "-".repeat(30));
    for (key, count) in dist {
        let pct = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("   {:<16} {:>4} ({:.0}%)", key, count, pct);
    }
    println!();
}
