use anyhow::Result;
use colored::*;
use serde::Serialize;

use fabidrop::core::stats::{tag_usage, TagUsage};

use super::output::print_json;
use super::Source;

#[derive(Serialize)]
struct TagsReport {
    total_products: usize,
    products_without_tags: usize,
    total_tag_uses: usize,
    unique_tags: usize,
    tag_usage: Vec<TagUsage>,
}

pub fn run(source: &Source, json: bool) -> Result<()> {
    let ctx = source.load()?;
    let products = ctx.catalog.products();
    let usage = tag_usage(&ctx.catalog);

    let report = TagsReport {
        total_products: products.len(),
        products_without_tags: products.iter().filter(|p| p.tags.is_empty()).count(),
        total_tag_uses: usage.iter().map(|u| u.count).sum(),
        unique_tags: usage.len(),
        tag_usage: usage,
    };

    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &TagsReport) {
    println!("{}", "Catalog Tag Usage".bold());
    println!("{}", "=".repeat(60));
    println!();
    println!("Total products: {}", report.total_products);
    println!("Products without tags: {}", report.products_without_tags);
    println!("Total tag uses: {}", report.total_tag_uses);
    println!("Unique tags: {}", report.unique_tags);
    println!();

    println!("{}", "Tag Usage (sorted by count):".cyan().bold());
    println!("{}", "-".repeat(60));

    for usage in &report.tag_usage {
        let count = format!("{:>3}", usage.count);
        let count = if usage.count >= 3 {
            count.green()
        } else if usage.count == 2 {
            count.yellow()
        } else {
            count.normal()
        };
        println!("  {} × {}  {}", count, usage.tag, usage.products.join(", ").dimmed());
    }
}
