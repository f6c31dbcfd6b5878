use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use fabidrop::CatalogFile;

#[derive(Serialize)]
struct ValidationResult {
    file: String,
    sellers: usize,
    products: usize,
    violations: usize,
    records_with_errors: Vec<RecordError>,
}

#[derive(Serialize)]
struct RecordError {
    record: String,
    errors: Vec<String>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let file = CatalogFile::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let violations = file.violations();

    let mut records_with_errors: Vec<RecordError> = Vec::new();
    for v in &violations {
        match records_with_errors.iter_mut().find(|r| r.record == v.record()) {
            Some(r) => r.errors.push(v.to_string()),
            None => records_with_errors.push(RecordError {
                record: v.record().to_string(),
                errors: vec![v.to_string()],
            }),
        }
    }

    let result = ValidationResult {
        file: path.display().to_string(),
        sellers: file.sellers.len(),
        products: file.products.len(),
        violations: violations.len(),
        records_with_errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }

    if result.violations > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(result: &ValidationResult) {
    println!("{}", "Catalog Validation Report".bold());
    println!("{}", "=".repeat(60));
    println!();
    println!("File: {}", result.file);
    println!("Sellers: {}  Products: {}", result.sellers, result.products);
    println!();

    if result.records_with_errors.is_empty() {
        println!("{}", "✓ No violations found!".green());
        return;
    }

    println!("{}", "Violations:".red().bold());
    println!("{}", "-".repeat(60));

    for record in &result.records_with_errors {
        println!();
        println!("{} {}", "RECORD:".cyan(), record.record);
        for err in &record.errors {
            println!("  {} {}", "•".red(), err);
        }
    }

    println!();
    println!(
        "{} {} in {} records",
        "Total:".bold(),
        result.violations.to_string().red(),
        result.records_with_errors.len()
    );
}
