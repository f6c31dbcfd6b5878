use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::*;

use fabidrop::core::catalog_file::Format;
use fabidrop::core::sample::sample_catalog;
use fabidrop::CatalogFile;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let format = Format::from_path(path)?;
    let catalog = sample_catalog()?;
    let text = CatalogFile::from_catalog(&catalog).render(format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Wrote {} ({} sellers, {} products)",
        "✓".green(),
        path.display(),
        catalog.sellers().len(),
        catalog.products().len()
    );
    println!();
    println!("Use it with:");
    println!("  fabidrop --catalog {} status", path.display());

    Ok(())
}
