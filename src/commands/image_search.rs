use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use fabidrop::{DiscoveryEngine, DiscoveryQuery, ImageDescriptor, ProductCategory, SortMode};

use super::output::print_json;
use super::search::print_result;
use super::Source;
use crate::LocationArgs;

pub struct Options {
    pub labels: Vec<String>,
    pub caption: Option<String>,
    pub descriptor: Option<PathBuf>,
    pub category: Option<ProductCategory>,
    pub sort: SortMode,
    pub location: LocationArgs,
    pub limit: Option<usize>,
    pub json: bool,
}

pub fn run(source: &Source, opts: Options) -> Result<()> {
    let descriptor = build_descriptor(&opts)?;
    if descriptor.is_empty() {
        bail!("Image search needs at least one --label, a --caption or a --descriptor file");
    }

    let ctx = source.load()?;
    let limit = opts.limit.unwrap_or(ctx.config.default_limit);

    let mut query = opts
        .location
        .apply(DiscoveryQuery::image(descriptor))?
        .sort(opts.sort)
        .limit(limit);
    if let Some(category) = opts.category {
        query = query.category(category);
    }

    let engine = DiscoveryEngine::new(&ctx.catalog, ctx.config.clone());
    let result = engine.search(&query);

    if opts.json {
        return print_json(&result);
    }
    print_result("Image Search Results", &result);
    Ok(())
}

/// Descriptor file first, then labels and caption from the command line on
/// top of it.
fn build_descriptor(opts: &Options) -> Result<ImageDescriptor> {
    let mut descriptor = match &opts.descriptor {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut d: ImageDescriptor = serde_json::from_str(&text)
                .with_context(|| format!("Invalid image descriptor {}", path.display()))?;
            if d.source.is_none() {
                d.source = Some(path.display().to_string());
            }
            d
        }
        None => ImageDescriptor::default(),
    };

    descriptor.labels.extend(opts.labels.iter().cloned());
    if let Some(caption) = &opts.caption {
        descriptor.caption = Some(caption.clone());
    }
    Ok(descriptor)
}
