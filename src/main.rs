mod commands;
#[cfg(feature = "mcp")]
mod mcp;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fabidrop::{DiscoveryQuery, Location, ProductCategory, SortMode};

#[derive(Parser)]
#[command(name = "fabidrop")]
#[command(about = "Fabidrop storefront discovery: search products and nearby sellers", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog document (.yaml/.yml/.json); the built-in sample is used if unset
    #[arg(long, global = true, env = "FABIDROP_CATALOG")]
    catalog: Option<PathBuf>,

    /// Config file (default: ./fabidrop.yaml when present)
    #[arg(long, global = true, env = "FABIDROP_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Caller position and optional radius filter.
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true, help = "Caller latitude")]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true, help = "Caller longitude")]
    pub lon: Option<f64>,
    #[arg(long, requires = "lat", help = "Only sellers within this many meters")]
    pub max_distance: Option<f64>,
    #[arg(long, requires = "lat", help = "Only sellers within the default radius")]
    pub nearby: bool,
}

impl LocationArgs {
    /// Caller position, rejected when out of range.
    pub fn location(&self) -> anyhow::Result<Option<Location>> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Ok(None);
        };
        let location = Location::new(lat, lon);
        commands::check_location(&location)?;
        Ok(Some(location))
    }

    /// Attach the position to a query. Without `--max-distance` or
    /// `--nearby` the position only feeds distance sorting.
    pub fn apply(&self, query: DiscoveryQuery) -> anyhow::Result<DiscoveryQuery> {
        let Some(location) = self.location()? else {
            return Ok(query);
        };
        let query = match (self.max_distance, self.nearby) {
            (Some(meters), _) => {
                commands::check_radius(meters)?;
                query.near(location).within(meters)
            }
            (None, true) => query.near(location),
            (None, false) => query.located_at(location),
        };
        Ok(query)
    }
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Keyword search over names, descriptions and tags
    Search {
        keyword: String,
        #[arg(long, short, help = "Filter by category")]
        category: Option<ProductCategory>,
        #[arg(
            long,
            short,
            default_value_t = SortMode::Relevance,
            help = "relevance|price-asc|price-desc|distance|rating"
        )]
        sort: SortMode,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, help = "In-stock products only")]
        available: bool,
        #[arg(long, short, value_parser = parse_limit, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Search by the labels a vision tagger produced for a photo
    #[command(name = "image-search", alias = "img")]
    ImageSearch {
        #[arg(long = "label", short = 'L', help = "Image label (repeatable)")]
        labels: Vec<String>,
        #[arg(long, help = "Image caption")]
        caption: Option<String>,
        #[arg(long, help = "Descriptor file (JSON: labels, caption, source)")]
        descriptor: Option<PathBuf>,
        #[arg(long, short, help = "Filter by category")]
        category: Option<ProductCategory>,
        #[arg(
            long,
            short,
            default_value_t = SortMode::Relevance,
            help = "relevance|price-asc|price-desc|distance|rating"
        )]
        sort: SortMode,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, short, value_parser = parse_limit, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Sellers near a position, closest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, help = "Radius in meters (default from config, 50000)")]
        max_distance: Option<f64>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show one product
    Product {
        id: String,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Seller profile with its products
    Seller {
        id: String,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Products sharing tags with a product
    Related {
        product: String,
        #[arg(long, help = "Minimum shared tags")]
        min_tags: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Available products from the best-rated sellers
    Trending {
        #[arg(long, short, value_parser = parse_limit, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Catalog summary
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Tag usage across products
    Tags {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Check a catalog document for consistency problems
    Validate {
        path: PathBuf,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Write the sample catalog to a file
    Init {
        #[arg(default_value = "catalog.yaml")]
        path: PathBuf,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },

    // ===== MCP Server =====
    /// Start MCP server on stdio
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show client configuration instructions")]
        install: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fabidrop=debug",
        _ => "fabidrop=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries JSON and the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = commands::Source {
        catalog: cli.catalog,
        config: cli.config,
    };

    match cli.command {
        Commands::Search {
            keyword,
            category,
            sort,
            location,
            available,
            limit,
            json,
        } => commands::search::run(
            &source,
            commands::search::Options {
                keyword,
                category,
                sort,
                location,
                available,
                limit,
                json,
            },
        ),
        Commands::ImageSearch {
            labels,
            caption,
            descriptor,
            category,
            sort,
            location,
            limit,
            json,
        } => commands::image_search::run(
            &source,
            commands::image_search::Options {
                labels,
                caption,
                descriptor,
                category,
                sort,
                location,
                limit,
                json,
            },
        ),
        Commands::Nearby {
            lat,
            lon,
            max_distance,
            json,
        } => commands::nearby::run(&source, Location::new(lat, lon), max_distance, json),
        Commands::Product { id, location, json } => {
            commands::product::run(&source, &id, &location, json)
        }
        Commands::Seller { id, location, json } => {
            commands::seller::run(&source, &id, &location, json)
        }
        Commands::Related {
            product,
            min_tags,
            json,
        } => commands::related::run(&source, &product, min_tags, json),
        Commands::Trending { limit, json } => commands::trending::run(&source, limit, json),
        Commands::Status { json } => commands::status::run(&source, json),
        Commands::Tags { json } => commands::tags::run(&source, json),
        Commands::Validate { path, json } => commands::validate::run(&path, json),
        Commands::Init { path, force } => commands::init::run(&path, force),

        // MCP Server
        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                run_mcp_server(&source)
            }
        }
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server(source: &commands::Source) -> anyhow::Result<()> {
    let ctx = source.load()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(ctx.catalog, ctx.config))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    use colored::Colorize;

    let catalog = std::env::current_dir()
        .map(|p| p.join("catalog.yaml").to_string_lossy().to_string())
        .unwrap_or_else(|_| "/path/to/catalog.yaml".to_string());

    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "fabidrop".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Add the following to your MCP client configuration:");
    println!();
    println!(r#"{{
  "mcpServers": {{
    "fabidrop": {{
      "command": "{}",
      "args": ["mcp", "--catalog", "{}"]
    }}
  }}
}}"#, binary_path, catalog);
    println!();
    println!("{}", "Available tools:".bold());
    println!("  • {} - Keyword search with filters and sorting", "storefront_search".green());
    println!("  • {} - Search by image labels", "storefront_image_search".green());
    println!("  • {} - Sellers near a position", "storefront_nearby_sellers".green());
    println!("  • {} - Product details", "storefront_get_product".green());
    println!("  • {} - Seller profile", "storefront_get_seller".green());
    println!("  • {} - Products sharing tags", "storefront_related".green());
    println!("  • {} - Catalog summary", "storefront_status".green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabidrop::search::query::Radius;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fabidrop").chain(args.iter().copied()))
    }

    fn search_location(cli: Cli) -> LocationArgs {
        match cli.command {
            Commands::Search { location, .. } => location,
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_limit_zero_rejected() {
        assert!(parse(&["search", "robe", "--limit", "0"]).is_err());
        assert!(parse(&["trending", "--limit", "0"]).is_err());
        assert!(parse(&["search", "robe", "--limit", "3"]).is_ok());
    }

    #[test]
    fn test_location_in_range() {
        let cli = parse(&["search", "robe", "--lat", "14.7167", "--lon", "-17.4677"]).unwrap();
        let location = search_location(cli).location().unwrap();
        assert_eq!(location, Some(Location::new(14.7167, -17.4677)));
    }

    #[test]
    fn test_location_out_of_range_rejected() {
        for (lat, lon) in [("165.2833", "162.5323"), ("14.7", "-200"), ("NaN", "-17.4")] {
            let cli = parse(&["search", "robe", "--lat", lat, "--lon", lon]).unwrap();
            assert!(search_location(cli).location().is_err());
        }
    }

    #[test]
    fn test_bad_radius_rejected() {
        for radius in ["--max-distance=-5", "--max-distance=NaN"] {
            let cli =
                parse(&["search", "robe", "--lat", "14.7", "--lon", "-17.4", radius]).unwrap();
            let query = search_location(cli).apply(DiscoveryQuery::keyword("robe"));
            assert!(query.is_err());
        }
    }

    #[test]
    fn test_radius_applied_with_position() {
        let cli = parse(&[
            "search", "robe", "--lat", "14.7", "--lon", "-17.4", "--max-distance", "2500",
        ])
        .unwrap();
        let query = search_location(cli).apply(DiscoveryQuery::keyword("robe")).unwrap();
        assert_eq!(query.location, Some(Location::new(14.7, -17.4)));
        assert_eq!(query.radius, Radius::Meters(2500.0));
    }

    #[test]
    fn test_radius_needs_position() {
        assert!(parse(&["search", "robe", "--max-distance", "1000"]).is_err());
        assert!(parse(&["search", "robe", "--nearby"]).is_err());
    }
}
