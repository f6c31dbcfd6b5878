//! Storefront MCP Server implementation

use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fabidrop::core::stats::CatalogStats;
use fabidrop::core::location::is_valid_radius;
use fabidrop::core::product::UnknownCategory;
use fabidrop::search::query::UnknownSortMode;
use fabidrop::search::{
    EmbeddingImageMatcher, NearbySeller, RankedProduct, RelatedProduct, SellerProfile,
};
use fabidrop::{
    Catalog, DiscoveryConfig, DiscoveryEngine, DiscoveryQuery, DiscoveryResult, ImageDescriptor,
    Location, ProductCategory, SortMode,
};

const MAX_SEARCH_LIMIT: usize = 100;

/// Parameters for storefront_search tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Keyword matched against product names, descriptions and tags
    #[schemars(description = "Keyword (case-insensitive, e.g. \"robe\")")]
    pub query: String,
    #[schemars(description = "Category: fashion, beauty, tech, home, other")]
    #[serde(default)]
    pub category: Option<String>,
    #[schemars(description = "Sort: relevance, price-asc, price-desc, distance, rating")]
    #[serde(default)]
    pub sort: Option<String>,
    #[schemars(description = "Caller latitude (requires longitude)")]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[schemars(description = "Caller longitude (requires latitude)")]
    #[serde(default)]
    pub longitude: Option<f64>,
    #[schemars(description = "Only sellers within this many meters of the caller")]
    #[serde(default)]
    pub max_distance_m: Option<f64>,
    #[schemars(description = "Only sellers within the default radius (50 km)")]
    #[serde(default)]
    pub nearby: bool,
    #[schemars(description = "Only products in stock")]
    #[serde(default)]
    pub available_only: bool,
    #[schemars(description = "Maximum results (default: 20, max: 100)")]
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for storefront_image_search tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ImageSearchParams {
    /// Labels produced by a vision tagger for the photo
    #[schemars(description = "Image labels (e.g. [\"robe\", \"rouge\"])")]
    #[serde(default)]
    pub labels: Vec<String>,
    #[schemars(description = "Image caption")]
    #[serde(default)]
    pub caption: Option<String>,
    #[schemars(description = "Category: fashion, beauty, tech, home, other")]
    #[serde(default)]
    pub category: Option<String>,
    #[schemars(description = "Sort: relevance, price-asc, price-desc, distance, rating")]
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub max_distance_m: Option<f64>,
    #[schemars(description = "Maximum results (default: 20, max: 100)")]
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for storefront_nearby_sellers tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    #[schemars(description = "Radius in meters (default: 50000)")]
    #[serde(default)]
    pub max_distance_m: Option<f64>,
}

/// Parameters for storefront_get_product tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetProductParams {
    #[schemars(description = "Product id (e.g. \"prod1\")")]
    pub product_id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Parameters for storefront_get_seller tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSellerParams {
    #[schemars(description = "Seller id (e.g. \"seller1\")")]
    pub seller_id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Parameters for storefront_related tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RelatedParams {
    pub product_id: String,
    #[schemars(description = "Minimum shared tags (default: 1)")]
    #[serde(default)]
    pub min_shared_tags: Option<usize>,
}

#[derive(Debug, Serialize)]
struct NotFound {
    error: String,
}

/// Storefront MCP Service
#[derive(Clone)]
pub struct StorefrontService {
    catalog: Arc<Catalog>,
    config: DiscoveryConfig,
    matcher: Arc<EmbeddingImageMatcher>,
    tool_router: ToolRouter<Self>,
}

impl StorefrontService {
    pub fn new(catalog: Catalog, config: DiscoveryConfig) -> Self {
        // Product embeddings are built once and shared by every call.
        let matcher = EmbeddingImageMatcher::with_threshold(&catalog, config.image_match_threshold);
        Self {
            catalog: Arc::new(catalog),
            config,
            matcher: Arc::new(matcher),
            tool_router: Self::tool_router(),
        }
    }

    fn engine(&self) -> DiscoveryEngine<'_> {
        DiscoveryEngine::with_matcher(&self.catalog, self.config.clone(), Arc::clone(&self.matcher))
    }

    fn search_limit(&self, requested: Option<usize>) -> usize {
        clamp_limit(requested, self.config.default_limit, MAX_SEARCH_LIMIT)
    }

    fn run_search(&self, p: &SearchParams) -> Result<DiscoveryResult, McpError> {
        let query = DiscoveryQuery::keyword(p.query.clone());
        let query = refine(
            query,
            p.category.as_deref(),
            p.sort.as_deref(),
            origin(p.latitude, p.longitude)?,
            p.max_distance_m,
            p.nearby,
        )?;
        let mut query = query.limit(self.search_limit(p.limit));
        if p.available_only {
            query = query.available_only();
        }
        Ok(self.engine().search(&query))
    }

    fn run_image_search(&self, p: &ImageSearchParams) -> Result<DiscoveryResult, McpError> {
        let mut descriptor = ImageDescriptor::from_labels(p.labels.iter().cloned());
        descriptor.caption = p.caption.clone();
        if descriptor.is_empty() {
            return Err(McpError::invalid_params("labels or caption required", None));
        }

        let query = refine(
            DiscoveryQuery::image(descriptor),
            p.category.as_deref(),
            p.sort.as_deref(),
            origin(p.latitude, p.longitude)?,
            p.max_distance_m,
            false,
        )?;
        Ok(self.engine().search(&query.limit(self.search_limit(p.limit))))
    }

    fn run_nearby(&self, p: &NearbyParams) -> Result<Vec<NearbySeller>, McpError> {
        let location = checked_location(p.latitude, p.longitude)?;
        if let Some(meters) = p.max_distance_m {
            check_radius(meters)?;
        }
        Ok(self.engine().nearby_sellers(&location, p.max_distance_m))
    }

    fn run_get_product(&self, p: &GetProductParams) -> Result<Option<RankedProduct>, McpError> {
        let origin = origin(p.latitude, p.longitude)?;
        Ok(self.engine().product_details(&p.product_id, origin.as_ref()))
    }

    fn run_get_seller(&self, p: &GetSellerParams) -> Result<Option<SellerProfile>, McpError> {
        let origin = origin(p.latitude, p.longitude)?;
        Ok(self.engine().seller_profile(&p.seller_id, origin.as_ref()))
    }

    fn run_related(&self, p: &RelatedParams) -> Vec<RelatedProduct> {
        self.engine()
            .related_products(&p.product_id, p.min_shared_tags.unwrap_or(1))
    }
}

#[tool_router]
impl StorefrontService {
    #[tool(description = "Search Fabidrop products by keyword (name, description, tags). Supports category filter, sort modes, caller position with optional radius, stock filter and limit.")]
    async fn storefront_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.run_search(&params.0)?;
        json_result(&result)
    }

    #[tool(description = "Find Fabidrop products similar to a photo, given the labels and caption a vision tagger produced for it.")]
    async fn storefront_image_search(
        &self,
        params: Parameters<ImageSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.run_image_search(&params.0)?;
        json_result(&result)
    }

    #[tool(description = "List Fabidrop sellers within a radius of a position, closest first, with their distance and product count.")]
    async fn storefront_nearby_sellers(
        &self,
        params: Parameters<NearbyParams>,
    ) -> Result<CallToolResult, McpError> {
        let sellers = self.run_nearby(&params.0)?;
        json_result(&sellers)
    }

    #[tool(description = "Get a Fabidrop product with its seller name, rating, city and (given a position) distance.")]
    async fn storefront_get_product(
        &self,
        params: Parameters<GetProductParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.run_get_product(&params.0)? {
            Some(details) => json_result(&details),
            None => not_found(format!("Product not found: {}", params.0.product_id)),
        }
    }

    #[tool(description = "Get a Fabidrop seller profile with all of its products.")]
    async fn storefront_get_seller(
        &self,
        params: Parameters<GetSellerParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.run_get_seller(&params.0)? {
            Some(profile) => json_result(&profile),
            None => not_found(format!("Seller not found: {}", params.0.seller_id)),
        }
    }

    #[tool(description = "List Fabidrop products sharing tags with a given product, most shared tags first.")]
    async fn storefront_related(
        &self,
        params: Parameters<RelatedParams>,
    ) -> Result<CallToolResult, McpError> {
        json_result(&self.run_related(&params.0))
    }

    #[tool(description = "Get Fabidrop catalog summary: product and seller counts, availability, categories, cities and price range.")]
    async fn storefront_status(&self) -> Result<CallToolResult, McpError> {
        json_result(&CatalogStats::compute(&self.catalog))
    }
}

#[tool_handler]
impl ServerHandler for StorefrontService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Fabidrop storefront MCP Server. Search products by keyword or image labels, find nearby sellers and browse seller profiles.".to_string()
            ),
            ..Default::default()
        }
    }
}

fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    let output = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(output)]))
}

fn not_found(error: String) -> Result<CallToolResult, McpError> {
    json_result(&NotFound { error })
}

/// Clamp a requested limit to `1..=max`, `default` when absent.
fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max)
}

fn checked_location(latitude: f64, longitude: f64) -> Result<Location, McpError> {
    let location = Location::new(latitude, longitude);
    if !location.is_valid() {
        return Err(McpError::invalid_params(
            format!(
                "invalid position ({}, {}): latitude must be within ±90, longitude within ±180",
                latitude, longitude
            ),
            None,
        ));
    }
    Ok(location)
}

fn check_radius(meters: f64) -> Result<(), McpError> {
    if !is_valid_radius(meters) {
        return Err(McpError::invalid_params(
            format!("invalid max_distance_m {}: must be a non-negative number", meters),
            None,
        ));
    }
    Ok(())
}

fn origin(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Location>, McpError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => checked_location(lat, lon).map(Some),
        (None, None) => Ok(None),
        _ => Err(McpError::invalid_params(
            "latitude and longitude must be given together",
            None,
        )),
    }
}

fn refine(
    mut query: DiscoveryQuery,
    category: Option<&str>,
    sort: Option<&str>,
    origin: Option<Location>,
    max_distance_m: Option<f64>,
    nearby: bool,
) -> Result<DiscoveryQuery, McpError> {
    if let Some(category) = category {
        let category: ProductCategory = category
            .parse()
            .map_err(|e: UnknownCategory| McpError::invalid_params(e.to_string(), None))?;
        query = query.category(category);
    }
    if let Some(sort) = sort {
        let sort: SortMode = sort
            .parse()
            .map_err(|e: UnknownSortMode| McpError::invalid_params(e.to_string(), None))?;
        query = query.sort(sort);
    }
    let Some(location) = origin else {
        if max_distance_m.is_some() || nearby {
            return Err(McpError::invalid_params(
                "max_distance_m and nearby need latitude and longitude",
                None,
            ));
        }
        return Ok(query);
    };
    query = match (max_distance_m, nearby) {
        (Some(meters), _) => {
            check_radius(meters)?;
            query.near(location).within(meters)
        }
        (None, true) => query.near(location),
        (None, false) => query.located_at(location),
    };
    Ok(query)
}

/// Run the MCP server
pub async fn run_mcp_server(catalog: Catalog, config: DiscoveryConfig) -> Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!(
        sellers = catalog.sellers().len(),
        products = catalog.products().len(),
        "starting storefront MCP server on stdio"
    );

    let service = StorefrontService::new(catalog, config);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
