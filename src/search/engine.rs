//! Discovery Engine - keyword/image search, distance filter and ranking
//! over a borrowed catalog.

use std::collections::HashSet;

use serde::Serialize;

use super::image::{EmbeddingImageMatcher, ImageMatcher};
use super::keyword::KeywordMatcher;
use super::query::{DiscoveryQuery, Radius, SearchInput, SearchKind, SortMode};
use super::ranking::{apply_filters, sort_candidates, Candidate, Filters, RankedProduct};
use crate::core::catalog::Catalog;
use crate::core::config::DiscoveryConfig;
use crate::core::location::{is_valid_radius, Location};
use crate::core::product::Product;
use crate::core::seller::Seller;

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub kind: SearchKind,
    pub query: String,
    pub sort: SortMode,
    /// Matches before `limit` was applied.
    pub total: usize,
    pub products: Vec<RankedProduct>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbySeller {
    pub seller: Seller,
    pub distance_m: f64,
    pub product_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedProduct {
    pub product: Product,
    pub shared_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerProfile {
    pub seller: Seller,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    pub products: Vec<Product>,
}

pub struct DiscoveryEngine<'a> {
    catalog: &'a Catalog,
    matcher: Box<dyn ImageMatcher + 'a>,
    config: DiscoveryConfig,
}

impl<'a> DiscoveryEngine<'a> {
    /// Engine with the default embedding image matcher.
    pub fn new(catalog: &'a Catalog, config: DiscoveryConfig) -> Self {
        let matcher = EmbeddingImageMatcher::with_threshold(catalog, config.image_match_threshold);
        Self::with_matcher(catalog, config, matcher)
    }

    pub fn with_matcher(
        catalog: &'a Catalog,
        config: DiscoveryConfig,
        matcher: impl ImageMatcher + 'a,
    ) -> Self {
        Self {
            catalog,
            matcher: Box::new(matcher),
            config,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run a discovery query: match, filter, sort, truncate.
    pub fn search(&self, query: &DiscoveryQuery) -> DiscoveryResult {
        let origin = query.location.as_ref();

        if !self.is_valid_geo(query) {
            tracing::debug!(query = %query.display_text(), "invalid caller location or radius");
            return DiscoveryResult {
                kind: query.kind(),
                query: query.display_text(),
                sort: query.sort,
                total: 0,
                products: Vec::new(),
            };
        }

        let candidates: Vec<Candidate<'a>> = match &query.input {
            SearchInput::Keyword(keyword) => match KeywordMatcher::new(keyword) {
                Some(matcher) => self
                    .catalog
                    .products()
                    .iter()
                    .filter(|p| matcher.is_match(p))
                    .map(|p| Candidate::resolve(self.catalog, p, origin))
                    .collect(),
                None => Vec::new(),
            },
            SearchInput::Image(descriptor) => self
                .matcher
                .find_matches(descriptor)
                .into_iter()
                // matcher ids that no longer resolve are skipped
                .filter_map(|m| {
                    let product = self.catalog.get_product(&m.product_id)?;
                    Some(Candidate::resolve(self.catalog, product, origin).with_score(m.score))
                })
                .collect(),
        };
        let matched = candidates.len();

        let filters = Filters {
            category: query.category,
            available_only: query.available_only,
            max_distance_m: origin.and_then(|_| self.resolve_radius(query.radius)),
        };
        let mut candidates = apply_filters(candidates, &filters);
        sort_candidates(&mut candidates, query.sort);

        let total = candidates.len();
        if let Some(limit) = query.limit {
            candidates.truncate(limit);
        }

        tracing::debug!(
            kind = ?query.kind(),
            query = %query.display_text(),
            sort = %query.sort,
            matched,
            total,
            "discovery query"
        );

        DiscoveryResult {
            kind: query.kind(),
            query: query.display_text(),
            sort: query.sort,
            total,
            products: candidates.iter().map(RankedProduct::from).collect(),
        }
    }

    fn is_valid_geo(&self, query: &DiscoveryQuery) -> bool {
        let origin_ok = query.location.as_ref().map_or(true, Location::is_valid);
        let radius_ok = match query.radius {
            Radius::Meters(m) => is_valid_radius(m),
            Radius::Unbounded | Radius::Default => true,
        };
        origin_ok && radius_ok
    }

    fn resolve_radius(&self, radius: Radius) -> Option<f64> {
        match radius {
            Radius::Unbounded => None,
            Radius::Default => Some(self.config.default_max_distance_m),
            Radius::Meters(m) => Some(m),
        }
    }

    /// Sellers within `max_distance_m` (default radius when `None`), closest
    /// first. Empty for an invalid location or radius.
    pub fn nearby_sellers(
        &self,
        location: &Location,
        max_distance_m: Option<f64>,
    ) -> Vec<NearbySeller> {
        let max = max_distance_m.unwrap_or(self.config.default_max_distance_m);
        if !location.is_valid() || !is_valid_radius(max) {
            return Vec::new();
        }

        let mut nearby: Vec<NearbySeller> = self
            .catalog
            .sellers()
            .iter()
            .map(|s| (s, location.distance_to(&s.location)))
            .filter(|(_, d)| *d <= max)
            .map(|(s, d)| NearbySeller {
                seller: s.clone(),
                distance_m: d,
                product_count: self.catalog.products_by_seller(&s.id).len(),
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby
    }

    /// Distance is reported only for a valid `location`.
    pub fn product_details(
        &self,
        product_id: &str,
        location: Option<&Location>,
    ) -> Option<RankedProduct> {
        let product = self.catalog.get_product(product_id)?;
        let location = location.filter(|l| l.is_valid());
        Some(RankedProduct::from(&Candidate::resolve(self.catalog, product, location)))
    }

    pub fn seller_profile(
        &self,
        seller_id: &str,
        location: Option<&Location>,
    ) -> Option<SellerProfile> {
        let seller = self.catalog.get_seller(seller_id)?;
        let location = location.filter(|l| l.is_valid());
        Some(SellerProfile {
            seller: seller.clone(),
            distance_m: location.map(|l| l.distance_to(&seller.location)),
            products: self
                .catalog
                .products_by_seller(seller_id)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Other products sharing at least `min_shared_tags` distinct tags
    /// (case-insensitive), most shared first.
    pub fn related_products(
        &self,
        product_id: &str,
        min_shared_tags: usize,
    ) -> Vec<RelatedProduct> {
        let Some(target) = self.catalog.get_product(product_id) else {
            return Vec::new();
        };
        let target_tags: HashSet<String> = target.tags.iter().map(|t| t.to_lowercase()).collect();
        if target_tags.is_empty() {
            return Vec::new();
        }
        let min_shared = min_shared_tags.max(1);

        let mut related: Vec<RelatedProduct> = self
            .catalog
            .products()
            .iter()
            .filter(|p| p.id != target.id)
            .filter_map(|p| {
                let mut seen = HashSet::new();
                let shared: Vec<String> = p
                    .tags
                    .iter()
                    .map(|t| t.to_lowercase())
                    .filter(|t| target_tags.contains(t) && seen.insert(t.clone()))
                    .collect();
                (shared.len() >= min_shared).then(|| RelatedProduct {
                    product: p.clone(),
                    shared_tags: shared,
                })
            })
            .collect();

        related.sort_by(|a, b| b.shared_tags.len().cmp(&a.shared_tags.len()));
        related
    }

    /// Available products from the best-rated, most-reviewed sellers.
    pub fn trending(&self, limit: usize) -> Vec<RankedProduct> {
        let mut candidates: Vec<Candidate<'a>> = self
            .catalog
            .products()
            .iter()
            .filter(|p| p.is_available())
            .map(|p| Candidate::resolve(self.catalog, p, None))
            .collect();

        candidates.sort_by(|a, b| {
            let key = |c: &Candidate<'_>| {
                c.seller
                    .map(|s| (s.rating, s.review_count))
                    .unwrap_or((0.0, 0))
            };
            let (ra, na) = key(a);
            let (rb, nb) = key(b);
            rb.total_cmp(&ra).then(nb.cmp(&na))
        });
        candidates.truncate(limit);

        candidates.iter().map(RankedProduct::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::product::ProductCategory;
    use crate::core::sample::sample_catalog;
    use crate::search::image::{ImageDescriptor, ImageMatch};

    fn engine(catalog: &Catalog) -> DiscoveryEngine<'_> {
        DiscoveryEngine::new(catalog, DiscoveryConfig::default())
    }

    fn ids(result: &DiscoveryResult) -> Vec<&str> {
        result.products.iter().map(|r| r.product.id.as_str()).collect()
    }

    fn dakar() -> Location {
        Location::with_city(14.7167, -17.4677, "Dakar")
    }

    #[test]
    fn test_keyword_search_any_case() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);
        for q in ["robe", "ROBE", "Robe"] {
            let result = engine.search(&DiscoveryQuery::keyword(q));
            assert_eq!(ids(&result), vec!["prod1"]);
            assert_eq!(result.kind, SearchKind::Keyword);
        }
    }

    #[test]
    fn test_blank_keyword_is_empty() {
        let catalog = sample_catalog().unwrap();
        let result = engine(&catalog).search(&DiscoveryQuery::keyword("  "));
        assert!(result.products.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_default_radius_scenario() {
        // Seller A at the caller, seller B 60 km north.
        let origin = Location::new(14.0, -17.0);
        let a = Seller::new("A", "Près", origin.clone(), "");
        let b = Seller::new("B", "Loin", Location::new(14.0 + 60_000.0 / 111_195.0, -17.0), "");
        let products = vec![
            Product::new("pa", "Pagne wax", "tissu", 5000.0, 3, "A", ProductCategory::Fashion),
            Product::new("pb", "Pagne bazin", "tissu", 7000.0, 3, "B", ProductCategory::Fashion),
        ];
        let catalog = Catalog::new(vec![a, b], products).unwrap();
        let engine = engine(&catalog);

        let result = engine.search(&DiscoveryQuery::keyword("pagne").near(origin.clone()));
        assert_eq!(ids(&result), vec!["pa"]);

        // location alone does not filter
        let result = engine.search(&DiscoveryQuery::keyword("pagne").located_at(origin));
        assert_eq!(ids(&result), vec!["pa", "pb"]);
    }

    #[test]
    fn test_distance_filter_bound_holds() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);
        let origin = dakar();
        for radius in [1.0, 10_000.0, 60_000.0, 80_000.0] {
            let query = DiscoveryQuery::keyword("e").near(origin.clone()).within(radius);
            let result = engine.search(&query);
            for row in &result.products {
                let seller = catalog.get_seller(&row.product.seller_id).unwrap();
                assert!(origin.distance_to(&seller.location) <= radius);
            }
        }
    }

    #[test]
    fn test_category_filter_then_sort_and_limit() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);
        let query = DiscoveryQuery::keyword("e")
            .category(ProductCategory::Fashion)
            .sort(SortMode::PriceDesc)
            .limit(2);
        let result = engine.search(&query);

        // fashion products containing "e": prod1, prod4, prod8
        assert_eq!(result.total, 3);
        assert_eq!(ids(&result), vec!["prod4", "prod1"]);
    }

    #[test]
    fn test_distance_sort_from_thies() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);
        let thies = Location::new(14.7833, -16.9333);
        let query = DiscoveryQuery::keyword("e")
            .located_at(thies)
            .sort(SortMode::Distance);
        let result = engine.search(&query);
        assert_eq!(result.total, 8);
        // Thiès itself, then Tivaouane (~22 km), then Dakar (~58 km)
        assert_eq!(&ids(&result)[..3], &["prod2", "prod5", "prod7"]);
        let distances: Vec<f64> = result.products.iter().filter_map(|r| r.distance_m).collect();
        assert_eq!(distances.len(), 8);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_image_search_uses_matcher_order() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);
        let descriptor = ImageDescriptor::from_labels(["robe", "rouge"]);
        let result = engine.search(&DiscoveryQuery::image(descriptor));
        assert_eq!(result.kind, SearchKind::Image);
        assert_eq!(result.products.first().map(|r| r.product.id.as_str()), Some("prod1"));
        assert!(result.products.iter().all(|r| r.score.is_some()));
        assert_eq!(result.query, "robe, rouge");
    }

    struct FixedMatcher(Vec<ImageMatch>);

    impl ImageMatcher for FixedMatcher {
        fn find_matches(&self, _image: &ImageDescriptor) -> Vec<ImageMatch> {
            self.0.clone()
        }
    }

    #[test]
    fn test_image_search_with_custom_matcher() {
        let catalog = sample_catalog().unwrap();
        let matcher = FixedMatcher(vec![
            ImageMatch { product_id: "prod6".into(), score: 0.9 },
            ImageMatch { product_id: "missing".into(), score: 0.8 },
            ImageMatch { product_id: "prod2".into(), score: 0.7 },
            ImageMatch { product_id: "prod3".into(), score: 0.6 },
        ]);
        let engine = DiscoveryEngine::with_matcher(&catalog, DiscoveryConfig::default(), matcher);

        let query = DiscoveryQuery::image(ImageDescriptor::from_labels(["x"]));
        assert_eq!(ids(&engine.search(&query)), vec!["prod6", "prod2", "prod3"]);

        let query = query.category(ProductCategory::Beauty).sort(SortMode::PriceAsc);
        assert_eq!(ids(&engine.search(&query)), vec!["prod3", "prod6"]);
    }

    #[test]
    fn test_nearby_sellers() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);

        let near: Vec<_> = engine
            .nearby_sellers(&dakar(), None)
            .into_iter()
            .map(|n| (n.seller.id, n.product_count))
            .collect();
        assert_eq!(near, vec![("seller1".to_string(), 3), ("seller2".to_string(), 2)]);

        let wide = engine.nearby_sellers(&dakar(), Some(100_000.0));
        let order: Vec<_> = wide.iter().map(|n| n.seller.id.as_str()).collect();
        assert_eq!(order, vec!["seller1", "seller2", "seller3", "seller4"]);
    }

    #[test]
    fn test_invalid_origin_gives_empty_result() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);

        for bogus in [
            Location::new(165.2833, 162.5323),
            Location::new(14.7, -200.0),
            Location::new(f64::NAN, -17.4677),
        ] {
            assert!(engine.nearby_sellers(&bogus, None).is_empty());

            let result = engine.search(&DiscoveryQuery::keyword("e").near(bogus.clone()));
            assert_eq!(result.total, 0);
            assert!(result.products.is_empty());

            let result = engine.search(&DiscoveryQuery::keyword("e").located_at(bogus.clone()));
            assert_eq!(result.total, 0);

            let details = engine.product_details("prod1", Some(&bogus)).unwrap();
            assert!(details.distance_m.is_none());
        }
    }

    #[test]
    fn test_invalid_radius_gives_empty_result() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);

        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let query = DiscoveryQuery::keyword("e").near(dakar()).within(radius);
            assert_eq!(engine.search(&query).total, 0);
            assert!(engine.nearby_sellers(&dakar(), Some(radius)).is_empty());
        }
        // zero is a valid radius: only sellers at the exact spot
        assert_eq!(engine.nearby_sellers(&dakar(), Some(0.0)).len(), 2);
    }

    #[test]
    fn test_related_products() {
        let mut catalog = sample_catalog().unwrap();
        let robe = Product::new(
            "prod9",
            "Robe Bleue",
            "Robe de soirée",
            30000.0,
            2,
            "seller4",
            ProductCategory::Fashion,
        )
        .with_tags(["Robe", "robe", "occasion", "bleu"]);
        catalog.insert_product(robe).unwrap();
        let engine = engine(&catalog);

        let related = engine.related_products("prod1", 1);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].product.id, "prod9");
        assert_eq!(related[0].shared_tags, vec!["robe", "occasion"]);

        assert!(engine.related_products("prod1", 3).is_empty());
        assert!(engine.related_products("missing", 1).is_empty());
    }

    #[test]
    fn test_trending_is_deterministic() {
        let mut catalog = sample_catalog().unwrap();
        catalog.set_stock("prod5", 0).unwrap();
        let engine = engine(&catalog);

        let trending = engine.trending(3);
        let ids: Vec<_> = trending.iter().map(|r| r.product.id.as_str()).collect();
        // seller3 (4.8) then seller1 (4.6); prod5 is out of stock
        assert_eq!(ids, vec!["prod2", "prod1", "prod4"]);
    }

    #[test]
    fn test_seller_profile_and_details() {
        let catalog = sample_catalog().unwrap();
        let engine = engine(&catalog);

        let profile = engine.seller_profile("seller2", Some(&dakar())).unwrap();
        let ids: Vec<_> = profile.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prod3", "prod6"]);
        assert!(profile.distance_m.unwrap() < 1.0);
        assert!(engine.seller_profile("nobody", None).is_none());

        let details = engine.product_details("prod2", Some(&dakar())).unwrap();
        assert_eq!(details.seller_name.as_deref(), Some("Tech Store Thiès"));
        assert_eq!(details.city.as_deref(), Some("Thiès"));
        assert!(details.distance_m.unwrap() > 50_000.0);
        assert!(engine.product_details("nope", None).is_none());
    }
}
