//! Catalog summaries for the `status` and `tags` reports.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::catalog::Catalog;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_sellers: usize,
    pub available_products: usize,
    pub out_of_stock: usize,
    pub verified_sellers: usize,
    pub sellers_without_products: Vec<String>,
    pub by_category: BTreeMap<String, usize>,
    pub by_city: BTreeMap<String, usize>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl CatalogStats {
    pub fn compute(catalog: &Catalog) -> Self {
        let products = catalog.products();
        let sellers = catalog.sellers();

        let mut by_category = BTreeMap::new();
        for p in products {
            *by_category.entry(p.category.to_string()).or_insert(0) += 1;
        }

        let mut by_city = BTreeMap::new();
        for s in sellers {
            let city = s.city().unwrap_or("unknown").to_string();
            *by_city.entry(city).or_insert(0) += 1;
        }

        let available_products = products.iter().filter(|p| p.is_available()).count();
        let prices = products.iter().map(|p| p.price);

        Self {
            total_products: products.len(),
            total_sellers: sellers.len(),
            available_products,
            out_of_stock: products.len() - available_products,
            verified_sellers: sellers.iter().filter(|s| s.is_verified).count(),
            sellers_without_products: sellers
                .iter()
                .filter(|s| catalog.products_by_seller(&s.id).is_empty())
                .map(|s| s.id.clone())
                .collect(),
            by_category,
            by_city,
            min_price: prices.clone().reduce(f64::min),
            max_price: prices.reduce(f64::max),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagUsage {
    pub tag: String,
    pub count: usize,
    pub products: Vec<String>,
}

/// Tag usage across products (case-insensitive), most used first, then
/// alphabetical.
pub fn tag_usage(catalog: &Catalog) -> Vec<TagUsage> {
    let mut tag_products: HashMap<String, Vec<String>> = HashMap::new();

    for p in catalog.products() {
        for tag in &p.tags {
            let entry = tag_products.entry(tag.to_lowercase()).or_default();
            if !entry.contains(&p.id) {
                entry.push(p.id.clone());
            }
        }
    }

    let mut usage: Vec<TagUsage> = tag_products
        .into_iter()
        .map(|(tag, products)| TagUsage {
            tag,
            count: products.len(),
            products,
        })
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Location;
    use crate::core::product::{Product, ProductCategory};
    use crate::core::sample::sample_catalog;
    use crate::core::seller::Seller;

    #[test]
    fn test_sample_stats() {
        let mut catalog = sample_catalog().unwrap();
        catalog.set_stock("prod5", 0).unwrap();
        catalog
            .insert_seller(Seller::new("seller5", "Vide", Location::new(14.0, -17.0), ""))
            .unwrap();

        let stats = CatalogStats::compute(&catalog);
        assert_eq!(stats.total_products, 8);
        assert_eq!(stats.total_sellers, 5);
        assert_eq!(stats.available_products, 7);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.verified_sellers, 2);
        assert_eq!(stats.sellers_without_products, vec!["seller5"]);
        assert_eq!(stats.by_category.get("fashion"), Some(&3));
        assert_eq!(stats.by_category.get("other"), None);
        assert_eq!(stats.by_city.get("Dakar"), Some(&2));
        assert_eq!(stats.by_city.get("unknown"), Some(&1));
        assert_eq!(stats.min_price, Some(8000.0));
        assert_eq!(stats.max_price, Some(180000.0));
    }

    #[test]
    fn test_empty_catalog_stats() {
        let stats = CatalogStats::compute(&Catalog::default());
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.min_price, None);
    }

    #[test]
    fn test_tag_usage() {
        let mut catalog = sample_catalog().unwrap();
        catalog
            .insert_product(
                Product::new("prod9", "Robe", "", 1.0, 1, "seller1", ProductCategory::Fashion)
                    .with_tags(["ROBE", "robe"]),
            )
            .unwrap();

        let usage = tag_usage(&catalog);
        assert_eq!(usage[0].tag, "robe");
        assert_eq!(usage[0].count, 2);
        assert_eq!(usage[0].products, vec!["prod1", "prod9"]);
        assert!(usage[1..].iter().all(|u| u.count == 1));
        assert!(usage[1..].windows(2).all(|w| w[0].tag <= w[1].tag));
    }
}
