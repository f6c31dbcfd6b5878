//! Keyword matching over product name, description and tags.

use regex::{Regex, RegexBuilder};

use crate::core::product::Product;

/// Case-insensitive literal substring matcher.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    re: Regex,
}

impl KeywordMatcher {
    /// Returns `None` for an empty or whitespace-only keyword: a blank query
    /// matches nothing rather than everything.
    pub fn new(keyword: &str) -> Option<Self> {
        if keyword.trim().is_empty() {
            return None;
        }

        // An escaped literal always compiles.
        let re = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self { re })
    }

    pub fn is_match(&self, product: &Product) -> bool {
        self.re.is_match(&product.name)
            || self.re.is_match(&product.description)
            || product.tags.iter().any(|t| self.re.is_match(t))
    }
}

/// Products matching `keyword`, in catalog order.
pub fn filter_by_keyword<'a, I>(products: I, keyword: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    match KeywordMatcher::new(keyword) {
        Some(m) => products.into_iter().filter(|p| m.is_match(p)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::sample_products;

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive() {
        let products = sample_products();
        for q in ["robe", "ROBE", "Robe", "rObE"] {
            assert_eq!(ids(&filter_by_keyword(&products, q)), vec!["prod1"], "query {}", q);
        }
    }

    #[test]
    fn test_accented_case_folding() {
        let products = sample_products();
        assert_eq!(ids(&filter_by_keyword(&products, "ÉLÉGANTE")), vec!["prod1"]);
        assert_eq!(ids(&filter_by_keyword(&products, "écouteurs")), vec!["prod2"]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let products = sample_products();
        assert!(filter_by_keyword(&products, "").is_empty());
        assert!(filter_by_keyword(&products, "   \t\n").is_empty());
        assert!(KeywordMatcher::new(" ").is_none());
    }

    #[test]
    fn test_matches_description_and_tags() {
        let products = sample_products();
        // description only
        assert_eq!(ids(&filter_by_keyword(&products, "bruit")), vec!["prod2"]);
        // tag only
        assert_eq!(ids(&filter_by_keyword(&products, "audio")), vec!["prod2"]);
    }

    #[test]
    fn test_catalog_order_preserved() {
        let products = sample_products();
        // "parfait" appears in prod1 ("parfaite") and prod4
        assert_eq!(ids(&filter_by_keyword(&products, "parfait")), vec!["prod1", "prod4"]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let products = sample_products();
        assert!(filter_by_keyword(&products, ".*").is_empty());
        assert_eq!(ids(&filter_by_keyword(&products, "100%")), vec!["prod3"]);
        assert_eq!(ids(&filter_by_keyword(&products, "t-shirt")), vec!["prod8"]);
    }

    #[test]
    fn test_results_are_subset_of_matching_products() {
        let products = sample_products();
        for q in ["a", "e", "sac", "haute", "x"] {
            let lower = q.to_lowercase();
            for p in filter_by_keyword(&products, q) {
                let hit = p.name.to_lowercase().contains(&lower)
                    || p.description.to_lowercase().contains(&lower)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&lower));
                assert!(hit, "{} should not match {}", p.id, q);
            }
        }
    }
}
