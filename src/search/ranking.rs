//! Filtering and ordering of resolved candidates.
//!
//! Every sort is stable. Candidates whose seller cannot be resolved never
//! cause an error: they sort last by distance, rank as rating 0, and are
//! dropped by a distance filter.

use std::cmp::Ordering;

use serde::Serialize;

use super::query::SortMode;
use crate::core::catalog::Catalog;
use crate::core::location::Location;
use crate::core::product::{Product, ProductCategory};
use crate::core::seller::Seller;

/// A product with its seller and distance looked up once.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub product: &'a Product,
    pub seller: Option<&'a Seller>,
    pub distance_m: Option<f64>,
    pub score: Option<f32>,
}

impl<'a> Candidate<'a> {
    pub fn resolve(catalog: &'a Catalog, product: &'a Product, origin: Option<&Location>) -> Self {
        let seller = catalog.seller_of(product);
        let distance_m = match (origin, seller) {
            (Some(origin), Some(seller)) => Some(origin.distance_to(&seller.location)),
            _ => None,
        };
        Self {
            product,
            seller,
            distance_m,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    fn rating(&self) -> f64 {
        self.seller.map(|s| s.rating).unwrap_or(0.0)
    }
}

/// Owned, display-ready result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl From<&Candidate<'_>> for RankedProduct {
    fn from(c: &Candidate<'_>) -> Self {
        Self {
            product: c.product.clone(),
            seller_name: c.seller.map(|s| s.name.clone()),
            seller_rating: c.seller.map(|s| s.rating),
            city: c.seller.and_then(|s| s.city()).map(String::from),
            distance_m: c.distance_m,
            score: c.score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Filters {
    pub category: Option<ProductCategory>,
    pub available_only: bool,
    /// Applied only to candidates resolved against a caller location.
    pub max_distance_m: Option<f64>,
}

impl Filters {
    pub fn accepts(&self, c: &Candidate<'_>) -> bool {
        if let Some(category) = self.category {
            if c.product.category != category {
                return false;
            }
        }
        if self.available_only && !c.product.is_available() {
            return false;
        }
        if let Some(max) = self.max_distance_m {
            // unresolved seller: distance unknown, cannot be shown as nearby
            match c.distance_m {
                Some(d) if d <= max => {}
                _ => return false,
            }
        }
        true
    }
}

pub fn apply_filters<'a>(candidates: Vec<Candidate<'a>>, filters: &Filters) -> Vec<Candidate<'a>> {
    candidates.into_iter().filter(|c| filters.accepts(c)).collect()
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_candidates(candidates: &mut [Candidate<'_>], mode: SortMode) {
    match mode {
        SortMode::Relevance => {}
        SortMode::PriceAsc => {
            candidates.sort_by(|a, b| a.product.price.total_cmp(&b.product.price))
        }
        SortMode::PriceDesc => {
            candidates.sort_by(|a, b| b.product.price.total_cmp(&a.product.price))
        }
        SortMode::Distance => candidates.sort_by(|a, b| {
            a.seller
                .is_none()
                .cmp(&b.seller.is_none())
                .then_with(|| by_distance(a.distance_m, b.distance_m))
        }),
        SortMode::Rating => candidates.sort_by(|a, b| b.rating().total_cmp(&a.rating())),
    }
}

/// Rank an arbitrary product list (for example a cart snapshot) against the
/// catalog. Products whose seller is missing are kept.
pub fn rank_products(
    catalog: &Catalog,
    products: &[Product],
    mode: SortMode,
    origin: Option<&Location>,
) -> Vec<RankedProduct> {
    let mut candidates: Vec<Candidate<'_>> = products
        .iter()
        .map(|p| Candidate::resolve(catalog, p, origin))
        .collect();
    sort_candidates(&mut candidates, mode);
    candidates.iter().map(RankedProduct::from).collect()
}
