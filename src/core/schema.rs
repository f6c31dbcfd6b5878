use std::collections::HashSet;

use super::product::Product;
use super::seller::Seller;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogViolation {
    EmptyField { record: String, field: &'static str },
    DuplicateSeller(String),
    DuplicateProduct(String),
    UnknownSeller { product: String, seller: String },
    InvalidLocation { seller: String, latitude: f64, longitude: f64 },
    InvalidRating { seller: String, rating: f64 },
    InvalidPrice { product: String, price: f64 },
    BlankTag { product: String },
}

impl CatalogViolation {
    /// Id of the seller or product the violation belongs to.
    pub fn record(&self) -> &str {
        match self {
            Self::EmptyField { record, .. } => record,
            Self::DuplicateSeller(id) | Self::DuplicateProduct(id) => id,
            Self::UnknownSeller { product, .. } => product,
            Self::InvalidLocation { seller, .. } | Self::InvalidRating { seller, .. } => seller,
            Self::InvalidPrice { product, .. } | Self::BlankTag { product } => product,
        }
    }
}

impl std::fmt::Display for CatalogViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { record, field } => {
                write!(f, "Record '{}' has an empty '{}' field", record, field)
            }
            Self::DuplicateSeller(id) => write!(f, "Duplicate seller id: {}", id),
            Self::DuplicateProduct(id) => write!(f, "Duplicate product id: {}", id),
            Self::UnknownSeller { product, seller } => write!(
                f,
                "Product '{}' references unknown seller '{}'",
                product, seller
            ),
            Self::InvalidLocation {
                seller,
                latitude,
                longitude,
            } => write!(
                f,
                "Seller '{}' has invalid coordinates ({}, {}) (lat must be in [-90,90], lon in [-180,180])",
                seller, latitude, longitude
            ),
            Self::InvalidRating { seller, rating } => {
                write!(f, "Seller '{}' has rating {} (must be 0.0-5.0)", seller, rating)
            }
            Self::InvalidPrice { product, price } => {
                write!(f, "Product '{}' has invalid price {}", product, price)
            }
            Self::BlankTag { product } => write!(f, "Product '{}' has a blank tag", product),
        }
    }
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

pub fn validate_seller(seller: &Seller) -> Vec<CatalogViolation> {
    let mut violations = Vec::new();

    if seller.id.trim().is_empty() {
        violations.push(CatalogViolation::EmptyField {
            record: seller.name.clone(),
            field: "id",
        });
    }
    if seller.name.trim().is_empty() {
        violations.push(CatalogViolation::EmptyField {
            record: seller.id.clone(),
            field: "name",
        });
    }
    if !seller.location.is_valid() {
        violations.push(CatalogViolation::InvalidLocation {
            seller: seller.id.clone(),
            latitude: seller.location.latitude,
            longitude: seller.location.longitude,
        });
    }
    if !seller.has_valid_rating() {
        violations.push(CatalogViolation::InvalidRating {
            seller: seller.id.clone(),
            rating: seller.rating,
        });
    }

    violations
}

/// Checks a product on its own. Seller references are checked by
/// [`validate_records`] since they need the seller table.
pub fn validate_product(product: &Product) -> Vec<CatalogViolation> {
    let mut violations = Vec::new();

    if product.id.trim().is_empty() {
        violations.push(CatalogViolation::EmptyField {
            record: product.name.clone(),
            field: "id",
        });
    }
    if product.name.trim().is_empty() {
        violations.push(CatalogViolation::EmptyField {
            record: product.id.clone(),
            field: "name",
        });
    }
    if !is_valid_price(product.price) {
        violations.push(CatalogViolation::InvalidPrice {
            product: product.id.clone(),
            price: product.price,
        });
    }
    if product.tags.iter().any(|t| t.trim().is_empty()) {
        violations.push(CatalogViolation::BlankTag {
            product: product.id.clone(),
        });
    }

    violations
}

/// Collects every violation across both tables.
pub fn validate_records(sellers: &[Seller], products: &[Product]) -> Vec<CatalogViolation> {
    let mut violations = Vec::new();

    let mut seller_ids = HashSet::new();
    for seller in sellers {
        violations.extend(validate_seller(seller));
        if !seller_ids.insert(seller.id.as_str()) {
            violations.push(CatalogViolation::DuplicateSeller(seller.id.clone()));
        }
    }

    let mut product_ids = HashSet::new();
    for product in products {
        violations.extend(validate_product(product));
        if !product_ids.insert(product.id.as_str()) {
            violations.push(CatalogViolation::DuplicateProduct(product.id.clone()));
        }
        if !seller_ids.contains(product.seller_id.as_str()) {
            violations.push(CatalogViolation::UnknownSeller {
                product: product.id.clone(),
                seller: product.seller_id.clone(),
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Location;
    use crate::core::product::ProductCategory;

    fn seller(id: &str) -> Seller {
        Seller::new(id, "Boutique", Location::new(14.7, -17.4), "+221")
    }

    fn product(id: &str, seller_id: &str) -> Product {
        Product::new(id, "Sac", "Sac à main", 1000.0, 1, seller_id, ProductCategory::Fashion)
    }

    #[test]
    fn test_clean_records() {
        let v = validate_records(&[seller("s1")], &[product("p1", "s1")]);
        assert!(v.is_empty(), "{:?}", v);
    }

    #[test]
    fn test_collects_all_violations() {
        let mut bad_seller = seller("s2");
        bad_seller.location = Location::new(95.0, 0.0);
        bad_seller.rating = 7.0;

        let mut bad_product = product("p2", "ghost");
        bad_product.price = -1.0;
        bad_product.tags = vec!["ok".into(), "  ".into()];

        let v = validate_records(
            &[seller("s1"), seller("s1"), bad_seller],
            &[product("p1", "s1"), product("p1", "s1"), bad_product],
        );

        assert!(v.contains(&CatalogViolation::DuplicateSeller("s1".into())));
        assert!(v.contains(&CatalogViolation::DuplicateProduct("p1".into())));
        assert!(v.contains(&CatalogViolation::UnknownSeller {
            product: "p2".into(),
            seller: "ghost".into()
        }));
        assert!(v.contains(&CatalogViolation::InvalidPrice {
            product: "p2".into(),
            price: -1.0
        }));
        assert!(v.contains(&CatalogViolation::BlankTag { product: "p2".into() }));
        assert!(v.iter().any(|x| matches!(
            x,
            CatalogViolation::InvalidLocation { seller, .. } if seller == "s2"
        )));
        assert!(v.iter().any(|x| matches!(
            x,
            CatalogViolation::InvalidRating { seller, .. } if seller == "s2"
        )));
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn test_nan_price_rejected() {
        let mut p = product("p1", "s1");
        p.price = f64::NAN;
        assert_eq!(validate_product(&p).len(), 1);
    }

    #[test]
    fn test_record_and_display() {
        let v = CatalogViolation::UnknownSeller {
            product: "prod1".into(),
            seller: "seller9".into(),
        };
        assert_eq!(v.record(), "prod1");
        assert_eq!(
            v.to_string(),
            "Product 'prod1' references unknown seller 'seller9'"
        );
    }
}
