//! Catalog Store
//!
//! In-memory sellers and products for one session. The products table is the
//! single source of truth for seller ownership; the per-seller index is
//! rebuilt from it and never edited directly.

use std::collections::HashMap;

use super::product::{Product, ProductCategory};
use super::schema::{self, CatalogViolation};
use super::seller::Seller;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("{}", summarize(.0))]
    Invalid(Vec<CatalogViolation>),
    #[error("unknown product '{0}'")]
    UnknownProduct(String),
    #[error("invalid price {price} for product '{id}'")]
    InvalidPrice { id: String, price: f64 },
}

fn summarize(violations: &[CatalogViolation]) -> String {
    match violations {
        [] => "catalog is invalid".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more violations)", first, rest.len()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sellers: Vec<Seller>,
    products: Vec<Product>,
    seller_index: HashMap<String, usize>,
    product_index: HashMap<String, usize>,
    // seller id -> product positions, in catalog order
    by_seller: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, dangling seller references
    /// and out-of-range values.
    pub fn new(sellers: Vec<Seller>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let violations = schema::validate_records(&sellers, &products);
        if !violations.is_empty() {
            return Err(CatalogError::Invalid(violations));
        }

        let mut catalog = Self {
            sellers,
            products,
            ..Self::default()
        };
        catalog.rebuild_indexes();

        tracing::debug!(
            sellers = catalog.sellers.len(),
            products = catalog.products.len(),
            "catalog built"
        );

        Ok(catalog)
    }

    fn rebuild_indexes(&mut self) {
        self.seller_index = self
            .sellers
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        self.product_index.clear();
        self.by_seller.clear();
        for (i, p) in self.products.iter().enumerate() {
            self.product_index.insert(p.id.clone(), i);
            self.by_seller.entry(p.seller_id.clone()).or_default().push(i);
        }
    }

    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty() && self.products.is_empty()
    }

    pub fn get_product(&self, id: &str) -> Option<&Product> {
        self.product_index.get(id).map(|&i| &self.products[i])
    }

    pub fn get_seller(&self, id: &str) -> Option<&Seller> {
        self.seller_index.get(id).map(|&i| &self.sellers[i])
    }

    /// Seller owning `product`, if it can be resolved.
    pub fn seller_of(&self, product: &Product) -> Option<&Seller> {
        self.get_seller(&product.seller_id)
    }

    pub fn products_by_seller(&self, seller_id: &str) -> Vec<&Product> {
        self.by_seller
            .get(seller_id)
            .map(|idx| idx.iter().map(|&i| &self.products[i]).collect())
            .unwrap_or_default()
    }

    pub fn products_by_category(&self, category: ProductCategory) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Derived list of product ids owned by a seller.
    pub fn seller_product_ids(&self, seller_id: &str) -> Vec<&str> {
        self.products_by_seller(seller_id)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect()
    }

    pub fn insert_seller(&mut self, seller: Seller) -> Result<(), CatalogError> {
        let mut violations = schema::validate_seller(&seller);
        if self.seller_index.contains_key(&seller.id) {
            violations.push(CatalogViolation::DuplicateSeller(seller.id.clone()));
        }
        if !violations.is_empty() {
            return Err(CatalogError::Invalid(violations));
        }

        self.seller_index.insert(seller.id.clone(), self.sellers.len());
        self.sellers.push(seller);
        Ok(())
    }

    pub fn insert_product(&mut self, product: Product) -> Result<(), CatalogError> {
        let mut violations = schema::validate_product(&product);
        if self.product_index.contains_key(&product.id) {
            violations.push(CatalogViolation::DuplicateProduct(product.id.clone()));
        }
        if !self.seller_index.contains_key(&product.seller_id) {
            violations.push(CatalogViolation::UnknownSeller {
                product: product.id.clone(),
                seller: product.seller_id.clone(),
            });
        }
        if !violations.is_empty() {
            return Err(CatalogError::Invalid(violations));
        }

        let pos = self.products.len();
        self.product_index.insert(product.id.clone(), pos);
        self.by_seller
            .entry(product.seller_id.clone())
            .or_default()
            .push(pos);
        self.products.push(product);
        Ok(())
    }

    pub fn set_stock(&mut self, product_id: &str, stock: u32) -> Result<(), CatalogError> {
        let product = self.product_mut(product_id)?;
        product.stock = stock;
        Ok(())
    }

    pub fn set_price(&mut self, product_id: &str, price: f64) -> Result<(), CatalogError> {
        if !schema::is_valid_price(price) {
            return Err(CatalogError::InvalidPrice {
                id: product_id.to_string(),
                price,
            });
        }
        let product = self.product_mut(product_id)?;
        product.price = price;
        Ok(())
    }

    fn product_mut(&mut self, product_id: &str) -> Result<&mut Product, CatalogError> {
        let i = *self
            .product_index
            .get(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;
        Ok(&mut self.products[i])
    }
}
