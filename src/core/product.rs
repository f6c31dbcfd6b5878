use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Fashion,
    Beauty,
    Tech,
    Home,
    Other,
}

lazy_static! {
    // Wire names plus the French labels shown in the storefront.
    static ref CATEGORY_NAMES: HashMap<&'static str, ProductCategory> = HashMap::from([
        ("fashion", ProductCategory::Fashion),
        ("mode", ProductCategory::Fashion),
        ("beauty", ProductCategory::Beauty),
        ("beauté", ProductCategory::Beauty),
        ("beaute", ProductCategory::Beauty),
        ("tech", ProductCategory::Tech),
        ("technologie", ProductCategory::Tech),
        ("home", ProductCategory::Home),
        ("maison", ProductCategory::Home),
        ("other", ProductCategory::Other),
        ("autre", ProductCategory::Other),
    ]);
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Fashion,
        ProductCategory::Beauty,
        ProductCategory::Tech,
        ProductCategory::Home,
        ProductCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fashion => "fashion",
            Self::Beauty => "beauty",
            Self::Tech => "tech",
            Self::Home => "home",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fashion => "Mode",
            Self::Beauty => "Beauté",
            Self::Tech => "Technologie",
            Self::Home => "Maison",
            Self::Other => "Autre",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (must be: fashion|beauty|tech|home|other)")]
pub struct UnknownCategory(pub String);

impl FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORY_NAMES
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A product listed by a seller. Price is in XOF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub seller_id: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        stock: u32,
        seller_id: impl Into<String>,
        category: ProductCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            seller_id: seller_id.into(),
            category,
            tags: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Name, description and tags joined for embedding.
    pub fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.name, self.description);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("fashion".parse::<ProductCategory>(), Ok(ProductCategory::Fashion));
        assert_eq!("TECH".parse::<ProductCategory>(), Ok(ProductCategory::Tech));
        assert_eq!("Beauté".parse::<ProductCategory>(), Ok(ProductCategory::Beauty));
        assert_eq!(" maison ".parse::<ProductCategory>(), Ok(ProductCategory::Home));
        assert!("food".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_wire_name() {
        let json = serde_json::to_string(&ProductCategory::Home).unwrap();
        assert_eq!(json, "\"home\"");
        let back: ProductCategory = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(back, ProductCategory::Other);
    }

    #[test]
    fn test_availability() {
        let mut p =
            Product::new("p", "Sac", "Sac à main", 35000.0, 1, "s", ProductCategory::Fashion);
        assert!(p.is_available());
        p.stock = 0;
        assert!(!p.is_available());
    }

    #[test]
    fn test_searchable_text() {
        let p = Product::new("p", "Robe", "Rouge", 1.0, 1, "s", ProductCategory::Fashion)
            .with_tags(["robe", "soirée"]);
        assert_eq!(p.searchable_text(), "Robe Rouge robe soirée");
    }
}
