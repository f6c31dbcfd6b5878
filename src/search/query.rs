use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::image::ImageDescriptor;
use crate::core::location::Location;
use crate::core::product::ProductCategory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Keep input order (catalog order, or similarity order for images).
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Distance,
    Rating,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Relevance,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::Distance,
        SortMode::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Distance => "distance",
            Self::Rating => "rating",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Relevance => "Pertinence",
            Self::PriceAsc => "Prix croissant",
            Self::PriceDesc => "Prix décroissant",
            Self::Distance => "Distance",
            Self::Rating => "Note",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode '{0}' (must be: relevance|price-asc|price-desc|distance|rating)")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "relevance" => Ok(Self::Relevance),
            "price-asc" | "price-low" => Ok(Self::PriceAsc),
            "price-desc" | "price-high" => Ok(Self::PriceDesc),
            "distance" => Ok(Self::Distance),
            "rating" => Ok(Self::Rating),
            _ => Err(UnknownSortMode(s.to_string())),
        }
    }
}

/// How far from the caller a seller may be.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Radius {
    /// No distance filter; the location only feeds distance sorting.
    #[default]
    Unbounded,
    /// The configured default radius.
    Default,
    Meters(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchInput {
    Keyword(String),
    Image(ImageDescriptor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Keyword,
    Image,
}

/// A discovery request. Built with the `keyword`/`image` constructors and
/// refined with the builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryQuery {
    pub input: SearchInput,
    pub category: Option<ProductCategory>,
    pub sort: SortMode,
    pub location: Option<Location>,
    pub radius: Radius,
    pub available_only: bool,
    pub limit: Option<usize>,
}

impl DiscoveryQuery {
    fn from_input(input: SearchInput) -> Self {
        Self {
            input,
            category: None,
            sort: SortMode::Relevance,
            location: None,
            radius: Radius::Unbounded,
            available_only: false,
            limit: None,
        }
    }

    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::from_input(SearchInput::Keyword(keyword.into()))
    }

    pub fn image(descriptor: ImageDescriptor) -> Self {
        Self::from_input(SearchInput::Image(descriptor))
    }

    pub fn category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Caller position, used for distance sorting and reporting only.
    pub fn located_at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Caller position plus the default radius filter.
    pub fn near(mut self, location: Location) -> Self {
        self.location = Some(location);
        self.radius = Radius::Default;
        self
    }

    pub fn within(mut self, meters: f64) -> Self {
        self.radius = Radius::Meters(meters);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn kind(&self) -> SearchKind {
        match self.input {
            SearchInput::Keyword(_) => SearchKind::Keyword,
            SearchInput::Image(_) => SearchKind::Image,
        }
    }

    /// Query text as shown to the user.
    pub fn display_text(&self) -> String {
        match &self.input {
            SearchInput::Keyword(k) => k.clone(),
            SearchInput::Image(d) => d.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("relevance".parse::<SortMode>(), Ok(SortMode::Relevance));
        assert_eq!("price-asc".parse::<SortMode>(), Ok(SortMode::PriceAsc));
        assert_eq!("price_low".parse::<SortMode>(), Ok(SortMode::PriceAsc));
        assert_eq!("PRICE_HIGH".parse::<SortMode>(), Ok(SortMode::PriceDesc));
        assert_eq!("Distance".parse::<SortMode>(), Ok(SortMode::Distance));
        assert!("cheapest".parse::<SortMode>().is_err());
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_builder() {
        let dakar = Location::new(14.7167, -17.4677);
        let q = DiscoveryQuery::keyword("robe")
            .category(ProductCategory::Fashion)
            .sort(SortMode::Distance)
            .near(dakar.clone())
            .within(10_000.0)
            .available_only()
            .limit(3);

        assert_eq!(q.kind(), SearchKind::Keyword);
        assert_eq!(q.location, Some(dakar));
        assert_eq!(q.radius, Radius::Meters(10_000.0));
        assert!(q.available_only);
        assert_eq!(q.limit, Some(3));
        assert_eq!(q.display_text(), "robe");
    }

    #[test]
    fn test_located_at_does_not_filter() {
        let q = DiscoveryQuery::keyword("x").located_at(Location::new(0.0, 0.0));
        assert_eq!(q.radius, Radius::Unbounded);
    }
}
