use serde::{Deserialize, Serialize};

use super::location::Location;

pub const MAX_RATING: f64 = 5.0;

/// A seller. Owned products are derived from `Product::seller_id` by the
/// catalog and are not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub contact_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Seller {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Location,
        contact_info: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            rating: 0.0,
            review_count: 0,
            contact_info: contact_info.into(),
            description: None,
            is_verified: false,
        }
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }

    pub fn has_valid_rating(&self) -> bool {
        self.rating.is_finite() && (0.0..=MAX_RATING).contains(&self.rating)
    }

    pub fn city(&self) -> Option<&str> {
        self.location.city.as_deref()
    }
}
