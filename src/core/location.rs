//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default radius for nearby-seller queries, in meters.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 50_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            city: None,
        }
    }

    pub fn with_city(latitude: f64, longitude: f64, city: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            city: Some(city.into()),
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance to `other`, in meters.
    pub fn distance_to(&self, other: &Location) -> f64 {
        haversine_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// A search radius must be finite and non-negative.
pub fn is_valid_radius(meters: f64) -> bool {
    meters.is_finite() && meters >= 0.0
}

/// Great-circle distance between two points on a spherical Earth.
///
/// Agrees with ellipsoidal (Vincenty) distances to within ~0.5%, well inside
/// consumer GPS tolerances at storefront ranges.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Clamp: rounding can push `a` just past 1.0 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Render a distance for display: whole meters below 1 km, else km with one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.max(0.0) as u64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}
