//! Business search: the normalized `Business` record and the provider trait.
//!
//! Provider responses are decoded into `Business` once, at this boundary.
//! Nothing downstream re-interprets raw provider JSON.

pub mod yelp;

pub use yelp::YelpClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A business returned by a search. Never mutated after decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Business {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    /// Link to more information about the business.
    #[serde(default, rename = "mobile_url", alias = "url")]
    pub info_url: String,
    #[serde(default)]
    pub display_phone: String,
    /// Distance from the searched location, in metres.
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub location: BusinessLocation,
}

/// Where a business is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessLocation {
    #[serde(default)]
    pub city: String,
    /// Display lines: street address first, then city/region.
    #[serde(default)]
    pub display_address: Vec<String>,
}

impl Business {
    /// First display line, or empty.
    pub fn street_address(&self) -> &str {
        self.location
            .display_address
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// "{line1} in {line2}" when a second line exists, else line 1.
    pub fn full_address(&self) -> String {
        match self.location.display_address.as_slice() {
            [] => String::new(),
            [street] => street.clone(),
            [street, region, ..] => format!("{street} in {region}"),
        }
    }

    /// Rating with one decimal place.
    pub fn rating_display(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

/// One search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub terms: String,
    pub location: String,
    /// Maximum number of results to return.
    pub limit: usize,
}

impl SearchRequest {
    /// Request just enough results to reach `offset`.
    pub fn for_offset(terms: &str, location: &str, offset: usize) -> Self {
        Self {
            terms: terms.to_string(),
            location: location.to_string(),
            limit: offset + 1,
        }
    }
}

/// A business search provider.
#[async_trait]
pub trait BusinessSearch: Send + Sync {
    /// Provider name for logs and errors.
    fn name(&self) -> &str;

    /// Run one search, returning results in provider order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Business>, SearchError>;
}
