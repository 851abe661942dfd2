use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::imagery::FetchOutcome;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u32);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "New Listing")]
    NewListing,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ForSale => "For Sale",
            Self::NewListing => "New Listing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: f32,
    pub comment: String,
}

impl Review {
    /// Rounded rating, clamped to the five-star scale.
    pub fn filled_stars(&self) -> u8 {
        if !self.rating.is_finite() {
            return 0;
        }
        self.rating.round().clamp(0.0, f32::from(MAX_RATING)) as u8
    }

    pub fn empty_stars(&self) -> u8 {
        MAX_RATING - self.filled_stars()
    }
}

/// A listing as presented to browsers, including its photo state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: ListingId,
    pub name: String,
    pub price: u64,
    pub beds: u8,
    pub baths: u8,
    pub sqft: u32,
    pub property_type: String,
    pub year_built: u16,
    pub price_per_sqft: u32,
    pub status: ListingStatus,
    pub tags: Vec<String>,
    pub price_history: Vec<PricePoint>,
    pub reviews: Vec<Review>,
    pub image: Option<FetchOutcome>,
    pub image_loading: bool,
}

impl Property {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().map(FetchOutcome::url)
    }

    /// Record the resolved photo; loading ends with the first outcome.
    pub fn apply_image(&mut self, outcome: FetchOutcome) {
        self.image = Some(outcome);
        self.image_loading = false;
    }
}
