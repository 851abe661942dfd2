//! Listing catalog, shared photo state, and presentation helpers.

pub mod analytics;
pub mod catalog;
pub mod currency;
pub mod domain;
mod store;

pub use analytics::{ChartData, SalesAnalytics};
pub use catalog::{distinct_tags, filter_by_tag, standard_listings};
pub use currency::{format_price, Currency, UnknownCurrency};
pub use domain::{ListingId, ListingStatus, PricePoint, Property, Review};
pub use store::{ListingStore, ListingSubscriber, ListingUpdate};
