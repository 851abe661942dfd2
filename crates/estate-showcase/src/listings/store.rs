use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::domain::{ListingId, Property};
use crate::imagery::{FetchOutcome, ImagePublisher, PublishError};

/// Notification delivered to subscribers after a listing photo resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingUpdate {
    pub listing_id: ListingId,
    pub outcome: FetchOutcome,
    pub image_loading: bool,
}

pub type ListingSubscriber = Arc<dyn Fn(&ListingUpdate) + Send + Sync>;

/// Shared listing state with an explicit observer contract.
///
/// The image orchestrator is the only writer. Readers take snapshots or
/// subscribe to updates; callbacks run on the writer's task, in publish order.
pub struct ListingStore {
    listings: Mutex<Vec<Property>>,
    subscribers: Mutex<Vec<ListingSubscriber>>,
}

impl ListingStore {
    pub fn new(listings: Vec<Property>) -> Self {
        Self {
            listings: Mutex::new(listings),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Vec<Property> {
        self.listings.lock().expect("listing mutex poisoned").clone()
    }

    pub fn get(&self, id: ListingId) -> Option<Property> {
        self.listings
            .lock()
            .expect("listing mutex poisoned")
            .iter()
            .find(|listing| listing.id == id)
            .cloned()
    }

    /// Listings whose photo has not resolved yet.
    pub fn loading_count(&self) -> usize {
        self.listings
            .lock()
            .expect("listing mutex poisoned")
            .iter()
            .filter(|listing| listing.image_loading)
            .count()
    }

    /// Replace one listing's photo and notify subscribers.
    ///
    /// Callbacks run after both locks are released, so they may read the
    /// store or subscribe further listeners. A listener added mid-delivery
    /// sees the next update onwards.
    pub fn update(
        &self,
        id: ListingId,
        outcome: FetchOutcome,
    ) -> Result<ListingUpdate, PublishError> {
        let update = {
            let mut guard = self.listings.lock().expect("listing mutex poisoned");
            let listing = guard
                .iter_mut()
                .find(|listing| listing.id == id)
                .ok_or(PublishError::UnknownListing(id))?;
            listing.apply_image(outcome.clone());
            ListingUpdate {
                listing_id: id,
                outcome,
                image_loading: listing.image_loading,
            }
        };

        let subscribers: Vec<ListingSubscriber> = self
            .subscribers
            .lock()
            .expect("subscriber mutex poisoned")
            .clone();
        for subscriber in &subscribers {
            subscriber(&update);
        }

        Ok(update)
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ListingUpdate) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .expect("subscriber mutex poisoned")
            .push(Arc::new(callback));
    }
}

impl std::fmt::Debug for ListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self
            .subscribers
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_default();
        f.debug_struct("ListingStore")
            .field("listings", &self.listings)
            .field("subscribers", &subscribers)
            .finish()
    }
}

impl ImagePublisher for ListingStore {
    fn publish(&self, listing_id: ListingId, outcome: FetchOutcome) -> Result<(), PublishError> {
        self.update(listing_id, outcome).map(|_| ())
    }
}
