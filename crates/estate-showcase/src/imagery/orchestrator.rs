use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use super::generator::ImageGenerator;
use super::prompt::ListingRequest;
use super::resilient::ResilientImageClient;
use super::FetchOutcome;
use crate::listings::{ListingId, Property};

/// Receiver for resolved listing photos.
pub trait ImagePublisher: Send + Sync {
    fn publish(&self, listing_id: ListingId, outcome: FetchOutcome) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("listing {0} is not in the store")]
    UnknownListing(ListingId),
}

/// Totals for one orchestration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrchestrationSummary {
    pub requested: usize,
    pub images: usize,
    pub placeholders: usize,
    pub unpublished: usize,
}

/// Walks listings in order, one photo request at a time, pacing requests to
/// stay under the generation API's per-minute quota.
pub struct ImageFetchOrchestrator<G, P> {
    client: Arc<ResilientImageClient<G>>,
    publisher: Arc<P>,
    inter_item_delay: Duration,
}

impl<G, P> ImageFetchOrchestrator<G, P>
where
    G: ImageGenerator + 'static,
    P: ImagePublisher + 'static,
{
    pub const DEFAULT_INTER_ITEM_DELAY: Duration = Duration::from_secs(5);

    pub fn new(
        client: Arc<ResilientImageClient<G>>,
        publisher: Arc<P>,
        inter_item_delay: Duration,
    ) -> Self {
        Self {
            client,
            publisher,
            inter_item_delay,
        }
    }

    pub fn requests_for(listings: &[Property]) -> Vec<ListingRequest> {
        listings.iter().map(ListingRequest::from_property).collect()
    }

    /// Fetch and publish each request in order.
    ///
    /// Request `i + 1` is not issued until the outcome for request `i` has
    /// been published. The inter-item delay separates consecutive requests
    /// and is skipped after the last one.
    pub async fn run(&self, requests: Vec<ListingRequest>) -> OrchestrationSummary {
        let mut summary = OrchestrationSummary {
            requested: requests.len(),
            ..OrchestrationSummary::default()
        };
        let total = requests.len();

        for (index, request) in requests.into_iter().enumerate() {
            let listing_id = request.listing_id();
            let outcome = self
                .client
                .fetch(request.prompt())
                .instrument(info_span!("listing_photo", listing = %listing_id))
                .await;

            if outcome.is_placeholder() {
                summary.placeholders += 1;
            } else {
                summary.images += 1;
            }

            let placeholder = outcome.is_placeholder();
            match self.publisher.publish(listing_id, outcome) {
                Ok(()) => info!(
                    listing = %listing_id,
                    placeholder,
                    position = index + 1,
                    total,
                    "listing photo published"
                ),
                Err(err) => {
                    summary.unpublished += 1;
                    warn!(listing = %listing_id, error = %err, "listing photo not published");
                }
            }

            if index + 1 < total {
                tokio::time::sleep(self.inter_item_delay).await;
            }
        }

        summary
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(
        self,
        requests: Vec<ListingRequest>,
    ) -> tokio::task::JoinHandle<OrchestrationSummary> {
        tokio::spawn(async move { self.run(requests).await })
    }
}
