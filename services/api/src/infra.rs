use estate_showcase::config::ImageryConfig;
use estate_showcase::error::AppError;
use estate_showcase::imagery::{
    ImageFetchOrchestrator, ImagenClient, ListingRequest, ResilientImageClient,
};
use estate_showcase::listings::{Currency, ListingStore, SalesAnalytics};
use estate_showcase::transactions::SimulationTiming;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) listings: Arc<ListingStore>,
    pub(crate) analytics: SalesAnalytics,
    pub(crate) transaction_timing: SimulationTiming,
}

pub(crate) type PhotoOrchestrator = ImageFetchOrchestrator<ImagenClient, ListingStore>;

/// Wire the Imagen adapter, retrying client, and orchestrator around `store`.
///
/// Requests are captured from the store's current contents, in catalog order.
pub(crate) fn photo_pipeline(
    config: &ImageryConfig,
    store: Arc<ListingStore>,
    inter_item_delay: Duration,
    limit: Option<usize>,
) -> Result<(PhotoOrchestrator, Vec<ListingRequest>), AppError> {
    let generator = ImagenClient::new(config)?;
    let client = Arc::new(ResilientImageClient::from_config(generator, config));

    let mut requests = PhotoOrchestrator::requests_for(&store.snapshot());
    if let Some(limit) = limit {
        requests.truncate(limit);
    }

    let orchestrator = ImageFetchOrchestrator::new(client, store, inter_item_delay);
    Ok((orchestrator, requests))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CurrencyQuery {
    #[serde(default)]
    pub(crate) currency: Option<String>,
}

impl CurrencyQuery {
    pub(crate) fn resolve(&self) -> Result<Currency, AppError> {
        parse_currency(self.currency.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default)]
    pub(crate) tag: Option<String>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
}

impl ListingQuery {
    pub(crate) fn resolve_currency(&self) -> Result<Currency, AppError> {
        parse_currency(self.currency.as_deref())
    }

    pub(crate) fn active_tag(&self) -> Option<&str> {
        self.tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }
}

fn parse_currency(raw: Option<&str>) -> Result<Currency, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.parse::<Currency>()?),
        None => Ok(Currency::default()),
    }
}
