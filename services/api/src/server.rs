use crate::cli::ServeArgs;
use crate::infra::{photo_pipeline, AppState};
use crate::routes::showcase_router;
use axum_prometheus::PrometheusMetricLayer;
use estate_showcase::config::AppConfig;
use estate_showcase::error::AppError;
use estate_showcase::listings::{standard_listings, ListingStore, SalesAnalytics};
use estate_showcase::telemetry;
use estate_showcase::transactions::SimulationTiming;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let listings = Arc::new(ListingStore::new(standard_listings()));
    listings.subscribe(|update| {
        info!(
            listing = %update.listing_id,
            placeholder = update.outcome.is_placeholder(),
            "listing photo ready"
        );
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        listings: listings.clone(),
        analytics: SalesAnalytics::showcase(),
        transaction_timing: SimulationTiming::default(),
    };

    let app = showcase_router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (orchestrator, requests) = photo_pipeline(
        &config.imagery,
        listings,
        config.imagery.inter_item_delay,
        None,
    )?;
    let photos = orchestrator.spawn(requests);
    tokio::spawn(async move {
        match photos.await {
            Ok(summary) => info!(
                images = summary.images,
                placeholders = summary.placeholders,
                unpublished = summary.unpublished,
                "listing photos resolved"
            ),
            Err(err) => warn!(error = %err, "listing photo task ended early"),
        }
    });

    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "estate showcase ready");

    axum::serve(listener, app).await?;
    Ok(())
}
