use crate::infra::{AppState, CurrencyQuery, ListingQuery};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use estate_showcase::error::AppError;
use estate_showcase::imagery::FetchOutcome;
use estate_showcase::listings::{
    distinct_tags, filter_by_tag, format_price, ChartData, Currency, ListingId, Property,
};
use estate_showcase::transactions::{TransactionDetails, TransactionReceipt, TransactionSession};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct ListingSummaryView {
    pub(crate) id: ListingId,
    pub(crate) name: String,
    pub(crate) status: &'static str,
    pub(crate) price: String,
    pub(crate) beds: u8,
    pub(crate) baths: u8,
    pub(crate) sqft: u32,
    pub(crate) property_type: String,
    pub(crate) tags: Vec<String>,
    pub(crate) image: Option<FetchOutcome>,
    pub(crate) image_loading: bool,
}

impl ListingSummaryView {
    fn from_property(property: &Property, currency: Currency) -> Self {
        Self {
            id: property.id,
            name: property.name.clone(),
            status: property.status.label(),
            price: format_price(property.price, currency),
            beds: property.beds,
            baths: property.baths,
            sqft: property.sqft,
            property_type: property.property_type.clone(),
            tags: property.tags.clone(),
            image: property.image.clone(),
            image_loading: property.image_loading,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingsResponse {
    pub(crate) currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) active_tag: Option<String>,
    pub(crate) photos_loading: usize,
    pub(crate) listings: Vec<ListingSummaryView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PriceHistoryView {
    pub(crate) date: NaiveDate,
    pub(crate) price: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewView {
    pub(crate) author: String,
    pub(crate) rating: f32,
    pub(crate) filled_stars: u8,
    pub(crate) empty_stars: u8,
    pub(crate) comment: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingDetailView {
    #[serde(flatten)]
    pub(crate) summary: ListingSummaryView,
    pub(crate) currency: Currency,
    pub(crate) year_built: u16,
    pub(crate) price_per_sqft: String,
    pub(crate) price_history: Vec<PriceHistoryView>,
    pub(crate) reviews: Vec<ReviewView>,
    pub(crate) transaction: TransactionDetails,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyticsView {
    pub(crate) sold: u32,
    pub(crate) in_process: u32,
    pub(crate) chart: ChartData,
    pub(crate) circumference: f64,
    pub(crate) sold_dash_offset: f64,
    pub(crate) in_process_dash_offset: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulateTransactionRequest {
    pub(crate) property_id: u32,
    #[serde(default)]
    pub(crate) wallet_connected: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimulateTransactionResponse {
    pub(crate) details: TransactionDetails,
    pub(crate) receipt: TransactionReceipt,
}

pub(crate) fn showcase_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/listings", get(listings_endpoint))
        .route("/api/v1/listings/:listing_id", get(listing_detail_endpoint))
        .route("/api/v1/tags", get(tags_endpoint))
        .route("/api/v1/analytics", get(analytics_endpoint))
        .route(
            "/api/v1/transactions/simulate",
            post(simulate_transaction_endpoint),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn listings_endpoint(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingsResponse>, AppError> {
    let currency = query.resolve_currency()?;
    let active_tag = query.active_tag();
    let snapshot = state.listings.snapshot();

    let listings = filter_by_tag(&snapshot, active_tag)
        .into_iter()
        .map(|property| ListingSummaryView::from_property(property, currency))
        .collect();

    Ok(Json(ListingsResponse {
        currency,
        active_tag: active_tag.map(str::to_string),
        photos_loading: snapshot.iter().filter(|listing| listing.image_loading).count(),
        listings,
    }))
}

pub(crate) async fn listing_detail_endpoint(
    State(state): State<AppState>,
    Path(listing_id): Path<u32>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<ListingDetailView>, AppError> {
    let currency = query.resolve()?;
    let id = ListingId(listing_id);
    let property = state
        .listings
        .get(id)
        .ok_or(AppError::ListingNotFound(id))?;

    let price_history = property
        .price_history
        .iter()
        .map(|point| PriceHistoryView {
            date: point.date,
            price: format_price(point.price, currency),
        })
        .collect();

    let reviews = property
        .reviews
        .iter()
        .map(|review| ReviewView {
            author: review.author.clone(),
            rating: review.rating,
            filled_stars: review.filled_stars(),
            empty_stars: review.empty_stars(),
            comment: review.comment.clone(),
        })
        .collect();

    Ok(Json(ListingDetailView {
        summary: ListingSummaryView::from_property(&property, currency),
        currency,
        year_built: property.year_built,
        price_per_sqft: format_price(u64::from(property.price_per_sqft), currency),
        price_history,
        reviews,
        transaction: TransactionDetails::for_property(&property),
    }))
}

pub(crate) async fn tags_endpoint(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(distinct_tags(&state.listings.snapshot()))
}

pub(crate) async fn analytics_endpoint(State(state): State<AppState>) -> Json<AnalyticsView> {
    let chart = state.analytics.chart();
    Json(AnalyticsView {
        sold: state.analytics.sold,
        in_process: state.analytics.in_process,
        chart,
        circumference: ChartData::circumference(),
        sold_dash_offset: chart.sold_dash_offset(),
        in_process_dash_offset: chart.in_process_dash_offset(),
    })
}

pub(crate) async fn simulate_transaction_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<SimulateTransactionRequest>,
) -> Result<Json<SimulateTransactionResponse>, AppError> {
    let id = ListingId(payload.property_id);
    let property = state
        .listings
        .get(id)
        .ok_or(AppError::ListingNotFound(id))?;

    let mut session = TransactionSession::with_timing(id, state.transaction_timing);
    if payload.wallet_connected {
        session.connect_wallet();
    }
    let receipt = session.simulate(|_| {}).await?;

    Ok(Json(SimulateTransactionResponse {
        details: TransactionDetails::for_property(&property),
        receipt,
    }))
}
