use crate::infra::photo_pipeline;
use clap::Args;
use estate_showcase::config::AppConfig;
use estate_showcase::error::AppError;
use estate_showcase::listings::{
    format_price, standard_listings, Currency, ListingId, ListingStore, Property,
};
use estate_showcase::telemetry;
use estate_showcase::transactions::{TransactionDetails, TransactionSession};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct GalleryArgs {
    /// Only generate photos for the first N listings
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Override the pause between listings (seconds)
    #[arg(long)]
    pub(crate) delay_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct TransactionArgs {
    /// Listing to purchase
    #[arg(long)]
    pub(crate) property_id: u32,
}

pub(crate) async fn run_gallery(args: GalleryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let delay = args
        .delay_secs
        .map(Duration::from_secs)
        .unwrap_or(config.imagery.inter_item_delay);
    let store = Arc::new(ListingStore::new(standard_listings()));
    store.subscribe(|update| {
        let kind = if update.outcome.is_placeholder() {
            "placeholder"
        } else {
            "generated"
        };
        println!(
            "  listing {:>2}  {:<11} {}",
            update.listing_id,
            kind,
            preview(update.outcome.url())
        );
    });

    let (orchestrator, requests) =
        photo_pipeline(&config.imagery, store.clone(), delay, args.limit)?;

    println!("Listing photo gallery");
    println!(
        "  {} listing(s), {}s between requests, credential {}",
        requests.len(),
        delay.as_secs(),
        if config.imagery.has_credential() {
            "configured"
        } else {
            "missing (placeholders only)"
        }
    );

    let summary = orchestrator.run(requests).await;

    println!(
        "\nGenerated {} / placeholders {} / unpublished {} (of {})",
        summary.images, summary.placeholders, summary.unpublished, summary.requested
    );
    println!("Still loading: {}", store.loading_count());
    Ok(())
}

pub(crate) async fn run_transaction_simulation(args: TransactionArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let id = ListingId(args.property_id);
    let property = standard_listings()
        .into_iter()
        .find(|listing| listing.id == id)
        .ok_or(AppError::ListingNotFound(id))?;

    render_listing(&property);

    let details = TransactionDetails::for_property(&property);
    println!("\nTransaction");
    println!("  To:    {}", details.to);
    println!("  Value: {}", details.value);
    println!("  Gas:   {}", details.gas);

    let mut session = TransactionSession::new(id);
    session.connect_wallet();
    println!("\nWallet connected. Submitting...");

    let receipt = session
        .simulate(|log| match &log.link {
            Some(link) => println!("  [{}] {} -> {}", log.timestamp, log.message, link),
            None => println!("  [{}] {}", log.timestamp, log.message),
        })
        .await?;

    println!("\nFull hash: {}", receipt.hash);
    Ok(())
}

fn render_listing(property: &Property) {
    println!("{} ({})", property.name, property.status.label());
    println!(
        "  {} beds / {} baths / {} sqft {}, built {}",
        property.beds, property.baths, property.sqft, property.property_type, property.year_built
    );
    let prices: Vec<String> = Currency::ordered()
        .into_iter()
        .map(|currency| format_price(property.price, currency))
        .collect();
    println!("  {}", prices.join("  |  "));
}

/// Data URIs run to megabytes; keep the terminal readable.
fn preview(url: &str) -> String {
    const LIMIT: usize = 72;
    match url.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &url[..cut]),
        None => url.to_string(),
    }
}
