use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use estate_showcase::imagery::{
    ApiCredential, FetchOutcome, GeneratedImage, GenerationError, ImageFetchOrchestrator,
    ImageGenerator, ImagePublisher, ListingRequest, PublishError, ResilientImageClient,
    RetryPolicy,
};
use estate_showcase::listings::{standard_listings, ListingId, ListingStore};
use tokio::time::Instant;

const API_LATENCY: Duration = Duration::from_millis(200);

type Events = Arc<Mutex<Vec<String>>>;

/// Generator that replays scripted results and records call timing.
struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<GeneratedImage, GenerationError>>>,
    fallback: Result<GeneratedImage, GenerationError>,
    calls: Mutex<Vec<(Instant, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    events: Events,
}

impl ScriptedGenerator {
    fn new(
        script: Vec<Result<GeneratedImage, GenerationError>>,
        fallback: Result<GeneratedImage, GenerationError>,
    ) -> Self {
        Self::with_events(script, fallback, Events::default())
    }

    fn with_events(
        script: Vec<Result<GeneratedImage, GenerationError>>,
        fallback: Result<GeneratedImage, GenerationError>,
        events: Events,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            events,
        }
    }

    fn always_succeeds() -> Self {
        Self::new(Vec::new(), Ok(GeneratedImage::jpeg("QUJD")))
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex").len()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .expect("calls mutex")
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        credential: &ApiCredential,
        prompt: &str,
    ) -> Result<GeneratedImage, GenerationError> {
        assert_eq!(credential.expose(), "test-key");
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls
            .lock()
            .expect("calls mutex")
            .push((Instant::now(), prompt.to_string()));
        self.events
            .lock()
            .expect("events mutex")
            .push(format!("call:{prompt}"));

        tokio::time::sleep(API_LATENCY).await;

        let result = self
            .script
            .lock()
            .expect("script mutex")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Publisher that records every outcome, optionally rejecting some ids.
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(ListingId, FetchOutcome, Instant)>>,
    rejected: Vec<ListingId>,
    events: Events,
}

impl RecordingPublisher {
    fn with_events(events: Events) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    fn published(&self) -> Vec<(ListingId, FetchOutcome, Instant)> {
        self.published.lock().expect("published mutex").clone()
    }
}

impl ImagePublisher for RecordingPublisher {
    fn publish(&self, listing_id: ListingId, outcome: FetchOutcome) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("events mutex")
            .push(format!("publish:{listing_id}"));
        if self.rejected.contains(&listing_id) {
            return Err(PublishError::UnknownListing(listing_id));
        }
        self.published
            .lock()
            .expect("published mutex")
            .push((listing_id, outcome, Instant::now()));
        Ok(())
    }
}

fn credential() -> Option<ApiCredential> {
    Some(ApiCredential::new("test-key"))
}

fn client(generator: ScriptedGenerator) -> ResilientImageClient<ScriptedGenerator> {
    ResilientImageClient::new(generator, credential(), RetryPolicy::default())
}

fn requests(count: usize) -> Vec<ListingRequest> {
    (1..=count)
        .map(|id| ListingRequest::new(ListingId(id as u32), format!("listing-{id}")))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn retries_rate_limits_with_doubling_backoff_then_succeeds() {
    let generator = ScriptedGenerator::new(
        vec![
            Err(GenerationError::rate_limited("RESOURCE_EXHAUSTED")),
            Err(GenerationError::rate_limited("HTTP 429")),
        ],
        Ok(GeneratedImage::jpeg("QUJD")),
    );
    let client = client(generator);

    let outcome = client.fetch("a Loft").await;

    assert_eq!(
        outcome,
        FetchOutcome::Image("data:image/jpeg;base64,QUJD".to_string())
    );
    let times = client.generator().call_times();
    assert_eq!(times.len(), 3);
    assert!(times[1] - times[0] >= Duration::from_secs(5));
    assert!(times[2] - times[1] >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn exhausted_rate_limits_resolve_to_placeholder() {
    let generator = ScriptedGenerator::new(
        Vec::new(),
        Err(GenerationError::rate_limited("RESOURCE_EXHAUSTED")),
    );
    let client = client(generator);
    let started = Instant::now();

    let outcome = client.fetch("a Villa").await;

    assert!(outcome.is_placeholder());
    assert_eq!(client.generator().call_count(), 3);
    // Two backoff waits (5s + 10s) and no wait after the final attempt.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(15));
    assert!(elapsed < Duration::from_secs(16));
}

#[tokio::test(start_paused = true)]
async fn non_rate_limit_failure_is_not_retried() {
    let generator = ScriptedGenerator::new(
        vec![Err(GenerationError::other("HTTP 403: API key not valid"))],
        Ok(GeneratedImage::jpeg("QUJD")),
    );
    let client = client(generator);
    let started = Instant::now();

    let outcome = client.fetch("a Condo").await;

    assert!(outcome.is_placeholder());
    assert_eq!(client.generator().call_count(), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn missing_credential_skips_the_network() {
    let client = ResilientImageClient::new(
        ScriptedGenerator::always_succeeds(),
        None,
        RetryPolicy::default(),
    );

    let first = client.fetch("a Penthouse").await;
    let second = client.fetch("a Townhouse").await;

    assert!(first.is_placeholder());
    assert!(second.is_placeholder());
    assert_ne!(first, second, "placeholders must be distinguishable");
    assert_eq!(client.generator().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_policy_gives_up_on_first_rate_limit() {
    let generator = ScriptedGenerator::new(
        vec![Err(GenerationError::rate_limited("HTTP 429"))],
        Ok(GeneratedImage::jpeg("QUJD")),
    );
    let client = ResilientImageClient::new(
        generator,
        credential(),
        RetryPolicy::new(1, Duration::from_secs(5)),
    );

    assert!(client.fetch("a Loft").await.is_placeholder());
    assert_eq!(client.generator().call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn orchestrator_publishes_in_order_without_trailing_delay() {
    let client = Arc::new(client(ScriptedGenerator::always_succeeds()));
    let publisher = Arc::new(RecordingPublisher::default());
    let orchestrator = ImageFetchOrchestrator::new(
        Arc::clone(&client),
        Arc::clone(&publisher),
        Duration::from_secs(5),
    );
    let started = Instant::now();

    let summary = orchestrator.run(requests(3)).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(15));

    let published = publisher.published();
    let order: Vec<ListingId> = published.iter().map(|(id, _, _)| *id).collect();
    assert_eq!(order, vec![ListingId(1), ListingId(2), ListingId(3)]);
    assert!(published
        .iter()
        .all(|(_, outcome, _)| !outcome.is_placeholder()));
    assert!(published[1].2 - published[0].2 >= Duration::from_secs(5));

    assert_eq!(summary.requested, 3);
    assert_eq!(summary.images, 3);
    assert_eq!(summary.placeholders, 0);
    assert_eq!(client.generator().max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn each_request_is_published_before_the_next_call() {
    let events = Events::default();
    let generator = ScriptedGenerator::with_events(
        vec![
            Ok(GeneratedImage::jpeg("AAAA")),
            Err(GenerationError::rate_limited("HTTP 429")),
            Ok(GeneratedImage::jpeg("BBBB")),
            Err(GenerationError::other("no image returned")),
        ],
        Ok(GeneratedImage::jpeg("CCCC")),
        Arc::clone(&events),
    );
    let client = Arc::new(client(generator));
    let publisher = Arc::new(RecordingPublisher::with_events(Arc::clone(&events)));
    let orchestrator =
        ImageFetchOrchestrator::new(Arc::clone(&client), publisher, Duration::from_secs(5));

    let summary = orchestrator.run(requests(4)).await;

    let events = events.lock().expect("events mutex").clone();
    assert_eq!(
        events,
        vec![
            "call:listing-1",
            "publish:1",
            "call:listing-2",
            "call:listing-2",
            "publish:2",
            "call:listing-3",
            "publish:3",
            "call:listing-4",
            "publish:4",
        ]
    );
    assert_eq!(summary.images, 3);
    assert_eq!(summary.placeholders, 1);
    assert_eq!(client.generator().max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_listing_in_the_store_resolves_exactly_once() {
    let store = Arc::new(ListingStore::new(standard_listings()));
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    store.subscribe(move |update| {
        sink.lock().expect("updates mutex").push(update.listing_id);
    });

    let generator = ScriptedGenerator::new(
        vec![
            Ok(GeneratedImage::jpeg("AAAA")),
            Err(GenerationError::rate_limited("RESOURCE_EXHAUSTED")),
            Err(GenerationError::rate_limited("RESOURCE_EXHAUSTED")),
            Err(GenerationError::rate_limited("RESOURCE_EXHAUSTED")),
        ],
        Ok(GeneratedImage::jpeg("DDDD")),
    );
    let client = Arc::new(client(generator));
    let orchestrator = ImageFetchOrchestrator::new(
        Arc::clone(&client),
        Arc::clone(&store),
        Duration::from_secs(5),
    );
    let requests = ImageFetchOrchestrator::<ScriptedGenerator, ListingStore>::requests_for(
        &store.snapshot(),
    );

    let summary = orchestrator.run(requests).await;

    assert_eq!(summary.requested, 6);
    assert_eq!(summary.images, 5);
    assert_eq!(summary.placeholders, 1);
    assert_eq!(summary.unpublished, 0);
    assert_eq!(store.loading_count(), 0);

    let listings = store.snapshot();
    assert!(listings
        .iter()
        .all(|listing| !listing.image_loading && listing.image.is_some()));
    assert!(listings[1]
        .image
        .as_ref()
        .is_some_and(FetchOutcome::is_placeholder));

    let updates = updates.lock().expect("updates mutex").clone();
    let expected: Vec<ListingId> = (1..=6).map(ListingId).collect();
    assert_eq!(updates, expected);
    // One first call per listing plus two retries for the rate-limited one.
    assert_eq!(client.generator().call_count(), 8);
}

#[tokio::test(start_paused = true)]
async fn publish_failures_do_not_stop_the_run() {
    let client = Arc::new(client(ScriptedGenerator::always_succeeds()));
    let publisher = Arc::new(RecordingPublisher {
        rejected: vec![ListingId(2)],
        ..RecordingPublisher::default()
    });
    let orchestrator =
        ImageFetchOrchestrator::new(Arc::clone(&client), Arc::clone(&publisher), Duration::ZERO);

    let summary = orchestrator.run(requests(3)).await;

    assert_eq!(summary.unpublished, 1);
    assert_eq!(publisher.published().len(), 2);
    assert_eq!(client.generator().call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn empty_request_list_finishes_immediately() {
    let client = Arc::new(client(ScriptedGenerator::always_succeeds()));
    let orchestrator = ImageFetchOrchestrator::new(
        Arc::clone(&client),
        Arc::new(RecordingPublisher::default()),
        Duration::from_secs(5),
    );
    let started = Instant::now();

    let summary = orchestrator.run(Vec::new()).await;

    assert_eq!(summary.requested, 0);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(client.generator().call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn spawned_pass_fills_the_store_in_the_background() {
    let store = Arc::new(ListingStore::new(standard_listings()));
    let client = Arc::new(client(ScriptedGenerator::always_succeeds()));
    let requests = ImageFetchOrchestrator::<ScriptedGenerator, ListingStore>::requests_for(
        &store.snapshot(),
    );
    let orchestrator = ImageFetchOrchestrator::new(
        Arc::clone(&client),
        Arc::clone(&store),
        Duration::from_secs(5),
    );

    let handle = orchestrator.spawn(requests);
    assert_eq!(store.loading_count(), 6);

    let summary = handle.await.expect("photo task completes");

    assert_eq!(summary.images, 6);
    assert_eq!(store.loading_count(), 0);
    assert_eq!(client.generator().max_in_flight(), 1);
}
