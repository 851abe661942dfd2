//! Listing photo generation: the API adapter, the retrying client, and the
//! sequential orchestrator that feeds the listing store.

mod generator;
mod imagen;
mod orchestrator;
mod outcome;
mod prompt;
mod resilient;

pub use generator::{
    ApiCredential, GeneratedImage, GenerationError, GenerationErrorKind, ImageGenerator,
};
pub use imagen::ImagenClient;
pub use orchestrator::{
    ImageFetchOrchestrator, ImagePublisher, OrchestrationSummary, PublishError,
};
pub use outcome::{FetchOutcome, PLACEHOLDER_BASE_URL};
pub use prompt::{photo_brief, ListingRequest};
pub use resilient::{ResilientImageClient, RetryPolicy};
