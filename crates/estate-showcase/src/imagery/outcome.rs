use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub const PLACEHOLDER_BASE_URL: &str = "https://picsum.photos/800/600";

static PLACEHOLDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// The displayable photo reference resolved for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Generated photo, usually a base64 data URI.
    Image(String),
    /// Stock photo used when generation is unavailable or failed.
    Placeholder(String),
}

impl FetchOutcome {
    /// A stock photo URL that never repeats within the process, so stale
    /// cached images stay distinguishable from fresh ones.
    pub fn placeholder() -> Self {
        let sequence = PLACEHOLDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::random();
        Self::Placeholder(format!(
            "{PLACEHOLDER_BASE_URL}?random={sequence}-{salt:08x}"
        ))
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Image(url) | Self::Placeholder(url) => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}
