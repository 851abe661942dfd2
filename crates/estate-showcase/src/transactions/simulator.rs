use std::fmt;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::listings::ListingId;

pub const EXPLORER_BASE_URL: &str = "https://sepolia.etherscan.io/tx";

/// Fabricated `0x`-prefixed 64 hex digit transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        let digits: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        Self(format!("0x{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn truncated(&self) -> String {
        truncate_hash(&self.0)
    }

    pub fn explorer_url(&self) -> String {
        format!("{EXPLORER_BASE_URL}/{}", self.0)
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `0x1234...abcd`; values too short to elide are returned unchanged.
pub fn truncate_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= 10 {
        return hash.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionLog {
    pub timestamp: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TransactionHash>,
}

impl TransactionLog {
    fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            link: None,
            tx_hash: None,
        }
    }
}

/// Delays between the three simulated steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTiming {
    pub confirmation_delay: Duration,
    pub explorer_delay: Duration,
}

impl Default for SimulationTiming {
    fn default() -> Self {
        Self {
            confirmation_delay: Duration::from_secs(2),
            explorer_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("connect a wallet before simulating a purchase")]
    WalletNotConnected,
    #[error("a simulated transaction is already running")]
    AlreadySimulating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub property_id: ListingId,
    pub hash: TransactionHash,
    pub logs: Vec<TransactionLog>,
}

/// One purchase dialog: connect a wallet, then run the simulated
/// pending → confirmed → explorer sequence. Nothing leaves the process.
#[derive(Debug)]
pub struct TransactionSession {
    property_id: ListingId,
    timing: SimulationTiming,
    wallet_connected: bool,
    simulating: bool,
    logs: Vec<TransactionLog>,
    hash: Option<TransactionHash>,
}

impl TransactionSession {
    pub fn new(property_id: ListingId) -> Self {
        Self::with_timing(property_id, SimulationTiming::default())
    }

    pub fn with_timing(property_id: ListingId, timing: SimulationTiming) -> Self {
        Self {
            property_id,
            timing,
            wallet_connected: false,
            simulating: false,
            logs: Vec::new(),
            hash: None,
        }
    }

    pub fn property_id(&self) -> ListingId {
        self.property_id
    }

    pub fn connect_wallet(&mut self) {
        self.wallet_connected = true;
    }

    pub fn is_wallet_connected(&self) -> bool {
        self.wallet_connected
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn logs(&self) -> &[TransactionLog] {
        &self.logs
    }

    pub fn hash(&self) -> Option<&TransactionHash> {
        self.hash.as_ref()
    }

    /// Close the dialog: disconnect the wallet and forget prior results.
    pub fn reset(&mut self) {
        self.wallet_connected = false;
        self.simulating = false;
        self.logs.clear();
        self.hash = None;
    }

    /// Run the three-step sequence, reporting each log entry to `on_log` as
    /// it is recorded.
    ///
    /// Dropping the future mid-sequence leaves the session marked as
    /// simulating until [`reset`](Self::reset).
    pub async fn simulate<F>(
        &mut self,
        mut on_log: F,
    ) -> Result<TransactionReceipt, TransactionError>
    where
        F: FnMut(&TransactionLog),
    {
        if self.simulating {
            return Err(TransactionError::AlreadySimulating);
        }
        if !self.wallet_connected {
            return Err(TransactionError::WalletNotConnected);
        }

        self.simulating = true;
        self.logs.clear();
        self.hash = None;

        self.record(TransactionLog::now("Pending..."), &mut on_log);

        tokio::time::sleep(self.timing.confirmation_delay).await;
        let hash = TransactionHash::generate();
        self.hash = Some(hash.clone());
        let confirmed = TransactionLog {
            tx_hash: Some(hash.clone()),
            ..TransactionLog::now(format!("Confirmed! Tx Hash: {}", hash.truncated()))
        };
        self.record(confirmed, &mut on_log);

        tokio::time::sleep(self.timing.explorer_delay).await;
        let explorer = TransactionLog {
            link: Some(hash.explorer_url()),
            ..TransactionLog::now("View on Sepolia Explorer")
        };
        self.record(explorer, &mut on_log);
        self.simulating = false;

        info!(property = %self.property_id, hash = %hash, "simulated transaction confirmed");

        Ok(TransactionReceipt {
            property_id: self.property_id,
            hash,
            logs: self.logs.clone(),
        })
    }

    fn record<F>(&mut self, entry: TransactionLog, on_log: &mut F)
    where
        F: FnMut(&TransactionLog),
    {
        on_log(&entry);
        self.logs.push(entry);
    }
}
