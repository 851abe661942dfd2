use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub imagery: ImageryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            imagery: ImageryConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_IMAGE_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Image generation credentials and pacing.
///
/// The credential is read once at startup. When it is absent every listing
/// photo resolves to a placeholder without touching the network.
#[derive(Clone)]
pub struct ImageryConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub inter_item_delay: Duration,
}

impl ImageryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let max_attempts = parse_u64("IMAGE_MAX_ATTEMPTS", 3)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                variable: "IMAGE_MAX_ATTEMPTS",
            });
        }
        let max_attempts =
            u32::try_from(max_attempts).map_err(|_| ConfigError::InvalidNumber {
                variable: "IMAGE_MAX_ATTEMPTS",
            })?;

        Ok(Self {
            api_key,
            api_base_url: env::var("IMAGE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_API_BASE_URL.to_string()),
            model: env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            max_attempts,
            initial_backoff: Duration::from_secs(parse_u64("IMAGE_INITIAL_BACKOFF_SECS", 5)?),
            inter_item_delay: Duration::from_secs(parse_u64("GALLERY_INTER_ITEM_DELAY_SECS", 5)?),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_IMAGE_API_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(5),
            inter_item_delay: Duration::from_secs(5),
        }
    }
}

impl fmt::Debug for ImageryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("max_attempts", &self.max_attempts)
            .field("initial_backoff", &self.initial_backoff)
            .field("inter_item_delay", &self.inter_item_delay)
            .finish()
    }
}

fn parse_u64(variable: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { variable }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
