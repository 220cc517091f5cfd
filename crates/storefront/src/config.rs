//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_BASE_URL` - Product catalog API (default: <https://fakestoreapi.com>)
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `ORDER_SNAPSHOT_PATH` - Order snapshot file (default: .quickshop/orderSummary.json)
//! - `SHIPPING_FEE` - Flat shipping fee per order (default: 5.00)
//! - `TAX_FEE` - Flat tax per order (default: 3.00)
//! - `NOTIFY_ENDPOINT` - Order notification email service endpoint
//! - `NOTIFY_API_KEY` - Order notification API key (emails are sent only when
//!   both `NOTIFY_ENDPOINT` and `NOTIFY_API_KEY` are set)
//! - `NOTIFY_FROM` - Sender address for order emails (default: orders@quickshop.local)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use quickshop_core::Price;
use secrecy::SecretString;
use thiserror::Error;
use tracing::warn;
use url::Url;

const DEFAULT_CATALOG_BASE_URL: &str = "https://fakestoreapi.com";
const DEFAULT_SNAPSHOT_PATH: &str = ".quickshop/orderSummary.json";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Where the last order snapshot is kept
    pub snapshot_path: PathBuf,
    /// Flat fees added to every order
    pub totals: TotalsPolicy,
    /// Order notification email service, if configured
    pub notify: Option<NotifyConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (products live under `/products`)
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long successful responses stay cached
    pub cache_ttl: Duration,
}

/// Flat per-order fees.
///
/// Neither fee depends on the shipping address or the cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsPolicy {
    pub shipping: Price,
    pub taxes: Price,
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        Self {
            shipping: Price::from_cents(500),
            taxes: Price::from_cents(300),
        }
    }
}

/// Order notification email service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct NotifyConfig {
    /// Endpoint that accepts order events
    pub endpoint: Url,
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Sender address for order emails
    pub from: String,
}

impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// notification API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog = CatalogConfig::from_env()?;
        let snapshot_path = PathBuf::from(get_env_or_default(
            "ORDER_SNAPSHOT_PATH",
            DEFAULT_SNAPSHOT_PATH,
        ));
        let totals = TotalsPolicy::from_env()?;
        let notify = NotifyConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            catalog,
            snapshot_path,
            totals,
            notify,
            sentry_dsn,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url(
            "CATALOG_BASE_URL",
            &get_env_or_default("CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL),
        )?;
        let timeout = Duration::from_secs(parse_secs("CATALOG_TIMEOUT_SECS", "10")?);
        let cache_ttl = Duration::from_secs(parse_secs("CATALOG_CACHE_TTL_SECS", "300")?);

        Ok(Self {
            base_url,
            timeout,
            cache_ttl,
        })
    }
}

impl TotalsPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            shipping: parse_fee("SHIPPING_FEE", "5.00")?,
            taxes: parse_fee("TAX_FEE", "3.00")?,
        })
    }
}

impl NotifyConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_values(
            get_optional_env("NOTIFY_ENDPOINT"),
            get_optional_env("NOTIFY_API_KEY"),
            get_env_or_default("NOTIFY_FROM", "orders@quickshop.local"),
        )
    }

    /// Notification is enabled only when both endpoint and key are present.
    /// A key that is present must still pass the secret checks.
    fn from_values(
        endpoint: Option<String>,
        api_key: Option<String>,
        from: String,
    ) -> Result<Option<Self>, ConfigError> {
        let (endpoint, api_key) = match (endpoint, api_key) {
            (Some(endpoint), Some(api_key)) => (endpoint, api_key),
            (None, None) => return Ok(None),
            (Some(_), None) => {
                warn!("NOTIFY_ENDPOINT is set without NOTIFY_API_KEY, order emails disabled");
                return Ok(None);
            }
            (None, Some(_)) => {
                warn!("NOTIFY_API_KEY is set without NOTIFY_ENDPOINT, order emails disabled");
                return Ok(None);
            }
        };

        validate_secret_strength(&api_key, "NOTIFY_API_KEY")?;

        Ok(Some(Self {
            endpoint: parse_url("NOTIFY_ENDPOINT", &endpoint)?,
            api_key: SecretString::from(api_key),
            from,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_secs(key: &str, default: &str) -> Result<u64, ConfigError> {
    get_env_or_default(key, default)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_fee(key: &str, default: &str) -> Result<Price, ConfigError> {
    Price::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}
