//! External rate source integration
//!
//! The cache talks to the outside world through the [`RateSource`] trait so
//! tests can swap in a mock without touching the network. The production
//! implementation is [`HttpRateSource`], a thin client for the
//! exchangerate-api.com "latest" endpoint.

use crate::error::{CurrencyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const RATE_SOURCE_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";
const CURRENCY_DIRECTORY_URL: &str = "https://openexchangerates.org/api/currencies.json";

/// Trait for fetching an exchange-rate table keyed by a base currency
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the full rate table against `base` (units of each currency per
    /// 1 unit of `base`).
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Expected response body: `{ "rates": { "USD": 0.0012, ... } }`
///
/// A missing or non-object `rates` field fails deserialization, which the
/// caller treats the same as an unreachable source.
#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: HashMap<String, f64>,
}

/// HTTP rate source (no API key required)
pub struct HttpRateSource {
    client: Client,
    base_url: String,
}

impl HttpRateSource {
    /// Create a new HTTP rate source against the default endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(RATE_SOURCE_BASE_URL)
    }

    /// Create a rate source against a custom endpoint
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CurrencyError::SourceUnreachable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the list of known currencies as `(code, name)` pairs, sorted by
    /// name. Used to populate the display-currency selector.
    pub async fn fetch_currency_directory(&self) -> Result<Vec<CurrencyListing>> {
        let response = self
            .client
            .get(CURRENCY_DIRECTORY_URL)
            .send()
            .await
            .map_err(|e| CurrencyError::SourceUnreachable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CurrencyError::SourceUnreachable(format!(
                "Currency directory returned error: {}",
                response.status()
            )));
        }

        let names: HashMap<String, String> = response.json().await.map_err(|e| {
            CurrencyError::MalformedResponse(format!("Failed to parse currency directory: {}", e))
        })?;

        let mut listings: Vec<CurrencyListing> = names
            .into_iter()
            .map(|(code, name)| CurrencyListing::new(code, name))
            .collect();
        listings.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(listings)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/{}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CurrencyError::SourceUnreachable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CurrencyError::SourceUnreachable(format!(
                "Rate source returned error: {}",
                response.status()
            )));
        }

        let body: RateResponse = response.json().await.map_err(|e| {
            CurrencyError::MalformedResponse(format!("Failed to parse rate response: {}", e))
        })?;

        Ok(body.rates)
    }

    fn name(&self) -> &str {
        "exchangerate-api"
    }
}

/// A selectable currency: code, human name, display symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyListing {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl CurrencyListing {
    fn new(code: String, name: String) -> Self {
        let symbol = crate::currency::symbol(&code).to_string();
        Self { code, name, symbol }
    }

    /// Render as a display-currency selection string (`"USD - US Dollar"`)
    pub fn as_selection(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}
