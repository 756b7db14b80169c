//! Exchange-rate subsystem
//!
//! # Components
//!
//! - **cache**: TTL-gated, single-flight rate cache with degraded fallback
//! - **source**: the outbound HTTP seam ([`RateSource`]) and its client
//! - **store**: durable `{ userCurrency, exchangeRates, lastUpdated }` record
//! - **fallback**: static rate table used when the source is unreachable
//!
//! # Example
//!
//! ```rust,no_run
//! use stockpile::rates::{HttpRateSource, RateCache};
//! use std::sync::Arc;
//!
//! # async fn demo() -> stockpile::error::Result<()> {
//! let source = Arc::new(HttpRateSource::new()?);
//! let cache = RateCache::new(source);
//!
//! cache.refresh().await; // outbound fetch, or a no-op within the TTL
//! let usd = cache.get_rate("USD"); // pure read
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod fallback;
pub mod source;
pub mod store;

pub use cache::{CacheState, RateCache, TTL_SECONDS};
pub use fallback::{fallback_table, FALLBACK_RATES};
pub use source::{CurrencyListing, HttpRateSource, RateSource};
pub use store::{PersistedState, StateStore};
