//! Currency engine facade
//!
//! [`CurrencyEngine`] is what the dashboard talks to: bidirectional
//! conversion between the storage currency and the user's display currency,
//! display formatting, selection management, and explicit persistence. It
//! wraps [`RateCache`] so callers never await a network call just to render
//! a price, and it never returns an error from the conversion surface —
//! unresolvable conversions degrade to identity (fail-open) because a
//! missing rate must never block a save.

use crate::currency::{extract_code, format_amount, symbol, BASE_CURRENCY};
use crate::error::Result;
use crate::rates::{CacheState, HttpRateSource, PersistedState, RateCache, RateSource, StateStore};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// Default display selection for first runs
const DEFAULT_SELECTION: &str = "NGN - Nigerian Naira";

/// Facade over the rate cache: conversion math, formatting, selection state,
/// persistence
pub struct CurrencyEngine {
    cache: RateCache,
    selection: RwLock<String>,
    store: StateStore,
}

impl CurrencyEngine {
    /// Build an engine over the given source and store, restoring any
    /// persisted state before the first refresh.
    pub fn new(source: Arc<dyn RateSource>, store: StateStore) -> Self {
        let cache = RateCache::new(source);
        let mut selection = DEFAULT_SELECTION.to_string();

        match store.load() {
            Ok(Some(persisted)) => {
                selection = persisted.user_currency;
                let last_fetched_at = persisted
                    .last_updated
                    .and_then(DateTime::<Utc>::from_timestamp_millis);
                cache.restore(persisted.exchange_rates, last_fetched_at);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not restore currency state: {}", e),
        }

        Self {
            cache,
            selection: RwLock::new(selection),
            store,
        }
    }

    /// Build an engine with the production HTTP source and the default
    /// platform store location.
    pub fn with_defaults() -> Result<Self> {
        let source = Arc::new(HttpRateSource::new()?);
        let store = StateStore::new(StateStore::default_path()?);
        Ok(Self::new(source, store))
    }

    /// The user's current display-currency selection string
    pub fn display_selection(&self) -> String {
        self.selection.read().unwrap().clone()
    }

    /// Change the display currency and refresh rates as a side effect.
    /// The new selection is persisted immediately.
    pub async fn set_display_selection(&self, selection: &str) {
        {
            let mut current = self.selection.write().unwrap();
            *current = selection.to_string();
        }
        self.refresh().await;
        if let Err(e) = self.save() {
            log::warn!("Could not persist currency state: {}", e);
        }
    }

    /// Refresh the rate table if stale, persisting after a successful fetch
    pub async fn refresh(&self) {
        let before = self.cache.snapshot().last_fetched_at;
        self.cache.refresh().await;

        // Persist only when a fetch actually landed; the cache-hit path
        // stays side-effect free.
        let snapshot = self.cache.snapshot();
        if snapshot.last_fetched_at != before && snapshot.last_error.is_none() {
            if let Err(e) = self.save() {
                log::warn!("Could not persist refreshed rates: {}", e);
            }
        }
    }

    /// Convert a display-currency amount into the storage currency.
    ///
    /// Storage-currency selections are an exact identity (no floating-point
    /// noise). A missing rate is fail-open: the amount comes back unchanged,
    /// with a warning, so saves are never blocked by an unknown currency.
    pub fn convert_to_base(&self, amount: f64, selection: &str) -> f64 {
        let code = extract_code(selection);
        if code == BASE_CURRENCY {
            return amount;
        }

        match self.cache.get_rate(&code) {
            // rate = units of `code` per 1 base unit, so divide to recover base
            Some(rate) if rate > 0.0 => amount / rate,
            _ => {
                log::warn!("No exchange rate found for {}, using amount as is", code);
                amount
            }
        }
    }

    /// Convert a storage-currency amount into the display currency.
    /// Exact multiplicative inverse of [`convert_to_base`]; same fail-open
    /// policy.
    ///
    /// [`convert_to_base`]: CurrencyEngine::convert_to_base
    pub fn convert_from_base(&self, amount: f64, selection: &str) -> f64 {
        let code = extract_code(selection);
        if code == BASE_CURRENCY {
            return amount;
        }

        match self.cache.get_rate(&code) {
            Some(rate) if rate > 0.0 => amount * rate,
            _ => {
                log::warn!(
                    "No exchange rate found for {}, returning {} value",
                    code,
                    BASE_CURRENCY
                );
                amount
            }
        }
    }

    /// Format an amount for display; `None` uses the current selection.
    /// Presentation only, never re-convert or persist the result.
    pub fn format(&self, amount: f64, selection: Option<&str>) -> String {
        let code = match selection {
            Some(s) => extract_code(s),
            None => extract_code(&self.display_selection()),
        };
        format_amount(amount, &code)
    }

    /// Display symbol for a selection; `None` uses the current selection
    pub fn currency_symbol(&self, selection: Option<&str>) -> String {
        let code = match selection {
            Some(s) => extract_code(s),
            None => extract_code(&self.display_selection()),
        };
        symbol(&code).to_string()
    }

    /// Observable cache state (rates, `is_loading`, `last_error`)
    pub fn snapshot(&self) -> CacheState {
        self.cache.snapshot()
    }

    /// Direct access to the underlying cache
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Persist the current selection and rate table.
    ///
    /// Called automatically after a successful refresh and on selection
    /// change; call it explicitly before teardown.
    pub fn save(&self) -> Result<()> {
        let snapshot = self.cache.snapshot();
        let state = PersistedState {
            user_currency: self.display_selection(),
            exchange_rates: snapshot.rates,
            last_updated: snapshot.last_fetched_at.map(|t| t.timestamp_millis()),
        };
        self.store.save(&state)
    }
}
