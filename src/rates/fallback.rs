//! Degraded-mode fallback rate table
//!
//! When the rate source cannot be reached and no cached table exists, the
//! cache installs these approximate static rates so the dashboard keeps
//! rendering converted values instead of crashing. Rates are units of the
//! given currency per 1 NGN.

use std::collections::HashMap;

/// Approximate static rates against the storage currency (NGN).
pub const FALLBACK_RATES: &[(&str, f64)] = &[
    ("NGN", 1.0),
    ("USD", 0.0012),
    ("EUR", 0.0011),
    ("GBP", 0.00095),
    ("JPY", 0.18),
    ("CNY", 0.0087),
    ("INR", 0.10),
    ("CAD", 0.0017),
    ("AUD", 0.0018),
    ("CHF", 0.0011),
];

/// Build the fallback table as an owned map.
pub fn fallback_table() -> HashMap<String, f64> {
    FALLBACK_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), *rate))
        .collect()
}
