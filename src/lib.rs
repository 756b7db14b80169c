//! # Stockpile
//!
//! Currency conversion and exchange-rate caching engine for the Stockpile
//! inventory dashboard.
//!
//! All persisted amounts are denominated in a single fixed storage currency
//! (NGN). The engine keeps a process-wide exchange-rate table, refreshed on
//! a one-hour TTL from an external rate source, and converts amounts
//! bidirectionally between the storage currency and the user's chosen
//! display currency. When the source is unreachable it degrades to a static
//! fallback table rather than failing, and unknown currencies convert as
//! identity so a save operation is never blocked.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stockpile::prelude::*;
//!
//! # async fn demo() -> stockpile::error::Result<()> {
//! let engine = CurrencyEngine::with_defaults()?;
//!
//! engine.set_display_selection("USD - US Dollar").await;
//!
//! // Entered on a form in USD, stored in NGN:
//! let stored = engine.convert_to_base(19.99, "USD - US Dollar");
//!
//! // Rendered back for display:
//! let label = engine.format(engine.convert_from_base(stored, "USD - US Dollar"), None);
//! # Ok(())
//! # }
//! ```

pub mod currency;
pub mod engine;
pub mod error;
pub mod rates;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::currency::{extract_code, format_amount, BASE_CURRENCY};
    pub use crate::engine::CurrencyEngine;
    pub use crate::error::{CurrencyError, Result};
    pub use crate::rates::{CacheState, HttpRateSource, RateCache, RateSource, StateStore};
}
