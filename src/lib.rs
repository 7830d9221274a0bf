//! # buildprice - Build Classification and Pricing
//!
//! Turns a parsed character build (items and skill gems) into a
//! display-ready summary and prices it in divine orbs:
//! - **Classification** of items into equipment slots and jewel buckets by
//!   an ordered rule table
//! - **Stable keys** for every item and gem, so user edits survive
//!   re-formatting
//! - **Price overrides** that persist across sessions and always win over
//!   the upstream price
//! - **Totals** per category and for the whole build
//!
//! ## Pipeline
//!
//! ```text
//! [BuildDocument] → [format_build] → [ClassifiedSummary] → [BuildTotals]
//!                                             ↑
//!                                       [OverrideMap]
//! ```
//!
//! 1. **Records** are decoded leniently; malformed fields become defaults
//! 2. **Entries** get a stable key and land in exactly one bucket, or are dropped
//! 3. **Prices** resolve override first, then inline, then unknown
//!
//! ## Example
//!
//! ```rust
//! use buildprice::*;
//! use serde_json::json;
//!
//! let summary = format_build_json(&json!({
//!     "data": {
//!         "class": "Witch",
//!         "ascendClass": "Elementalist",
//!         "items": [
//!             {"type": "Armour", "subType": "Helmet", "name": "Crown", "priceDivine": 2.0},
//!             {"type": "Armour", "subType": "Helmet", "name": "Second Crown", "priceDivine": 9.0},
//!             {"type": "Jewelry", "subType": "Rings", "name": "Ring A", "priceDivine": 1.5}
//!         ]
//!     }
//! }));
//!
//! // The second helmet has nowhere to go.
//! assert_eq!(summary.equipment.len(), 2);
//!
//! let mut overrides = OverrideMap::new();
//! overrides.set(summary.armour.helmet.as_ref().unwrap().key.clone(), Some(3.0));
//!
//! let totals = BuildTotals::compute(&summary, &overrides);
//! assert_eq!(totals.equipment, 4.5);
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Upstream build document and lenient records
//! - [`entry_key`] - Stable entry identity
//! - [`entry`] - Normalized entries
//! - [`classifier`] - Rule table and bucket placement
//! - [`formatter`] - Build document to summary
//! - [`summary`] - The classified summary
//! - [`price`] - Price resolution
//! - [`overrides`] - User price overrides and their store
//! - [`storage`] - Key-value persistence backends
//! - [`totals`] - Price aggregation
//! - [`rate_cache`] - Chaos/divine rate caching
//! - [`session`] - Pricing one build end to end
//! - [`config`] - Persistence configuration
//! - [`error`] - Error types

pub mod classifier;
pub mod config;
pub mod entry;
pub mod entry_key;
pub mod error;
pub mod formatter;
pub mod lenient;
pub mod overrides;
pub mod price;
pub mod rate_cache;
pub mod record;
pub mod session;
pub mod storage;
pub mod summary;
pub mod totals;

// Re-export main types for convenience
pub use config::PricingConfig;
pub use entry::{Entry, EntryKind, GemDetails, TitleVariant};
pub use entry_key::EntryKey;
pub use error::{PricingError, Result};
pub use formatter::{format_build, format_build_json, format_build_str};
pub use overrides::{parse_price_input, OverrideMap, OverrideStore};
pub use price::{resolve_price, PriceSource, Priced};
pub use record::{BuildDocument, Rarity, RawGem, RawItem, SkillGroup};
pub use session::PricingSession;
pub use summary::ClassifiedSummary;
pub use totals::{sum, BuildTotals};
