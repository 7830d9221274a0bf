//! Price resolution.
//!
//! Decides the authoritative price of one entry. Precedence, strictly:
//!
//! 1. an override for the entry's key, even an explicit unknown;
//! 2. the entry's inline price;
//! 3. unknown.

use crate::entry::Entry;
use crate::entry_key::EntryKey;
use crate::overrides::OverrideMap;

/// Anything that can be priced: it has an identity and maybe an inline price.
pub trait Priced {
    fn key(&self) -> &EntryKey;

    /// The price attached upstream, if any.
    fn inline_price(&self) -> Option<f64>;
}

impl Priced for Entry {
    fn key(&self) -> &EntryKey {
        &self.key
    }

    fn inline_price(&self) -> Option<f64> {
        self.price_in_unit
    }
}

impl<P: Priced + ?Sized> Priced for &P {
    fn key(&self) -> &EntryKey {
        (**self).key()
    }

    fn inline_price(&self) -> Option<f64> {
        (**self).inline_price()
    }
}

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceSource {
    /// The user set this price (`None` is an explicit unknown).
    Override(Option<f64>),
    /// The upstream parser's price.
    Inline(f64),
    /// Nothing is known.
    Unknown,
}

impl PriceSource {
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceSource::Override(price) => *price,
            PriceSource::Inline(price) => Some(*price),
            PriceSource::Unknown => None,
        }
    }
}

/// Resolve an entry's price together with where it came from.
pub fn price_source<P: Priced + ?Sized>(entry: &P, overrides: &OverrideMap) -> PriceSource {
    if let Some(overridden) = overrides.get(entry.key()) {
        return PriceSource::Override(overridden);
    }
    match entry.inline_price() {
        Some(price) => PriceSource::Inline(price),
        None => PriceSource::Unknown,
    }
}

/// Resolve an entry's price; `None` means unknown.
///
/// # Examples
///
/// ```rust
/// use buildprice::{resolve_price, Entry, EntryKey, OverrideMap};
///
/// let entry = Entry {
///     key: EntryKey::from_str("k1"),
///     price_in_unit: Some(5.0),
///     ..Default::default()
/// };
///
/// let mut overrides = OverrideMap::new();
/// assert_eq!(resolve_price(&entry, &overrides), Some(5.0));
///
/// overrides.set(EntryKey::from_str("k1"), Some(8.0));
/// assert_eq!(resolve_price(&entry, &overrides), Some(8.0));
///
/// // An explicit unknown hides the inline price.
/// overrides.set(EntryKey::from_str("k1"), None);
/// assert_eq!(resolve_price(&entry, &overrides), None);
/// ```
pub fn resolve_price<P: Priced + ?Sized>(entry: &P, overrides: &OverrideMap) -> Option<f64> {
    price_source(entry, overrides).value()
}
