//! A pricing session over one formatted build.
//!
//! Binds the classified summary to the override store and exposes what an
//! editing surface needs: the price shown for each entry, edits, and the
//! running totals.

use crate::entry::Entry;
use crate::entry_key::EntryKey;
use crate::error::Result;
use crate::formatter::format_build;
use crate::overrides::{OverrideMap, OverrideStore};
use crate::price::resolve_price;
use crate::record::BuildDocument;
use crate::storage::Storage;
use crate::summary::ClassifiedSummary;
use crate::totals::{unpriced, BuildTotals};

/// One build being priced.
///
/// # Examples
///
/// ```rust
/// use buildprice::overrides::OverrideStore;
/// use buildprice::storage::MemoryStorage;
/// use buildprice::{BuildDocument, PricingSession};
/// use serde_json::json;
///
/// let doc = BuildDocument::from_value(&json!({
///     "data": {
///         "items": [
///             {"type": "Armour", "subType": "Helmet", "name": "Goldrim", "priceDivine": 0.5}
///         ]
///     }
/// }));
///
/// let mut session = PricingSession::from_document(&doc, OverrideStore::open(MemoryStorage::new()));
/// assert_eq!(session.totals().equipment, 0.5);
///
/// let key = session.summary().equipment[0].key.clone();
/// session.set_price(key, "2").unwrap();
/// assert_eq!(session.totals().total, 2.0);
/// ```
pub struct PricingSession<S: Storage> {
    summary: ClassifiedSummary,
    store: OverrideStore<S>,
}

impl<S: Storage> PricingSession<S> {
    pub fn new(summary: ClassifiedSummary, store: OverrideStore<S>) -> Self {
        Self { summary, store }
    }

    /// Format `document` and start a session over it.
    pub fn from_document(document: &BuildDocument, store: OverrideStore<S>) -> Self {
        Self::new(format_build(document), store)
    }

    pub fn summary(&self) -> &ClassifiedSummary {
        &self.summary
    }

    pub fn overrides(&self) -> &OverrideMap {
        self.store.overrides()
    }

    /// The price to show for `entry`.
    pub fn price(&self, entry: &Entry) -> Option<f64> {
        resolve_price(entry, self.store.overrides())
    }

    /// The price to show for the entry with `key`, if the build has one.
    pub fn price_of(&self, key: &EntryKey) -> Option<f64> {
        self.summary.find(key).and_then(|entry| self.price(entry))
    }

    /// Apply what the user typed for `key` and return the entry's new price.
    pub fn set_price(&mut self, key: EntryKey, raw: &str) -> Result<Option<f64>> {
        let price = self.store.set_override(key.clone(), raw)?.get(&key).flatten();
        Ok(price)
    }

    /// Remove the user's price for `key`, restoring the inline price.
    pub fn clear_price(&mut self, key: &EntryKey) -> Result<()> {
        self.store.clear_override(key)?;
        Ok(())
    }

    pub fn totals(&self) -> BuildTotals {
        BuildTotals::compute(&self.summary, self.store.overrides())
    }

    /// Entries still without a known price.
    pub fn unpriced(&self) -> Vec<&Entry> {
        unpriced(self.summary.entries(), self.store.overrides())
    }

    pub fn into_store(self) -> OverrideStore<S> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn session() -> PricingSession<MemoryStorage> {
        let doc = BuildDocument::from_value(&json!({
            "data": {
                "items": [
                    {"type": "Weapon", "name": "Wand", "priceDivine": 1.0},
                    {"type": "Jewel", "subType": "Timeless Jewel", "name": "Glorious Vanity", "priceDivine": 4.0},
                    {"name": "Divine Life Flask", "rarity": "MAGIC"}
                ],
                "skills": [
                    {"slot": "Weapon 1", "gems": [{"nameSpec": "Arc", "priceDivine": 0.25}]}
                ]
            }
        }));
        PricingSession::from_document(&doc, OverrideStore::open(MemoryStorage::new()))
    }

    #[test]
    fn test_totals() {
        let totals = session().totals();
        assert_eq!(totals.equipment, 1.0);
        assert_eq!(totals.jewels, 4.0);
        assert_eq!(totals.gems, 0.25);
        assert_eq!(totals.flasks, 0.0);
        assert_eq!(totals.total, 5.25);
    }

    #[test]
    fn test_edit_and_clear() {
        let mut session = session();
        let flask = session.summary().flasks[0].key.clone();
        assert_eq!(session.unpriced().len(), 1);

        assert_eq!(session.set_price(flask.clone(), "0,5").unwrap(), Some(0.5));
        assert_eq!(session.price_of(&flask), Some(0.5));
        assert!(session.unpriced().is_empty());
        assert_eq!(session.totals().flasks, 0.5);

        let wand = session.summary().equipment[0].key.clone();
        assert_eq!(session.set_price(wand.clone(), "").unwrap(), None);
        assert_eq!(session.totals().equipment, 0.0);

        session.clear_price(&wand).unwrap();
        assert_eq!(session.price_of(&wand), Some(1.0));
    }
}
