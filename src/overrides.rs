//! User price overrides.
//!
//! An override maps an entry key to a user-supplied price or to an explicit
//! "unknown" (`None`). Both differ from having no override at all: an
//! explicit unknown still hides the entry's inline price.
//!
//! The [`OverrideStore`] loads the map once, applies edits, and writes the
//! whole map back to storage after every edit.

use crate::entry_key::EntryKey;
use crate::error::Result;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Storage key the override map is persisted under by default.
pub const DEFAULT_OVERRIDES_KEY: &str = "poe:priceOverridesDivine";

/// Entry key → overridden price. `Some(None)` from [`OverrideMap::get`] is
/// an explicit unknown.
///
/// Serializes as a flat JSON object, `null` for unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap(BTreeMap<EntryKey, Option<f64>>);

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The override for `key`: `None` when there is no override,
    /// `Some(None)` for an explicit unknown.
    pub fn get(&self, key: &EntryKey) -> Option<Option<f64>> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: EntryKey, price: Option<f64>) {
        self.0.insert(key, price);
    }

    pub fn remove(&mut self, key: &EntryKey) -> Option<Option<f64>> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, Option<f64>)> {
        self.0.iter().map(|(key, price)| (key, *price))
    }
}

impl FromIterator<(EntryKey, Option<f64>)> for OverrideMap {
    fn from_iter<I: IntoIterator<Item = (EntryKey, Option<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse what the user typed into a price field.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted.
/// Empty input means unknown; so does anything that is not a finite number.
/// Invalid input is never an error.
///
/// # Examples
///
/// ```rust
/// use buildprice::overrides::parse_price_input;
///
/// assert_eq!(parse_price_input(" 12 "), Some(12.0));
/// assert_eq!(parse_price_input("3,5"), Some(3.5));
/// assert_eq!(parse_price_input(""), None);
/// assert_eq!(parse_price_input("lots"), None);
/// assert_eq!(parse_price_input("inf"), None);
/// ```
pub fn parse_price_input(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replacen(',', ".", 1);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The override map bound to its persistent storage.
///
/// # Examples
///
/// ```rust
/// use buildprice::overrides::OverrideStore;
/// use buildprice::storage::MemoryStorage;
/// use buildprice::EntryKey;
///
/// let mut store = OverrideStore::open(MemoryStorage::new());
/// let key = EntryKey::from_str("k1");
///
/// store.set_override(key.clone(), "2,5").unwrap();
/// assert_eq!(store.overrides().get(&key), Some(Some(2.5)));
///
/// store.set_override(key.clone(), "").unwrap();
/// assert_eq!(store.overrides().get(&key), Some(None));
///
/// // Reloading sees every edit.
/// assert_eq!(store.load(), *store.overrides());
/// ```
pub struct OverrideStore<S: Storage> {
    storage: S,
    storage_key: String,
    overrides: OverrideMap,
}

impl<S: Storage> OverrideStore<S> {
    /// Open the store under [`DEFAULT_OVERRIDES_KEY`], loading the persisted map.
    pub fn open(storage: S) -> Self {
        Self::open_at(storage, DEFAULT_OVERRIDES_KEY)
    }

    /// Open the store under a custom storage key.
    pub fn open_at(storage: S, storage_key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            storage_key: storage_key.into(),
            overrides: OverrideMap::new(),
        };
        store.overrides = store.load();
        store
    }

    /// Read the persisted map. Missing or unreadable state loads as empty.
    pub fn load(&self) -> OverrideMap {
        let text = match self.storage.read(&self.storage_key) {
            Ok(Some(text)) => text,
            Ok(None) => return OverrideMap::new(),
            Err(err) => {
                log::warn!("could not read price overrides: {}", err);
                return OverrideMap::new();
            }
        };

        // A stored `null` is an empty map. Entries that are not a number or
        // `null` are dropped one by one so the rest survive.
        let entries = match serde_json::from_str::<Option<BTreeMap<String, Value>>>(&text) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                log::warn!(
                    "discarding corrupt price overrides under {}: {}",
                    self.storage_key,
                    err
                );
                return OverrideMap::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => Some((EntryKey::from(key), None)),
                Value::Number(n) => Some((EntryKey::from(key), n.as_f64())),
                other => {
                    log::warn!("dropping malformed price override {}: {}", key, other);
                    None
                }
            })
            .collect()
    }

    /// Persist `map` as the whole override state.
    pub fn save(&self, map: &OverrideMap) -> Result<()> {
        let text = serde_json::to_string(map)?;
        self.storage.write(&self.storage_key, &text)
    }

    /// The current override map.
    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    /// Record what the user typed for `key` and persist the map.
    ///
    /// The input is parsed with [`parse_price_input`]; unparseable input is
    /// stored as an explicit unknown. When the write fails the in-memory map
    /// is left as it was.
    pub fn set_override(&mut self, key: EntryKey, raw: &str) -> Result<&OverrideMap> {
        let price = parse_price_input(raw);
        log::debug!("override {} = {:?}", key, price);
        let previous = self.overrides.get(&key);
        self.overrides.set(key.clone(), price);
        if let Err(err) = self.save(&self.overrides) {
            self.restore(key, previous);
            return Err(err);
        }
        Ok(&self.overrides)
    }

    /// Drop the override for `key` so the inline price applies again, and
    /// persist the map.
    pub fn clear_override(&mut self, key: &EntryKey) -> Result<&OverrideMap> {
        if let Some(previous) = self.overrides.remove(key) {
            if let Err(err) = self.save(&self.overrides) {
                self.overrides.set(key.clone(), previous);
                return Err(err);
            }
        }
        Ok(&self.overrides)
    }

    /// Put back what `key` held before a failed write.
    fn restore(&mut self, key: EntryKey, previous: Option<Option<f64>>) {
        match previous {
            Some(price) => self.overrides.set(key, price),
            None => {
                self.overrides.remove(&key);
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
