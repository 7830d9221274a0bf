//! Entry identity keys.
//!
//! Provides the `EntryKey` type and the derivation that builds it from an
//! item or gem. Keys are the identity of an entry: overrides are stored
//! under them, and once an entry has a key it keeps it.

use crate::record::RawItem;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Name of the item property holding the parser's unique item id.
pub const UNIQUE_ID_PROPERTY: &str = "Unique ID";

/// Separator between key components.
const SEPARATOR: &str = "|";

/// Stable identity of an item or gem entry.
///
/// Uses `Arc<str>` so that entries, override maps and totals can share
/// keys cheaply.
///
/// # Examples
///
/// ```rust
/// use buildprice::EntryKey;
///
/// let key = EntryKey::from_str("Armour|Helmet|Goldrim||");
/// let same: EntryKey = "Armour|Helmet|Goldrim||".into();
///
/// assert_eq!(key, same);
/// assert_eq!(key.as_str(), "Armour|Helmet|Goldrim||");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey(Arc<str>);

impl Default for EntryKey {
    fn default() -> Self {
        Self::from_str("")
    }
}

impl Serialize for EntryKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EntryKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EntryKey::from(s))
    }
}

impl EntryKey {
    /// Create a key from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EntryKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields a key is derived from.
///
/// Implemented by raw items and by classified entries so both derive the
/// same key for the same logical record.
pub trait KeySource {
    /// Category label, empty when absent.
    fn category(&self) -> &str;

    /// Sub-category label, empty when absent.
    fn sub_category(&self) -> &str;

    /// Display name, falling back to the base item name when the name is empty.
    fn display_name(&self) -> &str;

    /// Text of the unique id property, if the record has one.
    fn unique_id(&self) -> Option<String>;
}

impl KeySource for RawItem {
    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    fn sub_category(&self) -> &str {
        self.sub_category.as_deref().unwrap_or_default()
    }

    fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.item_base.as_deref().unwrap_or_default(),
        }
    }

    fn unique_id(&self) -> Option<String> {
        self.properties
            .iter()
            .find(|p| p.name == UNIQUE_ID_PROPERTY)
            .map(|p| p.text())
    }
}

/// Derive the identity key of a record.
///
/// The key joins, in order: category, sub-category, display name, unique
/// id and `disambiguator`, separated by `|`. Records without a natural
/// unique id (gems) pass their position as the disambiguator.
///
/// # Examples
///
/// ```rust
/// use buildprice::entry_key::derive_key;
/// use buildprice::RawItem;
///
/// let item = RawItem {
///     category: Some("Armour".into()),
///     sub_category: Some("Boots".into()),
///     item_base: Some("Slink Boots".into()),
///     ..Default::default()
/// };
///
/// assert_eq!(derive_key(&item, "").as_str(), "Armour|Boots|Slink Boots||");
/// assert_eq!(derive_key(&item, "2").as_str(), "Armour|Boots|Slink Boots||2");
/// ```
pub fn derive_key(record: &impl KeySource, disambiguator: &str) -> EntryKey {
    let unique_id = record.unique_id().unwrap_or_default();
    EntryKey::from(
        [
            record.category(),
            record.sub_category(),
            record.display_name(),
            unique_id.as_str(),
            disambiguator,
        ]
        .join(SEPARATOR),
    )
}
