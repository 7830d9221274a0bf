//! Classified entries.
//!
//! An `Entry` is an item or gem record after classification, carrying its
//! identity key and inline price. Entries are what the price resolver and
//! the aggregator operate on.

use crate::entry_key::{derive_key, EntryKey, KeySource, UNIQUE_ID_PROPERTY};
use crate::record::{Property, Rarity, RawGem, RawItem};
use serde::{Deserialize, Serialize};

/// Category label given to every gem entry.
pub const GEM_CATEGORY: &str = "Gem";

/// Whether an entry came from the item list or from a skill group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Item,
    Gem,
}

/// Heading style for an entry's name, from its kind and rarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleVariant {
    Gem,
    Unique,
    Rare,
    Magic,
    Normal,
}

/// Gem-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemDetails {
    pub level: Option<u32>,
    pub quality: Option<u32>,
    pub corrupted: bool,
    pub enabled: Option<bool>,

    /// The inline price was looked up for a different level or quality.
    pub fallback_used: Option<bool>,
}

/// An item or gem after classification.
///
/// # Examples
///
/// ```rust
/// use buildprice::{Entry, RawItem, Rarity};
///
/// let raw = RawItem {
///     category: Some("Armour".into()),
///     sub_category: Some("Gloves".into()),
///     name: Some("Hrimsorrow".into()),
///     rarity: Some(Rarity::Unique),
///     price_in_unit: Some(0.1),
///     ..Default::default()
/// };
///
/// let entry = Entry::from_item(&raw);
/// assert_eq!(entry.key.as_str(), "Armour|Gloves|Hrimsorrow||");
/// assert_eq!(entry.price_in_unit, Some(0.1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "_key")]
    pub key: EntryKey,

    pub kind: EntryKind,

    #[serde(rename = "type")]
    pub category: String,

    #[serde(rename = "subType")]
    pub sub_category: String,

    pub name: String,
    pub item_base: String,
    pub rarity: Option<Rarity>,
    pub properties: Vec<Property>,
    pub implicit_mods: Vec<String>,
    pub explicit_mods: Vec<String>,

    /// Inline suggested price from the upstream parser.
    pub price_in_unit: Option<f64>,

    pub price_chaos: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem: Option<GemDetails>,
}

impl Entry {
    /// Build an entry from a raw item, keeping a key cached by an earlier
    /// formatting pass or deriving a fresh one.
    pub fn from_item(raw: &RawItem) -> Self {
        let key = match raw.key.as_deref() {
            Some(cached) if !cached.is_empty() => EntryKey::from_str(cached),
            _ => derive_key(raw, ""),
        };

        Self {
            key,
            kind: EntryKind::Item,
            category: raw.category.clone().unwrap_or_default(),
            sub_category: raw.sub_category.clone().unwrap_or_default(),
            name: raw.name.clone().unwrap_or_default(),
            item_base: raw.item_base.clone().unwrap_or_default(),
            rarity: raw.rarity,
            properties: raw.properties.clone(),
            implicit_mods: raw.implicit_mods.clone(),
            explicit_mods: raw.explicit_mods.clone(),
            price_in_unit: raw.inline_price(),
            price_chaos: raw.price_chaos,
            gem: None,
        }
    }

    /// Build an entry for the gem at `index` within skill slot `slot`.
    ///
    /// Gems have no natural unique id, so the index disambiguates gems with
    /// the same name in the same slot. Rarity is `UNIQUE` for corrupted gems
    /// and `MAGIC` otherwise.
    pub fn from_gem(raw: &RawGem, slot: &str, index: usize) -> Self {
        let mut entry = Self {
            key: EntryKey::default(),
            kind: EntryKind::Gem,
            category: GEM_CATEGORY.to_string(),
            sub_category: slot.to_string(),
            name: raw.name_spec.clone(),
            rarity: Some(if raw.is_corrupted() {
                Rarity::Unique
            } else {
                Rarity::Magic
            }),
            price_in_unit: raw.inline_price(),
            gem: Some(GemDetails {
                level: raw.level,
                quality: raw.quality,
                corrupted: raw.is_corrupted(),
                enabled: raw.enabled,
                fallback_used: raw.fallback_used,
            }),
            ..Default::default()
        };

        entry.key = match raw.key.as_deref() {
            Some(cached) if !cached.is_empty() => EntryKey::from_str(cached),
            _ => derive_key(&entry, &index.to_string()),
        };
        entry
    }

    pub fn is_gem(&self) -> bool {
        self.kind == EntryKind::Gem
    }

    /// The name to show: the item name, or its base when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.item_base
        } else {
            &self.name
        }
    }

    /// Heading style for this entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildprice::{Entry, Rarity};
    /// use buildprice::entry::TitleVariant;
    ///
    /// let entry = Entry { rarity: Some(Rarity::Rare), ..Default::default() };
    /// assert_eq!(entry.title_variant(), TitleVariant::Rare);
    /// ```
    pub fn title_variant(&self) -> TitleVariant {
        if self.is_gem() {
            return TitleVariant::Gem;
        }
        match self.rarity {
            Some(Rarity::Unique) => TitleVariant::Unique,
            Some(Rarity::Rare) => TitleVariant::Rare,
            Some(Rarity::Magic) => TitleVariant::Magic,
            Some(Rarity::Normal) | None => TitleVariant::Normal,
        }
    }
}

impl KeySource for Entry {
    fn category(&self) -> &str {
        &self.category
    }

    fn sub_category(&self) -> &str {
        &self.sub_category
    }

    fn display_name(&self) -> &str {
        Entry::display_name(self)
    }

    fn unique_id(&self) -> Option<String> {
        self.properties
            .iter()
            .find(|p| p.name == UNIQUE_ID_PROPERTY)
            .map(|p| p.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_entry_keeps_cached_key() {
        let raw: RawItem = serde_json::from_value(json!({
            "type": "Armour",
            "subType": "Boots",
            "name": "Seven-League Step",
            "_key": "cached"
        }))
        .unwrap();
        assert_eq!(Entry::from_item(&raw).key.as_str(), "cached");
    }

    #[test]
    fn test_item_and_entry_derive_same_key() {
        let raw: RawItem = serde_json::from_value(json!({
            "type": "Jewel",
            "subType": "Timeless Jewel",
            "itemBase": "Timeless Jewel",
            "properties": [{"name": "Unique ID", "values": "77"}]
        }))
        .unwrap();
        let entry = Entry::from_item(&raw);
        assert_eq!(entry.key, derive_key(&entry, ""));
        assert_eq!(entry.key.as_str(), "Jewel|Timeless Jewel|Timeless Jewel|77|");
    }

    #[test]
    fn test_gem_entry() {
        let raw: RawGem = serde_json::from_value(json!({
            "nameSpec": "Vaal Grace",
            "level": 21,
            "quality": 0,
            "Corrupted": true,
            "priceDivine": 1.5
        }))
        .unwrap();

        let entry = Entry::from_gem(&raw, "Body Armour", 3);
        assert!(entry.is_gem());
        assert_eq!(entry.category, "Gem");
        assert_eq!(entry.sub_category, "Body Armour");
        assert_eq!(entry.name, "Vaal Grace");
        assert_eq!(entry.rarity, Some(Rarity::Unique));
        assert_eq!(entry.price_in_unit, Some(1.5));
        assert_eq!(entry.key.as_str(), "Gem|Body Armour|Vaal Grace||3");
        assert_eq!(entry.title_variant(), TitleVariant::Gem);
    }

    #[test]
    fn test_uncorrupted_gem_is_magic() {
        let raw = RawGem {
            name_spec: "Arc".into(),
            ..Default::default()
        };
        let entry = Entry::from_gem(&raw, "Helmet", 0);
        assert_eq!(entry.rarity, Some(Rarity::Magic));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = Entry::from_item(&RawItem {
            category: Some("Weapon".into()),
            name: Some("Doryani's Catalyst".into()),
            ..Default::default()
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["_key"], json!("Weapon||Doryani's Catalyst||"));
        assert_eq!(value["type"], json!("Weapon"));
        assert!(value.get("gem").is_none());
    }

    #[test]
    fn test_entry_from_loose_json() {
        let entry: Entry =
            serde_json::from_value(json!({"_key": "k1", "priceInUnit": 5})).unwrap();
        assert_eq!(entry.key.as_str(), "k1");
        assert_eq!(entry.price_in_unit, Some(5.0));
    }
}
