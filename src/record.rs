//! Raw build document records.
//!
//! These types mirror the JSON produced by the upstream build parser:
//!
//! ```text
//! { "data": { "class", "ascendClass", "items": [...], "skills": [...] } }
//! ```
//!
//! Every field is optional. Missing or wrongly-shaped fields fall back to
//! their defaults at this boundary so the classifier always receives fully
//! defaulted lists. Records are never mutated after decoding.

use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Item rarity as reported by the build parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    /// Parse an upstream rarity label. Labels are matched exactly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildprice::Rarity;
    ///
    /// assert_eq!(Rarity::parse("MAGIC"), Some(Rarity::Magic));
    /// assert_eq!(Rarity::parse("unique"), None);
    /// assert_eq!(Rarity::parse("Relic"), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "NORMAL" => Some(Rarity::Normal),
            "MAGIC" => Some(Rarity::Magic),
            "RARE" => Some(Rarity::Rare),
            "UNIQUE" => Some(Rarity::Unique),
            _ => None,
        }
    }

    /// The upstream label for this rarity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Normal => "NORMAL",
            Rarity::Magic => "MAGIC",
            Rarity::Rare => "RARE",
            Rarity::Unique => "UNIQUE",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rarity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Rarity::parse(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rarity: {}", label)))
    }
}

/// Lenient rarity decoder: unknown labels and non-strings become `None`.
fn opt_rarity<'de, D>(deserializer: D) -> Result<Option<Rarity>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::opt_string(deserializer)?.and_then(|label| Rarity::parse(&label)))
}

/// One `{name, values}` pair from an item's property list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    /// Usually text, but the upstream format does not guarantee it.
    #[serde(default)]
    pub values: Value,
}

impl Property {
    /// The property's values rendered as text.
    pub fn text(&self) -> String {
        lenient::value_text(&self.values)
    }
}

/// An equipment, jewel, or flask record from the build parser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Category label, e.g. `"Armour"` or `"Jewel"`. Flasks carry none.
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,

    #[serde(default, rename = "subType", deserialize_with = "lenient::opt_string")]
    pub sub_category: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub item_base: Option<String>,

    #[serde(default, deserialize_with = "opt_rarity")]
    pub rarity: Option<Rarity>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub properties: Vec<Property>,

    #[serde(default, deserialize_with = "lenient::lines")]
    pub implicit_mods: Vec<String>,

    #[serde(default, deserialize_with = "lenient::lines")]
    pub explicit_mods: Vec<String>,

    #[serde(default, deserialize_with = "lenient::price")]
    pub price_in_unit: Option<f64>,

    /// Name used by the upstream pricer for the same inline price.
    #[serde(default, deserialize_with = "lenient::price")]
    pub price_divine: Option<f64>,

    #[serde(default, deserialize_with = "lenient::price")]
    pub price_chaos: Option<f64>,

    /// Key cached by an earlier formatting pass.
    #[serde(default, rename = "_key", deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
}

impl RawItem {
    /// The inline suggested price, if the parser attached one.
    pub fn inline_price(&self) -> Option<f64> {
        self.price_in_unit.or(self.price_divine)
    }
}

/// A gem inside a skill group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name_spec: String,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub level: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub quality: Option<u32>,

    #[serde(default, rename = "Corrupted", deserialize_with = "lenient::opt_bool")]
    pub corrupted: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub enabled: Option<bool>,

    /// Set by the upstream pricer when it priced a different level/quality.
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub fallback_used: Option<bool>,

    #[serde(default, deserialize_with = "lenient::price")]
    pub price_in_unit: Option<f64>,

    #[serde(default, deserialize_with = "lenient::price")]
    pub price_divine: Option<f64>,

    #[serde(default, rename = "_key", deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
}

impl RawGem {
    pub fn inline_price(&self) -> Option<f64> {
        self.price_in_unit.or(self.price_divine)
    }

    pub fn is_corrupted(&self) -> bool {
        self.corrupted.unwrap_or(false)
    }
}

/// A skill group: the gems socketed together in one slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillGroup {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub slot: Option<String>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub gems: Vec<RawGem>,
}

impl SkillGroup {
    /// Label used when a group has no slot.
    pub const UNKNOWN_SLOT: &'static str = "Unknown";

    /// The slot label, or [`SkillGroup::UNKNOWN_SLOT`] when absent or empty.
    pub fn slot_label(&self) -> &str {
        match self.slot.as_deref() {
            Some(slot) if !slot.is_empty() => slot,
            _ => Self::UNKNOWN_SLOT,
        }
    }
}

/// The `data` object of a build document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildData {
    #[serde(default, rename = "class", deserialize_with = "lenient::string")]
    pub character_class: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub ascend_class: String,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub items: Vec<RawItem>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub skills: Vec<SkillGroup>,
}

/// A parsed build document as returned by the build parsing service.
///
/// # Examples
///
/// ```rust
/// use buildprice::BuildDocument;
/// use serde_json::json;
///
/// let doc = BuildDocument::from_value(&json!({
///     "data": { "class": "Witch", "items": null }
/// }));
/// assert_eq!(doc.data.character_class, "Witch");
/// assert!(doc.data.items.is_empty());
///
/// // Anything that is not an object is an empty build.
/// let empty = BuildDocument::from_value(&json!(42));
/// assert!(empty.data.skills.is_empty());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub data: BuildData,
}

impl BuildDocument {
    /// Decode a document from JSON, substituting defaults for anything absent
    /// or malformed. Never fails.
    pub fn from_value(value: &Value) -> Self {
        match BuildDocument::deserialize(value) {
            Ok(doc) => doc,
            Err(err) => {
                log::debug!("build document is not an object, using empty build: {}", err);
                BuildDocument::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_decoding() {
        let item: RawItem = serde_json::from_value(json!({
            "type": "Armour",
            "subType": "Helmet",
            "name": "Goldrim",
            "itemBase": "Leather Cap",
            "rarity": "UNIQUE",
            "properties": [{"name": "Unique ID", "values": "abc"}],
            "implicitMods": ["+1 to Level"],
            "priceDivine": 0.5
        }))
        .unwrap();

        assert_eq!(item.category.as_deref(), Some("Armour"));
        assert_eq!(item.sub_category.as_deref(), Some("Helmet"));
        assert_eq!(item.rarity, Some(Rarity::Unique));
        assert_eq!(item.properties[0].text(), "abc");
        assert_eq!(item.implicit_mods.len(), 1);
        assert_eq!(item.inline_price(), Some(0.5));
    }

    #[test]
    fn test_price_in_unit_wins_over_alias() {
        let item: RawItem =
            serde_json::from_value(json!({"priceInUnit": 2.0, "priceDivine": 7.0})).unwrap();
        assert_eq!(item.inline_price(), Some(2.0));
    }

    #[test]
    fn test_malformed_properties_are_empty() {
        let item: RawItem =
            serde_json::from_value(json!({"type": "Jewel", "properties": {"x": 1}})).unwrap();
        assert!(item.properties.is_empty());
    }

    #[test]
    fn test_gem_decoding() {
        let gem: RawGem = serde_json::from_value(json!({
            "nameSpec": "Arc",
            "level": "20",
            "quality": 20,
            "Corrupted": null,
            "priceDivine": null
        }))
        .unwrap();

        assert_eq!(gem.name_spec, "Arc");
        assert_eq!(gem.level, Some(20));
        assert!(!gem.is_corrupted());
        assert_eq!(gem.inline_price(), None);
    }

    #[test]
    fn test_slot_label_defaults() {
        let group: SkillGroup = serde_json::from_value(json!({"slot": ""})).unwrap();
        assert_eq!(group.slot_label(), "Unknown");
        let group: SkillGroup = serde_json::from_value(json!({"slot": "Helmet"})).unwrap();
        assert_eq!(group.slot_label(), "Helmet");
    }

    #[test]
    fn test_document_defaults() {
        let doc = BuildDocument::from_value(&json!({"data": {"items": "nope", "skills": 3}}));
        assert_eq!(doc.data.character_class, "");
        assert_eq!(doc.data.ascend_class, "");
        assert!(doc.data.items.is_empty());
        assert!(doc.data.skills.is_empty());

        let doc = BuildDocument::from_value(&json!({"data": "nope"}));
        assert!(doc.data.items.is_empty());
    }
}
