//! Classified build summary types.
//!
//! The summary is the normalized, nested shape handed to the display
//! layer: fixed single-valued slots for physically singular equipment,
//! lists for everything that can repeat, and gems grouped by skill slot.

use crate::entry::Entry;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Character and ascendancy class names; empty when the build has none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classes {
    pub character_class: String,
    pub ascendancy: String,
}

/// Armour slots. Only the first record seen for each slot is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Armour {
    pub helmet: Option<Entry>,
    pub body_armour: Option<Entry>,
    pub gloves: Option<Entry>,
    pub boots: Option<Entry>,
}

/// Weapon slots, filled in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapons {
    pub main_hand: Option<Entry>,
    pub off_hand: Option<Entry>,
}

/// Belt and amulet slots plus an unbounded ring list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Jewellery {
    pub belt: Option<Entry>,
    pub amulet: Option<Entry>,
    pub rings: Vec<Entry>,
}

/// Cluster jewel size, read from the base item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSize {
    Large,
    Medium,
    Small,
}

impl ClusterSize {
    /// Pick a size by case-insensitive substring match on the base name:
    /// `"large"`, then `"medium"`, otherwise small.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildprice::summary::ClusterSize;
    ///
    /// assert_eq!(ClusterSize::from_base("Large Cluster Jewel"), ClusterSize::Large);
    /// assert_eq!(ClusterSize::from_base("MEDIUM cluster jewel"), ClusterSize::Medium);
    /// assert_eq!(ClusterSize::from_base(""), ClusterSize::Small);
    /// ```
    pub fn from_base(item_base: &str) -> Self {
        let base = item_base.to_lowercase();
        if base.contains("large") {
            ClusterSize::Large
        } else if base.contains("medium") {
            ClusterSize::Medium
        } else {
            ClusterSize::Small
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterJewels {
    pub large: Vec<Entry>,
    pub medium: Vec<Entry>,
    pub small: Vec<Entry>,
}

impl ClusterJewels {
    pub fn bucket_mut(&mut self, size: ClusterSize) -> &mut Vec<Entry> {
        match size {
            ClusterSize::Large => &mut self.large,
            ClusterSize::Medium => &mut self.medium,
            ClusterSize::Small => &mut self.small,
        }
    }
}

/// Jewel buckets by subtype.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Jewels {
    pub base: Vec<Entry>,
    pub timeless: Vec<Entry>,
    pub abyss: Vec<Entry>,
    pub cluster: ClusterJewels,
}

impl Jewels {
    /// Every jewel, in display order: base, abyss, timeless, then cluster
    /// jewels from large to small.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.base
            .iter()
            .chain(&self.abyss)
            .chain(&self.timeless)
            .chain(&self.cluster.large)
            .chain(&self.cluster.medium)
            .chain(&self.cluster.small)
    }
}

/// Gem entries grouped by skill slot, slots in first-seen order.
///
/// Serializes as a JSON object keyed by slot label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GemsBySlot {
    slots: Vec<(String, Vec<Entry>)>,
}

impl GemsBySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of gems already recorded for `slot`.
    pub fn slot_len(&self, slot: &str) -> usize {
        self.get(slot).map_or(0, <[Entry]>::len)
    }

    /// Append a gem to `slot`, creating the slot on first use.
    pub fn push(&mut self, slot: &str, entry: Entry) {
        match self.slots.iter_mut().find(|(label, _)| label == slot) {
            Some((_, gems)) => gems.push(entry),
            None => self.slots.push((slot.to_string(), vec![entry])),
        }
    }

    pub fn get(&self, slot: &str) -> Option<&[Entry]> {
        self.slots
            .iter()
            .find(|(label, _)| label == slot)
            .map(|(_, gems)| gems.as_slice())
    }

    /// Slot labels in first-seen order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(label, _)| label.as_str())
    }

    /// `(slot, gems)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.slots
            .iter()
            .map(|(label, gems)| (label.as_str(), gems.as_slice()))
    }

    /// Every gem across all slots.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().flat_map(|(_, gems)| gems.iter())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Serialize for GemsBySlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (label, gems) in &self.slots {
            map.serialize_entry(label, gems)?;
        }
        map.end()
    }
}

/// The formatted build.
///
/// `equipment` repeats the weapon, armour and jewellery entries as one flat
/// list in display order: main hand, off hand, helmet, body armour,
/// gloves, boots, belt, amulet, then rings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSummary {
    pub classes: Classes,
    pub armour: Armour,
    pub weapons: Weapons,
    pub jewellery: Jewellery,
    pub equipment: Vec<Entry>,
    pub flasks: Vec<Entry>,
    pub jewels: Jewels,
    pub gems_by_slot: GemsBySlot,
}

impl ClassifiedSummary {
    /// Every entry in the summary: equipment, jewels, gems, flasks.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.equipment
            .iter()
            .chain(self.jewels.iter())
            .chain(self.gems_by_slot.entries())
            .chain(&self.flasks)
    }

    /// Find an entry by its key.
    pub fn find(&self, key: &crate::EntryKey) -> Option<&Entry> {
        self.entries().find(|entry| &entry.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryKey;

    fn entry(key: &str) -> Entry {
        Entry {
            key: EntryKey::from_str(key),
            ..Default::default()
        }
    }

    #[test]
    fn test_gems_by_slot_order() {
        let mut gems = GemsBySlot::new();
        gems.push("Weapon 1", entry("a"));
        gems.push("Helmet", entry("b"));
        gems.push("Weapon 1", entry("c"));

        assert_eq!(gems.slots().collect::<Vec<_>>(), vec!["Weapon 1", "Helmet"]);
        assert_eq!(gems.slot_len("Weapon 1"), 2);
        assert_eq!(gems.slot_len("Gloves"), 0);
        let keys: Vec<_> = gems.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_gems_by_slot_serializes_as_object() {
        let mut gems = GemsBySlot::new();
        gems.push("Helmet", entry("b"));
        let value = serde_json::to_value(&gems).unwrap();
        assert_eq!(value["Helmet"][0]["_key"], serde_json::json!("b"));
    }

    #[test]
    fn test_jewel_display_order() {
        let mut jewels = Jewels::default();
        jewels.cluster.small.push(entry("small"));
        jewels.timeless.push(entry("timeless"));
        jewels.base.push(entry("base"));
        jewels.abyss.push(entry("abyss"));
        jewels.cluster.large.push(entry("large"));

        let keys: Vec<_> = jewels.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["base", "abyss", "timeless", "large", "small"]);
    }
}
