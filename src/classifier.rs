//! Entry classification.
//!
//! Items are bucketed by an explicit, ordered rule table. Each rule pairs a
//! category predicate, a sub-category predicate and an optional guard with
//! a placement. A record is claimed by the first rule that matches it:
//! if the claimed slot is already taken the record is dropped, and records
//! no rule matches are dropped as well. Neither case is an error.
//!
//! Gems are handled by a separate pass that groups every skill group's gems
//! under the group's slot label.

use crate::entry::Entry;
use crate::record::{Rarity, RawItem, SkillGroup};
use crate::summary::{Armour, ClusterSize, GemsBySlot, Jewellery, Jewels, Weapons};

/// Which category label a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// The category equals this label.
    Exact(&'static str),
    /// The record has no category, or an empty one.
    Absent,
}

impl CategoryMatch {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryMatch::Exact(label) => category == *label,
            CategoryMatch::Absent => category.is_empty(),
        }
    }
}

/// Which sub-category label a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubcategoryMatch {
    Exact(&'static str),
    Any,
}

impl SubcategoryMatch {
    pub fn matches(&self, sub_category: &str) -> bool {
        match self {
            SubcategoryMatch::Exact(label) => sub_category == *label,
            SubcategoryMatch::Any => true,
        }
    }
}

/// A single-valued equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Helmet,
    BodyArmour,
    Gloves,
    Boots,
    MainHand,
    OffHand,
    Belt,
    Amulet,
}

/// An unbounded bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum List {
    Rings,
    Flasks,
    BaseJewels,
    TimelessJewels,
    AbyssJewels,
}

/// Where a claimed record goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Fill the slot if it is empty, otherwise drop.
    Single(Slot),
    /// Fill the first empty slot, otherwise drop.
    FirstFree(&'static [Slot]),
    /// Append to the list.
    Append(List),
    /// Append to the cluster jewel bucket picked by [`ClusterSize::from_base`].
    ClusterBySize,
}

/// One row of the classification table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: CategoryMatch,
    pub subcategory: SubcategoryMatch,
    pub guard: Option<fn(&Entry) -> bool>,
    pub placement: Placement,
}

impl Rule {
    const fn new(
        name: &'static str,
        category: CategoryMatch,
        subcategory: SubcategoryMatch,
        placement: Placement,
    ) -> Self {
        Self {
            name,
            category,
            subcategory,
            guard: None,
            placement,
        }
    }

    /// Whether this rule claims `entry`.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.category.matches(&entry.category)
            && self.subcategory.matches(&entry.sub_category)
            && self.guard.map_or(true, |guard| guard(entry))
    }
}

/// Flasks carry no category upstream; they are recognised by rarity or name.
fn looks_like_flask(entry: &Entry) -> bool {
    entry.rarity == Some(Rarity::Magic) || entry.name.to_lowercase().contains("flask")
}

use CategoryMatch::{Absent, Exact};
use SubcategoryMatch::Any;

/// The item classification table, evaluated top to bottom.
#[rustfmt::skip]
pub const ITEM_RULES: &[Rule] = &[
    Rule::new("helmet", Exact("Armour"), SubcategoryMatch::Exact("Helmet"), Placement::Single(Slot::Helmet)),
    Rule::new("body armour", Exact("Armour"), SubcategoryMatch::Exact("Body Armour"), Placement::Single(Slot::BodyArmour)),
    Rule::new("gloves", Exact("Armour"), SubcategoryMatch::Exact("Gloves"), Placement::Single(Slot::Gloves)),
    Rule::new("boots", Exact("Armour"), SubcategoryMatch::Exact("Boots"), Placement::Single(Slot::Boots)),
    Rule::new("weapon", Exact("Weapon"), Any, Placement::FirstFree(&[Slot::MainHand, Slot::OffHand])),
    Rule::new("offhand", Exact("Offhand"), Any, Placement::Single(Slot::OffHand)),
    Rule::new("belt", Exact("Jewelry"), SubcategoryMatch::Exact("Belts"), Placement::Single(Slot::Belt)),
    Rule::new("amulet", Exact("Jewelry"), SubcategoryMatch::Exact("Amulets"), Placement::Single(Slot::Amulet)),
    Rule::new("ring", Exact("Jewelry"), SubcategoryMatch::Exact("Rings"), Placement::Append(List::Rings)),
    Rule {
        name: "flask",
        category: Absent,
        subcategory: Any,
        guard: Some(looks_like_flask),
        placement: Placement::Append(List::Flasks),
    },
    Rule::new("timeless jewel", Exact("Jewel"), SubcategoryMatch::Exact("Timeless Jewel"), Placement::Append(List::TimelessJewels)),
    Rule::new("abyss jewel", Exact("Jewel"), SubcategoryMatch::Exact("Abysmal Jewel"), Placement::Append(List::AbyssJewels)),
    Rule::new("cluster jewel", Exact("Jewel"), SubcategoryMatch::Exact("Cluster Jewel"), Placement::ClusterBySize),
    Rule::new("jewel", Exact("Jewel"), Any, Placement::Append(List::BaseJewels)),
];

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Placed by the named rule.
    Placed(&'static str),
    /// Claimed by the named rule, but its slot was already taken.
    SlotTaken(&'static str),
    /// No rule matched.
    Unmatched,
}

/// Classification result: every bucket except the display-ordered
/// equipment list, which the formatter assembles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedBuckets {
    pub armour: Armour,
    pub weapons: Weapons,
    pub jewellery: Jewellery,
    pub flasks: Vec<Entry>,
    pub jewels: Jewels,
    pub gems_by_slot: GemsBySlot,
}

impl ClassifiedBuckets {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Entry> {
        match slot {
            Slot::Helmet => &mut self.armour.helmet,
            Slot::BodyArmour => &mut self.armour.body_armour,
            Slot::Gloves => &mut self.armour.gloves,
            Slot::Boots => &mut self.armour.boots,
            Slot::MainHand => &mut self.weapons.main_hand,
            Slot::OffHand => &mut self.weapons.off_hand,
            Slot::Belt => &mut self.jewellery.belt,
            Slot::Amulet => &mut self.jewellery.amulet,
        }
    }

    fn list_mut(&mut self, list: List) -> &mut Vec<Entry> {
        match list {
            List::Rings => &mut self.jewellery.rings,
            List::Flasks => &mut self.flasks,
            List::BaseJewels => &mut self.jewels.base,
            List::TimelessJewels => &mut self.jewels.timeless,
            List::AbyssJewels => &mut self.jewels.abyss,
        }
    }

    /// Put `entry` where `placement` says. Returns `false` when every
    /// candidate slot is already taken.
    fn place(&mut self, placement: Placement, entry: Entry) -> bool {
        match placement {
            Placement::Single(slot) => fill(self.slot_mut(slot), entry),
            Placement::FirstFree(slots) => {
                match slots.iter().copied().find(|&slot| self.slot_mut(slot).is_none()) {
                    Some(slot) => fill(self.slot_mut(slot), entry),
                    None => false,
                }
            }
            Placement::Append(list) => {
                self.list_mut(list).push(entry);
                true
            }
            Placement::ClusterBySize => {
                let size = ClusterSize::from_base(&entry.item_base);
                self.jewels.cluster.bucket_mut(size).push(entry);
                true
            }
        }
    }

    /// Classify one item entry against `rules`.
    pub fn insert(&mut self, rules: &[Rule], entry: Entry) -> Outcome {
        let Some(rule) = rules.iter().find(|rule| rule.matches(&entry)) else {
            log::debug!(
                "dropping unclassified item {} ({}/{})",
                entry.key,
                entry.category,
                entry.sub_category
            );
            return Outcome::Unmatched;
        };

        let key = entry.key.clone();
        if self.place(rule.placement, entry) {
            Outcome::Placed(rule.name)
        } else {
            log::debug!("dropping {}: {} slot already filled", key, rule.name);
            Outcome::SlotTaken(rule.name)
        }
    }

    /// Append every gem of every skill group under the group's slot label.
    pub fn insert_gems(&mut self, skills: &[SkillGroup]) {
        for group in skills {
            let slot = group.slot_label();
            for gem in &group.gems {
                let index = self.gems_by_slot.slot_len(slot);
                self.gems_by_slot.push(slot, Entry::from_gem(gem, slot, index));
            }
        }
    }
}

fn fill(slot: &mut Option<Entry>, entry: Entry) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(entry);
    true
}

/// Classify raw items and skill groups with [`ITEM_RULES`].
///
/// # Examples
///
/// ```rust
/// use buildprice::classifier::classify;
/// use buildprice::RawItem;
///
/// let weapon = |name: &str| RawItem {
///     category: Some("Weapon".into()),
///     name: Some(name.into()),
///     ..Default::default()
/// };
///
/// let buckets = classify(&[weapon("A"), weapon("B"), weapon("C")], &[]);
/// assert_eq!(buckets.weapons.main_hand.unwrap().name, "A");
/// assert_eq!(buckets.weapons.off_hand.unwrap().name, "B");
/// ```
pub fn classify(items: &[RawItem], skills: &[SkillGroup]) -> ClassifiedBuckets {
    classify_with(ITEM_RULES, items, skills)
}

/// Classify with a custom rule table.
pub fn classify_with(rules: &[Rule], items: &[RawItem], skills: &[SkillGroup]) -> ClassifiedBuckets {
    let mut buckets = ClassifiedBuckets::default();
    for item in items {
        buckets.insert(rules, Entry::from_item(item));
    }
    buckets.insert_gems(skills);
    buckets
}
