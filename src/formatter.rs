//! Build formatting.
//!
//! `format_build` is the ingestion boundary: it takes a build document with
//! every field already defaulted, runs the classifier, and assembles the
//! [`ClassifiedSummary`] the display layer binds to.

use crate::classifier::{classify, ClassifiedBuckets};
use crate::entry::Entry;
use crate::error::{PricingError, Result};
use crate::record::BuildDocument;
use crate::summary::{Classes, ClassifiedSummary};
use serde_json::Value;

/// Format a parsed build document.
///
/// Formatting is idempotent: entries keep keys cached by an earlier pass,
/// and the same document always yields the same buckets and keys.
///
/// # Examples
///
/// ```rust
/// use buildprice::{format_build, BuildDocument};
/// use serde_json::json;
///
/// let doc = BuildDocument::from_value(&json!({
///     "data": {
///         "class": "Templar",
///         "ascendClass": "Hierophant",
///         "items": [
///             {"type": "Jewelry", "subType": "Rings", "name": "Ring"},
///             {"type": "Armour", "subType": "Helmet", "name": "Helm"},
///             {"type": "Weapon", "name": "Staff"}
///         ]
///     }
/// }));
///
/// let summary = format_build(&doc);
/// assert_eq!(summary.classes.ascendancy, "Hierophant");
/// let order: Vec<_> = summary.equipment.iter().map(|e| e.name.as_str()).collect();
/// assert_eq!(order, vec!["Staff", "Helm", "Ring"]);
/// ```
pub fn format_build(document: &BuildDocument) -> ClassifiedSummary {
    let data = &document.data;
    let buckets = classify(&data.items, &data.skills);
    log::debug!(
        "formatted build: {} items, {} skill groups",
        data.items.len(),
        data.skills.len()
    );

    assemble(
        Classes {
            character_class: data.character_class.clone(),
            ascendancy: data.ascend_class.clone(),
        },
        buckets,
    )
}

/// Format a build document given as JSON. Never fails.
pub fn format_build_json(value: &Value) -> ClassifiedSummary {
    format_build(&BuildDocument::from_value(value))
}

/// Format a build document given as JSON text.
///
/// Only text that is not JSON at all is an error; any JSON value formats,
/// possibly to an empty summary.
pub fn format_build_str(text: &str) -> Result<ClassifiedSummary> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| PricingError::Document(err.to_string()))?;
    Ok(format_build_json(&value))
}

/// Equipment in display order: main hand, off hand, helmet, body armour,
/// gloves, boots, belt, amulet, then every ring.
pub fn equipment_list(buckets: &ClassifiedBuckets) -> Vec<Entry> {
    [
        &buckets.weapons.main_hand,
        &buckets.weapons.off_hand,
        &buckets.armour.helmet,
        &buckets.armour.body_armour,
        &buckets.armour.gloves,
        &buckets.armour.boots,
        &buckets.jewellery.belt,
        &buckets.jewellery.amulet,
    ]
    .into_iter()
    .flatten()
    .chain(&buckets.jewellery.rings)
    .cloned()
    .collect()
}

fn assemble(classes: Classes, buckets: ClassifiedBuckets) -> ClassifiedSummary {
    let equipment = equipment_list(&buckets);
    ClassifiedSummary {
        classes,
        armour: buckets.armour,
        weapons: buckets.weapons,
        jewellery: buckets.jewellery,
        equipment,
        flasks: buckets.flasks,
        jewels: buckets.jewels,
        gems_by_slot: buckets.gems_by_slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_build() -> Value {
        json!({
            "data": {
                "class": "Witch",
                "ascendClass": "Occultist",
                "items": [
                    {"type": "Jewelry", "subType": "Rings", "name": "Ring A"},
                    {"type": "Jewelry", "subType": "Amulets", "name": "Amulet"},
                    {"type": "Jewelry", "subType": "Belts", "name": "Belt"},
                    {"type": "Armour", "subType": "Boots", "name": "Boots"},
                    {"type": "Armour", "subType": "Gloves", "name": "Gloves"},
                    {"type": "Armour", "subType": "Body Armour", "name": "Body"},
                    {"type": "Armour", "subType": "Helmet", "name": "Helmet"},
                    {"type": "Offhand", "subType": "Shield", "name": "Shield"},
                    {"type": "Weapon", "subType": "Wand", "name": "Wand"},
                    {"type": "Jewelry", "subType": "Rings", "name": "Ring B"}
                ],
                "skills": [
                    {"slot": "Body Armour", "gems": [{"nameSpec": "Essence Drain"}]}
                ]
            }
        })
    }

    #[test]
    fn test_equipment_display_order() {
        let summary = format_build_json(&full_build());
        let order: Vec<_> = summary.equipment.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "Wand", "Shield", "Helmet", "Body", "Gloves", "Boots", "Belt", "Amulet", "Ring A",
                "Ring B"
            ]
        );
    }

    #[test]
    fn test_classes() {
        let summary = format_build_json(&full_build());
        assert_eq!(summary.classes.character_class, "Witch");
        assert_eq!(summary.classes.ascendancy, "Occultist");
    }

    #[test]
    fn test_missing_everything() {
        let summary = format_build_json(&json!({}));
        assert_eq!(summary, ClassifiedSummary::default());

        let summary = format_build_json(&json!({"data": {"items": null, "skills": "x"}}));
        assert!(summary.equipment.is_empty());
        assert!(summary.gems_by_slot.is_empty());
    }

    #[test]
    fn test_format_build_str() {
        let summary = format_build_str(r#"{"data": {"class": "Duelist"}}"#).unwrap();
        assert_eq!(summary.classes.character_class, "Duelist");

        let err = format_build_str("{not json").unwrap_err();
        assert!(matches!(err, PricingError::Document(_)));
    }

    #[test]
    fn test_reformatting_serialized_entries_keeps_keys() {
        let first = format_build_json(&full_build());
        let items = serde_json::to_value(&first.equipment).unwrap();
        let second = format_build_json(&json!({"data": {"items": items}}));

        let keys = |s: &ClassifiedSummary| {
            s.equipment
                .iter()
                .map(|e| e.key.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&first), keys(&second));
    }
}
