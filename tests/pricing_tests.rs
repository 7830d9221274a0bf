//! Tests for pricing a formatted build.
//!
//! These tests verify:
//! - Override precedence (critical)
//! - Override persistence across store instances
//! - Category and grand totals
//! - Configuration-driven storage

use buildprice::overrides::OverrideStore;
use buildprice::storage::{FileStorage, MemoryStorage, Storage};
use buildprice::totals::display_amount;
use buildprice::*;
use serde_json::json;
use std::sync::Arc;

fn priced_build() -> ClassifiedSummary {
    format_build_json(&json!({
        "data": {
            "items": [
                {"type": "Armour", "subType": "Helmet", "name": "Helm", "priceInUnit": 5.0},
                {"type": "Weapon", "name": "Sword", "priceDivine": 2.5},
                {"type": "Jewelry", "subType": "Rings", "name": "Ring"},
                {"type": "Jewel", "subType": "Cluster Jewel", "itemBase": "Large Cluster Jewel", "name": "Big", "priceInUnit": 1.0},
                {"name": "Silver Flask", "rarity": "MAGIC", "priceInUnit": 0.1}
            ],
            "skills": [
                {"slot": "Helmet", "gems": [
                    {"nameSpec": "Enlighten", "priceInUnit": 10.0},
                    {"nameSpec": "Enlighten", "priceInUnit": 0.5}
                ]}
            ]
        }
    }))
}

fn helm_key(summary: &ClassifiedSummary) -> EntryKey {
    summary.armour.helmet.as_ref().unwrap().key.clone()
}

/// Test an empty override suppresses the inline price.
#[test]
fn test_empty_override_suppresses_inline() {
    let summary = priced_build();
    let helm = summary.armour.helmet.as_ref().unwrap();
    let mut store = OverrideStore::open(MemoryStorage::new());

    assert_eq!(resolve_price(helm, store.overrides()), Some(5.0));

    let overrides = store.set_override(helm.key.clone(), "").unwrap();
    assert_eq!(overrides.get(&helm.key), Some(None));
    assert_eq!(resolve_price(helm, overrides), None);
}

/// Test comma decimals are accepted.
#[test]
fn test_comma_decimal_override() {
    let summary = priced_build();
    let mut store = OverrideStore::open(MemoryStorage::new());
    store.set_override(helm_key(&summary), "3,5").unwrap();

    let helm = summary.armour.helmet.as_ref().unwrap();
    assert_eq!(resolve_price(helm, store.overrides()), Some(3.5));
}

/// Test garbage input is stored as an explicit unknown.
#[test]
fn test_unparseable_override() {
    let mut store = OverrideStore::open(MemoryStorage::new());
    let key = EntryKey::from_str("k1");
    store.set_override(key.clone(), "lots").unwrap();
    assert!(store.overrides().contains(&key));
    assert_eq!(store.overrides().get(&key), Some(None));
}

/// Test build totals with and without overrides.
#[test]
fn test_build_totals() {
    let summary = priced_build();
    let mut overrides = OverrideMap::new();

    let totals = BuildTotals::compute(&summary, &overrides);
    assert_eq!(totals.equipment, 7.5);
    assert_eq!(totals.jewels, 1.0);
    assert_eq!(totals.gems, 10.5);
    assert_eq!(totals.flasks, 0.1);
    assert_eq!(
        totals.total,
        totals.equipment + totals.jewels + totals.gems + totals.flasks
    );

    overrides.set(helm_key(&summary), None);
    let ring = summary.jewellery.rings[0].key.clone();
    overrides.set(ring, Some(4.0));

    let totals = BuildTotals::compute(&summary, &overrides);
    assert_eq!(totals.equipment, 6.5);
    assert_eq!(display_amount(totals.total), 18.1);
}

/// Test sum agrees with resolving each entry.
#[test]
fn test_sum_matches_resolved_prices() {
    let summary = priced_build();
    let mut overrides = OverrideMap::new();
    overrides.set(helm_key(&summary), Some(1.25));

    let expected: f64 = summary
        .equipment
        .iter()
        .map(|e| resolve_price(e, &overrides).unwrap_or(0.0))
        .sum();
    assert_eq!(sum(&summary.equipment, &overrides), expected);
    assert_eq!(sum(Vec::<Entry>::new(), &overrides), 0.0);
}

/// Test identical gems in one slot are priced independently.
#[test]
fn test_duplicate_gems_have_own_overrides() {
    let summary = priced_build();
    let gems = summary.gems_by_slot.get("Helmet").unwrap();
    assert_ne!(gems[0].key, gems[1].key);

    let mut overrides = OverrideMap::new();
    overrides.set(gems[0].key.clone(), Some(20.0));
    assert_eq!(resolve_price(&gems[0], &overrides), Some(20.0));
    assert_eq!(resolve_price(&gems[1], &overrides), Some(0.5));
}

/// Test overrides survive a new store over the same directory.
#[test]
fn test_overrides_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let summary = priced_build();
    let helm = helm_key(&summary);

    {
        let store = OverrideStore::open(FileStorage::new(dir.path()));
        let mut session = PricingSession::new(summary.clone(), store);
        session.set_price(helm.clone(), "12").unwrap();
    }

    let store = OverrideStore::open(FileStorage::new(dir.path()));
    let session = PricingSession::new(format_build_json(&json!({"data": {}})), store);
    assert_eq!(session.overrides().get(&helm), Some(Some(12.0)));

    let session = PricingSession::new(summary, session.into_store());
    assert_eq!(session.price_of(&helm), Some(12.0));
}

/// Test a session reports unpriced entries until they are priced.
#[test]
fn test_session_unpriced() {
    let mut session = PricingSession::new(priced_build(), OverrideStore::open(MemoryStorage::new()));
    let missing: Vec<_> = session.unpriced().iter().map(|e| e.name.clone()).collect();
    assert_eq!(missing, vec!["Ring".to_string()]);

    let ring = session.summary().jewellery.rings[0].key.clone();
    session.set_price(ring, "0.75").unwrap();
    assert!(session.unpriced().is_empty());
}

/// Test stores and caches built from configuration share one backend.
#[test]
fn test_config_shared_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let config = PricingConfig::from_json_str(r#"{"overridesKey": "build:1"}"#).unwrap();

    let mut store = config.override_store(storage.clone());
    store.set_override(EntryKey::from_str("k"), "2").unwrap();

    let raw = storage.read("build:1").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, json!({"k": 2.0}));
}
