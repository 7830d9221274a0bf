//! Price aggregation.
//!
//! Sums resolved prices over entry lists. Unknown prices count as zero.
//! Totals keep full floating-point precision; [`display_amount`] is only
//! for presentation.

use crate::overrides::OverrideMap;
use crate::price::{resolve_price, Priced};
use crate::summary::ClassifiedSummary;
use serde::{Deserialize, Serialize};

/// Sum the resolved prices of `entries`, treating unknown as zero.
///
/// # Examples
///
/// ```rust
/// use buildprice::{sum, Entry, EntryKey, OverrideMap};
///
/// let entries = vec![
///     Entry { key: EntryKey::from_str("a"), price_in_unit: Some(1.5), ..Default::default() },
///     Entry { key: EntryKey::from_str("b"), ..Default::default() },
/// ];
/// let overrides = OverrideMap::new();
///
/// assert_eq!(sum(&entries, &overrides), 1.5);
/// assert_eq!(sum(Vec::<Entry>::new(), &overrides), 0.0);
/// ```
pub fn sum<I>(entries: I, overrides: &OverrideMap) -> f64
where
    I: IntoIterator,
    I::Item: Priced,
{
    entries
        .into_iter()
        .map(|entry| resolve_price(&entry, overrides).unwrap_or(0.0))
        .sum()
}

/// Entries whose price resolves to unknown.
pub fn unpriced<'a, I, P>(entries: I, overrides: &OverrideMap) -> Vec<&'a P>
where
    I: IntoIterator<Item = &'a P>,
    P: Priced + 'a,
{
    entries
        .into_iter()
        .filter(|entry| resolve_price(*entry, overrides).is_none())
        .collect()
}

/// Category and grand totals of a formatted build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildTotals {
    /// Weapons, armour and jewellery.
    pub equipment: f64,
    /// Every jewel bucket, cluster sizes included.
    pub jewels: f64,
    /// Gems across all skill slots.
    pub gems: f64,
    pub flasks: f64,
    /// Sum of the four category totals.
    pub total: f64,
}

impl BuildTotals {
    /// Compute every total for `summary` under `overrides`.
    pub fn compute(summary: &ClassifiedSummary, overrides: &OverrideMap) -> Self {
        let equipment = sum(&summary.equipment, overrides);
        let jewels = sum(summary.jewels.iter(), overrides);
        let gems = sum(summary.gems_by_slot.entries(), overrides);
        let flasks = sum(&summary.flasks, overrides);

        Self {
            equipment,
            jewels,
            gems,
            flasks,
            total: equipment + jewels + gems + flasks,
        }
    }
}

/// Truncate `value` to two decimal places for display.
///
/// Values within rounding noise of the next hundredth (such as
/// `0.29 * 100.0 == 28.999999999999996`) are not pushed down a cent.
///
/// # Examples
///
/// ```rust
/// use buildprice::totals::display_amount;
///
/// assert_eq!(display_amount(3.14159), 3.14);
/// assert_eq!(display_amount(2.999), 2.99);
/// assert_eq!(display_amount(0.29), 0.29);
/// assert_eq!(display_amount(-1.239), -1.23);
/// ```
pub fn display_amount(value: f64) -> f64 {
    const NOISE: f64 = 1e-9;
    let scaled = value * 100.0;
    (scaled + NOISE * scaled.signum()).trunc() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::entry_key::EntryKey;

    fn entry(key: &str, inline: Option<f64>) -> Entry {
        Entry {
            key: EntryKey::from_str(key),
            price_in_unit: inline,
            ..Default::default()
        }
    }

    #[test]
    fn test_sum_with_overrides() {
        let entries = vec![entry("a", Some(1.0)), entry("b", Some(2.0)), entry("c", None)];
        let mut overrides = OverrideMap::new();
        overrides.set(EntryKey::from_str("b"), None);
        overrides.set(EntryKey::from_str("c"), Some(0.5));

        assert_eq!(sum(&entries, &overrides), 1.5);
    }

    #[test]
    fn test_sum_empty() {
        let mut overrides = OverrideMap::new();
        overrides.set(EntryKey::from_str("x"), Some(100.0));
        assert_eq!(sum(Vec::<Entry>::new(), &overrides), 0.0);
    }

    #[test]
    fn test_unpriced() {
        let entries = vec![entry("a", Some(1.0)), entry("b", None)];
        let missing = unpriced(&entries, &OverrideMap::new());
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].key.as_str(), "b");
    }

    #[test]
    fn test_display_amount_keeps_precision_elsewhere() {
        let total = 0.1 + 0.2;
        assert_eq!(display_amount(total), 0.3);
        assert_ne!(total, 0.3);
        assert_eq!(display_amount(0.0), 0.0);
    }
}
