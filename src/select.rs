//! Selection projector: a caller-owned set of selected row keys that
//! survives filter changes, plus the projection of that selection into a
//! per-vendor total-cost price list.

use std::collections::BTreeSet;

use crate::compare::GroupedRecord;

/// Selected row keys. Session-scoped; owned by the caller and threaded
/// through [`reconcile`] on every refresh.
pub type SelectionState = BTreeSet<String>;

/// Refresh-time transition: `new = (old − visible) ∪ checked`.
///
/// Rows hidden by the current filters are not in `visible`, so their
/// selection survives untouched; rows that are visible carry exactly the
/// user's current checkbox state.
pub fn reconcile(
    previous: &SelectionState,
    visible: &BTreeSet<String>,
    checked: &BTreeSet<String>,
) -> SelectionState {
    let mut next: SelectionState = previous.difference(visible).cloned().collect();
    next.extend(checked.iter().cloned());
    next
}

/// A row key decoded back into its grouping components. Components that
/// fail to decode degrade to unknown instead of failing the whole selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedKey {
    pub canonical_product: String,
    pub dose_mg_per_vial: Option<f64>,
    pub total_mg_per_kit: Option<f64>,
}

pub fn decode_row_key(key: &str) -> SelectedKey {
    let mut parts = key.splitn(3, '|');
    let canonical_product = parts.next().unwrap_or("").to_string();
    let dose_mg_per_vial = parts.next().and_then(|s| s.parse().ok());
    let total_mg_per_kit = parts.next().and_then(|s| s.parse().ok());
    SelectedKey {
        canonical_product,
        dose_mg_per_vial,
        total_mg_per_kit,
    }
}

/// One selected row in the projected price list; `prices` runs parallel to
/// [`PriceList::vendors`].
#[derive(Debug, Clone)]
pub struct PriceListRow {
    pub canonical_product: String,
    pub dose_mg_per_vial: Option<f64>,
    pub prices: Vec<Option<f64>>,
}

/// Vendor-by-selected-row price table. Vendors are ordered by ascending
/// total cost; vendors with no price in any selected row are dropped.
#[derive(Debug, Clone, Default)]
pub struct PriceList {
    pub vendors: Vec<String>,
    pub rows: Vec<PriceListRow>,
    /// Per-vendor sum over available prices, parallel to `vendors`.
    pub totals: Vec<f64>,
}

pub fn price_list(selected: &[SelectedKey], grouped: &[GroupedRecord]) -> PriceList {
    if selected.is_empty() {
        return PriceList::default();
    }

    // Candidate vendor columns, before the all-empty drop.
    let all_vendors: BTreeSet<&str> = grouped.iter().map(|g| g.vendor.as_str()).collect();
    let all_vendors: Vec<&str> = all_vendors.into_iter().collect();

    let mut rows: Vec<PriceListRow> = Vec::with_capacity(selected.len());
    for key in selected {
        let prices = all_vendors
            .iter()
            .map(|vendor| {
                grouped
                    .iter()
                    .filter(|g| {
                        g.vendor == *vendor
                            && g.canonical_product == key.canonical_product
                            && Some(g.dose_mg_per_vial) == key.dose_mg_per_vial
                            && Some(g.total_mg_per_kit) == key.total_mg_per_kit
                    })
                    .filter_map(|g| g.min_price_usd)
                    .fold(None, |acc: Option<f64>, p| {
                        Some(acc.map_or(p, |a| a.min(p)))
                    })
            })
            .collect();
        rows.push(PriceListRow {
            canonical_product: key.canonical_product.clone(),
            dose_mg_per_vial: key.dose_mg_per_vial,
            prices,
        });
    }

    // Drop vendors that priced nothing in the selection, total the rest.
    let mut kept: Vec<(usize, f64)> = Vec::new();
    for i in 0..all_vendors.len() {
        let available: Vec<f64> = rows.iter().filter_map(|r| r.prices[i]).collect();
        if !available.is_empty() {
            kept.push((i, available.iter().sum()));
        }
    }
    kept.sort_by(|a, b| a.1.total_cmp(&b.1));

    for row in &mut rows {
        row.prices = kept.iter().map(|&(i, _)| row.prices[i]).collect();
    }

    PriceList {
        vendors: kept.iter().map(|&(i, _)| all_vendors[i].to_string()).collect(),
        rows,
        totals: kept.into_iter().map(|(_, t)| t).collect(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn grouped(peptide: &str, dose: f64, vendor: &str, price: Option<f64>) -> GroupedRecord {
        GroupedRecord {
            canonical_product: peptide.into(),
            dose_mg_per_vial: dose,
            total_mg_per_kit: dose * 10.0,
            vendor: vendor.into(),
            min_price_usd: price,
            min_price_per_mg: price.map(|p| p / (dose * 10.0)),
        }
    }

    #[test]
    fn hidden_selection_survives_refresh() {
        let old = keys(&["X|5|50"]);
        let next = reconcile(&old, &keys(&["Y|10|100"]), &keys(&[]));
        assert_eq!(next, keys(&["X|5|50"]));
    }

    #[test]
    fn visible_uncheck_removes() {
        let old = keys(&["X|5|50"]);
        let next = reconcile(&old, &keys(&["X|5|50"]), &keys(&[]));
        assert!(next.is_empty());
    }

    #[test]
    fn visible_check_adds_and_keeps_hidden() {
        let old = keys(&["X|5|50"]);
        let next = reconcile(&old, &keys(&["Y|10|100"]), &keys(&["Y|10|100"]));
        assert_eq!(next, keys(&["X|5|50", "Y|10|100"]));
    }

    #[test]
    fn rechecking_visible_selection_is_stable() {
        let old = keys(&["X|5|50"]);
        let next = reconcile(&old, &keys(&["X|5|50"]), &keys(&["X|5|50"]));
        assert_eq!(next, old);
    }

    #[test]
    fn decode_round_trip() {
        let k = decode_row_key("BPC 157|5|50");
        assert_eq!(k.canonical_product, "BPC 157");
        assert_eq!(k.dose_mg_per_vial, Some(5.0));
        assert_eq!(k.total_mg_per_kit, Some(50.0));
    }

    #[test]
    fn malformed_key_degrades_not_fails() {
        let k = decode_row_key("BPC 157|five");
        assert_eq!(k.canonical_product, "BPC 157");
        assert_eq!(k.dose_mg_per_vial, None);
        assert_eq!(k.total_mg_per_kit, None);

        let k = decode_row_key("");
        assert_eq!(k.canonical_product, "");
        assert_eq!(k.dose_mg_per_vial, None);
    }

    #[test]
    fn single_vendor_totals() {
        let g = vec![
            grouped("BPC 157", 5.0, "CN", Some(41.0)),
            grouped("AOD-9604", 10.0, "CN", Some(40.0)),
            grouped("BPC 157", 5.0, "ZJ", None),
        ];
        let selected = vec![decode_row_key("BPC 157|5|50"), decode_row_key("AOD-9604|10|100")];
        let list = price_list(&selected, &g);
        assert_eq!(list.vendors, vec!["CN"], "unpriced vendor is dropped");
        assert_eq!(list.totals, vec![81.0]);
        assert_eq!(list.rows.len(), 2);
        assert_eq!(list.rows[0].prices, vec![Some(41.0)]);
    }

    #[test]
    fn vendors_ordered_by_total_cost() {
        let g = vec![
            grouped("SEMAGLUTIDE", 5.0, "A", Some(45.0)),
            grouped("SEMAGLUTIDE", 5.0, "B", Some(30.0)),
            grouped("TIRZEPATIDE", 30.0, "A", Some(90.0)),
            grouped("TIRZEPATIDE", 30.0, "B", Some(120.0)),
        ];
        let selected = vec![
            decode_row_key("SEMAGLUTIDE|5|50"),
            decode_row_key("TIRZEPATIDE|30|300"),
        ];
        let list = price_list(&selected, &g);
        assert_eq!(list.vendors, vec!["A", "B"]);
        assert_eq!(list.totals, vec![135.0, 150.0]);
    }

    #[test]
    fn missing_vendor_price_is_ignored_in_total() {
        let g = vec![
            grouped("SEMAGLUTIDE", 5.0, "A", Some(45.0)),
            grouped("TIRZEPATIDE", 30.0, "A", Some(90.0)),
            grouped("TIRZEPATIDE", 30.0, "B", Some(85.0)),
        ];
        let selected = vec![
            decode_row_key("SEMAGLUTIDE|5|50"),
            decode_row_key("TIRZEPATIDE|30|300"),
        ];
        let list = price_list(&selected, &g);
        assert_eq!(list.vendors, vec!["B", "A"], "B's partial total is lower");
        assert_eq!(list.totals, vec![85.0, 135.0]);
        assert_eq!(list.rows[0].prices, vec![None, Some(45.0)]);
    }

    #[test]
    fn unknown_key_yields_empty_row() {
        let g = vec![grouped("SEMAGLUTIDE", 5.0, "A", Some(45.0))];
        let selected = vec![decode_row_key("NOT A PRODUCT|1|10")];
        let list = price_list(&selected, &g);
        assert!(list.vendors.is_empty());
        assert_eq!(list.rows.len(), 1);
        assert!(list.rows[0].prices.is_empty());
    }

    #[test]
    fn projection_from_standardized_records() {
        use crate::compare::{canonicalize, group};
        use crate::standardize::{standardize, RawTuple};

        let raw = |vendor: &str, name: &str, spec: &str, price: &str| RawTuple {
            vendor: vendor.into(),
            product_name: name.into(),
            spec_raw: spec.into(),
            price_raw: price.into(),
            source_file: "test.json".into(),
        };
        let records = canonicalize(vec![
            standardize(&raw("CN", "BPC-157", "5mg*10vials", "41")),
            standardize(&raw("CN", "AOD-9604", "10mg*10vials", "40")),
            standardize(&raw("ZJ", "BPC 157", "5mg*10vials", "45")),
        ]);
        assert_eq!(records[0].record.price_per_mg, Some(0.82));
        assert_eq!(records[1].record.price_per_mg, Some(0.40));

        let g = group(&records);
        let selected = vec![
            decode_row_key("BPC 157|5|50"),
            decode_row_key("AOD-9604|10|100"),
        ];
        let list = price_list(&selected, &g);
        // ZJ's partial total is lower and sorts first; CN covers both rows.
        assert_eq!(list.vendors, vec!["ZJ", "CN"]);
        assert_eq!(list.totals, vec![45.0, 81.0]);
        assert_eq!(list.rows[0].prices, vec![Some(45.0), Some(41.0)]);
        assert_eq!(list.rows[1].prices, vec![None, Some(40.0)]);
    }

    #[test]
    fn empty_selection_is_empty_projection() {
        let g = vec![grouped("SEMAGLUTIDE", 5.0, "A", Some(45.0))];
        let list = price_list(&[], &g);
        assert!(list.vendors.is_empty());
        assert!(list.rows.is_empty());
    }
}
