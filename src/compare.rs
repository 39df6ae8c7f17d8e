//! Aggregation and ranking: canonical records are grouped per
//! (peptide, dose, total, vendor), reduced to per-group minimum prices, and
//! pivoted into one comparison row per peptide+dose with a vendor column
//! each. Ranking is competition style on price-per-mg.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::canon;
use crate::standardize::StandardizedRecord;

/// Milligram quantity usable as a map/sort key. NaN never reaches here
/// (doses come from successful parses), but ordering is total regardless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mg(pub f64);

impl Eq for Mg {}

impl Ord for Mg {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Mg {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A standardized record plus its resolved canonical identity.
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    pub record: StandardizedRecord,
    pub canonical_product: String,
}

/// Attach canonical identities and apply the kit business rule: every kit is
/// taken to hold 10 vials, so a known dose fixes the total at dose * 10,
/// overriding whatever vial count ingestion detected.
pub fn canonicalize(records: Vec<StandardizedRecord>) -> Vec<CanonicalRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if let Some(dose) = record.dose_mg_per_vial {
                record.total_mg_per_kit = Some(dose * 10.0);
            }
            let canonical_product = canon::resolve(&record.product_name);
            CanonicalRecord {
                record,
                canonical_product,
            }
        })
        .collect()
}

/// User-facing filters. Empty peptide/vendor lists mean "no filter".
#[derive(Debug, Default, Clone)]
pub struct Filters {
    pub peptides: Vec<String>,
    pub vendors: Vec<String>,
    pub only_priced: bool,
}

pub fn apply_filters(records: &[CanonicalRecord], filters: &Filters) -> Vec<CanonicalRecord> {
    records
        .iter()
        .filter(|r| {
            filters.peptides.is_empty() || filters.peptides.contains(&r.canonical_product)
        })
        .filter(|r| filters.vendors.is_empty() || filters.vendors.contains(&r.record.vendor))
        .filter(|r| !filters.only_priced || r.record.price_per_mg.is_some())
        .cloned()
        .collect()
}

/// One aggregation bucket: minimum price and minimum price-per-mg are taken
/// independently, so they may come from different underlying records.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRecord {
    pub canonical_product: String,
    pub dose_mg_per_vial: f64,
    pub total_mg_per_kit: f64,
    pub vendor: String,
    pub min_price_usd: Option<f64>,
    pub min_price_per_mg: Option<f64>,
}

/// Group dose-known records per (peptide, dose, total, vendor). Records with
/// no parsed dose can't be compared and are left out.
pub fn group(records: &[CanonicalRecord]) -> Vec<GroupedRecord> {
    let mut buckets: BTreeMap<(String, Mg, Mg, String), (Option<f64>, Option<f64>)> =
        BTreeMap::new();

    for r in records {
        let (Some(dose), Some(total)) = (r.record.dose_mg_per_vial, r.record.total_mg_per_kit)
        else {
            continue;
        };
        let key = (
            r.canonical_product.clone(),
            Mg(dose),
            Mg(total),
            r.record.vendor.clone(),
        );
        let entry = buckets.entry(key).or_insert((None, None));
        entry.0 = min_opt(entry.0, r.record.price_usd);
        entry.1 = min_opt(entry.1, r.record.price_per_mg);
    }

    buckets
        .into_iter()
        .map(|((peptide, dose, total, vendor), (price, ppm))| GroupedRecord {
            canonical_product: peptide,
            dose_mg_per_vial: dose.0,
            total_mg_per_kit: total.0,
            vendor,
            min_price_usd: price,
            min_price_per_mg: ppm,
        })
        .collect()
}

fn min_opt(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// One vendor's cell in a comparison row. `rank` is 1-based competition rank
/// by price-per-mg; 1 = best, 2 = second best, ties share the lower rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorCell {
    pub price_usd: Option<f64>,
    pub price_per_mg: Option<f64>,
    pub rank: Option<usize>,
}

/// One row of the vendor-comparison matrix.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub canonical_product: String,
    pub dose_mg_per_vial: f64,
    pub total_mg_per_kit: f64,
    pub cells: BTreeMap<String, VendorCell>,
}

impl ComparisonRow {
    /// Stable identity used to persist row selection across refreshes.
    pub fn row_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.canonical_product, self.dose_mg_per_vial, self.total_mg_per_kit
        )
    }
}

/// Pivot grouped records into comparison rows, ordered by
/// (peptide, dose, total) ascending, and rank each row's vendors.
/// Empty input is an empty matrix, not an error.
pub fn pivot(grouped: &[GroupedRecord]) -> Vec<ComparisonRow> {
    let mut rows: BTreeMap<(String, Mg, Mg), BTreeMap<String, VendorCell>> = BTreeMap::new();

    for g in grouped {
        let key = (
            g.canonical_product.clone(),
            Mg(g.dose_mg_per_vial),
            Mg(g.total_mg_per_kit),
        );
        rows.entry(key).or_default().insert(
            g.vendor.clone(),
            VendorCell {
                price_usd: g.min_price_usd,
                price_per_mg: g.min_price_per_mg,
                rank: None,
            },
        );
    }

    rows.into_iter()
        .map(|((peptide, dose, total), mut cells)| {
            rank_cells(&mut cells);
            ComparisonRow {
                canonical_product: peptide,
                dose_mg_per_vial: dose.0,
                total_mg_per_kit: total.0,
                cells,
            }
        })
        .collect()
}

/// Competition ranking: rank = 1 + number of strictly cheaper values, so
/// tied vendors share the minimal rank and the next distinct value resumes
/// past the tie group.
fn rank_cells(cells: &mut BTreeMap<String, VendorCell>) {
    let ppms: Vec<f64> = cells.values().filter_map(|c| c.price_per_mg).collect();
    for cell in cells.values_mut() {
        cell.rank = cell
            .price_per_mg
            .map(|v| 1 + ppms.iter().filter(|p| **p < v).count());
    }
}

/// Distinct vendors present in a record set, sorted.
pub fn vendor_columns(records: &[CanonicalRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = records.iter().map(|r| r.record.vendor.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

// ── Tests ──
