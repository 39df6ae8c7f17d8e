//! Standardization stage: raw vendor tuples in, uniform per-item price
//! records out. The assembled sequence is the pipeline's persisted master
//! artifact (see `store`).

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;

use crate::fields;

/// One row as an adapter saw it. Transient; consumed immediately here.
#[derive(Debug, Clone)]
pub struct RawTuple {
    pub vendor: String,
    pub product_name: String,
    pub spec_raw: String,
    pub price_raw: String,
    pub source_file: String,
}

/// The uniform per-item record. Missing fields stay missing all the way
/// down the pipeline; nothing here is ever fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedRecord {
    pub vendor: String,
    pub product_name: String,
    pub spec_raw: String,
    pub price_usd: Option<f64>,
    pub dose_mg_per_vial: Option<f64>,
    pub vials_per_kit: u32,
    pub total_mg_per_kit: Option<f64>,
    pub price_per_mg: Option<f64>,
    pub source_file: String,
    pub peptide_key: String,
}

/// Most vendors sell 10-vial kits; assumed when the spec doesn't say.
pub const DEFAULT_VIALS_PER_KIT: u32 = 10;

pub fn standardize(raw: &RawTuple) -> StandardizedRecord {
    let price_usd = fields::parse_price(&raw.price_raw);
    // Dose: spec string first, product name as fallback.
    let dose_mg_per_vial =
        fields::extract_mg(&raw.spec_raw).or_else(|| fields::extract_mg(&raw.product_name));
    let vials_per_kit = fields::extract_vials(&raw.spec_raw).unwrap_or(DEFAULT_VIALS_PER_KIT);

    let total_mg_per_kit = dose_mg_per_vial.map(|mg| mg * vials_per_kit as f64);
    let price_per_mg = match (price_usd, total_mg_per_kit) {
        (Some(price), Some(total)) if total > 0.0 => Some(price / total),
        _ => None,
    };

    let product_name = raw.product_name.trim().to_string();
    let peptide_key = peptide_key(&product_name);

    StandardizedRecord {
        vendor: raw.vendor.clone(),
        product_name,
        spec_raw: raw.spec_raw.trim().to_string(),
        price_usd,
        dose_mg_per_vial,
        vials_per_kit,
        total_mg_per_kit,
        price_per_mg,
        source_file: raw.source_file.clone(),
        peptide_key,
    }
}

static KEY_JUNK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Z0-9\-]+").unwrap());
static KEY_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Coarse join key: upper-case, collapse non-alphanumeric/non-hyphen runs to
/// single spaces, trim. Auxiliary only; canonical identity comes from `canon`.
pub fn peptide_key(product_name: &str) -> String {
    let upper = product_name.to_uppercase();
    let spaced = KEY_JUNK_RE.replace_all(&upper, " ");
    KEY_WS_RE.replace_all(&spaced, " ").trim().to_string()
}

/// Standardize every adapter's output into the master sequence. Per-record
/// work is pure, so it fans out across a thread pool in chunks.
pub fn build_master(tuples: Vec<RawTuple>) -> Vec<StandardizedRecord> {
    let pb = ProgressBar::new(tuples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(tuples.len());
    for chunk in tuples.chunks(256) {
        records.par_extend(chunk.par_iter().map(standardize));
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();
    records
}

// ── Tests ──
