//! The persisted master artifact and runtime supplemental ingestion.
//!
//! The master file is plain CSV, one row per standardized record, with
//! absent numeric fields round-tripping as empty cells. Supplemental vendor
//! files merge in at comparison time when they carry the required column
//! subset; a file missing required columns is rejected whole with a named
//! error and the rest of the run proceeds.

use std::collections::HashMap;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::csvio;
use crate::standardize::{StandardizedRecord, DEFAULT_VIALS_PER_KIT};

/// Column order of the master artifact. This is the file-format contract.
pub const MASTER_COLUMNS: [&str; 10] = [
    "vendor",
    "product_name",
    "spec_raw",
    "price_usd",
    "dose_mg_per_vial",
    "vials_per_kit",
    "total_mg_per_kit",
    "price_per_mg",
    "source_file",
    "peptide_key",
];

/// Columns a supplemental vendor file must carry; `source_file` and
/// `peptide_key` are optional and filled empty when missing.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "vendor",
    "product_name",
    "spec_raw",
    "price_usd",
    "dose_mg_per_vial",
    "vials_per_kit",
    "total_mg_per_kit",
    "price_per_mg",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{file}: missing required columns: {}", missing.join(", "))]
    MissingColumns { file: String, missing: Vec<String> },
    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        file: path.display().to_string(),
        source,
    }
}

pub fn save_master(path: &Path, records: &[StandardizedRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
        }
    }
    let file = fs::File::create(path).map_err(|e| io_err(path, e))?;
    let mut w = BufWriter::new(file);

    let header: Vec<String> = MASTER_COLUMNS.iter().map(|c| c.to_string()).collect();
    csvio::write_row(&mut w, &header).map_err(|e| io_err(path, e))?;
    for r in records {
        csvio::write_row(&mut w, &encode(r)).map_err(|e| io_err(path, e))?;
    }
    Ok(())
}

/// Load the master artifact. All ten columns are required here; the file is
/// ours and anything less means a broken write.
pub fn load_master(path: &Path) -> Result<Vec<StandardizedRecord>, StoreError> {
    read_records(path, &MASTER_COLUMNS)
}

/// Load an extra vendor file supplied at runtime. Required columns only;
/// missing optional columns come back empty.
pub fn load_supplemental(path: &Path) -> Result<Vec<StandardizedRecord>, StoreError> {
    read_records(path, &REQUIRED_COLUMNS)
}

fn read_records(path: &Path, required: &[&str]) -> Result<Vec<StandardizedRecord>, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let mut rows = csvio::parse_rows(&text).into_iter();

    let header: Vec<String> = rows.next().unwrap_or_default();
    let index: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::MissingColumns {
            file: path.display().to_string(),
            missing,
        });
    }

    let cell = |row: &[String], name: &str| -> String {
        index
            .get(name)
            .and_then(|i| row.get(*i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let records = rows
        .map(|row| StandardizedRecord {
            vendor: cell(&row, "vendor"),
            product_name: cell(&row, "product_name"),
            spec_raw: cell(&row, "spec_raw"),
            price_usd: parse_opt(&cell(&row, "price_usd")),
            dose_mg_per_vial: parse_opt(&cell(&row, "dose_mg_per_vial")),
            vials_per_kit: parse_vials(&cell(&row, "vials_per_kit")),
            total_mg_per_kit: parse_opt(&cell(&row, "total_mg_per_kit")),
            price_per_mg: parse_opt(&cell(&row, "price_per_mg")),
            source_file: cell(&row, "source_file"),
            peptide_key: cell(&row, "peptide_key"),
        })
        .collect();
    Ok(records)
}

fn encode(r: &StandardizedRecord) -> Vec<String> {
    vec![
        r.vendor.clone(),
        r.product_name.clone(),
        r.spec_raw.clone(),
        fmt_opt(r.price_usd),
        fmt_opt(r.dose_mg_per_vial),
        r.vials_per_kit.to_string(),
        fmt_opt(r.total_mg_per_kit),
        fmt_opt(r.price_per_mg),
        r.source_file.clone(),
        r.peptide_key.clone(),
    ]
}

/// Absent ⇄ empty cell; present values use `Display`, which round-trips
/// f64 exactly.
fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn parse_opt(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse().ok()
}

/// Vial counts written by other tools sometimes arrive as floats ("10.0").
fn parse_vials(cell: &str) -> u32 {
    if cell.is_empty() {
        return DEFAULT_VIALS_PER_KIT;
    }
    cell.parse::<u32>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().map(|v| v as u32))
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_VIALS_PER_KIT)
}

// ── Tests ──
