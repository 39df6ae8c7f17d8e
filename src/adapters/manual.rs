//! Manually curated vendor sheets. Jeep publishes prices as an image, so a
//! hand-made CSV (`vendor,product_name,dose_text,price_usd,package_text`)
//! stands in for document extraction; the spec string is synthesized from
//! the dose and package columns.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::csvio;
use crate::standardize::RawTuple;

pub const SOURCE_FILE: &str = "jeep_manual.csv";
const DEFAULT_VENDOR: &str = "Jeep";

/// Parse a curated CSV. A missing file means the source simply isn't
/// available this run and yields no tuples.
pub fn parse(path: &Path) -> Result<Vec<RawTuple>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_text(&text))
}

fn parse_text(text: &str) -> Vec<RawTuple> {
    let mut rows = csvio::parse_rows(text).into_iter();
    let header: Vec<String> = rows.next().unwrap_or_default();
    let index: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let cell = |row: &[String], name: &str| -> String {
        index
            .get(name)
            .and_then(|i| row.get(*i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let mut out = Vec::new();
    for row in rows {
        let vendor = match cell(&row, "vendor") {
            v if v.is_empty() => DEFAULT_VENDOR.to_string(),
            v => v,
        };
        let name = cell(&row, "product_name");
        let price = cell(&row, "price_usd");
        if name.is_empty() || price.is_empty() {
            continue;
        }
        let spec = format!("{} {}", cell(&row, "dose_text"), cell(&row, "package_text"));
        out.push(RawTuple {
            vendor,
            product_name: name,
            spec_raw: spec.trim().to_string(),
            price_raw: price,
            source_file: SOURCE_FILE.to_string(),
        });
    }
    out
}

// ── Tests ──
