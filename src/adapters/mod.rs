//! Vendor adapters: one module per source-document layout, dispatched from
//! the [`Vendor`] enum. Each adapter is a pure function from an extracted
//! document to raw tuples; all vendor-specific layout knowledge (header
//! sentinels, forward-filled name cells, junk sections, column positions)
//! stays inside its module.

pub mod hxtnt;
pub mod hyb;
pub mod manual;
pub mod mix;
pub mod uther;
pub mod violet;
pub mod zj;

use crate::document::Document;
use crate::standardize::RawTuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Hyb,
    Hxtnt,
    Violet,
    Zj,
    Mix,
    Uther,
}

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Hyb,
        Vendor::Hxtnt,
        Vendor::Violet,
        Vendor::Zj,
        Vendor::Mix,
        Vendor::Uther,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Vendor::Hyb => "HYB",
            Vendor::Hxtnt => "HXTNT",
            Vendor::Violet => "Violet",
            Vendor::Zj => "ZJ",
            Vendor::Mix => "Mix",
            Vendor::Uther => "Uther",
        }
    }

    /// Well-known extracted-document file name for this vendor.
    pub fn source_file(self) -> &'static str {
        match self {
            Vendor::Hyb => "HYB-Price List - Overview.json",
            Vendor::Hxtnt => "HXTNT-Lucy-price list.json",
            Vendor::Violet => "violet-list.json",
            Vendor::Zj => "ZJlist123.json",
            Vendor::Mix => "Mix_price-list.json",
            Vendor::Uther => "Uther_11-26.json",
        }
    }

    pub fn parse(self, doc: &Document) -> Vec<RawTuple> {
        match self {
            Vendor::Hyb => hyb::parse(doc),
            Vendor::Hxtnt => hxtnt::parse(doc),
            Vendor::Violet => violet::parse(doc),
            Vendor::Zj => zj::parse(doc),
            Vendor::Mix => mix::parse(doc),
            Vendor::Uther => uther::parse(doc),
        }
    }
}

/// What to do when a page shows no header sentinel: some layouts only put
/// the header on the first page.
#[derive(Debug, Clone, Copy)]
pub enum HeaderFallback {
    /// Assume row 0 is a header/title anyway.
    SkipFirstRow,
    /// Every row is data.
    AllRows,
}

/// Index of the first data row: one past the header sentinel when present,
/// else per the adapter's fallback policy.
pub(crate) fn data_start(
    rows: &[Vec<String>],
    is_header: impl Fn(&str) -> bool,
    fallback: HeaderFallback,
) -> usize {
    for (idx, row) in rows.iter().enumerate() {
        if row.first().map(|c| is_header(c)).unwrap_or(false) {
            return idx + 1;
        }
    }
    match fallback {
        HeaderFallback::SkipFirstRow => 1.min(rows.len()),
        HeaderFallback::AllRows => 0,
    }
}

pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

/// Emit one raw tuple if both the name and the raw price are present.
pub(crate) fn emit(vendor: Vendor, name: &str, spec: &str, price: &str, out: &mut Vec<RawTuple>) {
    let name = name.trim();
    let price = price.trim();
    if name.is_empty() || price.is_empty() {
        return;
    }
    out.push(RawTuple {
        vendor: vendor.label().to_string(),
        product_name: name.to_string(),
        spec_raw: spec.trim().to_string(),
        price_raw: price.to_string(),
        source_file: vendor.source_file().to_string(),
    });
}

/// Shared walker for the coded-table layout (HXTNT, Violet, ZJ): first cell
/// is a catalog code, the name cell is only written on a product's first
/// price-tier row and carried forward across the rest.
pub(crate) fn parse_coded_table(
    vendor: Vendor,
    doc: &Document,
    is_header: impl Fn(&str) -> bool,
) -> Vec<RawTuple> {
    let mut out = Vec::new();
    for page in &doc.pages {
        let start = data_start(&page.rows, &is_header, HeaderFallback::AllRows);
        let mut current_name: Option<String> = None;
        for row in &page.rows[start..] {
            let code = cell(row, 0);
            if code.is_empty() || is_header(code) {
                continue;
            }
            let name_cell = cell(row, 1);
            if !name_cell.trim().is_empty() {
                current_name = Some(name_cell.to_string());
            }
            let Some(name) = current_name.clone() else {
                continue;
            };
            emit(vendor, &name, cell(row, 2), cell(row, 3), &mut out);
        }
    }
    out
}

// ── Tests ──
