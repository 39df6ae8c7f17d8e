//! Mix: no tables at all, just text lines like `Tirze-30mg 90`. The name
//! doubles as the spec string (the dose lives inside it).

use super::{emit, Vendor};
use crate::document::Document;
use crate::standardize::RawTuple;

/// Banner/contact lines in the Mix sheet, matched verbatim.
const SKIP_MARKERS: &[&str] = &[
    "MIX-Peptides",
    "Ship  from US Warehouse",
    "Products/kit",
    "ham@mix-peptides",
];

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    let text = doc.full_text();
    let mut out = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || SKIP_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let name = parts[0];
        let price = parts[parts.len() - 1];
        emit(Vendor::Mix, name, name, price, &mut out);
    }

    out
}

// ── Tests ──
