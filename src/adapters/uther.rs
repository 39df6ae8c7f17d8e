//! Uther: peptide tables with the name in column 0 and tiered prices from
//! column 1 (we take the first tier). The sheet mixes in contact, shipping
//! and cosmetic-powder sections that must be excluded.

use super::{cell, emit, Vendor};
use crate::document::Document;
use crate::fields;
use crate::standardize::RawTuple;

/// First-cell keywords marking non-price sections.
const SECTION_SKIP: &[&str] = &["contact us", "about shipping", "weight", "cosmetic powder"];

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    let mut out = Vec::new();
    for page in &doc.pages {
        for row in &page.rows {
            let name = cell(row, 0);
            if name.is_empty() {
                continue;
            }
            let first = name.to_lowercase();
            if SECTION_SKIP.iter().any(|kw| first.contains(kw)) {
                continue;
            }
            let price = cell(row, 1);
            // Tier rows without a real price (and stray labels) drop out here.
            if fields::parse_price(price).is_none() {
                continue;
            }
            emit(Vendor::Uther, name, name, price, &mut out);
        }
    }
    out
}

// ── Tests ──
