//! HXTNT (Lucy's list): multi-page coded table `Cat. No. | Product | 规格 |
//! price`. Only the first page carries the header row, and a product's name
//! cell is blank on its continuation price-tier rows.

use super::{parse_coded_table, Vendor};
use crate::document::Document;
use crate::standardize::RawTuple;

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    parse_coded_table(Vendor::Hxtnt, doc, |c| c.contains("Cat. No."))
}

// ── Tests ──
