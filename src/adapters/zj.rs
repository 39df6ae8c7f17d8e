//! ZJ price list: `SKU | Products Name | Mg*vials | 1 box | …` with the
//! 1-box price column, names forward-filled across sub-rows.

use super::{parse_coded_table, Vendor};
use crate::document::Document;
use crate::standardize::RawTuple;

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    parse_coded_table(Vendor::Zj, doc, |c| c.contains("SKU"))
}

// ── Tests ──
