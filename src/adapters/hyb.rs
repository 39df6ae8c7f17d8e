//! HYB price list: tables headed `Code | Name | Specification | 1kit | …`.
//! The 1-kit price column is the one we compare.

use super::{cell, data_start, emit, HeaderFallback, Vendor};
use crate::document::Document;
use crate::standardize::RawTuple;

const NAME: usize = 1;
const SPEC: usize = 2;
const PRICE_1KIT: usize = 3;

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    let mut out = Vec::new();
    for page in &doc.pages {
        let start = data_start(&page.rows, |c| c.trim() == "Code", HeaderFallback::SkipFirstRow);
        for row in &page.rows[start..] {
            let code = cell(row, 0);
            if code.is_empty() || code.trim() == "Code" {
                continue;
            }
            emit(
                Vendor::Hyb,
                cell(row, NAME),
                cell(row, SPEC),
                cell(row, PRICE_1KIT),
                &mut out,
            );
        }
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;

    fn page(grid: &[&[&str]]) -> Page {
        Page {
            rows: grid
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            text: String::new(),
        }
    }

    #[test]
    fn reads_rows_below_header() {
        let doc = Document {
            pages: vec![page(&[
                &["HYB price list", "", "", ""],
                &["Code", "Name", "Specification", "1kit"],
                &["P01", "BPC 157", "5mg*10vials", "41"],
                &["P02", "TB500", "10mg*10vials", "75"],
            ])],
        };
        let tuples = parse(&doc);
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].vendor, "HYB");
        assert_eq!(tuples[0].product_name, "BPC 157");
        assert_eq!(tuples[0].spec_raw, "5mg*10vials");
        assert_eq!(tuples[0].price_raw, "41");
        assert_eq!(tuples[0].source_file, "HYB-Price List - Overview.json");
    }

    #[test]
    fn repeated_headers_are_skipped() {
        let doc = Document {
            pages: vec![page(&[
                &["Code", "Name", "Specification", "1kit"],
                &["P01", "BPC 157", "5mg*10vials", "41"],
                &["Code", "Name", "Specification", "1kit"],
                &["P02", "TB500", "10mg*10vials", "75"],
            ])],
        };
        assert_eq!(parse(&doc).len(), 2);
    }

    #[test]
    fn headerless_page_skips_leading_title_row() {
        let doc = Document {
            pages: vec![page(&[
                &["HYB peptides 2024", "", "", ""],
                &["P01", "BPC 157", "5mg*10vials", "41"],
            ])],
        };
        let tuples = parse(&doc);
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0].product_name, "BPC 157");
    }

    #[test]
    fn short_rows_yield_no_price_and_are_dropped() {
        let doc = Document {
            pages: vec![page(&[
                &["Code", "Name", "Specification", "1kit"],
                &["P01", "BPC 157"],
            ])],
        };
        assert!(parse(&doc).is_empty());
    }

    #[test]
    fn empty_document_is_empty_output() {
        assert!(parse(&Document::default()).is_empty());
    }
}
