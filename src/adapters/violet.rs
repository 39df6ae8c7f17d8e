//! Violet: single-page coded list with the same `Cat. No.` layout as HXTNT.

use super::{parse_coded_table, Vendor};
use crate::document::Document;
use crate::standardize::RawTuple;

pub fn parse(doc: &Document) -> Vec<RawTuple> {
    parse_coded_table(Vendor::Violet, doc, |c| c.contains("Cat. No."))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;

    #[test]
    fn single_page_list() {
        let doc = Document {
            pages: vec![Page {
                rows: vec![
                    vec!["Cat. No.".into(), "Product".into(), "规格".into(), "price".into()],
                    vec!["V01".into(), "BPC 157".into(), "5mg*10vials".into(), "41".into()],
                    vec!["V02".into(), "".into(), "10mg*10vials".into(), "70".into()],
                ],
                text: String::new(),
            }],
        };
        let tuples = parse(&doc);
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].vendor, "Violet");
        assert_eq!(tuples[1].product_name, "BPC 157");
        assert_eq!(tuples[1].source_file, "violet-list.json");
    }
}
