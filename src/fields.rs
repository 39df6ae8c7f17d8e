//! Field extraction from vendor price and spec strings. Everything here is
//! pure and total: unparseable input yields `None`, never an error, because
//! the source documents are inconsistently formatted by nature.

use std::sync::LazyLock;

use regex::Regex;

static MG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)mg").unwrap());
static VIALS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)vials").unwrap());
static X_VIALS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"x(\d+)vials").unwrap());

/// Parse a price like `"$1,234.50"` into dollars. Currency symbol and
/// thousands separators are stripped; anything non-numeric after that is
/// unknown. Negative amounts are treated as unparseable.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s = raw.trim().replace('$', "").replace(',', "");
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|p| *p >= 0.0)
}

/// Pull a dose like `10mg` out of a spec or product string
/// (`"10mg/vial x 10vials"` → 10.0). First match wins.
pub fn extract_mg(text: &str) -> Option<f64> {
    let s = squash(text);
    let caps = MG_RE.captures(&s)?;
    caps[1].parse().ok()
}

/// Pull a vial count from `"10 vials"` / `"x10vials"` forms. Callers apply
/// the 10-vial default when nothing is found.
pub fn extract_vials(text: &str) -> Option<u32> {
    let s = squash(text);
    if let Some(caps) = VIALS_RE.captures(&s) {
        return caps[1].parse().ok();
    }
    X_VIALS_RE.captures(&s).and_then(|c| c[1].parse().ok())
}

fn squash(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_basic() {
        assert_eq!(parse_price("41"), Some(41.0));
        assert_eq!(parse_price("$1,234.50"), Some(1234.5));
        assert_eq!(parse_price("  $40 "), Some(40.0));
    }

    #[test]
    fn price_unknown() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("TBD"), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("-5"), None);
    }

    #[test]
    fn price_idempotent_through_formatting() {
        for raw in ["41", "$1,234.50", "0.82", "99.999"] {
            let p = parse_price(raw).unwrap();
            let reparsed = parse_price(&format!("${:.2}", p)).unwrap();
            assert!((p - reparsed).abs() < 0.005, "{raw}: {p} vs {reparsed}");
        }
    }

    #[test]
    fn mg_from_spec() {
        assert_eq!(extract_mg("5mg*10vials"), Some(5.0));
        assert_eq!(extract_mg("10mg/vial x 10vials"), Some(10.0));
        assert_eq!(extract_mg("12.5 mg per vial"), Some(12.5));
        assert_eq!(extract_mg("Tirze-30mg"), Some(30.0));
    }

    #[test]
    fn mg_unknown() {
        assert_eq!(extract_mg(""), None);
        assert_eq!(extract_mg("bacteriostatic water"), None);
        assert_eq!(extract_mg("500mcg"), None);
    }

    #[test]
    fn vials_patterns() {
        assert_eq!(extract_vials("5mg*10vials"), Some(10));
        assert_eq!(extract_vials("10mg/vial x 5 vials"), Some(5));
        assert_eq!(extract_vials("x10vials"), Some(10));
        assert_eq!(extract_vials("one kit"), None);
    }
}
