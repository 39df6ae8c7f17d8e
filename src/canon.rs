//! Canonical name resolution: vendor free-text product names collapse to one
//! display identity per peptide. A cleanup pass strips dose tokens and
//! punctuation, then a fixed, ordered alias-rule table rewrites known
//! variants. Every rule matches against the cleaned form and a later match
//! overwrites an earlier one — order is load-bearing (blend rules rely on
//! overwriting the generic BPC/TB rule).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static DOSE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(\.\d+)?\s*(MG|MCG|UG|IU)\b").unwrap());
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]+").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Cleanup pass: upper-case, drop dose tokens, dashes/underscores to spaces,
/// squeeze the rest to single spaces.
pub fn clean_name(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let no_dose = DOSE_TOKEN_RE.replace_all(&upper, "");
    let no_dash = DASH_RE.replace_all(&no_dose, " ");
    let words = NON_WORD_RE.replace_all(&no_dash, " ");
    WS_RE.replace_all(&words, " ").trim().to_string()
}

enum Pred {
    Prefix(&'static str),
    Contains(&'static str),
    Exact(&'static str),
    Matches(Regex),
    /// Both substrings present.
    ContainsAll(&'static str, &'static str),
    /// First substring present, second absent.
    ContainsWithout(&'static str, &'static str),
    /// Equality after removing spaces.
    SquashedExact(&'static str),
    /// Substring match after removing spaces.
    SquashedContains(&'static str),
}

impl Pred {
    fn matches(&self, cleaned: &str, squashed: &str) -> bool {
        match self {
            Pred::Prefix(p) => cleaned.starts_with(p),
            Pred::Contains(s) => cleaned.contains(s),
            Pred::Exact(s) => cleaned == *s,
            Pred::Matches(re) => re.is_match(cleaned),
            Pred::ContainsAll(a, b) => cleaned.contains(a) && cleaned.contains(b),
            Pred::ContainsWithout(a, b) => cleaned.contains(a) && !cleaned.contains(b),
            Pred::SquashedExact(s) => squashed == *s,
            Pred::SquashedContains(s) => squashed.contains(s),
        }
    }
}

struct Rule {
    pred: Pred,
    value: &'static str,
}

fn rule(pred: Pred, value: &'static str) -> Rule {
    Rule { pred, value }
}

/// The full alias table, in evaluation order. Later entries intentionally
/// overwrite earlier ones on the same input.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use Pred::*;
    vec![
        rule(Prefix("RETA"), "RETATRUTIDE"),
        rule(Prefix("TIRZE"), "TIRZEPATIDE"),
        rule(Prefix("SEMA"), "SEMAGLUTIDE"),
        rule(Exact("SS 31"), "SS-31"),
        rule(Prefix("ARA 290"), "ARA-290"),
        rule(Prefix("SNAP 8"), "SNAP-8"),
        rule(Prefix("BPC 157"), "BPC 157"),
        rule(Contains("BAC WATER"), "BACTERIOSTATIC WATER"),
        rule(Contains("BACTERIOSTATIC"), "BACTERIOSTATIC WATER"),
        rule(Prefix("BPC TB"), "BPC TB BLEND"),
        rule(ContainsAll("TB", "BPC"), "BPC TB BLEND"),
        rule(Prefix("CAGR"), "CAGRILINTIDE"),
        rule(Contains("EPITHALON"), "EPITHALON"),
        rule(Contains("EPITALON"), "EPITHALON"),
        rule(Prefix("GLUTATHIONE"), "GLUTATHIONE"),
        rule(Contains("MAZDU"), "MAZDUTIDE"),
        rule(SquashedExact("MOTSC"), "MOTS C"),
        rule(ContainsAll("CJC", "NO DAC"), "CJC NO DAC"),
        rule(ContainsAll("CJC", "WITHOUT DAC"), "CJC NO DAC"),
        // Vendor sheets really do spell it this way.
        rule(ContainsAll("CJC", "WHITOUT DAC"), "CJC NO DAC"),
        rule(ContainsAll("CJC", "IPA"), "CJC NO DAC IPA"),
        rule(Contains("MELANOTAN 1"), "MELANOTAN I"),
        rule(Contains("MELANOTAN I"), "MELANOTAN I"),
        rule(Exact("MELANOTAN"), "MELANOTAN I"),
        rule(Exact("MT 1"), "MELANOTAN I"),
        rule(Prefix("KLOW"), "KLOW"),
        rule(Contains("KLOW TB BP KP GHK"), "KLOW"),
        rule(Contains("BPC GHK CU TB KPV"), "KLOW"),
        rule(Prefix("GLOW"), "GLOW"),
        rule(Contains("GLOW TB BP GHK"), "GLOW"),
        rule(Contains("GLOW TBMG"), "GLOW"),
        rule(ContainsWithout("BPC GHK CU TB", "KPV"), "GLOW"),
        rule(Exact("HCG"), "HUMAN CHORIONIC GONADOTROPIN"),
        rule(Contains("CHORIONIC"), "HUMAN CHORIONIC GONADOTROPIN"),
        rule(SquashedContains("PEGMGF"), "PEG MGF"),
        rule(Prefix("AOD"), "AOD-9604"),
        rule(Prefix("FOXO4"), "FOXO4-DRI"),
        rule(Contains("IGF"), "IGF-1 LR3"),
        rule(Prefix("KISSPEPTIN"), "KISSPEPTIN-10"),
        rule(Prefix("L CARNITINE"), "L-CARNITINE"),
        rule(Matches(Regex::new(r"^LL ?37$").unwrap()), "LL-37"),
        rule(Matches(Regex::new(r"^PT ?141$").unwrap()), "PT-141"),
    ]
});

/// Resolve a free-text product name to its canonical identity. Deterministic
/// in the name alone; names matching no rule keep their cleaned form.
pub fn resolve(product_name: &str) -> String {
    let cleaned = clean_name(product_name);
    let squashed = cleaned.replace(' ', "");

    let mut canonical: &str = &cleaned;
    let mut prior_match: Option<&'static str> = None;
    for r in RULES.iter() {
        if r.pred.matches(&cleaned, &squashed) {
            if let Some(prev) = prior_match {
                if prev != r.value {
                    debug!(name = %cleaned, prev, next = r.value, "overlapping alias rules");
                }
            }
            canonical = r.value;
            prior_match = Some(r.value);
        }
    }
    canonical.to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_strips_dose_and_punctuation() {
        assert_eq!(clean_name("Tirze-30mg"), "TIRZE");
        assert_eq!(clean_name("BPC_157 (5mg)"), "BPC 157");
        assert_eq!(clean_name("Semaglutide 10 MG"), "SEMAGLUTIDE");
        assert_eq!(clean_name("  hGH 191aa  "), "HGH 191AA");
    }

    #[test]
    fn prefix_aliases() {
        assert_eq!(resolve("Reta-15mg"), "RETATRUTIDE");
        assert_eq!(resolve("Tirze 30mg"), "TIRZEPATIDE");
        assert_eq!(resolve("sema(10mg)"), "SEMAGLUTIDE");
        assert_eq!(resolve("CAGR 5mg"), "CAGRILINTIDE");
        assert_eq!(resolve("AOD-9604"), "AOD-9604");
    }

    #[test]
    fn prettified_hyphen_names() {
        assert_eq!(resolve("SS-31 10mg"), "SS-31");
        assert_eq!(resolve("ara 290"), "ARA-290");
        assert_eq!(resolve("Snap-8 10mg"), "SNAP-8");
        assert_eq!(resolve("PT141"), "PT-141");
        assert_eq!(resolve("LL 37"), "LL-37");
    }

    #[test]
    fn water_and_misspellings() {
        assert_eq!(resolve("BAC Water 3ml"), "BACTERIOSTATIC WATER");
        assert_eq!(resolve("Bacteriostatic water"), "BACTERIOSTATIC WATER");
        assert_eq!(resolve("Epitalon 10mg"), "EPITHALON");
        assert_eq!(resolve("Mazdutide"), "MAZDUTIDE");
        assert_eq!(resolve("CJC-1295 whitout DAC"), "CJC NO DAC");
    }

    #[test]
    fn blend_rules_layer_in_order() {
        // Generic BPC/TB rule first, specific blend rules overwrite it.
        assert_eq!(resolve("TB500 10mg + BPC157 10mg"), "BPC TB BLEND");
        assert_eq!(resolve("BPC GHK-CU TB KPV blend"), "KLOW");
        assert_eq!(resolve("BPC GHK-CU TB blend"), "GLOW");
        assert_eq!(resolve("KLOW 70mg"), "KLOW");
        assert_eq!(resolve("GLOW 70mg"), "GLOW");
    }

    #[test]
    fn cjc_variants() {
        assert_eq!(resolve("CJC-1295 no DAC"), "CJC NO DAC");
        assert_eq!(resolve("CJC-1295 without DAC 5mg"), "CJC NO DAC");
        assert_eq!(resolve("CJC no DAC + IPA blend"), "CJC NO DAC IPA");
    }

    #[test]
    fn squashed_forms() {
        assert_eq!(resolve("MOTSC"), "MOTS C");
        assert_eq!(resolve("Mots-C 10mg"), "MOTS C");
        assert_eq!(resolve("PEG-MGF"), "PEG MGF");
    }

    #[test]
    fn hcg_and_igf() {
        assert_eq!(resolve("HCG"), "HUMAN CHORIONIC GONADOTROPIN");
        assert_eq!(resolve("Human Chorionic Gonadotropin 5000iu"), "HUMAN CHORIONIC GONADOTROPIN");
        assert_eq!(resolve("IGF1-LR3 1mg"), "IGF-1 LR3");
    }

    #[test]
    fn unmatched_names_keep_cleaned_form() {
        assert_eq!(resolve("Thymosin Alpha-1 10mg"), "THYMOSIN ALPHA 1");
        assert_eq!(resolve("GHK-Cu 50mg"), "GHK CU");
    }

    #[test]
    fn deterministic_and_idempotent() {
        let samples = [
            "Reta-15mg",
            "BPC-157 5mg",
            "BPC GHK-CU TB KPV",
            "CJC no DAC + IPA",
            "MOTSC",
            "HCG 5000iu",
            "Thymosin Alpha-1",
            "LL-37",
            "PEG-MGF 2mg",
        ];
        for s in samples {
            let once = resolve(s);
            assert_eq!(resolve(s), once, "same input, same output: {s}");
            assert_eq!(resolve(&once), once, "idempotent on own output: {s} -> {once}");
        }
    }
}
