use regex::Regex;

use crate::config::PatternCatalog;

/// Parse an amount written in Swiss notation.
///
/// Apostrophes (straight or typographic) are thousands separators and are
/// dropped; a comma is read as the decimal separator.
/// `"1'650'000"` → `1650000.0`, `"1'200,50"` → `1200.5`.
pub fn parse_swiss_amount(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Find the budget in a context window using the default catalog.
pub fn resolve_budget(window: &str) -> f64 {
    resolve_budget_with_catalog(window, &PatternCatalog::default())
}

/// Catalog-aware version of [`resolve_budget`].
pub(crate) fn resolve_budget_with_catalog(window: &str, catalog: &PatternCatalog) -> f64 {
    resolve_with_patterns(window, &catalog.budget_patterns)
}

/// The first pattern (in order) that matches anywhere in `window` decides the
/// amount. Later patterns are never consulted, even if the amount is odd.
/// No match, or an amount that does not parse, yields 0.
fn resolve_with_patterns(window: &str, patterns: &[Regex]) -> f64 {
    for re in patterns {
        let Some(caps) = re.captures(window) else {
            continue;
        };
        let raw = caps.name("amount").map(|m| m.as_str()).unwrap_or_default();
        return match parse_swiss_amount(raw) {
            Some(amount) => {
                tracing::trace!(pattern = re.as_str(), raw, amount, "budget resolved");
                amount
            }
            None => {
                tracing::debug!(pattern = re.as_str(), raw, "unparsable budget amount");
                0.0
            }
        };
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternCatalogBuilder;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_swiss_amount() {
        assert_eq!(parse_swiss_amount("1'650'000"), Some(1_650_000.0));
        assert_eq!(parse_swiss_amount("1'200,50"), Some(1200.5));
        assert_eq!(parse_swiss_amount("1’200.75"), Some(1200.75));
        assert_eq!(parse_swiss_amount("500"), Some(500.0));
        assert_eq!(parse_swiss_amount(""), None);
        assert_eq!(parse_swiss_amount("1.2.3"), None);
    }

    #[test]
    fn test_chf_prefix() {
        assert!(approx(resolve_budget("Kosten: CHF 1'650'000 total"), 1_650_000.0));
        assert!(approx(resolve_budget("CHF1'000"), 1000.0));
    }

    #[test]
    fn test_fr_prefix() {
        assert!(approx(resolve_budget("Beitrag Fr. 12'000.-"), 12_000.0));
    }

    #[test]
    fn test_amount_with_suffix() {
        assert!(approx(resolve_budget("1'200,50 Fr."), 1200.5));
        assert!(approx(resolve_budget("Gesamt 80'000 CHF"), 80_000.0));
    }

    #[test]
    fn test_budget_label() {
        assert!(approx(resolve_budget("Budget: 500"), 500.0));
        assert!(approx(resolve_budget("budget:  7'500"), 7500.0));
    }

    #[test]
    fn test_no_amount_is_zero() {
        assert_eq!(resolve_budget("Keine Angaben zu den Kosten."), 0.0);
        assert_eq!(resolve_budget(""), 0.0);
    }

    #[test]
    fn test_first_pattern_wins_over_earlier_position() {
        // The suffix form appears first in the text, but the CHF-prefix
        // pattern comes first in the catalog.
        let window = "300 Fr. Material, danach CHF 9'000 Personal";
        assert!(approx(resolve_budget(window), 9000.0));
    }

    #[test]
    fn test_custom_budget_patterns() {
        let catalog = PatternCatalogBuilder::new()
            .set_budget_patterns(vec![r"EUR\s*(?P<amount>[\d'.,]+)".to_string()])
            .build()
            .unwrap();
        assert!(approx(
            resolve_budget_with_catalog("EUR 2'500", &catalog),
            2500.0
        ));
        assert_eq!(resolve_budget_with_catalog("CHF 2'500", &catalog), 0.0);
    }

    #[test]
    fn test_unparsable_match_is_zero() {
        let catalog = PatternCatalogBuilder::new()
            .set_budget_patterns(vec![r"EUR\s*(?P<amount>[\d'.,]+)".to_string()])
            .build()
            .unwrap();
        assert_eq!(resolve_budget_with_catalog("EUR 1.2.3", &catalog), 0.0);
    }
}
