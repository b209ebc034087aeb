use gesuch_core::{DocumentMetadata, SubProjectCandidate};

use crate::budget::resolve_budget_with_catalog;
use crate::config::PatternCatalog;
use crate::dedup::{NOISE_NAME_CHARS, should_add};
use crate::fallback::fallback_candidates_with_catalog;
use crate::sanitize::sanitize_name;
use crate::text_processing::{char_len, window_from};

/// Metadata and sub-project candidates parsed from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    pub metadata: DocumentMetadata,
    /// Candidates in discovery order, names sanitized.
    pub sub_projects: Vec<SubProjectCandidate>,
    /// Whether the numbered-list fallback produced the candidates.
    pub used_fallback: bool,
}

/// Parse metadata and sub-projects using the default catalog.
pub fn parse_structure(text: &str) -> ParsedStructure {
    parse_structure_with_catalog(text, &PatternCatalog::default())
}

/// Catalog-aware version of [`parse_structure`].
pub(crate) fn parse_structure_with_catalog(text: &str, catalog: &PatternCatalog) -> ParsedStructure {
    let metadata = parse_metadata_with_catalog(text, catalog);

    let mut sub_projects = find_sub_projects_with_catalog(text, catalog);
    let used_fallback = sub_projects.is_empty();
    if used_fallback {
        sub_projects = fallback_candidates_with_catalog(text, catalog);
        tracing::debug!(found = sub_projects.len(), "no sub-project markers, used numbered-list fallback");
    }

    for sp in &mut sub_projects {
        sp.name = sanitize_name(&sp.name);
    }

    ParsedStructure {
        metadata,
        sub_projects,
        used_fallback,
    }
}

/// Read the first year and applicant mentions from the text.
pub(crate) fn parse_metadata_with_catalog(text: &str, catalog: &PatternCatalog) -> DocumentMetadata {
    let year = catalog
        .year_re
        .captures(text)
        .and_then(|caps| caps.name("year"))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let applicant = catalog
        .applicant_re
        .captures(text)
        .and_then(|caps| caps.name("applicant"))
        .map(|m| m.as_str().trim().to_string())
        .filter(|a| !a.is_empty());

    DocumentMetadata { year, applicant }
}

/// Scan every sub-project pattern group, in catalog order, for marker matches.
///
/// Names are trimmed but not yet sanitized. Matches whose name is noise are
/// skipped; the rest get a budget from the trailing context window and go
/// through [`should_add`], so the first group to claim a label keeps it.
pub(crate) fn find_sub_projects_with_catalog(
    text: &str,
    catalog: &PatternCatalog,
) -> Vec<SubProjectCandidate> {
    let mut accepted: Vec<SubProjectCandidate> = Vec::new();

    for re in &catalog.sub_project_patterns {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(number), Some(name)) =
                (caps.get(0), caps.name("number"), caps.name("name"))
            else {
                continue;
            };

            let name = name.as_str().trim();
            if char_len(name) <= NOISE_NAME_CHARS {
                tracing::trace!(pattern = re.as_str(), name, "skipping noise match");
                continue;
            }

            let window = window_from(text, whole.start(), catalog.budget_window_chars);
            let candidate = SubProjectCandidate {
                label: label_for(number.as_str()),
                name: name.to_string(),
                budget: resolve_budget_with_catalog(window, catalog),
                auto_detected: true,
            };

            if should_add(&accepted, &candidate) {
                tracing::debug!(
                    label = %candidate.label,
                    name = %candidate.name,
                    budget = candidate.budget,
                    "sub-project candidate"
                );
                accepted.push(candidate);
            } else {
                tracing::trace!(label = %candidate.label, "duplicate sub-project discarded");
            }
        }
    }

    accepted
}

/// `"TP"` plus the sub-project number, without leading zeros.
fn label_for(number: &str) -> String {
    match number.parse::<u64>() {
        Ok(n) => format!("TP{n}"),
        Err(_) => format!("TP{number}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternCatalogBuilder;

    #[test]
    fn test_metadata_year_and_applicant() {
        let text = "Gesuch um Förderbeitrag 2024\nGesuchsteller:  Verein Medienvielfalt Bern \nTP 1: Leitmedien";
        let meta = parse_structure(text).metadata;
        assert_eq!(meta.year, Some(2024));
        assert_eq!(meta.applicant.as_deref(), Some("Verein Medienvielfalt Bern"));
    }

    #[test]
    fn test_metadata_absent() {
        let meta = parse_structure("Kein Jahr, keine Angaben. 1999 und 3020.").metadata;
        assert!(meta.is_empty());
    }

    #[test]
    fn test_metadata_year_attached_to_letters() {
        assert_eq!(parse_structure("Gesuch2025 Förderung").metadata.year, Some(2025));
        assert_eq!(parse_structure("FY2024").metadata.year, Some(2024));
        assert_eq!(parse_structure("Nr. 12 vom Jahr 2023, FY2024").metadata.year, Some(2023));
    }

    #[test]
    fn test_marker_families() {
        let text = "Teilprojekt 1: Lokaljournalismus stärken\n\
                    TP 2: Digitale Kanäle\n\
                    Projekt 3: Nachwuchsförderung\n\
                    Massnahme 4: Öffentlichkeitsarbeit\n\
                    Maßnahme 5: Evaluation und Bericht\n";
        let parsed = parse_structure(text);
        let labels: Vec<_> = parsed.sub_projects.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["TP1", "TP2", "TP3", "TP4", "TP5"]);
        assert!(parsed.sub_projects.iter().all(|c| c.auto_detected));
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_teilprojekt_does_not_double_match_as_projekt() {
        let parsed = parse_structure("Teilprojekt 7: Regionale Vernetzung");
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].label, "TP7");
    }

    #[test]
    fn test_dedup_across_pattern_groups() {
        let text = "Teilprojekt 1: Leitmedien\nCHF 100'000\n\n...\n\nÜbersicht\nTP 1: Leitmedien\nCHF 999";
        let parsed = parse_structure(text);
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].label, "TP1");
        assert_eq!(parsed.sub_projects[0].budget, 100_000.0);
    }

    #[test]
    fn test_dedup_by_name_under_different_number() {
        let text = "TP 1: Podcastproduktion\nProjekt 9: Podcastproduktion\n";
        let parsed = parse_structure(text);
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].label, "TP1");
    }

    #[test]
    fn test_noise_names_rejected() {
        let parsed = parse_structure("TP 1: abc\nTP 2: Online-Redaktion");
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].label, "TP2");
    }

    #[test]
    fn test_noise_match_does_not_claim_label() {
        // A short name under "Teilprojekt 1" must not block a valid "TP 1".
        let parsed = parse_structure("Teilprojekt 1: ab\nTP 1: Leitmedien");
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].name, "Leitmedien");
    }

    #[test]
    fn test_budget_window_bounded() {
        let filler = "x".repeat(600);
        let text = format!("TP 1: Leitmedien\n{filler}\nCHF 50'000");
        let parsed = parse_structure(&text);
        assert_eq!(parsed.sub_projects[0].budget, 0.0);

        let catalog = PatternCatalogBuilder::new()
            .budget_window_chars(1000)
            .build()
            .unwrap();
        let parsed = parse_structure_with_catalog(&text, &catalog);
        assert_eq!(parsed.sub_projects[0].budget, 50_000.0);
    }

    #[test]
    fn test_budget_window_starts_at_match() {
        let text = "CHF 1'000 Vorwort\nTP 1: Leitmedien\nBudget: 2'500";
        let parsed = parse_structure(text);
        assert_eq!(parsed.sub_projects[0].budget, 2500.0);
    }

    #[test]
    fn test_discovery_order_preserved() {
        let text = "TP 2: Zweites Vorhaben\nTeilprojekt 1: Erstes Vorhaben\nTP 3: Drittes Vorhaben";
        let labels: Vec<_> = parse_structure(text)
            .sub_projects
            .into_iter()
            .map(|c| c.label)
            .collect();
        // Teilprojekt group runs first, then the TP group left to right.
        assert_eq!(labels, vec!["TP1", "TP2", "TP3"]);
    }

    #[test]
    fn test_leading_zero_numbers_share_label() {
        let parsed = parse_structure("Teilprojekt 01: Leitmedien A\nTP 1: Leitmedien B");
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].label, "TP1");
    }

    #[test]
    fn test_names_are_sanitized() {
        let parsed = parse_structure("TP 1: «Lokal» & regional   vernetzt!");
        assert_eq!(parsed.sub_projects[0].name, "Lokal regional vernetzt");
    }

    #[test]
    fn test_fallback_only_when_no_markers() {
        let text = "TP 1: Leitmedien\n1. Medienarbeit\n2. Weiterbildung";
        let parsed = parse_structure(text);
        assert!(!parsed.used_fallback);
        assert_eq!(parsed.sub_projects.len(), 1);

        let parsed = parse_structure("1. Medienarbeit\n...\nCHF 500'000");
        assert!(parsed.used_fallback);
        assert_eq!(parsed.sub_projects.len(), 1);
        assert_eq!(parsed.sub_projects[0].budget, 500_000.0);
        assert!(!parsed.sub_projects[0].auto_detected);
    }
}
