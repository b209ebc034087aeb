use gesuch_core::SubProjectCandidate;

use crate::budget::resolve_budget_with_catalog;
use crate::config::PatternCatalog;
use crate::dedup::NOISE_NAME_CHARS;
use crate::sanitize::MAX_NAME_CHARS;
use crate::text_processing::char_len;

/// Numbered-list heuristic for documents without sub-project markers.
///
/// Every line shaped like `1. Name` or `2) Name` becomes a candidate, labelled
/// by its position among accepted items (`TP1`, `TP2`, ...) rather than by the
/// number written in the document.
pub fn fallback_candidates(text: &str) -> Vec<SubProjectCandidate> {
    fallback_candidates_with_catalog(text, &PatternCatalog::default())
}

/// Catalog-aware version of [`fallback_candidates`].
pub(crate) fn fallback_candidates_with_catalog(
    text: &str,
    catalog: &PatternCatalog,
) -> Vec<SubProjectCandidate> {
    let lines: Vec<&str> = text.lines().collect();
    let mut candidates: Vec<SubProjectCandidate> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = catalog.fallback_item_re.captures(line.trim()) else {
            continue;
        };
        let name = caps.name("name").map(|m| m.as_str().trim()).unwrap_or_default();
        let len = char_len(name);
        if len <= NOISE_NAME_CHARS || len >= MAX_NAME_CHARS {
            tracing::trace!(line = idx, len, "fallback item name out of range");
            continue;
        }

        let budget = lookahead_budget(&lines, idx, catalog);
        let label = format!("TP{}", candidates.len() + 1);
        tracing::debug!(%label, name, budget, "fallback candidate");

        candidates.push(SubProjectCandidate {
            label,
            name: name.to_string(),
            budget,
            auto_detected: false,
        });
    }

    candidates
}

/// Search the lookahead lines after the item (not the item line itself); the
/// first line yielding a nonzero amount wins.
fn lookahead_budget(lines: &[&str], idx: usize, catalog: &PatternCatalog) -> f64 {
    let start = idx.saturating_add(1).min(lines.len());
    let end = start
        .saturating_add(catalog.fallback_lookahead_lines)
        .min(lines.len());

    lines[start..end]
        .iter()
        .map(|line| resolve_budget_with_catalog(line, catalog))
        .find(|amount| *amount > 0.0)
        .unwrap_or(0.0)
}
