use once_cell::sync::Lazy;
use regex::Regex;

use gesuch_core::config_file::ConfigFile;

use crate::ParsingError;

/// Sub-project markers, tried in this order. The first group that yields a
/// valid match for a number owns the label.
pub const DEFAULT_SUB_PROJECT_PATTERNS: &[&str] = &[
    r"(?i)\bTeilprojekt\s+(?P<number>\d+)\s*:\s*(?P<name>[^\r\n]+)",
    r"\bTP\s*(?P<number>\d+)\s*:\s*(?P<name>[^\r\n]+)",
    r"(?i)\bProjekt\s+(?P<number>\d+)\s*:\s*(?P<name>[^\r\n]+)",
    r"(?i)\bMa(?:ss|ß)nahme\s+(?P<number>\d+)\s*:\s*(?P<name>[^\r\n]+)",
];

/// Budget markers, tried in this order; the first pattern with a match wins.
pub const DEFAULT_BUDGET_PATTERNS: &[&str] = &[
    r"CHF\s*(?P<amount>\d[\d'’]*(?:[.,]\d+)?)",
    r"Fr\.\s*(?P<amount>\d[\d'’]*(?:[.,]\d+)?)",
    r"(?P<amount>\d[\d'’]*(?:[.,]\d+)?)\s*(?:CHF|Fr\.)",
    r"(?i)Budget\s*:\s*(?P<amount>\d[\d'’]*(?:[.,]\d+)?)",
];

/// First four-digit run starting with "20", attached to letters or not.
pub const DEFAULT_YEAR_PATTERN: &str = r"(?P<year>20\d{2})";

pub const DEFAULT_APPLICANT_PATTERN: &str = r"(?i)(?:Antragsteller(?:in)?|Gesuchsteller(?:in)?|Trägerschaft|Applicant)\s*:\s*(?P<applicant>[^\r\n]+)";

/// Numbered list item, matched against a single trimmed line.
pub const DEFAULT_FALLBACK_ITEM_PATTERN: &str = r"^(?P<number>\d+)[.)]\s+(?P<name>.+)$";

pub const DEFAULT_BUDGET_WINDOW_CHARS: usize = 500;
pub const DEFAULT_FALLBACK_LOOKAHEAD_LINES: usize = 5;
pub const DEFAULT_LANGUAGE_SAMPLE_CHARS: usize = 1000;
pub const DEFAULT_EXCERPT_CHARS: usize = 5000;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(value),
        }
    }
}

/// The ordered pattern catalog and context windows used by the parser.
///
/// Holds only compiled regexes and scalars. `Regex` matching takes `&self`
/// and keeps no cursor, so one catalog can be shared across threads.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    pub(crate) sub_project_patterns: Vec<Regex>,
    pub(crate) budget_patterns: Vec<Regex>,
    pub(crate) year_re: Regex,
    pub(crate) applicant_re: Regex,
    pub(crate) fallback_item_re: Regex,
    /// Characters after a sub-project match searched for its budget.
    pub(crate) budget_window_chars: usize,
    /// Lines after a fallback list item searched for its budget.
    pub(crate) fallback_lookahead_lines: usize,
    pub(crate) language_sample_chars: usize,
    pub(crate) excerpt_chars: usize,
}

static DEFAULT_CATALOG: Lazy<PatternCatalog> = Lazy::new(|| {
    PatternCatalogBuilder::new()
        .build()
        .expect("built-in patterns must compile")
});

impl Default for PatternCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

impl PatternCatalog {
    pub fn sub_project_patterns(&self) -> &[Regex] {
        &self.sub_project_patterns
    }

    pub fn budget_patterns(&self) -> &[Regex] {
        &self.budget_patterns
    }

    pub fn budget_window_chars(&self) -> usize {
        self.budget_window_chars
    }

    pub fn fallback_lookahead_lines(&self) -> usize {
        self.fallback_lookahead_lines
    }

    pub fn language_sample_chars(&self) -> usize {
        self.language_sample_chars
    }

    pub fn excerpt_chars(&self) -> usize {
        self.excerpt_chars
    }
}

/// Builder for [`PatternCatalog`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast if a pattern is invalid or lacks the named group its field needs.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalogBuilder {
    sub_project_patterns: ListOverride<String>,
    budget_patterns: ListOverride<String>,
    year_re: Option<String>,
    applicant_re: Option<String>,
    fallback_item_re: Option<String>,
    budget_window_chars: Option<usize>,
    fallback_lookahead_lines: Option<usize>,
    language_sample_chars: Option<usize>,
    excerpt_chars: Option<usize>,
}

impl PatternCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an on-disk config. Explicit lists replace the
    /// defaults, `extra_*` lists append to whatever list is in effect.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(patterns) = &config.patterns {
            if let Some(list) = &patterns.sub_project {
                builder = builder.set_sub_project_patterns(list.clone());
            }
            for pattern in patterns.extra_sub_project.iter().flatten() {
                builder = builder.add_sub_project_pattern(pattern.clone());
            }
            if let Some(list) = &patterns.budget {
                builder = builder.set_budget_patterns(list.clone());
            }
            for pattern in patterns.extra_budget.iter().flatten() {
                builder = builder.add_budget_pattern(pattern.clone());
            }
            builder.year_re = patterns.year.clone();
            builder.applicant_re = patterns.applicant.clone();
            builder.fallback_item_re = patterns.fallback_item.clone();
        }

        if let Some(windows) = &config.windows {
            builder.budget_window_chars = windows.budget_window_chars;
            builder.fallback_lookahead_lines = windows.fallback_lookahead_lines;
            builder.language_sample_chars = windows.language_sample_chars;
            builder.excerpt_chars = windows.excerpt_chars;
        }

        builder
    }

    // ── Sub-project markers ──

    pub fn set_sub_project_patterns(mut self, patterns: Vec<String>) -> Self {
        self.sub_project_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_sub_project_pattern(mut self, pattern: String) -> Self {
        self.sub_project_patterns.push(pattern);
        self
    }

    // ── Budget markers ──

    pub fn set_budget_patterns(mut self, patterns: Vec<String>) -> Self {
        self.budget_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_budget_pattern(mut self, pattern: String) -> Self {
        self.budget_patterns.push(pattern);
        self
    }

    // ── Metadata ──

    pub fn year_regex(mut self, pattern: &str) -> Self {
        self.year_re = Some(pattern.to_string());
        self
    }

    pub fn applicant_regex(mut self, pattern: &str) -> Self {
        self.applicant_re = Some(pattern.to_string());
        self
    }

    pub fn fallback_item_regex(mut self, pattern: &str) -> Self {
        self.fallback_item_re = Some(pattern.to_string());
        self
    }

    // ── Windows ──

    pub fn budget_window_chars(mut self, n: usize) -> Self {
        self.budget_window_chars = Some(n);
        self
    }

    pub fn fallback_lookahead_lines(mut self, n: usize) -> Self {
        self.fallback_lookahead_lines = Some(n);
        self
    }

    pub fn language_sample_chars(mut self, n: usize) -> Self {
        self.language_sample_chars = Some(n);
        self
    }

    pub fn excerpt_chars(mut self, n: usize) -> Self {
        self.excerpt_chars = Some(n);
        self
    }

    /// Compile all string patterns and produce a [`PatternCatalog`].
    pub fn build(self) -> Result<PatternCatalog, ParsingError> {
        let defaults = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };

        let sub_project_patterns = self
            .sub_project_patterns
            .resolve(&defaults(DEFAULT_SUB_PROJECT_PATTERNS))
            .iter()
            .map(|p| compile("sub-project", p, &["number", "name"]))
            .collect::<Result<Vec<_>, _>>()?;

        let budget_patterns = self
            .budget_patterns
            .resolve(&defaults(DEFAULT_BUDGET_PATTERNS))
            .iter()
            .map(|p| compile("budget", p, &["amount"]))
            .collect::<Result<Vec<_>, _>>()?;

        let year_re = compile(
            "year",
            self.year_re.as_deref().unwrap_or(DEFAULT_YEAR_PATTERN),
            &["year"],
        )?;
        let applicant_re = compile(
            "applicant",
            self.applicant_re
                .as_deref()
                .unwrap_or(DEFAULT_APPLICANT_PATTERN),
            &["applicant"],
        )?;
        let fallback_item_re = compile(
            "fallback item",
            self.fallback_item_re
                .as_deref()
                .unwrap_or(DEFAULT_FALLBACK_ITEM_PATTERN),
            &["name"],
        )?;

        Ok(PatternCatalog {
            sub_project_patterns,
            budget_patterns,
            year_re,
            applicant_re,
            fallback_item_re,
            budget_window_chars: self
                .budget_window_chars
                .unwrap_or(DEFAULT_BUDGET_WINDOW_CHARS),
            fallback_lookahead_lines: self
                .fallback_lookahead_lines
                .unwrap_or(DEFAULT_FALLBACK_LOOKAHEAD_LINES),
            language_sample_chars: self
                .language_sample_chars
                .unwrap_or(DEFAULT_LANGUAGE_SAMPLE_CHARS),
            excerpt_chars: self.excerpt_chars.unwrap_or(DEFAULT_EXCERPT_CHARS),
        })
    }
}

fn compile(
    field: &'static str,
    pattern: &str,
    groups: &[&'static str],
) -> Result<Regex, ParsingError> {
    let re = Regex::new(pattern).map_err(|source| ParsingError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })?;
    for &group in groups {
        if !re.capture_names().flatten().any(|name| name == group) {
            return Err(ParsingError::MissingGroup {
                field,
                pattern: pattern.to_string(),
                group,
            });
        }
    }
    Ok(re)
}
