use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub patterns: Option<PatternsConfig>,
    pub windows: Option<WindowsConfig>,
}

/// Pattern overrides. `sub_project` / `budget` replace the built-in lists,
/// `extra_sub_project` / `extra_budget` append to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternsConfig {
    pub sub_project: Option<Vec<String>>,
    pub extra_sub_project: Option<Vec<String>>,
    pub budget: Option<Vec<String>>,
    pub extra_budget: Option<Vec<String>>,
    pub year: Option<String>,
    pub applicant: Option<String>,
    pub fallback_item: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowsConfig {
    pub budget_window_chars: Option<usize>,
    pub fallback_lookahead_lines: Option<usize>,
    pub language_sample_chars: Option<usize>,
    pub excerpt_chars: Option<usize>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_NAME: &str = ".gesuch.toml";

/// Platform config directory path: `<config_dir>/gesuch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gesuch").join("config.toml"))
}

/// Load config by cascading CWD `.gesuch.toml` over platform config.
/// CWD values override platform values. Missing or unparsable files are skipped.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(LOCAL_CONFIG_NAME));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    read_config(path).ok()
}

/// Strict variant of [`load_from_path`] for paths the user named explicitly.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a config as pretty TOML.
pub fn to_toml(config: &ConfigFile) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_patterns = base.patterns.unwrap_or_default();
    let overlay_patterns = overlay.patterns.unwrap_or_default();
    let base_windows = base.windows.unwrap_or_default();
    let overlay_windows = overlay.windows.unwrap_or_default();

    ConfigFile {
        patterns: Some(PatternsConfig {
            sub_project: overlay_patterns.sub_project.or(base_patterns.sub_project),
            extra_sub_project: overlay_patterns
                .extra_sub_project
                .or(base_patterns.extra_sub_project),
            budget: overlay_patterns.budget.or(base_patterns.budget),
            extra_budget: overlay_patterns.extra_budget.or(base_patterns.extra_budget),
            year: overlay_patterns.year.or(base_patterns.year),
            applicant: overlay_patterns.applicant.or(base_patterns.applicant),
            fallback_item: overlay_patterns.fallback_item.or(base_patterns.fallback_item),
        }),
        windows: Some(WindowsConfig {
            budget_window_chars: overlay_windows
                .budget_window_chars
                .or(base_windows.budget_window_chars),
            fallback_lookahead_lines: overlay_windows
                .fallback_lookahead_lines
                .or(base_windows.fallback_lookahead_lines),
            language_sample_chars: overlay_windows
                .language_sample_chars
                .or(base_windows.language_sample_chars),
            excerpt_chars: overlay_windows.excerpt_chars.or(base_windows.excerpt_chars),
        }),
    }
}
