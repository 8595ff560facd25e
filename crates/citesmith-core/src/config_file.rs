use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub formatting: Option<FormattingConfig>,
    pub index: Option<IndexConfig>,
    pub scoring: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormattingConfig {
    /// Citation style name: `apa`, `mla`, `chicago` or `ieee`.
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    pub chunk_size: Option<usize>,
    pub min_chunk_chars: Option<usize>,
    pub context_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub similarity_threshold: Option<f64>,
    pub alternative_threshold: Option<f64>,
    pub max_features: Option<usize>,
    pub similarity_weight: Option<f64>,
    pub authority_weight: Option<f64>,
}

/// Platform config directory path: `<config_dir>/citesmith/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citesmith").join("config.toml"))
}

/// Load config by cascading CWD `.citesmith.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".citesmith.toml"));

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
    match try_load_from_path(path) {
        Ok(config) => Some(config),
        Err(CoreError::Io(_)) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            None
        }
    }
}

/// Load a config from a specific path, reporting why it failed.
pub fn try_load_from_path(path: &Path) -> Result<ConfigFile, CoreError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        formatting: Some(FormattingConfig {
            style: overlay
                .formatting
                .as_ref()
                .and_then(|f| f.style.clone())
                .or_else(|| base.formatting.as_ref().and_then(|f| f.style.clone())),
        }),
        index: Some(IndexConfig {
            chunk_size: overlay
                .index
                .as_ref()
                .and_then(|i| i.chunk_size)
                .or_else(|| base.index.as_ref().and_then(|i| i.chunk_size)),
            min_chunk_chars: overlay
                .index
                .as_ref()
                .and_then(|i| i.min_chunk_chars)
                .or_else(|| base.index.as_ref().and_then(|i| i.min_chunk_chars)),
            context_chars: overlay
                .index
                .as_ref()
                .and_then(|i| i.context_chars)
                .or_else(|| base.index.as_ref().and_then(|i| i.context_chars)),
        }),
        scoring: Some(ScoringConfig {
            similarity_threshold: overlay
                .scoring
                .as_ref()
                .and_then(|s| s.similarity_threshold)
                .or_else(|| base.scoring.as_ref().and_then(|s| s.similarity_threshold)),
            alternative_threshold: overlay
                .scoring
                .as_ref()
                .and_then(|s| s.alternative_threshold)
                .or_else(|| {
                    base.scoring
                        .as_ref()
                        .and_then(|s| s.alternative_threshold)
                }),
            max_features: overlay
                .scoring
                .as_ref()
                .and_then(|s| s.max_features)
                .or_else(|| base.scoring.as_ref().and_then(|s| s.max_features)),
            similarity_weight: overlay
                .scoring
                .as_ref()
                .and_then(|s| s.similarity_weight)
                .or_else(|| base.scoring.as_ref().and_then(|s| s.similarity_weight)),
            authority_weight: overlay
                .scoring
                .as_ref()
                .and_then(|s| s.authority_weight)
                .or_else(|| base.scoring.as_ref().and_then(|s| s.authority_weight)),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, CoreError> {
    let path = config_path().ok_or(CoreError::NoConfigDir)?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Save a config to `path`, creating parent directories as needed.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
