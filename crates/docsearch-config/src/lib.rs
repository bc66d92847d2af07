use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use docsearch_core::Category;
use docsearch_index::{RankOptions, SearchOptions};
use parking_lot::ReentrantMutex;
use thiserror::Error;

mod diagnostics;
mod logging;
mod schema;
mod validation;

pub use diagnostics::{
    ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics,
};
pub use logging::{init_tracing, LoggingConfig};
pub use schema::json_schema;
pub use validation::ConfigValidationContext;

/// Top-level `docsearch.toml` document.
///
/// ```toml
/// [search]
/// per_category_cap = 20
/// min_query_length = 1
/// category_order = ["classes", "functions", "typedefs"]
/// debounce_ms = 500
///
/// [index]
/// search_dir = "html/search"
///
/// [logging]
/// level = "docsearch=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct DocsearchConfig {
    /// Query and ranking behavior.
    #[serde(default)]
    pub search: SearchConfig,

    /// Where the generated shards live.
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum entries shown per category; the rest are dropped.
    #[serde(
        default = "SearchConfig::default_per_category_cap",
        alias = "perCategoryCap"
    )]
    #[schemars(range(min = 1))]
    pub per_category_cap: usize,

    /// Queries shorter than this (after trimming) return an empty result
    /// without searching.
    #[serde(
        default = "SearchConfig::default_min_query_length",
        alias = "minQueryLength"
    )]
    pub min_query_length: usize,

    /// Longer queries return no results.
    #[serde(default = "SearchConfig::default_max_query_length")]
    #[schemars(range(min = 1))]
    pub max_query_length: usize,

    /// Display order of result groups. Categories not listed follow in
    /// generator order.
    #[serde(default, alias = "categoryOrder")]
    #[schemars(with = "Vec<String>")]
    pub category_order: Vec<Category>,

    /// Delay between the last keystroke and running the query.
    #[serde(default = "SearchConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SearchConfig {
    fn default_per_category_cap() -> usize {
        docsearch_index::DEFAULT_PER_CATEGORY_CAP
    }

    fn default_min_query_length() -> usize {
        1
    }

    fn default_max_query_length() -> usize {
        docsearch_index::DEFAULT_MAX_QUERY_LENGTH
    }

    fn default_debounce_ms() -> u64 {
        500
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            per_category_cap: self.per_category_cap,
            category_order: self.category_order.clone(),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_query_length: self.max_query_length,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_category_cap: Self::default_per_category_cap(),
            min_query_length: Self::default_min_query_length(),
            max_query_length: Self::default_max_query_length(),
            category_order: Vec::new(),
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct IndexConfig {
    /// Directory holding the generator's `search/*.js` shards. Relative paths
    /// are resolved against the root the config was loaded for.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub search_dir: Option<PathBuf>,
}

impl IndexConfig {
    /// The configured search directory, or `<root>/search` when unset.
    pub fn resolve_search_dir(&self, root: &Path) -> PathBuf {
        match &self.search_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join("search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_string())
    }
}

impl DocsearchConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file from TOML and return diagnostics (unknown keys,
    /// deprecated keys and semantic validation failures).
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = read_config(path)?;
        let ctx = ConfigValidationContext {
            root: None,
            config_dir: path.parent(),
        };
        Self::load_from_str_with_diagnostics_inner(&text, ctx)
    }

    /// Load a config from a TOML string and return diagnostics.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        Self::load_from_str_with_diagnostics_inner(text, ConfigValidationContext::default())
    }

    fn load_from_str_with_diagnostics_inner(
        text: &str,
        ctx: ConfigValidationContext<'_>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<DocsearchConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };

        if let Ok(value) = toml::from_str::<toml::Value>(text) {
            diagnostics.warnings.extend(deprecation_warnings(&value));
        }

        diagnostics.extend_validation(config.validate_with_context(ctx));

        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Camel-case spellings accepted for compatibility with generator-side
/// option names.
pub(crate) const DEPRECATED_SEARCH_KEYS: &[(&str, &str)] = &[
    ("perCategoryCap", "per_category_cap"),
    ("minQueryLength", "min_query_length"),
    ("categoryOrder", "category_order"),
];

fn deprecation_warnings(value: &toml::Value) -> Vec<ConfigWarning> {
    let Some(search) = value.get("search").and_then(|v| v.as_table()) else {
        return Vec::new();
    };

    DEPRECATED_SEARCH_KEYS
        .iter()
        .filter(|(old, _)| search.contains_key(*old))
        .map(|(old, new)| ConfigWarning::DeprecatedKey {
            path: format!("search.{old}"),
            message: format!("search.{old} is deprecated; use search.{new} instead"),
        })
        .collect()
}

pub const DOCSEARCH_CONFIG_ENV_VAR: &str = "DOCSEARCH_CONFIG_PATH";

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Run `f` while holding the config environment lock.
///
/// Tests that temporarily set [`DOCSEARCH_CONFIG_ENV_VAR`] wrap the mutation
/// and the discovery call in this so concurrent discovery never observes the
/// override.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Discover the configuration file for a documentation root.
///
/// Search order:
/// 1) `DOCSEARCH_CONFIG_PATH` (absolute or relative to `root`)
/// 2) `docsearch.toml` in `root`
/// 3) `.docsearch.toml` in `root`
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(DOCSEARCH_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["docsearch.toml", ".docsearch.toml"]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Load the configuration for a documentation root.
///
/// If no config is present, returns [`DocsearchConfig::default`] and `None`.
pub fn load_for_root(root: &Path) -> Result<(DocsearchConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((DocsearchConfig::default(), None));
    };

    let config = DocsearchConfig::load_from_path(&path)?;
    tracing::debug!(target = "docsearch.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}

/// Load the configuration for a documentation root with diagnostics.
///
/// If no config is present, returns [`DocsearchConfig::default`], `None`, and
/// empty diagnostics.
pub fn load_for_root_with_diagnostics(
    root: &Path,
) -> Result<(DocsearchConfig, Option<PathBuf>, ConfigDiagnostics), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((DocsearchConfig::default(), None, ConfigDiagnostics::default()));
    };

    let text = read_config(&path)?;
    let ctx = ConfigValidationContext {
        root: Some(root),
        config_dir: path.parent(),
    };

    let (config, diagnostics) = DocsearchConfig::load_from_str_with_diagnostics_inner(&text, ctx)?;
    for warning in &diagnostics.warnings {
        tracing::warn!(target = "docsearch.config", path = %path.display(), ?warning, "config warning");
    }
    Ok((config, Some(path), diagnostics))
}
