use std::path::Path;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::DocsearchConfig;

/// Context for semantic config validation.
///
/// Checking whether the search directory exists needs a base directory: the
/// documentation root when known, otherwise the directory holding the config
/// file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidationContext<'a> {
    pub root: Option<&'a Path>,
    pub config_dir: Option<&'a Path>,
}

impl<'a> ConfigValidationContext<'a> {
    fn base_dir(self) -> Option<&'a Path> {
        self.root.or(self.config_dir)
    }
}

impl DocsearchConfig {
    /// Validate semantic invariants, reporting as many problems as possible
    /// in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        self.validate_with_context(ConfigValidationContext::default())
    }

    #[must_use]
    pub fn validate_with_context(&self, ctx: ConfigValidationContext<'_>) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_search(self, &mut out);
        validate_index(self, ctx, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_search(config: &DocsearchConfig, out: &mut ValidationDiagnostics) {
    let search = &config.search;

    if search.per_category_cap == 0 {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "search.per_category_cap".to_string(),
            message: "must be >= 1".to_string(),
        });
    }

    if search.max_query_length == 0 {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "search.max_query_length".to_string(),
            message: "must be >= 1".to_string(),
        });
    } else if search.min_query_length > search.max_query_length {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "search.min_query_length".to_string(),
            message: format!(
                "must be <= search.max_query_length ({})",
                search.max_query_length
            ),
        });
    }

    for (idx, category) in search.category_order.iter().enumerate() {
        if search.category_order[..idx].contains(category) {
            out.warnings.push(ConfigWarning::DuplicateCategory {
                toml_path: format!("search.category_order[{idx}]"),
                category: *category,
            });
        }
    }
}

fn validate_index(
    config: &DocsearchConfig,
    ctx: ConfigValidationContext<'_>,
    out: &mut ValidationDiagnostics,
) {
    let Some(dir) = &config.index.search_dir else {
        return;
    };

    let resolved = if dir.is_absolute() {
        dir.clone()
    } else if let Some(base_dir) = ctx.base_dir() {
        base_dir.join(dir)
    } else {
        return;
    };

    if !resolved.exists() {
        out.warnings
            .push(ConfigWarning::SearchDirMissing { resolved });
    } else if !resolved.is_dir() {
        out.warnings
            .push(ConfigWarning::SearchDirNotDirectory { resolved });
    }
}

fn validate_logging(config: &DocsearchConfig, out: &mut ValidationDiagnostics) {
    let directives = config.logging.directives();
    if tracing_subscriber::EnvFilter::try_new(&*directives).is_err() {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized: directives.into_owned(),
        });
    }
}
