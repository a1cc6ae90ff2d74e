//! The warning subsystem (spec §4.10): collected, severity-filtered,
//! de-duplicated diagnostics that never alter evaluation. This is the
//! engine's observability surface; `log`'s `debug!`/`trace!` macros are
//! used alongside it at parse/evaluate entry points for host-side
//! tracing, the way the teacher wires `log` into its own crates.

use std::collections::HashSet;

/// Warning severity, ordered so a [`WarningConfig`] can filter by
/// minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A category tag, used for suppression (`WarningConfig::suppressed_categories`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Deprecation,
    Compatibility,
    Performance,
    Other,
}

/// A single recorded warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub code: String,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub expression: Option<String>,
}

/// Filtering/deduplication/cap configuration for a [`WarningCollector`]
/// (spec §4.10).
#[derive(Debug, Clone)]
pub struct WarningConfig {
    pub minimum_severity: Severity,
    pub suppressed_codes: HashSet<String>,
    pub suppressed_categories: HashSet<Category>,
    pub emit_once: bool,
    pub max_warnings: Option<usize>,
}

impl Default for WarningConfig {
    fn default() -> Self {
        WarningConfig {
            minimum_severity: Severity::Info,
            suppressed_codes: HashSet::new(),
            suppressed_categories: HashSet::new(),
            emit_once: false,
            max_warnings: None,
        }
    }
}

/// Collects warnings under a [`WarningConfig`]'s filtering rules.
/// Purely observational: nothing here can affect an evaluation's
/// result, only what a host later inspects or renders.
#[derive(Debug, Clone)]
pub struct WarningCollector {
    config: WarningConfig,
    warnings: Vec<Warning>,
    seen_codes: HashSet<String>,
}

impl WarningCollector {
    pub fn new(config: WarningConfig) -> Self {
        WarningCollector {
            config,
            warnings: Vec::new(),
            seen_codes: HashSet::new(),
        }
    }

    /// Record a warning, applying severity/category/dedup/cap filters.
    /// Also forwards to `log::warn!`/`log::info!` so a host's ordinary
    /// logging setup sees it even without inspecting the collector.
    pub fn emit(
        &mut self,
        code: impl Into<String>,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
        expression: Option<String>,
    ) {
        let code = code.into();
        let message = message.into();

        if severity < self.config.minimum_severity {
            return;
        }
        if self.config.suppressed_codes.contains(&code) {
            return;
        }
        if self.config.suppressed_categories.contains(&category) {
            return;
        }
        if self.config.emit_once && self.seen_codes.contains(&code) {
            return;
        }
        if let Some(max) = self.config.max_warnings {
            if self.warnings.len() >= max {
                return;
            }
        }

        match severity {
            Severity::Error => log::error!("{code}: {message}"),
            Severity::Warning => log::warn!("{code}: {message}"),
            Severity::Info => log::info!("{code}: {message}"),
        }

        self.seen_codes.insert(code.clone());
        self.warnings.push(Warning {
            code,
            severity,
            category,
            message,
            expression,
        });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
        self.seen_codes.clear();
    }
}

impl Default for WarningCollector {
    fn default() -> Self {
        WarningCollector::new(WarningConfig::default())
    }
}
