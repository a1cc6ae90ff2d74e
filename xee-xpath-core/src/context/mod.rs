//! Static and dynamic evaluation contexts (spec §3, §4.9) and the
//! `EngineOptions` configuration surface (spec §6) a host tunes an
//! [`crate::eval::Evaluator`] with, grounded in the teacher's
//! `context::static_context_builder` split of "build once, evaluate many".

mod dynamic_context;
mod static_context;

pub use dynamic_context::DynamicContext;
pub use static_context::{FunctionSignature, StaticContext, StaticContextBuilder};

use xee_xpath_lexer::XPathVersion;

use crate::cache::ExpressionCacheConfig;
use crate::warning::WarningConfig;

/// The top-level configuration surface (spec §6 "Configuration"):
/// version gating, strictness, and the ambient cache/warning
/// subsystems, bundled so a host configures one object per engine
/// instance rather than threading flags through every call.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// The XPath grammar/feature version to parse and evaluate under.
    pub version: XPathVersion,
    /// Whether unsupported features raise (`true`) or emit a warning and
    /// degrade (`false`).
    pub strict: bool,
    /// Whether the deprecated `namespace::` axis is available; otherwise
    /// using it raises `XPST0010`.
    pub enable_namespace_axis: bool,
    /// Whether XPath-1.0 compatibility coercion/short-circuit rules
    /// apply even when `version` is 2.0+.
    pub xpath10_compatibility_mode: bool,
    /// Whether the expression cache is active.
    pub cache: bool,
    pub cache_config: ExpressionCacheConfig,
    pub warning_config: WarningConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            version: XPathVersion::default(),
            strict: true,
            enable_namespace_axis: false,
            xpath10_compatibility_mode: false,
            cache: true,
            cache_config: ExpressionCacheConfig::default(),
            warning_config: WarningConfig::default(),
        }
    }
}
