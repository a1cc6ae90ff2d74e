#![warn(missing_docs)]

//! The public facade: parse an XPath expression once, then evaluate it
//! any number of times against a dynamic context (spec §2: "a host wires
//! the lexer, parser, and evaluator together behind a single
//! `parse`/`evaluate` entry point").
//!
//! Parsing and evaluation are split into two steps, following the
//! teacher's `xee-xpath::Xpath`/`Engine` split: a [`Xpath`] is reusable
//! across many evaluations (and many documents), since static analysis
//! (arity/reserved-name checks, namespace resolution) only needs to
//! happen once per expression text.
//!
//! ```
//! use xee_xpath::{tree::Document, Xpath};
//! use xee_xpath_core::{DynamicContext, EngineOptions, StaticContext};
//! use std::rc::Rc;
//!
//! let options = EngineOptions::default();
//! let static_context = Rc::new(StaticContext::with_builtins(options.version));
//! let xpath = Xpath::compile("1 + 2 * 3", &static_context).unwrap();
//!
//! let doc = Document::build("root", |_| {});
//! let context = DynamicContext::new(static_context).with_context_item(
//!     xee_xpath_core::Item::Node(doc),
//!     1,
//!     1,
//! );
//! let result = xpath.evaluate(&context).unwrap();
//! assert_eq!(result.len(), 1);
//! ```

pub mod tree;

use std::rc::Rc;

use xee_name::Namespaces;
use xee_xpath_ast::XPath;
use xee_xpath_core::{DynamicContext, Error, Sequence, SpannedError, SpannedResult, StaticContext, XmlNode};
use xee_xpath_lexer::XPathVersion;

pub use xee_name;
pub use xee_schema_type;
pub use xee_xpath_ast;
pub use xee_xpath_core;
pub use xee_xpath_core::{EngineOptions, Item, StaticContextBuilder};
pub use xee_xpath_lexer;
pub use xee_xpath_type;

/// A parsed, reusable XPath expression.
///
/// Compiling resolves namespace prefixes and (spec §4.2) checks
/// function calls against the static context's signature table, so a
/// [`Xpath`] that compiled successfully cannot later fail with
/// `XPST0003`/`XPST0017`/`XPST0081` during evaluation — only dynamic
/// errors (`XPDY*`, `XPTY*`, `FO*`) remain possible.
#[derive(Debug, Clone)]
pub struct Xpath {
    ast: XPath,
}

impl Xpath {
    /// Parse `source` under `static_context`'s namespaces and version.
    pub fn compile(source: &str, static_context: &StaticContext) -> SpannedResult<Self> {
        let ast = xee_xpath_ast::parse_xpath(source, &static_context.namespaces, static_context.version)?;
        Ok(Xpath { ast })
    }

    /// Parse `source` with a fresh, builtins-only static context at the
    /// given version. A convenience for one-shot evaluation; a host that
    /// evaluates the same text repeatedly, or needs extension functions
    /// or custom namespaces, should build a [`StaticContext`] once via
    /// [`StaticContextBuilder`] and call [`Xpath::compile`] directly.
    pub fn parse(source: &str, version: XPathVersion) -> SpannedResult<(Self, Rc<StaticContext>)> {
        let static_context = Rc::new(StaticContext::with_builtins(version));
        let xpath = Xpath::compile(source, &static_context)?;
        Ok((xpath, static_context))
    }

    /// Evaluate this expression against `context`, returning the
    /// resulting sequence or the dynamic error that aborted evaluation.
    ///
    /// Evaluation errors are never spanned (spec §7: a dynamic error can
    /// be raised from deep inside function evaluation, far from any
    /// single source position worth reporting), so this returns
    /// [`Error`] rather than [`SpannedError`].
    pub fn evaluate<N: XmlNode>(&self, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
        xee_xpath_core::eval_expr(&self.ast.0.value, context)
    }
}

/// Parse and evaluate `source` in one step against a context item, using
/// a fresh builtins-only static context. A convenience for simple
/// queries; see [`Xpath::compile`]/[`Xpath::evaluate`] for reuse across
/// many evaluations or documents.
pub fn evaluate_xpath<N: XmlNode>(
    source: &str,
    options: &EngineOptions,
    context_item: Option<Item<N>>,
) -> SpannedResult<Sequence<N>> {
    let static_context = Rc::new(
        StaticContextBuilder::new(options.version)
            .enable_namespace_axis(options.enable_namespace_axis)
            .xpath10_compatibility_mode(options.xpath10_compatibility_mode)
            .build(),
    );
    let xpath = Xpath::compile(source, &static_context)?;
    let mut dynamic_context = DynamicContext::new(static_context);
    if let Some(item) = context_item {
        dynamic_context = dynamic_context.with_context_item(item, 1, 1);
    }
    xpath.evaluate(&dynamic_context).map_err(SpannedError::from)
}

/// Resolve namespace prefixes used by both this facade's doctests and a
/// host embedding it without its own namespace table.
pub fn default_namespaces() -> Namespaces {
    Namespaces::default()
}
