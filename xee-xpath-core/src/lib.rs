#![warn(missing_docs)]

//! The XPath evaluation engine (spec §2 components 1, 4–11): the error
//! taxonomy, static/dynamic contexts, atomization, type promotion and
//! coercion, the data-model adapter trait, the AST-walking evaluator,
//! the built-in function library, the warning subsystem, and the
//! expression/lookup caches.
//!
//! This crate does not parse; it evaluates an already-parsed
//! `xee_xpath_ast::XPath` against a host tree implementing [`XmlNode`].
//! The facade crate (`xee-xpath`) wires the lexer, parser, and this
//! evaluator together behind a single `parse`/`evaluate` entry point.

pub mod atomic;
pub mod cache;
pub mod context;
pub mod error;
pub mod eval;
pub mod function;
pub mod item;
pub mod matching;
pub mod node;
pub mod sequence;
pub mod span;
pub mod warning;

pub use context::{DynamicContext, EngineOptions, StaticContext, StaticContextBuilder};
pub use error::{Error, Result, SpannedError, SpannedResult};
pub use eval::eval_expr;
pub use item::Item;
pub use node::{DocumentPosition, NodeKind, XmlNode};
pub use sequence::Sequence;
