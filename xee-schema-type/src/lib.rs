#![warn(missing_docs)]

//! The `xs:*` atomic type hierarchy: derivation, primitive reduction, and
//! the numeric/string subsumption rules the evaluator needs for promotion
//! and comparison.

mod xs;

pub use xs::Xs;
