use ahash::HashSet;

use crate::Name;

/// A set of declared variable names, consulted by the parser when it needs
/// to know whether a `$name` reference is in scope (host-supplied external
/// variables, for instance).
pub type VariableNames = HashSet<Name>;
