#![warn(missing_docs)]

//! QName and namespace support shared by the lexer, parser and evaluator.

mod name;
mod namespaces;
mod reserved;
mod variable_names;

pub use name::Name;
pub use namespaces::{NamespaceLookup, Namespaces, ERR_NAMESPACE, FN_NAMESPACE, XS_NAMESPACE};
pub use reserved::{is_reserved_function_name, DEFAULT_COLLATION_URI};
pub use variable_names::VariableNames;
