//! The built-in function library (spec §4.8 "static signature table &
//! built-in function list") and its dispatch (spec §4.7 "function
//! call"), grounded in the teacher's `function::library` split between a
//! static signature table and a runtime dispatch table keyed by the
//! same name.

mod builtins;
mod registry;

pub use builtins::call_builtin;
pub use registry::builtin_signatures;
