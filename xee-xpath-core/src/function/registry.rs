//! The built-in function signature table (spec §4.8), consulted by
//! [`crate::context::StaticContext::lookup_function`] for arity checking
//! ahead of evaluation.

use ahash::HashMap;

use xee_name::{Name, FN_NAMESPACE};
use xee_schema_type::Xs;
use xee_xpath_type::{ItemType, Occurrence, SequenceType};

use crate::context::FunctionSignature;

fn fn_name(local: &str) -> Name {
    Name::new(local, Some(FN_NAMESPACE.to_string()), Some("fn".to_string()))
}

fn atomic(xs: Xs, occurrence: Occurrence) -> SequenceType {
    SequenceType::new(ItemType::AtomicOrUnionType(xs), occurrence)
}

fn any_item(occurrence: Occurrence) -> SequenceType {
    SequenceType::new(ItemType::Item, occurrence)
}

fn sig(
    map: &mut HashMap<Name, FunctionSignature>,
    local: &str,
    min_args: usize,
    max_args: Option<usize>,
    return_type: SequenceType,
) {
    map.insert(fn_name(local), FunctionSignature::new(min_args, max_args, return_type));
}

/// The built-in `fn:*` signature table (spec §4.8's list, plus the
/// supplemented `fn:error`/`fn:data`). Every entry lives in the
/// `http://www.w3.org/2005/xpath-functions` namespace under the `fn`
/// prefix, matching `xee_name::STATIC_NAMESPACES`.
pub fn builtin_signatures() -> HashMap<Name, FunctionSignature> {
    let mut m = HashMap::default();

    // Context functions.
    sig(&mut m, "position", 0, Some(0), atomic(Xs::Integer, Occurrence::One));
    sig(&mut m, "last", 0, Some(0), atomic(Xs::Integer, Occurrence::One));

    // Boolean functions.
    sig(&mut m, "true", 0, Some(0), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "false", 0, Some(0), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "not", 1, Some(1), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "boolean", 1, Some(1), atomic(Xs::Boolean, Occurrence::One));

    // String functions.
    sig(&mut m, "string", 0, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "concat", 2, None, atomic(Xs::String, Occurrence::One));
    sig(&mut m, "string-length", 0, Some(1), atomic(Xs::Integer, Occurrence::One));
    sig(&mut m, "substring", 2, Some(3), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "substring-before", 2, Some(2), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "substring-after", 2, Some(2), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "starts-with", 2, Some(2), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "contains", 2, Some(2), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "ends-with", 2, Some(2), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "normalize-space", 0, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "translate", 3, Some(3), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "upper-case", 1, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "lower-case", 1, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "string-join", 1, Some(2), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "matches", 2, Some(3), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "replace", 3, Some(4), atomic(Xs::String, Occurrence::One));

    // Numeric functions.
    sig(&mut m, "number", 0, Some(1), atomic(Xs::Double, Occurrence::One));
    sig(&mut m, "sum", 1, Some(2), any_item(Occurrence::One));
    sig(&mut m, "floor", 1, Some(1), any_item(Occurrence::One));
    sig(&mut m, "ceiling", 1, Some(1), any_item(Occurrence::One));
    sig(&mut m, "round", 1, Some(2), any_item(Occurrence::One));
    sig(&mut m, "abs", 1, Some(1), any_item(Occurrence::One));

    // Sequence functions.
    sig(&mut m, "empty", 1, Some(1), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "exists", 1, Some(1), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "head", 1, Some(1), any_item(Occurrence::Option));
    sig(&mut m, "tail", 1, Some(1), any_item(Occurrence::Many));
    sig(&mut m, "reverse", 1, Some(1), any_item(Occurrence::Many));
    sig(&mut m, "distinct-values", 1, Some(2), atomic(Xs::AnyAtomicType, Occurrence::Many));
    sig(&mut m, "index-of", 2, Some(3), atomic(Xs::Integer, Occurrence::Many));
    sig(&mut m, "subsequence", 2, Some(3), any_item(Occurrence::Many));
    sig(&mut m, "count", 1, Some(1), atomic(Xs::Integer, Occurrence::One));

    // Node functions.
    sig(&mut m, "name", 0, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "local-name", 0, Some(1), atomic(Xs::String, Occurrence::One));
    sig(&mut m, "namespace-uri", 0, Some(1), atomic(Xs::AnyURI, Occurrence::One));
    sig(&mut m, "id", 1, Some(2), any_item(Occurrence::Many));
    sig(&mut m, "lang", 1, Some(2), atomic(Xs::Boolean, Occurrence::One));
    sig(&mut m, "root", 0, Some(1), any_item(Occurrence::Option));
    sig(&mut m, "data", 1, Some(1), atomic(Xs::AnyAtomicType, Occurrence::Many));

    // Supplemented: fn:error (never actually returns; declared `none`
    // as item()* since this engine has no `none` sequence type).
    sig(&mut m, "error", 0, Some(3), any_item(Occurrence::Many));

    m
}
