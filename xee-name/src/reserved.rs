/// The Unicode codepoint collation, used as the default collation when no
/// other is configured (§2, "default collation URI"; §6 invariant: the
/// default collation must appear in the in-scope collation list).
pub const DEFAULT_COLLATION_URI: &str = "http://www.w3.org/2005/xpath-functions/collation/codepoint";

/// Local names in the `fn` namespace that a static context can never
/// rebind (§3 invariants, §4.8). Listed by local name since the reserved
/// set is scoped to the default function namespace.
const RESERVED_FUNCTION_NAMES: &[&str] = &[
    "position",
    "last",
    "count",
    "string",
    "concat",
    "string-length",
    "substring",
    "substring-before",
    "substring-after",
    "starts-with",
    "contains",
    "ends-with",
    "normalize-space",
    "translate",
    "upper-case",
    "lower-case",
    "string-join",
    "matches",
    "replace",
    "number",
    "sum",
    "floor",
    "ceiling",
    "round",
    "abs",
    "empty",
    "exists",
    "head",
    "tail",
    "reverse",
    "distinct-values",
    "index-of",
    "subsequence",
    "name",
    "local-name",
    "namespace-uri",
    "id",
    "lang",
    "root",
    "true",
    "false",
    "not",
    "boolean",
    "data",
    "error",
];

/// Whether a local name in the default function namespace is reserved and
/// so cannot be overridden by a user/host-registered extension function
/// (`XPST0017` at parse time if attempted).
pub fn is_reserved_function_name(local_name: &str) -> bool {
    RESERVED_FUNCTION_NAMES.contains(&local_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_cannot_be_rebound() {
        assert!(is_reserved_function_name("position"));
        assert!(is_reserved_function_name("concat"));
        assert!(!is_reserved_function_name("my-custom-function"));
    }
}
