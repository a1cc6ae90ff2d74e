use ahash::HashMap;

/// The function/operator namespace used by the default (unprefixed)
/// function lookup (`fn:*`).
pub const FN_NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions";
/// The XML Schema namespace, bound by default to the `xs` prefix (§6).
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// The namespace of the error QNames raised by this engine (§6, §7).
pub const ERR_NAMESPACE: &str = "http://www.w3.org/2005/xqt-errors";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

const STATIC_NAMESPACES: [(&str, &str); 6] = [
    ("xs", XS_NAMESPACE),
    ("fn", FN_NAMESPACE),
    ("math", "http://www.w3.org/2005/xpath-functions/math"),
    ("map", "http://www.w3.org/2005/xpath-functions/map"),
    ("array", "http://www.w3.org/2005/xpath-functions/array"),
    ("err", ERR_NAMESPACE),
];

/// A prefix-to-URI namespace table, consulted by both the parser (to
/// resolve QNames statically) and the evaluator (namespace-sensitive
/// functions).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Namespaces {
    namespaces: HashMap<String, String>,
    default_element_namespace: String,
    default_function_namespace: String,
}

impl Namespaces {
    /// Construct from an explicit table plus default element/function
    /// namespaces.
    pub fn new(
        namespaces: HashMap<String, String>,
        default_element_namespace: impl Into<String>,
        default_function_namespace: impl Into<String>,
    ) -> Self {
        Self {
            namespaces,
            default_element_namespace: default_element_namespace.into(),
            default_function_namespace: default_function_namespace.into(),
        }
    }

    fn default_namespaces() -> HashMap<String, String> {
        let mut namespaces = HashMap::default();
        namespaces.insert("xml".to_string(), XML_NAMESPACE.to_string());
        for (prefix, uri) in STATIC_NAMESPACES.into_iter() {
            namespaces.insert(prefix.to_string(), uri.to_string());
        }
        namespaces
    }

    /// Bind (or rebind) a prefix. An empty prefix sets the default element
    /// namespace instead of entering the table.
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        if prefix.is_empty() {
            self.default_element_namespace = namespace.to_string();
        } else {
            self.namespaces
                .insert(prefix.to_string(), namespace.to_string());
        }
    }

    /// Resolve a prefix to its bound namespace URI.
    #[inline]
    pub fn by_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(|s| s.as_str())
    }

    /// The default namespace unprefixed element/type names resolve
    /// against.
    #[inline]
    pub fn default_element_namespace(&self) -> &str {
        &self.default_element_namespace
    }

    /// The default namespace unprefixed function calls resolve against.
    #[inline]
    pub fn default_function_namespace(&self) -> &str {
        &self.default_function_namespace
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new(Self::default_namespaces(), "", FN_NAMESPACE)
    }
}

/// Abstraction over a prefix lookup, so name resolution does not need to
/// hold a full [`Namespaces`] value.
pub trait NamespaceLookup {
    /// Resolve a prefix to a namespace URI.
    fn by_prefix(&self, prefix: &str) -> Option<&str>;
}

impl NamespaceLookup for Namespaces {
    fn by_prefix(&self, prefix: &str) -> Option<&str> {
        Namespaces::by_prefix(self, prefix)
    }
}

impl<T: NamespaceLookup> NamespaceLookup for &T {
    fn by_prefix(&self, prefix: &str) -> Option<&str> {
        (**self).by_prefix(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_xs_and_fn() {
        let ns = Namespaces::default();
        assert_eq!(ns.by_prefix("xs"), Some(XS_NAMESPACE));
        assert_eq!(ns.by_prefix("fn"), Some(FN_NAMESPACE));
        assert_eq!(ns.by_prefix("nope"), None);
    }

    #[test]
    fn empty_prefix_sets_default_element_namespace() {
        let mut ns = Namespaces::default();
        ns.bind("", "urn:default");
        assert_eq!(ns.default_element_namespace(), "urn:default");
    }
}
