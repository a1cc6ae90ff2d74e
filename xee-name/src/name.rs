use crate::namespaces::NamespaceLookup;

/// A qualified name: a local name paired with an optional namespace URI.
///
/// Equality and hashing ignore the prefix, matching the XPath/XQuery data
/// model, where two QNames with the same local name and namespace URI but
/// a different prefix are the same name.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    local_name: String,
    namespace: Option<String>,
    prefix: Option<String>,
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.local_name.hash(state);
        self.namespace.hash(state);
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.local_name == other.local_name && self.namespace == other.namespace
    }
}

impl Name {
    /// Construct a name directly from its parts.
    pub fn new(local_name: impl Into<String>, namespace: Option<String>, prefix: Option<String>) -> Self {
        Name {
            local_name: local_name.into(),
            namespace,
            prefix,
        }
    }

    /// A name with a prefix, resolved against a namespace lookup. Returns
    /// `None` if the prefix is unbound (caller raises `XPST0081`).
    pub fn prefixed(prefix: &str, local_name: &str, namespaces: &impl NamespaceLookup) -> Option<Self> {
        let namespace = namespaces.by_prefix(prefix)?;
        Some(Name {
            local_name: local_name.to_string(),
            namespace: Some(namespace.to_string()),
            prefix: Some(prefix.to_string()),
        })
    }

    /// A name with no prefix and no namespace (resolved later against the
    /// default element/function namespace by the caller).
    pub fn unprefixed(local_name: &str) -> Self {
        Name {
            local_name: local_name.to_string(),
            namespace: None,
            prefix: None,
        }
    }

    /// A name qualified by a `Q{uri}local` braced URI literal.
    pub fn uri_qualified(uri: &str, local_name: &str) -> Self {
        Name {
            local_name: local_name.to_string(),
            namespace: Some(uri.to_string()),
            prefix: None,
        }
    }

    /// Apply a default namespace if this name has none.
    pub fn with_default_namespace(self, uri: Option<&str>) -> Self {
        if self.namespace.is_none() {
            if let Some(uri) = uri {
                if !uri.is_empty() {
                    return Name {
                        local_name: self.local_name,
                        namespace: Some(uri.to_string()),
                        prefix: None,
                    };
                }
            }
        }
        self
    }

    /// The local (unprefixed) part of the name.
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The namespace URI, if any.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The lexical prefix this name was written with, if any. Not part of
    /// identity: two `Name`s differing only in prefix compare equal.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Render back to a `prefix:local` or bare `local` string, for messages.
    pub fn to_display_name(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", self.local_name),
            _ => self.local_name.clone(),
        }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_prefix() {
        let a = Name::new("foo", Some("urn:x".into()), Some("a".into()));
        let b = Name::new("foo", Some("urn:x".into()), Some("b".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn different_namespace_is_different_name() {
        let a = Name::new("foo", Some("urn:x".into()), None);
        let b = Name::new("foo", Some("urn:y".into()), None);
        assert_ne!(a, b);
    }
}
