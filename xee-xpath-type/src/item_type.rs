use xee_schema_type::Xs;

use crate::kind_test::KindTest;

/// The type of a single item: a wildcard, an atomic type, or a kind test.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ItemType {
    /// `item()`: matches any single item.
    Item,
    /// An atomic (or union, though this engine does not model user-defined
    /// unions) type, e.g. `xs:integer`.
    AtomicOrUnionType(Xs),
    /// A node kind test, e.g. `element()`, `text()`, `node()`.
    KindTest(KindTest),
}

impl ItemType {
    /// Whether this item type is the `item()` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, ItemType::Item)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Item => write!(f, "item()"),
            ItemType::AtomicOrUnionType(xs) => write!(f, "xs:{}", xs.local_name()),
            ItemType::KindTest(kind_test) => match kind_test.node_kind {
                Some(kind) => write!(f, "{}()", kind.keyword()),
                None => write!(f, "node()"),
            },
        }
    }
}
