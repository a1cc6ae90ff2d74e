//! [`Item`]: the unit a [`crate::sequence::Sequence`] is built from — an
//! atomic value or a node from the host's data model (spec §3 "Item").

use xee_schema_type::Xs;
use xee_xpath_type::ItemType;

use crate::atomic::Atomic;
use crate::node::XmlNode;

/// A single item: either an atomic value or a node handle from the host
/// tree. `N` is the host's node type, implementing [`XmlNode`].
#[derive(Debug, Clone)]
pub enum Item<N: XmlNode> {
    Atomic(Atomic),
    Node(N),
}

impl<N: XmlNode> Item<N> {
    /// Whether this item is a node.
    pub fn is_node(&self) -> bool {
        matches!(self, Item::Node(_))
    }

    /// The node, if this item is one.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Item::Node(n) => Some(n),
            Item::Atomic(_) => None,
        }
    }

    /// The atomic value, if this item already is one (does not atomize a
    /// node: see [`crate::sequence::atomize_item`]).
    pub fn as_atomic(&self) -> Option<&Atomic> {
        match self {
            Item::Atomic(a) => Some(a),
            Item::Node(_) => None,
        }
    }

    /// Whether this item matches `item_type` (spec §4.4 item-type
    /// matching), ignoring the enclosing sequence's occurrence
    /// indicator.
    pub fn matches_item_type(&self, item_type: &ItemType) -> bool {
        match item_type {
            ItemType::Item => true,
            ItemType::AtomicOrUnionType(xs) => match self {
                Item::Atomic(a) => a.is_instance_of(*xs),
                Item::Node(_) => false,
            },
            ItemType::KindTest(kind_test) => match self {
                Item::Node(n) => crate::matching::node_matches_kind_test(kind_test, n),
                Item::Atomic(_) => false,
            },
        }
    }
}

impl<N: XmlNode> PartialEq for Item<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Atomic(a), Item::Atomic(b)) => a == b,
            (Item::Node(a), Item::Node(b)) => a == b,
            _ => false,
        }
    }
}

/// The dynamic item type of a single item: either its atomic type
/// re-wrapped, or `None` for a node (whose dynamic item-type identity is
/// its kind, not an [`Xs`]).
pub fn dynamic_atomic_type<N: XmlNode>(item: &Item<N>) -> Option<Xs> {
    item.as_atomic().map(Atomic::dynamic_type)
}
