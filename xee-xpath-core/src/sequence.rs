//! [`Sequence`]: an ordered list of items (spec §3 "Sequence"), the value
//! every expression evaluates to. Atomization, EBV, and document-order
//! normalization all operate on whole sequences.

use crate::atomic::Atomic;
use crate::error::Error;
use crate::item::Item;
use crate::node::{DocumentPosition, XmlNode};

/// An ordered list of items. A length-1 sequence is indistinguishable
/// from its single item in every context (spec glossary "Sequence").
#[derive(Debug, Clone)]
pub struct Sequence<N: XmlNode> {
    items: Vec<Item<N>>,
}

impl<N: XmlNode> Default for Sequence<N> {
    fn default() -> Self {
        Sequence { items: Vec::new() }
    }
}

impl<N: XmlNode> Sequence<N> {
    /// The empty sequence, `()`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a sequence from a materialized item vector.
    pub fn from_items(items: Vec<Item<N>>) -> Self {
        Sequence { items }
    }

    /// A sequence containing exactly one item.
    pub fn singleton(item: Item<N>) -> Self {
        Sequence { items: vec![item] }
    }

    /// The items, in their current order.
    pub fn items(&self) -> &[Item<N>] {
        &self.items
    }

    /// Consume the sequence, yielding its items.
    pub fn into_items(self) -> Vec<Item<N>> {
        self.items
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this is the empty sequence.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one item.
    pub fn push(&mut self, item: Item<N>) {
        self.items.push(item);
    }

    /// Append another sequence's items.
    pub fn extend(&mut self, other: Sequence<N>) {
        self.items.extend(other.items);
    }

    /// The single item, if this sequence has exactly one (used by
    /// contexts that require a singleton, e.g. value comparison
    /// operands; raises `XPTY0004` otherwise per spec §4.7).
    pub fn as_singleton(&self) -> Result<&Item<N>, Error> {
        match self.items.as_slice() {
            [item] => Ok(item),
            _ => Err(Error::XPTY0004),
        }
    }

    /// Atomize every item (spec §4.5): nodes become their typed value (or
    /// string value, since this engine is not schema-aware — see
    /// DESIGN.md), atomic items pass through unchanged.
    pub fn atomize(&self) -> Vec<Atomic> {
        self.items.iter().map(atomize_item).collect()
    }

    /// The effective boolean value of this sequence (spec §4.6).
    pub fn ebv(&self) -> Result<bool, Error> {
        crate::atomic::ebv(self)
    }

    /// Deduplicate nodes by identity and sort into document order (spec
    /// §4.8): applied after union and after a reverse-axis step's
    /// predicates have been evaluated in reverse-axis order. A sequence
    /// of atomic values is returned unchanged (order is already
    /// significant and there is no identity to deduplicate by).
    pub fn into_document_order(mut self) -> Self {
        let mut seen: Vec<N> = Vec::with_capacity(self.items.len());
        self.items.retain(|item| match item {
            Item::Node(n) => {
                if seen.iter().any(|s| s == n) {
                    false
                } else {
                    seen.push(n.clone());
                    true
                }
            }
            Item::Atomic(_) => true,
        });
        self.items.sort_by(|a, b| match (a, b) {
            (Item::Node(x), Item::Node(y)) => document_order_cmp(x, y),
            _ => std::cmp::Ordering::Equal,
        });
        self
    }
}

fn document_order_cmp<N: XmlNode>(a: &N, b: &N) -> std::cmp::Ordering {
    if a == b {
        return std::cmp::Ordering::Equal;
    }
    match a.compare_document_position(b) {
        DocumentPosition::Preceding => std::cmp::Ordering::Less,
        DocumentPosition::Following => std::cmp::Ordering::Greater,
        DocumentPosition::Same => std::cmp::Ordering::Equal,
    }
}

/// Atomize a single item (spec §4.5): a node's typed value, or its
/// string value when no schema type is known.
pub fn atomize_item<N: XmlNode>(item: &Item<N>) -> Atomic {
    match item {
        Item::Atomic(a) => a.clone(),
        Item::Node(n) => Atomic::Untyped(n.text_content().into()),
    }
}

impl<N: XmlNode> FromIterator<Item<N>> for Sequence<N> {
    fn from_iter<T: IntoIterator<Item = Item<N>>>(iter: T) -> Self {
        Sequence {
            items: iter.into_iter().collect(),
        }
    }
}

impl<N: XmlNode> IntoIterator for Sequence<N> {
    type Item = Item<N>;
    type IntoIter = std::vec::IntoIter<Item<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<N: XmlNode> PartialEq for Sequence<N> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
