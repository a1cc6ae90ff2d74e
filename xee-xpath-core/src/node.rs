//! The data-model adapter (spec §6): the trait a host tree implements so
//! this crate can navigate it without owning it. The core never mutates
//! a node and never synthesizes node identity — both come from the host.

use xee_name::Name;
pub use xee_xpath_type::NodeKind;

/// The ordering a host's `compare_document_position` reports: whether
/// `self` precedes, follows, or is the same node as `other` in document
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPosition {
    Preceding,
    Following,
    Same,
}

/// A node from a host tree. Implementors are expected to be cheap to
/// clone (a handle, not an owned subtree) and to compare by identity.
///
/// This is the seam between the evaluator and whatever tree
/// representation a host embeds this engine against; the facade crate's
/// own in-memory tree is one such implementation, built only for this
/// workspace's own tests.
pub trait XmlNode: std::fmt::Debug + Clone + PartialEq + Eq + std::hash::Hash {
    /// This node's kind.
    fn node_kind(&self) -> NodeKind;

    /// The node's expanded name (elements, attributes, processing
    /// instructions by target). `None` for text/comment/document nodes.
    fn node_name(&self) -> Option<Name>;

    /// The node's local name, if it has one.
    fn local_name(&self) -> Option<&str> {
        None
    }

    /// The node's namespace URI, if any.
    fn namespace_uri(&self) -> Option<&str> {
        None
    }

    /// The string value used for atomization when no schema type is
    /// known: for text/comment/PI nodes, the literal text; for
    /// elements/documents, the concatenation of descendant text nodes in
    /// document order.
    fn text_content(&self) -> String;

    /// The parent node, or `None` at the document root.
    fn parent(&self) -> Option<Self>;

    /// Child nodes, in document order.
    fn children(&self) -> Vec<Self>;

    /// Attribute nodes of an element, in the order the host stores them.
    fn attributes(&self) -> Vec<Self> {
        Vec::new()
    }

    /// The following sibling, if any.
    fn next_sibling(&self) -> Option<Self>;

    /// The preceding sibling, if any.
    fn previous_sibling(&self) -> Option<Self>;

    /// The document node this node belongs to.
    fn owner_document(&self) -> Self;

    /// The root element of the owning document, if this is (or belongs
    /// to) a document with one.
    fn document_element(&self) -> Option<Self> {
        None
    }

    /// The target of a processing instruction.
    fn target(&self) -> Option<&str> {
        None
    }

    /// The value of a named attribute on an element.
    fn get_attribute(&self, _name: &Name) -> Option<String> {
        None
    }

    /// This node's position relative to `other` in document order. Used
    /// by axis walking and by the document-order sort applied after
    /// reverse-axis predicate evaluation and after union (spec §6, §4.8).
    fn compare_document_position(&self, other: &Self) -> DocumentPosition;

    /// Whether this node is at or above `other` in the tree (used by the
    /// `ancestor`/`ancestor-or-self` axes' default `compare_document_position`
    /// fallback). Hosts that can answer this cheaply may override;
    /// the default walks `parent()`.
    fn is_ancestor_of(&self, other: &Self) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if &node == self {
                return true;
            }
            current = node.parent();
        }
        false
    }
}
