/// The closed enumeration of node kinds exposed by the data-model adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    /// An element node.
    Element,
    /// An attribute node.
    Attribute,
    /// A text node.
    Text,
    /// A CDATA section, treated as text by the data model but reported
    /// distinctly.
    CdataSection,
    /// A processing-instruction node.
    ProcessingInstruction,
    /// A comment node.
    Comment,
    /// A document node.
    Document,
    /// A document-fragment node.
    DocumentFragment,
    /// A namespace node (only reachable via the deprecated `namespace::`
    /// axis, gated by `enableNamespaceAxis`).
    Namespace,
}

impl NodeKind {
    /// The keyword used by the corresponding kind test in XPath syntax,
    /// e.g. `element()`, `text()`.
    pub fn keyword(&self) -> &'static str {
        use NodeKind::*;
        match self {
            Element => "element",
            Attribute => "attribute",
            Text => "text",
            CdataSection => "cdata-section",
            ProcessingInstruction => "processing-instruction",
            Comment => "comment",
            Document => "document-node",
            DocumentFragment => "document-fragment",
            Namespace => "namespace-node",
        }
    }
}
