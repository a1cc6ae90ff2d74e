//! A minimal in-memory tree implementing [`xee_xpath_core::XmlNode`], built
//! only for this crate's own tests and doctests (spec §1: "the XML
//! data-model adapter... caller supplies a tree-navigation interface" — a
//! production host brings its own tree; this one exists so the facade has
//! something to evaluate against without depending on a full XML parser).
//!
//! Built with [`ElementBuilder`] rather than parsed from XML text: parsing
//! is outside the core's scope (spec §1 non-goals), so trees are
//! assembled programmatically, depth-first, which also gives each node's
//! identity a document-order position for free.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use xee_name::Name;
use xee_xpath_core::{DocumentPosition, NodeKind, XmlNode};

struct NodeData {
    id: u64,
    kind: NodeKind,
    name: Option<Name>,
    /// Text content for text/comment/CDATA nodes, or a PI's instruction
    /// data. Unused for element/document/attribute nodes (those read
    /// through `children`/`attributes` or `attribute_value` instead).
    value: String,
    target: Option<String>,
    parent: RefCell<Weak<NodeData>>,
    document: RefCell<Weak<NodeData>>,
    children: RefCell<Vec<Node>>,
    attributes: RefCell<Vec<Node>>,
}

/// A handle to one node in an in-memory tree. Cheap to clone (an `Rc`
/// bump); compares by node identity, not structural equality.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl XmlNode for Node {
    fn node_kind(&self) -> NodeKind {
        self.0.kind
    }

    fn node_name(&self) -> Option<Name> {
        self.0.name.clone()
    }

    fn local_name(&self) -> Option<&str> {
        self.0.name.as_ref().map(Name::local_name)
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.0.name.as_ref().and_then(Name::namespace)
    }

    fn text_content(&self) -> String {
        match self.0.kind {
            NodeKind::Text | NodeKind::CdataSection | NodeKind::Comment | NodeKind::ProcessingInstruction => {
                self.0.value.clone()
            }
            _ => {
                let mut out = String::new();
                collect_text(self, &mut out);
                out
            }
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    fn attributes(&self) -> Vec<Self> {
        self.0.attributes.borrow().clone()
    }

    fn next_sibling(&self) -> Option<Self> {
        sibling_offset(self, 1)
    }

    fn previous_sibling(&self) -> Option<Self> {
        sibling_offset(self, -1)
    }

    fn owner_document(&self) -> Self {
        self.0
            .document
            .borrow()
            .upgrade()
            .map(Node)
            .unwrap_or_else(|| self.clone())
    }

    fn document_element(&self) -> Option<Self> {
        self.owner_document()
            .children()
            .into_iter()
            .find(|n| n.node_kind() == NodeKind::Element)
    }

    fn target(&self) -> Option<&str> {
        self.0.target.as_deref()
    }

    fn get_attribute(&self, name: &Name) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|a| a.0.name.as_ref() == Some(name))
            .map(|a| a.0.value.clone())
    }

    fn compare_document_position(&self, other: &Self) -> DocumentPosition {
        match self.0.id.cmp(&other.0.id) {
            std::cmp::Ordering::Less => DocumentPosition::Preceding,
            std::cmp::Ordering::Greater => DocumentPosition::Following,
            std::cmp::Ordering::Equal => DocumentPosition::Same,
        }
    }
}

fn collect_text(node: &Node, out: &mut String) {
    for child in node.children() {
        match child.node_kind() {
            NodeKind::Text | NodeKind::CdataSection => out.push_str(&child.0.value),
            NodeKind::Element => collect_text(&child, out),
            _ => {}
        }
    }
}

fn sibling_offset(node: &Node, delta: i64) -> Option<Node> {
    let parent = node.parent()?;
    let siblings = parent.children();
    let index = siblings.iter().position(|n| n == node)?;
    let target = index as i64 + delta;
    if target < 0 {
        return None;
    }
    siblings.get(target as usize).cloned()
}

/// Builds an in-memory document, assigning each node an id in document
/// order (pre-order: attributes before children, per the glossary's
/// "document order... attributes between an element and its children").
pub struct ElementBuilder {
    next_id: Rc<RefCell<u64>>,
    id: u64,
    name: Option<Name>,
    kind: NodeKind,
    value: String,
    target: Option<String>,
    attributes: Vec<(u64, Name, String)>,
    children: Vec<NodeData>,
}

/// Builds a document by assembling one root element. Mirrors the shape
/// of a small DOM builder: `doc.root("r", |r| { r.child_text("a", "1");
/// })`.
pub struct Document;

impl Document {
    /// Build a document with a single root element named `name`.
    pub fn build(name: &str, build: impl FnOnce(&mut ElementBuilder)) -> Node {
        let next_id = Rc::new(RefCell::new(0u64));
        let document_id = next_counter(&next_id);
        let mut root_builder = ElementBuilder::new(next_id.clone(), Name::unprefixed(name));
        build(&mut root_builder);
        let root_data = root_builder.finish();
        let root_rc = Rc::new(root_data);

        let document_data = Rc::new(NodeData {
            id: document_id,
            kind: NodeKind::Document,
            name: None,
            value: String::new(),
            target: None,
            parent: RefCell::new(Weak::new()),
            document: RefCell::new(Weak::new()),
            children: RefCell::new(vec![Node(root_rc.clone())]),
            attributes: RefCell::new(Vec::new()),
        });
        *document_data.document.borrow_mut() = Rc::downgrade(&document_data);
        attach(&root_rc, &document_data);
        Node(document_data)
    }
}

fn next_counter(counter: &Rc<RefCell<u64>>) -> u64 {
    let mut c = counter.borrow_mut();
    let id = *c;
    *c += 1;
    id
}

/// Recursively wires up `parent`/`document` back-references for a
/// subtree once its final `Rc` address is known.
fn attach(node: &Rc<NodeData>, document: &Rc<NodeData>) {
    *node.document.borrow_mut() = Rc::downgrade(document);
    for attribute in node.attributes.borrow().iter() {
        *attribute.0.parent.borrow_mut() = Rc::downgrade(node);
        *attribute.0.document.borrow_mut() = Rc::downgrade(document);
    }
    for child in node.children.borrow().iter() {
        *child.0.parent.borrow_mut() = Rc::downgrade(node);
        attach(&child.0, document);
    }
}

impl ElementBuilder {
    fn new(next_id: Rc<RefCell<u64>>, name: Name) -> Self {
        let id = next_counter(&next_id);
        ElementBuilder {
            next_id,
            id,
            name: Some(name),
            kind: NodeKind::Element,
            value: String::new(),
            target: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute on this element.
    pub fn attribute(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let id = next_counter(&self.next_id);
        self.attributes.push((id, Name::unprefixed(name), value.into()));
        self
    }

    /// Add a text node child.
    pub fn text(&mut self, value: impl Into<String>) -> &mut Self {
        let id = next_counter(&self.next_id);
        self.children.push(NodeData {
            id,
            kind: NodeKind::Text,
            name: None,
            value: value.into(),
            target: None,
            parent: RefCell::new(Weak::new()),
            document: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            attributes: RefCell::new(Vec::new()),
        });
        self
    }

    /// Add a comment node child.
    pub fn comment(&mut self, value: impl Into<String>) -> &mut Self {
        let id = next_counter(&self.next_id);
        self.children.push(NodeData {
            id,
            kind: NodeKind::Comment,
            name: None,
            value: value.into(),
            target: None,
            parent: RefCell::new(Weak::new()),
            document: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            attributes: RefCell::new(Vec::new()),
        });
        self
    }

    /// Add a processing-instruction node child.
    pub fn pi(&mut self, target: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let id = next_counter(&self.next_id);
        self.children.push(NodeData {
            id,
            kind: NodeKind::ProcessingInstruction,
            name: None,
            value: value.into(),
            target: Some(target.into()),
            parent: RefCell::new(Weak::new()),
            document: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            attributes: RefCell::new(Vec::new()),
        });
        self
    }

    /// Add a child element named `name`, nesting further content via
    /// `build`.
    pub fn element(&mut self, name: &str, build: impl FnOnce(&mut ElementBuilder)) -> &mut Self {
        let mut child = ElementBuilder::new(self.next_id.clone(), Name::unprefixed(name));
        build(&mut child);
        self.children.push(child.finish());
        self
    }

    /// A convenience for `element(name, |e| { e.text(text); })`.
    pub fn child_text(&mut self, name: &str, text: impl Into<String>) -> &mut Self {
        self.element(name, |e| {
            e.text(text);
        })
    }

    fn finish(self) -> NodeData {
        let attributes: Vec<Node> = self
            .attributes
            .into_iter()
            .map(|(id, name, value)| {
                Node(Rc::new(NodeData {
                    id,
                    kind: NodeKind::Attribute,
                    name: Some(name),
                    value,
                    target: None,
                    parent: RefCell::new(Weak::new()),
                    document: RefCell::new(Weak::new()),
                    children: RefCell::new(Vec::new()),
                    attributes: RefCell::new(Vec::new()),
                }))
            })
            .collect();
        let children: Vec<Node> = self.children.into_iter().map(|data| Node(Rc::new(data))).collect();
        NodeData {
            id: self.id,
            kind: self.kind,
            name: self.name,
            value: self.value,
            target: self.target,
            parent: RefCell::new(Weak::new()),
            document: RefCell::new(Weak::new()),
            children: RefCell::new(children),
            attributes: RefCell::new(attributes),
        }
    }
}
