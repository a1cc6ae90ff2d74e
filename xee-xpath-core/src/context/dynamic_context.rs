//! The dynamic context (spec §3 "Evaluation context (dynamic)"):
//! per-evaluation state threaded through the evaluator. Child contexts
//! created for predicates and FLWOR bindings copy the scalar fields and
//! share the variable/static-context references (spec §5: "no mutation
//! of the parent").

use std::rc::Rc;

use ahash::HashMap;
use chrono::{FixedOffset, NaiveDateTime};

use xee_name::{Name, Namespaces};
use xee_xpath_lexer::XPathVersion;

use crate::context::StaticContext;
use crate::error::Error;
use crate::item::Item;
use crate::node::XmlNode;
use crate::sequence::Sequence;

/// A host-registered extension function implementation: the dynamic
/// counterpart of a [`crate::context::FunctionSignature`] entered into
/// the static context via `StaticContextBuilder::extension_function`
/// (spec §3 "function implementations (name -> callable)").
pub type FunctionImpl<N> = Rc<dyn Fn(Vec<Sequence<N>>, &DynamicContext<N>) -> Result<Sequence<N>, Error>>;

/// Per-evaluation dynamic state (spec §3). `N` is the host's node type.
#[derive(Clone)]
pub struct DynamicContext<N: XmlNode> {
    pub static_context: Rc<StaticContext>,
    pub context_item: Option<Item<N>>,
    pub context_position: usize,
    pub context_size: usize,
    pub variables: Rc<HashMap<Name, Sequence<N>>>,
    pub namespaces: Rc<Namespaces>,
    pub version: XPathVersion,
    pub xpath10_compatibility_mode: bool,
    pub default_collation: String,
    pub base_uri: Option<String>,
    pub implicit_timezone: FixedOffset,
    pub current_date_time: NaiveDateTime,
    /// Documents available to `fn:doc`/`fn:collection`, keyed by URI.
    /// I/O itself is out of scope (spec §1); a host populates this map
    /// ahead of evaluation with whatever it has already loaded.
    pub documents: Rc<HashMap<String, N>>,
    pub default_collection_uri: Option<String>,
    /// Host extension data, keyed by name. A full typed extension bag
    /// would need a host-supplied trait object registry; this engine's
    /// own tests and facade never need more than string configuration,
    /// so a string map stands in — see DESIGN.md.
    pub extensions: Rc<HashMap<String, String>>,
    /// Host-registered extension function implementations, keyed by
    /// expanded name. Looked up by the evaluator once a call's name
    /// resolves to neither a constructor nor a `fn:*` builtin.
    pub functions: Rc<HashMap<Name, FunctionImpl<N>>>,
}

impl<N: XmlNode> std::fmt::Debug for DynamicContext<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicContext")
            .field("context_item", &self.context_item)
            .field("context_position", &self.context_position)
            .field("context_size", &self.context_size)
            .field("variables", &self.variables)
            .field("version", &self.version)
            .field("xpath10_compatibility_mode", &self.xpath10_compatibility_mode)
            .field("default_collation", &self.default_collation)
            .field("base_uri", &self.base_uri)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<N: XmlNode> DynamicContext<N> {
    /// A fresh top-level context: no context item bound, position/size
    /// both 0 (spec §4.7 "missing context component" -> `XPDY0002` on
    /// reference), default collation taken from the static context.
    pub fn new(static_context: Rc<StaticContext>) -> Self {
        let default_collation = static_context.default_collation.clone();
        let version = static_context.version;
        let xpath10_compatibility_mode = static_context.xpath10_compatibility_mode;
        let namespaces = Rc::new(static_context.namespaces.clone());
        DynamicContext {
            static_context,
            context_item: None,
            context_position: 0,
            context_size: 0,
            variables: Rc::new(HashMap::default()),
            namespaces,
            version,
            xpath10_compatibility_mode,
            default_collation,
            base_uri: None,
            implicit_timezone: FixedOffset::east_opt(0).unwrap(),
            current_date_time: chrono::Local::now().naive_local(),
            documents: Rc::new(HashMap::default()),
            default_collection_uri: None,
            extensions: Rc::new(HashMap::default()),
            functions: Rc::new(HashMap::default()),
        }
    }

    /// A child context with a new context item/position/size (spec §4.7
    /// "Predicate", "apply-step"): everything else is shared unchanged.
    pub fn with_context_item(&self, item: Item<N>, position: usize, size: usize) -> Self {
        DynamicContext {
            static_context: self.static_context.clone(),
            context_item: Some(item),
            context_position: position,
            context_size: size,
            variables: self.variables.clone(),
            namespaces: self.namespaces.clone(),
            version: self.version,
            xpath10_compatibility_mode: self.xpath10_compatibility_mode,
            default_collation: self.default_collation.clone(),
            base_uri: self.base_uri.clone(),
            implicit_timezone: self.implicit_timezone,
            current_date_time: self.current_date_time,
            documents: self.documents.clone(),
            default_collection_uri: self.default_collection_uri.clone(),
            extensions: self.extensions.clone(),
            functions: self.functions.clone(),
        }
    }

    /// A child context with a host function registered under `name`.
    pub fn with_function(&self, name: Name, implementation: FunctionImpl<N>) -> Self {
        let mut functions = (*self.functions).clone();
        functions.insert(name, implementation);
        DynamicContext {
            functions: Rc::new(functions),
            ..self.clone()
        }
    }

    /// A child context binding one additional variable (spec §4.7
    /// FLWOR `for`/`let`, quantified expressions): the parent's bindings
    /// remain visible (copy-on-write via a fresh map that still shares
    /// the underlying `Sequence` values).
    pub fn with_variable(&self, name: Name, value: Sequence<N>) -> Self {
        let mut variables = (*self.variables).clone();
        variables.insert(name, value);
        DynamicContext {
            variables: Rc::new(variables),
            ..self.clone()
        }
    }

    /// The bound value of `name`, if any.
    pub fn variable(&self, name: &Name) -> Option<&Sequence<N>> {
        self.variables.get(name)
    }
}
