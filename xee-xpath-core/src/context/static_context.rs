//! The static context (spec §3 "Static context"): everything the parser
//! and evaluator consult before/independent of a specific dynamic
//! context — schema types, function signatures, reserved names,
//! collations, variable types, default namespaces.

use ahash::HashMap;

use xee_name::{reserved, Name, Namespaces};
use xee_xpath_lexer::XPathVersion;
use xee_xpath_type::SequenceType;

use crate::error::Error;
use crate::function::builtin_signatures;

/// A function signature: arity bounds and a declared return type. Used
/// both for static arity checking (`XPST0017`) and, once a full
/// parameter-type table is warranted, argument coercion.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub min_args: usize,
    pub max_args: Option<usize>,
    pub return_type: SequenceType,
}

impl FunctionSignature {
    pub fn new(min_args: usize, max_args: Option<usize>, return_type: SequenceType) -> Self {
        FunctionSignature {
            min_args,
            max_args,
            return_type,
        }
    }

    /// Whether `n` arguments satisfies `minArgs <= n <= maxArgs` (spec §3
    /// invariant: `maxArgs >= minArgs >= 0`; `maxArgs = None` is ∞).
    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min_args && self.max_args.map_or(true, |max| n <= max)
    }
}

/// The static context: consulted by the parser (arity/reserved-name
/// checks, type lookups) and by the evaluator (default collation,
/// declared variable types where available).
#[derive(Debug, Clone)]
pub struct StaticContext {
    pub namespaces: Namespaces,
    pub variable_types: HashMap<Name, SequenceType>,
    pub function_signatures: HashMap<Name, FunctionSignature>,
    pub collations: Vec<String>,
    pub default_collation: String,
    pub version: XPathVersion,
    pub enable_namespace_axis: bool,
    pub xpath10_compatibility_mode: bool,
    pub context_item_type: Option<SequenceType>,
}

impl StaticContext {
    /// A signature table containing only the built-in function set,
    /// default namespaces, and the codepoint collation.
    pub fn with_builtins(version: XPathVersion) -> Self {
        StaticContextBuilder::new(version).build()
    }

    /// Look up a function's signature, checking both existence and
    /// arity (`XPST0017` for either failure per spec §4.8).
    pub fn lookup_function(&self, name: &Name, arity: usize) -> Result<&FunctionSignature, Error> {
        let signature = self
            .function_signatures
            .get(name)
            .ok_or(Error::XPST0017)?;
        if !signature.accepts_arity(arity) {
            return Err(Error::XPST0017);
        }
        Ok(signature)
    }

    /// Whether `collation` is usable (in-scope), per `FOCH0002` at
    /// call sites that take an explicit collation argument.
    pub fn supports_collation(&self, collation: &str) -> bool {
        self.collations.iter().any(|c| c == collation)
    }
}

/// Builds a [`StaticContext`], enforcing the spec's invariant that the
/// default collation is always a member of the in-scope collation list
/// (adding it automatically rather than rejecting a builder that forgot
/// to list it — there is exactly one sensible repair, so `build` never
/// fails).
pub struct StaticContextBuilder {
    namespaces: Namespaces,
    variable_types: HashMap<Name, SequenceType>,
    function_signatures: HashMap<Name, FunctionSignature>,
    collations: Vec<String>,
    default_collation: String,
    version: XPathVersion,
    enable_namespace_axis: bool,
    xpath10_compatibility_mode: bool,
    context_item_type: Option<SequenceType>,
}

impl StaticContextBuilder {
    pub fn new(version: XPathVersion) -> Self {
        StaticContextBuilder {
            namespaces: Namespaces::default(),
            variable_types: HashMap::default(),
            function_signatures: builtin_signatures(),
            collations: vec![reserved::DEFAULT_COLLATION_URI.to_string()],
            default_collation: reserved::DEFAULT_COLLATION_URI.to_string(),
            version,
            enable_namespace_axis: false,
            xpath10_compatibility_mode: false,
            context_item_type: None,
        }
    }

    pub fn namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn variable_type(mut self, name: Name, sequence_type: SequenceType) -> Self {
        self.variable_types.insert(name, sequence_type);
        self
    }

    /// Register an extension function. Fails with `XPST0017` if the
    /// local name is reserved (spec §3 invariant: reserved names can
    /// never be rebound).
    pub fn extension_function(
        mut self,
        name: Name,
        signature: FunctionSignature,
    ) -> Result<Self, Error> {
        if reserved::is_reserved_function_name(name.local_name()) {
            return Err(Error::XPST0017);
        }
        self.function_signatures.insert(name, signature);
        Ok(self)
    }

    pub fn collation(mut self, uri: impl Into<String>) -> Self {
        self.collations.push(uri.into());
        self
    }

    pub fn default_collation(mut self, uri: impl Into<String>) -> Self {
        self.default_collation = uri.into();
        self
    }

    pub fn enable_namespace_axis(mut self, enable: bool) -> Self {
        self.enable_namespace_axis = enable;
        self
    }

    pub fn xpath10_compatibility_mode(mut self, enable: bool) -> Self {
        self.xpath10_compatibility_mode = enable;
        self
    }

    pub fn context_item_type(mut self, sequence_type: SequenceType) -> Self {
        self.context_item_type = Some(sequence_type);
        self
    }

    pub fn build(mut self) -> StaticContext {
        if !self.collations.iter().any(|c| c == &self.default_collation) {
            self.collations.push(self.default_collation.clone());
        }
        StaticContext {
            namespaces: self.namespaces,
            variable_types: self.variable_types,
            function_signatures: self.function_signatures,
            collations: self.collations,
            default_collation: self.default_collation,
            version: self.version,
            enable_namespace_axis: self.enable_namespace_axis,
            xpath10_compatibility_mode: self.xpath10_compatibility_mode,
            context_item_type: self.context_item_type,
        }
    }
}
