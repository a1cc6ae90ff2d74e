use strum::EnumMessage;
use strum_macros::{Display, EnumMessage};

use crate::span::SourceSpan;

/// An error code paired with the source span it was raised for, if any.
/// Errors raised purely during evaluation (no parse-time span available,
/// e.g. a built-in function failure) carry `span: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError {
    /// The error code.
    pub error: Error,
    /// The source span where the error occurred, if known.
    pub span: Option<SourceSpan>,
}

/// The closed XPath/XQuery error taxonomy (spec §1, §7): every failure
/// this engine can raise carries one of these codes. `EnumMessage` turns
/// each variant's doc comment into the human-readable message retrievable
/// at runtime via [`Error::message`], so the explanatory text lives next
/// to the code instead of in a separate match arm.
#[derive(Debug, Clone, PartialEq, Display, EnumMessage)]
pub enum Error {
    // --- static errors (XPST*, XQST*): detected before evaluation -------
    /// Component absent in static context.
    ///
    /// Analysis of an expression relies on some component of the static
    /// context that is absent.
    XPST0001,
    /// Parse error.
    ///
    /// The expression is not a valid instance of the XPath grammar.
    XPST0003,
    /// Empty-sequence type error.
    ///
    /// The static type assigned to an expression other than `()` or
    /// `data(())` is `empty-sequence()`.
    XPST0005,
    /// Name not defined.
    ///
    /// The expression refers to a variable, schema type, or namespace
    /// prefix not defined in the static context.
    XPST0008,
    /// Namespace axis not supported.
    ///
    /// The deprecated `namespace::` axis was used without
    /// `enableNamespaceAxis` set.
    XPST0010,
    /// Incorrect function name or arity.
    ///
    /// The expanded QName and number of arguments in a static function
    /// call do not match any known function signature, or the call
    /// targets a reserved name.
    XPST0017,
    /// Undefined type reference.
    ///
    /// The expanded QName for a type used in a `SequenceType` is not a
    /// known atomic type.
    XPST0051,
    /// Invalid target type for cast/castable.
    ///
    /// The target type of a `cast as`/`castable as` expression is
    /// `xs:NOTATION`, `xs:anySimpleType`, or `xs:anyAtomicType`.
    XPST0080,
    /// Unknown namespace prefix.
    ///
    /// A QName used in an expression has a prefix with no bound
    /// namespace URI in the static context.
    XPST0081,
    /// Duplicate parameter name.
    ///
    /// An inline function expression declares more than one parameter
    /// with the same name.
    XQST0039,

    // --- dynamic errors (XPDY*, FO*): detected during evaluation -------
    /// Component absent in dynamic context.
    ///
    /// Evaluation relies on some part of the dynamic context (context
    /// item, variable binding, current date/time, ...) that is absent.
    XPDY0002,
    /// Non-rooted context for a leading `/`/`//` step.
    ///
    /// A path expression beginning with `/` or `//` was evaluated with a
    /// context item that is not in a tree rooted at a document node.
    XPDY0050,
    /// Implementation-dependent limit exceeded.
    XPDY0130,

    // --- type errors (XPTY*), a subclass of dynamic errors -------------
    /// Type error.
    ///
    /// The dynamic type of a value does not match a required type as
    /// specified by sequence-type matching.
    XPTY0004,
    /// Inconsistent path-step sequence.
    ///
    /// The result of a path operator contains both nodes and non-nodes.
    XPTY0018,
    /// Path operator applied to a non-node sequence.
    ///
    /// The left operand of a path expression `E1/E2` does not evaluate to
    /// a sequence of nodes.
    XPTY0019,
    /// Non-node context item in an axis step.
    ///
    /// The context item in an axis step is not a node.
    XPTY0020,
    /// Namespace-sensitive type expected.
    ///
    /// An `xs:untypedAtomic` value was supplied where a
    /// namespace-sensitive type (`xs:QName`, `xs:NOTATION`) is required.
    XPTY0117,

    // --- FO* function/operator errors -----------------------------------
    /// Division by zero.
    ///
    /// An attempt was made to divide by zero using integer or decimal
    /// operands.
    FOAR0001,
    /// Numeric operation overflow or underflow.
    FOAR0002,
    /// Value too large for `xs:decimal`.
    ///
    /// The supplied value exceeds the implementation-defined limits of
    /// `xs:decimal`.
    FOCA0001,
    /// Invalid lexical value for a numeric cast.
    FOCA0002,
    /// Value too large for `xs:integer`.
    ///
    /// The supplied value exceeds the implementation-defined limits of
    /// `xs:integer`.
    FOCA0003,
    /// Unsupported collation.
    ///
    /// A function that uses a collation was given a collation URI the
    /// static context does not recognize.
    FOCH0002,
    /// Overflow/underflow in date/time operation.
    FODT0001,
    /// Overflow/underflow in duration operation.
    FODT0002,
    /// Invalid timezone value.
    FODT0003,
    /// Unidentified error.
    ///
    /// The code used by `fn:error` when no other code is supplied.
    FOER0000,
    /// Invalid value for cast or constructor.
    ///
    /// A cast between two types is permitted in principle, but the
    /// supplied value cannot be converted (e.g. casting `"nine"` to
    /// `xs:integer`).
    FORG0001,
    /// `fn:zero-or-one` called with more than one item.
    FORG0003,
    /// `fn:one-or-more` called with an empty sequence.
    FORG0004,
    /// `fn:exactly-one` called with a non-singleton sequence.
    FORG0005,
    /// Invalid argument type.
    ///
    /// A function such as `fn:sum`/`fn:min`/`fn:max` was given a
    /// sequence containing an inappropriate value, or an effective
    /// boolean value could not be computed for the given sequence.
    FORG0006,
    /// Invalid regular expression flags.
    FORX0001,
    /// Invalid regular expression.
    FORX0002,
    /// Regular expression matches a zero-length string.
    FORX0003,
    /// Invalid replacement string.
    FORX0004,
    /// Node has no typed value.
    ///
    /// `fn:data`, or implicit atomization, was applied to a node with
    /// element-only content and so no typed value (strict/schema-aware
    /// mode).
    FOTY0012,
    /// Function item in `fn:data` argument.
    FOTY0013,
    /// Function item in `fn:string` argument.
    FOTY0014,
    /// Function item in `fn:deep-equal` argument.
    FOTY0015,
}

impl Error {
    /// Attach a source span, producing a [`SpannedError`].
    pub fn with_span(self, span: SourceSpan) -> SpannedError {
        SpannedError {
            error: self,
            span: Some(span),
        }
    }

    /// The W3C error code, e.g. `"XPST0003"`.
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// The qualified error name, `err:CODE`, per §7.
    pub fn qualified_name(&self) -> String {
        format!("err:{}", self.code())
    }

    /// A human-readable message describing the failure.
    pub fn message(&self) -> &str {
        self.documentation_pieces().0
    }

    fn documentation_pieces(&self) -> (&str, &str) {
        if let Some(documentation) = self.get_documentation() {
            let mut pieces = documentation.splitn(2, "\n\n");
            let first = pieces.next().unwrap_or("");
            let second = pieces.next().unwrap_or("");
            (first, second)
        } else {
            ("", "")
        }
    }

    /// Whether this is a static error (`XPST*`, `XQST*`): never catchable
    /// by `try`/`catch` because it is detected before evaluation begins.
    pub fn is_static(&self) -> bool {
        let code = self.code();
        code.starts_with("XPST") || code.starts_with("XQST")
    }

    /// Whether this is a dynamic error (including its `XPTY*` subclass):
    /// catchable by `try`/`catch` in versions that support it.
    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    /// Whether this is a type error, the `XPTY*` subclass of dynamic
    /// errors (§7).
    pub fn is_type_error(&self) -> bool {
        self.code().starts_with("XPTY")
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} ({}..{})", self.error, span.start, span.end),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for SpannedError {}

impl From<Error> for SpannedError {
    fn from(error: Error) -> Self {
        SpannedError { error, span: None }
    }
}

impl From<xee_xpath_ast::ParserError> for SpannedError {
    fn from(e: xee_xpath_ast::ParserError) -> Self {
        use xee_xpath_ast::ParserError;
        let span = e.span();
        let error = match e {
            ParserError::UnexpectedToken { .. } => Error::XPST0003,
            ParserError::LexError { .. } => Error::XPST0003,
            ParserError::UnknownPrefix { .. } => Error::XPST0081,
            ParserError::Reserved { .. } => Error::XPST0017,
            ParserError::ArityOverflow { .. } => Error::XPST0017,
            ParserError::UnknownType { .. } => Error::XPST0051,
            ParserError::TrailingTokens { .. } => Error::XPST0003,
        };
        SpannedError {
            error,
            span: Some(span.into()),
        }
    }
}

impl From<xee_xpath_ast::ParserError> for Error {
    fn from(e: xee_xpath_ast::ParserError) -> Self {
        SpannedError::from(e).error
    }
}

/// The result type for errors without a span.
pub type Result<T> = std::result::Result<T, Error>;
/// The result type for errors with an (optional) source span.
pub type SpannedResult<T> = std::result::Result<T, SpannedError>;
