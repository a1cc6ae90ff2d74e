use ibig::IBig;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use xee_schema_type::Xs;

pub use crate::operator::{BinaryOperator, UnaryOperator};
use crate::span::Spanned;
pub use xee_name::Name;

pub type ExprSingleS = Spanned<ExprSingle>;
pub type PrimaryExprS = Spanned<PrimaryExpr>;
pub type StepExprS = Spanned<StepExpr>;
pub type ExprS = Spanned<Expr>;
pub type NameS = Spanned<Name>;

/// A top-level parsed expression: a (possibly singleton) comma-separated
/// sequence constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr(pub Vec<ExprSingleS>);

/// The root of a parsed XPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath(pub ExprS);

/// A single expression not containing a top-level comma.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprSingle {
    Path(PathExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    InstanceOf(InstanceOfExpr),
    TreatAs(TreatAsExpr),
    CastableAs(CastableAsExpr),
    CastAs(CastAsExpr),
    SimpleMap(SimpleMapExpr),
    If(IfExpr),
    For(FlworExpr),
    Quantified(QuantifiedExpr),
    TryCatch(TryCatchExpr),
}

/// Supplement: the 3.0+ `try { } catch * { }` dynamic-error recovery
/// expression (named in spec §7 as "catchable by try/catch", not spelled
/// out as an AST node). The catch clause always binds `$err:code` and
/// `$err:description` in its body; this grammar only supports the
/// wildcard catch clause (`catch *`), not a list of named error tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchExpr {
    pub try_expr: Box<ExprS>,
    pub catch_expr: Box<ExprS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<ExprSingleS>,
    pub right: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceOfExpr {
    pub operand: Box<ExprSingleS>,
    pub sequence_type: SequenceType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreatAsExpr {
    pub operand: Box<ExprSingleS>,
    pub sequence_type: SequenceType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastableAsExpr {
    pub operand: Box<ExprSingleS>,
    pub single_type: SingleType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastAsExpr {
    pub operand: Box<ExprSingleS>,
    pub single_type: SingleType,
}

/// Supplement: the 3.0+ simple map operator `!`. Each stage is evaluated
/// with the context item bound to every item produced by the previous
/// stage, and results are concatenated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMapExpr {
    pub stages: Vec<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleType {
    pub name: NameS,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<ExprS>,
    pub then: Box<ExprSingleS>,
    pub else_: Box<ExprSingleS>,
}

/// A FLWOR expression: an ordered list of `for`/`let` clauses followed by
/// a `return` expression. `where` and `order by` clauses are not part of
/// this grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct FlworExpr {
    pub clauses: Vec<FlworClause>,
    pub return_expr: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlworClause {
    For(ForClause),
    Let(LetClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForClause {
    pub var_name: NameS,
    pub var_expr: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetClause {
    pub var_name: NameS,
    pub var_expr: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Quantifier {
    Some,
    Every,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantifiedExpr {
    pub quantifier: Quantifier,
    pub bindings: Vec<QuantifiedBinding>,
    pub satisfies_expr: Box<ExprSingleS>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantifiedBinding {
    pub var_name: NameS,
    pub var_expr: Box<ExprSingleS>,
}

/// A path expression: a leading `/`/`//` flag plus a list of steps.
/// A step list of length one with no leading slash degenerates to a
/// bare primary/filter expression, e.g. `1 + 2` or `f()`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub rooted: Rootedness,
    pub steps: Vec<StepExprS>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rootedness {
    /// No leading slash: a relative path (or a single non-path primary).
    Relative,
    /// `/`: absolute, from the document root.
    Absolute,
    /// `//`: absolute, with an implicit `descendant-or-self::node()/`
    /// first step.
    AbsoluteDescendant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepExpr {
    /// A primary expression, optionally followed by predicates
    /// (`(1, 2, 3)[. > 1]`, `f()[1]`).
    PostfixExpr {
        primary: PrimaryExprS,
        predicates: Vec<ExprS>,
    },
    /// An axis step: `axis::test`, possibly abbreviated, with predicates.
    AxisStep(AxisStep),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisStep {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<ExprS>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    Self_,
}

impl Axis {
    /// Reverse axes number predicate positions from the end of the
    /// candidate sequence (document order reversed); forward axes number
    /// from the start.
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::Parent
                | Axis::Preceding
                | Axis::PrecedingSibling
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    KindTest(xee_xpath_type::KindTest),
    NameTest(NameTest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameTest {
    Name(NameS),
    Star,
    LocalName(String),
    Namespace(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryExpr {
    Literal(Literal),
    VarRef(Name),
    /// A parenthesized expression; `()` parses as an empty sequence
    /// constructor (zero elements).
    Parenthesized(ExprS),
    ContextItem,
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(IBig),
    Decimal(Decimal),
    Double(OrderedFloat<f64>),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: NameS,
    pub arguments: Vec<ExprSingleS>,
}

pub use xee_xpath_type::{ItemType, Occurrence, SequenceType};
