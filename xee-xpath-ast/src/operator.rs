/// A binary operator and the left/right operands it connects. The same
/// variant space covers logical, comparison, arithmetic, set, and node
/// operators; only the operator tag varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // logical
    Or,
    And,
    // value comparison (2.0+)
    ValueEq,
    ValueNe,
    ValueLt,
    ValueLe,
    ValueGt,
    ValueGe,
    // general comparison
    GenEq,
    GenNe,
    GenLt,
    GenLe,
    GenGt,
    GenGe,
    // range
    Range,
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    // set
    Union,
}

/// A prefix operator applied to a single operand (`UnaryExpr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}
