#![warn(missing_docs)]

//! The hand-written recursive-descent XPath parser and its abstract
//! syntax tree.
//!
//! [`parse_xpath`] is the single entry point: it runs the lexer
//! (`xee-xpath-lexer`), then drives a `Parser` through the precedence
//! chain `Expr -> OrExpr -> AndExpr -> ComparisonExpr -> RangeExpr ->
//! AdditiveExpr -> MultiplicativeExpr -> UnaryExpr -> (instance
//! of/treat as/castable as/cast as) -> SimpleMapExpr -> UnionExpr ->
//! PathExpr -> StepExpr -> PrimaryExpr`. There is no intermediate
//! concrete-syntax tree or combinator grammar: each precedence level is
//! one function, and each function either consumes tokens directly or
//! delegates to the level below it.

mod ast;
mod error;
mod operator;
mod parser;
mod span;

pub use ast::*;
pub use error::ParserError;
pub use operator::{BinaryOperator, UnaryOperator};
pub use parser::parse_xpath;
pub use span::{Span, Spanned};

#[cfg(test)]
mod tests {
    use super::*;
    use xee_name::Namespaces;
    use xee_xpath_lexer::XPathVersion;

    fn parse(source: &str) -> XPath {
        let namespaces = Namespaces::default();
        parse_xpath(source, &namespaces, XPathVersion::V3_1).unwrap()
    }

    fn parse_single(source: &str) -> ExprSingle {
        let xpath = parse(source);
        assert_eq!(xpath.0.value.0.len(), 1);
        xpath.0.value.0.into_iter().next().unwrap().value
    }

    #[test]
    fn parses_integer_literal() {
        match parse_single("42") {
            ExprSingle::Path(path) => {
                assert_eq!(path.steps.len(), 1);
                assert_eq!(path.rooted, Rootedness::Relative);
            }
            other => panic!("expected a path expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_arithmetic_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3).
        match parse_single("1 + 2 * 3") {
            ExprSingle::Binary(BinaryExpr {
                operator: BinaryOperator::Add,
                right,
                ..
            }) => match right.value {
                ExprSingle::Binary(BinaryExpr {
                    operator: BinaryOperator::Mul,
                    ..
                }) => {}
                other => panic!("expected a multiplication on the right, got {other:?}"),
            },
            other => panic!("expected an addition, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_instance_of() {
        // `-1 instance of xs:integer` is `(-1) instance of xs:integer`.
        match parse_single("-1 instance of xs:integer") {
            ExprSingle::InstanceOf(InstanceOfExpr { operand, .. }) => match operand.value {
                ExprSingle::Unary(UnaryExpr {
                    operator: UnaryOperator::Minus,
                    ..
                }) => {}
                other => panic!("expected a unary minus, got {other:?}"),
            },
            other => panic!("expected instance-of, got {other:?}"),
        }
    }

    #[test]
    fn parses_abbreviated_path() {
        let path = match parse_single("//a/b[1]") {
            ExprSingle::Path(path) => path,
            other => panic!("expected a path, got {other:?}"),
        };
        assert_eq!(path.rooted, Rootedness::AbsoluteDescendant);
        // descendant-or-self::node(), a, b[1]
        assert_eq!(path.steps.len(), 3);
    }

    #[test]
    fn parses_context_item_predicate() {
        match parse_single("(1, 2, 3)[. > 1]") {
            ExprSingle::Path(path) => {
                assert_eq!(path.steps.len(), 1);
            }
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn parses_flwor_with_multiple_for_clauses() {
        match parse_single("for $x in (1, 2), $y in (3, 4) return $x") {
            ExprSingle::For(flwor) => assert_eq!(flwor.clauses.len(), 2),
            other => panic!("expected a FLWOR expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_quantified_expression() {
        match parse_single("some $x in (1, 2) satisfies $x = 1") {
            ExprSingle::Quantified(q) => {
                assert_eq!(q.quantifier, Quantifier::Some);
                assert_eq!(q.bindings.len(), 1);
            }
            other => panic!("expected a quantified expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_then_else() {
        match parse_single("if (true()) then 1 else 2") {
            ExprSingle::If(_) => {}
            other => panic!("expected an if expression, got {other:?}"),
        }
    }

    #[test]
    fn simple_map_is_xpath3_only() {
        let namespaces = Namespaces::default();
        let result = parse_xpath("(1, 2, 3) ! .", &namespaces, XPathVersion::V2_0);
        assert!(result.is_err());
    }

    #[test]
    fn simple_map_chains_under_xpath3() {
        match parse_single("(1, 2, 3) ! (. + 1)") {
            ExprSingle::SimpleMap(map) => assert_eq!(map.stages.len(), 2),
            other => panic!("expected a simple map expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_try_catch() {
        match parse_single("try { 1 div 0 } catch * { 0 }") {
            ExprSingle::TryCatch(_) => {}
            other => panic!("expected a try/catch expression, got {other:?}"),
        }
    }

    #[test]
    fn try_catch_is_xpath3_only() {
        let namespaces = Namespaces::default();
        let result = parse_xpath("try { 1 } catch * { 0 }", &namespaces, XPathVersion::V2_0);
        assert!(result.is_err());
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let namespaces = Namespaces::default();
        let err = parse_xpath("1 2", &namespaces, XPathVersion::V3_1).unwrap_err();
        assert!(matches!(err, ParserError::TrailingTokens { .. }));
    }

    #[test]
    fn unbound_prefix_is_an_error() {
        let namespaces = Namespaces::default();
        let err = parse_xpath("nope:foo", &namespaces, XPathVersion::V3_1).unwrap_err();
        assert!(matches!(err, ParserError::UnknownPrefix { .. }));
    }

    #[test]
    fn unknown_atomic_type_is_an_error() {
        // Sequence-type positions (`instance of`, `treat as`) resolve the
        // named type eagerly; `cast as`/`castable as` defer to the single
        // type's later binding against the static context (see DESIGN.md).
        let namespaces = Namespaces::default();
        let err =
            parse_xpath("1 instance of xs:nonesuch", &namespaces, XPathVersion::V3_1).unwrap_err();
        assert!(matches!(err, ParserError::UnknownType { .. }));
    }

    #[test]
    fn kind_test_with_wildcard_name() {
        match parse_single("element(*, xs:integer)") {
            ExprSingle::Path(path) => match &path.steps[0].value {
                StepExpr::AxisStep(step) => assert_eq!(step.axis, Axis::Child),
                other => panic!("expected an axis step, got {other:?}"),
            },
            other => panic!("expected a path, got {other:?}"),
        }
    }
}
