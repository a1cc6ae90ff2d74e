//! The AST-walking evaluator (spec §4.7 "Evaluator"): one function per
//! `ExprSingle`/`PrimaryExpr` variant, dispatching on the already-parsed
//! AST against a [`DynamicContext`]. Path/axis evaluation is split out
//! into [`path`] since it is the one part of the grammar with its own
//! multi-step fold; everything else lives here.

mod path;

use std::str::FromStr;

use xee_name::{Name, FN_NAMESPACE, XS_NAMESPACE};
use xee_schema_type::Xs;
use xee_xpath_ast::{
    BinaryExpr, BinaryOperator, CastAsExpr, CastableAsExpr, Expr, ExprSingle, ExprSingleS, FlworClause,
    FlworExpr, FunctionCall, IfExpr, InstanceOfExpr, Literal, PrimaryExpr, QuantifiedExpr, Quantifier,
    SimpleMapExpr, SingleType, TreatAsExpr, TryCatchExpr, UnaryExpr, UnaryOperator,
};

use crate::atomic::{self, Atomic};
use crate::context::DynamicContext;
use crate::error::Error;
use crate::function;
use crate::item::Item;
use crate::matching;
use crate::node::XmlNode;
use crate::sequence::{self, Sequence};

/// Evaluate a full `Expr` (a comma-separated sequence constructor),
/// concatenating each comma-operand's result in order (spec §4.7
/// "Expr").
pub fn eval_expr<N: XmlNode>(expr: &Expr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let mut result = Sequence::empty();
    for expr_single in &expr.0 {
        result.extend(eval_expr_single(&expr_single.value, context)?);
    }
    Ok(result)
}

fn eval_expr_single<N: XmlNode>(
    expr: &ExprSingle,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match expr {
        ExprSingle::Path(path) => path::eval_path_expr(path, context),
        ExprSingle::Binary(binary) => eval_binary(binary, context),
        ExprSingle::Unary(unary) => eval_unary(unary, context),
        ExprSingle::InstanceOf(i) => eval_instance_of(i, context),
        ExprSingle::TreatAs(t) => eval_treat_as(t, context),
        ExprSingle::CastableAs(c) => eval_castable_as(c, context),
        ExprSingle::CastAs(c) => eval_cast_as(c, context),
        ExprSingle::SimpleMap(m) => eval_simple_map(m, context),
        ExprSingle::If(i) => eval_if(i, context),
        ExprSingle::For(f) => eval_flwor(f, context),
        ExprSingle::Quantified(q) => eval_quantified(q, context),
        ExprSingle::TryCatch(t) => eval_try_catch(t, context),
    }
}

/// Evaluate a `PrimaryExpr`: literals, variable references, parenthesized
/// sequence constructors, the context item, and function calls
/// (including `xs:T(...)` constructors, spec §4.3).
pub(super) fn eval_primary_expr<N: XmlNode>(
    primary: &PrimaryExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match primary {
        PrimaryExpr::Literal(literal) => Ok(Sequence::singleton(Item::Atomic(literal_to_atomic(literal)))),
        PrimaryExpr::VarRef(name) => context.variable(name).cloned().ok_or(Error::XPST0008),
        PrimaryExpr::Parenthesized(expr) => eval_expr(&expr.value, context),
        PrimaryExpr::ContextItem => {
            let item = context.context_item.clone().ok_or(Error::XPDY0002)?;
            Ok(Sequence::singleton(item))
        }
        PrimaryExpr::FunctionCall(call) => eval_function_call(call, context),
    }
}

fn literal_to_atomic(literal: &Literal) -> Atomic {
    match literal {
        Literal::Integer(i) => Atomic::integer(i.clone()),
        Literal::Decimal(d) => Atomic::Decimal(*d),
        Literal::Double(d) => Atomic::Double(*d),
        Literal::String(s) => Atomic::string(s.clone()),
    }
}

fn boolean_sequence<N: XmlNode>(value: bool) -> Sequence<N> {
    Sequence::singleton(Item::Atomic(Atomic::Boolean(value)))
}

// --- binary/unary operators ---------------------------------------------

fn eval_binary<N: XmlNode>(binary: &BinaryExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    use BinaryOperator::*;
    match binary.operator {
        Or => {
            if eval_expr_single(&binary.left.value, context)?.ebv()? {
                return Ok(boolean_sequence(true));
            }
            Ok(boolean_sequence(eval_expr_single(&binary.right.value, context)?.ebv()?))
        }
        And => {
            if !eval_expr_single(&binary.left.value, context)?.ebv()? {
                return Ok(boolean_sequence(false));
            }
            Ok(boolean_sequence(eval_expr_single(&binary.right.value, context)?.ebv()?))
        }
        GenEq | GenNe | GenLt | GenLe | GenGt | GenGe => {
            let left = eval_expr_single(&binary.left.value, context)?.atomize();
            let right = eval_expr_single(&binary.right.value, context)?.atomize();
            Ok(boolean_sequence(atomic::general_compare(binary.operator, &left, &right)?))
        }
        ValueEq | ValueNe | ValueLt | ValueLe | ValueGt | ValueGe => {
            let left = eval_expr_single(&binary.left.value, context)?;
            let right = eval_expr_single(&binary.right.value, context)?;
            if left.is_empty() || right.is_empty() {
                return Ok(Sequence::empty());
            }
            let left = sequence::atomize_item(left.as_singleton()?);
            let right = sequence::atomize_item(right.as_singleton()?);
            Ok(boolean_sequence(atomic::value_compare(binary.operator, &left, &right)?))
        }
        Range => eval_range(binary, context),
        Add | Sub | Mul | Div | IntDiv | Mod => {
            let left = eval_expr_single(&binary.left.value, context)?;
            let right = eval_expr_single(&binary.right.value, context)?;
            if left.is_empty() || right.is_empty() {
                return Ok(Sequence::empty());
            }
            let left = sequence::atomize_item(left.as_singleton()?);
            let right = sequence::atomize_item(right.as_singleton()?);
            Ok(Sequence::singleton(Item::Atomic(atomic::arithmetic(
                binary.operator,
                &left,
                &right,
            )?)))
        }
        Union => {
            let left = eval_expr_single(&binary.left.value, context)?;
            let right = eval_expr_single(&binary.right.value, context)?;
            let mut result = Sequence::empty();
            for item in left.into_items().into_iter().chain(right.into_items()) {
                if !item.is_node() {
                    return Err(Error::XPTY0004);
                }
                result.push(item);
            }
            Ok(result.into_document_order())
        }
    }
}

/// `E1 to E2` (spec §4.7 "Range"): both operands atomize to a singleton
/// `xs:integer`; an empty operand yields the empty sequence; a lower
/// bound above the upper bound yields the empty sequence rather than an
/// error.
fn eval_range<N: XmlNode>(binary: &BinaryExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let left = eval_expr_single(&binary.left.value, context)?;
    let right = eval_expr_single(&binary.right.value, context)?;
    if left.is_empty() || right.is_empty() {
        return Ok(Sequence::empty());
    }
    let lo = as_range_bound(&sequence::atomize_item(left.as_singleton()?))?;
    let hi = as_range_bound(&sequence::atomize_item(right.as_singleton()?))?;
    let mut result = Sequence::empty();
    let mut i = lo;
    while i <= hi {
        result.push(Item::Atomic(Atomic::integer(i)));
        i += 1;
    }
    Ok(result)
}

fn as_range_bound(value: &Atomic) -> Result<i64, Error> {
    match value {
        Atomic::Integer { value, .. } => value.to_string().parse().map_err(|_| Error::FOAR0002),
        _ => Err(Error::XPTY0004),
    }
}

fn eval_unary<N: XmlNode>(unary: &UnaryExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let operand = eval_expr_single(&unary.operand.value, context)?;
    if operand.is_empty() {
        return Ok(Sequence::empty());
    }
    let value = atomic::untyped_to_double(&sequence::atomize_item(operand.as_singleton()?))?;
    if !value.is_numeric() {
        return Err(Error::XPTY0004);
    }
    let result = match unary.operator {
        UnaryOperator::Plus => value,
        UnaryOperator::Minus => negate(&value)?,
    };
    Ok(Sequence::singleton(Item::Atomic(result)))
}

fn negate(value: &Atomic) -> Result<Atomic, Error> {
    Ok(match value {
        Atomic::Integer { xs, value } => Atomic::Integer {
            xs: *xs,
            value: -value.clone(),
        },
        Atomic::Decimal(d) => Atomic::Decimal(-*d),
        Atomic::Float(f) => Atomic::Float(ordered_float::OrderedFloat(-f.0)),
        Atomic::Double(d) => Atomic::Double(ordered_float::OrderedFloat(-d.0)),
        _ => return Err(Error::XPTY0004),
    })
}

// --- sequence-type expressions ------------------------------------------

fn eval_instance_of<N: XmlNode>(
    expr: &InstanceOfExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let value = eval_expr_single(&expr.operand.value, context)?;
    Ok(boolean_sequence(matching::sequence_matches(&value, &expr.sequence_type)))
}

fn eval_treat_as<N: XmlNode>(expr: &TreatAsExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let value = eval_expr_single(&expr.operand.value, context)?;
    if matching::sequence_matches(&value, &expr.sequence_type) {
        Ok(value)
    } else {
        Err(Error::XPTY0004)
    }
}

/// Resolve a `cast as`/`castable as` single type's name to an [`Xs`]
/// (deferred from parse time, spec §4.3: unlike `instance of`/`treat
/// as`'s sequence types, the parser leaves this name unresolved — see
/// DESIGN.md).
fn resolve_single_type(single_type: &SingleType) -> Result<Xs, Error> {
    Xs::by_name(single_type.name.value.namespace(), single_type.name.value.local_name()).ok_or(Error::XPST0051)
}

fn eval_castable_as<N: XmlNode>(
    expr: &CastableAsExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let target = resolve_single_type(&expr.single_type)?;
    let value = eval_expr_single(&expr.operand.value, context)?;
    if value.is_empty() {
        return Ok(boolean_sequence(expr.single_type.optional));
    }
    let item = match value.as_singleton() {
        Ok(item) => item,
        Err(_) => return Ok(boolean_sequence(false)),
    };
    let atomic = sequence::atomize_item(item);
    Ok(boolean_sequence(atomic::castable(&atomic, target)))
}

fn eval_cast_as<N: XmlNode>(expr: &CastAsExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let target = resolve_single_type(&expr.single_type)?;
    let value = eval_expr_single(&expr.operand.value, context)?;
    if value.is_empty() {
        return if expr.single_type.optional {
            Ok(Sequence::empty())
        } else {
            Err(Error::XPTY0004)
        };
    }
    let item = value.as_singleton()?;
    let atomic = sequence::atomize_item(item);
    Ok(Sequence::singleton(Item::Atomic(atomic::cast(&atomic, target)?)))
}

// --- simple map (supplement, spec §7/SPEC_FULL §3) -----------------------

fn eval_simple_map<N: XmlNode>(
    map: &SimpleMapExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let (first, rest) = map.stages.split_first().expect("a simple map has at least one stage");
    let mut current = eval_expr_single(&first.value, context)?;
    for stage in rest {
        let mut next = Sequence::empty();
        let size = current.len();
        for (i, item) in current.into_items().into_iter().enumerate() {
            let child_context = context.with_context_item(item, i + 1, size);
            next.extend(eval_expr_single(&stage.value, &child_context)?);
        }
        current = next;
    }
    Ok(current)
}

// --- conditional, FLWOR, quantified --------------------------------------

fn eval_if<N: XmlNode>(expr: &IfExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    if eval_expr(&expr.condition.value, context)?.ebv()? {
        eval_expr_single(&expr.then.value, context)
    } else {
        eval_expr_single(&expr.else_.value, context)
    }
}

fn eval_flwor<N: XmlNode>(flwor: &FlworExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    eval_flwor_clauses(flwor, 0, context)
}

/// Walks the `for`/`let` clauses left to right, recursing once per
/// binding so a `for` clause's iteration naturally produces the
/// Cartesian product of every clause that precedes the `return` (spec
/// §4.7's FLWOR supplement, SPEC_FULL §3).
fn eval_flwor_clauses<N: XmlNode>(
    flwor: &FlworExpr,
    index: usize,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match flwor.clauses.get(index) {
        None => eval_expr_single(&flwor.return_expr.value, context),
        Some(FlworClause::For(for_clause)) => {
            let bound = eval_expr_single(&for_clause.var_expr.value, context)?;
            let mut result = Sequence::empty();
            for item in bound.into_items() {
                let child_context = context.with_variable(for_clause.var_name.value.clone(), Sequence::singleton(item));
                result.extend(eval_flwor_clauses(flwor, index + 1, &child_context)?);
            }
            Ok(result)
        }
        Some(FlworClause::Let(let_clause)) => {
            let bound = eval_expr_single(&let_clause.var_expr.value, context)?;
            let child_context = context.with_variable(let_clause.var_name.value.clone(), bound);
            eval_flwor_clauses(flwor, index + 1, &child_context)
        }
    }
}

fn eval_quantified<N: XmlNode>(
    expr: &QuantifiedExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    Ok(boolean_sequence(eval_quantified_bindings(expr, 0, context)?))
}

fn eval_quantified_bindings<N: XmlNode>(
    expr: &QuantifiedExpr,
    index: usize,
    context: &DynamicContext<N>,
) -> Result<bool, Error> {
    let Some(binding) = expr.bindings.get(index) else {
        return eval_expr_single(&expr.satisfies_expr.value, context)?.ebv();
    };
    let bound = eval_expr_single(&binding.var_expr.value, context)?;
    for item in bound.into_items() {
        let child_context = context.with_variable(binding.var_name.value.clone(), Sequence::singleton(item));
        let satisfied = eval_quantified_bindings(expr, index + 1, &child_context)?;
        match expr.quantifier {
            Quantifier::Some if satisfied => return Ok(true),
            Quantifier::Every if !satisfied => return Ok(false),
            _ => {}
        }
    }
    Ok(expr.quantifier == Quantifier::Every)
}

// --- try/catch (supplement, spec §7/SPEC_FULL §3) -------------------------

fn eval_try_catch<N: XmlNode>(
    expr: &TryCatchExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match eval_expr(&expr.try_expr.value, context) {
        Ok(sequence) => Ok(sequence),
        Err(error) if error.is_dynamic() => {
            let code_name = Name::new("code", Some(xee_name::ERR_NAMESPACE.to_string()), Some("err".to_string()));
            let description_name =
                Name::new("description", Some(xee_name::ERR_NAMESPACE.to_string()), Some("err".to_string()));
            let code_atomic = Atomic::QName(Name::new(error.code(), Some(xee_name::ERR_NAMESPACE.to_string()), Some("err".to_string())));
            let child_context = context
                .with_variable(code_name, Sequence::singleton(Item::Atomic(code_atomic)))
                .with_variable(
                    description_name,
                    Sequence::singleton(Item::Atomic(Atomic::string(error.message().to_string()))),
                );
            eval_expr(&expr.catch_expr.value, &child_context)
        }
        // Static errors are never catchable (spec §7): they propagate.
        Err(error) => Err(error),
    }
}

// --- function calls -------------------------------------------------------

fn eval_function_call<N: XmlNode>(
    call: &FunctionCall,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let raw_name = &call.name.value;
    if raw_name.namespace() == Some(XS_NAMESPACE) {
        return eval_constructor_call(raw_name, call, context);
    }
    // An unprefixed call resolves against the default function namespace
    // (spec §3); this engine's default function namespace is always
    // `fn`, so any unqualified name is looked up there.
    let name = if raw_name.namespace().is_none() {
        raw_name.clone().with_default_namespace(Some(FN_NAMESPACE))
    } else {
        raw_name.clone()
    };

    let signature = context.static_context.lookup_function(&name, call.arguments.len())?;
    let _ = signature;
    let args = call
        .arguments
        .iter()
        .map(|arg| eval_expr_single(&arg.value, context))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(implementation) = context.functions.get(&name) {
        return implementation(args, context);
    }
    function::call_builtin(&name, args, context)
}

/// `xs:T(arg)`: an atomic type constructor call (spec §4.3). Atomizes
/// its single argument and casts it to `T`; an empty argument yields the
/// empty sequence, never an error (constructor calls are always
/// single-argument, so there is no arity table entry to consult).
fn eval_constructor_call<N: XmlNode>(
    name: &Name,
    call: &FunctionCall,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    if call.arguments.len() != 1 {
        return Err(Error::XPST0017);
    }
    let target = Xs::by_name(name.namespace(), name.local_name()).ok_or(Error::XPST0017)?;
    let argument = eval_expr_single(&call.arguments[0].value, context)?;
    if argument.is_empty() {
        return Ok(Sequence::empty());
    }
    let atomic = sequence::atomize_item(argument.as_singleton()?);
    Ok(Sequence::singleton(Item::Atomic(atomic::cast(&atomic, target)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticContext;
    use std::rc::Rc;
    use xee_xpath_ast::parse_xpath;
    use xee_xpath_lexer::XPathVersion;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct NoNode;

    impl XmlNode for NoNode {
        fn node_kind(&self) -> xee_xpath_type::NodeKind {
            unreachable!("tests never touch nodes")
        }
        fn node_name(&self) -> Option<Name> {
            None
        }
        fn text_content(&self) -> String {
            String::new()
        }
        fn parent(&self) -> Option<Self> {
            None
        }
        fn children(&self) -> Vec<Self> {
            Vec::new()
        }
        fn next_sibling(&self) -> Option<Self> {
            None
        }
        fn previous_sibling(&self) -> Option<Self> {
            None
        }
        fn owner_document(&self) -> Self {
            NoNode
        }
        fn compare_document_position(&self, _other: &Self) -> crate::node::DocumentPosition {
            crate::node::DocumentPosition::Same
        }
    }

    fn eval(source: &str) -> Result<Sequence<NoNode>, Error> {
        let namespaces = xee_name::Namespaces::default();
        let xpath = parse_xpath(source, &namespaces, XPathVersion::V3_1).unwrap();
        let static_context = Rc::new(StaticContext::with_builtins(XPathVersion::V3_1));
        let context = DynamicContext::new(static_context);
        eval_expr(&xpath.0.value, &context)
    }

    fn eval_integer(source: &str) -> i64 {
        let result = eval(source).unwrap();
        match result.as_singleton().unwrap() {
            Item::Atomic(Atomic::Integer { value, .. }) => value.to_string().parse().unwrap(),
            other => panic!("expected an integer, got {other:?}"),
        }
    }

    fn eval_boolean(source: &str) -> bool {
        let result = eval(source).unwrap();
        match result.as_singleton().unwrap() {
            Item::Atomic(Atomic::Boolean(b)) => *b,
            other => panic!("expected a boolean, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval_integer("1 + 2 * 3"), 7);
    }

    #[test]
    fn integer_division_promotes_to_decimal() {
        let result = eval("10 div 4").unwrap();
        match result.as_singleton().unwrap() {
            Item::Atomic(Atomic::Decimal(d)) => assert_eq!(d.to_string(), "2.5"),
            other => panic!("expected a decimal, got {other:?}"),
        }
    }

    #[test]
    fn integer_division_by_zero_raises_foar0001() {
        assert_eq!(eval("1 div 0").unwrap_err(), Error::FOAR0001);
    }

    #[test]
    fn idiv_truncates() {
        assert_eq!(eval_integer("10 idiv 3"), 3);
    }

    #[test]
    fn range_expression_builds_a_sequence() {
        let result = eval("1 to 5").unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn if_then_else_picks_a_branch() {
        assert_eq!(eval_integer("if (1 < 2) then 1 else 2"), 1);
    }

    #[test]
    fn for_loop_returns_a_sequence_per_binding() {
        let result = eval("for $x in (1, 2, 3) return $x * 2").unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn let_binds_a_variable() {
        assert_eq!(eval_integer("let $x := 2 return $x + 3"), 5);
    }

    #[test]
    fn quantified_some_short_circuits() {
        assert!(eval_boolean("some $x in (1, 2, 3) satisfies $x = 2"));
        assert!(!eval_boolean("every $x in (1, 2, 3) satisfies $x > 1"));
    }

    #[test]
    fn castable_as_reports_false_without_raising() {
        assert!(!eval_boolean("'abc' castable as xs:integer"));
        assert!(eval_boolean("'42' castable as xs:integer"));
    }

    #[test]
    fn cast_as_converts_the_value() {
        assert_eq!(eval_integer("'42' cast as xs:integer"), 42);
    }

    #[test]
    fn try_catch_recovers_from_a_dynamic_error() {
        assert_eq!(eval_integer("try { 1 div 0 } catch * { 0 }"), 0);
    }

    #[test]
    fn simple_map_rebinds_the_context_item_per_stage() {
        let result = eval("(1, 2, 3) ! (. + 1)").unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn unqualified_function_call_resolves_to_fn_namespace() {
        assert!(eval_boolean("true()"));
        assert_eq!(eval_integer("string-length('abc')"), 3);
    }
}
