//! End-to-end parse+evaluate scenarios against the facade's in-memory
//! tree, covering the engine's major feature groups: arithmetic,
//! sequence construction, path/axis navigation, predicates, comparisons,
//! sequence types, FLWOR, and error propagation.

use std::rc::Rc;

use xee_xpath::tree::Document;
use xee_xpath::Xpath;
use xee_xpath_core::atomic::Atomic;
use xee_xpath_core::{DynamicContext, EngineOptions, Error, Item, StaticContext};
use xee_xpath_lexer::XPathVersion;

fn static_context() -> Rc<StaticContext> {
    Rc::new(StaticContext::with_builtins(EngineOptions::default().version))
}

fn eval_no_context(source: &str) -> xee_xpath_core::Sequence<xee_xpath::tree::Node> {
    let static_context = static_context();
    let xpath = Xpath::compile(source, &static_context).unwrap();
    let context = DynamicContext::new(static_context);
    xpath.evaluate(&context).unwrap()
}

fn sample_document() -> xee_xpath::tree::Node {
    Document::build("root", |root| {
        root.element("a", |a| {
            a.attribute("id", "1");
            a.text("1");
        });
        root.element("a", |a| {
            a.attribute("id", "2");
            a.text("2");
        });
        root.element("a", |a| {
            a.attribute("id", "3");
            a.text("3");
        });
        root.comment("a trailing comment");
    })
}

fn document_context(doc: &xee_xpath::tree::Node) -> DynamicContext<xee_xpath::tree::Node> {
    let static_context = static_context();
    DynamicContext::new(static_context).with_context_item(Item::Node(doc.clone()), 1, 1)
}

#[test]
fn arithmetic_with_precedence() {
    let result = eval_no_context("1 + 2 * 3");
    assert_eq!(result.len(), 1);
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::Integer { value, .. }) => assert_eq!(value.to_string(), "7"),
        other => panic!("expected an integer, got {other:?}"),
    }
}

#[test]
fn sum_over_a_descendant_path() {
    let doc = sample_document();
    let static_context = static_context();
    let xpath = Xpath::compile("sum(//a)", &static_context).unwrap();
    let context = document_context(&doc);
    let result = xpath.evaluate(&context).unwrap();
    // The `a` elements' text content is untyped atomic, which arithmetic
    // context promotes to `xs:double` (spec §4.3), so the sum is a double
    // even though every individual addend looks like an integer.
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::Double(d)) => assert_eq!(d.0, 6.0),
        other => panic!("expected a summed double value, got {other:?}"),
    }
}

#[test]
fn last_predicate_selects_the_final_a() {
    let doc = sample_document();
    let static_context = static_context();
    let xpath = Xpath::compile("//a[last()]", &static_context).unwrap();
    let context = document_context(&doc);
    let result = xpath.evaluate(&context).unwrap();
    assert_eq!(result.len(), 1);
    let node = result.as_singleton().unwrap().as_node().unwrap();
    assert_eq!(node.get_attribute(&xee_name::Name::unprefixed("id")).as_deref(), Some("3"));
}

#[test]
fn castable_as_reports_false_without_raising() {
    let result = eval_no_context("'abc' castable as xs:integer");
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::Boolean(b)) => assert!(!*b),
        other => panic!("expected a boolean, got {other:?}"),
    }
}

#[test]
fn for_expression_squares_each_binding() {
    let result = eval_no_context("for $x in (1, 2, 3) return $x * $x");
    assert_eq!(result.len(), 3);
    let values: Vec<String> = result
        .items()
        .iter()
        .map(|item| match item {
            Item::Atomic(Atomic::Integer { value, .. }) => value.to_string(),
            other => panic!("expected an integer, got {other:?}"),
        })
        .collect();
    assert_eq!(values, vec!["1", "4", "9"]);
}

#[test]
fn integer_division_by_zero_is_a_dynamic_error() {
    let static_context = static_context();
    let xpath = Xpath::compile("1 div 0", &static_context).unwrap();
    let context = DynamicContext::new(static_context);
    assert_eq!(xpath.evaluate(&context).unwrap_err(), Error::FOAR0001);
}

#[test]
fn double_division_by_zero_yields_infinity() {
    let result = eval_no_context("1.0e0 div 0");
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::Double(d)) => assert!(d.0.is_infinite() && d.0.is_sign_positive()),
        other => panic!("expected positive infinity, got {other:?}"),
    }
}

#[test]
fn empty_sequence_instance_of_empty_sequence_type() {
    let result = eval_no_context("() instance of xs:integer*");
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::Boolean(b)) => assert!(*b),
        other => panic!("expected a boolean, got {other:?}"),
    }
}

#[test]
fn malformed_expression_is_a_static_parse_error() {
    let static_context = static_context();
    let err = Xpath::compile("foo(", &static_context).unwrap_err();
    assert_eq!(err.error, Error::XPST0003);
}

#[test]
fn text_content_concatenates_descendant_text() {
    let doc = Document::build("root", |root| {
        root.element("p", |p| {
            p.text("hello ");
            p.element("em", |em| {
                em.text("world");
            });
        });
    });
    let static_context = static_context();
    let xpath = Xpath::compile("string(/root/p)", &static_context).unwrap();
    let context = document_context(&doc);
    let result = xpath.evaluate(&context).unwrap();
    match result.as_singleton().unwrap() {
        Item::Atomic(Atomic::String { value, .. }) => assert_eq!(&**value, "hello world"),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[test]
fn version_gate_rejects_simple_map_before_xpath3() {
    let static_context = Rc::new(StaticContext::with_builtins(XPathVersion::V2_0));
    let err = Xpath::compile("(1, 2, 3) ! .", &static_context).unwrap_err();
    assert_eq!(err.error, Error::XPST0003);
}

#[test]
fn union_is_idempotent_and_stays_in_document_order() {
    let doc = sample_document();
    let static_context = static_context();
    let xpath = Xpath::compile("(//a | //a)", &static_context).unwrap();
    let context = document_context(&doc);
    let result = xpath.evaluate(&context).unwrap();
    assert_eq!(result.len(), 3);
}
