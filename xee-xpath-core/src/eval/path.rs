//! Path and axis evaluation (spec §4.8 "Path expression", §4.4 axis
//! semantics): folding a `PathExpr`'s steps left to right, applying each
//! axis/node test/predicate, and normalizing into document order with
//! duplicates removed the way a combined step result always must be.

use xee_xpath_ast::{Axis, AxisStep, ExprS, NameTest, NodeTest, PathExpr, Rootedness, StepExpr};
use xee_xpath_type::NodeKind;

use crate::context::DynamicContext;
use crate::error::Error;
use crate::item::Item;
use crate::matching;
use crate::node::{DocumentPosition, XmlNode};
use crate::sequence::Sequence;

use super::eval_expr;

pub(super) fn eval_path_expr<N: XmlNode>(
    path: &PathExpr,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let initial = match path.rooted {
        Rootedness::Relative => None,
        Rootedness::Absolute | Rootedness::AbsoluteDescendant => Some(root_sequence(context)?),
    };
    let result = eval_steps(&path.steps, initial, context)?;
    if path.steps.len() > 1 || path.rooted != Rootedness::Relative {
        check_not_mixed(&result)?;
    }
    Ok(result)
}

fn eval_steps<N: XmlNode>(
    steps: &[xee_xpath_ast::StepExprS],
    initial: Option<Sequence<N>>,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let mut current = initial;
    for step in steps {
        current = Some(match current {
            None => eval_first_step(&step.value, context)?,
            Some(seq) => {
                check_path_operand_is_nodes(&seq)?;
                apply_step_to_sequence(&step.value, &seq, context)?
            }
        });
    }
    Ok(current.unwrap_or_else(Sequence::empty))
}

/// The first step of a relative path is evaluated directly against the
/// ambient context, not against a carried-forward sequence.
fn eval_first_step<N: XmlNode>(step: &StepExpr, context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    match step {
        StepExpr::PostfixExpr { primary, predicates } => {
            let base = super::eval_primary_expr(&primary.value, context)?;
            apply_predicates(base, predicates, context)
        }
        StepExpr::AxisStep(axis_step) => {
            let item = context.context_item.clone().ok_or(Error::XPDY0002)?;
            let node = item.as_node().ok_or(Error::XPTY0020)?.clone();
            let candidates = axis_nodes(axis_step.axis, &node);
            finish_axis_step(axis_step, candidates, context)
        }
    }
}

/// A later step is applied once per item of the carried-forward sequence,
/// each becoming the context item for that application; results are
/// concatenated and, for an axis step, deduplicated and sorted into
/// document order (spec §4.8: a path step's result is always a node
/// sequence in document order with duplicates removed).
fn apply_step_to_sequence<N: XmlNode>(
    step: &StepExpr,
    input: &Sequence<N>,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match step {
        StepExpr::PostfixExpr { primary, predicates } => {
            let mut result = Sequence::empty();
            let size = input.len();
            for (i, item) in input.items().iter().enumerate() {
                let child_context = context.with_context_item(item.clone(), i + 1, size);
                let base = super::eval_primary_expr(&primary.value, &child_context)?;
                result.extend(apply_predicates(base, predicates, &child_context)?);
            }
            Ok(result)
        }
        StepExpr::AxisStep(axis_step) => {
            let mut result = Sequence::empty();
            for item in input.items() {
                let node = item.as_node().ok_or(Error::XPTY0020)?;
                let candidates = axis_nodes(axis_step.axis, node);
                result.extend(finish_axis_step(axis_step, candidates, context)?);
            }
            Ok(result.into_document_order())
        }
    }
}

fn finish_axis_step<N: XmlNode>(
    axis_step: &AxisStep,
    candidates: Vec<N>,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let filtered: Vec<Item<N>> = candidates
        .into_iter()
        .filter(|node| node_test_matches(axis_step.axis, &axis_step.node_test, node))
        .map(Item::Node)
        .collect();
    let sequence = Sequence::from_items(filtered);
    let result = apply_predicates(sequence, &axis_step.predicates, context)?;
    Ok(result.into_document_order())
}

/// Filter a candidate (already axis-ordered) sequence by its predicates,
/// one at a time, renumbering `position()`/`last()` after each filter
/// (spec §4.8: predicates apply left to right, each against the previous
/// predicate's surviving items).
fn apply_predicates<N: XmlNode>(
    sequence: Sequence<N>,
    predicates: &[ExprS],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let mut current = sequence;
    for predicate in predicates {
        let mut kept = Vec::new();
        let size = current.len();
        for (i, item) in current.into_items().into_iter().enumerate() {
            let position = i + 1;
            let child_context = context.with_context_item(item.clone(), position, size);
            let result = eval_expr(&predicate.value, &child_context)?;
            if predicate_matches(&result, position)? {
                kept.push(item);
            }
        }
        current = Sequence::from_items(kept);
    }
    Ok(current)
}

/// A predicate's truth value (spec §4.8): a singleton numeric value tests
/// equality with the current position; anything else uses the effective
/// boolean value.
fn predicate_matches<N: XmlNode>(result: &Sequence<N>, position: usize) -> Result<bool, Error> {
    if let [item] = result.items() {
        if let Some(atomic) = item.as_atomic() {
            if atomic.is_numeric() {
                return Ok(atomic.as_f64() == Some(position as f64));
            }
        }
    }
    result.ebv()
}

fn axis_nodes<N: XmlNode>(axis: Axis, node: &N) -> Vec<N> {
    match axis {
        Axis::Self_ => vec![node.clone()],
        Axis::Child => node.children(),
        Axis::Attribute => node.attributes(),
        Axis::Parent => node.parent().into_iter().collect(),
        Axis::Descendant => descendants(node, false),
        Axis::DescendantOrSelf => descendants(node, true),
        // nearest-first: already the reverse-axis order the spec numbers
        // predicate positions from.
        Axis::Ancestor => ancestors(node, false),
        Axis::AncestorOrSelf => ancestors(node, true),
        Axis::FollowingSibling => following_siblings(node),
        Axis::PrecedingSibling => preceding_siblings(node),
        Axis::Following => axis_following(node),
        Axis::Preceding => axis_preceding(node),
        // Namespace nodes have no representation in the host adapter
        // (spec §6 data model); see DESIGN.md.
        Axis::Namespace => Vec::new(),
    }
}

fn descendants<N: XmlNode>(node: &N, include_self: bool) -> Vec<N> {
    let mut out = Vec::new();
    if include_self {
        out.push(node.clone());
    }
    for child in node.children() {
        out.push(child.clone());
        out.extend(descendants(&child, false));
    }
    out
}

fn ancestors<N: XmlNode>(node: &N, include_self: bool) -> Vec<N> {
    let mut out = Vec::new();
    if include_self {
        out.push(node.clone());
    }
    let mut current = node.parent();
    while let Some(n) = current {
        out.push(n.clone());
        current = n.parent();
    }
    out
}

fn following_siblings<N: XmlNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut current = node.next_sibling();
    while let Some(n) = current {
        out.push(n.clone());
        current = n.next_sibling();
    }
    out
}

fn preceding_siblings<N: XmlNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut current = node.previous_sibling();
    while let Some(n) = current {
        out.push(n.clone());
        current = n.previous_sibling();
    }
    out
}

fn axis_following<N: XmlNode>(node: &N) -> Vec<N> {
    let root = node.owner_document();
    descendants(&root, true)
        .into_iter()
        .filter(|n| n != node)
        .filter(|n| !node.is_ancestor_of(n))
        .filter(|n| matches!(node.compare_document_position(n), DocumentPosition::Following))
        .collect()
}

fn axis_preceding<N: XmlNode>(node: &N) -> Vec<N> {
    let root = node.owner_document();
    let mut preceding: Vec<N> = descendants(&root, true)
        .into_iter()
        .filter(|n| n != node)
        .filter(|n| !n.is_ancestor_of(node))
        .filter(|n| matches!(node.compare_document_position(n), DocumentPosition::Preceding))
        .collect();
    // nearest-first, matching every other reverse axis's position order.
    preceding.reverse();
    preceding
}

fn node_test_matches<N: XmlNode>(axis: Axis, node_test: &NodeTest, node: &N) -> bool {
    match node_test {
        NodeTest::KindTest(kind_test) => matching::node_matches_kind_test(kind_test, node),
        NodeTest::NameTest(name_test) => {
            if !matches_principal_node_kind(axis, node) {
                return false;
            }
            match name_test {
                NameTest::Star => true,
                NameTest::Name(name) => node.node_name().as_ref() == Some(&name.value),
                NameTest::LocalName(local) => node.local_name() == Some(local.as_str()),
                NameTest::Namespace(ns) => node.namespace_uri() == Some(ns.as_str()),
            }
        }
    }
}

/// A name test only matches the axis's principal node kind: attributes
/// for `attribute::`, elements for everything else (`namespace::` has no
/// node representation here at all — see [`axis_nodes`]).
fn matches_principal_node_kind<N: XmlNode>(axis: Axis, node: &N) -> bool {
    match axis {
        Axis::Attribute => node.node_kind() == NodeKind::Attribute,
        Axis::Namespace => false,
        _ => node.node_kind() == NodeKind::Element,
    }
}

/// The root node sequence a leading `/`/`//` step starts from (spec
/// §4.8): the owning document of the current context node. Raises
/// `XPDY0002` if there is no context item, `XPTY0020` if it is not a
/// node.
fn root_sequence<N: XmlNode>(context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    let item = context.context_item.clone().ok_or(Error::XPDY0002)?;
    let node = item.as_node().ok_or(Error::XPTY0020)?;
    Ok(Sequence::singleton(Item::Node(node.owner_document())))
}

/// A preceding step's result must be nodes before chaining another step
/// onto it (spec §4.8, `XPTY0019`).
fn check_path_operand_is_nodes<N: XmlNode>(seq: &Sequence<N>) -> Result<(), Error> {
    if seq.items().iter().all(Item::is_node) {
        Ok(())
    } else {
        Err(Error::XPTY0019)
    }
}

/// A path operator's result may never mix nodes and non-nodes (spec
/// §4.8, `XPTY0018`).
fn check_not_mixed<N: XmlNode>(seq: &Sequence<N>) -> Result<(), Error> {
    let has_node = seq.items().iter().any(Item::is_node);
    let has_non_node = seq.items().iter().any(|item| !item.is_node());
    if has_node && has_non_node {
        Err(Error::XPTY0018)
    } else {
        Ok(())
    }
}
