//! Built-in function dispatch (spec §4.7 "function call", §4.8's
//! built-in list). Each function receives its already-evaluated
//! argument sequences and the dynamic context the call executed under,
//! and returns a result sequence or an [`Error`].
//!
//! Grounded in the teacher's `function::builtins` dispatch-by-local-name
//! match, generalized from its DOM-specific helpers to this crate's
//! [`XmlNode`] abstraction.

use ibig::IBig;
use rust_decimal::Decimal;
use xee_name::Name;
use xee_schema_type::Xs;

use crate::atomic::Atomic;
use crate::context::DynamicContext;
use crate::error::Error;
use crate::item::Item;
use crate::node::XmlNode;
use crate::sequence::Sequence;

/// Dispatch a built-in `fn:*` call by its local name. `name`'s arity has
/// already been checked against [`crate::function::builtin_signatures`]
/// by the caller.
pub fn call_builtin<N: XmlNode>(
    name: &Name,
    args: Vec<Sequence<N>>,
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    match name.local_name() {
        "position" => position(context),
        "last" => last(context),
        "true" => Ok(boolean_sequence(true)),
        "false" => Ok(boolean_sequence(false)),
        "not" => not(&args),
        "boolean" => Ok(boolean_sequence(args[0].ebv()?)),
        "string" => string(&args, context),
        "concat" => concat(&args),
        "string-length" => string_length(&args, context),
        "substring" => substring(&args),
        "substring-before" => substring_before(&args),
        "substring-after" => substring_after(&args),
        "starts-with" => starts_with(&args),
        "contains" => contains(&args),
        "ends-with" => ends_with(&args),
        "normalize-space" => normalize_space(&args, context),
        "translate" => translate(&args),
        "upper-case" => upper_case(&args),
        "lower-case" => lower_case(&args),
        "string-join" => string_join(&args),
        "matches" => matches(&args),
        "replace" => replace(&args),
        "number" => number(&args, context),
        "sum" => sum(&args),
        "floor" => round_like(&args, f64::floor),
        "ceiling" => round_like(&args, f64::ceil),
        "round" => round(&args),
        "abs" => abs(&args),
        "empty" => Ok(boolean_sequence(args[0].is_empty())),
        "exists" => Ok(boolean_sequence(!args[0].is_empty())),
        "head" => Ok(head(&args)),
        "tail" => Ok(tail(&args)),
        "reverse" => Ok(reverse(&args)),
        "distinct-values" => distinct_values(&args),
        "index-of" => index_of(&args),
        "subsequence" => subsequence(&args),
        "count" => Ok(count(&args)),
        "name" => name_fn(&args, context),
        "local-name" => local_name_fn(&args, context),
        "namespace-uri" => namespace_uri_fn(&args, context),
        "id" => id(&args, context),
        "lang" => lang(&args, context),
        "root" => root(&args, context),
        "data" => data(&args),
        "error" => error(&args),
        other => panic!("unregistered built-in function dispatched: {other}"),
    }
}

fn boolean_sequence<N: XmlNode>(value: bool) -> Sequence<N> {
    Sequence::singleton(Item::Atomic(Atomic::Boolean(value)))
}

fn context_item_or<N: XmlNode>(
    args: &[Sequence<N>],
    index: usize,
    context: &DynamicContext<N>,
) -> Result<Item<N>, Error> {
    match args.get(index) {
        Some(seq) => seq.as_singleton().map(|item| item.clone()),
        None => context.context_item.clone().ok_or(Error::XPDY0002),
    }
}

fn string_value_of<N: XmlNode>(item: &Item<N>) -> String {
    match item {
        Item::Atomic(a) => a.string_value(),
        Item::Node(n) => n.text_content(),
    }
}

fn first_arg_string<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<String, Error> {
    if args.is_empty() || args[0].is_empty() {
        if args.is_empty() {
            let item = context.context_item.clone().ok_or(Error::XPDY0002)?;
            return Ok(string_value_of(&item));
        }
        return Ok(String::new());
    }
    Ok(string_value_of(args[0].as_singleton()?))
}

fn position<N: XmlNode>(context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    if context.context_position == 0 {
        return Err(Error::XPDY0002);
    }
    Ok(Sequence::singleton(Item::Atomic(Atomic::integer(
        context.context_position as i64,
    ))))
}

fn last<N: XmlNode>(context: &DynamicContext<N>) -> Result<Sequence<N>, Error> {
    if context.context_size == 0 {
        return Err(Error::XPDY0002);
    }
    Ok(Sequence::singleton(Item::Atomic(Atomic::integer(
        context.context_size as i64,
    ))))
}

fn not<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    Ok(boolean_sequence(!args[0].ebv()?))
}

fn string<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let text = if args.is_empty() {
        match &context.context_item {
            Some(item) => string_value_of(item),
            None => return Err(Error::XPDY0002),
        }
    } else if args[0].is_empty() {
        String::new()
    } else {
        string_value_of(args[0].as_singleton()?)
    };
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(text))))
}

fn concat<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let mut out = String::new();
    for arg in args {
        if arg.is_empty() {
            continue;
        }
        out.push_str(&string_value_of(arg.as_singleton()?));
    }
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(out))))
}

fn string_length<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let text = first_arg_string(args, context)?;
    Ok(Sequence::singleton(Item::Atomic(Atomic::integer(
        text.chars().count() as i64,
    ))))
}

fn arg_string<N: XmlNode>(arg: &Sequence<N>) -> Result<String, Error> {
    if arg.is_empty() {
        return Ok(String::new());
    }
    Ok(string_value_of(arg.as_singleton()?))
}

fn arg_f64<N: XmlNode>(arg: &Sequence<N>) -> Result<f64, Error> {
    let item = arg.as_singleton()?;
    match item {
        Item::Atomic(a) if a.is_numeric() => a.as_f64().ok_or(Error::XPTY0004),
        _ => Err(Error::XPTY0004),
    }
}

fn substring<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let text = arg_string(&args[0])?;
    let chars: Vec<char> = text.chars().collect();
    let start = arg_f64(&args[1])?.round();
    let len = match args.get(2) {
        Some(seq) => arg_f64(seq)?.round(),
        None => f64::INFINITY,
    };
    // F&O substring: 1-based start, characters [start, start+len).
    let from = start.max(1.0);
    let to = if len.is_infinite() {
        f64::INFINITY
    } else {
        start + len
    };
    let result: String = chars
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let position = (i + 1) as f64;
            position >= from && position < to
        })
        .map(|(_, c)| *c)
        .collect();
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn substring_before<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = arg_string(&args[0])?;
    let needle = arg_string(&args[1])?;
    let result = if needle.is_empty() {
        String::new()
    } else {
        match haystack.find(&needle) {
            Some(index) => haystack[..index].to_string(),
            None => String::new(),
        }
    };
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn substring_after<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = arg_string(&args[0])?;
    let needle = arg_string(&args[1])?;
    let result = if needle.is_empty() {
        haystack
    } else {
        match haystack.find(&needle) {
            Some(index) => haystack[index + needle.len()..].to_string(),
            None => String::new(),
        }
    };
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn starts_with<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = arg_string(&args[0])?;
    let needle = arg_string(&args[1])?;
    Ok(boolean_sequence(haystack.starts_with(&needle)))
}

fn contains<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = arg_string(&args[0])?;
    let needle = arg_string(&args[1])?;
    Ok(boolean_sequence(haystack.contains(&needle)))
}

fn ends_with<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = arg_string(&args[0])?;
    let needle = arg_string(&args[1])?;
    Ok(boolean_sequence(haystack.ends_with(&needle)))
}

fn normalize_space<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let text = first_arg_string(args, context)?;
    let result = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn translate<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let text = arg_string(&args[0])?;
    let map_chars: Vec<char> = arg_string(&args[1])?.chars().collect();
    let trans_chars: Vec<char> = arg_string(&args[2])?.chars().collect();
    let result: String = text
        .chars()
        .filter_map(|c| match map_chars.iter().position(|m| *m == c) {
            Some(index) => trans_chars.get(index).copied(),
            None => Some(c),
        })
        .collect();
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn upper_case<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(
        arg_string(&args[0])?.to_uppercase(),
    ))))
}

fn lower_case<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(
        arg_string(&args[0])?.to_lowercase(),
    ))))
}

fn string_join<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let separator = match args.get(1) {
        Some(seq) => arg_string(seq)?,
        None => String::new(),
    };
    let parts: Vec<String> = args[0]
        .items()
        .iter()
        .map(|item| match item {
            Item::Atomic(a) => Ok(a.string_value()),
            Item::Node(_) => Err(Error::XPTY0004),
        })
        .collect::<Result<_, Error>>()?;
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(
        parts.join(&separator),
    ))))
}

/// Whether `pattern` matches the entirety of `text` (no anchors: those
/// are peeled off by [`structural_match`] before calling this).
/// Supports literal characters, `.` (any char), and `X*` (zero or more
/// of the preceding atom).
fn full_match(text: &[char], pattern: &[char]) -> bool {
    if pattern.is_empty() {
        return text.is_empty();
    }
    if pattern.len() >= 2 && pattern[1] == '*' {
        if full_match(text, &pattern[2..]) {
            return true;
        }
        !text.is_empty() && (pattern[0] == '.' || text[0] == pattern[0]) && full_match(&text[1..], pattern)
    } else if pattern[0] == '.' {
        !text.is_empty() && full_match(&text[1..], &pattern[1..])
    } else {
        !text.is_empty() && text[0] == pattern[0] && full_match(&text[1..], &pattern[1..])
    }
}

/// A minimal structural matcher covering literal text plus the `.` and
/// `*` metacharacters (any-char, zero-or-more-of-previous) and `^`/`$`
/// anchors — not a full XML Schema regular expression engine (spec's
/// documented non-goal: "a minimal structural matcher sufficient for
/// fn:matches/fn:replace smoke tests").
fn structural_match(text: &str, pattern: &str) -> bool {
    let anchored_start = pattern.starts_with('^');
    let anchored_end = pattern.ends_with('$');
    let core = &pattern[if anchored_start { 1 } else { 0 }..pattern.len() - if anchored_end { 1 } else { 0 }];

    let text_chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = core.chars().collect();

    match (anchored_start, anchored_end) {
        (true, true) => full_match(&text_chars, &pattern_chars),
        (true, false) => (0..=text_chars.len()).any(|end| full_match(&text_chars[..end], &pattern_chars)),
        (false, true) => (0..=text_chars.len()).any(|start| full_match(&text_chars[start..], &pattern_chars)),
        (false, false) => (0..=text_chars.len())
            .any(|start| (start..=text_chars.len()).any(|end| full_match(&text_chars[start..end], &pattern_chars))),
    }
}

fn matches<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let text = arg_string(&args[0])?;
    let pattern = arg_string(&args[1])?;
    Ok(boolean_sequence(structural_match(&text, &pattern)))
}

fn replace<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let text = arg_string(&args[0])?;
    let pattern = arg_string(&args[1])?;
    let replacement = arg_string(&args[2])?;
    // Only literal-pattern replacement is supported; metacharacter
    // patterns fall back to returning the input unchanged rather than
    // raising, since this matcher has no capture-group model.
    let result = if pattern.chars().any(|c| matches!(c, '*' | '.' | '^' | '$')) {
        text
    } else {
        text.replace(&pattern, &replacement)
    };
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(result))))
}

fn number<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let item = context_item_or(args, 0, context).ok();
    let value = match item {
        Some(Item::Atomic(a)) if a.is_numeric() => a.as_f64().unwrap_or(f64::NAN),
        Some(item) => string_value_of(&item).trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    };
    Ok(Sequence::singleton(Item::Atomic(Atomic::Double(
        ordered_float::OrderedFloat(value),
    ))))
}

fn sum<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    if args[0].is_empty() {
        return Ok(args.get(1).cloned().unwrap_or_else(|| {
            Sequence::singleton(Item::Atomic(Atomic::integer(0)))
        }));
    }
    let mut total = 0f64;
    let mut all_integer = true;
    let mut total_int = IBig::from(0);
    for item in args[0].items() {
        let atomic = crate::atomic::untyped_to_double(&crate::sequence::atomize_item(item))?;
        if !atomic.is_numeric() {
            return Err(Error::FORG0006);
        }
        if let Atomic::Integer { value, .. } = &atomic {
            total_int = total_int + value.clone();
        } else {
            all_integer = false;
        }
        total += atomic.as_f64().ok_or(Error::FORG0006)?;
    }
    if all_integer {
        Ok(Sequence::singleton(Item::Atomic(Atomic::Integer {
            xs: Xs::Integer,
            value: total_int,
        })))
    } else {
        Ok(Sequence::singleton(Item::Atomic(Atomic::Double(
            ordered_float::OrderedFloat(total),
        ))))
    }
}

fn round_like<N: XmlNode>(
    args: &[Sequence<N>],
    f: impl Fn(f64) -> f64,
) -> Result<Sequence<N>, Error> {
    if args[0].is_empty() {
        return Ok(Sequence::empty());
    }
    let item = args[0].as_singleton()?;
    let atomic = match item {
        Item::Atomic(a) if a.is_numeric() => a,
        _ => return Err(Error::XPTY0004),
    };
    let result = match atomic {
        Atomic::Integer { .. } => atomic.clone(),
        Atomic::Decimal(d) => Atomic::Decimal(Decimal::from_f64_retain(f(d.to_string().parse().unwrap_or(0.0))).unwrap_or(*d)),
        Atomic::Float(v) => Atomic::Float(ordered_float::OrderedFloat(f(v.0 as f64) as f32)),
        Atomic::Double(v) => Atomic::Double(ordered_float::OrderedFloat(f(v.0))),
        _ => unreachable!(),
    };
    Ok(Sequence::singleton(Item::Atomic(result)))
}

fn round<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    // Round-half-to-positive-infinity, per F&O fn:round. The two-arg
    // precision form isn't implemented; a supplied precision is ignored.
    round_like(args, |v| (v + 0.5).floor())
}

fn abs<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    if args[0].is_empty() {
        return Ok(Sequence::empty());
    }
    let item = args[0].as_singleton()?;
    let atomic = match item {
        Item::Atomic(a) if a.is_numeric() => a,
        _ => return Err(Error::XPTY0004),
    };
    let result = match atomic {
        Atomic::Integer { xs, value } => Atomic::Integer {
            xs: *xs,
            value: if value < &IBig::from(0) { -value.clone() } else { value.clone() },
        },
        Atomic::Decimal(d) => Atomic::Decimal(d.abs()),
        Atomic::Float(v) => Atomic::Float(ordered_float::OrderedFloat(v.0.abs())),
        Atomic::Double(v) => Atomic::Double(ordered_float::OrderedFloat(v.0.abs())),
        _ => unreachable!(),
    };
    Ok(Sequence::singleton(Item::Atomic(result)))
}

fn head<N: XmlNode>(args: &[Sequence<N>]) -> Sequence<N> {
    match args[0].items().first() {
        Some(item) => Sequence::singleton(item.clone()),
        None => Sequence::empty(),
    }
}

fn tail<N: XmlNode>(args: &[Sequence<N>]) -> Sequence<N> {
    let items = args[0].items();
    if items.is_empty() {
        Sequence::empty()
    } else {
        Sequence::from_items(items[1..].to_vec())
    }
}

fn reverse<N: XmlNode>(args: &[Sequence<N>]) -> Sequence<N> {
    let mut items = args[0].items().to_vec();
    items.reverse();
    Sequence::from_items(items)
}

fn distinct_values<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let atomized = args[0].atomize();
    let mut result: Vec<Atomic> = Vec::new();
    for value in atomized {
        if !result.iter().any(|existing| crate::atomic::atomic_eq(existing, &value) == Some(true)) {
            result.push(value);
        }
    }
    Ok(result.into_iter().map(Item::Atomic).collect())
}

fn index_of<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let haystack = args[0].atomize();
    let needle = args[1].as_singleton()?;
    let needle = match needle {
        Item::Atomic(a) => a,
        Item::Node(_) => return Err(Error::XPTY0004),
    };
    let mut result = Sequence::empty();
    for (index, value) in haystack.iter().enumerate() {
        if crate::atomic::atomic_eq(value, needle) == Some(true) {
            result.push(Item::Atomic(Atomic::integer((index + 1) as i64)));
        }
    }
    Ok(result)
}

fn subsequence<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    let items = args[0].items();
    let start = arg_f64(&args[1])?.round();
    let len = match args.get(2) {
        Some(seq) => arg_f64(seq)?.round(),
        None => f64::INFINITY,
    };
    let from = start.max(1.0);
    let to = if len.is_infinite() { f64::INFINITY } else { start + len };
    let result: Vec<Item<N>> = items
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let position = (i + 1) as f64;
            position >= from && position < to
        })
        .map(|(_, item)| item.clone())
        .collect();
    Ok(Sequence::from_items(result))
}

fn count<N: XmlNode>(args: &[Sequence<N>]) -> Sequence<N> {
    Sequence::singleton(Item::Atomic(Atomic::integer(args[0].len() as i64)))
}

fn name_fn<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let item = context_item_or(args, 0, context)?;
    let node = item.as_node().ok_or(Error::XPTY0004)?;
    let text = node
        .node_name()
        .map(|n| n.to_display_name())
        .or_else(|| node.target().map(str::to_string))
        .unwrap_or_default();
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(text))))
}

fn local_name_fn<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let item = context_item_or(args, 0, context)?;
    let node = item.as_node().ok_or(Error::XPTY0004)?;
    let text = node
        .node_name()
        .map(|n| n.local_name().to_string())
        .or_else(|| node.target().map(str::to_string))
        .unwrap_or_default();
    Ok(Sequence::singleton(Item::Atomic(Atomic::string(text))))
}

fn namespace_uri_fn<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let item = context_item_or(args, 0, context)?;
    let node = item.as_node().ok_or(Error::XPTY0004)?;
    let text = node
        .node_name()
        .and_then(|n| n.namespace().map(str::to_string))
        .unwrap_or_default();
    Ok(Sequence::singleton(Item::Atomic(Atomic::AnyUri(
        text.into(),
    ))))
}

/// A simplified `fn:id`: scans the context node's owning document for
/// elements carrying an unqualified `id` attribute matching one of the
/// whitespace-separated IDREFS tokens. A schema-aware host would use
/// declared `xs:ID` attributes instead; this engine has no schema, so
/// the attribute name is hardcoded to match the common convention — see
/// DESIGN.md.
fn id<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let idrefs_text = arg_string(&args[0])?;
    let tokens: Vec<&str> = idrefs_text.split_whitespace().collect();
    let reference_node = match args.get(1) {
        Some(seq) => seq.as_singleton()?.as_node().ok_or(Error::XPTY0004)?.clone(),
        None => context
            .context_item
            .as_ref()
            .and_then(Item::as_node)
            .ok_or(Error::XPDY0002)?
            .clone(),
    };
    let document = reference_node.owner_document();
    let id_name = Name::unprefixed("id");
    let mut result = Sequence::empty();
    let mut stack = vec![document];
    while let Some(node) = stack.pop() {
        if let Some(value) = node.get_attribute(&id_name) {
            if tokens.iter().any(|t| *t == value) {
                result.push(Item::Node(node.clone()));
            }
        }
        stack.extend(node.children());
    }
    Ok(result.into_document_order())
}

/// A simplified `fn:lang`: compares against an unqualified `xml:lang`
/// value walked up from the reference node's ancestors (no full
/// BCP-47 range matching, just prefix equality per F&O's basic case).
fn lang<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let target = arg_string(&args[0])?.to_lowercase();
    let reference_node = match args.get(1) {
        Some(seq) => seq.as_singleton()?.as_node().ok_or(Error::XPTY0004)?.clone(),
        None => context
            .context_item
            .as_ref()
            .and_then(Item::as_node)
            .ok_or(Error::XPDY0002)?
            .clone(),
    };
    let lang_name = Name::new(
        "lang",
        Some("http://www.w3.org/XML/1998/namespace".to_string()),
        Some("xml".to_string()),
    );
    let mut current = Some(reference_node);
    while let Some(node) = current {
        if let Some(value) = node.get_attribute(&lang_name) {
            let value = value.to_lowercase();
            return Ok(boolean_sequence(value == target || value.starts_with(&format!("{target}-"))));
        }
        current = node.parent();
    }
    Ok(boolean_sequence(false))
}

fn root<N: XmlNode>(
    args: &[Sequence<N>],
    context: &DynamicContext<N>,
) -> Result<Sequence<N>, Error> {
    let item = context_item_or(args, 0, context)?;
    let node = item.as_node().ok_or(Error::XPTY0004)?;
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        current = parent;
    }
    Ok(Sequence::singleton(Item::Node(current)))
}

fn data<N: XmlNode>(args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    Ok(args[0].atomize().into_iter().map(Item::Atomic).collect())
}

/// `fn:error`: always raises, since this engine's closed [`Error`] enum
/// has no payload for a caller-supplied QName/description. Every call
/// raises `FOER0000` regardless of its arguments — a deliberate
/// simplification (see DESIGN.md) rather than the W3C-specified
/// arbitrary error code/description/object triple.
fn error<N: XmlNode>(_args: &[Sequence<N>]) -> Result<Sequence<N>, Error> {
    Err(Error::FOER0000)
}
