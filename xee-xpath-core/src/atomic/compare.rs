//! Atomic comparison (spec §4.7): general comparison (existential,
//! untyped/numeric coercion), value comparison (singleton-only), and the
//! NaN-aware ordering the two share.

use std::cmp::Ordering;

use super::promote::{common_numeric_type, promote_numeric, promote_to_string};
use super::Atomic;
use crate::error::Error;

/// An ordering that treats NaN as unequal and unordered with respect to
/// everything, including itself (spec §4.7: "NaN compares unequal to
/// everything, including another NaN").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanAwareOrd {
    Ordered(Ordering),
    /// At least one operand was NaN: `eq`/`ne` are both false across the
    /// usual sense (`ne` still reports true), and relational operators
    /// are all false.
    Nan,
}

fn coerce_pair(a: &Atomic, b: &Atomic) -> Result<(Atomic, Atomic), Error> {
    // xs:untypedAtomic vs anything: coerce to the other side's type, or
    // to xs:string if both are untyped (spec §4.3/§4.7).
    match (a, b) {
        (Atomic::Untyped(_), Atomic::Untyped(_)) => {
            Ok((promote_to_string(a), promote_to_string(b)))
        }
        (Atomic::Untyped(_), _) if b.is_numeric() => {
            let parsed = super::cast::cast(a, b.dynamic_type())?;
            Ok((parsed, b.clone()))
        }
        (_, Atomic::Untyped(_)) if a.is_numeric() => {
            let parsed = super::cast::cast(b, a.dynamic_type())?;
            Ok((a.clone(), parsed))
        }
        (Atomic::Untyped(_), _) => Ok((promote_to_string(a), b.clone())),
        (_, Atomic::Untyped(_)) => Ok((a.clone(), promote_to_string(b))),
        _ if a.is_numeric() && b.is_numeric() => {
            let target = common_numeric_type(a.dynamic_type(), b.dynamic_type())
                .ok_or(Error::XPTY0004)?;
            Ok((promote_numeric(a, target)?, promote_numeric(b, target)?))
        }
        _ => Ok((a.clone(), b.clone())),
    }
}

/// Compare two already-coerced atomics for `eq`/`ne` purposes, NaN-aware.
fn nan_aware_eq(a: &Atomic, b: &Atomic) -> Result<bool, Error> {
    match (a, b) {
        (Atomic::Float(x), Atomic::Float(y)) => Ok(!x.0.is_nan() && !y.0.is_nan() && x.0 == y.0),
        (Atomic::Double(x), Atomic::Double(y)) => Ok(!x.0.is_nan() && !y.0.is_nan() && x.0 == y.0),
        (Atomic::Untyped(x), Atomic::Untyped(y)) => Ok(x == y),
        (Atomic::String { value: x, .. }, Atomic::String { value: y, .. }) => Ok(x == y),
        (Atomic::AnyUri(x), Atomic::AnyUri(y)) => Ok(x == y),
        (Atomic::Boolean(x), Atomic::Boolean(y)) => Ok(x == y),
        (Atomic::Integer { value: x, .. }, Atomic::Integer { value: y, .. }) => Ok(x == y),
        (Atomic::Decimal(x), Atomic::Decimal(y)) => Ok(x == y),
        (Atomic::QName(x), Atomic::QName(y)) => Ok(x == y),
        (Atomic::Duration { months: m1, seconds: s1, .. }, Atomic::Duration { months: m2, seconds: s2, .. }) => {
            Ok(m1 == m2 && s1 == s2)
        }
        (Atomic::DateTime { value: v1, timezone: t1 }, Atomic::DateTime { value: v2, timezone: t2 }) => {
            Ok(v1 == v2 && t1 == t2)
        }
        (Atomic::Date { value: v1, timezone: t1 }, Atomic::Date { value: v2, timezone: t2 }) => {
            Ok(v1 == v2 && t1 == t2)
        }
        (Atomic::Time { value: v1, timezone: t1 }, Atomic::Time { value: v2, timezone: t2 }) => {
            Ok(v1 == v2 && t1 == t2)
        }
        (Atomic::Base64Binary(x), Atomic::Base64Binary(y)) => Ok(x == y),
        (Atomic::HexBinary(x), Atomic::HexBinary(y)) => Ok(x == y),
        (Atomic::GregorianFragment { lexical: x, .. }, Atomic::GregorianFragment { lexical: y, .. }) => {
            Ok(x == y)
        }
        _ => Err(Error::XPTY0004),
    }
}

/// Unconditional equality used by `PartialEq for Atomic` (e.g. for
/// `distinct-values`/`index-of`, which need a total, error-free test).
/// Falls back to `false` on a type mismatch rather than raising.
pub fn atomic_eq(a: &Atomic, b: &Atomic) -> Option<bool> {
    let (ca, cb) = coerce_pair(a, b).ok()?;
    nan_aware_eq(&ca, &cb).ok()
}

fn nan_aware_cmp(a: &Atomic, b: &Atomic) -> Result<NanAwareOrd, Error> {
    match (a, b) {
        (Atomic::Float(x), Atomic::Float(y)) => {
            if x.0.is_nan() || y.0.is_nan() {
                Ok(NanAwareOrd::Nan)
            } else {
                Ok(NanAwareOrd::Ordered(x.0.partial_cmp(&y.0).unwrap()))
            }
        }
        (Atomic::Double(x), Atomic::Double(y)) => {
            if x.0.is_nan() || y.0.is_nan() {
                Ok(NanAwareOrd::Nan)
            } else {
                Ok(NanAwareOrd::Ordered(x.0.partial_cmp(&y.0).unwrap()))
            }
        }
        (Atomic::Integer { value: x, .. }, Atomic::Integer { value: y, .. }) => {
            Ok(NanAwareOrd::Ordered(x.cmp(y)))
        }
        (Atomic::Decimal(x), Atomic::Decimal(y)) => Ok(NanAwareOrd::Ordered(x.cmp(y))),
        (Atomic::String { value: x, .. }, Atomic::String { value: y, .. }) => {
            Ok(NanAwareOrd::Ordered(x.cmp(y)))
        }
        (Atomic::Untyped(x), Atomic::Untyped(y)) => Ok(NanAwareOrd::Ordered(x.cmp(y))),
        (Atomic::AnyUri(x), Atomic::AnyUri(y)) => Ok(NanAwareOrd::Ordered(x.cmp(y))),
        (Atomic::Boolean(x), Atomic::Boolean(y)) => Ok(NanAwareOrd::Ordered(x.cmp(y))),
        (Atomic::Date { value: v1, .. }, Atomic::Date { value: v2, .. }) => {
            Ok(NanAwareOrd::Ordered(v1.cmp(v2)))
        }
        (Atomic::DateTime { value: v1, .. }, Atomic::DateTime { value: v2, .. }) => {
            Ok(NanAwareOrd::Ordered(v1.cmp(v2)))
        }
        (Atomic::Time { value: v1, .. }, Atomic::Time { value: v2, .. }) => {
            Ok(NanAwareOrd::Ordered(v1.cmp(v2)))
        }
        _ => Err(Error::XPTY0004),
    }
}

/// Value comparison (`eq`, `ne`, `lt`, `le`, `gt`, `ge`): spec §4.7
/// "require singletons; compare the two atomic values directly, after
/// type promotion". Callers are responsible for unwrapping the
/// surrounding sequences to singletons (`XPTY0004` if not singleton) and
/// pass the two atomic values here.
pub fn value_compare(op: xee_xpath_ast::BinaryOperator, a: &Atomic, b: &Atomic) -> Result<bool, Error> {
    use xee_xpath_ast::BinaryOperator::*;
    let (ca, cb) = coerce_pair(a, b)?;
    match op {
        ValueEq => nan_aware_eq(&ca, &cb),
        ValueNe => Ok(!nan_aware_eq(&ca, &cb)?),
        ValueLt | ValueLe | ValueGt | ValueGe => match nan_aware_cmp(&ca, &cb)? {
            NanAwareOrd::Nan => Ok(false),
            NanAwareOrd::Ordered(ord) => Ok(match op {
                ValueLt => ord == Ordering::Less,
                ValueLe => ord != Ordering::Greater,
                ValueGt => ord == Ordering::Greater,
                ValueGe => ord != Ordering::Less,
                _ => unreachable!(),
            }),
        },
        _ => Err(Error::XPTY0004),
    }
}

/// General comparison (`=`, `!=`, `<`, `<=`, `>`, `>=`): spec §4.7
/// "existential: true iff some pair of items, one from each operand
/// sequence, satisfies the value comparison". `a`/`b` are the two
/// already-atomized operand sequences.
pub fn general_compare(
    op: xee_xpath_ast::BinaryOperator,
    a: &[Atomic],
    b: &[Atomic],
) -> Result<bool, Error> {
    let value_op = general_to_value_op(op);
    for x in a {
        for y in b {
            if let Ok(true) = value_compare(value_op, x, y) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn general_to_value_op(op: xee_xpath_ast::BinaryOperator) -> xee_xpath_ast::BinaryOperator {
    use xee_xpath_ast::BinaryOperator::*;
    match op {
        GenEq => ValueEq,
        GenNe => ValueNe,
        GenLt => ValueLt,
        GenLe => ValueLe,
        GenGt => ValueGt,
        GenGe => ValueGe,
        other => other,
    }
}
