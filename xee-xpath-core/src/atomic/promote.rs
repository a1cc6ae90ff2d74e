//! Type promotion, coercion, and effective boolean value (spec §4.3, §4.6).

use xee_schema_type::Xs;

use super::Atomic;
use crate::error::Error;
use crate::item::Item;
use crate::node::XmlNode;
use crate::sequence::Sequence;

/// The common numeric type two operand types promote to before an
/// arithmetic or value-comparison operator is applied: the higher of the
/// two levels on the integer ≤ decimal ≤ float ≤ double lattice.
/// Returns `None` if either type is not numeric.
pub fn common_numeric_type(a: Xs, b: Xs) -> Option<Xs> {
    let (la, lb) = (a.numeric_promotion_level()?, b.numeric_promotion_level()?);
    Some(if la >= lb {
        promotion_level_type(la)
    } else {
        promotion_level_type(lb)
    })
}

fn promotion_level_type(level: u8) -> Xs {
    match level {
        0 | 1 => Xs::Decimal,
        2 => Xs::Float,
        3 => Xs::Double,
        _ => unreachable!("numeric_promotion_level only returns 0..=3"),
    }
}

/// Promote `a` to `target` (must be `>=` `a`'s own level on the numeric
/// lattice, or a string-context promotion target). Used by arithmetic
/// (promote both operands to the common numeric type) and by explicit
/// numeric contexts (`xs:untypedAtomic` -> `xs:double`).
pub fn promote_numeric(a: &Atomic, target: Xs) -> Result<Atomic, Error> {
    match target {
        Xs::Double => Ok(Atomic::Double(ordered_float::OrderedFloat(
            a.as_f64().ok_or(Error::XPTY0004)?,
        ))),
        Xs::Float => Ok(Atomic::Float(ordered_float::OrderedFloat(
            a.as_f64().ok_or(Error::XPTY0004)? as f32,
        ))),
        Xs::Decimal => match a {
            Atomic::Integer { value, .. } => Ok(Atomic::Decimal(
                value.to_string().parse().map_err(|_| Error::FOCA0001)?,
            )),
            Atomic::Decimal(d) => Ok(Atomic::Decimal(*d)),
            _ => Err(Error::XPTY0004),
        },
        _ => Err(Error::XPTY0004),
    }
}

/// Coerce an atomized value into a string-context value (spec §4.3:
/// `xs:anyURI`, `xs:untypedAtomic` promote to `xs:string`).
pub fn promote_to_string(a: &Atomic) -> Atomic {
    match a {
        Atomic::Untyped(s) => Atomic::string(s.to_string()),
        Atomic::AnyUri(s) => Atomic::string(s.to_string()),
        other => other.clone(),
    }
}

/// Coerce `xs:untypedAtomic` to `xs:double` for arithmetic context (spec
/// §4.3 "in arithmetic context, xs:untypedAtomic -> xs:double").
pub fn untyped_to_double(a: &Atomic) -> Result<Atomic, Error> {
    match a {
        Atomic::Untyped(s) => s
            .trim()
            .parse::<f64>()
            .map(|v| Atomic::Double(ordered_float::OrderedFloat(v)))
            .or(Ok(Atomic::Double(ordered_float::OrderedFloat(f64::NAN)))),
        other => Ok(other.clone()),
    }
}

/// The effective boolean value of a sequence (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ebv {
    Value(bool),
    /// A type error (`FORG0006`): EBV is undefined for this sequence
    /// shape (e.g. a sequence of more than one atomic value).
    TypeError,
}

/// Compute the effective boolean value of `sequence` (spec §4.6):
/// - empty sequence -> false
/// - a sequence whose first item is a node -> true
/// - a singleton boolean -> itself
/// - a singleton numeric -> false iff zero or NaN
/// - a singleton string/URI -> false iff empty
/// - anything else -> `FORG0006`
pub fn ebv<N: XmlNode>(sequence: &Sequence<N>) -> Result<bool, Error> {
    match ebv_checked(sequence) {
        Ebv::Value(b) => Ok(b),
        Ebv::TypeError => Err(Error::FORG0006),
    }
}

fn ebv_checked<N: XmlNode>(sequence: &Sequence<N>) -> Ebv {
    let items = sequence.items();
    match items.first() {
        None => Ebv::Value(false),
        Some(Item::Node(_)) => Ebv::Value(true),
        Some(Item::Atomic(_)) if items.len() > 1 => Ebv::TypeError,
        Some(Item::Atomic(a)) => match a {
            Atomic::Boolean(b) => Ebv::Value(*b),
            Atomic::Integer { value, .. } => Ebv::Value(!value.eq(&ibig::IBig::from(0))),
            Atomic::Decimal(d) => Ebv::Value(!d.is_zero()),
            Atomic::Float(f) => Ebv::Value(f.0 != 0.0 && !f.0.is_nan()),
            Atomic::Double(d) => Ebv::Value(d.0 != 0.0 && !d.0.is_nan()),
            Atomic::String { value, .. } | Atomic::Untyped(value) => Ebv::Value(!value.is_empty()),
            Atomic::AnyUri(value) => Ebv::Value(!value.is_empty()),
            _ => Ebv::TypeError,
        },
    }
}
