//! Numeric operators (spec §4.7 "Arithmetic"): `+ - * div idiv mod`,
//! each applied after promoting both operands to a common type on the
//! integer ≤ decimal ≤ float ≤ double lattice, the way [`super::compare`]
//! promotes its own pair before comparing.

use std::str::FromStr;

use ibig::IBig;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use xee_xpath_ast::BinaryOperator;

use super::promote::{common_numeric_type, promote_numeric, untyped_to_double};
use super::Atomic;
use crate::error::Error;

/// Apply one of `+ - * div mod` to two atomic operands, promoting both to
/// their common numeric type first. `idiv` is handled separately by
/// [`int_div`], since its result type (`xs:integer`) never matches
/// either operand's own type.
pub fn arithmetic(op: BinaryOperator, a: &Atomic, b: &Atomic) -> Result<Atomic, Error> {
    if op == BinaryOperator::IntDiv {
        return int_div(a, b);
    }
    let (ca, cb) = coerce_pair(a, b)?;
    match (&ca, &cb) {
        (Atomic::Integer { value: x, .. }, Atomic::Integer { value: y, .. }) => integer_op(op, x, y),
        (Atomic::Decimal(x), Atomic::Decimal(y)) => decimal_op(op, *x, *y),
        (Atomic::Float(x), Atomic::Float(y)) => {
            Ok(Atomic::Float(OrderedFloat(float_op(op, x.0 as f64, y.0 as f64)? as f32)))
        }
        (Atomic::Double(x), Atomic::Double(y)) => Ok(Atomic::Double(OrderedFloat(float_op(op, x.0, y.0)?))),
        _ => Err(Error::XPTY0004),
    }
}

/// Promote `xs:untypedAtomic` to `xs:double`, then both operands to their
/// common numeric type — except two `xs:integer` operands, which stay
/// integers (`op:numeric-add(xs:integer, xs:integer)` is `xs:integer`,
/// not `xs:decimal`).
fn coerce_pair(a: &Atomic, b: &Atomic) -> Result<(Atomic, Atomic), Error> {
    let a = untyped_to_double(a)?;
    let b = untyped_to_double(b)?;
    if !a.is_numeric() || !b.is_numeric() {
        return Err(Error::XPTY0004);
    }
    if let (Atomic::Integer { .. }, Atomic::Integer { .. }) = (&a, &b) {
        return Ok((a, b));
    }
    let target = common_numeric_type(a.dynamic_type(), b.dynamic_type()).ok_or(Error::XPTY0004)?;
    Ok((promote_numeric(&a, target)?, promote_numeric(&b, target)?))
}

fn integer_op(op: BinaryOperator, x: &IBig, y: &IBig) -> Result<Atomic, Error> {
    use BinaryOperator::*;
    match op {
        Add => Ok(Atomic::integer(x + y)),
        Sub => Ok(Atomic::integer(x - y)),
        Mul => Ok(Atomic::integer(x * y)),
        // op:numeric-divide on two integers promotes both to xs:decimal.
        Div => {
            let xd = Decimal::from_str(&x.to_string()).map_err(|_| Error::FOCA0001)?;
            let yd = Decimal::from_str(&y.to_string()).map_err(|_| Error::FOCA0001)?;
            decimal_op(Div, xd, yd)
        }
        Mod => {
            if y == &IBig::from(0) {
                return Err(Error::FOAR0001);
            }
            Ok(Atomic::integer(x % y))
        }
        _ => unreachable!("integer_op called with a non-arithmetic operator"),
    }
}

fn decimal_op(op: BinaryOperator, x: Decimal, y: Decimal) -> Result<Atomic, Error> {
    use BinaryOperator::*;
    match op {
        Add => Ok(Atomic::Decimal(x + y)),
        Sub => Ok(Atomic::Decimal(x - y)),
        Mul => Ok(Atomic::Decimal(x * y)),
        Div => {
            if y.is_zero() {
                return Err(Error::FOAR0001);
            }
            Ok(Atomic::Decimal(x / y))
        }
        Mod => {
            if y.is_zero() {
                return Err(Error::FOAR0001);
            }
            Ok(Atomic::Decimal(x % y))
        }
        _ => unreachable!("decimal_op called with a non-arithmetic operator"),
    }
}

/// `+ - * div` on IEEE `f64`: division and multiplication by zero follow
/// IEEE 754 (producing `±INF`/`NaN`) rather than raising, per spec §4.7's
/// "float/double produce ±∞ or NaN" carve-out from the integer/decimal
/// `FOAR0001` rule.
fn float_op(op: BinaryOperator, x: f64, y: f64) -> Result<f64, Error> {
    use BinaryOperator::*;
    Ok(match op {
        Add => x + y,
        Sub => x - y,
        Mul => x * y,
        Div => x / y,
        Mod => x % y,
        _ => unreachable!("float_op called with a non-arithmetic operator"),
    })
}

/// `idiv`: truncating integer division, always `xs:integer`-typed
/// regardless of operand types. Division by zero raises `FOAR0001` for
/// every numeric type (unlike plain `div`/`mod`, which only raise for
/// integer/decimal operands).
fn int_div(a: &Atomic, b: &Atomic) -> Result<Atomic, Error> {
    let (ca, cb) = coerce_pair(a, b)?;
    if let (Atomic::Integer { value: x, .. }, Atomic::Integer { value: y, .. }) = (&ca, &cb) {
        if y == &IBig::from(0) {
            return Err(Error::FOAR0001);
        }
        return Ok(Atomic::integer(x / y));
    }
    let x = ca.as_f64().ok_or(Error::XPTY0004)?;
    let y = cb.as_f64().ok_or(Error::XPTY0004)?;
    if y == 0.0 || !x.is_finite() || !y.is_finite() {
        return Err(Error::FOAR0001);
    }
    let truncated = (x / y).trunc();
    let value = IBig::from_str(&format!("{truncated:.0}")).map_err(|_| Error::FOCA0002)?;
    Ok(Atomic::integer(value))
}
