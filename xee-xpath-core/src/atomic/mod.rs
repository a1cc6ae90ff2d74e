//! Atomic values: the runtime representation of `xs:*`-typed values (spec
//! §3 "Atomic type", §4.3 type promotion/coercion, §4.5 atomization).
//!
//! [`Atomic`] is a closed variant rather than one struct per [`Xs`]
//! member: most of the ~40 schema types share a runtime representation
//! (all integer-derived types are one `IBig`, all string-derived types
//! are one `Rc<str>`) and differ only in which [`Xs`] tag they carry for
//! `instance of`/dynamic-type reporting. This mirrors the teacher's
//! `atomic::types` grouping (`IntegerType`, `StringType`, `BinaryType`)
//! but folds the grouping into the value enum itself instead of a
//! separate type-tag enum per family, since this engine's [`Xs`] is
//! already a single flat enum.

mod arithmetic;
mod cast;
mod compare;
mod promote;

pub use arithmetic::arithmetic;
pub use cast::{cast, castable};
pub use compare::{atomic_eq, general_compare, value_compare, NanAwareOrd};
pub use promote::{common_numeric_type, ebv, untyped_to_double, Ebv};

use std::rc::Rc;

use ibig::IBig;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use xee_name::Name;
use xee_schema_type::Xs;

/// A single atomic value: the unit both atomization and the function
/// library operate on.
#[derive(Debug, Clone)]
pub enum Atomic {
    /// `xs:untypedAtomic`: a node's string value with no declared type.
    Untyped(Rc<str>),
    /// Any of the string-derived types (`xs:string`, `xs:NCName`, ...);
    /// `xs` records exactly which one.
    String { xs: Xs, value: Rc<str> },
    /// `xs:anyURI`.
    AnyUri(Rc<str>),
    /// `xs:QName`.
    QName(Name),
    /// `xs:boolean`.
    Boolean(bool),
    /// Any of the integer-derived types; `xs` records exactly which one.
    Integer { xs: Xs, value: IBig },
    /// `xs:decimal`.
    Decimal(Decimal),
    /// `xs:float`.
    Float(OrderedFloat<f32>),
    /// `xs:double`.
    Double(OrderedFloat<f64>),
    /// Any duration type (`xs:duration`, `xs:yearMonthDuration`,
    /// `xs:dayTimeDuration`), stored as months + seconds per the W3C
    /// duration model.
    Duration {
        xs: Xs,
        months: i64,
        seconds: Decimal,
    },
    /// `xs:dateTime`.
    DateTime {
        value: chrono::NaiveDateTime,
        timezone: Option<chrono::FixedOffset>,
    },
    /// `xs:date`.
    Date {
        value: chrono::NaiveDate,
        timezone: Option<chrono::FixedOffset>,
    },
    /// `xs:time`.
    Time {
        value: chrono::NaiveTime,
        timezone: Option<chrono::FixedOffset>,
    },
    /// The five Gregorian-fragment types (`xs:gYear`, `xs:gYearMonth`,
    /// `xs:gMonthDay`, `xs:gMonth`, `xs:gDay`), kept as their validated
    /// lexical form. No arithmetic is defined on these by the spec's
    /// function set, so a full calendar representation is not warranted
    /// here — see DESIGN.md.
    GregorianFragment { xs: Xs, lexical: Rc<str> },
    /// `xs:base64Binary`.
    Base64Binary(Rc<[u8]>),
    /// `xs:hexBinary`.
    HexBinary(Rc<[u8]>),
}

impl Atomic {
    /// Construct the most specific string-family atomic (`xs:string`
    /// unless a caller needs e.g. `xs:NCName`).
    pub fn string(value: impl Into<Rc<str>>) -> Self {
        Atomic::String {
            xs: Xs::String,
            value: value.into(),
        }
    }

    /// Construct the default integer-family atomic, `xs:integer`.
    pub fn integer(value: impl Into<IBig>) -> Self {
        Atomic::Integer {
            xs: Xs::Integer,
            value: value.into(),
        }
    }

    /// The exact dynamic `xs:*` type of this value (spec §4.4 item-type
    /// matching: "the value's dynamic atomic type").
    pub fn dynamic_type(&self) -> Xs {
        match self {
            Atomic::Untyped(_) => Xs::UntypedAtomic,
            Atomic::String { xs, .. } => *xs,
            Atomic::AnyUri(_) => Xs::AnyURI,
            Atomic::QName(_) => Xs::QName,
            Atomic::Boolean(_) => Xs::Boolean,
            Atomic::Integer { xs, .. } => *xs,
            Atomic::Decimal(_) => Xs::Decimal,
            Atomic::Float(_) => Xs::Float,
            Atomic::Double(_) => Xs::Double,
            Atomic::Duration { xs, .. } => *xs,
            Atomic::DateTime { .. } => Xs::DateTime,
            Atomic::Date { .. } => Xs::Date,
            Atomic::Time { .. } => Xs::Time,
            Atomic::GregorianFragment { xs, .. } => *xs,
            Atomic::Base64Binary(_) => Xs::Base64Binary,
            Atomic::HexBinary(_) => Xs::HexBinary,
        }
    }

    /// Whether this value's dynamic type derives from (or is) `xs`,
    /// per `instance of`/item-type matching (spec §4.4).
    pub fn is_instance_of(&self, xs: Xs) -> bool {
        self.dynamic_type().matches(xs)
    }

    /// The canonical string value, used by `fn:string`, string
    /// concatenation, and string-context promotion (spec §4.3).
    pub fn string_value(&self) -> String {
        match self {
            Atomic::Untyped(s) => s.to_string(),
            Atomic::String { value, .. } => value.to_string(),
            Atomic::AnyUri(s) => s.to_string(),
            Atomic::QName(n) => n.to_display_name(),
            Atomic::Boolean(b) => b.to_string(),
            Atomic::Integer { value, .. } => value.to_string(),
            Atomic::Decimal(d) => d.normalize().to_string(),
            Atomic::Float(f) => format_xpath_float(f.0 as f64),
            Atomic::Double(d) => format_xpath_float(d.0),
            Atomic::Duration {
                xs, months, seconds,
            } => format_duration(*xs, *months, *seconds),
            Atomic::DateTime { value, timezone } => {
                format!("{}{}", value.format("%Y-%m-%dT%H:%M:%S%.f"), format_tz(*timezone))
            }
            Atomic::Date { value, timezone } => {
                format!("{}{}", value.format("%Y-%m-%d"), format_tz(*timezone))
            }
            Atomic::Time { value, timezone } => {
                format!("{}{}", value.format("%H:%M:%S%.f"), format_tz(*timezone))
            }
            Atomic::GregorianFragment { lexical, .. } => lexical.to_string(),
            Atomic::Base64Binary(bytes) => base64_encode(bytes),
            Atomic::HexBinary(bytes) => hex_encode(bytes),
        }
    }

    /// Whether the numeric promotion lattice applies to this value
    /// (spec §4.3).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Atomic::Integer { .. } | Atomic::Decimal(_) | Atomic::Float(_) | Atomic::Double(_)
        )
    }

    /// This value as an `f64`, for numeric operations after promotion to
    /// `xs:double`. Only meaningful when [`Atomic::is_numeric`] is true.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Atomic::Integer { value, .. } => ibig_to_f64(value),
            Atomic::Decimal(d) => d.to_string().parse().ok(),
            Atomic::Float(f) => Some(f.0 as f64),
            Atomic::Double(d) => Some(d.0),
            _ => None,
        }
    }
}

fn ibig_to_f64(value: &IBig) -> Option<f64> {
    value.to_string().parse().ok()
}

/// XPath's canonical double/float-to-string rendering: `NaN`, `INF`,
/// `-INF`, and otherwise plain decimal/exponential notation without
/// Rust's `f64` debug quirks (e.g. no trailing `.0` suppressed, but no
/// `1e0`-style for small exponents either). This is a pragmatic
/// approximation of F&O 17.1.1, sufficient for `fn:string`/EBV/display.
fn format_xpath_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF".to_string() } else { "-INF".to_string() };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }
    let mut s = format!("{value}");
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

fn format_tz(tz: Option<chrono::FixedOffset>) -> String {
    match tz {
        None => String::new(),
        Some(offset) if offset.local_minus_utc() == 0 => "Z".to_string(),
        Some(offset) => offset.to_string(),
    }
}

fn format_duration(xs: Xs, months: i64, seconds: Decimal) -> String {
    let negative = months < 0 || seconds.is_sign_negative();
    let months = months.unsigned_abs();
    let seconds = seconds.abs();
    let years = months / 12;
    let rem_months = months % 12;
    let whole_seconds = seconds.trunc();
    let days = 0u64; // day component folded into seconds below for DayTime
    let _ = days;
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    if xs != Xs::DayTimeDuration {
        if years > 0 {
            out.push_str(&format!("{years}Y"));
        }
        if rem_months > 0 || years == 0 {
            out.push_str(&format!("{rem_months}M"));
        }
    }
    if xs != Xs::YearMonthDuration {
        out.push('T');
        let total_seconds_secs = whole_seconds.to_string();
        out.push_str(&total_seconds_secs);
        out.push('S');
    }
    out
}

fn base64_encode(bytes: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity((bytes.len() + 2) / 3 * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();
        out.push(TABLE[(b0 >> 2) as usize] as char);
        out.push(TABLE[(((b0 & 0x03) << 4) | (b1.unwrap_or(0) >> 4)) as usize] as char);
        if let Some(b1) = b1 {
            out.push(TABLE[(((b1 & 0x0f) << 2) | (b2.unwrap_or(0) >> 6)) as usize] as char);
        } else {
            out.push('=');
        }
        if let Some(b2) = b2 {
            out.push(TABLE[(b2 & 0x3f) as usize] as char);
        } else {
            out.push('=');
        }
    }
    out
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(out, "{b:02X}").unwrap();
    }
    out
}

impl PartialEq for Atomic {
    fn eq(&self, other: &Self) -> bool {
        atomic_eq(self, other).unwrap_or(false)
    }
}
