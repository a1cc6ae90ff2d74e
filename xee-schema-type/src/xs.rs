/// The XML Schema namespace URI.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// An `xs:*` atomic type. Primitive types and their derived subtypes share
/// one flat enum; [`Xs::parent`] encodes the derivation chain used for
/// `derives_from` and sequence-type matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Xs {
    /// `xs:anyAtomicType`, the root of every atomic type.
    AnyAtomicType,
    /// `xs:untypedAtomic`, the type of a node's string value when no
    /// schema type is known.
    UntypedAtomic,
    /// The abstract `numeric` grouping used by `instance of xs:numeric`;
    /// matched structurally rather than by direct derivation.
    Numeric,
    /// `xs:string`.
    String,
    /// `xs:boolean`.
    Boolean,
    /// `xs:decimal`.
    Decimal,
    /// `xs:integer`.
    Integer,
    /// `xs:nonPositiveInteger`.
    NonPositiveInteger,
    /// `xs:negativeInteger`.
    NegativeInteger,
    /// `xs:nonNegativeInteger`.
    NonNegativeInteger,
    /// `xs:positiveInteger`.
    PositiveInteger,
    /// `xs:long`.
    Long,
    /// `xs:int`.
    Int,
    /// `xs:short`.
    Short,
    /// `xs:byte`.
    Byte,
    /// `xs:unsignedLong`.
    UnsignedLong,
    /// `xs:unsignedInt`.
    UnsignedInt,
    /// `xs:unsignedShort`.
    UnsignedShort,
    /// `xs:unsignedByte`.
    UnsignedByte,
    /// `xs:float`.
    Float,
    /// `xs:double`.
    Double,
    /// `xs:duration`.
    Duration,
    /// `xs:yearMonthDuration`.
    YearMonthDuration,
    /// `xs:dayTimeDuration`.
    DayTimeDuration,
    /// `xs:dateTime`.
    DateTime,
    /// `xs:date`.
    Date,
    /// `xs:time`.
    Time,
    /// `xs:gYearMonth`.
    GYearMonth,
    /// `xs:gYear`.
    GYear,
    /// `xs:gMonthDay`.
    GMonthDay,
    /// `xs:gMonth`.
    GMonth,
    /// `xs:gDay`.
    GDay,
    /// `xs:base64Binary`.
    Base64Binary,
    /// `xs:hexBinary`.
    HexBinary,
    /// `xs:anyURI`.
    AnyURI,
    /// `xs:QName`.
    QName,
    /// `xs:NOTATION`.
    Notation,
    /// `xs:normalizedString`.
    NormalizedString,
    /// `xs:token`.
    Token,
    /// `xs:language`.
    Language,
    /// `xs:NMTOKEN`.
    NMTOKEN,
    /// `xs:Name`.
    Name,
    /// `xs:NCName`.
    NCName,
    /// `xs:ID`.
    ID,
    /// `xs:IDREF`.
    IDREF,
    /// `xs:ENTITY`.
    ENTITY,
}

impl Xs {
    /// Look up an atomic type by namespace and local name, as used when
    /// resolving `xs:integer(...)` constructor calls and `cast as xs:T`
    /// targets. Returns `None` outside the XML Schema namespace.
    pub fn by_name(namespace: Option<&str>, local_name: &str) -> Option<Self> {
        if namespace == Some(XS_NAMESPACE) {
            Xs::by_local_name(local_name)
        } else {
            None
        }
    }

    /// Look up an atomic type by local name alone (namespace assumed).
    pub fn by_local_name(local_name: &str) -> Option<Self> {
        use Xs::*;
        let xs = match local_name {
            "anyAtomicType" => AnyAtomicType,
            "untypedAtomic" => UntypedAtomic,
            "numeric" => Numeric,
            "string" => String,
            "boolean" => Boolean,
            "decimal" => Decimal,
            "integer" => Integer,
            "nonPositiveInteger" => NonPositiveInteger,
            "negativeInteger" => NegativeInteger,
            "nonNegativeInteger" => NonNegativeInteger,
            "positiveInteger" => PositiveInteger,
            "long" => Long,
            "int" => Int,
            "short" => Short,
            "byte" => Byte,
            "unsignedLong" => UnsignedLong,
            "unsignedInt" => UnsignedInt,
            "unsignedShort" => UnsignedShort,
            "unsignedByte" => UnsignedByte,
            "float" => Float,
            "double" => Double,
            "duration" => Duration,
            "yearMonthDuration" => YearMonthDuration,
            "dayTimeDuration" => DayTimeDuration,
            "dateTime" => DateTime,
            "date" => Date,
            "time" => Time,
            "gYearMonth" => GYearMonth,
            "gYear" => GYear,
            "gMonthDay" => GMonthDay,
            "gMonth" => GMonth,
            "gDay" => GDay,
            "base64Binary" => Base64Binary,
            "hexBinary" => HexBinary,
            "anyURI" => AnyURI,
            "QName" => QName,
            "NOTATION" => Notation,
            "normalizedString" => NormalizedString,
            "token" => Token,
            "language" => Language,
            "NMTOKEN" => NMTOKEN,
            "Name" => Name,
            "NCName" => NCName,
            "ID" => ID,
            "IDREF" => IDREF,
            "ENTITY" => ENTITY,
            _ => return None,
        };
        Some(xs)
    }

    /// The XML Schema namespace URI, to which every [`Xs`] belongs.
    pub fn namespace() -> &'static str {
        XS_NAMESPACE
    }

    /// The W3C-spelled local name of this type.
    pub fn local_name(&self) -> &'static str {
        use Xs::*;
        match self {
            AnyAtomicType => "anyAtomicType",
            UntypedAtomic => "untypedAtomic",
            Numeric => "numeric",
            String => "string",
            Boolean => "boolean",
            Decimal => "decimal",
            Integer => "integer",
            NonPositiveInteger => "nonPositiveInteger",
            NegativeInteger => "negativeInteger",
            NonNegativeInteger => "nonNegativeInteger",
            PositiveInteger => "positiveInteger",
            Long => "long",
            Int => "int",
            Short => "short",
            Byte => "byte",
            UnsignedLong => "unsignedLong",
            UnsignedInt => "unsignedInt",
            UnsignedShort => "unsignedShort",
            UnsignedByte => "unsignedByte",
            Float => "float",
            Double => "double",
            Duration => "duration",
            YearMonthDuration => "yearMonthDuration",
            DayTimeDuration => "dayTimeDuration",
            DateTime => "dateTime",
            Date => "date",
            Time => "time",
            GYearMonth => "gYearMonth",
            GYear => "gYear",
            GMonthDay => "gMonthDay",
            GMonth => "gMonth",
            GDay => "gDay",
            Base64Binary => "base64Binary",
            HexBinary => "hexBinary",
            AnyURI => "anyURI",
            QName => "QName",
            Notation => "NOTATION",
            NormalizedString => "normalizedString",
            Token => "token",
            Language => "language",
            NMTOKEN => "NMTOKEN",
            Name => "Name",
            NCName => "NCName",
            ID => "ID",
            IDREF => "IDREF",
            ENTITY => "ENTITY",
        }
    }

    /// The immediate supertype in the derivation chain, or `None` for the
    /// root `xs:anyAtomicType`. `Numeric` is not a real supertype of
    /// anything; it is matched structurally by [`Xs::matches`].
    pub fn parent(&self) -> Option<Xs> {
        use Xs::*;
        match self {
            AnyAtomicType => None,
            Numeric => None,
            UntypedAtomic => Some(AnyAtomicType),
            String => Some(AnyAtomicType),
            Boolean => Some(AnyAtomicType),
            Float => Some(AnyAtomicType),
            Double => Some(AnyAtomicType),
            Decimal => Some(AnyAtomicType),
            Integer => Some(Decimal),
            NonPositiveInteger => Some(Integer),
            NegativeInteger => Some(NonPositiveInteger),
            Long => Some(Integer),
            Int => Some(Long),
            Short => Some(Int),
            Byte => Some(Short),
            NonNegativeInteger => Some(Integer),
            PositiveInteger => Some(NonNegativeInteger),
            UnsignedLong => Some(NonNegativeInteger),
            UnsignedInt => Some(UnsignedLong),
            UnsignedShort => Some(UnsignedInt),
            UnsignedByte => Some(UnsignedShort),
            QName => Some(AnyAtomicType),
            Notation => Some(AnyAtomicType),
            Duration => Some(AnyAtomicType),
            YearMonthDuration => Some(Duration),
            DayTimeDuration => Some(Duration),
            Time => Some(AnyAtomicType),
            GYearMonth => Some(AnyAtomicType),
            GYear => Some(AnyAtomicType),
            GMonthDay => Some(AnyAtomicType),
            GMonth => Some(AnyAtomicType),
            GDay => Some(AnyAtomicType),
            Base64Binary => Some(AnyAtomicType),
            HexBinary => Some(AnyAtomicType),
            AnyURI => Some(AnyAtomicType),
            DateTime => Some(AnyAtomicType),
            Date => Some(AnyAtomicType),
            NormalizedString => Some(String),
            Token => Some(NormalizedString),
            Language => Some(Token),
            NMTOKEN => Some(Token),
            Name => Some(Token),
            NCName => Some(Name),
            ID => Some(NCName),
            IDREF => Some(NCName),
            ENTITY => Some(NCName),
        }
    }

    /// Walk the derivation chain from `self` to the primitive type that
    /// introduces it (the type whose own `primitive()` is itself). Every
    /// non-primitive type chains through `parent()` to a primitive.
    pub fn primitive(&self) -> Xs {
        use Xs::*;
        match self {
            // the 19 W3C primitive atomic types (plus untypedAtomic, which
            // behaves as its own primitive for promotion purposes)
            String | Boolean | Decimal | Float | Double | Duration | DateTime | Time | Date
            | GYearMonth | GYear | GMonthDay | GMonth | GDay | Base64Binary | HexBinary
            | AnyURI | QName | Notation | UntypedAtomic | AnyAtomicType | Numeric => *self,
            _ => self
                .parent()
                .map(|p| p.primitive())
                .unwrap_or(AnyAtomicType),
        }
    }

    /// Whether `self` derives from (is the same as, or a subtype of)
    /// `other`, walking the derivation chain.
    pub fn derives_from(&self, other: Xs) -> bool {
        if self == &other {
            return true;
        }
        match self.parent() {
            Some(parent_type) => parent_type.derives_from(other),
            None => false,
        }
    }

    /// Whether `self` satisfies a declared type `other`, where `other` may
    /// be the abstract `xs:numeric` grouping (integer/decimal/float/double
    /// and their subtypes all match `xs:numeric`).
    pub fn matches(&self, other: Xs) -> bool {
        if other != Xs::Numeric {
            return self.derives_from(other);
        }
        self.is_numeric()
    }

    /// Whether this type is in the numeric promotion lattice
    /// (integer ≤ decimal ≤ float ≤ double).
    pub fn is_numeric(&self) -> bool {
        matches!(self.primitive(), Xs::Decimal | Xs::Float | Xs::Double)
    }

    /// The numeric promotion level used to compute the common type of two
    /// numeric operands (higher promotes lower). Only meaningful when
    /// [`Xs::is_numeric`] is true.
    pub fn numeric_promotion_level(&self) -> Option<u8> {
        if !self.is_numeric() {
            return None;
        }
        Some(match self.primitive() {
            Xs::Decimal if self.derives_from(Xs::Integer) => 0,
            Xs::Decimal => 1,
            Xs::Float => 2,
            Xs::Double => 3,
            _ => unreachable!("is_numeric only accepts decimal/float/double primitives"),
        })
    }

    /// Whether this type string-promotes to `xs:string` in a string
    /// context (`xs:anyURI`, `xs:untypedAtomic`).
    pub fn promotes_to_string(&self) -> bool {
        matches!(self, Xs::AnyURI | Xs::UntypedAtomic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_from() {
        assert!(Xs::Integer.derives_from(Xs::Integer));
        assert!(Xs::Integer.derives_from(Xs::Decimal));
        assert!(Xs::Integer.derives_from(Xs::AnyAtomicType));
        assert!(Xs::Byte.derives_from(Xs::AnyAtomicType));
        assert!(!Xs::String.derives_from(Xs::Decimal));
    }

    #[test]
    fn test_numeric_matching() {
        assert!(Xs::Integer.matches(Xs::Numeric));
        assert!(Xs::Double.matches(Xs::Numeric));
        assert!(!Xs::String.matches(Xs::Numeric));
    }

    #[test]
    fn test_primitive() {
        assert_eq!(Xs::Integer.primitive(), Xs::Decimal);
        assert_eq!(Xs::Byte.primitive(), Xs::Decimal);
        assert_eq!(Xs::NCName.primitive(), Xs::String);
        assert_eq!(Xs::Double.primitive(), Xs::Double);
    }

    #[test]
    fn test_promotion_levels_are_ordered() {
        assert!(Xs::Integer.numeric_promotion_level() < Xs::Decimal.numeric_promotion_level());
        assert!(Xs::Decimal.numeric_promotion_level() < Xs::Float.numeric_promotion_level());
        assert!(Xs::Float.numeric_promotion_level() < Xs::Double.numeric_promotion_level());
    }
}
