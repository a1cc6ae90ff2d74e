/// The XPath grammar/feature version selected by the static context
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum XPathVersion {
    /// XPath 1.0: the base grammar only, no FLWOR/conditional/quantified
    /// expressions, no sequence types.
    V1_0,
    /// XPath 2.0: adds FLWOR `for`, `if`, `some`/`every`, sequence types,
    /// `instance of`/`castable as`/`treat as`/`cast as`.
    V2_0,
    /// XPath 3.0: adds `let` in FLWOR tuples and the simple map operator
    /// `!`. The arrow operator `=>` is lexically recognized from this
    /// version on but not parsed.
    V3_0,
    /// XPath 3.1.
    V3_1,
}

impl XPathVersion {
    /// Whether this version's grammar includes the 2.0 constructs (FLWOR,
    /// conditional, quantified, sequence-type tests).
    pub fn supports_xpath2(&self) -> bool {
        *self >= XPathVersion::V2_0
    }

    /// Whether this version's grammar includes the 3.0+ constructs (`let`,
    /// simple map, arrow).
    pub fn supports_xpath3(&self) -> bool {
        *self >= XPathVersion::V3_0
    }
}

impl Default for XPathVersion {
    fn default() -> Self {
        XPathVersion::V3_1
    }
}
