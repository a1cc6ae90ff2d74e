use crate::token::Token;
use crate::version::XPathVersion;

/// An axis name recognized when immediately followed by `::`.
pub const AXIS_NAMES: &[&str] = &[
    "ancestor",
    "ancestor-or-self",
    "attribute",
    "child",
    "descendant",
    "descendant-or-self",
    "following",
    "following-sibling",
    "namespace",
    "parent",
    "preceding",
    "preceding-sibling",
    "self",
];

/// A node-type (kind) test name recognized when immediately followed by
/// `(`.
pub const NODE_TYPE_NAMES: &[&str] = &[
    "text",
    "node",
    "comment",
    "processing-instruction",
    "document-node",
    "element",
    "attribute",
    "schema-element",
    "schema-attribute",
];

/// The grammar class a raw token resolves to once lookahead and version
/// gating have been applied. Keywords that lose their keyword status
/// (wrong version, or an NCName that didn't pass its lookahead check)
/// reclassify as plain names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Ordinary token, used as scanned.
    AsIs,
    /// An NCName-shaped lexeme used as an axis name (followed by `::`).
    AxisName,
    /// An NCName-shaped lexeme used as a node-type test name (followed by
    /// `(`).
    NodeTypeName,
    /// A keyword lexeme that is not available in the active version and
    /// must be treated as a plain NCName instead.
    DowngradedToName,
}

/// Decide how `token` should be classified given one token of lookahead
/// (`next`) and the active grammar version.
///
/// This implements the lexer-level disambiguation the grammar relies on:
/// axis names and node-type test names are not reserved words, so `child`
/// or `text` used as an element name must still work (`child::child` is
/// one axis step selecting elements named `child`). Keywords introduced in
/// later versions (`let`, `idiv`, ...) are downgraded to plain names when
/// an earlier version is selected, so `let` can still be used as a
/// variable/element name under XPath 1.0/2.0 compatibility as applicable.
pub fn classify(token: &Token, next: Option<&Token>, version: XPathVersion) -> TokenClass {
    if let Token::NCName(name) = token {
        if AXIS_NAMES.contains(name) && matches!(next, Some(Token::DoubleColon)) {
            return TokenClass::AxisName;
        }
        if NODE_TYPE_NAMES.contains(name) && matches!(next, Some(Token::LeftParen)) {
            return TokenClass::NodeTypeName;
        }
        return TokenClass::AsIs;
    }

    if minimal_version(token).is_some_and(|min| version < min) {
        return TokenClass::DowngradedToName;
    }

    TokenClass::AsIs
}

/// The earliest version that recognizes `token` as a keyword, or `None`
/// if `token` is not a version-gated keyword (always recognized, or not a
/// keyword at all).
fn minimal_version(token: &Token) -> Option<XPathVersion> {
    use Token::*;
    match token {
        Idiv | To | In | For | Return | If | Then | Else | Some | Every | Satisfies
        | Instance | Of | Castable | Cast | Treat | As | Eq | Ne | Lt | Le | Gt | Ge => {
            Some(XPathVersion::V2_0)
        }
        Let | Try | Catch => Some(XPathVersion::V3_0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_before_double_colon_is_an_axis() {
        let token = Token::NCName("child");
        let class = classify(&token, Some(&Token::DoubleColon), XPathVersion::V2_0);
        assert_eq!(class, TokenClass::AxisName);
    }

    #[test]
    fn child_before_left_paren_is_a_name_not_an_axis() {
        let token = Token::NCName("child");
        let class = classify(&token, Some(&Token::LeftParen), XPathVersion::V2_0);
        assert_eq!(class, TokenClass::AsIs);
    }

    #[test]
    fn text_before_left_paren_is_a_node_type() {
        let token = Token::NCName("text");
        let class = classify(&token, Some(&Token::LeftParen), XPathVersion::V2_0);
        assert_eq!(class, TokenClass::NodeTypeName);
    }

    #[test]
    fn let_keyword_downgrades_to_name_under_xpath2() {
        let class = classify(&Token::Let, None, XPathVersion::V2_0);
        assert_eq!(class, TokenClass::DowngradedToName);
    }

    #[test]
    fn let_keyword_stays_a_keyword_under_xpath3() {
        let class = classify(&Token::Let, None, XPathVersion::V3_0);
        assert_eq!(class, TokenClass::AsIs);
    }

    #[test]
    fn for_keyword_downgrades_to_name_under_xpath1() {
        let class = classify(&Token::For, None, XPathVersion::V1_0);
        assert_eq!(class, TokenClass::DowngradedToName);
    }

    #[test]
    fn exclamation_mark_and_arrow_stay_as_is_before_xpath3() {
        // Unlike `let`/`try`/`catch`, `!` and `=>` are symbol tokens with
        // no NCName spelling, so there is nothing sensible for
        // `keyword_lexeme` to downgrade them to; they classify `AsIs` at
        // every version and are rejected by the parser instead.
        assert_eq!(
            classify(&Token::ExclamationMark, None, XPathVersion::V1_0),
            TokenClass::AsIs
        );
        assert_eq!(
            classify(&Token::Arrow, None, XPathVersion::V2_0),
            TokenClass::AsIs
        );
    }
}
