//! Version-gated, lookahead-resolving tokenizer for XPath expressions.
//!
//! [`scan`] is the crate's single entry point: it runs the raw `logos`
//! scan, applies terminal delimination and comment skipping ([`lexer`]),
//! and then reclassifies axis names, node-type test names, and
//! version-gated keywords using one token of lookahead ([`reclassify`]).
//! The result is a flat list of [`Token`]s with source spans, ready for
//! the recursive-descent parser to consume.

mod lexer;
mod reclassify;
mod token;
mod version;

pub use reclassify::{classify, TokenClass, AXIS_NAMES, NODE_TYPE_NAMES};
pub use token::Token;
pub use version::XPathVersion;

use logos::Span;

/// A classified token together with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    /// The token, already reclassified against version and lookahead.
    pub token: Token<'a>,
    /// The byte span of the token in the source text.
    pub span: Span,
}

/// A lexical error: the source could not be tokenized at the given span.
/// Every lexical failure, regardless of cause (malformed literal,
/// unterminated comment, unmatched comment end, two non-delimiting
/// tokens glued together) surfaces as this single error shape; the
/// grammar-level XPST0003 classification happens at the parser, which is
/// the layer with enough context to produce a useful message.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    /// The byte span where tokenization failed.
    pub span: Span,
}

/// Scan `source` into a flat sequence of version-resolved, lookahead-
/// resolved tokens.
///
/// Downgraded keywords (e.g. `let` under XPath 2.0) are emitted as
/// `Token::NCName` carrying their original lexeme, so the parser sees a
/// plain name exactly as if the keyword had never existed in this
/// version's grammar. Axis names and node-type test names are left as
/// `Token::NCName`, too: [`classify`] exists precisely so the parser can
/// ask "is this NCName an axis at this position?" with the same one-token
/// lookahead rule, without the lexer needing separate `AxisName` / `NodeType`
/// token variants to keep in sync.
pub fn scan(source: &str, version: XPathVersion) -> Result<Vec<Lexeme<'_>>, LexError> {
    let raw: Vec<_> = lexer::raw_tokens(source).collect();
    let mut lexemes = Vec::with_capacity(raw.len());

    for (i, (result, span)) in raw.iter().enumerate() {
        let token = match result {
            Ok(token) => token.clone(),
            Err(()) => return Err(LexError { span: span.clone() }),
        };

        let next = raw.get(i + 1).and_then(|(r, _)| r.as_ref().ok());
        let token = match classify(&token, next, version) {
            TokenClass::DowngradedToName => Token::NCName(keyword_lexeme(&token)),
            _ => token,
        };

        lexemes.push(Lexeme {
            token,
            span: span.clone(),
        });
    }

    Ok(lexemes)
}

/// The source spelling of a keyword token, used when a version-gated
/// keyword downgrades back into a plain name.
fn keyword_lexeme(token: &Token) -> &'static str {
    use Token::*;
    match token {
        And => "and",
        Or => "or",
        Div => "div",
        Mod => "mod",
        Idiv => "idiv",
        To => "to",
        In => "in",
        For => "for",
        Let => "let",
        Return => "return",
        If => "if",
        Then => "then",
        Else => "else",
        Some => "some",
        Every => "every",
        Satisfies => "satisfies",
        Instance => "instance",
        Of => "of",
        Castable => "castable",
        Cast => "cast",
        Treat => "treat",
        As => "as",
        Eq => "eq",
        Ne => "ne",
        Lt => "lt",
        Le => "le",
        Gt => "gt",
        Ge => "ge",
        Try => "try",
        Catch => "catch",
        _ => unreachable!("keyword_lexeme called on a non-keyword token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str, version: XPathVersion) -> Vec<Token<'_>> {
        scan(source, version)
            .unwrap()
            .into_iter()
            .map(|l| l.token)
            .collect()
    }

    #[test]
    fn scans_arithmetic_expression() {
        let toks = tokens("1 + 2 * 3", XPathVersion::V2_0);
        assert_eq!(
            toks,
            vec![
                Token::IntegerLiteral(1.into()),
                Token::Plus,
                Token::IntegerLiteral(2.into()),
                Token::Asterisk,
                Token::IntegerLiteral(3.into()),
            ]
        );
    }

    #[test]
    fn child_axis_step_keeps_child_as_ncname_for_test() {
        let toks = tokens("child::para", XPathVersion::V2_0);
        assert_eq!(
            toks,
            vec![
                Token::NCName("child"),
                Token::DoubleColon,
                Token::NCName("para"),
            ]
        );
    }

    #[test]
    fn let_is_a_keyword_under_xpath3() {
        let toks = tokens("let $x := 1 return $x", XPathVersion::V3_0);
        assert_eq!(toks[0], Token::Let);
    }

    #[test]
    fn let_downgrades_to_name_under_xpath2() {
        let toks = tokens("let", XPathVersion::V2_0);
        assert_eq!(toks, vec![Token::NCName("let")]);
    }

    #[test]
    fn exclamation_mark_and_arrow_never_downgrade_to_a_name() {
        // `!`/`=>` have no NCName spelling to fall back to, unlike
        // `let`/`try`/`catch`; scanning them under a version that doesn't
        // support them must not reach `keyword_lexeme`'s `unreachable!()`.
        let toks = tokens("1 ! 2", XPathVersion::V2_0);
        assert_eq!(
            toks,
            vec![
                Token::IntegerLiteral(1.into()),
                Token::ExclamationMark,
                Token::IntegerLiteral(2.into()),
            ]
        );
        let toks = tokens("a => b", XPathVersion::V1_0);
        assert_eq!(
            toks,
            vec![Token::NCName("a"), Token::Arrow, Token::NCName("b")]
        );
    }

    #[test]
    fn nested_comments_are_skipped() {
        let toks = tokens("1 (: outer (: inner :) still outer :) + 2", XPathVersion::V2_0);
        assert_eq!(
            toks,
            vec![
                Token::IntegerLiteral(1.into()),
                Token::Plus,
                Token::IntegerLiteral(2.into()),
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let err = scan("1 (: never closed", XPathVersion::V2_0).unwrap_err();
        assert_eq!(err.span, 2..4);
    }

    #[test]
    fn unmatched_comment_end_is_an_error() {
        let err = scan(":) 1", XPathVersion::V2_0).unwrap_err();
        assert_eq!(err.span, 0..2);
    }

    #[test]
    fn number_immediately_followed_by_name_is_an_error() {
        assert!(scan("or-else", XPathVersion::V2_0).is_ok());
        assert!(scan("foo bar", XPathVersion::V2_0).is_ok());
        assert!(scan("1foo", XPathVersion::V2_0).is_err());
    }

    #[test]
    fn string_literal_doubled_quote_escape() {
        let toks = tokens(r#""say ""hi""""#, XPathVersion::V2_0);
        assert_eq!(toks, vec![Token::StringLiteral("say \"hi\"".to_string())]);
    }
}
