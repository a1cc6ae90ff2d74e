use ibig::IBig;
use logos::{Lexer, Logos};
use rust_decimal::Decimal;

/// A single raw lexical token, before version gating and lookahead-
/// sensitive reclassification.
///
/// Numeric and string literal variants carry their decoded value; every
/// other variant is a fixed keyword/operator/structural symbol. `NCName`
/// covers every bare identifier-shaped lexeme, including words that *may*
/// turn out to be axis names, node-type tests, or version-gated keywords —
/// [`crate::reclassify`] resolves that ambiguity with one token of
/// lookahead.
#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(subpattern name_start_char = r"[A-Za-z_\u{c0}-\u{d6}\u{d8}-\u{f6}\u{f8}-\u{2ff}\u{370}-\u{37d}\u{37f}-\u{1fff}\u{200c}-\u{200d}\u{2070}-\u{218f}\u{2c00}-\u{2fef}\u{3001}-\u{d7ff}\u{f900}-\u{fdcf}\u{fdf0}-\u{fffd}\u{10000}-\u{effff}]")]
#[logos(subpattern name_char = r"(?&name_start_char)|[\-\.0-9\u{b7}\u{300}-\u{36f}\u{203f}-\u{2040}]")]
#[logos(subpattern ncname = r"(?&name_start_char)(?&name_char)*")]
pub enum Token<'a> {
    /// Decimal-free integer literal (`123`).
    #[regex(r"[0-9]+", integer_literal, priority = 3)]
    IntegerLiteral(IBig),
    /// A literal with a fractional part but no exponent (`1.5`, `.5`).
    #[regex(r"(\.[0-9]+)|([0-9]+\.[0-9]*)", decimal_literal, priority = 2)]
    DecimalLiteral(Decimal),
    /// A literal with an exponent (`1.5e10`, `1e-3`).
    #[regex(
        r"(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][+-]?[0-9]+)",
        double_literal,
        priority = 2
    )]
    DoubleLiteral(f64),
    /// A quoted string literal; the doubled-delimiter escape (`""`/`''`)
    /// has already been collapsed.
    #[regex(r#""(?:""|[^"])*"|'(?:''|[^'])*'"#, string_literal, priority = 1)]
    StringLiteral(String),
    /// A bare Unicode-identifier-shaped lexeme. Might be an unprefixed
    /// QName, an axis name, a node-type test name, or a version-gated
    /// keyword — see [`crate::reclassify`].
    #[regex(r"(?&ncname)", priority = 2)]
    NCName(&'a str),
    /// `Q{uri}local` braced URI literal (3.0+; tokenized unconditionally,
    /// gated at the parser level).
    #[regex(r#"Q\{[^{}]*\}"#, braced_uri_literal, priority = 4)]
    BracedURILiteral(&'a str),

    /// `!`: the simple map operator (3.0+).
    #[token("!")]
    ExclamationMark,
    /// `!=`.
    #[token("!=")]
    NotEqual,
    /// `$`.
    #[token("$")]
    Dollar,
    /// `(`.
    #[token("(")]
    LeftParen,
    /// `)`.
    #[token(")")]
    RightParen,
    /// `*`: multiplication or wildcard (disambiguated by the parser, spec
    /// §4.1).
    #[token("*")]
    Asterisk,
    /// `*:local` wildcard-prefix name test punctuation.
    #[token("*:")]
    AsteriskColon,
    /// `+`.
    #[token("+")]
    Plus,
    /// `,`.
    #[token(",")]
    Comma,
    /// `-`.
    #[token("-")]
    Minus,
    /// `.`.
    #[token(".")]
    Dot,
    /// `..`.
    #[token("..")]
    DotDot,
    /// `/`.
    #[token("/")]
    Slash,
    /// `//`.
    #[token("//")]
    DoubleSlash,
    /// `:`.
    #[token(":")]
    Colon,
    /// `prefix:*` wildcard-local name test punctuation.
    #[token(":*")]
    ColonAsterisk,
    /// `::`.
    #[token("::")]
    DoubleColon,
    /// `:=`: the `let` binding operator.
    #[token(":=")]
    ColonEqual,
    /// `<`.
    #[token("<")]
    LessThan,
    /// `<=`.
    #[token("<=")]
    LessThanEqual,
    /// `=`.
    #[token("=")]
    Equal,
    /// `=>`: the arrow operator. Lexed but not parsed by this grammar.
    #[token("=>")]
    Arrow,
    /// `>`.
    #[token(">")]
    GreaterThan,
    /// `>=`.
    #[token(">=")]
    GreaterThanEqual,
    /// `?`.
    #[token("?")]
    QuestionMark,
    /// `@`.
    #[token("@")]
    At,
    /// `[`.
    #[token("[")]
    LeftBracket,
    /// `]`.
    #[token("]")]
    RightBracket,
    /// `{`.
    #[token("{")]
    LeftBrace,
    /// `|`.
    #[token("|")]
    Pipe,
    /// `}`.
    #[token("}")]
    RightBrace,

    /// `and` (1.0+).
    #[token("and")]
    And,
    /// `or` (1.0+).
    #[token("or")]
    Or,
    /// `div` (1.0+).
    #[token("div")]
    Div,
    /// `mod` (1.0+).
    #[token("mod")]
    Mod,
    /// `idiv` (2.0+).
    #[token("idiv")]
    Idiv,
    /// `to` (2.0+).
    #[token("to")]
    To,
    /// `in` (2.0+).
    #[token("in")]
    In,
    /// `for` (2.0+).
    #[token("for")]
    For,
    /// `let` (3.0+ FLWOR binding).
    #[token("let")]
    Let,
    /// `return` (2.0+).
    #[token("return")]
    Return,
    /// `if` (2.0+).
    #[token("if")]
    If,
    /// `then` (2.0+).
    #[token("then")]
    Then,
    /// `else` (2.0+).
    #[token("else")]
    Else,
    /// `some` (2.0+).
    #[token("some")]
    Some,
    /// `every` (2.0+).
    #[token("every")]
    Every,
    /// `satisfies` (2.0+).
    #[token("satisfies")]
    Satisfies,
    /// `instance` (2.0+).
    #[token("instance")]
    Instance,
    /// `of` (2.0+).
    #[token("of")]
    Of,
    /// `castable` (2.0+).
    #[token("castable")]
    Castable,
    /// `cast` (2.0+).
    #[token("cast")]
    Cast,
    /// `treat` (2.0+).
    #[token("treat")]
    Treat,
    /// `as` (2.0+).
    #[token("as")]
    As,
    /// `eq` (2.0+ value comparison).
    #[token("eq")]
    Eq,
    /// `ne` (2.0+ value comparison).
    #[token("ne")]
    Ne,
    /// `lt` (2.0+ value comparison).
    #[token("lt")]
    Lt,
    /// `le` (2.0+ value comparison).
    #[token("le")]
    Le,
    /// `gt` (2.0+ value comparison).
    #[token("gt")]
    Gt,
    /// `ge` (2.0+ value comparison).
    #[token("ge")]
    Ge,
    /// `try` (3.0+, supplement).
    #[token("try")]
    Try,
    /// `catch` (3.0+, supplement).
    #[token("catch")]
    Catch,

    /// Whitespace, discarded by the terminal-delimination pass.
    #[regex(r"[\u{20}\u{9}\u{d}\u{a}]+", priority = 4)]
    Whitespace,
    /// `(:`, the start of a (nestable) comment.
    #[regex(r"\(:")]
    CommentStart,
    /// `:)`, the end of a comment.
    #[regex(r":\)")]
    CommentEnd,
}

fn integer_literal<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<IBig> {
    IBig::from_str_radix(lex.slice(), 10).ok()
}

fn decimal_literal<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<Decimal> {
    lex.slice().parse().ok()
}

fn double_literal<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn string_literal<'a>(lex: &mut Lexer<'a, Token<'a>>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    if slice.starts_with('"') {
        inner.replace("\"\"", "\"")
    } else {
        inner.replace("''", "'")
    }
}

fn braced_uri_literal<'a>(lex: &mut Lexer<'a, Token<'a>>) -> &'a str {
    let slice = lex.slice();
    &slice[2..slice.len() - 1]
}

/// Whether a raw token is a "delimiting" terminal symbol under A.2.2
/// terminal delimination: delimiting symbols never need a following
/// separator, non-delimiting ones (identifiers, keywords, numbers) do.
pub(crate) fn is_delimiting(token: &Token) -> bool {
    use Token::*;
    !matches!(
        token,
        IntegerLiteral(_)
            | DecimalLiteral(_)
            | DoubleLiteral(_)
            | NCName(_)
            | And
            | Or
            | Div
            | Mod
            | Idiv
            | To
            | In
            | For
            | Let
            | Return
            | If
            | Then
            | Else
            | Some
            | Every
            | Satisfies
            | Instance
            | Of
            | Castable
            | Cast
            | Treat
            | As
            | Eq
            | Ne
            | Lt
            | Le
            | Gt
            | Ge
            | Try
            | Catch
    )
}
