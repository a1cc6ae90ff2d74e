use logos::{Logos, Span, SpannedIter};

use crate::token::{is_delimiting, Token};

/// Implements the terminal delimination rule the raw `logos` scan does not
/// enforce on its own: two non-delimiting tokens in a row need whitespace
/// between them (`or` followed directly by `else` is two NCNames, not
/// one), and nested `(: ... :)` comments are swallowed here rather than
/// surfacing as tokens.
pub struct RawLexer<'a> {
    spanned: SpannedIter<'a, Token<'a>>,
    last_is_separator: bool,
    last_is_non_delimiting: bool,
}

impl<'a> RawLexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            spanned: Token::lexer(source).spanned(),
            last_is_separator: true,
            last_is_non_delimiting: false,
        }
    }
}

impl<'a> Iterator for RawLexer<'a> {
    type Item = (Result<Token<'a>, ()>, Span);

    fn next(&mut self) -> Option<Self::Item> {
        let token_span = self.spanned.next();
        let (token, span) = match token_span {
            Some((Ok(token), span)) => (token, span),
            Some((Err(()), span)) => return Some((Err(()), span)),
            None => return None,
        };

        match &token {
            Token::Whitespace => {
                self.last_is_separator = true;
                self.next()
            }
            Token::CommentStart => {
                if self.skip_comment().is_err() {
                    return Some((Err(()), span));
                }
                self.last_is_separator = true;
                self.next()
            }
            Token::CommentEnd => Some((Err(()), span)),
            _ if is_delimiting(&token) => {
                self.last_is_separator = false;
                self.last_is_non_delimiting = false;
                Some((Ok(token), span))
            }
            _ => {
                // non-delimiting: needs a preceding separator unless this
                // is the very first token or the previous token was
                // delimiting.
                let ok = !self.last_is_non_delimiting || self.last_is_separator;
                self.last_is_separator = false;
                self.last_is_non_delimiting = true;
                if ok {
                    Some((Ok(token), span))
                } else {
                    Some((Err(()), span))
                }
            }
        }
    }
}

impl<'a> RawLexer<'a> {
    /// Consume a `(:`-introduced comment, tracking nesting depth, up to and
    /// including its matching `:)`. Returns an error if the input ends
    /// before the comment closes.
    fn skip_comment(&mut self) -> Result<(), ()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.spanned.next() {
                Some((Ok(Token::CommentStart), _)) => depth += 1,
                Some((Ok(Token::CommentEnd), _)) => depth -= 1,
                Some((_, _)) => {}
                None => return Err(()),
            }
        }
        Ok(())
    }
}

/// Scan raw (unclassified, version-agnostic) tokens from `source`.
pub fn raw_tokens(source: &str) -> RawLexer<'_> {
    RawLexer::new(source)
}
