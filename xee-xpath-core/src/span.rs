/// A byte-offset source span, carried by errors so a host can underline
/// the offending subexpression. Cheap to copy, unlike
/// [`xee_xpath_ast::Span`] which is a `Range<usize>` without `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<xee_xpath_ast::Span> for SourceSpan {
    fn from(span: xee_xpath_ast::Span) -> Self {
        SourceSpan {
            start: span.start,
            end: span.end,
        }
    }
}
