use xee_name::{Name, Namespaces};
use xee_schema_type::Xs;
use xee_xpath_lexer::{classify, Lexeme, Token, TokenClass, XPathVersion};
use xee_xpath_type::{KindTest, NameConstraint, NodeKind, Occurrence};

use crate::ast::*;
use crate::error::ParserError;
use crate::span::{spanned, Span, Spanned};

type PResult<T> = Result<T, ParserError>;

/// Parse a complete XPath expression.
pub fn parse_xpath(
    source: &str,
    namespaces: &Namespaces,
    version: XPathVersion,
) -> PResult<XPath> {
    let lexemes = xee_xpath_lexer::scan(source, version)
        .map_err(|e| ParserError::LexError { span: e.span })?;
    let mut parser = Parser::new(&lexemes, namespaces, version);
    let expr = parser.parse_expr()?;
    if parser.pos != parser.lexemes.len() {
        return Err(ParserError::TrailingTokens {
            span: parser.current_span(),
        });
    }
    let span = 0..source.len();
    Ok(XPath(spanned(expr, span)))
}

struct Parser<'a> {
    lexemes: &'a [Lexeme<'a>],
    pos: usize,
    namespaces: &'a Namespaces,
    version: XPathVersion,
}

impl<'a> Parser<'a> {
    fn new(lexemes: &'a [Lexeme<'a>], namespaces: &'a Namespaces, version: XPathVersion) -> Self {
        Self {
            lexemes,
            pos: 0,
            namespaces,
            version,
        }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.lexemes.get(self.pos).map(|l| &l.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'a>> {
        self.lexemes.get(self.pos + offset).map(|l| &l.token)
    }

    fn current_span(&self) -> Span {
        self.lexemes
            .get(self.pos)
            .map(|l| l.span.clone())
            .unwrap_or_else(|| self.eof_span())
    }

    fn eof_span(&self) -> Span {
        self.lexemes
            .last()
            .map(|l| l.span.end..l.span.end)
            .unwrap_or(0..0)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek().cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token<'a>) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token<'a>) -> PResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(ParserError::UnexpectedToken {
                span: self.current_span(),
            })
        }
    }

    fn peek_is_ncname(&self, name: &str) -> bool {
        matches!(self.peek(), Some(Token::NCName(s)) if *s == name)
    }

    fn expect_ncname(&mut self) -> PResult<&'a str> {
        match self.advance() {
            Some(Token::NCName(s)) => Ok(s),
            _ => Err(ParserError::UnexpectedToken {
                span: self.current_span(),
            }),
        }
    }

    // EQName -> QName | URIQualifiedName; prefixed names are resolved
    // against the in-scope namespaces immediately (XPST0081 on failure).
    fn parse_eqname(&mut self) -> PResult<NameS> {
        let start = self.current_span().start;
        if let Some(Token::BracedURILiteral(uri)) = self.peek().cloned() {
            self.advance();
            let local = self.expect_ncname()?;
            let end = self.current_span().start;
            return Ok(spanned(Name::uri_qualified(uri, local), start..end));
        }
        let first = self.expect_ncname()?;
        if self.eat(&Token::Colon) {
            let local = self.expect_ncname()?;
            let end = self.current_span().start;
            let name = Name::prefixed(first, local, self.namespaces).ok_or_else(|| {
                ParserError::UnknownPrefix {
                    span: start..end,
                    prefix: first.to_string(),
                }
            })?;
            Ok(spanned(name, start..end))
        } else {
            let end = self.current_span().start;
            Ok(spanned(Name::unprefixed(first), start..end))
        }
    }

    // Resolve an EQName used in a type position (`cast as xs:integer`) to
    // a schema atomic type.
    fn parse_type_name(&mut self) -> PResult<Xs> {
        let name = self.parse_eqname()?;
        Xs::by_name(name.value.namespace(), name.value.local_name()).ok_or(
            ParserError::UnknownType {
                span: name.span.clone(),
                name: name.value,
            },
        )
    }

    // --- top level -------------------------------------------------

    fn parse_expr(&mut self) -> PResult<Expr> {
        let mut items = vec![self.parse_expr_single()?];
        while self.eat(&Token::Comma) {
            items.push(self.parse_expr_single()?);
        }
        Ok(Expr(items))
    }

    fn parse_expr_single(&mut self) -> PResult<ExprSingleS> {
        match self.peek() {
            Some(Token::For) | Some(Token::Let) => self.parse_flwor(),
            Some(Token::Some) | Some(Token::Every) => self.parse_quantified(),
            Some(Token::If) => self.parse_if(),
            Some(Token::Try) => self.parse_try_catch(),
            _ => self.parse_or_expr(),
        }
    }

    // `try { Expr } catch * { Expr }`. Only reachable once the lexer hands
    // back `Try`/`Catch` tokens, which it only does from XPath 3.0 on (see
    // `reclassify::minimal_version`), so no extra version check is needed
    // here.
    fn parse_try_catch(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        self.expect(&Token::Try)?;
        self.expect(&Token::LeftBrace)?;
        let try_start = self.current_span().start;
        let try_inner = self.parse_expr()?;
        let try_end = self.current_span().start;
        let try_expr = Box::new(spanned(try_inner, try_start..try_end));
        self.expect(&Token::RightBrace)?;
        self.expect(&Token::Catch)?;
        self.expect(&Token::Asterisk)?;
        self.expect(&Token::LeftBrace)?;
        let catch_start = self.current_span().start;
        let catch_inner = self.parse_expr()?;
        let catch_end = self.current_span().start;
        let catch_expr = Box::new(spanned(catch_inner, catch_start..catch_end));
        self.expect(&Token::RightBrace)?;
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::TryCatch(TryCatchExpr {
                try_expr,
                catch_expr,
            }),
            start..end,
        ))
    }

    fn parse_flwor(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut clauses = Vec::new();
        loop {
            if self.eat(&Token::For) {
                loop {
                    let var_name = self.parse_var_name()?;
                    self.expect(&Token::In)?;
                    let var_expr = Box::new(self.parse_expr_single()?);
                    clauses.push(FlworClause::For(ForClause { var_name, var_expr }));
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else if self.eat(&Token::Let) {
                loop {
                    let var_name = self.parse_var_name()?;
                    self.expect(&Token::ColonEqual)?;
                    let var_expr = Box::new(self.parse_expr_single()?);
                    clauses.push(FlworClause::Let(LetClause { var_name, var_expr }));
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        self.expect(&Token::Return)?;
        let return_expr = Box::new(self.parse_expr_single()?);
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::For(FlworExpr {
                clauses,
                return_expr,
            }),
            start..end,
        ))
    }

    fn parse_quantified(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let quantifier = if self.eat(&Token::Some) {
            Quantifier::Some
        } else {
            self.expect(&Token::Every)?;
            Quantifier::Every
        };
        let mut bindings = Vec::new();
        loop {
            let var_name = self.parse_var_name()?;
            self.expect(&Token::In)?;
            let var_expr = Box::new(self.parse_expr_single()?);
            bindings.push(QuantifiedBinding { var_name, var_expr });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Satisfies)?;
        let satisfies_expr = Box::new(self.parse_expr_single()?);
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::Quantified(QuantifiedExpr {
                quantifier,
                bindings,
                satisfies_expr,
            }),
            start..end,
        ))
    }

    fn parse_var_name(&mut self) -> PResult<NameS> {
        self.expect(&Token::Dollar)?;
        self.parse_eqname()
    }

    fn parse_if(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        self.expect(&Token::If)?;
        self.expect(&Token::LeftParen)?;
        let condition_start = self.current_span().start;
        let condition_expr = self.parse_expr()?;
        let condition_end = self.current_span().start;
        let condition = Box::new(spanned(condition_expr, condition_start..condition_end));
        self.expect(&Token::RightParen)?;
        self.expect(&Token::Then)?;
        let then = Box::new(self.parse_expr_single()?);
        self.expect(&Token::Else)?;
        let else_ = Box::new(self.parse_expr_single()?);
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::If(IfExpr {
                condition,
                then,
                else_,
            }),
            start..end,
        ))
    }

    // --- operator precedence chain ----------------------------------
    // Or -> And -> Comparison -> Range -> Additive -> Multiplicative ->
    // Unary -> type-test suite -> SimpleMap -> Union -> PathExpr.

    fn parse_or_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut left = self.parse_and_expr()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and_expr()?;
            let end = self.current_span().start;
            left = spanned(binary(BinaryOperator::Or, left, right), start..end);
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut left = self.parse_comparison_expr()?;
        while self.eat(&Token::And) {
            let right = self.parse_comparison_expr()?;
            let end = self.current_span().start;
            left = spanned(binary(BinaryOperator::And, left, right), start..end);
        }
        Ok(left)
    }

    fn parse_comparison_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let left = self.parse_range_expr()?;
        let op = match self.peek() {
            Some(Token::Equal) => Some(BinaryOperator::GenEq),
            Some(Token::NotEqual) => Some(BinaryOperator::GenNe),
            Some(Token::LessThan) => Some(BinaryOperator::GenLt),
            Some(Token::LessThanEqual) => Some(BinaryOperator::GenLe),
            Some(Token::GreaterThan) => Some(BinaryOperator::GenGt),
            Some(Token::GreaterThanEqual) => Some(BinaryOperator::GenGe),
            Some(Token::Eq) => Some(BinaryOperator::ValueEq),
            Some(Token::Ne) => Some(BinaryOperator::ValueNe),
            Some(Token::Lt) => Some(BinaryOperator::ValueLt),
            Some(Token::Le) => Some(BinaryOperator::ValueLe),
            Some(Token::Gt) => Some(BinaryOperator::ValueGt),
            Some(Token::Ge) => Some(BinaryOperator::ValueGe),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let right = self.parse_range_expr()?;
            let end = self.current_span().start;
            Ok(spanned(binary(op, left, right), start..end))
        } else {
            Ok(left)
        }
    }

    fn parse_range_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let left = self.parse_additive_expr()?;
        if self.eat(&Token::To) {
            let right = self.parse_additive_expr()?;
            let end = self.current_span().start;
            Ok(spanned(binary(BinaryOperator::Range, left, right), start..end))
        } else {
            Ok(left)
        }
    }

    fn parse_additive_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut left = self.parse_multiplicative_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expr()?;
            let end = self.current_span().start;
            left = spanned(binary(op, left, right), start..end);
        }
        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut left = self.parse_unary_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Asterisk) => BinaryOperator::Mul,
                Some(Token::Div) => BinaryOperator::Div,
                Some(Token::Idiv) => BinaryOperator::IntDiv,
                Some(Token::Mod) => BinaryOperator::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expr()?;
            let end = self.current_span().start;
            left = spanned(binary(op, left, right), start..end);
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut ops = Vec::new();
        loop {
            if self.eat(&Token::Plus) {
                ops.push(UnaryOperator::Plus);
            } else if self.eat(&Token::Minus) {
                ops.push(UnaryOperator::Minus);
            } else {
                break;
            }
        }
        let mut operand = self.parse_type_test_expr()?;
        let end = self.current_span().start;
        for op in ops.into_iter().rev() {
            operand = spanned(
                ExprSingle::Unary(UnaryExpr {
                    operator: op,
                    operand: Box::new(operand),
                }),
                start..end,
            );
        }
        Ok(operand)
    }

    fn parse_type_test_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut operand = self.parse_simple_map_expr()?;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(Token::Instance), Some(Token::Of)) => {
                    self.advance();
                    self.advance();
                    let sequence_type = self.parse_sequence_type()?;
                    let end = self.current_span().start;
                    operand = spanned(
                        ExprSingle::InstanceOf(InstanceOfExpr {
                            operand: Box::new(operand),
                            sequence_type,
                        }),
                        start..end,
                    );
                }
                (Some(Token::Treat), Some(Token::As)) => {
                    self.advance();
                    self.advance();
                    let sequence_type = self.parse_sequence_type()?;
                    let end = self.current_span().start;
                    operand = spanned(
                        ExprSingle::TreatAs(TreatAsExpr {
                            operand: Box::new(operand),
                            sequence_type,
                        }),
                        start..end,
                    );
                }
                (Some(Token::Castable), Some(Token::As)) => {
                    self.advance();
                    self.advance();
                    let single_type = self.parse_single_type()?;
                    let end = self.current_span().start;
                    operand = spanned(
                        ExprSingle::CastableAs(CastableAsExpr {
                            operand: Box::new(operand),
                            single_type,
                        }),
                        start..end,
                    );
                }
                (Some(Token::Cast), Some(Token::As)) => {
                    self.advance();
                    self.advance();
                    let single_type = self.parse_single_type()?;
                    let end = self.current_span().start;
                    operand = spanned(
                        ExprSingle::CastAs(CastAsExpr {
                            operand: Box::new(operand),
                            single_type,
                        }),
                        start..end,
                    );
                }
                _ => break,
            }
        }
        Ok(operand)
    }

    fn parse_single_type(&mut self) -> PResult<SingleType> {
        let name = self.parse_eqname()?;
        let optional = self.eat(&Token::QuestionMark);
        Ok(SingleType { name, optional })
    }

    fn parse_sequence_type(&mut self) -> PResult<SequenceType> {
        if self.peek_is_ncname("empty-sequence") && matches!(self.peek_at(1), Some(Token::LeftParen))
        {
            self.advance();
            self.advance();
            self.expect(&Token::RightParen)?;
            return Ok(SequenceType::Empty);
        }
        let item_type = self.parse_item_type()?;
        let occurrence = match self.peek() {
            Some(Token::QuestionMark) => {
                self.advance();
                Occurrence::Option
            }
            Some(Token::Asterisk) => {
                self.advance();
                Occurrence::Many
            }
            Some(Token::Plus) => {
                self.advance();
                Occurrence::NonEmpty
            }
            _ => Occurrence::One,
        };
        Ok(SequenceType::new(item_type, occurrence))
    }

    fn parse_item_type(&mut self) -> PResult<ItemType> {
        if self.peek_is_ncname("item") && matches!(self.peek_at(1), Some(Token::LeftParen)) {
            self.advance();
            self.advance();
            self.expect(&Token::RightParen)?;
            return Ok(ItemType::Item);
        }
        if self.at_kind_test_start() {
            return Ok(ItemType::KindTest(self.parse_kind_test()?));
        }
        let xs = self.parse_type_name()?;
        Ok(ItemType::AtomicOrUnionType(xs))
    }

    // --- simple map / union / path -----------------------------------

    fn parse_simple_map_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let first = self.parse_union_expr()?;
        if !self.version.supports_xpath3() || !matches!(self.peek(), Some(Token::ExclamationMark)) {
            return Ok(first);
        }
        let mut stages = vec![first];
        while self.eat(&Token::ExclamationMark) {
            stages.push(self.parse_union_expr()?);
        }
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::SimpleMap(SimpleMapExpr { stages }),
            start..end,
        ))
    }

    fn parse_union_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let mut left = self.parse_path_expr()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path_expr()?;
            let end = self.current_span().start;
            left = spanned(binary(BinaryOperator::Union, left, right), start..end);
        }
        Ok(left)
    }

    fn parse_path_expr(&mut self) -> PResult<ExprSingleS> {
        let start = self.current_span().start;
        let (rooted, steps) = if self.eat(&Token::DoubleSlash) {
            let mut steps = vec![descendant_or_self_step(start..start)];
            steps.extend(self.parse_relative_path_steps()?);
            (Rootedness::AbsoluteDescendant, steps)
        } else if self.eat(&Token::Slash) {
            if self.starts_step() {
                (Rootedness::Absolute, self.parse_relative_path_steps()?)
            } else {
                (Rootedness::Absolute, Vec::new())
            }
        } else {
            (Rootedness::Relative, self.parse_relative_path_steps()?)
        };
        let end = self.current_span().start;
        Ok(spanned(
            ExprSingle::Path(PathExpr { rooted, steps }),
            start..end,
        ))
    }

    fn parse_relative_path_steps(&mut self) -> PResult<Vec<StepExprS>> {
        let mut steps = vec![self.parse_step_expr()?];
        loop {
            if self.eat(&Token::DoubleSlash) {
                let span = self.current_span();
                steps.push(descendant_or_self_step(span.start..span.start));
                steps.push(self.parse_step_expr()?);
            } else if self.eat(&Token::Slash) {
                steps.push(self.parse_step_expr()?);
            } else {
                break;
            }
        }
        Ok(steps)
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::DotDot)
                | Some(Token::At)
                | Some(Token::NCName(_))
                | Some(Token::Asterisk)
                | Some(Token::AsteriskColon)
                | Some(Token::BracedURILiteral(_))
                | Some(Token::Dot)
                | Some(Token::Dollar)
                | Some(Token::LeftParen)
                | Some(Token::IntegerLiteral(_))
                | Some(Token::DecimalLiteral(_))
                | Some(Token::DoubleLiteral(_))
                | Some(Token::StringLiteral(_))
        )
    }

    fn parse_step_expr(&mut self) -> PResult<StepExprS> {
        let start = self.current_span().start;

        if self.eat(&Token::DotDot) {
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis: Axis::Parent,
                    node_test: NodeTest::KindTest(KindTest::any_node()),
                    predicates,
                }),
                start..end,
            ));
        }

        if self.eat(&Token::At) {
            let node_test = self.parse_node_test()?;
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis: Axis::Attribute,
                    node_test,
                    predicates,
                }),
                start..end,
            ));
        }

        if let Some(Token::NCName(name)) = self.peek().cloned() {
            if matches!(
                classify(&Token::NCName(name), self.peek_at(1), self.version),
                TokenClass::AxisName
            ) {
                self.advance();
                self.advance(); // `::`
                let axis = axis_from_name(name);
                let node_test = self.parse_node_test()?;
                let predicates = self.parse_predicates()?;
                let end = self.current_span().start;
                return Ok(spanned(
                    StepExpr::AxisStep(AxisStep {
                        axis,
                        node_test,
                        predicates,
                    }),
                    start..end,
                ));
            }
        }

        if self.at_kind_test_start() {
            let kind_test = self.parse_kind_test()?;
            let axis = axis_for_kind_test(&kind_test);
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis,
                    node_test: NodeTest::KindTest(kind_test),
                    predicates,
                }),
                start..end,
            ));
        }

        if matches!(self.peek(), Some(Token::Asterisk)) {
            self.advance();
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis: Axis::Child,
                    node_test: NodeTest::NameTest(NameTest::Star),
                    predicates,
                }),
                start..end,
            ));
        }

        if matches!(self.peek(), Some(Token::AsteriskColon)) {
            self.advance();
            let local = self.expect_ncname()?;
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis: Axis::Child,
                    node_test: NodeTest::NameTest(NameTest::LocalName(local.to_string())),
                    predicates,
                }),
                start..end,
            ));
        }

        if let Some(Token::BracedURILiteral(uri)) = self.peek().cloned() {
            self.advance();
            let node_test = if self.eat(&Token::Asterisk) {
                NodeTest::NameTest(NameTest::Namespace(uri.to_string()))
            } else {
                let local = self.expect_ncname()?;
                let name = Name::uri_qualified(uri, local)
                    .with_default_namespace(Some(self.namespaces.default_element_namespace()));
                NodeTest::NameTest(NameTest::Name(spanned(name, start..self.current_span().start)))
            };
            let predicates = self.parse_predicates()?;
            let end = self.current_span().start;
            return Ok(spanned(
                StepExpr::AxisStep(AxisStep {
                    axis: Axis::Child,
                    node_test,
                    predicates,
                }),
                start..end,
            ));
        }

        if matches!(self.peek(), Some(Token::NCName(_))) {
            if matches!(self.peek_at(1), Some(Token::ColonAsterisk)) {
                let prefix = self.expect_ncname()?;
                self.advance();
                let namespace = self.namespaces.by_prefix(prefix).ok_or_else(|| {
                    ParserError::UnknownPrefix {
                        span: start..self.current_span().start,
                        prefix: prefix.to_string(),
                    }
                })?;
                let predicates = self.parse_predicates()?;
                let end = self.current_span().start;
                return Ok(spanned(
                    StepExpr::AxisStep(AxisStep {
                        axis: Axis::Child,
                        node_test: NodeTest::NameTest(NameTest::Namespace(namespace.to_string())),
                        predicates,
                    }),
                    start..end,
                ));
            }

            let save = self.pos;
            let name = self.parse_eqname()?;
            if matches!(self.peek(), Some(Token::LeftParen)) {
                self.pos = save;
            } else {
                let name = name.map_value(|n| {
                    n.with_default_namespace(Some(self.namespaces.default_element_namespace()))
                });
                let predicates = self.parse_predicates()?;
                let end = self.current_span().start;
                return Ok(spanned(
                    StepExpr::AxisStep(AxisStep {
                        axis: Axis::Child,
                        node_test: NodeTest::NameTest(NameTest::Name(name)),
                        predicates,
                    }),
                    start..end,
                ));
            }
        }

        let primary = self.parse_primary_expr()?;
        let predicates = self.parse_predicates()?;
        let end = self.current_span().start;
        Ok(spanned(
            StepExpr::PostfixExpr { primary, predicates },
            start..end,
        ))
    }

    fn parse_predicates(&mut self) -> PResult<Vec<ExprS>> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LeftBracket) {
            let start = self.current_span().start;
            let expr = self.parse_expr()?;
            let end = self.current_span().start;
            self.expect(&Token::RightBracket)?;
            predicates.push(spanned(expr, start..end));
        }
        Ok(predicates)
    }

    fn parse_node_test(&mut self) -> PResult<NodeTest> {
        if self.at_kind_test_start() {
            return Ok(NodeTest::KindTest(self.parse_kind_test()?));
        }
        if self.eat(&Token::Asterisk) {
            return Ok(NodeTest::NameTest(NameTest::Star));
        }
        if self.eat(&Token::AsteriskColon) {
            let local = self.expect_ncname()?;
            return Ok(NodeTest::NameTest(NameTest::LocalName(local.to_string())));
        }
        if matches!(self.peek(), Some(Token::NCName(_)))
            && matches!(self.peek_at(1), Some(Token::ColonAsterisk))
        {
            let prefix = self.expect_ncname()?;
            self.advance();
            let namespace = self
                .namespaces
                .by_prefix(prefix)
                .ok_or_else(|| ParserError::UnknownPrefix {
                    span: self.current_span(),
                    prefix: prefix.to_string(),
                })?;
            return Ok(NodeTest::NameTest(NameTest::Namespace(
                namespace.to_string(),
            )));
        }
        if let Some(Token::BracedURILiteral(uri)) = self.peek().cloned() {
            self.advance();
            if self.eat(&Token::Asterisk) {
                return Ok(NodeTest::NameTest(NameTest::Namespace(uri.to_string())));
            }
            let local = self.expect_ncname()?;
            let span = self.current_span();
            return Ok(NodeTest::NameTest(NameTest::Name(spanned(
                Name::uri_qualified(uri, local),
                span,
            ))));
        }
        let name = self.parse_eqname()?;
        Ok(NodeTest::NameTest(NameTest::Name(name)))
    }

    fn at_kind_test_start(&self) -> bool {
        match self.peek() {
            Some(Token::NCName(name)) => matches!(
                classify(&Token::NCName(*name), self.peek_at(1), self.version),
                TokenClass::NodeTypeName
            ),
            _ => false,
        }
    }

    fn parse_kind_test(&mut self) -> PResult<KindTest> {
        let name = self.expect_ncname()?;
        self.expect(&Token::LeftParen)?;
        let kind_test = match name {
            "text" => KindTest::kind(NodeKind::Text),
            "comment" => KindTest::kind(NodeKind::Comment),
            "node" => KindTest::any_node(),
            "namespace-node" => KindTest::kind(NodeKind::Namespace),
            "processing-instruction" => {
                let name_constraint = match self.peek().cloned() {
                    Some(Token::NCName(s)) => {
                        self.advance();
                        Some(NameConstraint::Literal(s.to_string()))
                    }
                    Some(Token::StringLiteral(s)) => {
                        self.advance();
                        Some(NameConstraint::Literal(s))
                    }
                    _ => None,
                };
                KindTest {
                    node_kind: Some(NodeKind::ProcessingInstruction),
                    name: name_constraint,
                    type_name: None,
                }
            }
            "document-node" => KindTest {
                node_kind: Some(NodeKind::Document),
                name: None,
                type_name: None,
            },
            "element" => self.parse_element_or_attribute_test(NodeKind::Element)?,
            "attribute" => self.parse_element_or_attribute_test(NodeKind::Attribute)?,
            "schema-element" => {
                let local = self.expect_ncname()?;
                KindTest {
                    node_kind: Some(NodeKind::Element),
                    name: Some(NameConstraint::Name(Name::unprefixed(local))),
                    type_name: None,
                }
            }
            "schema-attribute" => {
                let local = self.expect_ncname()?;
                KindTest {
                    node_kind: Some(NodeKind::Attribute),
                    name: Some(NameConstraint::Name(Name::unprefixed(local))),
                    type_name: None,
                }
            }
            _ => {
                return Err(ParserError::UnexpectedToken {
                    span: self.current_span(),
                })
            }
        };
        self.expect(&Token::RightParen)?;
        Ok(kind_test)
    }

    fn parse_element_or_attribute_test(&mut self, node_kind: NodeKind) -> PResult<KindTest> {
        if matches!(self.peek(), Some(Token::RightParen)) {
            return Ok(KindTest {
                node_kind: Some(node_kind),
                name: None,
                type_name: None,
            });
        }
        let name = if self.eat(&Token::Asterisk) {
            NameConstraint::Wildcard
        } else {
            let eqname = self.parse_eqname()?;
            NameConstraint::Name(eqname.value)
        };
        let type_name = if self.eat(&Token::Comma) {
            let xs = self.parse_type_name()?;
            self.eat(&Token::QuestionMark);
            Some(xs)
        } else {
            None
        };
        Ok(KindTest {
            node_kind: Some(node_kind),
            name: Some(name),
            type_name,
        })
    }

    fn parse_primary_expr(&mut self) -> PResult<PrimaryExprS> {
        let start = self.current_span().start;
        let expr = match self.peek().cloned() {
            Some(Token::IntegerLiteral(n)) => {
                self.advance();
                PrimaryExpr::Literal(Literal::Integer(n))
            }
            Some(Token::DecimalLiteral(d)) => {
                self.advance();
                PrimaryExpr::Literal(Literal::Decimal(d))
            }
            Some(Token::DoubleLiteral(f)) => {
                self.advance();
                PrimaryExpr::Literal(Literal::Double(ordered_float::OrderedFloat(f)))
            }
            Some(Token::StringLiteral(s)) => {
                self.advance();
                PrimaryExpr::Literal(Literal::String(s))
            }
            Some(Token::Dollar) => {
                let name = self.parse_var_name()?;
                PrimaryExpr::VarRef(name.value)
            }
            Some(Token::Dot) => {
                self.advance();
                PrimaryExpr::ContextItem
            }
            Some(Token::LeftParen) => {
                self.advance();
                if self.eat(&Token::RightParen) {
                    PrimaryExpr::Parenthesized(spanned(Expr(Vec::new()), start..start))
                } else {
                    let inner_start = self.current_span().start;
                    let expr = self.parse_expr()?;
                    let inner_end = self.current_span().start;
                    self.expect(&Token::RightParen)?;
                    PrimaryExpr::Parenthesized(spanned(expr, inner_start..inner_end))
                }
            }
            Some(Token::NCName(_)) | Some(Token::BracedURILiteral(_)) => {
                let name = self.parse_eqname()?;
                self.expect(&Token::LeftParen)?;
                let arguments = self.parse_argument_list()?;
                self.expect(&Token::RightParen)?;
                PrimaryExpr::FunctionCall(FunctionCall { name, arguments })
            }
            _ => {
                return Err(ParserError::UnexpectedToken {
                    span: self.current_span(),
                })
            }
        };
        let end = self.current_span().start;
        Ok(spanned(expr, start..end))
    }

    fn parse_argument_list(&mut self) -> PResult<Vec<ExprSingleS>> {
        if matches!(self.peek(), Some(Token::RightParen)) {
            return Ok(Vec::new());
        }
        let mut args = vec![self.parse_expr_single()?];
        while self.eat(&Token::Comma) {
            args.push(self.parse_expr_single()?);
        }
        Ok(args)
    }
}

fn binary(operator: BinaryOperator, left: ExprSingleS, right: ExprSingleS) -> ExprSingle {
    ExprSingle::Binary(BinaryExpr {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn descendant_or_self_step(span: Span) -> StepExprS {
    spanned(
        StepExpr::AxisStep(AxisStep {
            axis: Axis::DescendantOrSelf,
            node_test: NodeTest::KindTest(KindTest::any_node()),
            predicates: Vec::new(),
        }),
        span,
    )
}

fn axis_from_name(name: &str) -> Axis {
    match name {
        "ancestor" => Axis::Ancestor,
        "ancestor-or-self" => Axis::AncestorOrSelf,
        "attribute" => Axis::Attribute,
        "child" => Axis::Child,
        "descendant" => Axis::Descendant,
        "descendant-or-self" => Axis::DescendantOrSelf,
        "following" => Axis::Following,
        "following-sibling" => Axis::FollowingSibling,
        "namespace" => Axis::Namespace,
        "parent" => Axis::Parent,
        "preceding" => Axis::Preceding,
        "preceding-sibling" => Axis::PrecedingSibling,
        "self" => Axis::Self_,
        _ => unreachable!("axis_from_name called on a non-axis NCName"),
    }
}

fn axis_for_kind_test(kind_test: &KindTest) -> Axis {
    match kind_test.node_kind {
        Some(NodeKind::Attribute) => Axis::Attribute,
        Some(NodeKind::Namespace) => Axis::Namespace,
        _ => Axis::Child,
    }
}

impl<T> Spanned<T> {
    fn map_value<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.value), self.span)
    }
}
