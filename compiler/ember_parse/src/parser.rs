//! Recursive descent parser over the token list.

use ember_ir::{BinaryOp, ClassDef, Expr, ExprKind, FnDef, Name, Param, Span, Stmt, UnaryOp};
use ember_lexer::{Spanned, Token};

use crate::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parser state.
pub(crate) struct Parser<'src> {
    tokens: &'src [Spanned],
    /// Current token index.
    pos: usize,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: &'src [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse statements until end of input.
    pub(crate) fn parse_unit(mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.statement()?);
        }
        Ok(body)
    }

    // ===== Token access =====

    fn current(&self) -> Option<&'src Spanned> {
        self.tokens.get(self.pos)
    }

    fn current_token(&self) -> Option<&'src Token> {
        self.current().map(|t| &t.token)
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&'src Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &Token) -> bool {
        self.current_token()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(kind))
    }

    fn eat(&mut self, kind: &Token) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: &Token, expected: &str) -> ParseResult<Span> {
        if self.check(kind) {
            Ok(self.advance().map_or(Span::DUMMY, |t| t.span))
        } else {
            Err(self.error(expected))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(found) => ParseError::Unexpected {
                expected: expected.to_string(),
                found: found.token.describe(),
                span: found.span,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn ident(&mut self, expected: &str) -> ParseResult<(Name, Span)> {
        match self.current() {
            Some(Spanned {
                token: Token::Ident(name),
                span,
            }) => {
                self.pos += 1;
                Ok((name.clone(), *span))
            }
            _ => Err(self.error(expected)),
        }
    }

    // ===== Statements =====

    fn statement(&mut self) -> ParseResult<Stmt> {
        let doc = self.doc_comments();
        let stmt = match self.current_token() {
            Some(Token::Fn) => Stmt::Fn(self.fn_def(doc)?),
            Some(Token::Class) => Stmt::Class(self.class_def(doc)?),
            _ if doc.is_some() => return Err(self.error("`fn` or `class` after doc comment")),
            Some(Token::Let) => self.let_stmt()?,
            Some(Token::Return) => self.return_stmt()?,
            Some(Token::Raise) => {
                let start = self.consume(&Token::Raise, "`raise`")?;
                let value = self.expression()?;
                let span = start.merge(value.span);
                Stmt::Raise { value, span }
            }
            Some(Token::If) => self.if_stmt()?,
            _ => self.assign_or_expr()?,
        };
        self.eat(&Token::Semicolon);
        Ok(stmt)
    }

    /// Collect consecutive `///` lines into one doc string.
    fn doc_comments(&mut self) -> Option<String> {
        let mut lines = Vec::new();
        while let Some(Token::DocComment(line)) = self.current_token() {
            lines.push(line.as_str());
            self.pos += 1;
        }
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn let_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(&Token::Let, "`let`")?;
        let (name, _) = self.ident("binding name")?;
        self.consume(&Token::Eq, "`=`")?;
        let value = self.expression()?;
        let span = start.merge(value.span);
        Ok(Stmt::Let { name, value, span })
    }

    fn return_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(&Token::Return, "`return`")?;
        let value = match self.current_token() {
            None | Some(Token::RBrace | Token::Semicolon) => None,
            Some(_) => Some(self.expression()?),
        };
        let span = value.as_ref().map_or(start, |v| start.merge(v.span));
        Ok(Stmt::Return { value, span })
    }

    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.consume(&Token::If, "`if`")?;
        let cond = self.expression()?;
        let then_body = self.block()?;
        let else_body = if self.eat(&Token::Else) {
            if self.check(&Token::If) {
                vec![self.if_stmt()?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };
        let span = start.merge(self.previous_span());
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
            span,
        })
    }

    fn assign_or_expr(&mut self) -> ParseResult<Stmt> {
        let target = self.expression()?;
        if !self.eat(&Token::Eq) {
            return Ok(Stmt::Expr(target));
        }
        if !matches!(target.kind, ExprKind::Ident(_) | ExprKind::Attr { .. }) {
            return Err(ParseError::InvalidAssignTarget { span: target.span });
        }
        let value = self.expression()?;
        let span = target.span.merge(value.span);
        Ok(Stmt::Assign {
            target,
            value,
            span,
        })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.consume(&Token::LBrace, "`{`")?;
        let mut body = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.at_end() {
                return Err(self.error("`}`"));
            }
            body.push(self.statement()?);
        }
        self.consume(&Token::RBrace, "`}`")?;
        Ok(body)
    }

    // ===== Definitions =====

    fn fn_def(&mut self, doc: Option<String>) -> ParseResult<FnDef> {
        let start = self.consume(&Token::Fn, "`fn`")?;
        let (name, _) = self.ident("function name")?;
        self.consume(&Token::LParen, "`(`")?;
        let params = self.params()?;
        self.consume(&Token::RParen, "`)`")?;

        let body = if self.eat(&Token::Eq) {
            let value = self.expression()?;
            let span = value.span;
            vec![Stmt::Return {
                value: Some(value),
                span,
            }]
        } else {
            self.block()?
        };

        Ok(FnDef {
            name,
            params,
            body,
            doc,
            span: start.merge(self.previous_span()),
        })
    }

    fn params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params: Vec<Param> = Vec::new();
        while !self.check(&Token::RParen) {
            let (name, span) = self.ident("parameter name")?;
            let default = if self.eat(&Token::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            if default.is_none() && params.iter().any(|p| p.default.is_some()) {
                return Err(ParseError::DefaultOrder {
                    name: name.to_string(),
                    span,
                });
            }
            params.push(Param { name, default });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn class_def(&mut self, doc: Option<String>) -> ParseResult<ClassDef> {
        let start = self.consume(&Token::Class, "`class`")?;
        let (name, _) = self.ident("class name")?;

        let mut bases = Vec::new();
        if self.eat(&Token::LParen) {
            bases = self.call_args()?;
        }

        self.consume(&Token::LBrace, "`{`")?;
        let mut body = Vec::new();
        while !self.check(&Token::RBrace) {
            let item_doc = self.doc_comments();
            let item = match self.current_token() {
                Some(Token::Fn) => Stmt::Fn(self.fn_def(item_doc)?),
                Some(Token::Class) => Stmt::Class(self.class_def(item_doc)?),
                Some(Token::Let) if item_doc.is_none() => self.let_stmt()?,
                _ => return Err(self.error("`let`, `fn` or `class` in class body")),
            };
            self.eat(&Token::Semicolon);
            body.push(item);
        }
        self.consume(&Token::RBrace, "`}`")?;

        Ok(ClassDef {
            name,
            bases,
            body,
            doc,
            span: start.merge(self.previous_span()),
        })
    }

    // ===== Expressions =====

    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::Or) {
            let right = self.and_expr()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.not_expr()?;
        while self.eat(&Token::And) {
            let right = self.not_expr()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> ParseResult<Expr> {
        if self.check(&Token::Not) {
            let start = self.consume(&Token::Not, "`not`")?;
            let operand = self.not_expr()?;
            return Ok(unary(UnaryOp::Not, start, operand));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let left = self.sum()?;
        let op = match self.current_token() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::NotEq,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::LtEq) => BinaryOp::LtEq,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::GtEq) => BinaryOp::GtEq,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.sum()?;
        Ok(binary(op, left, right))
    }

    fn sum(&mut self) -> ParseResult<Expr> {
        let mut left = self.product()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.product()?;
            left = binary(op, left, right);
        }
    }

    fn product(&mut self) -> ParseResult<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.check(&Token::Minus) {
            let start = self.consume(&Token::Minus, "`-`")?;
            let operand = self.unary()?;
            return Ok(unary(UnaryOp::Neg, start, operand));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::LParen) {
                let args = self.call_args()?;
                let span = expr.span.merge(self.previous_span());
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else if self.eat(&Token::Dot) {
                let (attr, attr_span) = self.ident("attribute name")?;
                let span = expr.span.merge(attr_span);
                expr = Expr::new(
                    ExprKind::Attr {
                        object: Box::new(expr),
                        attr,
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma separated expressions after an opening `(`, through the `)`.
    fn call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            args.push(self.expression()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.consume(&Token::RParen, "`)`")?;
        Ok(args)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let Some(current) = self.current() else {
            return Err(self.error("expression"));
        };
        let kind = match &current.token {
            Token::Int(n) => ExprKind::Int(*n),
            Token::Str(s) => ExprKind::Str(s.clone()),
            Token::True => ExprKind::Bool(true),
            Token::False => ExprKind::Bool(false),
            Token::None => ExprKind::None,
            Token::Ident(name) => ExprKind::Ident(name.clone()),
            Token::LParen => {
                self.pos += 1;
                let inner = self.expression()?;
                let close = self.consume(&Token::RParen, "`)`")?;
                return Ok(Expr::new(inner.kind, current.span.merge(close)));
            }
            _ => return Err(self.error("expression")),
        };
        self.pos += 1;
        Ok(Expr::new(kind, current.span))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn unary(op: UnaryOp, start: Span, operand: Expr) -> Expr {
    let span = start.merge(operand.span);
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    )
}
