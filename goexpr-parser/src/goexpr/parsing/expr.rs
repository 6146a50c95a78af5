//! Expressions
//!
//! Precedence climbing over Go's five binary levels, then unary operators, then primary
//! expressions with their selector/index/slice/call/assertion suffixes.
//!
//! The one context-sensitive rule is the composite literal: inside an `if`, `for` or
//! `switch` header (`expr_lev < 0`) a `{` after a type name opens the statement body, not a
//! literal. Parenthesised and bracketed sub-expressions raise `expr_lev` again, which is why
//! `if f(T{}) {` works while `if x == T{} {` does not.

use super::parser::Parser;
use crate::goexpr::ast::range::Span;
use crate::goexpr::ast::{Expr, ExprKind, Ident};
use crate::goexpr::token::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Expr {
        self.parse_binary_expr(None, 1)
    }

    /// Right-hand side expression; may also be a type (`make([]int, 3)`)
    pub(super) fn parse_rhs(&mut self) -> Expr {
        self.parse_expr()
    }

    /// Comma-separated expression list; never empty
    pub(super) fn parse_list(&mut self) -> Vec<Expr> {
        let mut list = vec![self.parse_expr()];
        while self.at(Token::Comma) {
            self.next();
            list.push(self.parse_expr());
        }
        list
    }

    fn parse_binary_expr(&mut self, x: Option<Expr>, prec1: u8) -> Expr {
        let mut x = match x {
            Some(x) => x,
            None => self.parse_unary_expr(),
        };
        loop {
            let op = self.tok();
            let oprec = op.precedence();
            if oprec < prec1 {
                return x;
            }
            self.next();
            let y = self.parse_binary_expr(None, oprec + 1);
            let span = x.span.to(y.span);
            x = Expr::new(
                ExprKind::Binary {
                    x: Box::new(x),
                    op,
                    y: Box::new(y),
                },
                span,
            );
        }
    }

    pub(super) fn parse_unary_expr(&mut self) -> Expr {
        self.nested(Self::unary_expr, Expr::bad)
    }

    fn unary_expr(&mut self) -> Expr {
        let start = self.offset();
        match self.tok() {
            Token::Add | Token::Sub | Token::Not | Token::Xor | Token::And | Token::Tilde => {
                let op = self.tok();
                self.next();
                let x = self.parse_unary_expr();
                let end = x_end(&x, start);
                Expr::new(
                    ExprKind::Unary {
                        op,
                        x: Box::new(x),
                    },
                    Span::new(start, end),
                )
            }
            Token::Arrow if self.peek(1) == Token::Chan => {
                // `<-chan T`, possibly followed by a conversion
                let ty = self.parse_chan_type();
                self.parse_primary_expr(Some(ty))
            }
            Token::Arrow => {
                self.next();
                let x = self.parse_unary_expr();
                let end = x_end(&x, start);
                Expr::new(
                    ExprKind::Unary {
                        op: Token::Arrow,
                        x: Box::new(x),
                    },
                    Span::new(start, end),
                )
            }
            Token::Mul => {
                // pointer type or dereference
                self.next();
                let x = self.parse_unary_expr();
                let end = x_end(&x, start);
                Expr::new(ExprKind::Star(Box::new(x)), Span::new(start, end))
            }
            _ => self.parse_primary_expr(None),
        }
    }

    pub(super) fn parse_primary_expr(&mut self, x: Option<Expr>) -> Expr {
        let mut x = match x {
            Some(x) => x,
            None => self.parse_operand(),
        };
        loop {
            match self.tok() {
                Token::Period => {
                    self.next();
                    match self.tok() {
                        Token::Ident => {
                            let sel = self.parse_ident();
                            let span = x.span.to(sel.span);
                            x = Expr::new(
                                ExprKind::Selector {
                                    x: Box::new(x),
                                    sel,
                                },
                                span,
                            );
                        }
                        Token::LParen => x = self.parse_type_assertion(x),
                        _ => {
                            let offset = self.offset();
                            self.error_expected(offset, "selector or type assertion");
                            if !self.at(Token::RBrace) {
                                self.next();
                            }
                            let sel = Ident {
                                name: "_".to_string(),
                                span: Span::empty(offset),
                            };
                            let span = x.span.to(sel.span);
                            x = Expr::new(
                                ExprKind::Selector {
                                    x: Box::new(x),
                                    sel,
                                },
                                span,
                            );
                        }
                    }
                }
                Token::LBrack => x = self.parse_index_or_slice(x),
                Token::LParen => x = self.parse_call(x),
                Token::LBrace => {
                    // a `{` belongs to a composite literal only after a literal type
                    let t = x.unparen();
                    let is_type_name = matches!(
                        t.kind,
                        ExprKind::Bad
                            | ExprKind::Ident(_)
                            | ExprKind::Selector { .. }
                            | ExprKind::Index { .. }
                    );
                    let is_literal_type = matches!(
                        t.kind,
                        ExprKind::ArrayType { .. }
                            | ExprKind::StructType(_)
                            | ExprKind::MapType { .. }
                    );
                    if is_type_name {
                        if self.expr_lev < 0 {
                            return x;
                        }
                    } else if !is_literal_type {
                        return x;
                    }
                    if t.span != x.span {
                        let offset = t.span.start;
                        self.error(offset, "cannot parenthesize type in composite literal");
                    }
                    x = self.parse_literal_value(Some(x));
                }
                _ => return x,
            }
        }
    }

    pub(super) fn parse_operand(&mut self) -> Expr {
        let current = *self.current();
        match current.token {
            Token::Ident => {
                let ident = self.parse_ident();
                Self::ident_expr(ident)
            }
            Token::Int
            | Token::Float
            | Token::Imag
            | Token::Char
            | Token::String
            | Token::RawString => {
                self.next();
                Expr::new(
                    ExprKind::BasicLit {
                        kind: current.token,
                        value: current.text.to_string(),
                    },
                    current.span,
                )
            }
            Token::LParen => {
                let start = current.span.start;
                self.next();
                self.expr_lev += 1;
                // types may be parenthesized: (some type)
                let x = self.parse_rhs();
                self.expr_lev -= 1;
                self.expect(Token::RParen);
                Expr::new(ExprKind::Paren(Box::new(x)), self.span_from(start))
            }
            Token::Func => self.parse_func_type_or_lit(),
            _ => {
                if let Some(ty) = self.try_ident_or_type() {
                    return ty;
                }
                let start = current.span.start;
                self.error_expected(start, "operand");
                self.advance(Token::is_stmt_start);
                Expr::bad(Span::new(start, self.offset().max(start)))
            }
        }
    }

    fn parse_type_assertion(&mut self, x: Expr) -> Expr {
        let start = x.span.start;
        self.expect(Token::LParen);
        let ty = if self.at(Token::Type) {
            // x.(type) is only valid as a type switch guard
            self.next();
            None
        } else {
            Some(Box::new(self.parse_type()))
        };
        self.expect(Token::RParen);
        Expr::new(
            ExprKind::TypeAssert {
                x: Box::new(x),
                ty,
            },
            self.span_from(start),
        )
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> Expr {
        let start = x.span.start;
        self.expect(Token::LBrack);

        if self.at(Token::RBrack) {
            // empty index is not permitted; accept it for tolerance but complain
            let offset = self.offset();
            self.error_expected(offset, "operand");
            self.next();
            return Expr::new(
                ExprKind::Index {
                    x: Box::new(x),
                    indices: vec![Expr::bad(Span::empty(offset))],
                },
                self.span_from(start),
            );
        }

        self.expr_lev += 1;
        let mut index: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut extra = Vec::new();
        if !self.at(Token::Colon) {
            index[0] = Some(Box::new(self.parse_rhs()));
        }
        let mut ncolons = 0;
        match self.tok() {
            Token::Colon => {
                while self.at(Token::Colon) && ncolons < 2 {
                    ncolons += 1;
                    self.next();
                    if !matches!(self.tok(), Token::Colon | Token::RBrack | Token::Eof) {
                        index[ncolons] = Some(Box::new(self.parse_rhs()));
                    }
                }
            }
            Token::Comma => {
                // generic instantiation with several type arguments
                while self.at(Token::Comma) {
                    self.next();
                    if !matches!(self.tok(), Token::RBrack | Token::Eof) {
                        extra.push(self.parse_type());
                    }
                }
            }
            _ => {}
        }
        self.expr_lev -= 1;
        self.expect(Token::RBrack);

        if ncolons > 0 {
            let [low, high, max] = index;
            if ncolons == 2 && (high.is_none() || max.is_none()) {
                let offset = self.prev_end().saturating_sub(1);
                self.error(offset, "middle and final index required in 3-index slice");
            }
            return Expr::new(
                ExprKind::Slice {
                    x: Box::new(x),
                    low,
                    high,
                    max,
                },
                self.span_from(start),
            );
        }

        let [first, _, _] = index;
        let mut indices: Vec<Expr> = first.map(|e| *e).into_iter().collect();
        indices.extend(extra);
        Expr::new(
            ExprKind::Index {
                x: Box::new(x),
                indices,
            },
            self.span_from(start),
        )
    }

    fn parse_call(&mut self, fun: Expr) -> Expr {
        let start = fun.span.start;
        self.expect(Token::LParen);
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut ellipsis = None;
        while !self.at(Token::RParen) && !self.at(Token::Eof) && ellipsis.is_none() {
            // builtins may expect a type: make(some type, ...)
            args.push(self.parse_rhs());
            if self.at(Token::Ellipsis) {
                ellipsis = Some(self.offset());
                self.next();
            }
            if !self.at_comma("argument list", Token::RParen) {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;
        self.expect_closing(Token::RParen, "argument list");
        Expr::new(
            ExprKind::Call {
                fun: Box::new(fun),
                args,
                ellipsis,
            },
            self.span_from(start),
        )
    }

    /// `{ elements }`, with `ty` as the literal type when present
    pub(super) fn parse_literal_value(&mut self, ty: Option<Expr>) -> Expr {
        self.nested(|p| p.literal_value(ty), Expr::bad)
    }

    fn literal_value(&mut self, ty: Option<Expr>) -> Expr {
        let lbrace = self.offset();
        let start = ty.as_ref().map(|t| t.span.start).unwrap_or(lbrace);
        self.expect(Token::LBrace);
        self.expr_lev += 1;
        let mut elts = Vec::new();
        while !self.at(Token::RBrace) && !self.at(Token::Eof) {
            elts.push(self.parse_element());
            if !self.at_comma("composite literal", Token::RBrace) {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;
        self.expect_closing(Token::RBrace, "composite literal");
        Expr::new(
            ExprKind::CompositeLit {
                ty: ty.map(Box::new),
                elts,
                lbrace,
            },
            self.span_from(start),
        )
    }

    fn parse_element(&mut self) -> Expr {
        let key = self.parse_value();
        if !self.at(Token::Colon) {
            return key;
        }
        self.next();
        let value = self.parse_value();
        let span = key.span.to(value.span);
        Expr::new(
            ExprKind::KeyValue {
                key: Box::new(key),
                value: Box::new(value),
            },
            span,
        )
    }

    fn parse_value(&mut self) -> Expr {
        if self.at(Token::LBrace) {
            self.parse_literal_value(None)
        } else {
            self.parse_expr()
        }
    }

    fn parse_func_type_or_lit(&mut self) -> Expr {
        let ty = self.parse_func_type();
        if !self.at(Token::LBrace) {
            let span = ty.span;
            return Expr::new(ExprKind::FuncType(ty), span);
        }
        self.expr_lev += 1;
        let body = self.parse_block_stmt();
        self.expr_lev -= 1;
        let span = ty.span.to(body.span);
        Expr::new(ExprKind::FuncLit { ty, body }, span)
    }
}

fn x_end(x: &Expr, start: usize) -> usize {
    x.span.end.max(start)
}
