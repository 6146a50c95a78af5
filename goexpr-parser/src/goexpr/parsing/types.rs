//! Types and signatures
//!
//! Types are expressions in the tree (`ExprKind::ArrayType`, `ExprKind::MapType`, ...), the
//! same way they appear as operands of conversions and composite literals.

use super::parser::Parser;
use crate::goexpr::ast::range::Span;
use crate::goexpr::ast::{ChanDir, Expr, ExprKind, Field, FieldList, FuncType, Ident};
use crate::goexpr::token::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_type(&mut self) -> Expr {
        if let Some(ty) = self.try_ident_or_type() {
            return ty;
        }
        let start = self.offset();
        self.error_expected(start, "type");
        self.advance(Token::is_expr_end);
        Expr::bad(Span::new(start, self.offset().max(start)))
    }

    /// Parse a type if one starts here; consumes nothing otherwise
    pub(super) fn try_ident_or_type(&mut self) -> Option<Expr> {
        self.nested(Self::ident_or_type, |span| Some(Expr::bad(span)))
    }

    fn ident_or_type(&mut self) -> Option<Expr> {
        let start = self.offset();
        let ty = match self.tok() {
            Token::Ident => {
                let name = self.parse_type_name();
                if self.at(Token::LBrack) {
                    self.parse_type_instance(name)
                } else {
                    name
                }
            }
            Token::LBrack => self.parse_array_type(),
            Token::Struct => self.parse_struct_type(),
            Token::Mul => {
                self.next();
                let elt = self.parse_type();
                Expr::new(ExprKind::Star(Box::new(elt)), self.span_from(start))
            }
            Token::Func => {
                let ty = self.parse_func_type();
                let span = ty.span;
                Expr::new(ExprKind::FuncType(ty), span)
            }
            Token::Interface => self.parse_interface_type(),
            Token::Map => self.parse_map_type(),
            Token::Chan | Token::Arrow => self.parse_chan_type(),
            Token::LParen => {
                self.next();
                let ty = self.parse_type();
                self.expect(Token::RParen);
                Expr::new(ExprKind::Paren(Box::new(ty)), self.span_from(start))
            }
            _ => return None,
        };
        Some(ty)
    }

    /// `T` or `pkg.T`
    pub(super) fn parse_type_name(&mut self) -> Expr {
        let ident = self.parse_ident();
        let x = Self::ident_expr(ident);
        if !self.at(Token::Period) {
            return x;
        }
        self.next();
        let sel = self.parse_ident();
        let span = x.span.to(sel.span);
        Expr::new(
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
            span,
        )
    }

    /// `T[A, B]`
    fn parse_type_instance(&mut self, x: Expr) -> Expr {
        let start = x.span.start;
        self.expect(Token::LBrack);
        let mut indices = Vec::new();
        while !self.at(Token::RBrack) && !self.at(Token::Eof) {
            indices.push(self.parse_type());
            if !self.at_comma("type argument list", Token::RBrack) {
                break;
            }
            self.next();
        }
        self.expect_closing(Token::RBrack, "type argument list");
        if indices.is_empty() {
            let offset = self.prev_end().saturating_sub(1);
            self.error_expected(offset, "type argument list");
        }
        Expr::new(
            ExprKind::Index {
                x: Box::new(x),
                indices,
            },
            self.span_from(start),
        )
    }

    /// `[]T`, `[N]T` or `[...]T`
    fn parse_array_type(&mut self) -> Expr {
        let start = self.offset();
        self.expect(Token::LBrack);
        let len = match self.tok() {
            Token::RBrack => None,
            Token::Ellipsis => {
                let span = self.current().span;
                self.next();
                Some(Box::new(Expr::new(ExprKind::Ellipsis(None), span)))
            }
            _ => {
                self.expr_lev += 1;
                let len = self.parse_rhs();
                self.expr_lev -= 1;
                Some(Box::new(len))
            }
        };
        self.expect(Token::RBrack);
        let elt = self.parse_type();
        Expr::new(
            ExprKind::ArrayType {
                len,
                elt: Box::new(elt),
            },
            self.span_from(start),
        )
    }

    fn parse_map_type(&mut self) -> Expr {
        let start = self.offset();
        self.expect(Token::Map);
        self.expect(Token::LBrack);
        let key = self.parse_type();
        self.expect(Token::RBrack);
        let value = self.parse_type();
        Expr::new(
            ExprKind::MapType {
                key: Box::new(key),
                value: Box::new(value),
            },
            self.span_from(start),
        )
    }

    /// `chan T`, `chan<- T` or `<-chan T`
    pub(super) fn parse_chan_type(&mut self) -> Expr {
        let start = self.offset();
        let dir = if self.at(Token::Chan) {
            self.next();
            if self.at(Token::Arrow) {
                self.next();
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        } else {
            self.expect(Token::Arrow);
            self.expect(Token::Chan);
            ChanDir::Recv
        };
        let value = self.parse_type();
        Expr::new(
            ExprKind::ChanType {
                dir,
                value: Box::new(value),
            },
            self.span_from(start),
        )
    }

    fn parse_struct_type(&mut self) -> Expr {
        let start = self.offset();
        self.expect(Token::Struct);
        let lbrace = self.offset();
        self.expect(Token::LBrace);
        let mut fields = Vec::new();
        while self.at(Token::Ident) || self.at(Token::Mul) {
            fields.push(self.parse_field_decl());
        }
        self.expect(Token::RBrace);
        let list = FieldList {
            fields,
            span: self.span_from(lbrace),
        };
        Expr::new(ExprKind::StructType(list), self.span_from(start))
    }

    fn parse_field_decl(&mut self) -> Field {
        let mut names = Vec::new();
        let ty = if self.at(Token::Mul) {
            // embedded *T
            let start = self.offset();
            self.next();
            let elt = self.parse_type_name();
            Expr::new(ExprKind::Star(Box::new(elt)), self.span_from(start))
        } else {
            let first = self.parse_ident();
            match self.tok() {
                Token::Period
                | Token::String
                | Token::RawString
                | Token::Semicolon
                | Token::RBrace => {
                    // embedded T or pkg.T
                    let mut x = Self::ident_expr(first);
                    if self.at(Token::Period) {
                        self.next();
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
                    x
                }
                _ => {
                    names.push(first);
                    while self.at(Token::Comma) {
                        self.next();
                        names.push(self.parse_ident());
                    }
                    self.parse_type()
                }
            }
        };

        let tag = if matches!(self.tok(), Token::String | Token::RawString) {
            Some(self.parse_operand())
        } else {
            None
        };
        self.expect_semi();
        Field { names, ty, tag }
    }

    fn parse_interface_type(&mut self) -> Expr {
        let start = self.offset();
        self.expect(Token::Interface);
        let lbrace = self.offset();
        self.expect(Token::LBrace);
        let mut fields = Vec::new();
        loop {
            let field = match self.tok() {
                Token::Ident if self.peek(1) == Token::LParen => {
                    let name = self.parse_ident();
                    let ty = self.parse_signature(None);
                    let span = ty.span;
                    Field {
                        names: vec![name],
                        ty: Expr::new(ExprKind::FuncType(ty), span),
                        tag: None,
                    }
                }
                Token::Ident | Token::Tilde | Token::Mul | Token::LBrack | Token::Map
                | Token::Chan | Token::Func | Token::Struct | Token::Interface
                | Token::LParen => Field {
                    names: Vec::new(),
                    ty: self.parse_type_union(),
                    tag: None,
                },
                _ => break,
            };
            fields.push(field);
            self.expect_semi();
        }
        self.expect(Token::RBrace);
        let list = FieldList {
            fields,
            span: self.span_from(lbrace),
        };
        Expr::new(ExprKind::InterfaceType(list), self.span_from(start))
    }

    /// `~int | string | T` inside an interface
    fn parse_type_union(&mut self) -> Expr {
        let mut x = self.parse_type_term();
        while self.at(Token::Or) {
            self.next();
            let y = self.parse_type_term();
            let span = x.span.to(y.span);
            x = Expr::new(
                ExprKind::Binary {
                    x: Box::new(x),
                    op: Token::Or,
                    y: Box::new(y),
                },
                span,
            );
        }
        x
    }

    fn parse_type_term(&mut self) -> Expr {
        if !self.at(Token::Tilde) {
            return self.parse_type();
        }
        let start = self.offset();
        self.next();
        let ty = self.parse_type();
        Expr::new(
            ExprKind::Unary {
                op: Token::Tilde,
                x: Box::new(ty),
            },
            self.span_from(start),
        )
    }

    /// `func(params) results`
    pub(super) fn parse_func_type(&mut self) -> FuncType {
        let func_pos = self.offset();
        self.expect(Token::Func);
        self.parse_signature(Some(func_pos))
    }

    /// Parameters and results following `func` or a method name
    pub(super) fn parse_signature(&mut self, func_pos: Option<usize>) -> FuncType {
        let start = func_pos.unwrap_or_else(|| self.offset());
        let params = self.parse_parameters();
        let results = self.parse_result();
        FuncType {
            func_pos,
            params,
            results,
            span: self.span_from(start),
        }
    }

    pub(super) fn parse_parameters(&mut self) -> FieldList {
        let start = self.offset();
        self.expect(Token::LParen);
        let fields = self.parse_param_list(Token::RParen, "parameter list");
        self.expect_closing(Token::RParen, "parameter list");
        FieldList {
            fields,
            span: self.span_from(start),
        }
    }

    pub(super) fn parse_type_params(&mut self) -> FieldList {
        let start = self.offset();
        self.expect(Token::LBrack);
        let fields = self.parse_param_list(Token::RBrack, "type parameter list");
        self.expect_closing(Token::RBrack, "type parameter list");
        FieldList {
            fields,
            span: self.span_from(start),
        }
    }

    fn parse_result(&mut self) -> Option<FieldList> {
        if self.at(Token::LParen) {
            return Some(self.parse_parameters());
        }
        let ty = self.try_ident_or_type()?;
        let span = ty.span;
        Some(FieldList {
            fields: vec![Field {
                names: Vec::new(),
                ty,
                tag: None,
            }],
            span,
        })
    }

    /// Parameter entries up to `close`, grouped into fields
    ///
    /// `(a, b int, c string)` and `(int, string)` are both valid; an entry that is a lone
    /// identifier is a name when any entry in the list is named, and a type otherwise.
    fn parse_param_list(&mut self, close: Token, context: &str) -> Vec<Field> {
        let mut entries = Vec::new();
        while !self.at(close) && !self.at(Token::Eof) {
            entries.push(self.parse_param_decl(close));
            if !self.at_comma(context, close) {
                break;
            }
            self.next();
        }

        let named = entries.iter().any(|(n, t)| n.is_some() && t.is_some());
        let mut fields = Vec::new();
        if !named {
            for (name, ty) in entries {
                let ty = match (name, ty) {
                    (_, Some(ty)) => ty,
                    (Some(name), None) => Self::ident_expr(name),
                    (None, None) => continue,
                };
                fields.push(Field {
                    names: Vec::new(),
                    ty,
                    tag: None,
                });
            }
            return fields;
        }

        let mut pending: Vec<Ident> = Vec::new();
        for (name, ty) in entries {
            match (name, ty) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        ty,
                        tag: None,
                    });
                }
                (None, Some(ty)) => {
                    self.error(ty.span.start, "mixed named and unnamed parameters");
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        ty,
                        tag: None,
                    });
                }
                (None, None) => {}
            }
        }
        if let Some(last) = pending.last() {
            let offset = last.span.start;
            self.error(offset, "mixed named and unnamed parameters");
            fields.push(Field {
                names: std::mem::take(&mut pending),
                ty: Expr::bad(Span::empty(offset)),
                tag: None,
            });
        }
        fields
    }

    /// One entry: a name, a type, or a name followed by its type
    fn parse_param_decl(&mut self, close: Token) -> (Option<Ident>, Option<Expr>) {
        match self.tok() {
            Token::Ident => {
                let name = self.parse_ident();
                match self.tok() {
                    t if t == close || t == Token::Comma => (Some(name), None),
                    Token::Period => {
                        // qualified type name
                        self.next();
                        let sel = self.parse_ident();
                        let x = Self::ident_expr(name);
                        let span = x.span.to(sel.span);
                        let ty = Expr::new(
                            ExprKind::Selector {
                                x: Box::new(x),
                                sel,
                            },
                            span,
                        );
                        let ty = if self.at(Token::LBrack) {
                            self.parse_type_instance(ty)
                        } else {
                            ty
                        };
                        (None, Some(ty))
                    }
                    Token::LBrack
                        if !matches!(
                            self.peek(1),
                            Token::RBrack | Token::Int | Token::Ellipsis
                        ) =>
                    {
                        // generic type T[A]
                        let ty = self.parse_type_instance(Self::ident_expr(name));
                        (None, Some(ty))
                    }
                    Token::Ellipsis => {
                        let ty = self.parse_variadic();
                        (Some(name), Some(ty))
                    }
                    _ => {
                        let ty = self.parse_type();
                        (Some(name), Some(ty))
                    }
                }
            }
            Token::Ellipsis => (None, Some(self.parse_variadic())),
            _ => (None, Some(self.parse_type())),
        }
    }

    fn parse_variadic(&mut self) -> Expr {
        let start = self.offset();
        self.expect(Token::Ellipsis);
        let elt = self.parse_type();
        Expr::new(
            ExprKind::Ellipsis(Some(Box::new(elt))),
            self.span_from(start),
        )
    }
}
