//! Statements and blocks
//!
//! Control clauses (`if`, `for`, `switch`) parse their headers with `expr_lev` set to -1 so
//! that the `{` ending the header is never mistaken for a composite literal. The offsets of
//! the keyword and of the body's `{` are kept on the node.

use super::parser::Parser;
use crate::goexpr::ast::range::Span;
use crate::goexpr::ast::{
    BlockStmt, CaseClause, CommClause, Expr, ExprKind, ForStmt, IfStmt, RangeStmt, Stmt,
    StmtKind, SwitchStmt, TypeSwitchStmt,
};
use crate::goexpr::token::Token;

/// What a simple statement may turn out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

/// Left-hand side, assignment token and ranged expression of a `for ... range` header
type RangeClause = (Vec<Expr>, Option<Token>, Expr);

impl<'a> Parser<'a> {
    pub(super) fn parse_block_stmt(&mut self) -> BlockStmt {
        let start = self.offset();
        let lbrace = self.expect(Token::LBrace);
        let list = self.parse_stmt_list();
        let rbrace = self.expect(Token::RBrace);
        BlockStmt {
            lbrace,
            list,
            rbrace,
            span: self.span_from(start),
        }
    }

    pub(super) fn parse_stmt_list(&mut self) -> Vec<Stmt> {
        let mut list = Vec::new();
        while !matches!(
            self.tok(),
            Token::Case | Token::Default | Token::RBrace | Token::Eof
        ) {
            list.push(self.parse_stmt());
        }
        list
    }

    pub(super) fn parse_stmt(&mut self) -> Stmt {
        self.nested(Self::stmt, Stmt::bad)
    }

    fn stmt(&mut self) -> Stmt {
        let start = self.offset();
        match self.tok() {
            Token::Const | Token::Type | Token::Var => {
                let decl = self.parse_gen_decl();
                let span = decl.span;
                Stmt::new(StmtKind::Decl(decl), span)
            }
            Token::Ident
            | Token::Int
            | Token::Float
            | Token::Imag
            | Token::Char
            | Token::String
            | Token::RawString
            | Token::Func
            | Token::LParen
            | Token::LBrack
            | Token::Struct
            | Token::Map
            | Token::Chan
            | Token::Interface
            | Token::Add
            | Token::Sub
            | Token::Mul
            | Token::And
            | Token::Xor
            | Token::Arrow
            | Token::Not => {
                let (stmt, _) = self.parse_simple_stmt(SimpleMode::LabelOk);
                if !matches!(stmt.kind, StmtKind::Labeled { .. }) {
                    self.expect_semi();
                }
                stmt
            }
            Token::Go | Token::Defer => self.parse_call_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::Break | Token::Continue | Token::Goto | Token::Fallthrough => {
                self.parse_branch_stmt()
            }
            Token::LBrace => {
                let block = self.parse_block_stmt();
                let span = block.span;
                self.expect_semi();
                Stmt::new(StmtKind::Block(block), span)
            }
            Token::If => self.parse_if_stmt(),
            Token::Switch => self.parse_switch_stmt(),
            Token::Select => self.parse_select_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Semicolon => {
                let current = *self.current();
                self.next();
                Stmt::new(
                    StmtKind::Empty {
                        implicit: current.is_implicit_semicolon(),
                    },
                    current.span,
                )
            }
            // a `}` may follow a label
            Token::RBrace => Stmt::new(StmtKind::Empty { implicit: true }, Span::empty(start)),
            _ => {
                self.error_expected(start, "statement");
                self.advance(Token::is_stmt_start);
                Stmt::bad(Span::new(start, self.offset().max(start)))
            }
        }
    }

    /// Expression, send, inc/dec, assignment or labelled statement
    ///
    /// The flag is true when the statement is the `k, v := range x` part of a for header.
    pub(super) fn parse_simple_stmt(&mut self, mode: SimpleMode) -> (Stmt, bool) {
        let start = self.offset();
        let lhs = self.parse_list();

        let tok = self.tok();
        if tok.is_assign_op() {
            let tok_pos = self.offset();
            self.next();
            let is_range = mode == SimpleMode::RangeOk
                && self.at(Token::Range)
                && matches!(tok, Token::Define | Token::Assign);
            let rhs = if is_range {
                let range_pos = self.offset();
                self.next();
                let x = self.parse_rhs();
                let span = Span::new(range_pos, x.span.end.max(range_pos));
                vec![Expr::new(
                    ExprKind::Unary {
                        op: Token::Range,
                        x: Box::new(x),
                    },
                    span,
                )]
            } else {
                self.parse_list()
            };
            let span = self.span_from(start);
            let stmt = Stmt::new(
                StmtKind::Assign {
                    lhs,
                    tok,
                    tok_pos,
                    rhs,
                },
                span,
            );
            return (stmt, is_range);
        }

        if lhs.len() > 1 {
            self.error_expected(start, "1 expression");
        }
        let x = first_expr(lhs, start);

        match self.tok() {
            Token::Colon => {
                let colon = self.offset();
                self.next();
                if let (SimpleMode::LabelOk, ExprKind::Ident(label)) = (mode, &x.kind) {
                    let label = label.clone();
                    let stmt = self.parse_stmt();
                    let span = Span::new(start, stmt.span.end.max(start));
                    let labeled = StmtKind::Labeled {
                        label,
                        stmt: Box::new(stmt),
                    };
                    return (Stmt::new(labeled, span), false);
                }
                self.error(colon, "illegal label declaration");
                (Stmt::bad(Span::new(start, colon + 1)), false)
            }
            Token::Arrow => {
                self.next();
                let value = self.parse_rhs();
                let span = self.span_from(start);
                (Stmt::new(StmtKind::Send { chan: x, value }, span), false)
            }
            Token::Inc | Token::Dec => {
                let tok = self.tok();
                self.next();
                let span = self.span_from(start);
                (Stmt::new(StmtKind::IncDec { x, tok }, span), false)
            }
            _ => {
                let span = x.span;
                (Stmt::new(StmtKind::Expr(x), span), false)
            }
        }
    }

    /// Turn a header statement into the expression it must be
    fn make_expr(&mut self, stmt: Stmt, want: &str) -> Expr {
        let found = match stmt.kind {
            StmtKind::Expr(x) => return x,
            StmtKind::Assign { .. } => "assignment",
            _ => "simple statement",
        };
        self.error(
            stmt.span.start,
            format!(
                "expected {}, found {} (missing parentheses around composite literal?)",
                want, found
            ),
        );
        Expr::bad(stmt.span)
    }

    fn parse_call_stmt(&mut self) -> Stmt {
        let start = self.offset();
        let keyword = self.tok();
        self.next();
        let x = self.parse_rhs();
        let span = self.span_from(start);
        self.expect_semi();

        match x.kind {
            ExprKind::Call { .. } if keyword == Token::Go => Stmt::new(StmtKind::Go(x), span),
            ExprKind::Call { .. } => Stmt::new(StmtKind::Defer(x), span),
            ExprKind::Bad => Stmt::bad(span),
            _ => {
                self.error(
                    x.span.end,
                    format!("expression in {} must be function call", keyword),
                );
                Stmt::bad(span)
            }
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let start = self.offset();
        self.expect(Token::Return);
        let results = if matches!(self.tok(), Token::Semicolon | Token::RBrace) {
            Vec::new()
        } else {
            self.parse_list()
        };
        let span = self.span_from(start);
        self.expect_semi();
        Stmt::new(StmtKind::Return(results), span)
    }

    fn parse_branch_stmt(&mut self) -> Stmt {
        let start = self.offset();
        let tok = self.tok();
        self.next();
        let label = if tok != Token::Fallthrough && self.at(Token::Ident) {
            Some(self.parse_ident())
        } else {
            None
        };
        let span = self.span_from(start);
        self.expect_semi();
        Stmt::new(StmtKind::Branch { tok, label }, span)
    }

    // =========================================================================
    // If
    // =========================================================================

    fn parse_if_stmt(&mut self) -> Stmt {
        let if_pos = self.offset();
        self.expect(Token::If);
        let (init, cond) = self.parse_if_header();
        let body = self.parse_block_stmt();

        let else_branch = if self.at(Token::Else) {
            self.next();
            match self.tok() {
                Token::If => Some(Box::new(self.parse_if_stmt())),
                Token::LBrace => {
                    let block = self.parse_block_stmt();
                    let span = block.span;
                    self.expect_semi();
                    Some(Box::new(Stmt::new(StmtKind::Block(block), span)))
                }
                _ => {
                    let offset = self.offset();
                    self.error_expected(offset, "if statement or block");
                    Some(Box::new(Stmt::bad(Span::empty(offset))))
                }
            }
        } else {
            self.expect_semi();
            None
        };

        let end = else_branch
            .as_ref()
            .map(|stmt| stmt.span.end)
            .unwrap_or(body.span.end);
        let stmt = IfStmt {
            if_pos,
            init,
            cond,
            body,
            else_branch,
        };
        Stmt::new(StmtKind::If(stmt), Span::new(if_pos, end.max(if_pos)))
    }

    fn parse_if_header(&mut self) -> (Option<Box<Stmt>>, Expr) {
        if self.at(Token::LBrace) {
            let offset = self.offset();
            self.error(offset, "missing condition in if statement");
            return (None, Expr::bad(Span::empty(offset)));
        }

        let prev_lev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        if !self.at(Token::Semicolon) {
            if self.at(Token::Var) {
                self.next();
                let offset = self.offset();
                self.error(offset, "var declaration not allowed in if initializer");
            }
            init = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
        }

        let mut cond_stmt = None;
        // offset of an explicit or implicit `;`, and whether it was a line break
        let mut semi: Option<(usize, bool)> = None;
        if !self.at(Token::LBrace) {
            if self.at(Token::Semicolon) {
                semi = Some((self.offset(), self.current().is_implicit_semicolon()));
                self.next();
            } else {
                self.expect(Token::Semicolon);
            }
            if !self.at(Token::LBrace) {
                cond_stmt = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
            }
        } else {
            cond_stmt = init.take();
        }

        let cond = match cond_stmt {
            Some(stmt) => self.make_expr(stmt, "boolean expression"),
            None => {
                match semi {
                    Some((offset, true)) => {
                        self.error(offset, "unexpected newline, expecting { after if clause")
                    }
                    Some((offset, false)) => {
                        self.error(offset, "missing condition in if statement")
                    }
                    None => {}
                }
                Expr::bad(Span::empty(self.offset()))
            }
        };

        self.expr_lev = prev_lev;
        (init.map(Box::new), cond)
    }

    // =========================================================================
    // For
    // =========================================================================

    fn parse_for_stmt(&mut self) -> Stmt {
        let for_pos = self.offset();
        self.expect(Token::For);

        let mut init = None;
        let mut cond_stmt = None;
        let mut post = None;
        let mut range: Option<RangeClause> = None;

        if !self.at(Token::LBrace) {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;

            if !self.at(Token::Semicolon) {
                if self.at(Token::Range) {
                    // for range x
                    self.next();
                    let x = self.parse_rhs();
                    range = Some((Vec::new(), None, x));
                } else {
                    let (stmt, is_range) = self.parse_simple_stmt(SimpleMode::RangeOk);
                    if is_range {
                        range = Some(range_clause(stmt));
                    } else {
                        cond_stmt = Some(stmt);
                    }
                }
            }

            if range.is_none() && self.at(Token::Semicolon) {
                self.next();
                init = cond_stmt.take();
                if !self.at(Token::Semicolon) {
                    cond_stmt = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
                }
                self.expect_semi();
                if !self.at(Token::LBrace) {
                    post = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
                }
            }

            self.expr_lev = prev_lev;
        }

        let body = self.parse_block_stmt();
        let span = Span::new(for_pos, body.span.end.max(for_pos));
        self.expect_semi();

        if let Some((lhs, tok, x)) = range {
            let mut keys = lhs.into_iter();
            let key = keys.next();
            let value = keys.next();
            if let Some(extra) = keys.last() {
                self.error_expected(extra.span.start, "at most 2 expressions");
                return Stmt::bad(span);
            }
            let stmt = RangeStmt {
                for_pos,
                key,
                value,
                tok,
                x,
                body,
            };
            return Stmt::new(StmtKind::Range(stmt), span);
        }

        let cond = cond_stmt.map(|stmt| self.make_expr(stmt, "boolean or range expression"));
        let stmt = ForStmt {
            for_pos,
            init: init.map(Box::new),
            cond,
            post: post.map(Box::new),
            body,
        };
        Stmt::new(StmtKind::For(stmt), span)
    }

    // =========================================================================
    // Switch and select
    // =========================================================================

    fn parse_switch_stmt(&mut self) -> Stmt {
        let switch_pos = self.offset();
        self.expect(Token::Switch);

        let mut init = None;
        let mut tag_stmt = None;
        if !self.at(Token::LBrace) {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            if !self.at(Token::Semicolon) {
                tag_stmt = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
            }
            if self.at(Token::Semicolon) {
                self.next();
                init = tag_stmt.take();
                if !self.at(Token::LBrace) {
                    tag_stmt = Some(self.parse_simple_stmt(SimpleMode::Basic).0);
                }
            }
            self.expr_lev = prev_lev;
        }

        let type_switch = self.is_type_switch_guard(tag_stmt.as_ref());
        let body_start = self.offset();
        let lbrace = self.expect(Token::LBrace);
        let mut list = Vec::new();
        while self.at(Token::Case) || self.at(Token::Default) {
            list.push(self.parse_case_clause(type_switch));
        }
        let rbrace = self.expect(Token::RBrace);
        let body = BlockStmt {
            lbrace,
            list,
            rbrace,
            span: self.span_from(body_start),
        };
        let span = self.span_from(switch_pos);
        self.expect_semi();

        let init = init.map(Box::new);
        let kind = match tag_stmt {
            Some(assign) if type_switch => StmtKind::TypeSwitch(TypeSwitchStmt {
                switch_pos,
                init,
                assign: Box::new(assign),
                body,
            }),
            tag_stmt => {
                let tag = tag_stmt.map(|stmt| self.make_expr(stmt, "switch expression"));
                StmtKind::Switch(SwitchStmt {
                    switch_pos,
                    init,
                    tag,
                    body,
                })
            }
        };
        Stmt::new(kind, span)
    }

    fn is_type_switch_guard(&mut self, stmt: Option<&Stmt>) -> bool {
        match stmt.map(|s| &s.kind) {
            Some(StmtKind::Expr(x)) => x.is_type_switch_guard(),
            Some(StmtKind::Assign {
                lhs,
                tok,
                tok_pos,
                rhs,
            }) if lhs.len() == 1 && rhs.len() == 1 && rhs[0].is_type_switch_guard() => {
                match tok {
                    Token::Define => true,
                    Token::Assign => {
                        self.error(*tok_pos, "expected ':=', found '='");
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> Stmt {
        let case_pos = self.offset();
        let list = if self.at(Token::Case) {
            self.next();
            if type_switch {
                self.parse_type_list()
            } else {
                self.parse_list()
            }
        } else {
            self.expect(Token::Default);
            Vec::new()
        };
        let colon = self.expect(Token::Colon);
        let body = self.parse_stmt_list();
        let span = self.span_from(case_pos);
        let clause = CaseClause {
            case_pos,
            list,
            colon,
            body,
        };
        Stmt::new(StmtKind::CaseClause(clause), span)
    }

    fn parse_type_list(&mut self) -> Vec<Expr> {
        let mut list = vec![self.parse_type()];
        while self.at(Token::Comma) {
            self.next();
            list.push(self.parse_type());
        }
        list
    }

    fn parse_select_stmt(&mut self) -> Stmt {
        let start = self.offset();
        self.expect(Token::Select);
        let body_start = self.offset();
        let lbrace = self.expect(Token::LBrace);
        let mut list = Vec::new();
        while self.at(Token::Case) || self.at(Token::Default) {
            list.push(self.parse_comm_clause());
        }
        let rbrace = self.expect(Token::RBrace);
        let body = BlockStmt {
            lbrace,
            list,
            rbrace,
            span: self.span_from(body_start),
        };
        let span = self.span_from(start);
        self.expect_semi();
        Stmt::new(StmtKind::Select(body), span)
    }

    fn parse_comm_clause(&mut self) -> Stmt {
        let case_pos = self.offset();
        let comm = if self.at(Token::Case) {
            self.next();
            let start = self.offset();
            let lhs = self.parse_list();
            let kind = match self.tok() {
                Token::Arrow => {
                    if lhs.len() > 1 {
                        self.error_expected(start, "1 expression");
                    }
                    self.next();
                    let value = self.parse_rhs();
                    StmtKind::Send {
                        chan: first_expr(lhs, start),
                        value,
                    }
                }
                tok @ (Token::Assign | Token::Define) => {
                    let tok_pos = self.offset();
                    self.next();
                    if lhs.len() > 2 {
                        self.error_expected(start, "1 or 2 expressions");
                    }
                    let rhs = vec![self.parse_rhs()];
                    StmtKind::Assign {
                        lhs,
                        tok,
                        tok_pos,
                        rhs,
                    }
                }
                _ => {
                    if lhs.len() > 1 {
                        self.error_expected(start, "1 expression");
                    }
                    StmtKind::Expr(first_expr(lhs, start))
                }
            };
            Some(Box::new(Stmt::new(kind, self.span_from(start))))
        } else {
            self.expect(Token::Default);
            None
        };
        let colon = self.expect(Token::Colon);
        let body = self.parse_stmt_list();
        let span = self.span_from(case_pos);
        let clause = CommClause {
            case_pos,
            comm,
            colon,
            body,
        };
        Stmt::new(StmtKind::CommClause(clause), span)
    }
}

fn first_expr(list: Vec<Expr>, offset: usize) -> Expr {
    list.into_iter()
        .next()
        .unwrap_or_else(|| Expr::bad(Span::empty(offset)))
}

fn range_clause(stmt: Stmt) -> RangeClause {
    match stmt.kind {
        StmtKind::Assign {
            lhs, tok, mut rhs, ..
        } => {
            let x = match rhs.pop() {
                Some(Expr {
                    kind: ExprKind::Unary { op: Token::Range, x },
                    ..
                }) => *x,
                Some(other) => other,
                None => Expr::bad(stmt.span),
            };
            (lhs, Some(tok), x)
        }
        _ => (Vec::new(), None, Expr::bad(stmt.span)),
    }
}
