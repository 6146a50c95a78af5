//! Parser state, token navigation and error recovery
//!
//! The parser walks the token vector produced by [`tokenize`] with a single cursor. It never
//! stops at the first error: every problem is recorded in an [`ErrorList`] and parsing
//! resumes, so the caller always receives a tree covering everything that parsed before the
//! first error.
//!
//! Progress guarantee: every loop that collects statements, elements or arguments either
//! consumes a token per iteration or exits. `expect` always consumes (except at `Eof`), and
//! `advance` skips at least one token unless it is already positioned on a sync token it has
//! not synchronised on before.

use crate::goexpr::ast::range::{SourceLocation, Span};
use crate::goexpr::ast::{Decl, Expr, ExprKind, File, FuncDecl, GenDecl, Ident, Spec};
use crate::goexpr::error::{ErrorList, SyntaxError};
use crate::goexpr::lexing::{tokenize, LexedToken};
use crate::goexpr::token::Token;

/// Deepest nesting of expressions, types and statements before parsing gives up
pub const MAX_NEST_LEV: u32 = 64;

/// Result of parsing one buffer
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// `None` only when the buffer does not start with a valid package clause
    pub file: Option<File>,
    pub errors: ErrorList,
}

pub struct Parser<'a> {
    pub(super) tokens: Vec<LexedToken<'a>>,
    pub(super) pos: usize,
    /// Nesting level of parentheses; negative inside control clauses
    pub(super) expr_lev: i32,
    nest_lev: u32,
    sync_pos: usize,
    sync_cnt: u32,
    errors: ErrorList,
    locator: SourceLocation,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut parser = Self {
            tokens: tokenize(source),
            pos: 0,
            expr_lev: 0,
            nest_lev: 0,
            sync_pos: 0,
            sync_cnt: 0,
            errors: ErrorList::new(),
            locator: SourceLocation::new(source),
        };
        parser.report_lexical_errors();
        parser
    }

    /// Illegal tokens and malformed literals are reported up front, whatever the parse does
    fn report_lexical_errors(&mut self) {
        let lexical: Vec<(usize, String)> = self
            .tokens
            .iter()
            .flat_map(|t| {
                if t.token == Token::Illegal {
                    vec![(t.span.start, describe_illegal(t.text))]
                } else {
                    t.literal_errors()
                }
            })
            .collect();
        for (offset, message) in lexical {
            self.error(offset, message);
        }
    }

    // =========================================================================
    // Token navigation
    // =========================================================================

    pub(super) fn current(&self) -> &LexedToken<'a> {
        // `next` never moves past the trailing Eof token
        &self.tokens[self.pos]
    }

    pub(super) fn tok(&self) -> Token {
        self.current().token
    }

    pub(super) fn at(&self, token: Token) -> bool {
        self.tok() == token
    }

    pub(super) fn peek(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.token)
            .unwrap_or(Token::Eof)
    }

    /// Byte offset of the current token
    pub(super) fn offset(&self) -> usize {
        self.current().span.start
    }

    /// End offset of the most recently consumed token
    pub(super) fn prev_end(&self) -> usize {
        match self.pos {
            0 => 0,
            n => self.tokens[n - 1].span.end,
        }
    }

    pub(super) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    pub(super) fn next(&mut self) {
        if !self.at(Token::Eof) {
            self.pos += 1;
        }
    }

    /// Run `parse` one nesting level deeper
    ///
    /// Past [`MAX_NEST_LEV`] the error is reported, the rest of the input is skipped and
    /// `bail` builds the placeholder node, so every caller unwinds at `Eof`.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> T,
        bail: impl FnOnce(Span) -> T,
    ) -> T {
        if self.nest_lev >= MAX_NEST_LEV {
            let offset = self.offset();
            self.error(offset, "exceeded max nesting depth");
            self.pos = self.tokens.len() - 1;
            return bail(Span::new(offset, self.offset().max(offset)));
        }
        self.nest_lev += 1;
        let result = parse(self);
        self.nest_lev -= 1;
        result
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(super) fn error(&mut self, offset: usize, message: impl Into<String>) {
        let position = self.locator.byte_to_position(offset);
        self.errors.push(SyntaxError::new(offset, position, message));
    }

    /// Report `expected <what>`, naming the current token when the error is at it
    pub(super) fn error_expected(&mut self, offset: usize, what: &str) {
        let mut message = format!("expected {}", what);
        if offset == self.offset() {
            message.push_str(", found ");
            message.push_str(&self.current().found());
        }
        self.error(offset, message);
    }

    /// Consume `token`, reporting an error if something else is there
    ///
    /// Always makes progress; returns the offset only when the token matched.
    pub(super) fn expect(&mut self, token: Token) -> Option<usize> {
        let offset = self.offset();
        let matched = self.at(token);
        if !matched {
            self.error_expected(offset, &format!("'{}'", token.as_str()));
        }
        self.next();
        matched.then_some(offset)
    }

    /// Like `expect`, with a better message for a line break before a closing delimiter
    pub(super) fn expect_closing(&mut self, token: Token, context: &str) -> Option<usize> {
        if !self.at(token) && self.current().is_implicit_semicolon() {
            let offset = self.offset();
            self.error(
                offset,
                format!("missing ',' before newline in {}", context),
            );
            self.next();
        }
        self.expect(token)
    }

    /// A semicolon is optional before a closing `)` or `}`
    pub(super) fn expect_semi(&mut self) {
        match self.tok() {
            Token::RParen | Token::RBrace => {}
            Token::Comma => {
                let offset = self.offset();
                self.error_expected(offset, "';'");
                self.next();
            }
            Token::Semicolon => self.next(),
            _ => {
                let offset = self.offset();
                self.error_expected(offset, "';'");
                self.advance(Token::is_stmt_start);
            }
        }
    }

    /// True when a list element is followed by a comma, or should be treated as if it were
    pub(super) fn at_comma(&mut self, context: &str, follow: Token) -> bool {
        if self.at(Token::Comma) {
            return true;
        }
        if !self.at(follow) {
            let mut message = "missing ','".to_string();
            if self.current().is_implicit_semicolon() {
                message.push_str(" before newline");
            }
            message.push_str(" in ");
            message.push_str(context);
            let offset = self.offset();
            self.error(offset, message);
            // pretend the comma was there and continue
            return true;
        }
        false
    }

    /// Skip to the next token accepted by `to`
    ///
    /// Stopping twice at the same sync token is allowed a bounded number of times, after
    /// which the token is skipped as well.
    pub(super) fn advance(&mut self, to: fn(&Token) -> bool) {
        while !self.at(Token::Eof) {
            if to(&self.tok()) {
                if self.pos == self.sync_pos && self.sync_cnt < 10 {
                    self.sync_cnt += 1;
                    return;
                }
                if self.pos > self.sync_pos {
                    self.sync_pos = self.pos;
                    self.sync_cnt = 0;
                    return;
                }
            }
            self.next();
        }
    }

    pub(super) fn parse_ident(&mut self) -> Ident {
        let current = *self.current();
        if current.token == Token::Ident {
            self.next();
            Ident {
                name: current.text.to_string(),
                span: current.span,
            }
        } else {
            self.expect(Token::Ident);
            Ident {
                name: "_".to_string(),
                span: Span::empty(current.span.start),
            }
        }
    }

    pub(super) fn ident_expr(ident: Ident) -> Expr {
        let span = ident.span;
        Expr::new(ExprKind::Ident(ident), span)
    }

    // =========================================================================
    // Source file
    // =========================================================================

    pub fn parse_file(mut self) -> ParseOutput {
        let start = self.offset();
        let errors_before = self.errors.len();

        self.expect(Token::Package);
        let package = self.parse_ident();
        self.expect_semi();

        // Without a package clause there is nothing worth returning
        if self.errors.len() > errors_before {
            return ParseOutput {
                file: None,
                errors: self.errors,
            };
        }

        let mut decls = Vec::new();
        while !self.at(Token::Eof) {
            decls.push(self.parse_decl());
        }

        let file = File {
            package,
            decls,
            span: self.span_from(start),
        };
        ParseOutput {
            file: Some(file),
            errors: self.errors,
        }
    }

    fn parse_decl(&mut self) -> Decl {
        match self.tok() {
            Token::Const | Token::Var | Token::Type | Token::Import => {
                Decl::Gen(self.parse_gen_decl())
            }
            Token::Func => Decl::Func(self.parse_func_decl()),
            _ => {
                let start = self.offset();
                self.error_expected(start, "declaration");
                self.advance(Token::is_decl_start);
                Decl::Bad(Span::new(start, self.offset().max(start)))
            }
        }
    }

    fn parse_func_decl(&mut self) -> FuncDecl {
        let start = self.offset();
        self.expect(Token::Func);

        let recv = if self.at(Token::LParen) {
            Some(self.parse_parameters())
        } else {
            None
        };
        let name = self.parse_ident();
        if self.at(Token::LBrack) {
            // type parameters are parsed for tolerance but not kept
            self.parse_type_params();
        }
        let ty = self.parse_signature(None);

        let body = if self.at(Token::LBrace) {
            Some(self.parse_block_stmt())
        } else {
            None
        };
        self.expect_semi();

        FuncDecl {
            recv,
            name,
            ty,
            body,
            span: self.span_from(start),
        }
    }

    /// `var`, `const`, `type` or `import`, single or parenthesised group
    pub(super) fn parse_gen_decl(&mut self) -> GenDecl {
        let start = self.offset();
        let keyword = self.tok();
        self.next();

        let mut specs = Vec::new();
        if self.at(Token::LParen) {
            self.next();
            while !self.at(Token::RParen) && !self.at(Token::Eof) {
                specs.push(self.parse_spec(keyword));
            }
            self.expect(Token::RParen);
            self.expect_semi();
        } else {
            specs.push(self.parse_spec(keyword));
        }

        GenDecl {
            keyword,
            specs,
            span: self.span_from(start),
        }
    }

    fn parse_spec(&mut self, keyword: Token) -> Spec {
        let spec = match keyword {
            Token::Type => {
                let name = self.parse_ident();
                if self.at(Token::LBrack) && self.peek(1) == Token::Ident {
                    self.parse_type_params();
                }
                let alias = self.at(Token::Assign);
                if alias {
                    self.next();
                }
                let ty = self.parse_type();
                Spec::Type { name, alias, ty }
            }
            Token::Import => {
                let name = match self.tok() {
                    Token::Ident => Some(self.parse_ident()),
                    Token::Period => {
                        let span = self.current().span;
                        self.next();
                        Some(Ident {
                            name: ".".to_string(),
                            span,
                        })
                    }
                    _ => None,
                };
                let path = if matches!(self.tok(), Token::String | Token::RawString) {
                    self.parse_operand()
                } else {
                    let offset = self.offset();
                    self.error_expected(offset, "import path");
                    self.advance(Token::is_expr_end);
                    Expr::bad(Span::empty(offset))
                };
                Spec::Value {
                    names: name.into_iter().collect(),
                    ty: None,
                    values: vec![path],
                }
            }
            _ => {
                let mut names = vec![self.parse_ident()];
                while self.at(Token::Comma) {
                    self.next();
                    names.push(self.parse_ident());
                }
                let ty = match self.tok() {
                    Token::Eof | Token::Semicolon | Token::RParen | Token::Assign => None,
                    _ => Some(self.parse_type()),
                };
                let values = if self.at(Token::Assign) {
                    self.next();
                    self.parse_list()
                } else {
                    Vec::new()
                };
                Spec::Value { names, ty, values }
            }
        };
        self.expect_semi();
        spec
    }
}

fn describe_illegal(text: &str) -> String {
    match text.chars().next() {
        Some('"') => "string literal not terminated".to_string(),
        Some('\'') => "rune literal not terminated".to_string(),
        Some('`') => "raw string literal not terminated".to_string(),
        Some('/') if text.starts_with("/*") => "comment not terminated".to_string(),
        Some(c) => format!("illegal character U+{:04X} '{}'", c as u32, c),
        None => "illegal input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_package_clause_yields_no_file() {
        let output = Parser::new("func main() {}").parse_file();
        assert!(output.file.is_none());
        assert_eq!(
            output.errors.first().map(|e| e.message.as_str()),
            Some("expected 'package', found 'func'")
        );
    }

    #[test]
    fn test_parses_function_declaration() {
        let output = Parser::new("package main\nfunc run(a, b int) error {\n}\n").parse_file();
        assert!(output.errors.is_empty(), "{}", output.errors);
        let file = output.file.expect("file");
        let func = file.first_func().expect("func");
        assert_eq!(func.name.name, "run");
        assert_eq!(func.ty.params.fields.len(), 1);
        assert_eq!(func.ty.params.fields[0].names.len(), 2);
        assert!(func.ty.results.is_some());
    }

    #[test]
    fn test_top_level_var_and_import() {
        let source = "package main\nimport \"fmt\"\nvar (\n\tx = 1\n\ty, z string\n)\n";
        let output = Parser::new(source).parse_file();
        assert!(output.errors.is_empty(), "{}", output.errors);
        assert_eq!(output.file.map(|f| f.decls.len()), Some(2));
    }

    #[test]
    fn test_stray_top_level_tokens_are_reported_and_skipped() {
        let output = Parser::new("package main\n<div>\nfunc f() {}\n").parse_file();
        let file = output.file.expect("file");
        assert!(file.first_func().is_some());
        assert_eq!(
            output.errors.first().map(|e| e.message.as_str()),
            Some("expected declaration, found '<'")
        );
    }

    #[test]
    fn test_illegal_characters_are_reported() {
        let output = Parser::new("package main\nfunc f() { @ }\n").parse_file();
        assert!(output
            .errors
            .iter()
            .any(|e| e.message == "illegal character U+0040 '@'"));
    }
}
