//! Lexer
//!
//!     Turns a Go source buffer into the flat token vector the parser walks. Logos does the
//!     raw tokenization; this module then drops comments, resolves line breaks with Go's
//!     automatic semicolon rule and appends a terminating `Eof` token.
//!
//! Semicolon Insertion
//!
//!     A line break becomes a `Semicolon` when the last significant token was an identifier,
//!     a literal, one of `break continue fallthrough return`, `++`, `--`, `)`, `]` or `}`.
//!     The same rule fires at end of input and for block comments that span a line break.
//!     Inserted semicolons carry the text `"\n"` so that diagnostics can say "newline".
//!
//! Illegal Input
//!
//!     Lexing never fails. Anything logos cannot match (stray `@`, `#`, unterminated
//!     strings or comments) becomes an `Illegal` token; the parser reports it at its offset.
//!     Template markup that follows a Go fragment is routinely illegal, and that is expected.
//!
//! Literals
//!
//!     Numbers and quoted literals keep their token kind even when malformed (`0x`, `08`,
//!     `'ab'`, `"\q"`). [`LexedToken::literal_errors`] reports what is wrong with them.

mod literals;

use super::ast::range::Span;
use super::token::Token;
use logos::Logos;
use serde::Serialize;

/// A token with its byte span and source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexedToken<'a> {
    pub token: Token,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> LexedToken<'a> {
    pub fn new(token: Token, span: Span, text: &'a str) -> Self {
        Self { token, span, text }
    }

    /// True for semicolons produced by a line break or end of input
    pub fn is_implicit_semicolon(&self) -> bool {
        self.token == Token::Semicolon && self.text == "\n"
    }

    /// How a diagnostic refers to this token: `newline`, the literal text, or `'tok'`
    pub fn found(&self) -> String {
        if self.is_implicit_semicolon() {
            "newline".to_string()
        } else if self.token.is_literal() {
            self.text.to_string()
        } else if self.token == Token::Illegal {
            format!("'{}'", self.text)
        } else {
            format!("'{}'", self.token.as_str())
        }
    }

    /// Problems with a malformed literal, as absolute offsets and messages
    pub fn literal_errors(&self) -> Vec<(usize, String)> {
        literals::literal_errors(self.token, self.text)
            .into_iter()
            .map(|(at, message)| (self.span.start + at, message))
            .collect()
    }
}

/// Tokenize Go source, applying semicolon insertion
pub fn tokenize(source: &str) -> Vec<LexedToken<'_>> {
    let mut tokens = Vec::new();
    let mut insert_semi = false;
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        let text = lexer.slice();
        let token = match result {
            Ok(Token::Int) => literals::number_kind(text),
            Ok(token) => token,
            Err(()) => Token::Illegal,
        };

        match token {
            Token::Newline => {
                if insert_semi {
                    tokens.push(LexedToken::new(Token::Semicolon, span, "\n"));
                    insert_semi = false;
                }
                continue;
            }
            Token::LineComment => continue,
            Token::BlockComment => {
                if insert_semi && text.contains('\n') {
                    tokens.push(LexedToken::new(Token::Semicolon, span, "\n"));
                    insert_semi = false;
                }
                continue;
            }
            Token::Illegal => {}
            _ => insert_semi = token.ends_statement(),
        }

        tokens.push(LexedToken::new(token, span, text));
    }

    let end = source.len();
    if insert_semi {
        tokens.push(LexedToken::new(Token::Semicolon, Span::empty(end), "\n"));
    }
    tokens.push(LexedToken::new(Token::Eof, Span::empty(end), ""));
    tokens
}
