//! Go token definitions
//!
//! Tokens are produced by the logos derive. Whitespace other than newlines is skipped by the
//! lexer itself; newlines and comments are kept so that [`tokenize`](super::lexing::tokenize)
//! can apply Go's automatic semicolon rule before the parser sees the stream.
//!
//! `Semicolon` doubles as the implicit semicolon inserted at line ends. `Eof` and `Illegal` are
//! never matched by logos: the first is appended by the tokenizer, the second stands in for any
//! input logos rejects.
//!
//! Numbers are matched as `Int` with the same permissive extent Go's scanner consumes; the
//! tokenizer then tells `Int`, `Float` and `Imag` apart and validates the digits.

use logos::Logos;
use serde::Serialize;

/// Skip to the closing `*/`; an unterminated comment consumes the rest of the input and is illegal
fn block_comment(lex: &mut logos::Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Layout
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Identifiers and literals
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Ident,
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?([pP][+-]?[0-9_]*)?i?")]
    #[regex(r"(0[oObB][0-9_]*(\.[0-9_]*)?|[0-9][0-9_]*(\.[0-9_]*)?|\.[0-9][0-9_]*)([eEpP][+-]?[0-9_]*)?i?")]
    Int,
    Float,
    Imag,
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Char,
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,
    #[regex(r"`[^`]*`")]
    RawString,

    // Keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // Operators
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Quo,
    #[token("%")]
    Rem,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("^")]
    Xor,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    QuoAssign,
    #[token("%=")]
    RemAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    LAnd,
    #[token("||")]
    LOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    Eql,
    #[token("<")]
    Lss,
    #[token(">")]
    Gtr,
    #[token("=")]
    Assign,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,
    #[token("!=")]
    Neq,
    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,
    #[token(":=")]
    Define,
    #[token("...")]
    Ellipsis,

    // Delimiters
    #[token("(")]
    LParen,
    #[token("[")]
    LBrack,
    #[token("{")]
    LBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token(")")]
    RParen,
    #[token("]")]
    RBrack,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,

    // Synthetic
    Eof,
    Illegal,
}

/// Precedence of a token that is not a binary operator
pub const LOWEST_PREC: u8 = 0;

impl Token {
    /// The spelling Go diagnostics use for this token
    pub fn as_str(&self) -> &'static str {
        use Token::*;
        match self {
            Newline => "newline",
            LineComment | BlockComment => "COMMENT",
            Ident => "IDENT",
            Int => "INT",
            Float => "FLOAT",
            Imag => "IMAG",
            Char => "CHAR",
            String | RawString => "STRING",
            Break => "break",
            Case => "case",
            Chan => "chan",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Defer => "defer",
            Else => "else",
            Fallthrough => "fallthrough",
            For => "for",
            Func => "func",
            Go => "go",
            Goto => "goto",
            If => "if",
            Import => "import",
            Interface => "interface",
            Map => "map",
            Package => "package",
            Range => "range",
            Return => "return",
            Select => "select",
            Struct => "struct",
            Switch => "switch",
            Type => "type",
            Var => "var",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Shl => "<<",
            Shr => ">>",
            AndNot => "&^",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            QuoAssign => "/=",
            RemAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            AndNotAssign => "&^=",
            LAnd => "&&",
            LOr => "||",
            Arrow => "<-",
            Inc => "++",
            Dec => "--",
            Eql => "==",
            Lss => "<",
            Gtr => ">",
            Assign => "=",
            Not => "!",
            Tilde => "~",
            Neq => "!=",
            Leq => "<=",
            Geq => ">=",
            Define => ":=",
            Ellipsis => "...",
            LParen => "(",
            LBrack => "[",
            LBrace => "{",
            Comma => ",",
            Period => ".",
            RParen => ")",
            RBrack => "]",
            RBrace => "}",
            Semicolon => ";",
            Colon => ":",
            Eof => "EOF",
            Illegal => "ILLEGAL",
        }
    }

    /// Identifiers and basic literals; diagnostics print their text instead of their kind
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Int
                | Token::Float
                | Token::Imag
                | Token::Char
                | Token::String
                | Token::RawString
        )
    }

    pub fn is_keyword(&self) -> bool {
        use Token::*;
        matches!(
            self,
            Break
                | Case
                | Chan
                | Const
                | Continue
                | Default
                | Defer
                | Else
                | Fallthrough
                | For
                | Func
                | Go
                | Goto
                | If
                | Import
                | Interface
                | Map
                | Package
                | Range
                | Return
                | Select
                | Struct
                | Switch
                | Type
                | Var
        )
    }

    /// Tokens after which a line break terminates the statement
    pub fn ends_statement(&self) -> bool {
        use Token::*;
        matches!(
            self,
            Ident
                | Int
                | Float
                | Imag
                | Char
                | String
                | RawString
                | Break
                | Continue
                | Fallthrough
                | Return
                | Inc
                | Dec
                | RParen
                | RBrack
                | RBrace
        )
    }

    pub fn is_assign_op(&self) -> bool {
        use Token::*;
        matches!(
            self,
            Assign
                | Define
                | AddAssign
                | SubAssign
                | MulAssign
                | QuoAssign
                | RemAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
                | AndNotAssign
        )
    }

    /// Binary operator precedence, [`LOWEST_PREC`] for everything else
    pub fn precedence(&self) -> u8 {
        use Token::*;
        match self {
            LOr => 1,
            LAnd => 2,
            Eql | Neq | Lss | Leq | Gtr | Geq => 3,
            Add | Sub | Or | Xor => 4,
            Mul | Quo | Rem | Shl | Shr | And | AndNot => 5,
            _ => LOWEST_PREC,
        }
    }

    /// Keywords the parser resynchronises on after a bad statement
    pub fn is_stmt_start(&self) -> bool {
        use Token::*;
        matches!(
            self,
            Break
                | Const
                | Continue
                | Defer
                | Fallthrough
                | For
                | Go
                | Goto
                | If
                | Return
                | Select
                | Switch
                | Type
                | Var
        )
    }

    /// Tokens that can follow a complete expression; used to skip a bad type
    pub fn is_expr_end(&self) -> bool {
        matches!(
            self,
            Token::Comma
                | Token::Colon
                | Token::Semicolon
                | Token::RParen
                | Token::RBrack
                | Token::RBrace
        )
    }

    /// Keywords the parser resynchronises on after a bad top-level declaration
    pub fn is_decl_start(&self) -> bool {
        matches!(
            self,
            Token::Const | Token::Func | Token::Import | Token::Type | Token::Var
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|t| t.unwrap_or(Token::Illegal)).collect()
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(
            kinds("if iffy for range"),
            vec![Token::If, Token::Ident, Token::For, Token::Range]
        );
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds("&^= <<= ... := <- &&"),
            vec![
                Token::AndNotAssign,
                Token::ShlAssign,
                Token::Ellipsis,
                Token::Define,
                Token::Arrow,
                Token::LAnd
            ]
        );
    }

    #[test]
    fn test_numbers_share_one_rule() {
        assert_eq!(kinds("42 0x1p-2 .5 1e 2i 0x"), vec![Token::Int; 6]);
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(
            kinds("a /* b * c */ d /**/"),
            vec![Token::Ident, Token::BlockComment, Token::Ident, Token::BlockComment]
        );
        assert_eq!(kinds("a /* open"), vec![Token::Ident, Token::Illegal]);
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds(r#""a \"quoted\" word" 'x' '\n' `raw
string`"#),
            vec![Token::String, Token::Char, Token::Char, Token::RawString]
        );
        assert_eq!(kinds("'' 'ab'"), vec![Token::Char, Token::Char]);
    }

    #[test]
    fn test_markup_lexes_as_operators() {
        assert_eq!(
            kinds("</div>"),
            vec![Token::Lss, Token::Quo, Token::Ident, Token::Gtr]
        );
    }

    #[test]
    fn test_unknown_characters_are_errors() {
        assert_eq!(kinds("@"), vec![Token::Illegal]);
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(kinds("größe"), vec![Token::Ident]);
    }

    #[test]
    fn test_precedence_table() {
        assert!(Token::Mul.precedence() > Token::Add.precedence());
        assert!(Token::Add.precedence() > Token::Eql.precedence());
        assert!(Token::Eql.precedence() > Token::LAnd.precedence());
        assert!(Token::LAnd.precedence() > Token::LOr.precedence());
        assert_eq!(Token::LBrace.precedence(), LOWEST_PREC);
    }
}
