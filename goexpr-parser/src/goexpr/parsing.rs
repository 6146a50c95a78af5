//! Go parser
//!
//! Recursive descent over the tokens produced by [`crate::goexpr::lexing`]. The parser is
//! split by grammar area:
//!
//! - `parser`: state, token navigation, error recovery, declarations
//! - `expr`: expressions and composite literals
//! - `types`: type expressions and signatures
//! - `stmt`: statements and blocks
//!
//! Parsing is tolerant: errors are collected and parsing resumes, so [`parse_file`] returns
//! a tree for everything up to (and usually beyond) the first error.

mod expr;
mod parser;
mod stmt;
mod types;

pub use parser::{ParseOutput, Parser, MAX_NEST_LEV};

/// Parse a complete Go source file
pub fn parse_file(source: &str) -> ParseOutput {
    Parser::new(source).parse_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goexpr::ast::{BlockStmt, ExprKind, Stmt, StmtKind};
    use crate::goexpr::token::Token;

    const PREFIX: &str = "package p\nfunc f() {\n";

    fn body_of(source: &str) -> (BlockStmt, ParseOutput) {
        let buffer = format!("{}{}\n}}\n", PREFIX, source);
        let output = parse_file(&buffer);
        let body = output
            .file
            .as_ref()
            .and_then(|f| f.first_func())
            .and_then(|f| f.body.clone())
            .expect("function body");
        (body, output)
    }

    fn first_stmt(source: &str) -> Stmt {
        let (body, output) = body_of(source);
        assert!(output.errors.is_empty(), "{}: {}", source, output.errors);
        body.list.into_iter().next().expect("statement")
    }

    #[test]
    fn test_if_else_chain() {
        let stmt = first_stmt("if x := f(); x > 3 {\n} else if y {\n} else {\n}");
        match stmt.kind {
            StmtKind::If(s) => {
                assert!(s.init.is_some());
                assert_eq!(s.body.lbrace, Some(PREFIX.len() + 19));
                let else_if = s.else_branch.expect("else");
                match else_if.kind {
                    StmtKind::If(inner) => {
                        assert!(matches!(
                            inner.else_branch.map(|b| b.kind),
                            Some(StmtKind::Block(_))
                        ))
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_if_condition_rejects_bare_composite_literal() {
        let (body, output) = body_of("if x == T{} {\n}");
        assert!(!output.errors.is_empty());
        assert!(matches!(body.list[0].kind, StmtKind::If(_)));
    }

    #[test]
    fn test_if_condition_accepts_parenthesized_composite_literal() {
        let stmt = first_stmt("if x == (T{}) {\n}");
        assert!(matches!(stmt.kind, StmtKind::If(_)));
    }

    #[test]
    fn test_missing_condition() {
        let (_, output) = body_of("if {\n}");
        assert_eq!(
            output.errors.first().map(|e| e.message.as_str()),
            Some("missing condition in if statement")
        );
    }

    #[test]
    fn test_for_forms() {
        assert!(matches!(first_stmt("for {\n}").kind, StmtKind::For(_)));
        assert!(matches!(first_stmt("for n < 5 {\n}").kind, StmtKind::For(_)));
        match first_stmt("for i := 0; i < 10; i++ {\n}").kind {
            StmtKind::For(s) => {
                assert!(s.init.is_some() && s.cond.is_some() && s.post.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
        match first_stmt("for ; ; i++ {\n}").kind {
            StmtKind::For(s) => assert!(s.init.is_none() && s.cond.is_none()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_range_forms() {
        match first_stmt("for k, v := range m {\n}").kind {
            StmtKind::Range(s) => {
                assert!(s.key.is_some() && s.value.is_some());
                assert_eq!(s.tok, Some(Token::Define));
                assert!(matches!(s.x.kind, ExprKind::Ident(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        match first_stmt("for range ch {\n}").kind {
            StmtKind::Range(s) => assert!(s.key.is_none() && s.tok.is_none()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_switch_forms() {
        match first_stmt("switch x := f(); x {\ncase 1, 2:\n\tg()\ndefault:\n}").kind {
            StmtKind::Switch(s) => {
                assert!(s.init.is_some() && s.tag.is_some());
                assert_eq!(s.body.list.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        match first_stmt("switch v := x.(type) {\ncase int, *T:\n}").kind {
            StmtKind::TypeSwitch(s) => assert_eq!(s.body.list.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_case_clause_colon_offset() {
        match first_stmt("switch {\ncase a > 1:\n}").kind {
            StmtKind::Switch(s) => match &s.body.list[0].kind {
                StmtKind::CaseClause(c) => {
                    assert_eq!(c.colon, Some(PREFIX.len() + 19));
                    assert!(!c.is_default());
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_simple_statements() {
        let (body, output) = body_of(
            "x, y := 1, 2\nx += y\nx++\nch <- x\ngo run()\ndefer close(ch)\nvar z int\nloop:\n\tfor {\n\t\tbreak loop\n\t}\nreturn",
        );
        assert!(output.errors.is_empty(), "{}", output.errors);
        let kinds: Vec<&str> = body
            .list
            .iter()
            .filter(|s| !matches!(s.kind, StmtKind::Empty { .. }))
            .map(Stmt::kind_name)
            .collect();
        assert_eq!(
            kinds,
            vec![
                "AssignStmt",
                "AssignStmt",
                "IncDecStmt",
                "SendStmt",
                "GoStmt",
                "DeferStmt",
                "DeclStmt",
                "LabeledStmt",
                "ReturnStmt",
            ]
        );
    }

    #[test]
    fn test_select() {
        let stmt = first_stmt("select {\ncase v := <-ch:\n\tuse(v)\ncase out <- 1:\ndefault:\n}");
        match stmt.kind {
            StmtKind::Select(body) => assert_eq!(body.list.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_go_requires_call() {
        let (_, output) = body_of("go x");
        assert!(output
            .errors
            .iter()
            .any(|e| e.message == "expression in go must be function call"));
    }

    #[test]
    fn test_trailing_markup_keeps_first_statement() {
        let buffer = format!("{}if true {{\n<div>\nif true content\n\t</div>}}", PREFIX);
        let output = parse_file(&buffer);
        assert!(!output.errors.is_empty());
        let body = output
            .file
            .as_ref()
            .and_then(|f| f.first_func())
            .and_then(|f| f.body.as_ref())
            .expect("function body");
        match &body.list[0].kind {
            StmtKind::If(s) => assert_eq!(s.body.lbrace, Some(PREFIX.len() + 8)),
            other => panic!("unexpected {:?}", other),
        }
        let mut errors = output.errors.clone();
        errors.sort();
        assert!(errors.first().map(|e| e.offset) > Some(PREFIX.len() + 8));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_NEST_LEV as usize / 2;
        let stmt = first_stmt(&format!("x = {}y{}", "(".repeat(depth), ")".repeat(depth)));
        assert!(matches!(stmt.kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn test_excessive_nesting_is_reported_not_recursed() {
        let sources = [
            format!("f({}x{})", "(".repeat(500), ")".repeat(500)),
            format!("x := {}y", "!".repeat(500)),
            format!("var t {}int", "[]".repeat(500)),
            format!("{}{}", "{".repeat(500), "}".repeat(500)),
            format!("x := T{}{}", "{".repeat(500), "}".repeat(500)),
        ];
        for source in &sources {
            let (_, output) = body_of(source);
            let mut errors = output.errors.clone();
            errors.sort();
            assert_eq!(
                errors.first().map(|e| e.message.as_str()),
                Some("exceeded max nesting depth"),
                "{}",
                &source[..20]
            );
        }
    }
}
