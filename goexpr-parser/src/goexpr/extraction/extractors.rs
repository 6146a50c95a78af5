//! Per-category span extraction
//!
//! Each extractor looks at the first statement of the container body, checks it has the shape
//! its category needs and returns the header span in buffer coordinates. Block headers run
//! from the keyword through the body's `{`; clauses run through their `:`.

use super::category::Category;
use crate::goexpr::ast::range::Span;
use crate::goexpr::ast::{BlockStmt, Stmt, StmtKind};
use crate::goexpr::error::ExtractError;

/// Follows an expression that spreads children into a component
pub const SPREAD_OPERATOR: &str = "...";

/// Span found by an extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub span: Span,
    /// False when the statement has the right shape but its `{` or `:` is missing; the span
    /// then covers the whole statement
    pub complete: bool,
}

impl Header {
    fn complete(span: Span) -> Self {
        Self {
            span,
            complete: true,
        }
    }

    /// Header from `start` through the delimiter at `delim`, or the whole statement
    fn through(start: usize, delim: Option<usize>, stmt: &Stmt) -> Self {
        match delim {
            Some(offset) => Self::complete(Span::new(start, offset + 1)),
            None => Self {
                span: Span::new(start, stmt.span.end.max(start)),
                complete: false,
            },
        }
    }
}

/// Locate the header of `category` in the container body
///
/// `buffer` is the wrapped source the body was parsed from.
pub fn extract_header(
    category: Category,
    body: &BlockStmt,
    buffer: &str,
) -> Result<Header, ExtractError> {
    let stmt = body.list.first().ok_or(ExtractError::ExpectedNodeNotFound)?;
    match category {
        Category::If | Category::ElseIf => if_header(stmt),
        Category::For => for_header(stmt),
        Category::Switch => switch_header(stmt),
        Category::Case => clause_header(stmt, false),
        Category::Default => clause_header(stmt, true),
        Category::Else | Category::Expression => expression(stmt),
        Category::ChildrenSpread => children_spread(stmt, buffer),
    }
}

fn if_header(stmt: &Stmt) -> Result<Header, ExtractError> {
    match &stmt.kind {
        StmtKind::If(s) => Ok(Header::through(s.if_pos, s.body.lbrace, stmt)),
        _ => Err(ExtractError::ExpectedNodeNotFound),
    }
}

fn for_header(stmt: &Stmt) -> Result<Header, ExtractError> {
    match &stmt.kind {
        StmtKind::For(s) => Ok(Header::through(s.for_pos, s.body.lbrace, stmt)),
        StmtKind::Range(s) => Ok(Header::through(s.for_pos, s.body.lbrace, stmt)),
        _ => Err(ExtractError::ExpectedNodeNotFound),
    }
}

fn switch_header(stmt: &Stmt) -> Result<Header, ExtractError> {
    match &stmt.kind {
        StmtKind::Switch(s) => Ok(Header::through(s.switch_pos, s.body.lbrace, stmt)),
        StmtKind::TypeSwitch(s) => Ok(Header::through(s.switch_pos, s.body.lbrace, stmt)),
        _ => Err(ExtractError::ExpectedNodeNotFound),
    }
}

/// First clause of the synthetic `switch {` a lone clause is wrapped in
fn clause_header(stmt: &Stmt, default: bool) -> Result<Header, ExtractError> {
    let StmtKind::Switch(switch) = &stmt.kind else {
        return Err(ExtractError::ExpectedNodeNotFound);
    };
    let Some(clause_stmt) = switch.body.list.first() else {
        return Err(ExtractError::ExpectedNodeNotFound);
    };
    match &clause_stmt.kind {
        StmtKind::CaseClause(clause) if clause.is_default() == default => Ok(Header::through(
            clause.case_pos,
            clause.colon,
            clause_stmt,
        )),
        _ => Err(ExtractError::ExpectedNodeNotFound),
    }
}

fn expression(stmt: &Stmt) -> Result<Header, ExtractError> {
    match &stmt.kind {
        StmtKind::Expr(x) => Ok(Header::complete(x.span)),
        _ => Err(ExtractError::ExpectedNodeNotFound),
    }
}

fn children_spread(stmt: &Stmt, buffer: &str) -> Result<Header, ExtractError> {
    let header = expression(stmt)?;
    let rest = buffer.get(header.span.end..).unwrap_or_default();
    if rest.starts_with(SPREAD_OPERATOR) {
        Ok(header)
    } else {
        Err(ExtractError::ExpectedNodeNotFound)
    }
}
