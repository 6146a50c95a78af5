//! Error types for parsing and extraction

use super::ast::range::{Position, SourceLocation};
use serde::Serialize;
use std::fmt;

/// A syntax error at a byte offset of some buffer
///
/// `position` always describes `offset` in the same buffer; use [`SyntaxError::relocate`]
/// when moving the error into another coordinate space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub offset: usize,
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, position: Position, message: impl Into<String>) -> Self {
        Self {
            offset,
            position,
            message: message.into(),
        }
    }

    /// Move the error to `offset` within `source`, recomputing its line and column
    pub fn relocate(mut self, offset: usize, source: &str) -> Self {
        let offset = offset.min(source.len());
        self.offset = offset;
        self.position = SourceLocation::new(source).byte_to_position(offset);
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.position.line + 1,
            self.position.column + 1,
            self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

/// All syntax errors reported for one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorList(Vec<SyntaxError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: SyntaxError) {
        self.0.push(error);
    }

    /// Order errors by offset; errors at the same offset keep their report order
    pub fn sort(&mut self) {
        self.0.sort_by_key(|e| e.offset);
    }

    pub fn first(&self) -> Option<&SyntaxError> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => write!(f, "no errors"),
            1 => write!(f, "{}", self.0[0]),
            n => write!(f, "{} (and {} more errors)", self.0[0], n - 1),
        }
    }
}

impl std::error::Error for ErrorList {}

/// Errors returned by expression extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The synthetic wrapper did not parse into the container function
    ContainerFuncNotFound,
    /// The first statement did not have the shape the category requires
    ExpectedNodeNotFound,
    /// A syntax error inside the extracted header or expression
    Syntax {
        error: SyntaxError,
        /// Best-effort text of the span the error was found in; not authoritative
        extracted: String,
    },
    /// The parser produced no tree at all
    Parse(ErrorList),
}

impl ExtractError {
    /// The syntax error carried by this error, if any
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            ExtractError::Syntax { error, .. } => Some(error),
            ExtractError::Parse(errors) => errors.first(),
            _ => None,
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::ContainerFuncNotFound => {
                write!(f, "parser error: templ container function not found")
            }
            ExtractError::ExpectedNodeNotFound => {
                write!(f, "parser error: expected node not found")
            }
            ExtractError::Syntax { error, .. } => write!(f, "{}", error),
            ExtractError::Parse(errors) => write!(f, "{}", errors),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Format source code context around an error offset
///
/// Shows `radius` lines before the error, the error line with a >> marker and a caret under
/// the error column, then `radius` lines after. Lines are numbered from 1.
pub fn format_source_context(source: &str, offset: usize, radius: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let position = SourceLocation::new(source).byte_to_position(offset.min(source.len()));
    let error_line = position.line;

    let start_line = error_line.saturating_sub(radius);
    let end_line = (error_line + radius + 1).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
        if line_num == error_line {
            context.push_str(&format!("{}^\n", " ".repeat(position.column + 9)));
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display_is_one_based() {
        let error = SyntaxError::new(3, Position::new(0, 3), "expected operand, found '{'");
        assert_eq!(error.to_string(), "1:4: expected operand, found '{'");
    }

    #[test]
    fn test_relocate_recomputes_position() {
        let error = SyntaxError::new(40, Position::new(2, 7), "boom");
        let moved = error.relocate(6, "ab\ncd\nef");
        assert_eq!(moved.offset, 6);
        assert_eq!(moved.position, Position::new(2, 0));
    }

    #[test]
    fn test_error_list_sort_and_display() {
        let mut errors = ErrorList::new();
        errors.push(SyntaxError::new(9, Position::new(1, 0), "second"));
        errors.push(SyntaxError::new(2, Position::new(0, 2), "first"));
        errors.sort();
        assert_eq!(errors.first().map(|e| e.message.as_str()), Some("first"));
        assert_eq!(errors.to_string(), "1:3: first (and 1 more errors)");
    }

    #[test]
    fn test_extract_error_messages() {
        assert_eq!(
            ExtractError::ContainerFuncNotFound.to_string(),
            "parser error: templ container function not found"
        );
        assert_eq!(
            ExtractError::ExpectedNodeNotFound.to_string(),
            "parser error: expected node not found"
        );
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, 24, 2);

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
    }
}
