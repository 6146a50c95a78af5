//! Error reconciliation
//!
//! Fragments are followed by template markup, which is never valid Go, so nearly every
//! wrapped parse reports errors. Only an error that starts before the end of the extracted
//! header is about the header itself; anything later is the markup and is dropped.

use super::extractors::Header;
use super::wrapper::Wrapped;
use crate::goexpr::ast::range::Span;
use crate::goexpr::debug::debug_trace;
use crate::goexpr::error::ExtractError;

/// Decide the outcome of an extraction
///
/// `base` is the buffer offset at which `fragment` starts. Surfaced errors are moved into
/// fragment coordinates, and the extracted text never runs past the fragment into a suffix.
pub fn reconcile(
    wrapped: &Wrapped,
    header: Header,
    base: usize,
    fragment: &str,
) -> Result<String, ExtractError> {
    let end = header.span.end.min(base + fragment.len());
    let extracted = Span::new(header.span.start.min(end), end)
        .slice(&wrapped.buffer)
        .to_string();

    if let Some(error) = wrapped.errors.first() {
        if error.offset < header.span.end {
            debug_trace!(
                "reconcile: surfacing {:?} at {} (header ends at {})",
                error.message,
                error.offset,
                header.span.end
            );
            let offset = error.offset.saturating_sub(base);
            return Err(ExtractError::Syntax {
                error: error.clone().relocate(offset, fragment),
                extracted,
            });
        }
        debug_trace!(
            "reconcile: suppressing {} error(s) from {} onwards",
            wrapped.errors.len(),
            error.offset
        );
    }

    if !header.complete {
        return Err(ExtractError::ExpectedNodeNotFound);
    }
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goexpr::ast::range::Position;
    use crate::goexpr::error::{ErrorList, SyntaxError};
    use crate::goexpr::extraction::wrapper::PREAMBLE_LEN;

    fn wrapped_with_error(content: &str, offset: usize) -> Wrapped {
        let mut errors = ErrorList::new();
        errors.push(SyntaxError::new(offset, Position::new(2, 0), "boom"));
        Wrapped {
            buffer: format!("{}{}", crate::goexpr::extraction::PREAMBLE, content),
            file: None,
            errors,
        }
    }

    fn header(start: usize, end: usize) -> Header {
        Header {
            span: Span::new(start, end),
            complete: true,
        }
    }

    #[test]
    fn test_error_after_header_is_suppressed() {
        let fragment = "f()\n<div>";
        let wrapped = wrapped_with_error(fragment, PREAMBLE_LEN + 4);
        let result = reconcile(&wrapped, header(PREAMBLE_LEN, PREAMBLE_LEN + 3), PREAMBLE_LEN, fragment);
        assert_eq!(result, Ok("f()".to_string()));
    }

    #[test]
    fn test_error_at_header_end_is_suppressed() {
        let fragment = "f()<";
        let wrapped = wrapped_with_error(fragment, PREAMBLE_LEN + 3);
        let result = reconcile(&wrapped, header(PREAMBLE_LEN, PREAMBLE_LEN + 3), PREAMBLE_LEN, fragment);
        assert!(result.is_ok());
    }

    #[test]
    fn test_error_inside_header_is_surfaced_in_fragment_coordinates() {
        let fragment = "f(\n,)";
        let wrapped = wrapped_with_error(fragment, PREAMBLE_LEN + 3);
        let result = reconcile(&wrapped, header(PREAMBLE_LEN, PREAMBLE_LEN + 5), PREAMBLE_LEN, fragment);
        match result {
            Err(ExtractError::Syntax { error, extracted }) => {
                assert_eq!(error.offset, 3);
                assert_eq!(error.position, Position::new(1, 0));
                assert_eq!(extracted, "f(\n,)");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_extracted_text_stops_at_fragment_end() {
        let fragment = "case";
        let content = format!("{}\n}}", fragment);
        let wrapped = wrapped_with_error(&content, PREAMBLE_LEN + 5);
        let result = reconcile(&wrapped, header(PREAMBLE_LEN, PREAMBLE_LEN + 6), PREAMBLE_LEN, fragment);
        match result {
            Err(ExtractError::Syntax { error, extracted }) => {
                assert_eq!(extracted, "case");
                assert_eq!(error.offset, 4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_header_without_error() {
        let wrapped = Wrapped {
            buffer: format!("{}x", crate::goexpr::extraction::PREAMBLE),
            file: None,
            errors: ErrorList::new(),
        };
        let mut incomplete = header(PREAMBLE_LEN, PREAMBLE_LEN + 1);
        incomplete.complete = false;
        assert_eq!(
            reconcile(&wrapped, incomplete, PREAMBLE_LEN, "x"),
            Err(ExtractError::ExpectedNodeNotFound)
        );
    }
}
