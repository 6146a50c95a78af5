//! Header and expression extraction
//!
//! Template directives hand over everything after their keyword: a Go header or expression
//! followed by arbitrary markup. [`extract`] returns exactly the Go part.
//!
//! The fragment is classified by its leading keyword ([`Category::classify`]), wrapped into a
//! parseable file ([`parse_wrapped`]), cut out of the first statement of the resulting tree
//! and finally checked against the parse errors, of which only those inside the cut are
//! reported.
//!
//! Two categories rewrite the fragment first:
//!
//! - `else if ...` is extracted as `if ...` and `else ` is put back on the result.
//! - `case ...:` and `default:` are wrapped in `switch {` ... `}` so the clause parses on its
//!   own.
//!
//! `else {` is returned as is, without parsing.

mod category;
mod extractors;
mod reconcile;
mod wrapper;

pub use category::Category;
pub use extractors::{extract_header, Header, SPREAD_OPERATOR};
pub use wrapper::{
    parse_wrapped, Wrapped, CASE_PREFIX, CASE_SUFFIX, CONTAINER_FUNC, PREAMBLE, PREAMBLE_LEN,
};

use super::debug::debug_trace;
use super::error::ExtractError;

/// An `else` with no condition
pub const ELSE_BLOCK: &str = "else {";
const ELSE_PREFIX: &str = "else ";

/// Extract the leading Go header or expression of `fragment`
pub fn extract(fragment: &str) -> Result<String, ExtractError> {
    let category = Category::classify(fragment);
    debug_trace!("extract: {:?} classified as {}", fragment, category);
    extract_as(category, fragment)
}

/// Extract `fragment` as `category`, bypassing classification
pub fn extract_as(category: Category, fragment: &str) -> Result<String, ExtractError> {
    match category {
        Category::Else if fragment.starts_with(ELSE_BLOCK) => Ok(ELSE_BLOCK.to_string()),
        Category::ElseIf => extract_else_if(fragment),
        Category::Case | Category::Default => {
            extract_wrapped(category, fragment, CASE_PREFIX, CASE_SUFFIX)
        }
        _ => extract_wrapped(category, fragment, "", ""),
    }
}

fn extract_else_if(fragment: &str) -> Result<String, ExtractError> {
    let rest = fragment
        .strip_prefix(ELSE_PREFIX)
        .ok_or(ExtractError::ExpectedNodeNotFound)?;
    match extract_as(Category::If, rest) {
        Ok(header) => Ok(format!("{}{}", ELSE_PREFIX, header)),
        Err(ExtractError::Syntax { error, extracted }) => {
            let offset = error.offset + ELSE_PREFIX.len();
            Err(ExtractError::Syntax {
                error: error.relocate(offset, fragment),
                extracted: format!("{}{}", ELSE_PREFIX, extracted),
            })
        }
        Err(other) => Err(other),
    }
}

/// Parse `prefix + fragment + suffix` in the wrapper and cut out the header
fn extract_wrapped(
    category: Category,
    fragment: &str,
    prefix: &str,
    suffix: &str,
) -> Result<String, ExtractError> {
    let content = format!("{}{}{}", prefix, fragment, suffix);
    let wrapped = parse_wrapped(&content);
    let body = wrapped.container_body()?;
    let header = extract_header(category, body, &wrapped.buffer)?;
    debug_trace!(
        "extract: {} header at {}",
        category,
        header.span
    );
    reconcile::reconcile(&wrapped, header, PREAMBLE_LEN + prefix.len(), fragment)
}
