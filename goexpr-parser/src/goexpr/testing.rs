//! Testing utilities for extraction
//!
//! Fragments handed to the extractor are always followed by template markup. Tests should
//! exercise that situation rather than bare Go, so this module provides the markup suffixes
//! used across the test suites and a small fluent assertion API around [`extract`].
//!
//! ```rust,ignore
//! use goexpr_parser::goexpr::testing::{assert_extract, IF_SUFFIX};
//!
//! assert_extract("if x > 3 {").with_suffix(IF_SUFFIX).yields("if x > 3 {");
//! assert_extract("if x := ; x {").fails_with_syntax_at(8);
//! ```
//!
//! The suffixes are the markup that follows each directive in a template: a block body and
//! its closing brace for `if`/`else`/`for`, and just the closing brace of `{ expr }` for
//! expressions.

use super::error::ExtractError;
use super::extraction::{extract, extract_as, Category};

pub const IF_SUFFIX: &str = "\n<div>\nif true content\n\t</div>}";
pub const ELSE_SUFFIX: &str = "\n<div>\nelse content\n\t</div>}";
pub const FOR_SUFFIX: &str = "\n<div>\nloop content\n\t</div>}";
pub const SWITCH_SUFFIX: &str = "\ncase 1:\n<div>one</div>\n}";
pub const CASE_SUFFIX: &str = "\n<div>case content</div>";
pub const EXPRESSION_SUFFIX: &str = "}";

/// Every suffix, for tests that should hold whatever follows the fragment
pub const ALL_SUFFIXES: [&str; 6] = [
    IF_SUFFIX,
    ELSE_SUFFIX,
    FOR_SUFFIX,
    SWITCH_SUFFIX,
    CASE_SUFFIX,
    EXPRESSION_SUFFIX,
];

/// Start an assertion on the extraction of `fragment`
pub fn assert_extract(fragment: &str) -> ExtractAssertion {
    ExtractAssertion {
        fragment: fragment.to_string(),
        suffix: String::new(),
        category: None,
    }
}

pub struct ExtractAssertion {
    fragment: String,
    suffix: String,
    category: Option<Category>,
}

impl ExtractAssertion {
    /// Markup appended to the fragment before extraction
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Skip classification
    pub fn as_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    fn run(&self) -> (String, Result<String, ExtractError>) {
        let input = format!("{}{}", self.fragment, self.suffix);
        let result = match self.category {
            Some(category) => extract_as(category, &input),
            None => extract(&input),
        };
        (input, result)
    }

    /// Extraction succeeds with exactly `expected`
    pub fn yields(self, expected: &str) {
        let (input, result) = self.run();
        match result {
            Ok(actual) => assert_eq!(actual, expected, "extracting from {:?}", input),
            Err(err) => panic!("extracting from {:?} failed: {}", input, err),
        }
    }

    /// Extraction succeeds and returns the fragment unchanged
    pub fn yields_fragment(self) {
        let expected = self.fragment.clone();
        self.yields(&expected)
    }

    /// Extraction fails with `expected`
    pub fn fails_with(self, expected: ExtractError) {
        let (input, result) = self.run();
        assert_eq!(result, Err(expected), "extracting from {:?}", input);
    }

    /// Extraction fails with a syntax error at `offset` of the input
    pub fn fails_with_syntax_at(self, offset: usize) {
        let (input, result) = self.run();
        match result {
            Err(ExtractError::Syntax { error, .. }) => {
                assert_eq!(error.offset, offset, "error {} in {:?}", error, input)
            }
            other => panic!("expected a syntax error for {:?}, got {:?}", input, other),
        }
    }
}
