//! # goexpr
//!
//! Extracts Go headers and expressions from template fragments.
//!
//! A template engine meets directives such as `if`, `for`, `switch`, `case` or a bare
//! `{ expression }` and needs to know where the Go code ends and the markup starts. The
//! answer comes from parsing, not from scanning for braces: `f(func() { return })` contains a
//! `}` that does not end anything.
//!
//! Layout
//!
//! src/goexpr
//!   ├── lexing, token    Go tokens and automatic semicolons
//!   ├── parsing, ast     A tolerant Go parser producing a syntax tree with byte offsets
//!   ├── extraction       Classification, wrapping, span extraction, error reconciliation
//!   ├── error            Syntax and extraction errors
//!   └── testing          Markup suffixes and assertions shared by the test suites
//!
//! The entry points are re-exported at the crate root: [`extract`] classifies the fragment
//! by its leading keyword, [`extract_as`] runs one category directly.

pub mod goexpr;

pub use goexpr::error::{ErrorList, ExtractError, SyntaxError};
pub use goexpr::extraction::{extract, extract_as, parse_wrapped, Category, Wrapped};
