//! Synthetic wrapper
//!
//! The parser only accepts complete files, so fragments are parsed as the body of a
//! container function:
//!
//! ```text
//! package main
//! func templ_container() {
//! <content>
//! ```
//!
//! Everything after the preamble is the caller's content, so an offset `n` in the buffer is
//! offset `n - PREAMBLE_LEN` in the content.

use crate::goexpr::ast::{BlockStmt, File};
use crate::goexpr::debug::debug_trace;
use crate::goexpr::error::{ErrorList, ExtractError};
use crate::goexpr::parsing::parse_file;

pub const CONTAINER_FUNC: &str = "templ_container";
pub const PREAMBLE: &str = "package main\nfunc templ_container() {\n";
pub const PREAMBLE_LEN: usize = PREAMBLE.len();

/// Opens a switch around a lone `case`/`default` clause
pub const CASE_PREFIX: &str = "switch {\n";
pub const CASE_SUFFIX: &str = "\n}";

/// A parsed synthetic buffer
#[derive(Debug, Clone)]
pub struct Wrapped {
    /// Preamble followed by the content
    pub buffer: String,
    pub file: Option<File>,
    /// Sorted by offset
    pub errors: ErrorList,
}

/// Parse `content` as the body of the container function
pub fn parse_wrapped(content: &str) -> Wrapped {
    let buffer = format!("{}{}", PREAMBLE, content);
    let output = parse_file(&buffer);
    let mut errors = output.errors;
    errors.sort();
    debug_trace!(
        "parse_wrapped: {} bytes, tree={}, errors={}",
        buffer.len(),
        output.file.is_some(),
        errors.len()
    );
    Wrapped {
        buffer,
        file: output.file,
        errors,
    }
}

impl Wrapped {
    /// Body of the container function
    ///
    /// A missing tree is returned as the parser's own errors; a tree without the container
    /// function means the preamble itself is broken.
    pub fn container_body(&self) -> Result<&BlockStmt, ExtractError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| ExtractError::Parse(self.errors.clone()))?;
        let body = file
            .first_func()
            .filter(|func| func.name.name == CONTAINER_FUNC && func.recv.is_none())
            .and_then(|func| func.body.as_ref());
        match body {
            Some(body) => Ok(body),
            None => {
                debug_assert!(false, "{} missing from wrapped buffer", CONTAINER_FUNC);
                Err(ExtractError::ContainerFuncNotFound)
            }
        }
    }

    /// The caller's content, without the preamble
    pub fn content(&self) -> &str {
        &self.buffer[PREAMBLE_LEN..]
    }
}
