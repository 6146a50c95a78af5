//! Main module for goexpr library functionality

pub mod ast;
pub mod debug;
pub mod error;
pub mod extraction;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;
