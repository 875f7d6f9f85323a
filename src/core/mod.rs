//! Core translation logic.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod types;
