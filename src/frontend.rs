//! Compiler frontend. Scans and parses source text into an AST.

pub mod ast;
pub mod lexer;
pub mod parser;
