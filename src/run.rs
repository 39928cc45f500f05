//! One stop shop functions to parse and lower source code.

use crate::shared::error::{Error, Diagnostics};
use crate::frontend::{lexer::Token, parser::{Parser, ParsedProgram, error::ParseErrorKind}};
use crate::compiler::{self, Compiler};
use crate::backend::Backend;

/// Parses and lowers the given source one top-level item at a time and returns the reported errors.
///
/// An item that fails to parse or to lower is abandoned and the following items are still processed.
/// After a syntax error the parser skips ahead to the next type keyword or `extern`.
pub fn compile<B>(source: &str, backend: &mut B) -> Vec<Error> where B: Backend {
    let mut errors = Vec::new();
    compile_with(source, backend, &mut errors);
    errors
}

/// Like [compile], but reports errors to the given diagnostics sink.
pub fn compile_with<B, D>(source: &str, backend: &mut B, diagnostics: &mut D) where B: Backend, D: Diagnostics {
    let mut parser = Parser::new(source);
    let mut compiler = Compiler::new(backend);
    while *parser.current() != Token::Eof {
        match parser.parse_item() {
            Ok(item) => {
                if let Err(error) = compiler.compile_item(&item) {
                    diagnostics.report(error.into());
                }
            }
            Err(error) => {
                let stray = *error.kind() == ParseErrorKind::InvalidInput;
                diagnostics.report(error.into());
                if stray {
                    parser.next_token();
                } else {
                    parser.synchronize();
                }
            }
        }
    }
}

/// Lowers an already parsed program and returns the reported errors.
pub fn compile_program<B>(program: &ParsedProgram, backend: &mut B) -> Vec<Error> where B: Backend {
    let mut errors = Vec::new();
    compiler::compile(program, backend, &mut errors);
    errors
}
