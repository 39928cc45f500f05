pub use crate::shared::error::{Error, Diagnostics};

pub mod types {
    //! Type tags and typed ids.
    pub use crate::shared::types::{Type, Primitive};
    pub use crate::shared::typed_ids::{FunctionId, BlockId, Reg};
}

pub mod lexer {
    //! Token scanning.
    pub use crate::frontend::lexer::{Lexer, Token};
}

pub mod parser {
    //! Sourcecode parsing.
    pub use crate::frontend::parser::{parse, Parser, types::ParsedProgram, error::{ParseError, ParseErrorKind, ParseResult}};
}

pub mod ast {
    //! Abstract syntax tree representation.
    pub use crate::frontend::ast::*;
}
