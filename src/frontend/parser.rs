//! Recursive descent parser generating the minic AST.
//!
//! The parser pulls tokens from the [Lexer] one at a time and keeps exactly one token of lookahead.
//! Binary operators are parsed right-associatively: `1 + 2 + 3` yields `1 + (2 + 3)`.

pub mod error;
pub mod types;

use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token};
use crate::shared::types::Type;
use error::{ParseResult, ParseErrorKind};
pub use error::ParseError;
pub use types::ParsedProgram;

/// Parses the given source into a program, failing on the first syntax error.
///
/// Use [Parser] directly to recover from errors and continue with the following items.
pub fn parse(source: &str) -> ParseResult<ParsedProgram> {
    let mut parser = Parser::new(source);
    let mut items = Vec::new();
    while !parser.at_eof() {
        items.push(parser.parse_item()?);
    }
    Ok(ParsedProgram(items))
}

/// Parser state: the lexer and the current token.
pub struct Parser<'a> {
    lexer   : Lexer<'a>,
    current : Token,
    position: Position,
    /// Number of unclosed `{` consumed so far.
    depth   : usize,
}

impl<'a> Parser<'a> {

    /// Creates a parser for the given source, loaded with the first token.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let position = lexer.position();
        Parser { lexer, current, position, depth: 0 }
    }

    /// The current token.
    pub fn current(self: &Self) -> &Token {
        &self.current
    }

    /// Position of the current token.
    pub fn position(self: &Self) -> Position {
        self.position
    }

    /// Whether the end of the input was reached.
    pub fn at_eof(self: &Self) -> bool {
        self.current == Token::Eof
    }

    /// Replaces the current token with the next one from the lexer.
    pub fn next_token(self: &mut Self) -> &Token {
        if self.current.is_char('{') {
            self.depth += 1;
        } else if self.current.is_char('}') {
            self.depth = self.depth.saturating_sub(1);
        }
        self.current = self.lexer.next_token();
        self.position = self.lexer.position();
        &self.current
    }

    /// Skips tokens until one that can start a top-level item (or the end of the input) is current.
    /// Tokens within the braces of an abandoned item are skipped.
    pub fn synchronize(self: &mut Self) {
        while self.current != Token::Eof && (self.depth > 0 || !matches!(self.current, Token::Type(_) | Token::Extern)) {
            self.next_token();
        }
    }

    /// Returns an error of the given kind at the current token.
    fn error<T>(self: &Self, kind: ParseErrorKind) -> ParseResult<T> {
        Err(ParseError::new(kind, self.position, self.current.to_string()))
    }

    /// Consumes the given punctuation character or fails with the given error kind.
    fn expect_char(self: &mut Self, c: char, kind: ParseErrorKind) -> ParseResult {
        if self.current.is_char(c) {
            self.next_token();
            Ok(())
        } else {
            self.error(kind)
        }
    }

    /// Consumes an identifier and returns its name or fails with the given error kind.
    fn expect_identifier(self: &mut Self, kind: ParseErrorKind) -> ParseResult<String> {
        if let Token::Identifier(name) = &self.current {
            let name = name.clone();
            self.next_token();
            Ok(name)
        } else {
            self.error(kind)
        }
    }

    /// Consumes a type keyword and returns the type or fails with the given error kind.
    fn expect_type(self: &mut Self, kind: ParseErrorKind) -> ParseResult<Type> {
        if let Token::Type(ty) = self.current {
            self.next_token();
            Ok(ty)
        } else {
            self.error(kind)
        }
    }

    // item (function definition or extern declaration)

    /// Parses one top-level item.
    pub fn parse_item(self: &mut Self) -> ParseResult<Item> {
        match self.current {
            Token::Type(_) => Ok(Item::Function(self.parse_function_definition()?)),
            Token::Extern => Ok(Item::Extern(self.parse_extern()?)),
            _ => self.error(ParseErrorKind::InvalidInput),
        }
    }

    // extern double sqrt(double x);

    /// Parses an extern declaration, starting at `extern`.
    pub fn parse_extern(self: &mut Self) -> ParseResult<Prototype> {
        self.next_token(); // extern
        if !matches!(self.current, Token::Type(_)) {
            return self.error(ParseErrorKind::ExpectedType);
        }
        let prototype = self.parse_prototype()?;
        self.expect_char(';', ParseErrorKind::ExpectedExternTerminator)?;
        Ok(prototype)
    }

    // int add(int a, int b) { ... }

    /// Parses a function definition, starting at its return type.
    pub fn parse_function_definition(self: &mut Self) -> ParseResult<Function> {
        let position = self.position;
        let prototype = self.parse_prototype()?;
        let body = self.parse_block(ParseErrorKind::ExpectedFunctionBody)?;
        Ok(Function { position, prototype, body })
    }

    // int add(int a, int b)

    /// Parses a prototype, starting at its return type.
    pub fn parse_prototype(self: &mut Self) -> ParseResult<Prototype> {
        let position = self.position;
        let ret = self.expect_type(ParseErrorKind::ExpectedType)?;
        let name = self.expect_identifier(ParseErrorKind::ExpectedFunctionName)?;
        self.expect_char('(', ParseErrorKind::ExpectedParamsOpen)?;
        let mut params = Vec::new();
        if !self.current.is_char(')') {
            loop {
                let position = self.position;
                let ty = self.expect_type(ParseErrorKind::ExpectedParamType)?;
                let name = self.expect_identifier(ParseErrorKind::ExpectedParamName)?;
                params.push(Param { position, name, ty });
                if !self.current.is_char(',') {
                    break;
                }
                self.next_token();
            }
        }
        self.expect_char(')', ParseErrorKind::ExpectedParamsClose)?;
        Ok(Prototype { position, name, params, ret })
    }

    // { statement* }

    /// Parses a block of statements. A missing `{` is reported with the given error kind.
    pub fn parse_block(self: &mut Self, missing: ParseErrorKind) -> ParseResult<Block> {
        let position = self.position;
        self.expect_char('{', missing)?;
        let mut statements = Vec::new();
        while !self.current.is_char('}') {
            statements.push(self.parse_statement()?);
        }
        self.next_token(); // }
        Ok(Block { position, statements })
    }

    // statement

    /// Parses a single statement including its terminating `;`, if any.
    pub fn parse_statement(self: &mut Self) -> ParseResult<Statement> {
        let statement = match self.current {
            Token::Identifier(_) => Statement::Assignment(self.parse_assignment()?),
            Token::Type(_) => Statement::Declaration(self.parse_declaration()?),
            Token::Return => Statement::Return(self.parse_return()?),
            Token::If => return Ok(Statement::IfElse(self.parse_if_else()?)),
            Token::While => return Ok(Statement::While(self.parse_while()?)),
            Token::Char('{') => return Ok(Statement::Block(self.parse_block(ParseErrorKind::ExpectedBlock)?)),
            _ => return self.error(ParseErrorKind::ExpectedStatement),
        };
        self.expect_char(';', ParseErrorKind::ExpectedTerminator)?;
        Ok(statement)
    }

    // Int a, b

    /// Parses a variable declaration, starting at its type.
    pub fn parse_declaration(self: &mut Self) -> ParseResult<Declaration> {
        let position = self.position;
        let ty = self.expect_type(ParseErrorKind::ExpectedType)?;
        let mut names = vec![ self.expect_identifier(ParseErrorKind::ExpectedIdentifier)? ];
        while self.current.is_char(',') {
            self.next_token();
            names.push(self.expect_identifier(ParseErrorKind::ExpectedIdentifier)?);
        }
        Ok(Declaration { position, ty, names })
    }

    // a = expression

    /// Parses an assignment, starting at its target.
    pub fn parse_assignment(self: &mut Self) -> ParseResult<Assignment> {
        let position = self.position;
        let target = self.expect_identifier(ParseErrorKind::ExpectedStatement)?;
        self.expect_char('=', ParseErrorKind::ExpectedAssignment)?;
        let expr = self.parse_expression()?;
        Ok(Assignment { position, target, expr })
    }

    // return expression

    /// Parses a return statement, starting at `return`.
    pub fn parse_return(self: &mut Self) -> ParseResult<Return> {
        let position = self.position;
        self.next_token(); // return
        let expr = self.parse_expression()?;
        Ok(Return { position, expr })
    }

    // if (expression) { ... } else { ... }

    /// Parses an if/else statement, starting at `if`. A missing else branch yields an empty block.
    pub fn parse_if_else(self: &mut Self) -> ParseResult<IfElse> {
        let position = self.position;
        self.next_token(); // if
        let cond = self.parse_condition("if")?;
        let if_block = self.parse_block(ParseErrorKind::ExpectedBlock)?;
        let else_block = if self.current == Token::Else {
            self.next_token(); // else
            if self.current == Token::If {
                let position = self.position;
                let nested = self.parse_if_else()?;
                Block { position, statements: vec![ Statement::IfElse(nested) ] }
            } else {
                self.parse_block(ParseErrorKind::ExpectedBlock)?
            }
        } else {
            Block { position: self.position, statements: Vec::new() }
        };
        Ok(IfElse { position, cond, if_block, else_block })
    }

    // while (expression) { ... }

    /// Parses a while loop, starting at `while`.
    pub fn parse_while(self: &mut Self) -> ParseResult<While> {
        let position = self.position;
        self.next_token(); // while
        let cond = self.parse_condition("while")?;
        let block = self.parse_block(ParseErrorKind::ExpectedBlock)?;
        Ok(While { position, cond, block })
    }

    /// Parses a parenthesized condition following the given keyword.
    fn parse_condition(self: &mut Self, keyword: &'static str) -> ParseResult<Expression> {
        self.expect_char('(', ParseErrorKind::ExpectedConditionOpen(keyword))?;
        let cond = self.parse_expression()?;
        self.expect_char(')', ParseErrorKind::ExpectedConditionClose)?;
        Ok(cond)
    }

    // expression: value (< expression)?

    /// Parses a full expression.
    pub fn parse_expression(self: &mut Self) -> ParseResult<Expression> {
        let left = self.parse_value()?;
        self.parse_binary_tail(left, &[ '<' ], Self::parse_expression)
    }

    // value: term ((+|-) value)?

    fn parse_value(self: &mut Self) -> ParseResult<Expression> {
        let left = self.parse_term()?;
        self.parse_binary_tail(left, &[ '+', '-' ], Self::parse_value)
    }

    // term: factor (* term)?

    fn parse_term(self: &mut Self) -> ParseResult<Expression> {
        let left = self.parse_factor()?;
        self.parse_binary_tail(left, &[ '*' ], Self::parse_term)
    }

    /// If the current token is one of the given operators, parses the right operand with the given parser
    /// and returns the binary operation. Otherwise returns the left operand.
    fn parse_binary_tail(self: &mut Self, left: Expression, operators: &[char], right: fn(&mut Self) -> ParseResult<Expression>) -> ParseResult<Expression> {
        let op = match self.current {
            Token::Char(c) if operators.contains(&c) => BinaryOperator::from_char(c),
            _ => None,
        };
        match op {
            Some(op) => {
                self.next_token(); // operator
                let right = right(self)?;
                Ok(Expression::BinaryOp(Box::new(BinaryOp { position: left.position(), op, left, right })))
            }
            None => Ok(left),
        }
    }

    // factor: (expression) | identifier | call | literal

    fn parse_factor(self: &mut Self) -> ParseResult<Expression> {
        let position = self.position;
        match self.current {
            Token::Char('(') => {
                self.next_token(); // (
                let expr = self.parse_expression()?;
                self.expect_char(')', ParseErrorKind::ExpectedGroupClose)?;
                Ok(expr)
            }
            Token::Identifier(_) => self.parse_identifier_expr(),
            Token::Int(value) => {
                self.next_token();
                Ok(Expression::IntLiteral(IntLiteral { position, value }))
            }
            Token::Double(value) => {
                self.next_token();
                Ok(Expression::DoubleLiteral(DoubleLiteral { position, value }))
            }
            _ => self.error(ParseErrorKind::ExpectedFactor),
        }
    }

    // variable | callee(expression, ...)

    fn parse_identifier_expr(self: &mut Self) -> ParseResult<Expression> {
        let position = self.position;
        let name = self.expect_identifier(ParseErrorKind::ExpectedFactor)?;
        if !self.current.is_char('(') {
            return Ok(Expression::Variable(Variable { position, name }));
        }
        self.next_token(); // (
        let mut args = Vec::new();
        if !self.current.is_char(')') {
            loop {
                args.push(self.parse_expression()?);
                if !self.current.is_char(',') {
                    break;
                }
                self.next_token();
            }
        }
        self.expect_char(')', ParseErrorKind::ExpectedArgumentsClose)?;
        Ok(Expression::Call(Call { position, callee: name, args }))
    }
}
