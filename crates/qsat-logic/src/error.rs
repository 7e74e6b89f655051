//! Error types for the expression language.

use thiserror::Error;

/// Errors raised while reading, rendering or evaluating Boolean expressions.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum LogicError {
    /// Character sequence that is not a token.
    #[error("Lexer error at position {position}: {message}")]
    Lexer { position: usize, message: String },

    /// Token that does not fit the grammar at this point.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Input ended in the middle of an expression.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Input contains no tokens.
    #[error("Empty expression")]
    EmptyExpression,

    /// Negations or parentheses nested beyond the parser's limit.
    #[error("Expression nested deeper than {max} levels")]
    TooDeep { max: usize },

    /// Too many variables to enumerate or simulate.
    #[error("Expression has {count} variables, at most {max} are supported")]
    TooManyVariables { count: usize, max: usize },

    /// Bitstring width does not match the variable count.
    #[error("Bitstring has {got} bits, expected {expected}")]
    BitstringLength { expected: usize, got: usize },

    /// Bitstring contains something other than '0' and '1'.
    #[error("Invalid bit '{found}' at position {position}")]
    InvalidBit { position: usize, found: char },

    /// Malformed DIMACS CNF input.
    #[error("DIMACS error on line {line}: {message}")]
    Dimacs { line: usize, message: String },

    /// Template placeholder without a value.
    #[error("No binding for template placeholder '{{{0}}}'")]
    MissingBinding(String),

    /// Template brace that is neither a placeholder nor an escape.
    #[error("Unbalanced brace at position {position}")]
    UnbalancedBrace { position: usize },

    /// Placeholder name that is not an identifier.
    #[error("Invalid placeholder '{{{name}}}' at position {position}")]
    InvalidPlaceholder { position: usize, name: String },
}

/// Result type for expression operations.
pub type LogicResult<T> = Result<T, LogicError>;
