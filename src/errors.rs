use std::fmt;

use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

/// An evaluation failure, located at a character offset of the input.
///
/// Renders as `In character <offset>: <message> found: <rest of input>` or, when the
/// offending name is known, `In character <offset>: <message> '<name>'`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("In character {offset}: {kind}{found}")]
pub struct EvalError {
    /// Zero-based offset of the character before the cursor; `-1` at the very start.
    pub offset: isize,
    pub kind: ErrorKind,
    pub found: Found,
}

impl EvalError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The identifier this error is about, if any.
    pub fn identifier(&self) -> Option<&str> {
        match &self.found {
            Found::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

// What went wrong, without location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Unexpected end of the string")]
    UnexpectedEnd,

    #[error("Invalid character")]
    InvalidCharacter,

    #[error("Invalid number")]
    InvalidNumber,

    #[error("Expected ')'")]
    ExpectedClosingParen,

    #[error("Invalid characters after expression")]
    TrailingCharacters,

    #[error("Unknown variable")]
    UnknownVariable,

    #[error("Unknown function")]
    UnknownFunction,

    #[error("Unknown unit")]
    UnknownUnit,

    #[error("Too many arguments")]
    TooManyArguments,

    #[error("Expression nested too deeply")]
    TooDeep,

    #[error("{} required", argument_count(.required))]
    ArgumentCount { required: usize },

    // Raised by a variadic callback, reported under the function's name
    #[error("{0}")]
    Function(String),
}

fn argument_count(required: &usize) -> String {
    match required {
        1 => "One argument".to_string(),
        2 => "Two arguments".to_string(),
        n => format!("{n} arguments"),
    }
}

/// Trailing part of an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    EndOfString,
    /// The unconsumed remainder of the input.
    Text(String),
    Identifier(String),
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::EndOfString => write!(f, " found: End of string"),
            Found::Text(rest) => write!(f, " found: {rest}"),
            Found::Identifier(name) => write!(f, " '{name}'"),
        }
    }
}

/// Error returned by a custom variadic function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FunctionError(pub String);

impl From<&str> for FunctionError {
    fn from(msg: &str) -> Self {
        FunctionError(msg.to_string())
    }
}

impl From<String> for FunctionError {
    fn from(msg: String) -> Self {
        FunctionError(msg)
    }
}

/// Failure to load a [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid variable name '{0}'")]
    VariableName(String),

    #[error("invalid unit name '{0}'")]
    UnitName(String),
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
