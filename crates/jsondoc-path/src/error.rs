use std::error::Error as StdError;
use std::fmt;

/// Failure compiling a path expression.
///
/// `offset` is the byte position within the full expression text where
/// the failure was detected, including positions inside filter
/// sub-expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub(crate) offset: usize,
    pub(crate) message: &'static str,
    /// The failure happened inside a `?(...)` filter sub-expression.
    pub(crate) in_filter: bool,
}

impl ParseError {
    /// Byte offset of the failure within the expression.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn message(&self) -> &str {
        self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_filter {
            write!(
                f,
                "JSONPath filter parse error at position {}: {}",
                self.offset, self.message
            )
        } else {
            write!(
                f,
                "JSONPath parse error at position {}: {}",
                self.offset, self.message
            )
        }
    }
}

impl StdError for ParseError {}

/// Failure evaluating a compiled path against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// An `@`-rooted expression reached a public entry point.
    RelativeRoot,
    /// A slice with step 0 was applied to a non-empty array.
    SliceStepZero,
    /// A filter function was called with other than one argument.
    FunctionArity,
    /// The right-hand side of `=~` is not a usable regular expression.
    InvalidRegex,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            EvalError::RelativeRoot => "JSONPath expression must start with '$'",
            EvalError::SliceStepZero => "JSONPath slice step cannot be zero",
            EvalError::FunctionArity => "Filter function expects exactly one argument",
            EvalError::InvalidRegex => "Invalid regular expression in JSONPath filter",
        };
        f.write_str(message)
    }
}

impl StdError for EvalError {}

/// Any failure from the public query entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => e.fmt(f),
            Error::Eval(e) => e.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Error {
        Error::Eval(e)
    }
}
