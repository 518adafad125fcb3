//! Errors raised while parsing selectors and stylesheets or running queries.

/// Result alias used throughout `squares-style`.
pub type Result<T> = std::result::Result<T, Error>;

/// Style crate error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A stylesheet could not be tokenized into rules.
    #[error("stylesheet error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// A selector string was rejected.
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    /// Node tree error raised while evaluating a query.
    #[error(transparent)]
    Dom(#[from] squares_core::DomError),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
