//! Error types for the Squares widget.

use squares_core::DomError;

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mounting or driving the widget.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Node tree or facade error.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Selector or stylesheet error.
    #[error(transparent)]
    Style(#[from] squares_style::Error),

    /// Configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The grid no longer satisfies its structural invariants.
    #[error("Grid invariant violated: {message}")]
    Invariant { message: String },
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// The underlying node tree error, if any.
    pub fn as_dom(&self) -> Option<&DomError> {
        match self {
            Self::Dom(e) => Some(e),
            Self::Style(squares_style::Error::Dom(e)) => Some(e),
            _ => None,
        }
    }
}
