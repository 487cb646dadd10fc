//! Error types for stagestream.
//!
//! Errors are a small closed set of kinds. Callers branch on [`ErrorKind`]
//! rather than on message text.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// The main error type for stream and collection operations.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// An index was past the end, or a cursor ran out of elements.
    #[error("index out of bounds")]
    OutOfBounds,

    /// A lookup found no qualifying element.
    #[error("element not found")]
    ElementNotFound,

    /// A map lookup found no entry for the key.
    #[error("key not found")]
    KeyNotFound,

    /// The pipeline was cancelled while a terminal operation was waiting.
    #[error("Pipeline cancelled: {0}")]
    Cancelled(String),

    /// A user callback panicked inside a stage or terminal operation.
    #[error("Stage '{stage}' panicked: {message}")]
    Panicked {
        /// The stage that recovered the panic.
        stage: String,
        /// The panic payload, rendered as text.
        message: String,
    },

    /// A stage worker thread could not be started.
    #[error("Failed to spawn stage worker: {0}")]
    Spawn(String),

    /// A caller-supplied error raised by a map function or a collaborator.
    #[error("{0}")]
    Custom(Arc<anyhow::Error>),
}

/// The kind of a [`StreamError`], comparable by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`StreamError::OutOfBounds`].
    OutOfBounds,
    /// See [`StreamError::ElementNotFound`].
    ElementNotFound,
    /// See [`StreamError::KeyNotFound`].
    KeyNotFound,
    /// See [`StreamError::Cancelled`].
    Cancelled,
    /// See [`StreamError::Panicked`].
    Panicked,
    /// See [`StreamError::Spawn`].
    Spawn,
    /// See [`StreamError::Custom`].
    Custom,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "out_of_bounds"),
            Self::ElementNotFound => write!(f, "element_not_found"),
            Self::KeyNotFound => write!(f, "key_not_found"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Panicked => write!(f, "panicked"),
            Self::Spawn => write!(f, "spawn"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl StreamError {
    /// Wraps an arbitrary caller error.
    pub fn custom(error: impl Into<anyhow::Error>) -> Self {
        Self::Custom(Arc::new(error.into()))
    }

    /// Creates a caller error from a message.
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(anyhow::Error::msg(message)))
    }

    /// Converts a recovered panic payload into an error for `stage`.
    #[must_use]
    pub fn from_panic(stage: impl Into<String>, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked {
            stage: stage.into(),
            message,
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds => ErrorKind::OutOfBounds,
            Self::ElementNotFound => ErrorKind::ElementNotFound,
            Self::KeyNotFound => ErrorKind::KeyNotFound,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Panicked { .. } => ErrorKind::Panicked,
            Self::Spawn(_) => ErrorKind::Spawn,
            Self::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns true for [`StreamError::OutOfBounds`].
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds)
    }

    /// Returns true for [`StreamError::ElementNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound)
    }

    /// Returns the wrapped caller error, if this is one.
    #[must_use]
    pub fn as_custom(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Custom(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for StreamError {
    fn from(err: anyhow::Error) -> Self {
        Self::Custom(Arc::new(err))
    }
}
