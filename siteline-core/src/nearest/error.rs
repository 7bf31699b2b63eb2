use std::time::Duration;

use thiserror::Error;

/// Errors from [`crate::nearest::NearestFinder::nearest`].
///
/// None of these abort a scoring run: the category contributes zero and the
/// failure is reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The lookup did not complete within its bound.
    #[error("lookup timed out after {timeout:?}")]
    Timeout {
        /// Bound that elapsed.
        timeout: Duration,
    },
    /// The backing index or service could not be reached.
    #[error("nearest-neighbour source unavailable: {message}")]
    Unavailable {
        /// Collaborator-supplied detail.
        message: String,
    },
    /// The backend answered with an error.
    #[error("nearest-neighbour backend failed: {message}")]
    Backend {
        /// Collaborator-supplied detail.
        message: String,
    },
}

impl LookupError {
    /// Convenience constructor for [`LookupError::Unavailable`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`LookupError::Backend`].
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
