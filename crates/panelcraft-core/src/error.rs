//! Story error types.

use thiserror::Error;

/// Top-level error type for story generation and session control.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The server is missing configuration it needs to reach the upstream API.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The upstream API answered with a non-success status, or could not be
    /// reached at all.
    #[error("upstream error (status {status}): {message}")]
    Upstream {
        /// HTTP status forwarded by the proxy (500 for transport failures).
        status: u16,
        /// Upstream body or transport error text.
        message: String,
    },

    /// The structured response was malformed or incomplete.
    #[error("validation error: {0}")]
    Validation(String),

    /// The image response matched none of the accepted shapes.
    #[error("unsupported image response shape")]
    UnsupportedShape,

    /// An action was attempted in a session phase that does not allow it.
    #[error("cannot {action} while session is {phase}")]
    InvalidTransition {
        /// The attempted action.
        action: &'static str,
        /// The phase the session was in.
        phase: &'static str,
    },
}
