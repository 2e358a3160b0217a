//! Catalog fetch error taxonomy.

/// Fallback message when the API reports failure without a detail string.
const APPLICATION_FALLBACK: &str = "Failed to fetch movies";

/// User-visible message for transport-level failures.
const TRANSPORT_MESSAGE: &str = "Something went wrong.";

/// Error returned by catalog fetch operations.
///
/// Distinguishes transport-level failures (connection errors, non-2xx
/// statuses, undecodable bodies) from application-level failures that
/// the API reports inside a 2xx response body.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// Network failure, non-success HTTP status, or undecodable body.
    #[error("could not fetch movie data: {detail}")]
    Transport {
        /// Diagnostic detail (status code, reqwest error, decode error).
        detail: String,
    },

    /// The API returned a success status but reported failure in the body
    /// (the legacy `Response: "False"` envelope).
    #[error("{message}")]
    Application {
        /// Message reported by the API, or a generic fallback.
        message: String,
    },
}

impl CatalogError {
    /// Builds a transport error from any displayable cause.
    pub(crate) fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }

    /// Builds an application error from an optional API-provided message.
    pub(crate) fn application(message: Option<String>) -> Self {
        Self::Application {
            message: message.unwrap_or_else(|| String::from(APPLICATION_FALLBACK)),
        }
    }

    /// Returns the message suitable for end-user display.
    ///
    /// Transport details are collapsed into a generic message; application
    /// failures surface the API's own message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport { .. } => TRANSPORT_MESSAGE,
            Self::Application { message } => message,
        }
    }
}
