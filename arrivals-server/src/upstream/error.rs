//! Upstream client error types.

/// Errors from a single upstream lookup.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection or transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Core node answered with something other than 200 OK
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    /// Response body was not a valid arrivals body
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The shared secret can't be sent as a header value
    #[error("shared secret is not a valid header value")]
    InvalidSecret,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err)
        } else {
            UpstreamError::Http(err)
        }
    }
}
