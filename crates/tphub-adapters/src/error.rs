use thiserror::Error;

/// Failures constructing an adapter. Per-request failures are reported as
/// `RemoteError` through the port instead.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    #[error("Missing API key for {url}")]
    MissingApiKey { url: String },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
