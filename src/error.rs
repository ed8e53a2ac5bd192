use crate::model::Platform;

/// All errors that can occur while editing or persisting a link collection.
///
/// Field-level validation problems are not errors; they are reported through
/// [`ValidationReport`](crate::ValidationReport) and block saving instead.
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    /// A platform key did not resolve to any descriptor in the registry.
    #[error("unknown platform: {key}")]
    UnknownPlatform { key: String },

    /// A registry table left out at least one platform.
    #[error("platform registry is missing descriptors for: {missing}")]
    IncompleteRegistry { missing: String },

    /// A registry table listed the same platform twice.
    #[error("platform registry lists {platform} more than once")]
    DuplicatePlatform { platform: Platform },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The persistence service answered with a non-success status.
    #[error("save rejected by {url} ({status}): {message}")]
    Rejected {
        url: String,
        status: reqwest::StatusCode,
        message: String,
    },

    /// A persistence backend refused the links with a human-readable reason.
    #[error("failed to save links: {message}")]
    Persistence { message: String },

    /// Failed to read or decode the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },
}

pub type Result<T> = std::result::Result<T, LinkError>;
