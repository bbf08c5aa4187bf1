use thiserror::Error;

/// Failure while fetching or decoding a remote registry document.
///
/// These errors never escape the public resolver operations; every lookup
/// converts them into a fallback [`Outcome`](crate::outcome::Outcome).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
