use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Mini app host is not available: {0}")]
    Unavailable(String),
    #[error("Host bridge request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response from host: {0}")]
    InvalidResponse(String),
    #[error("Could not encode host command: {0}")]
    Encoding(String),
}
