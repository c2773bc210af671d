use alloy::transports::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Transport(String),
    #[error("Failed to decode {method} response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: alloy_sol_types::Error,
    },
    #[error("{method} returned a value that does not fit in 64 bits")]
    Overflow { method: &'static str },
    #[error("Petition registry address is not configured")]
    RegistryNotConfigured,
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        ChainError::Transport(err.to_string())
    }
}
