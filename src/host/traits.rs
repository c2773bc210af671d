//! Capabilities the mini app host provides.
//!
//! The host owns the user's keys and identity credential. These traits let the
//! workflows ask for a proof or a signed transaction without knowing how the
//! host is reached, and let tests substitute recording fakes.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::errors::HostError;
use super::types::{SendTransactionCommand, SendTransactionResponse, VerifiedProof, VerifyCommand, VerifyResponse};

/// Proof-of-personhood requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Ask the user to prove personhood for `command.action`.
    ///
    /// A rejection by the user or the credential provider is an
    /// `Ok(VerifyResponse::Error { .. })`; `Err` means the host could not be
    /// reached or answered with something unreadable.
    async fn verify(&self, command: &VerifyCommand) -> Result<VerifyResponse, HostError>;
}

/// Signing and broadcasting of contract calls
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionHost: Send + Sync {
    /// Sign any Permit2 transfers in the bundle, inject their signatures into
    /// the calls and broadcast them as one transaction.
    async fn send_transaction(
        &self,
        command: &SendTransactionCommand,
    ) -> Result<SendTransactionResponse, HostError>;
}

/// Server-side check of a proof before it is used
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProofValidator: Send + Sync {
    async fn validate(&self, proof: &VerifiedProof, action: &str, signal: &str) -> Result<bool, HostError>;
}
