use alloy_primitives::U256;
use serde_json::Value;
use thiserror::Error;

use super::draft::FieldErrors;
use crate::host::ProofDecodeError;

#[derive(Debug, Error)]
pub enum PetitionError {
    #[error("Invalid petition: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification for callers that only branch on the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Precondition,
    Verification,
    Submission,
    Unexpected,
}

impl PetitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PetitionError::Validation(_) => ErrorKind::Validation,
            PetitionError::Precondition(_) => ErrorKind::Precondition,
            PetitionError::Verification(_) => ErrorKind::Verification,
            PetitionError::Submission(_) => ErrorKind::Submission,
            PetitionError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<FieldErrors> for PetitionError {
    fn from(errors: FieldErrors) -> Self {
        PetitionError::Validation(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("No wallet connected")]
    WalletMissing,
    #[error("Petition registry address is not configured")]
    RegistryNotConfigured,
    #[error("RVZ token address is not configured")]
    TokenNotConfigured,
    #[error("Registry burns {expected} but {configured} is configured")]
    TokenMismatch {
        expected: alloy_primitives::Address,
        configured: alloy_primitives::Address,
    },
    #[error("Insufficient RVZ balance: have {balance}, need {required}")]
    InsufficientBalance { balance: U256, required: U256 },
    #[error("Another submission is already in progress")]
    AlreadyInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Verification rejected: {error_code}")]
    Rejected { error_code: String, message: String },
    #[error("Mini app host is not available: {0}")]
    HostUnavailable(String),
    #[error("Proof was not accepted by the verification backend")]
    ProofCheckFailed,
    #[error("Malformed proof: {0}")]
    MalformedProof(#[from] ProofDecodeError),
}

/// The host answered the transaction request with a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Transaction failed: {code}")]
pub struct SubmissionError {
    pub code: String,
    pub details: Option<Value>,
}

impl SubmissionError {
    /// Code plus details, for display on the status board
    pub fn display_message(&self) -> String {
        match &self.details {
            Some(details) => format!("{}: {}", self.code, details),
            None => self.code.clone(),
        }
    }
}
