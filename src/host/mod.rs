pub mod bridge;
pub mod errors;
pub mod proof;
pub mod traits;
pub mod types;

pub use bridge::{BackendProofValidator, HttpHostBridge};
pub use errors::HostError;
pub use proof::{ProofBundle, ProofDecodeError};
pub use traits::{IdentityVerifier, ProofValidator, TransactionHost};
pub use types::{
    ContractCall, Permit2Transfer, SendTransactionCommand, SendTransactionResponse, TokenAllowance,
    VerificationLevel, VerifiedProof, VerifyCommand, VerifyResponse,
};
