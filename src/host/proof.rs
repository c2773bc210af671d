use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;
use std::str::FromStr;
use thiserror::Error;

use super::types::VerifiedProof;

/// Number of field elements in a packed Groth16 proof
pub const PROOF_WORDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofDecodeError {
    #[error("{field} is not a valid 256-bit integer: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("proof is not valid hex: {0}")]
    InvalidHex(String),
    #[error("proof must be {expected} bytes of ABI-encoded uint256[8], got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("proof could not be decoded: {0}")]
    Abi(String),
}

/// Proof components in the exact shape `supportPetition` takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofBundle {
    pub merkle_root: U256,
    pub nullifier_hash: U256,
    pub proof: [U256; PROOF_WORDS],
}

impl ProofBundle {
    pub fn decode(verified: &VerifiedProof) -> Result<Self, ProofDecodeError> {
        let merkle_root = parse_field("merkle_root", &verified.merkle_root)?;
        let nullifier_hash = parse_field("nullifier_hash", &verified.nullifier_hash)?;

        let bytes = Bytes::from_str(&verified.proof)
            .map_err(|e| ProofDecodeError::InvalidHex(e.to_string()))?;
        let expected = PROOF_WORDS * 32;
        if bytes.len() != expected {
            return Err(ProofDecodeError::InvalidLength {
                expected,
                actual: bytes.len(),
            });
        }

        let proof = <[U256; PROOF_WORDS]>::abi_decode(&bytes)
            .map_err(|e| ProofDecodeError::Abi(e.to_string()))?;

        Ok(Self {
            merkle_root,
            nullifier_hash,
            proof,
        })
    }

    /// Contract arguments as decimal strings
    pub fn proof_args(&self) -> Vec<String> {
        self.proof.iter().map(U256::to_string).collect()
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<U256, ProofDecodeError> {
    U256::from_str(value.trim()).map_err(|_| ProofDecodeError::InvalidField {
        field,
        value: value.to_string(),
    })
}
