use alloy::json_abi::Function;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::HostError;

/// Strength of the personhood credential a proof must come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    #[default]
    Orb,
    Device,
}

impl std::str::FromStr for VerificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orb" => Ok(VerificationLevel::Orb),
            "device" => Ok(VerificationLevel::Device),
            other => Err(format!("unknown verification level '{other}' (expected orb or device)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyCommand {
    pub action: String,
    pub signal: String,
    pub verification_level: VerificationLevel,
}

/// Zero-knowledge proof as the host hands it back: hex strings, still undecoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedProof {
    pub merkle_root: String,
    pub nullifier_hash: String,
    pub proof: String,
    pub verification_level: VerificationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyResponse {
    Success(VerifiedProof),
    Error {
        error_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

/// One contract call inside a transaction bundle.
///
/// Arguments are JSON so the host can substitute placeholders (the Permit2
/// signature) before encoding; big integers travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractCall {
    pub address: Address,
    #[serde(rename = "functionName")]
    pub function_name: String,
    pub abi: Vec<Value>,
    pub args: Vec<Value>,
}

impl ContractCall {
    /// Build a call from a canonical signature such as `supportPetition(uint256,...)`.
    pub fn new(address: Address, signature: &str, args: Vec<Value>) -> Result<Self, HostError> {
        let function = Function::parse(signature)
            .map_err(|e| HostError::Encoding(format!("{signature}: {e}")))?;
        let abi = serde_json::to_value(&function)
            .map_err(|e| HostError::Encoding(format!("{signature}: {e}")))?;

        Ok(Self {
            address,
            function_name: function.name.clone(),
            abi: vec![abi],
            args,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAllowance {
    pub token: Address,
    pub amount: String,
}

/// Permit2 signature-transfer request the host signs on the user's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permit2Transfer {
    pub permitted: TokenAllowance,
    pub nonce: String,
    pub deadline: String,
    pub spender: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendTransactionCommand {
    pub transaction: Vec<ContractCall>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permit2: Vec<Permit2Transfer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendTransactionResponse {
    Success {
        transaction_id: String,
    },
    Error {
        error_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}
