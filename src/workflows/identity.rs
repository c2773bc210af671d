use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::VerificationError;
use crate::host::{
    IdentityVerifier, ProofValidator, VerificationLevel, VerifiedProof, VerifyCommand, VerifyResponse,
};

/// Ask the host for a personhood proof and, when a validator is configured,
/// have it checked before the proof is used.
pub(crate) async fn request_proof(
    verifier: &dyn IdentityVerifier,
    validator: Option<&Arc<dyn ProofValidator>>,
    action: &str,
    signal: &str,
    verification_level: VerificationLevel,
) -> Result<VerifiedProof, VerificationError> {
    let command = VerifyCommand {
        action: action.to_string(),
        signal: signal.to_string(),
        verification_level,
    };
    debug!(action, signal, "Requesting proof of personhood");

    let response = verifier
        .verify(&command)
        .await
        .map_err(|e| VerificationError::HostUnavailable(e.to_string()))?;

    let proof = match response {
        VerifyResponse::Success(proof) => proof,
        VerifyResponse::Error { error_code, details } => {
            warn!(error_code = %error_code, "Verification rejected");
            // keep the host's payload verbatim for display
            let message = serde_json::to_string(&VerifyResponse::Error {
                error_code: error_code.clone(),
                details,
            })
            .unwrap_or_else(|_| error_code.clone());
            return Err(VerificationError::Rejected { error_code, message });
        }
    };

    if let Some(validator) = validator {
        let accepted = validator
            .validate(&proof, action, signal)
            .await
            .map_err(|e| VerificationError::HostUnavailable(e.to_string()))?;
        if !accepted {
            warn!(action, "Proof rejected by verification backend");
            return Err(VerificationError::ProofCheckFailed);
        }
    }

    info!(action, level = ?proof.verification_level, "Personhood verified");
    Ok(proof)
}
