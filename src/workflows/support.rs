use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, Instrument};

use super::errors::{PetitionError, PreconditionError, SubmissionError, VerificationError};
use super::guard::InFlightGuard;
use super::identity::request_proof;
use super::settings::WorkflowSettings;
use crate::chain::abi::IPetitionRegistry;
use crate::chain::{Petition, RegistryReader};
use crate::host::{
    ContractCall, IdentityVerifier, ProofBundle, ProofValidator, SendTransactionCommand,
    SendTransactionResponse, TransactionHost,
};
use crate::telemetry::{create_workflow_span, generate_correlation_id};

/// Support has no pending display: an attempt goes straight to its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportStatus {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupportState {
    pub status: SupportStatus,
    /// Human-readable error payload of the last failure
    pub message: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportOutcome {
    Supported { transaction_id: String },
    /// Nothing loaded, or another attempt is still running
    Skipped,
}

pub struct SupportPetitionWorkflow {
    reader: Arc<dyn RegistryReader>,
    verifier: Arc<dyn IdentityVerifier>,
    host: Arc<dyn TransactionHost>,
    proof_validator: Option<Arc<dyn ProofValidator>>,
    settings: WorkflowSettings,
    in_flight: Arc<AtomicBool>,
    state: Mutex<SupportState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SupportPetitionWorkflow {
    pub fn new(
        reader: Arc<dyn RegistryReader>,
        verifier: Arc<dyn IdentityVerifier>,
        host: Arc<dyn TransactionHost>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            reader,
            verifier,
            host,
            proof_validator: None,
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(SupportState::default()),
        }
    }

    pub fn with_proof_validator(mut self, validator: Arc<dyn ProofValidator>) -> Self {
        self.proof_validator = Some(validator);
        self
    }

    pub fn is_supporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Shared handle to the in-flight flag, for observers such as a UI
    pub fn in_flight_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.in_flight)
    }

    pub fn state(&self) -> SupportState {
        lock(&self.state).clone()
    }

    /// Support `petition` on behalf of `wallet`.
    ///
    /// Returns [`SupportOutcome::Skipped`] without side effects when no
    /// petition is loaded or an attempt is already running.
    pub async fn support(
        &self,
        petition: Option<&Petition>,
        wallet: Option<Address>,
    ) -> Result<SupportOutcome, PetitionError> {
        let Some(petition) = petition else {
            debug!("No petition loaded, ignoring support request");
            return Ok(SupportOutcome::Skipped);
        };
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!(petition_id = petition.id, "Support already in progress");
            return Ok(SupportOutcome::Skipped);
        };

        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("support_petition", Some(petition.id), &correlation_id);
        self.run(petition.id, wallet).instrument(span).await
    }

    async fn run(&self, petition_id: u64, wallet: Option<Address>) -> Result<SupportOutcome, PetitionError> {
        let wallet = wallet.ok_or(PreconditionError::WalletMissing)?;
        let registry = self
            .settings
            .registry
            .ok_or(PreconditionError::RegistryNotConfigured)?;

        // the proof is bound to the supporting wallet
        let signal = wallet.to_string();
        let proof = match request_proof(
            self.verifier.as_ref(),
            self.proof_validator.as_ref(),
            &self.settings.support_action,
            &signal,
            self.settings.verification_level,
        )
        .await
        {
            Ok(proof) => proof,
            Err(e) => return Err(self.record_verification_failure(e)),
        };

        let bundle = ProofBundle::decode(&proof)
            .map_err(|e| self.record_verification_failure(VerificationError::MalformedProof(e)))?;

        let command = match support_command(registry, petition_id, &bundle) {
            Ok(command) => command,
            Err(e) => {
                self.record_failure(e.to_string());
                return Err(e);
            }
        };

        info!(petition_id, registry = %registry, "Sending support transaction");
        match self.host.send_transaction(&command).await {
            Ok(SendTransactionResponse::Success { transaction_id }) => {
                info!(petition_id, transaction_id = %transaction_id, "Petition supported");
                *lock(&self.state) = SupportState {
                    status: SupportStatus::Success,
                    message: None,
                    transaction_id: Some(transaction_id.clone()),
                };
                self.reader.forget_petition(petition_id).await;
                Ok(SupportOutcome::Supported { transaction_id })
            }
            Ok(SendTransactionResponse::Error { error_code, details }) => {
                error!(petition_id, code = %error_code, "Support transaction failed");
                let err = SubmissionError {
                    code: error_code,
                    details,
                };
                // shown as the host's raw payload
                let payload = serde_json::to_string(&SendTransactionResponse::Error {
                    error_code: err.code.clone(),
                    details: err.details.clone(),
                })
                .unwrap_or_else(|_| err.display_message());
                self.record_failure(payload);
                Err(err.into())
            }
            Err(e) => {
                error!(petition_id, error = %e, "Error supporting petition");
                self.record_failure(e.to_string());
                Err(PetitionError::Unexpected(e.to_string()))
            }
        }
    }

    fn record_verification_failure(&self, err: VerificationError) -> PetitionError {
        let message = match &err {
            VerificationError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.record_failure(message);
        err.into()
    }

    fn record_failure(&self, message: String) {
        *lock(&self.state) = SupportState {
            status: SupportStatus::Error,
            message: Some(message),
            transaction_id: None,
        };
    }
}

fn support_command(
    registry: Address,
    petition_id: u64,
    bundle: &ProofBundle,
) -> Result<SendTransactionCommand, PetitionError> {
    let args: Vec<Value> = vec![
        json!(petition_id.to_string()),
        json!(bundle.merkle_root.to_string()),
        json!(bundle.nullifier_hash.to_string()),
        json!(bundle.proof_args()),
    ];
    let call = ContractCall::new(registry, IPetitionRegistry::supportPetitionCall::SIGNATURE, args)
        .map_err(|e| PetitionError::Unexpected(e.to_string()))?;

    Ok(SendTransactionCommand {
        transaction: vec![call],
        permit2: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_support_command_encodes_proof_as_decimal_strings() {
        let bundle = ProofBundle {
            merkle_root: U256::from(11),
            nullifier_hash: U256::from(22),
            proof: std::array::from_fn(|i| U256::from(i as u64)),
        };

        let command = support_command(Address::repeat_byte(0x44), 9, &bundle).unwrap();
        let call = &command.transaction[0];

        assert_eq!(call.function_name, "supportPetition");
        assert_eq!(call.args[0], json!("9"));
        assert_eq!(call.args[1], json!("11"));
        assert_eq!(call.args[3].as_array().unwrap().len(), 8);
        assert_eq!(call.args[3][7], json!("7"));
        assert!(command.permit2.is_empty());
    }
}
