//! Petition creation
//!
//! One attempt runs validation, preconditions, identity verification, the
//! burn-amount and balance checks, and finally submits a single bundle: the
//! `createPetitionWithPermit2` call plus the Permit2 transfer the host signs.
//! Nothing is retried.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tracing::{error, info, warn, Instrument};

use super::draft::{DraftField, FieldErrors, PetitionDraft};
use super::errors::{PetitionError, PreconditionError, SubmissionError};
use super::guard::InFlightGuard;
use super::identity::request_proof;
use super::permit::{NonceSource, PermitAuthorization, SIGNATURE_PLACEHOLDER};
use super::settings::WorkflowSettings;
use super::status::{StatusBoard, SubmissionStatus};
use crate::chain::abi::IPetitionRegistry;
use crate::chain::{RegistryConfig, RegistryReader};
use crate::host::{
    ContractCall, IdentityVerifier, ProofValidator, SendTransactionCommand, SendTransactionResponse,
    TransactionHost,
};
use crate::telemetry::{create_workflow_span, generate_correlation_id};

/// Result of a successful creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPetition {
    pub transaction_id: String,
    /// Newest petition id after confirmation, if it could be read
    pub petition_id: Option<u64>,
}

pub struct CreatePetitionWorkflow {
    reader: Arc<dyn RegistryReader>,
    verifier: Arc<dyn IdentityVerifier>,
    host: Arc<dyn TransactionHost>,
    proof_validator: Option<Arc<dyn ProofValidator>>,
    settings: WorkflowSettings,
    registry_config: OnceCell<Option<RegistryConfig>>,
    draft: Mutex<PetitionDraft>,
    field_errors: Mutex<FieldErrors>,
    status: StatusBoard,
    nonces: NonceSource,
    in_flight: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CreatePetitionWorkflow {
    pub fn new(
        reader: Arc<dyn RegistryReader>,
        verifier: Arc<dyn IdentityVerifier>,
        host: Arc<dyn TransactionHost>,
        settings: WorkflowSettings,
    ) -> Self {
        let status = StatusBoard::new(settings.status_reset_delay);
        Self {
            reader,
            verifier,
            host,
            proof_validator: None,
            settings,
            registry_config: OnceCell::new(),
            draft: Mutex::new(PetitionDraft::default()),
            field_errors: Mutex::new(FieldErrors::default()),
            status,
            nonces: NonceSource::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_proof_validator(mut self, validator: Arc<dyn ProofValidator>) -> Self {
        self.proof_validator = Some(validator);
        self
    }

    pub fn set_title(&self, title: impl Into<String>) {
        lock(&self.draft).title = title.into();
        lock(&self.field_errors).clear(DraftField::Title);
    }

    pub fn set_description(&self, description: impl Into<String>) {
        lock(&self.draft).description = description.into();
        lock(&self.field_errors).clear(DraftField::Description);
    }

    pub fn set_goal(&self, goal: u64) {
        lock(&self.draft).goal = goal;
        lock(&self.field_errors).clear(DraftField::Goal);
    }

    pub fn draft(&self) -> PetitionDraft {
        lock(&self.draft).clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        lock(&self.field_errors).clone()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one creation attempt for `wallet`.
    pub async fn submit(&self, wallet: Option<Address>) -> Result<CreatedPetition, PetitionError> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("create_petition", None, &correlation_id);
        self.run(wallet).instrument(span).await
    }

    async fn run(&self, wallet: Option<Address>) -> Result<CreatedPetition, PetitionError> {
        let draft = self.draft();
        if let Err(errors) = draft.validate() {
            warn!(%errors, "Petition form validation failed");
            *lock(&self.field_errors) = errors.clone();
            return Err(PetitionError::Validation(errors));
        }
        *lock(&self.field_errors) = FieldErrors::default();

        let wallet = wallet.ok_or(PreconditionError::WalletMissing)?;
        let registry = self
            .settings
            .registry
            .ok_or(PreconditionError::RegistryNotConfigured)?;
        let token = self.settings.token.ok_or(PreconditionError::TokenNotConfigured)?;
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(PreconditionError::AlreadyInFlight)?;

        request_proof(
            self.verifier.as_ref(),
            self.proof_validator.as_ref(),
            &self.settings.create_action,
            &self.settings.create_signal,
            self.settings.verification_level,
        )
        .await?;

        let burn_amount = self.burn_amount(token).await?;
        self.check_balance(token, wallet, burn_amount).await?;

        self.status.begin();
        let command = match self.build_command(&draft, registry, token, burn_amount) {
            Ok(command) => command,
            Err(e) => {
                self.status.fail(e.to_string());
                return Err(e);
            }
        };

        info!(
            registry = %registry,
            burn_amount = %burn_amount,
            goal = draft.goal,
            "Submitting petition creation"
        );

        match self.host.send_transaction(&command).await {
            Ok(SendTransactionResponse::Success { transaction_id }) => {
                Ok(self.confirm(transaction_id).await)
            }
            Ok(SendTransactionResponse::Error { error_code, details }) => {
                let err = SubmissionError {
                    code: error_code,
                    details,
                };
                error!(code = %err.code, details = ?err.details, "Transaction submission failed");
                self.status.fail(err.display_message());
                Err(err.into())
            }
            Err(e) => {
                error!(error = %e, "Error creating petition");
                self.status.fail(e.to_string());
                Err(PetitionError::Unexpected(e.to_string()))
            }
        }
    }

    /// Registry config is read once per workflow; a failed read is cached too.
    async fn registry_config(&self) -> Option<RegistryConfig> {
        *self
            .registry_config
            .get_or_init(|| async {
                match self.reader.registry_config().await {
                    Ok(config) => Some(config),
                    Err(e) => {
                        warn!(error = %e, "Could not read registry configuration, using fallback burn amount");
                        None
                    }
                }
            })
            .await
    }

    async fn burn_amount(&self, token: Address) -> Result<U256, PreconditionError> {
        match self.registry_config().await {
            Some(config) if config.token != token => {
                error!(contract_token = %config.token, configured_token = %token, "Token configuration mismatch");
                Err(PreconditionError::TokenMismatch {
                    expected: config.token,
                    configured: token,
                })
            }
            Some(config) => Ok(config.burn_amount),
            None => Ok(self.settings.fallback_burn_amount),
        }
    }

    async fn check_balance(
        &self,
        token: Address,
        wallet: Address,
        required: U256,
    ) -> Result<(), PreconditionError> {
        match self.reader.token_balance(token, wallet).await {
            Ok(balance) if balance < required => {
                error!(balance = %balance, required = %required, "Insufficient RVZ balance");
                Err(PreconditionError::InsufficientBalance { balance, required })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                // the transfer itself will fail on-chain if the balance is short
                warn!(error = %e, "Error checking RVZ balance, continuing");
                Ok(())
            }
        }
    }

    fn build_command(
        &self,
        draft: &PetitionDraft,
        registry: Address,
        token: Address,
        burn_amount: U256,
    ) -> Result<SendTransactionCommand, PetitionError> {
        let nonce = self.nonces.next_at(Utc::now());
        let permit = PermitAuthorization::issue(
            token,
            burn_amount,
            registry,
            nonce,
            Utc::now(),
            self.settings.permit_window,
        )
        .map_err(|e| PetitionError::Unexpected(e.to_string()))?;
        let (permit_argument, transfer) = permit.into_bundle_parts();

        let args: Vec<Value> = vec![
            json!(draft.title),
            json!(draft.description),
            json!(draft.goal.to_string()),
            permit_argument,
            json!(SIGNATURE_PLACEHOLDER),
        ];
        let call = ContractCall::new(
            registry,
            IPetitionRegistry::createPetitionWithPermit2Call::SIGNATURE,
            args,
        )
        .map_err(|e| PetitionError::Unexpected(e.to_string()))?;

        Ok(SendTransactionCommand {
            transaction: vec![call],
            permit2: vec![transfer],
        })
    }

    async fn confirm(&self, transaction_id: String) -> CreatedPetition {
        info!(transaction_id = %transaction_id, "Transaction submitted successfully");

        tokio::time::sleep(self.settings.confirmation_delay).await;
        self.status.succeed();
        *lock(&self.draft) = PetitionDraft::default();

        tokio::time::sleep(self.settings.navigation_delay).await;
        self.status.reset_now();

        let petition_id = match self.reader.last_petition_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Could not read newest petition id");
                None
            }
        };

        CreatedPetition {
            transaction_id,
            petition_id,
        }
    }

    pub fn current_status(&self) -> SubmissionStatus {
        self.status.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::reader::MockRegistryReader;
    use crate::host::traits::{MockIdentityVerifier, MockProofValidator, MockTransactionHost};
    use crate::host::{VerificationLevel, VerifiedProof, VerifyResponse};
    use std::time::Duration;

    fn wallet() -> Address {
        Address::repeat_byte(0xcc)
    }

    fn settings() -> WorkflowSettings {
        WorkflowSettings {
            registry: Some(Address::repeat_byte(0xbb)),
            token: Some(Address::repeat_byte(0xaa)),
            ..WorkflowSettings::default()
        }
    }

    fn verified() -> VerifyResponse {
        VerifyResponse::Success(VerifiedProof {
            merkle_root: "0x01".to_string(),
            nullifier_hash: "0x02".to_string(),
            proof: "0x".to_string(),
            verification_level: VerificationLevel::Orb,
        })
    }

    fn filled(workflow: &CreatePetitionWorkflow) {
        workflow.set_title("Fix the bike lanes on Main St");
        workflow.set_description(
            "The painted bike lanes on Main Street have faded and cars now park across them daily.",
        );
        workflow.set_goal(500);
    }

    #[tokio::test]
    async fn test_token_mismatch_stops_before_submission() {
        let mut reader = MockRegistryReader::new();
        reader.expect_registry_config().times(1).returning(|| {
            Ok(RegistryConfig {
                token: Address::repeat_byte(0x01),
                permit2: Address::ZERO,
                burn_amount: U256::from(1),
            })
        });
        reader.expect_token_balance().never();

        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().times(1).returning(|_| Ok(verified()));
        let mut host = MockTransactionHost::new();
        host.expect_send_transaction().never();

        let workflow = CreatePetitionWorkflow::new(
            Arc::new(reader),
            Arc::new(verifier),
            Arc::new(host),
            settings(),
        );
        filled(&workflow);

        let err = workflow.submit(Some(wallet())).await.unwrap_err();
        assert!(matches!(
            err,
            PetitionError::Precondition(PreconditionError::TokenMismatch { .. })
        ));
        assert_eq!(workflow.current_status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_rejected_proof_check_is_verification_error() {
        let mut reader = MockRegistryReader::new();
        reader.expect_registry_config().never();

        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().times(1).returning(|_| Ok(verified()));
        let mut validator = MockProofValidator::new();
        validator
            .expect_validate()
            .withf(|_, action, signal| action.to_string() == "voting-action" && signal.to_string() == "0x12312")
            .times(1)
            .returning(|_, _, _| Ok(false));
        let mut host = MockTransactionHost::new();
        host.expect_send_transaction().never();

        let workflow = CreatePetitionWorkflow::new(
            Arc::new(reader),
            Arc::new(verifier),
            Arc::new(host),
            settings(),
        )
        .with_proof_validator(Arc::new(validator));
        filled(&workflow);

        let err = workflow.submit(Some(wallet())).await.unwrap_err();
        assert!(matches!(
            err,
            PetitionError::Verification(super::super::errors::VerificationError::ProofCheckFailed)
        ));
        assert!(!workflow.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_exception_is_unexpected_and_keeps_draft() {
        let mut reader = MockRegistryReader::new();
        reader.expect_registry_config().times(1).returning(|| {
            Err(crate::chain::ChainError::Transport("timeout".to_string()))
        });
        reader
            .expect_token_balance()
            .returning(|_, _| Err(crate::chain::ChainError::Transport("timeout".to_string())));

        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().returning(|_| Ok(verified()));
        let mut host = MockTransactionHost::new();
        host.expect_send_transaction()
            .times(1)
            .returning(|_| Err(crate::host::HostError::InvalidResponse("502".to_string())));

        let workflow = CreatePetitionWorkflow::new(
            Arc::new(reader),
            Arc::new(verifier),
            Arc::new(host),
            settings(),
        );
        filled(&workflow);

        let err = workflow.submit(Some(wallet())).await.unwrap_err();
        assert!(matches!(err, PetitionError::Unexpected(_)));
        assert_eq!(workflow.current_status(), SubmissionStatus::Error);
        assert_eq!(workflow.draft().goal, 500);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(workflow.current_status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_editing_a_field_clears_its_error() {
        let workflow = CreatePetitionWorkflow::new(
            Arc::new(MockRegistryReader::new()),
            Arc::new(MockIdentityVerifier::new()),
            Arc::new(MockTransactionHost::new()),
            settings(),
        );

        let mut errors = FieldErrors::default();
        errors.insert(DraftField::Title, "Title is required");
        errors.insert(DraftField::Goal, "Goal must be at least 1 supporter");
        *lock(&workflow.field_errors) = errors;

        workflow.set_title("A longer title");
        let remaining = workflow.field_errors();
        assert_eq!(remaining.get(DraftField::Title), None);
        assert!(remaining.get(DraftField::Goal).is_some());
    }
}
