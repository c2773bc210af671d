// Recording fakes for the chain and host capabilities - no network access
#![allow(dead_code)]

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use revoluzion::chain::{ChainError, Petition, RegistryConfig, RegistryReader};
use revoluzion::host::{
    HostError, IdentityVerifier, SendTransactionCommand, SendTransactionResponse, TransactionHost,
    VerificationLevel, VerifiedProof, VerifyCommand, VerifyResponse,
};
use revoluzion::workflows::WorkflowSettings;

pub const DESCRIPTION_60: &str = "Cancel the proposed tax on public transit passes this autumn";

pub fn token() -> Address {
    Address::repeat_byte(0x7a)
}

pub fn registry() -> Address {
    Address::repeat_byte(0x25)
}

pub fn wallet() -> Address {
    Address::repeat_byte(0xee)
}

pub fn one_rvz() -> U256 {
    U256::from(10u64).pow(U256::from(18u64))
}

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        registry: Some(registry()),
        token: Some(token()),
        ..WorkflowSettings::default()
    }
}

pub fn petition(id: u64, supporters: u64) -> Petition {
    Petition {
        id,
        title: format!("Petition {id}: keep the night buses running"),
        description: "Night buses are the only way home for shift workers across the city.".to_string(),
        support_count: U256::from(supporters),
        goal: U256::from(100),
        created_at: None,
    }
}

/// Proof as the host returns it: ABI-encoded `uint256[8]` in hex
pub fn valid_proof() -> VerifiedProof {
    let words: [U256; 8] = std::array::from_fn(|i| U256::from(100 + i as u64));
    VerifiedProof {
        merkle_root: "0x0a".to_string(),
        nullifier_hash: "0x0b".to_string(),
        proof: hex::encode_prefixed(words.abi_encode()),
        verification_level: VerificationLevel::Orb,
    }
}

/// In-memory registry with a call log
#[derive(Default)]
pub struct FakeRegistry {
    pub petitions: Mutex<HashMap<u64, Petition>>,
    pub count: Mutex<Option<u64>>,
    pub last_id: Mutex<Option<u64>>,
    pub config: Mutex<Option<RegistryConfig>>,
    pub balance: Mutex<Option<U256>>,
    pub calls: Mutex<Vec<String>>,
    pub forgotten: Mutex<Vec<u64>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_burn_config(self, burn_amount: U256) -> Self {
        *self.config.lock().unwrap() = Some(RegistryConfig {
            token: token(),
            permit2: Address::repeat_byte(0x22),
            burn_amount,
        });
        self
    }

    pub fn with_balance(self, balance: U256) -> Self {
        *self.balance.lock().unwrap() = Some(balance);
        self
    }

    /// Petitions 1..=count, except the ids in `missing` which fail to read
    pub fn with_petitions(self, count: u64, missing: &[u64]) -> Self {
        *self.count.lock().unwrap() = Some(count);
        *self.last_id.lock().unwrap() = Some(count);
        {
            let mut petitions = self.petitions.lock().unwrap();
            for id in 1..=count {
                if !missing.contains(&id) {
                    petitions.insert(id, petition(id, id * 3));
                }
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn unavailable(method: &str) -> ChainError {
        ChainError::Transport(format!("{method}: no data"))
    }
}

#[async_trait]
impl RegistryReader for FakeRegistry {
    async fn petition_count(&self) -> Result<u64, ChainError> {
        self.record("petitionCount");
        let count = *self.count.lock().unwrap();
        count.ok_or_else(|| Self::unavailable("petitionCount"))
    }

    async fn petition(&self, id: u64) -> Result<Petition, ChainError> {
        self.record(format!("getPetition({id})"));
        let petition = self.petitions.lock().unwrap().get(&id).cloned();
        petition.ok_or_else(|| Self::unavailable("getPetition"))
    }

    async fn last_petition_id(&self) -> Result<u64, ChainError> {
        self.record("getLastPetitionId");
        let last_id = *self.last_id.lock().unwrap();
        last_id.ok_or_else(|| Self::unavailable("getLastPetitionId"))
    }

    async fn registry_config(&self) -> Result<RegistryConfig, ChainError> {
        self.record("registryConfig");
        let config = *self.config.lock().unwrap();
        config.ok_or_else(|| Self::unavailable("registryConfig"))
    }

    async fn token_balance(&self, _token: Address, _owner: Address) -> Result<U256, ChainError> {
        self.record("balanceOf");
        let balance = *self.balance.lock().unwrap();
        balance.ok_or_else(|| Self::unavailable("balanceOf"))
    }

    async fn token_decimals(&self, _token: Address) -> Result<u8, ChainError> {
        self.record("decimals");
        Ok(18)
    }

    async fn forget_petition(&self, id: u64) {
        self.forgotten.lock().unwrap().push(id);
    }
}

/// Identity provider that answers every request with the same response
pub struct FakeVerifier {
    response: Result<VerifyResponse, String>,
    pub requests: Mutex<Vec<VerifyCommand>>,
}

impl FakeVerifier {
    fn with_response(response: Result<VerifyResponse, String>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_response(Ok(VerifyResponse::Success(valid_proof())))
    }

    pub fn with_proof(proof: VerifiedProof) -> Self {
        Self::with_response(Ok(VerifyResponse::Success(proof)))
    }

    pub fn rejecting(error_code: &str) -> Self {
        Self::with_response(Ok(VerifyResponse::Error {
            error_code: error_code.to_string(),
            details: None,
        }))
    }

    pub fn unreachable() -> Self {
        Self::with_response(Err("MiniKit is not installed".to_string()))
    }

    pub fn requests(&self) -> Vec<VerifyCommand> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, command: &VerifyCommand) -> Result<VerifyResponse, HostError> {
        self.requests.lock().unwrap().push(command.clone());
        self.response.clone().map_err(HostError::Unavailable)
    }
}

/// Holds a send open until the test lets it finish
#[derive(Default)]
pub struct SendGate {
    entered: Notify,
    release: Notify,
}

/// Transaction host that records every bundle it is asked to send
pub struct FakeHost {
    response: Result<SendTransactionResponse, String>,
    pub sent: Mutex<Vec<SendTransactionCommand>>,
    watched_flag: Mutex<Option<Arc<AtomicBool>>>,
    pub flag_during_send: Mutex<Vec<bool>>,
    gate: Option<SendGate>,
}

impl FakeHost {
    fn with_response(response: Result<SendTransactionResponse, String>) -> Self {
        Self {
            response,
            sent: Mutex::new(Vec::new()),
            watched_flag: Mutex::new(None),
            flag_during_send: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Every send blocks until [`FakeHost::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(SendGate::default());
        self
    }

    /// Resolves once a send has started and is being held open
    pub async fn wait_until_sending(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    pub fn succeeding(transaction_id: &str) -> Self {
        Self::with_response(Ok(SendTransactionResponse::Success {
            transaction_id: transaction_id.to_string(),
        }))
    }

    pub fn failing(error_code: &str) -> Self {
        Self::with_response(Ok(SendTransactionResponse::Error {
            error_code: error_code.to_string(),
            details: None,
        }))
    }

    pub fn unreachable() -> Self {
        Self::with_response(Err("connection refused".to_string()))
    }

    /// Record the value of `flag` each time a bundle is sent
    pub fn watch_flag(&self, flag: Arc<AtomicBool>) {
        *self.watched_flag.lock().unwrap() = Some(flag);
    }

    pub fn sent(&self) -> Vec<SendTransactionCommand> {
        self.sent.lock().unwrap().clone()
    }

    pub fn flag_during_send(&self) -> Vec<bool> {
        self.flag_during_send.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionHost for FakeHost {
    async fn send_transaction(
        &self,
        command: &SendTransactionCommand,
    ) -> Result<SendTransactionResponse, HostError> {
        self.sent.lock().unwrap().push(command.clone());
        let watched = self.watched_flag.lock().unwrap().clone();
        if let Some(flag) = watched {
            self.flag_during_send
                .lock()
                .unwrap()
                .push(flag.load(Ordering::Acquire));
        }
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.response.clone().map_err(HostError::Unavailable)
    }
}
