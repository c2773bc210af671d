//! Permit2 signature-transfer authorizations
//!
//! A permit lets the registry pull the burn amount from the user's wallet
//! without a prior approval transaction. The host signs it; this module only
//! decides what gets signed.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use super::settings::PERMIT_WINDOW_CEILING;
use crate::host::{Permit2Transfer, TokenAllowance};

/// Marker the host replaces with the signature of the first Permit2 transfer
pub const SIGNATURE_PLACEHOLDER: &str = "PERMIT2_SIGNATURE_PLACEHOLDER_0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermitError {
    #[error("permit window of {0:?} is outside the allowed range (0, 60 minutes)")]
    InvalidWindow(Duration),
    #[error("permit issued before the Unix epoch")]
    InvalidIssueTime,
}

/// Strictly increasing nonces derived from the wall clock in milliseconds.
///
/// Two attempts in the same millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_at(&self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(millis.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        millis.max(previous.saturating_add(1))
    }
}

/// A single-use Permit2 transfer authorization.
///
/// Consumed by [`PermitAuthorization::into_bundle_parts`], so one permit can
/// back at most one submission.
#[derive(Debug, PartialEq, Eq)]
pub struct PermitAuthorization {
    token: Address,
    amount: U256,
    nonce: U256,
    deadline: U256,
    spender: Address,
}

impl PermitAuthorization {
    pub fn issue(
        token: Address,
        amount: U256,
        spender: Address,
        nonce: u64,
        issued_at: DateTime<Utc>,
        window: Duration,
    ) -> Result<Self, PermitError> {
        if window.is_zero() || window >= PERMIT_WINDOW_CEILING {
            return Err(PermitError::InvalidWindow(window));
        }
        let issued = u64::try_from(issued_at.timestamp()).map_err(|_| PermitError::InvalidIssueTime)?;

        Ok(Self {
            token,
            amount,
            nonce: U256::from(nonce),
            deadline: U256::from(issued + window.as_secs()),
            spender,
        })
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    /// Unix seconds after which the permit is void
    pub fn deadline(&self) -> U256 {
        self.deadline
    }

    pub fn spender(&self) -> Address {
        self.spender
    }

    /// `PermitTransferFrom` struct as a contract call argument
    fn call_argument(&self) -> Value {
        json!({
            "permitted": {
                "token": self.token,
                "amount": self.amount.to_string(),
            },
            "nonce": self.nonce.to_string(),
            "deadline": self.deadline.to_string(),
        })
    }

    fn transfer(&self) -> Permit2Transfer {
        Permit2Transfer {
            permitted: TokenAllowance {
                token: self.token,
                amount: self.amount.to_string(),
            },
            nonce: self.nonce.to_string(),
            deadline: self.deadline.to_string(),
            spender: self.spender,
        }
    }

    /// The call argument and the matching transfer for the host to sign.
    pub fn into_bundle_parts(self) -> (Value, Permit2Transfer) {
        (self.call_argument(), self.transfer())
    }
}
