//! Wallet identity resolution
//!
//! A user can be known through a connected wallet or through the wallet
//! their signed-in session was created with. The connected wallet wins.

use alloy_primitives::Address;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Connected,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletIdentity {
    pub address: Address,
    pub source: IdentitySource,
}

impl fmt::Display for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            IdentitySource::Connected => "connected",
            IdentitySource::Session => "session",
        };
        write!(f, "{} ({source})", self.address)
    }
}

/// Pick the wallet to act as. Unparsable values count as absent.
pub fn resolve_identity(connected: Option<&str>, session: Option<&str>) -> Option<WalletIdentity> {
    parse_wallet(connected, "connected")
        .map(|address| WalletIdentity {
            address,
            source: IdentitySource::Connected,
        })
        .or_else(|| {
            parse_wallet(session, "session").map(|address| WalletIdentity {
                address,
                source: IdentitySource::Session,
            })
        })
}

fn parse_wallet(value: Option<&str>, origin: &str) -> Option<Address> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    match Address::from_str(raw) {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(origin, value = raw, error = %e, "Ignoring invalid wallet address");
            None
        }
    }
}
