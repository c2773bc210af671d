use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::{AlloyRegistryReader, ReadLimits, RegistryReader, ThrottledReader};
use crate::config::RevoluzionConfig;
use crate::host::{BackendProofValidator, HttpHostBridge, ProofValidator};
use crate::session::{resolve_identity, WalletIdentity};
use crate::wallet::WalletToken;
use crate::workflows::{ErrorKind, PetitionError, PetitionFeed, WorkflowSettings};

pub mod create;
pub mod init;
pub mod petition;
pub mod petitions;
pub mod support;
pub mod wallet;

/// Everything a command needs, resolved once from configuration
pub struct AppContext {
    pub config: RevoluzionConfig,
    pub settings: WorkflowSettings,
    pub reader: Arc<dyn RegistryReader>,
}

impl AppContext {
    pub fn from_config(config: RevoluzionConfig) -> Result<Self> {
        let settings = WorkflowSettings::from_config(&config)?;

        let limits = ReadLimits {
            requests_per_second: config.chain.requests_per_second,
            burst: config.chain.burst,
            record_ttl: Duration::from_secs(config.chain.record_ttl_seconds),
        };
        let reader = AlloyRegistryReader::connect(&config.chain.rpc_url, settings.registry)
            .context("Failed to create RPC reader")?;

        Ok(Self {
            config,
            settings,
            reader: Arc::new(ThrottledReader::new(reader, limits)),
        })
    }

    /// Listings fall back to placeholders when no registry is configured
    pub fn feed(&self) -> PetitionFeed {
        let reader = self.settings.registry.map(|_| Arc::clone(&self.reader));
        PetitionFeed::new(reader)
    }

    pub fn host_bridge(&self) -> Result<Arc<HttpHostBridge>> {
        let bridge = HttpHostBridge::new(
            &self.config.host.bridge_url,
            Duration::from_secs(self.config.host.timeout_seconds),
        )
        .context("Invalid host bridge URL")?;
        Ok(Arc::new(bridge))
    }

    pub fn proof_validator(&self) -> Result<Option<Arc<dyn ProofValidator>>> {
        let Some(url) = self.config.host.proof_check_url.as_deref() else {
            return Ok(None);
        };
        let validator = BackendProofValidator::new(url, Duration::from_secs(self.config.host.timeout_seconds))
            .context("Invalid proof check URL")?;
        Ok(Some(Arc::new(validator)))
    }

    /// `--wallet` wins over the session wallet
    pub fn identity(&self, connected: Option<&str>) -> Option<WalletIdentity> {
        resolve_identity(connected, self.config.session.wallet_address.as_deref())
    }

    pub fn wallet_tokens(&self) -> Vec<WalletToken> {
        let mut tokens = Vec::new();
        if let Some(rvz) = self.settings.token {
            tokens.push(WalletToken {
                symbol: "RVZ",
                address: rvz,
            });
        }
        match alloy_primitives::Address::from_str(&self.config.contracts.wld_token) {
            Ok(wld) => tokens.push(WalletToken {
                symbol: "WLD",
                address: wld,
            }),
            Err(e) => tracing::warn!(error = %e, "Ignoring invalid WLD token address"),
        }
        tokens
    }
}

/// Next step to suggest after a failed petition command
pub fn failure_hint(err: &PetitionError) -> &'static str {
    match err.kind() {
        ErrorKind::Validation => "Fix the fields above and run the command again",
        ErrorKind::Precondition => "Check --wallet, your RVZ balance and the contract addresses in revoluzion.toml",
        ErrorKind::Verification => "Complete the World ID check in the World App, then try again",
        ErrorKind::Submission => "The transaction was not sent; nothing was burned, so it is safe to retry",
        ErrorKind::Unexpected => "Is the mini app host running? Check host.bridge_url",
    }
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("✊ Revoluzion - Human-verified petitions on World Chain");
    println!();
    println!("To get started:");
    println!("  📜 revoluzion petitions          # Browse petitions");
    println!("  🔎 revoluzion petition <ID>      # Read one petition");
    println!("  ✍️  revoluzion support <ID>       # Support it with World ID");
    println!("  🚀 revoluzion create --title ... # Launch your own (burns 1 RVZ)");
    println!("  👛 revoluzion wallet             # Check your balances");
    println!();
    println!("💡 Run 'revoluzion init' to write a starter revoluzion.toml");
    Ok(())
}
