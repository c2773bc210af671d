use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Petition registry deployed on World Chain mainnet
pub const DEFAULT_PETITION_REGISTRY: &str = "0x255286d8D754474e95e4485eCaE0c60D889803F6";
/// Worldcoin (WLD) token on World Chain
pub const DEFAULT_WLD_TOKEN: &str = "0x2cFc85d8E48F8EAB294be644d9E25C3030863003";
/// Canonical Permit2 deployment, same address on every chain
pub const DEFAULT_PERMIT2: &str = "0x000000000022D473030F116dDEE9F6B43aC78BA3";

/// Main configuration structure for Revoluzion
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RevoluzionConfig {
    /// JSON-RPC endpoint and read limits
    #[serde(default)]
    pub chain: ChainConfig,
    /// Contract addresses
    #[serde(default)]
    pub contracts: ContractsConfig,
    /// Mini app host bridge
    #[serde(default)]
    pub host: HostConfig,
    /// Petition workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Wallet the session is signed in with
    #[serde(default)]
    pub session: SessionConfig,
    /// Observability settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint used for contract reads
    pub rpc_url: String,
    /// Sustained read rate against the endpoint
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst: u32,
    /// How long petition records stay cached
    pub record_ttl_seconds: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://worldchain-mainnet.g.alchemy.com/public".to_string(),
            requests_per_second: 5,
            burst: 10,
            record_ttl_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// PetitionRegistry address (falls back to PETITION_REGISTRY_ADDRESS)
    pub petition_registry: Option<String>,
    /// RVZ token address (falls back to RVZ_TOKEN_ADDRESS)
    pub rvz_token: Option<String>,
    pub wld_token: String,
    pub permit2: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            petition_registry: None,
            rvz_token: None,
            wld_token: DEFAULT_WLD_TOKEN.to_string(),
            permit2: DEFAULT_PERMIT2.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Base URL of the host bridge (`/verify`, `/send-transaction`)
    pub bridge_url: String,
    /// Optional backend that double-checks proofs
    pub proof_check_url: Option<String>,
    /// Request timeout; verification waits on the user, so keep it generous
    pub timeout_seconds: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bridge_url: "http://127.0.0.1:8787".to_string(),
            proof_check_url: None,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Action tag for petition creation proofs
    pub create_action: String,
    /// Signal for petition creation proofs
    pub create_signal: String,
    /// Action tag for support proofs
    pub support_action: String,
    /// orb or device
    pub verification_level: String,
    /// Burn amount in base units when the registry cannot be read
    pub fallback_burn_amount: String,
    /// Permit validity; must stay below the 60 minute Permit2 ceiling
    pub permit_window_minutes: u64,
    pub confirmation_delay_seconds: u64,
    pub navigation_delay_seconds: u64,
    pub status_reset_seconds: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            create_action: "voting-action".to_string(),
            create_signal: "0x12312".to_string(),
            support_action: "support-action".to_string(),
            verification_level: "orb".to_string(),
            fallback_burn_amount: "1000000000000000000".to_string(),
            permit_window_minutes: 30,
            confirmation_delay_seconds: 5,
            navigation_delay_seconds: 1,
            status_reset_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Wallet address of the signed-in session
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl RevoluzionConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (revoluzion.toml, .revoluzion-rc)
    /// 3. Environment variables (REVOLUZION__SECTION__KEY)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("revoluzion.toml").exists() {
            builder = builder.add_source(File::with_name("revoluzion"));
        }

        if Path::new(".revoluzion-rc").exists() {
            builder = builder.add_source(
                File::with_name(".revoluzion-rc").format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("REVOLUZION")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut revoluzion_config: RevoluzionConfig = builder.build()?.try_deserialize()?;
        revoluzion_config.apply_contract_fallbacks(|key| std::env::var(key).ok());

        Ok(revoluzion_config)
    }

    /// Fill unset contract addresses from the well-known variables, then from
    /// the built-in registry deployment.
    pub fn apply_contract_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let unset = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if unset(&self.contracts.petition_registry) {
            self.contracts.petition_registry = lookup("PETITION_REGISTRY_ADDRESS")
                .or_else(|| Some(DEFAULT_PETITION_REGISTRY.to_string()));
        }

        if unset(&self.contracts.rvz_token) {
            self.contracts.rvz_token = lookup("RVZ_TOKEN_ADDRESS");
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<RevoluzionConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = RevoluzionConfig::load_env_file();
        RevoluzionConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static RevoluzionConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
