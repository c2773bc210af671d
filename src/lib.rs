// Revoluzion library - human-verified petitions on World Chain
// Exposes the chain reader, host bridge and petition workflows for the CLI and tests

pub mod chain;
pub mod cli;
pub mod config;
pub mod host;
pub mod observability;
pub mod session;
pub mod telemetry;
pub mod wallet;
pub mod workflows;

// Re-export key types for easy access
pub use chain::{AlloyRegistryReader, ChainError, Petition, ReadLimits, RegistryConfig, RegistryReader, ThrottledReader};
pub use config::{config, RevoluzionConfig};
pub use host::{HostError, HttpHostBridge, IdentityVerifier, ProofValidator, TransactionHost};
pub use observability::{rpc_metrics, OperationTimer, RpcMetrics};
pub use session::{resolve_identity, IdentitySource, WalletIdentity};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use wallet::{wallet_balances, TokenAmount, TokenBalance};
pub use workflows::{
    CreatePetitionWorkflow, PetitionError, PetitionFeed, SupportPetitionWorkflow, WorkflowSettings,
};
