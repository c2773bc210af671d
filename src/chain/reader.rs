//! Contract read abstractions
//!
//! Provides the typed read interface the workflows use for registry and token
//! state, and the JSON-RPC implementation backed by an alloy provider.

use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::eth::TransactionRequest;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

#[cfg(test)]
use mockall::automock;

use super::abi::{IPetitionRegistry, IERC20};
use super::errors::ChainError;
use super::types::{Petition, RegistryConfig};

/// Read access to the petition registry and ERC-20 token state.
///
/// Every value is decoded at this boundary; callers never see raw call data.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// Number of petitions ever created
    async fn petition_count(&self) -> Result<u64, ChainError>;

    /// Read a single petition record
    async fn petition(&self, id: u64) -> Result<Petition, ChainError>;

    /// Id of the most recently created petition
    async fn last_petition_id(&self) -> Result<u64, ChainError>;

    /// Token, Permit2 contract and burn amount the registry expects
    async fn registry_config(&self) -> Result<RegistryConfig, ChainError>;

    /// ERC-20 balance of `owner`
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// ERC-20 decimals
    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// Drop any locally held copy of a petition record
    async fn forget_petition(&self, id: u64);
}

/// `eth_call` based reader
pub struct AlloyRegistryReader {
    provider: RootProvider,
    registry: Option<Address>,
}

impl AlloyRegistryReader {
    pub fn connect(rpc_url: &str, registry: Option<Address>) -> Result<Self, ChainError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| ChainError::InvalidUrl(format!("{rpc_url}: {e}")))?;

        Ok(Self {
            provider: RootProvider::new_http(url),
            registry,
        })
    }

    fn registry(&self) -> Result<Address, ChainError> {
        self.registry.ok_or(ChainError::RegistryNotConfigured)
    }

    async fn call<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, ChainError> {
        debug!(to = %to, method = C::SIGNATURE, "eth_call");

        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(call.abi_encode()).into());
        let output = self.provider.call(tx).await?;

        C::abi_decode_returns(&output).map_err(|source| ChainError::Decode {
            method: C::SIGNATURE,
            source,
        })
    }
}

pub(crate) fn to_u64(value: U256, method: &'static str) -> Result<u64, ChainError> {
    if value > U256::from(u64::MAX) {
        return Err(ChainError::Overflow { method });
    }
    Ok(value.to::<u64>())
}

#[async_trait]
impl RegistryReader for AlloyRegistryReader {
    async fn petition_count(&self) -> Result<u64, ChainError> {
        let count = self
            .call(self.registry()?, IPetitionRegistry::petitionCountCall {})
            .await?;
        to_u64(count, IPetitionRegistry::petitionCountCall::SIGNATURE)
    }

    async fn petition(&self, id: u64) -> Result<Petition, ChainError> {
        let record = self
            .call(
                self.registry()?,
                IPetitionRegistry::getPetitionCall {
                    petitionId: U256::from(id),
                },
            )
            .await?;
        Ok(Petition::from_record(id, record))
    }

    async fn last_petition_id(&self) -> Result<u64, ChainError> {
        let id = self
            .call(self.registry()?, IPetitionRegistry::getLastPetitionIdCall {})
            .await?;
        to_u64(id, IPetitionRegistry::getLastPetitionIdCall::SIGNATURE)
    }

    async fn registry_config(&self) -> Result<RegistryConfig, ChainError> {
        let registry = self.registry()?;

        let (token, permit2, burn_amount) = tokio::try_join!(
            self.call(registry, IPetitionRegistry::rvzTokenAddressCall {}),
            self.call(registry, IPetitionRegistry::permit2AddressCall {}),
            self.call(registry, IPetitionRegistry::burnAmountCall {}),
        )?;

        Ok(RegistryConfig {
            token,
            permit2,
            burn_amount,
        })
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        self.call(token, IERC20::balanceOfCall { account: owner }).await
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError> {
        self.call(token, IERC20::decimalsCall {}).await
    }

    async fn forget_petition(&self, _id: u64) {}
}
