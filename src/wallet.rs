//! Token balances for the wallet page

use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::fmt;

use crate::chain::{ChainError, RegistryReader};

/// Fractional digits shown for balances
pub const DISPLAY_DECIMALS: u8 = 4;

/// A raw token amount with the token's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Decimal rendering truncated (not rounded) to `precision` digits.
    pub fn display(&self, precision: u8) -> String {
        let scale = U256::from(10u64).pow(U256::from(self.decimals));
        let whole = self.raw / scale;
        if precision == 0 || self.decimals == 0 {
            return whole.to_string();
        }

        let fraction = self.raw % scale;
        let digits = precision.min(self.decimals);
        let shown = (fraction / U256::from(10u64).pow(U256::from(self.decimals - digits))).to_string();
        format!("{whole}.{shown:0>width$}", width = digits as usize)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(DISPLAY_DECIMALS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletToken {
    pub symbol: &'static str,
    pub address: Address,
}

#[derive(Debug)]
pub struct TokenBalance {
    pub symbol: &'static str,
    pub token: Address,
    /// Per-token failures do not hide the other balances
    pub amount: Result<TokenAmount, ChainError>,
}

pub async fn wallet_balances(
    reader: &dyn RegistryReader,
    wallet: Address,
    tokens: &[WalletToken],
) -> Vec<TokenBalance> {
    let mut balances = Vec::with_capacity(tokens.len());
    for token in tokens {
        let amount = read_amount(reader, token.address, wallet).await;
        if let Err(e) = &amount {
            tracing::warn!(token = token.symbol, error = %e, "Could not read token balance");
        }
        balances.push(TokenBalance {
            symbol: token.symbol,
            token: token.address,
            amount,
        });
    }
    balances
}

async fn read_amount(
    reader: &dyn RegistryReader,
    token: Address,
    wallet: Address,
) -> Result<TokenAmount, ChainError> {
    let (raw, decimals) = tokio::try_join!(
        reader.token_balance(token, wallet),
        reader.token_decimals(token)
    )?;
    Ok(TokenAmount::new(raw, decimals))
}
