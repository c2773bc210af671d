use anyhow::Result;

use super::AppContext;
use crate::wallet::wallet_balances;

pub struct WalletCommand {
    pub wallet: Option<String>,
}

impl WalletCommand {
    pub fn new(wallet: Option<String>) -> Self {
        Self { wallet }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let Some(identity) = context.identity(self.wallet.as_deref()) else {
            println!("🔒 No wallet connected");
            println!("   → Pass --wallet 0x... or set session.wallet_address");
            return Ok(());
        };

        println!("👛 {identity}");
        println!();

        let tokens = context.wallet_tokens();
        for balance in wallet_balances(context.reader.as_ref(), identity.address, &tokens).await {
            match balance.amount {
                Ok(amount) => println!("   {:<4} {}", balance.symbol, amount),
                Err(e) => println!("   {:<4} ⚠️  unavailable ({e})", balance.symbol),
            }
        }
        Ok(())
    }
}
