use anyhow::Result;

use super::{failure_hint, AppContext};
use crate::workflows::{SupportOutcome, SupportPetitionWorkflow};

pub struct SupportCommand {
    pub id: u64,
    pub wallet: Option<String>,
}

impl SupportCommand {
    pub fn new(id: u64, wallet: Option<String>) -> Self {
        Self { id, wallet }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let petition = context.feed().petition(self.id).await?;
        if petition.is_none() {
            println!("❓ Petition #{} not found", self.id);
            return Ok(());
        }

        let bridge = context.host_bridge()?;
        let mut workflow = SupportPetitionWorkflow::new(
            context.reader.clone(),
            bridge.clone(),
            bridge,
            context.settings.clone(),
        );
        if let Some(validator) = context.proof_validator()? {
            workflow = workflow.with_proof_validator(validator);
        }

        let identity = context.identity(self.wallet.as_deref());
        println!("✍️  Supporting petition #{}...", self.id);
        println!("   Approve the World ID check in the World App...");

        match workflow.support(petition.as_ref(), identity.map(|i| i.address)).await {
            Ok(SupportOutcome::Supported { transaction_id }) => {
                println!("✅ Successfully supported the petition!");
                println!("   🧾 Transaction: {transaction_id}");
                Ok(())
            }
            Ok(SupportOutcome::Skipped) => {
                println!("⏭️  Nothing to do");
                Ok(())
            }
            Err(e) => {
                println!("❌ {}", e);
                if let Some(message) = workflow.state().message {
                    println!("   {message}");
                }
                println!("   💡 {}", failure_hint(&e));
                Err(e.into())
            }
        }
    }
}
