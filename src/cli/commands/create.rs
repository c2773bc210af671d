use anyhow::Result;

use super::{failure_hint, AppContext};
use crate::workflows::{CreatePetitionWorkflow, PetitionError, SUPPORT_GOALS};

pub struct CreateCommand {
    pub title: String,
    pub description: String,
    pub goal: u64,
    pub wallet: Option<String>,
}

impl CreateCommand {
    pub fn new(title: String, description: String, goal: u64, wallet: Option<String>) -> Self {
        Self {
            title,
            description,
            goal,
            wallet,
        }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        if !SUPPORT_GOALS.contains(&self.goal) {
            println!("⚠️  Goal {} is not one of the usual options {:?}", self.goal, SUPPORT_GOALS);
        }

        let bridge = context.host_bridge()?;
        let mut workflow = CreatePetitionWorkflow::new(
            context.reader.clone(),
            bridge.clone(),
            bridge,
            context.settings.clone(),
        );
        if let Some(validator) = context.proof_validator()? {
            workflow = workflow.with_proof_validator(validator);
        }

        workflow.set_title(&self.title);
        workflow.set_description(&self.description);
        workflow.set_goal(self.goal);

        let identity = context.identity(self.wallet.as_deref());
        if let Some(identity) = &identity {
            println!("👛 Acting as {identity}");
        }
        println!("🚀 {}", workflow.current_status().action_label());
        println!("   Approve the World ID check and the RVZ burn in the World App...");

        match workflow.submit(identity.map(|i| i.address)).await {
            Ok(created) => {
                println!("✅ Petition Created!");
                println!("   🧾 Transaction: {}", created.transaction_id);
                match created.petition_id {
                    Some(id) => println!("   💡 View it with 'revoluzion petition {id}'"),
                    None => println!("   💡 Run 'revoluzion petitions --recent' to find it"),
                }
                Ok(())
            }
            Err(PetitionError::Validation(errors)) => {
                println!("❌ Please fix the following:");
                for (field, message) in errors.iter() {
                    println!("   → {field}: {message}");
                }
                let err = PetitionError::Validation(errors);
                println!("   💡 {}", failure_hint(&err));
                Err(err.into())
            }
            Err(e) => {
                println!("❌ {}", e);
                if let Some(message) = workflow.status().message() {
                    println!("   {message}");
                }
                println!("   💡 {}", failure_hint(&e));
                Err(e.into())
            }
        }
    }
}
