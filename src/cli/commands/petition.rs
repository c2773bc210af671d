use anyhow::Result;

use super::AppContext;

pub struct PetitionCommand {
    pub id: u64,
}

impl PetitionCommand {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        match context.feed().petition(self.id).await {
            Ok(Some(petition)) => {
                println!("📜 {}", petition.title);
                println!();
                println!("{}", petition.description);
                println!();
                println!("   👥 Supporters: {}", petition.progress_label());
                println!("   📅 Created:    {}", petition.created_label());
                if petition.goal_reached() {
                    println!("   🎉 Goal reached!");
                }
                println!();
                println!("💡 Run 'revoluzion support {}' to add your voice", petition.id);
                Ok(())
            }
            Ok(None) => {
                println!("❓ Petition not found");
                println!("   → Petition ids start at 1");
                println!("   → Check that contracts.petition_registry is set");
                Ok(())
            }
            Err(e) => {
                println!("❌ Failed to load petition #{}: {}", self.id, e);
                Err(e.into())
            }
        }
    }
}
