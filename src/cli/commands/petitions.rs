use anyhow::Result;

use super::AppContext;
use crate::workflows::PetitionSummary;

pub struct PetitionsCommand {
    pub recent: bool,
}

impl PetitionsCommand {
    pub fn new(recent: bool) -> Self {
        Self { recent }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let feed = context.feed();
        let petitions = if self.recent {
            println!("🔥 Recent petitions");
            feed.recent().await
        } else {
            println!("📜 All petitions");
            feed.all().await
        };
        println!();

        for petition in &petitions {
            print_summary(petition);
        }

        println!("💡 Run 'revoluzion petition <ID>' for details");
        Ok(())
    }
}

fn print_summary(petition: &PetitionSummary) {
    println!("  #{} {}", petition.id, petition.title);
    println!("     {}", petition.description);
    println!("     👥 {} supporters", petition.supporters);
    println!();
}
