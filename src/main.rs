use anyhow::Result;
use clap::Parser;

use revoluzion::cli::commands::{
    create::CreateCommand, init::InitCommand, petition::PetitionCommand,
    petitions::PetitionsCommand, show_how_to_get_started, support::SupportCommand,
    wallet::WalletCommand, AppContext,
};
use revoluzion::cli::{Cli, Commands};
use revoluzion::observability::OperationTimer;
use revoluzion::{config, init_telemetry, shutdown_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config()?.clone();
    init_telemetry(&config.observability)?;

    let result = tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            None => show_how_to_get_started().await,
            Some(Commands::Init { force }) => InitCommand::new(force).execute().await,
            Some(command) => {
                let context = AppContext::from_config(config)?;
                let timer = OperationTimer::new("command");
                let result = match command {
                    Commands::Petitions { recent } => {
                        PetitionsCommand::new(recent).execute(&context).await
                    }
                    Commands::Petition { id } => PetitionCommand::new(id).execute(&context).await,
                    Commands::Create {
                        title,
                        description,
                        goal,
                        wallet,
                    } => {
                        CreateCommand::new(title, description, goal, wallet)
                            .execute(&context)
                            .await
                    }
                    Commands::Support { id, wallet } => {
                        SupportCommand::new(id, wallet).execute(&context).await
                    }
                    Commands::Wallet { wallet } => WalletCommand::new(wallet).execute(&context).await,
                    Commands::Init { force } => InitCommand::new(force).execute().await,
                };
                timer.finish();
                result
            }
        }
    });

    shutdown_telemetry();
    result
}
