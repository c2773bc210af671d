use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "revoluzion")]
#[command(about = "Create and support human-verified petitions on World Chain")]
#[command(long_about = "Revoluzion lets verified humans launch petitions by burning RVZ through a \
                       gasless Permit2 transfer, and support petitions with a World ID proof. \
                       Proofs and signatures come from the mini app host; reads go straight to the chain.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List petitions, newest first
    Petitions {
        /// Only the three most recent petitions
        #[arg(long, help = "Show only the three most recent petitions")]
        recent: bool,
    },
    /// Show a single petition
    Petition {
        /// On-chain petition id (starts at 1)
        id: u64,
    },
    /// Launch a new petition (burns RVZ)
    Create {
        #[arg(long, help = "Petition title, at least 10 characters")]
        title: String,
        #[arg(long, help = "Petition description, at least 50 characters")]
        description: String,
        #[arg(long, default_value = "100", help = "Supporter goal: 100, 500, 1000, 5000, 10000, 50000 or 100000")]
        goal: u64,
        /// Connected wallet address; overrides the session wallet
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Support a petition with a World ID proof
    Support {
        /// On-chain petition id
        id: u64,
        /// Connected wallet address; overrides the session wallet
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Show RVZ and WLD balances
    Wallet {
        /// Connected wallet address; overrides the session wallet
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Write a starter revoluzion.toml
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Overwrite an existing revoluzion.toml")]
        force: bool,
    },
}
