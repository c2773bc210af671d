use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::RevoluzionConfig;

pub struct InitCommand {
    pub force: bool,
    path: PathBuf,
}

impl InitCommand {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            path: PathBuf::from("revoluzion.toml"),
        }
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub async fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            println!("⚠️  {} already exists", self.path.display());
            println!("   → Use --force to overwrite it");
            bail!("{} already exists", self.path.display());
        }

        let mut config = RevoluzionConfig::default();
        config.apply_contract_fallbacks(|key| std::env::var(key).ok());
        config.save_to_file(&self.path)?;

        println!("✅ Wrote {}", self.path.display());
        if config.contracts.rvz_token.is_none() {
            println!("   → Set contracts.rvz_token (or RVZ_TOKEN_ADDRESS) before creating petitions");
        }
        println!("   → Point host.bridge_url at your mini app host");
        Ok(())
    }
}
