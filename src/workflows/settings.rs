use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::config::RevoluzionConfig;
use crate::host::VerificationLevel;

/// Permit2 rejects signature transfers whose deadline is further out than this
pub const PERMIT_WINDOW_CEILING: Duration = Duration::from_secs(60 * 60);

/// Immutable inputs shared by the petition workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub registry: Option<Address>,
    pub token: Option<Address>,
    pub create_action: String,
    pub create_signal: String,
    pub support_action: String,
    pub verification_level: VerificationLevel,
    /// Burn amount used when the registry's own value cannot be read
    pub fallback_burn_amount: U256,
    pub permit_window: Duration,
    /// Wait after broadcast before reporting success
    pub confirmation_delay: Duration,
    /// Wait after success before resolving the newest petition id
    pub navigation_delay: Duration,
    /// How long a failed attempt stays on the status board
    pub status_reset_delay: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            registry: None,
            token: None,
            create_action: "voting-action".to_string(),
            create_signal: "0x12312".to_string(),
            support_action: "support-action".to_string(),
            verification_level: VerificationLevel::Orb,
            fallback_burn_amount: U256::from(10u64).pow(U256::from(18u64)),
            permit_window: Duration::from_secs(30 * 60),
            confirmation_delay: Duration::from_secs(5),
            navigation_delay: Duration::from_secs(1),
            status_reset_delay: Duration::from_secs(5),
        }
    }
}

impl WorkflowSettings {
    pub fn from_config(config: &RevoluzionConfig) -> Result<Self> {
        let workflow = &config.workflow;

        let registry = parse_optional_address(config.contracts.petition_registry.as_deref())
            .context("contracts.petition_registry")?;
        let token = parse_optional_address(config.contracts.rvz_token.as_deref())
            .context("contracts.rvz_token")?;

        let verification_level = VerificationLevel::from_str(&workflow.verification_level)
            .map_err(anyhow::Error::msg)
            .context("workflow.verification_level")?;

        let fallback_burn_amount = U256::from_str(workflow.fallback_burn_amount.trim())
            .map_err(|e| anyhow::anyhow!("workflow.fallback_burn_amount: {e}"))?;

        let permit_window_secs = workflow
            .permit_window_minutes
            .checked_mul(60)
            .ok_or_else(|| anyhow::anyhow!("workflow.permit_window_minutes is out of range"))?;

        let settings = Self {
            registry,
            token,
            create_action: workflow.create_action.clone(),
            create_signal: workflow.create_signal.clone(),
            support_action: workflow.support_action.clone(),
            verification_level,
            fallback_burn_amount,
            permit_window: Duration::from_secs(permit_window_secs),
            confirmation_delay: Duration::from_secs(workflow.confirmation_delay_seconds),
            navigation_delay: Duration::from_secs(workflow.navigation_delay_seconds),
            status_reset_delay: Duration::from_secs(workflow.status_reset_seconds),
        };
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.permit_window.is_zero() || self.permit_window >= PERMIT_WINDOW_CEILING {
            bail!(
                "Permit window must be between 1 and 59 minutes, got {} seconds",
                self.permit_window.as_secs()
            );
        }
        if self.create_action.is_empty() || self.support_action.is_empty() {
            bail!("Verification action tags must not be empty");
        }
        Ok(())
    }
}

/// Parse an address that may be left blank. `""` and `"0x"` mean unset.
pub fn parse_optional_address(value: Option<&str>) -> Result<Option<Address>> {
    match value.map(str::trim) {
        None | Some("") | Some("0x") => Ok(None),
        Some(raw) => Address::from_str(raw)
            .map(Some)
            .with_context(|| format!("invalid address '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_addresses_are_unset() {
        assert_eq!(parse_optional_address(None).unwrap(), None);
        assert_eq!(parse_optional_address(Some("0x")).unwrap(), None);
        assert_eq!(parse_optional_address(Some("  ")).unwrap(), None);
        assert!(parse_optional_address(Some("0x1234")).is_err());
    }

    #[test]
    fn test_from_config_uses_workflow_defaults() {
        let mut config = RevoluzionConfig::default();
        config.apply_contract_fallbacks(|_| None);

        let settings = WorkflowSettings::from_config(&config).unwrap();
        assert!(settings.registry.is_some());
        assert_eq!(settings.token, None);
        assert_eq!(settings.create_signal, "0x12312");
        assert_eq!(settings.fallback_burn_amount.to_string(), "1000000000000000000");
        assert_eq!(settings.permit_window, Duration::from_secs(1800));
    }

    #[test]
    fn test_permit_window_must_stay_below_ceiling() {
        let mut config = RevoluzionConfig::default();
        config.workflow.permit_window_minutes = 60;
        assert!(WorkflowSettings::from_config(&config).is_err());

        config.workflow.permit_window_minutes = 0;
        assert!(WorkflowSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_oversized_permit_window_is_rejected_not_wrapped() {
        let mut config = RevoluzionConfig::default();
        // an unchecked multiply would wrap to just under 30 minutes
        config.workflow.permit_window_minutes = (1u64 << 63) / 15 + 30;
        assert!(u64::MAX / 60 < config.workflow.permit_window_minutes);

        let err = WorkflowSettings::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("permit_window_minutes"), "{err}");
    }
}
