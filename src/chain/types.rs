use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::abi::PetitionData;

/// A petition record as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Petition {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub support_count: U256,
    pub goal: U256,
    pub created_at: Option<DateTime<Utc>>,
}

impl Petition {
    pub fn from_record(id: u64, record: PetitionData) -> Self {
        // createdAt is seconds since the epoch; zero means the registry never set it
        let created_at = if record.createdAt.is_zero() || record.createdAt > U256::from(i64::MAX as u64) {
            None
        } else {
            DateTime::from_timestamp(record.createdAt.to::<u64>() as i64, 0)
        };

        Self {
            id,
            title: record.title,
            description: record.description,
            support_count: record.supportCount,
            goal: record.goal,
            created_at,
        }
    }

    /// "supporters / goal", e.g. `12 / 100`
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.support_count, self.goal)
    }

    pub fn created_label(&self) -> String {
        self.created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn goal_reached(&self) -> bool {
        !self.goal.is_zero() && self.support_count >= self.goal
    }
}

/// Burn configuration the registry was deployed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub token: Address,
    pub permit2: Address,
    pub burn_amount: U256,
}
