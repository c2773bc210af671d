use alloy_primitives::U256;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chain::{ChainError, Petition, RegistryReader};

/// Number of petitions on the home feed
pub const RECENT_LIMIT: u64 = 3;

/// Identifies a listed petition: an on-chain id, or the key of a placeholder
/// shown while no registry data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PetitionRef {
    Chain(u64),
    Placeholder(&'static str),
}

impl fmt::Display for PetitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PetitionRef::Chain(id) => write!(f, "{id}"),
            PetitionRef::Placeholder(key) => write!(f, "{key}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetitionSummary {
    pub id: PetitionRef,
    pub title: String,
    pub description: String,
    pub supporters: U256,
}

impl From<Petition> for PetitionSummary {
    fn from(petition: Petition) -> Self {
        Self {
            id: PetitionRef::Chain(petition.id),
            title: petition.title,
            description: petition.description,
            supporters: petition.support_count,
        }
    }
}

/// Shown when the registry is unset, unreachable or empty
pub fn placeholder_petitions() -> Vec<PetitionSummary> {
    vec![
        PetitionSummary {
            id: PetitionRef::Placeholder("mock-1"),
            title: "Mock Petition: More Water Fountains".to_string(),
            description: "A petition to install more water fountains across the city parks."
                .to_string(),
            supporters: U256::from(42),
        },
        PetitionSummary {
            id: PetitionRef::Placeholder("mock-2"),
            title: "Mock Petition: Pedestrian-Only Streets on Weekends".to_string(),
            description: "Proposal to make downtown streets pedestrian-only during weekends to promote local businesses and reduce pollution.".to_string(),
            supporters: U256::from(128),
        },
    ]
}

/// Read-side projections of the registry.
pub struct PetitionFeed {
    reader: Option<Arc<dyn RegistryReader>>,
}

impl PetitionFeed {
    /// `None` means no registry is configured; listings then show placeholders.
    pub fn new(reader: Option<Arc<dyn RegistryReader>>) -> Self {
        Self { reader }
    }

    /// Every petition, newest first.
    pub async fn all(&self) -> Vec<PetitionSummary> {
        let Some(reader) = self.reader.as_deref() else {
            warn!("PetitionRegistry contract address not set, using placeholder petitions");
            return placeholder_petitions();
        };
        let Some(count) = read_count(reader).await else {
            return placeholder_petitions();
        };

        let mut petitions = Vec::new();
        for id in 1..=count {
            if let Some(petition) = read_listed(reader, id).await {
                petitions.push(petition);
            }
        }
        petitions.reverse();

        or_placeholders(petitions)
    }

    /// The most recent petitions, newest first.
    pub async fn recent(&self) -> Vec<PetitionSummary> {
        let Some(reader) = self.reader.as_deref() else {
            warn!("PetitionRegistry contract address not set, using placeholder petitions");
            return placeholder_petitions();
        };
        let Some(count) = read_count(reader).await else {
            return placeholder_petitions();
        };

        let oldest = count.saturating_sub(RECENT_LIMIT - 1).max(1);
        let mut petitions = Vec::new();
        for id in (oldest..=count).rev() {
            if let Some(petition) = read_listed(reader, id).await {
                petitions.push(petition);
            }
        }

        or_placeholders(petitions)
    }

    /// A single petition. Ids start at 1; `Ok(None)` when there is nothing to read.
    pub async fn petition(&self, id: u64) -> Result<Option<Petition>, ChainError> {
        let Some(reader) = self.reader.as_deref() else {
            return Ok(None);
        };
        if id == 0 {
            return Ok(None);
        }
        reader.petition(id).await.map(Some)
    }
}

async fn read_count(reader: &dyn RegistryReader) -> Option<u64> {
    match reader.petition_count().await {
        Ok(count) => {
            debug!(count, "Read petition count");
            Some(count)
        }
        Err(e) => {
            warn!(error = %e, "Error reading petition count, using placeholder petitions");
            None
        }
    }
}

async fn read_listed(reader: &dyn RegistryReader, id: u64) -> Option<PetitionSummary> {
    match reader.petition(id).await {
        Ok(petition) => Some(petition.into()),
        Err(e) => {
            warn!(petition_id = id, error = %e, "Skipping petition that could not be read");
            None
        }
    }
}

fn or_placeholders(petitions: Vec<PetitionSummary>) -> Vec<PetitionSummary> {
    if petitions.is_empty() {
        placeholder_petitions()
    } else {
        petitions
    }
}
