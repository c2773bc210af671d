use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Goal choices offered when creating a petition
pub const SUPPORT_GOALS: [u64; 7] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000];
pub const DEFAULT_GOAL: u64 = 100;
pub const MIN_TITLE_CHARS: usize = 10;
pub const MIN_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Title,
    Description,
    Goal,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftField::Title => write!(f, "title"),
            DraftField::Description => write!(f, "description"),
            DraftField::Goal => write!(f, "goal"),
        }
    }
}

/// Field-level validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self, field: DraftField) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Petition form contents before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionDraft {
    pub title: String,
    pub description: String,
    pub goal: u64,
}

impl Default for PetitionDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            goal: DEFAULT_GOAL,
        }
    }
}

impl PetitionDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, goal: u64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            goal,
        }
    }

    /// Check every field; never touches the network.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.title.trim().is_empty() {
            errors.insert(DraftField::Title, "Title is required");
        } else if self.title.chars().count() < MIN_TITLE_CHARS {
            errors.insert(
                DraftField::Title,
                format!("Title must be at least {MIN_TITLE_CHARS} characters long"),
            );
        }

        if self.description.trim().is_empty() {
            errors.insert(DraftField::Description, "Description is required");
        } else if self.description.chars().count() < MIN_DESCRIPTION_CHARS {
            errors.insert(
                DraftField::Description,
                format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters long"),
            );
        }

        if self.goal < 1 {
            errors.insert(DraftField::Goal, "Goal must be at least 1 supporter");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
