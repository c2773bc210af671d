// Petition workflows: creation, support and the read-side feed

pub mod create;
pub mod draft;
pub mod errors;
pub mod guard;
pub(crate) mod identity;
pub mod listing;
pub mod permit;
pub mod settings;
pub mod status;
pub mod support;

pub use create::{CreatePetitionWorkflow, CreatedPetition};
pub use draft::{DraftField, FieldErrors, PetitionDraft, DEFAULT_GOAL, SUPPORT_GOALS};
pub use errors::{ErrorKind, PetitionError, PreconditionError, SubmissionError, VerificationError};
pub use listing::{placeholder_petitions, PetitionFeed, PetitionRef, PetitionSummary};
pub use permit::{NonceSource, PermitAuthorization, PermitError, SIGNATURE_PLACEHOLDER};
pub use settings::WorkflowSettings;
pub use status::{StatusBoard, SubmissionStatus};
pub use support::{SupportOutcome, SupportPetitionWorkflow, SupportState, SupportStatus};
