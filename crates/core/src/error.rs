use bdsa_types::IdError;

/// Errors surfaced by the sync core.
///
/// Validation findings are never errors; they travel in
/// [`ValidationReport`](crate::validation::ValidationReport) lists. This enum
/// covers caller mistakes and per-item processing failures.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid identifier: {0}")]
    Id(#[from] IdError),
    #[error("failed to extract patient ID for '{item_name}': {reason}")]
    PatientIdExtraction { item_name: String, reason: String },
    #[error("failed to serialize item metadata: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
