use super::types::{RecordId, RecordRef, ResourceKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: RecordId },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid reference: field '{field}' points to missing {target}")]
    DanglingReference { field: &'static str, target: RecordRef },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    pub fn not_found(kind: ResourceKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a rule broken by a single field.
    pub fn field(field: &str, message: impl AsRef<str>) -> Self {
        Self::Validation(format!("{field}: {}", message.as_ref()))
    }

    /// Whether this error belongs to the validation family (bad shape or bad reference).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DanglingReference { .. })
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
