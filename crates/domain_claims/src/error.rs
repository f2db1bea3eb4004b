//! Claim engine errors

use thiserror::Error;

use core_kernel::PortError;
use crate::crypto::CryptoError;

/// Errors that can occur in the claim lifecycle engine
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Business-rule violations at submission; every failed rule is listed
    #[error("Claim validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Lecturer not found: {0}")]
    LecturerNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Lecturer account is deactivated and cannot submit claims")]
    LecturerInactive,

    #[error("Role {role} is not permitted to {operation}")]
    Unauthorized { role: String, operation: String },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Document cipher error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Storage error: {0}")]
    Storage(PortError),
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        // A storage-level miss on a claim lookup surfaces as the domain's
        // own not-found error; everything else propagates unchanged.
        match err {
            PortError::NotFound { entity_type, id } if entity_type == "Claim" => {
                ClaimError::ClaimNotFound(id)
            }
            PortError::NotFound { entity_type, id } if entity_type == "Lecturer" => {
                ClaimError::LecturerNotFound(id)
            }
            PortError::NotFound { entity_type, id } if entity_type == "Document" => {
                ClaimError::DocumentNotFound(id)
            }
            other => ClaimError::Storage(other),
        }
    }
}

impl ClaimError {
    /// Returns the validation messages, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            ClaimError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}
