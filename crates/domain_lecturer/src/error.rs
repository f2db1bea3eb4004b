//! Lecturer domain errors

use thiserror::Error;

/// Errors that can occur in the lecturer domain
#[derive(Debug, Error)]
pub enum LecturerError {
    #[error("Hourly rate {rate} is outside the contracted band [{min}, {max}]")]
    RateOutOfBounds {
        rate: String,
        min: String,
        max: String,
    },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
