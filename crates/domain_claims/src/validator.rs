//! Submission-time business rules
//!
//! Every rule runs even after one fails, so a caller sees the full list of
//! violations in a single pass. Validation is read-only: it consults stored
//! claims for the duplicate-period rule but never writes.

use std::sync::Arc;
use tracing::debug;

use crate::claim::Claim;
use crate::config::ClaimPolicy;
use crate::error::ClaimError;
use crate::ports::ClaimsPort;

/// Outcome of validating a claim submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a `Result`, failing with every accumulated error
    pub fn into_result(self) -> Result<(), ClaimError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ClaimError::ValidationFailed(self.errors))
        }
    }
}

/// Validates claims against the business-rule policy before persistence
#[derive(Clone)]
pub struct ClaimValidator {
    claims: Arc<dyn ClaimsPort>,
    policy: ClaimPolicy,
}

impl ClaimValidator {
    pub fn new(claims: Arc<dyn ClaimsPort>, policy: ClaimPolicy) -> Self {
        Self { claims, policy }
    }

    /// Runs all submission rules against the claim
    ///
    /// Rules are not short-circuited; the result carries one message per
    /// violated rule. Only storage failures surface as errors here.
    pub async fn validate(&self, claim: &Claim) -> Result<ValidationResult, ClaimError> {
        let mut errors = Vec::new();

        if claim.hours_worked > self.policy.max_hours {
            errors.push(format!(
                "Hours worked cannot exceed {} hours per month.",
                self.policy.max_hours
            ));
        }
        if claim.hours_worked < self.policy.min_hours {
            errors.push(format!(
                "Hours worked must be at least {} hour.",
                self.policy.min_hours
            ));
        }

        // Pending, UnderReview, and Approved all block resubmission for the
        // period; a Rejected claim does not.
        let existing = self
            .claims
            .find_active_for_period(claim.lecturer_id, claim.claim_period, Some(claim.id))
            .await?;
        if existing.is_some() {
            errors.push(format!(
                "A pending or approved claim for period {} already exists.",
                claim.claim_period
            ));
        }

        debug!(
            claim_id = %claim.id,
            error_count = errors.len(),
            "claim validation completed"
        );
        Ok(ValidationResult { errors })
    }
}
