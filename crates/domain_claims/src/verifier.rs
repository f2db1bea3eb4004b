//! Automated coordinator-stage verification
//!
//! Runs the system checks that precede manager review: the high-value
//! threshold and the rate-snapshot reconciliation against the lecturer's
//! current contracted rate. Both checks always run; firing a flag never
//! blocks the promotion to UnderReview, it only routes the claim to a
//! manager with the flags on record.

use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{ClaimId, Clock};
use domain_lecturer::LecturerPort;

use crate::claim::{Claim, ClaimStatus, NoteEntry, NoteKind};
use crate::config::ClaimPolicy;
use crate::error::ClaimError;
use crate::ports::ClaimsPort;

/// Result of one auto-verification pass
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// The claim as persisted after verification
    pub claim: Claim,
    /// True when any flag fired; the manager must look before approving
    pub requires_manager_review: bool,
    /// Human-readable flags, also appended to the claim's audit notes
    pub flags: Vec<String>,
}

/// Runs automated checks and promotes Pending claims to UnderReview
#[derive(Clone)]
pub struct ClaimVerifier {
    claims: Arc<dyn ClaimsPort>,
    lecturers: Arc<dyn LecturerPort>,
    clock: Arc<dyn Clock>,
    policy: ClaimPolicy,
}

impl ClaimVerifier {
    pub fn new(
        claims: Arc<dyn ClaimsPort>,
        lecturers: Arc<dyn LecturerPort>,
        clock: Arc<dyn Clock>,
        policy: ClaimPolicy,
    ) -> Self {
        Self {
            claims,
            lecturers,
            clock,
            policy,
        }
    }

    /// Verifies a Pending claim, recording flags and promoting it
    ///
    /// The promotion is unconditional on success: a flagged claim still moves
    /// to UnderReview, it just arrives carrying its flags. Calling this on a
    /// claim that is not Pending fails with `InvalidStatusTransition`.
    pub async fn verify(
        &self,
        claim_id: ClaimId,
        actor: &str,
    ) -> Result<VerificationOutcome, ClaimError> {
        let mut claim = self.claims.get_claim(claim_id).await?;
        // A dangling lecturer reference only disables the rate check; the
        // claim still moves forward, matching the "Unknown" tolerance on
        // the reporting side.
        let lecturer = match self.lecturers.get_lecturer(claim.lecturer_id).await {
            Ok(lecturer) => Some(lecturer),
            Err(err) if err.is_not_found() => {
                warn!(
                    claim_id = %claim.id,
                    lecturer_id = %claim.lecturer_id,
                    "lecturer record missing; skipping rate check"
                );
                None
            }
            Err(err) => return Err(err.into()),
        };
        let now = self.clock.now();

        let mut flags = Vec::new();
        if claim.amount.amount() > self.policy.high_value_threshold {
            flags.push("High Value Claim (>R10k)".to_string());
        }
        if let Some(lecturer) = &lecturer {
            if claim.hourly_rate != lecturer.hourly_rate {
                flags.push(format!(
                    "Rate Mismatch (claimed {}, contracted {})",
                    claim.hourly_rate, lecturer.hourly_rate
                ));
            }
        }

        for flag in &flags {
            claim.push_note(NoteEntry {
                at: now,
                actor: actor.to_string(),
                kind: NoteKind::AutoFlag,
                detail: flag.clone(),
            });
        }

        claim.transition(ClaimStatus::UnderReview, actor, now)?;
        self.claims.update_claim(&claim).await?;

        let requires_manager_review = !flags.is_empty();
        info!(
            claim_id = %claim.id,
            flags = flags.len(),
            requires_manager_review,
            "claim auto-verified"
        );

        Ok(VerificationOutcome {
            claim,
            requires_manager_review,
            flags,
        })
    }
}
