//! Claim lifecycle orchestration
//!
//! `ClaimLifecycleService` owns every state-changing operation: submission,
//! automated verification, manager approval and rejection. It is the only
//! place role capability checks happen; the validator and verifier it
//! orchestrates assume their caller was already authorized.
//!
//! Concurrency model: the service holds no mutable state of its own, so one
//! instance is shared across callers. Conflicting writers on the same claim
//! are the storage adapter's problem to detect, surfaced as
//! `PortError::Conflict`.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use core_kernel::{ClaimId, ClaimPeriod, Clock, DateRange, DocumentId};
use domain_lecturer::{LecturerPort, Role};

use crate::claim::{Claim, ClaimStatus, NoteEntry, NoteKind};
use crate::config::ClaimPolicy;
use crate::crypto::DocumentCipher;
use crate::document::{DocumentUpload, SupportingDocument};
use crate::error::ClaimError;
use crate::ports::ClaimsPort;
use crate::report::{DashboardStats, PaymentReport};
use crate::validator::ClaimValidator;
use crate::verifier::ClaimVerifier;

/// Which review stage a rejection is issued from
///
/// A coordinator rejects claims still Pending; a manager rejects claims the
/// verifier already promoted to UnderReview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Coordinator,
    Manager,
}

/// A claim submission as handed in by the presentation layer
#[derive(Debug, Clone)]
pub struct SubmitClaimRequest {
    pub lecturer_id: core_kernel::LecturerId,
    pub hours_worked: Decimal,
    /// Ignored; the contracted rate on record is always used
    pub hourly_rate_override: Option<Decimal>,
    pub module: String,
    pub period: ClaimPeriod,
    pub documents: Vec<DocumentUpload>,
}

/// Orchestrates the claim state machine end to end
#[derive(Clone)]
pub struct ClaimLifecycleService {
    claims: Arc<dyn ClaimsPort>,
    lecturers: Arc<dyn LecturerPort>,
    clock: Arc<dyn Clock>,
    cipher: DocumentCipher,
    policy: ClaimPolicy,
    validator: ClaimValidator,
    verifier: ClaimVerifier,
}

impl ClaimLifecycleService {
    pub fn new(
        claims: Arc<dyn ClaimsPort>,
        lecturers: Arc<dyn LecturerPort>,
        clock: Arc<dyn Clock>,
        cipher: DocumentCipher,
        policy: ClaimPolicy,
    ) -> Self {
        let validator = ClaimValidator::new(claims.clone(), policy.clone());
        let verifier = ClaimVerifier::new(
            claims.clone(),
            lecturers.clone(),
            clock.clone(),
            policy.clone(),
        );
        Self {
            claims,
            lecturers,
            clock,
            cipher,
            policy,
            validator,
            verifier,
        }
    }

    /// Submits a new claim with its supporting documents
    ///
    /// The amount is computed server-side from the lecturer's contracted
    /// rate; any rate supplied by the caller is ignored. The claim persists
    /// before its documents, and a document that fails screening is skipped
    /// with a recorded warning rather than failing the whole submission.
    pub async fn submit_claim(&self, request: SubmitClaimRequest) -> Result<Claim, ClaimError> {
        let lecturer = self.lecturers.get_lecturer(request.lecturer_id).await?;
        if !lecturer.is_active {
            return Err(ClaimError::LecturerInactive);
        }
        if let Some(override_rate) = request.hourly_rate_override {
            warn!(
                lecturer_id = %lecturer.id,
                %override_rate,
                "caller-supplied hourly rate ignored; using contracted rate"
            );
        }

        let now = self.clock.now();
        let mut claim = Claim::new(
            lecturer.id,
            request.hours_worked,
            lecturer.hourly_rate,
            request.module,
            request.period,
            now,
        );

        self.validator.validate(&claim).await?.into_result()?;
        self.claims.insert_claim(&claim).await?;

        let mut skipped = 0usize;
        for upload in &request.documents {
            match upload.screen(&self.policy) {
                Ok(()) => {
                    let ciphertext = self.cipher.encrypt(&upload.content)?;
                    let document =
                        SupportingDocument::new(claim.id, upload.file_name.clone(), ciphertext);
                    self.claims.insert_document(&document).await?;
                }
                Err(rejection) => {
                    warn!(claim_id = %claim.id, %rejection, "supporting document skipped");
                    claim.push_note(NoteEntry {
                        at: now,
                        actor: lecturer.id.to_string(),
                        kind: NoteKind::DocumentWarning,
                        detail: rejection.to_string(),
                    });
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            self.claims.update_claim(&claim).await?;
        }

        info!(
            claim_id = %claim.id,
            lecturer_id = %lecturer.id,
            amount = %claim.amount,
            documents = request.documents.len() - skipped,
            skipped,
            "claim submitted"
        );
        Ok(claim)
    }

    /// Runs automated verification on a Pending claim
    ///
    /// Open to the coordinator and everyone above; promotes the claim to
    /// UnderReview and reports which flags fired.
    pub async fn auto_verify(
        &self,
        claim_id: ClaimId,
        actor: Role,
    ) -> Result<crate::verifier::VerificationOutcome, ClaimError> {
        require_role(
            actor,
            &[Role::Coordinator, Role::Manager, Role::Hr],
            "verify claims",
        )?;
        self.verifier.verify(claim_id, &actor.to_string()).await
    }

    /// Approves a claim that is UnderReview
    pub async fn approve(&self, claim_id: ClaimId, actor: Role) -> Result<Claim, ClaimError> {
        require_role(actor, &[Role::Manager, Role::Hr], "approve claims")?;

        let mut claim = self.claims.get_claim(claim_id).await?;
        let now = self.clock.now();
        claim.transition(ClaimStatus::Approved, actor.to_string(), now)?;
        claim.push_note(NoteEntry {
            at: now,
            actor: actor.to_string(),
            kind: NoteKind::Approval,
            detail: String::new(),
        });
        self.claims.update_claim(&claim).await?;

        info!(claim_id = %claim.id, %actor, "claim approved");
        Ok(claim)
    }

    /// Rejects a claim at the given review stage
    ///
    /// The stage fixes both who may reject and which status the claim must
    /// be in: coordinators reject Pending claims, managers reject claims
    /// UnderReview. A missing reason is recorded as "none provided".
    pub async fn reject(
        &self,
        claim_id: ClaimId,
        actor: Role,
        stage: ReviewStage,
        reason: Option<String>,
    ) -> Result<Claim, ClaimError> {
        let (allowed, expected_status): (&[Role], ClaimStatus) = match stage {
            ReviewStage::Coordinator => (
                &[Role::Coordinator, Role::Manager, Role::Hr],
                ClaimStatus::Pending,
            ),
            ReviewStage::Manager => (&[Role::Manager, Role::Hr], ClaimStatus::UnderReview),
        };
        require_role(actor, allowed, "reject claims")?;

        let mut claim = self.claims.get_claim(claim_id).await?;
        if claim.status != expected_status {
            return Err(ClaimError::InvalidStatusTransition {
                from: claim.status.to_string(),
                to: ClaimStatus::Rejected.to_string(),
            });
        }

        let now = self.clock.now();
        claim.transition(ClaimStatus::Rejected, actor.to_string(), now)?;
        claim.push_note(NoteEntry {
            at: now,
            actor: actor.to_string(),
            kind: NoteKind::Rejection,
            detail: reason.unwrap_or_else(|| "none provided".to_string()),
        });
        self.claims.update_claim(&claim).await?;

        info!(claim_id = %claim.id, %actor, ?stage, "claim rejected");
        Ok(claim)
    }

    /// Fetches and decrypts a supporting document
    ///
    /// Read-only: a decryption failure reports an error and leaves the
    /// stored record untouched.
    pub async fn download_document(
        &self,
        document_id: DocumentId,
    ) -> Result<(String, Vec<u8>), ClaimError> {
        let document = self.claims.get_document(document_id).await?;
        let plaintext = self.cipher.decrypt(&document.ciphertext)?;
        Ok((document.file_name, plaintext))
    }

    /// A lecturer's claims, newest first
    pub async fn claims_for_lecturer(
        &self,
        lecturer_id: core_kernel::LecturerId,
    ) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.claims_for_lecturer(lecturer_id).await?)
    }

    /// Payment report over Approved claims submitted within the range
    pub async fn generate_payment_report(
        &self,
        range: DateRange,
    ) -> Result<PaymentReport, ClaimError> {
        let approved = self.claims.find_approved_in_range(range).await?;
        let names: HashMap<_, _> = self
            .lecturers
            .list_lecturers(false)
            .await?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();
        Ok(PaymentReport::build(range, &approved, &names, self.clock.now()))
    }

    /// Headline statistics for the HR dashboard
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClaimError> {
        let mut claims = Vec::new();
        for status in [
            ClaimStatus::Pending,
            ClaimStatus::UnderReview,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
        ] {
            claims.extend(self.claims.find_by_status(status).await?);
        }
        let lecturers = self.lecturers.list_lecturers(false).await?;
        Ok(DashboardStats::build(&claims, &lecturers, self.clock.now()))
    }
}

/// Single capability check shared by every lifecycle operation
fn require_role(actor: Role, allowed: &[Role], operation: &str) -> Result<(), ClaimError> {
    if allowed.contains(&actor) {
        Ok(())
    } else {
        Err(ClaimError::Unauthorized {
            role: actor.to_string(),
            operation: operation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        assert!(require_role(Role::Manager, &[Role::Manager, Role::Hr], "approve").is_ok());

        let err = require_role(Role::Lecturer, &[Role::Manager, Role::Hr], "approve claims")
            .unwrap_err();
        assert!(matches!(
            err,
            ClaimError::Unauthorized { ref role, ref operation }
                if role == "LECTURER" && operation == "approve claims"
        ));
    }
}
