//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ClaimPeriod, LecturerId, Money};
use crate::error::ClaimError;

/// Claim status
///
/// A closed state machine: `Pending` is the only entry point, `Approved` and
/// `Rejected` are terminal. `UnderReview` is reachable exclusively through
/// automated verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Submitted and awaiting coordinator verification
    Pending,
    /// Auto-verified, awaiting manager decision
    UnderReview,
    /// Approved for payment (terminal)
    Approved,
    /// Rejected (terminal); does not block resubmission for the period
    Rejected,
}

impl ClaimStatus {
    /// True for states no operation may move a claim out of
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::UnderReview => "UnderReview",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        };
        write!(f, "{name}")
    }
}

/// Kind of audit note appended to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    /// Automated verification flag
    AutoFlag,
    /// Manager approval marker
    Approval,
    /// Coordinator or manager rejection marker
    Rejection,
    /// A supporting document was skipped at submission
    DocumentWarning,
}

/// One entry in a claim's append-only audit trail
///
/// Notes are stored structured and rendered to the legacy concatenated text
/// form on demand, so nothing ever parses the text back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub at: DateTime<Utc>,
    pub actor: String,
    pub kind: NoteKind,
    pub detail: String,
}

impl NoteEntry {
    /// Renders the entry in the marker format the source records carried
    pub fn rendered(&self) -> String {
        match self.kind {
            NoteKind::AutoFlag => format!("[AUTO-FLAG]: {}", self.detail),
            NoteKind::Approval => format!("[APPROVED BY {}]", self.actor),
            NoteKind::Rejection => format!("[REJECTED BY {}] Reason: {}", self.actor, self.detail),
            NoteKind::DocumentWarning => format!("[DOCUMENT SKIPPED]: {}", self.detail),
        }
    }
}

/// A lecturer's claim for hours worked in a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Owning lecturer (reference; the record itself is HR-owned)
    pub lecturer_id: LecturerId,
    /// Hours worked in the period
    pub hours_worked: Decimal,
    /// Hourly rate frozen at submission time; compared against, never
    /// overwritten by, the lecturer's current rate
    pub hourly_rate: Money,
    /// Server-side computed hours x rate
    pub amount: Money,
    /// Module or category label, e.g. PROG6212
    pub module: String,
    /// Append-only audit trail
    pub notes: Vec<NoteEntry>,
    /// Lifecycle status
    pub status: ClaimStatus,
    /// Year-month the claim applies to
    pub claim_period: ClaimPeriod,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
    /// Stamped on every status-changing operation
    pub last_updated: DateTime<Utc>,
    /// Actor of the last status-changing operation
    pub last_modified_by: String,
}

impl Claim {
    /// Creates a new Pending claim with a server-side computed amount
    pub fn new(
        lecturer_id: LecturerId,
        hours_worked: Decimal,
        hourly_rate: Money,
        module: impl Into<String>,
        claim_period: ClaimPeriod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ClaimId::new_v7(),
            lecturer_id,
            hours_worked,
            hourly_rate,
            amount: hourly_rate.multiply(hours_worked),
            module: module.into(),
            notes: Vec::new(),
            status: ClaimStatus::Pending,
            claim_period,
            submitted_at: now,
            last_updated: now,
            last_modified_by: lecturer_id.to_string(),
        }
    }

    /// Moves the claim to `target`, stamping the audit fields
    ///
    /// Illegal transitions are an error, never a silent overwrite.
    pub fn transition(
        &mut self,
        target: ClaimStatus,
        actor: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        if !self.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.last_updated = now;
        self.last_modified_by = actor.into();
        Ok(())
    }

    /// Appends an audit note; notes are never removed or rewritten
    pub fn push_note(&mut self, note: NoteEntry) {
        self.notes.push(note);
    }

    /// The concatenated audit text in the legacy format
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(NoteEntry::rendered)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Checks the transition table
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Pending, UnderReview)
                | (Pending, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
        )
    }
}
