//! Claim Lifecycle Engine
//!
//! This crate implements the contract claim lifecycle from submission through
//! coordinator verification and manager approval, plus payment reporting and
//! encrypted supporting documents.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> UnderReview -> Approved
//!     \            \
//!      +------------+-> Rejected
//! ```
//!
//! Submission runs the business-rule validator; the Pending -> UnderReview
//! transition happens only through automated verification; Approved and
//! Rejected are terminal.

pub mod claim;
pub mod document;
pub mod crypto;
pub mod config;
pub mod validator;
pub mod verifier;
pub mod report;
pub mod lifecycle;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimStatus, NoteEntry, NoteKind};
pub use document::{SupportingDocument, DocumentUpload, DocumentRejection};
pub use crypto::{DocumentCipher, CryptoError};
pub use config::{ClaimPolicy, CipherConfig};
pub use validator::{ClaimValidator, ValidationResult};
pub use verifier::{ClaimVerifier, VerificationOutcome};
pub use report::{PaymentReport, LecturerPaymentBreakdown, DashboardStats};
pub use lifecycle::{ClaimLifecycleService, SubmitClaimRequest, ReviewStage};
pub use ports::ClaimsPort;
pub use error::ClaimError;
