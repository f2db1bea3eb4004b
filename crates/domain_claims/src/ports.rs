//! Claims domain ports
//!
//! `ClaimsPort` defines everything the engine needs from claim storage.
//! The engine performs fetch, mutate, save with no compare-and-swap of its
//! own; a real adapter is expected to surface racing writers as
//! `PortError::Conflict` rather than silently overwrite, via row-level
//! locking or optimistic concurrency.

use async_trait::async_trait;

use core_kernel::{ClaimId, ClaimPeriod, DateRange, DocumentId, DomainPort, LecturerId, PortError};

use crate::claim::{Claim, ClaimStatus};
use crate::document::SupportingDocument;

/// Storage port for claims and their supporting documents
#[async_trait]
pub trait ClaimsPort: DomainPort {
    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Inserts a new claim; fails with Conflict if the id already exists
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Replaces a stored claim with the given state
    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Deletes a claim and cascades to its documents
    async fn delete_claim(&self, id: ClaimId) -> Result<(), PortError>;

    /// Finds a non-Rejected claim for the lecturer and period, excluding
    /// the given claim id
    ///
    /// Used by the duplicate-period rule: Pending, UnderReview, and
    /// Approved all block resubmission; Rejected does not.
    async fn find_active_for_period(
        &self,
        lecturer_id: LecturerId,
        period: ClaimPeriod,
        exclude: Option<ClaimId>,
    ) -> Result<Option<Claim>, PortError>;

    /// All claims in the given status
    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError>;

    /// Approved claims whose submission timestamp falls within the range
    /// (both endpoints inclusive)
    async fn find_approved_in_range(&self, range: DateRange) -> Result<Vec<Claim>, PortError>;

    /// All claims belonging to a lecturer, newest submission first
    async fn claims_for_lecturer(&self, lecturer_id: LecturerId) -> Result<Vec<Claim>, PortError>;

    /// Inserts a document; the owning claim must already exist
    async fn insert_document(&self, document: &SupportingDocument) -> Result<(), PortError>;

    /// Retrieves a document by ID, or `PortError::NotFound`
    async fn get_document(&self, id: DocumentId) -> Result<SupportingDocument, PortError>;

    /// Documents attached to a claim, in insertion order
    async fn documents_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<SupportingDocument>, PortError>;
}

/// In-memory implementation of `ClaimsPort` for tests
///
/// Serializes access through an RwLock, which stands in for the row-level
/// locking a database adapter provides.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        claims: HashMap<ClaimId, Claim>,
        documents: Vec<SupportingDocument>,
    }

    /// HashMap-backed mock adapter
    #[derive(Debug, Default)]
    pub struct MockClaimsPort {
        store: Arc<RwLock<Store>>,
    }

    impl MockClaimsPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let port = Self::new();
            {
                let mut store = port.store.write().await;
                for claim in claims {
                    store.claims.insert(claim.id, claim);
                }
            }
            port
        }
    }

    impl DomainPort for MockClaimsPort {}

    #[async_trait]
    impl ClaimsPort for MockClaimsPort {
        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.store
                .read()
                .await
                .claims
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store.claims.contains_key(&claim.id) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id)));
            }
            store.claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if !store.claims.contains_key(&claim.id) {
                return Err(PortError::not_found("Claim", claim.id));
            }
            store.claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn delete_claim(&self, id: ClaimId) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store.claims.remove(&id).is_none() {
                return Err(PortError::not_found("Claim", id));
            }
            store.documents.retain(|d| d.claim_id != id);
            Ok(())
        }

        async fn find_active_for_period(
            &self,
            lecturer_id: LecturerId,
            period: ClaimPeriod,
            exclude: Option<ClaimId>,
        ) -> Result<Option<Claim>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .claims
                .values()
                .find(|c| {
                    c.lecturer_id == lecturer_id
                        && c.claim_period == period
                        && c.status != ClaimStatus::Rejected
                        && Some(c.id) != exclude
                })
                .cloned())
        }

        async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .claims
                .values()
                .filter(|c| c.status == status)
                .cloned()
                .collect())
        }

        async fn find_approved_in_range(&self, range: DateRange) -> Result<Vec<Claim>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .claims
                .values()
                .filter(|c| c.status == ClaimStatus::Approved && range.contains(c.submitted_at))
                .cloned()
                .collect())
        }

        async fn claims_for_lecturer(
            &self,
            lecturer_id: LecturerId,
        ) -> Result<Vec<Claim>, PortError> {
            let mut claims: Vec<Claim> = self
                .store
                .read()
                .await
                .claims
                .values()
                .filter(|c| c.lecturer_id == lecturer_id)
                .cloned()
                .collect();
            claims.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
            Ok(claims)
        }

        async fn insert_document(&self, document: &SupportingDocument) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if !store.claims.contains_key(&document.claim_id) {
                return Err(PortError::conflict(format!(
                    "Claim {} does not exist for document {}",
                    document.claim_id, document.id
                )));
            }
            store.documents.push(document.clone());
            Ok(())
        }

        async fn get_document(&self, id: DocumentId) -> Result<SupportingDocument, PortError> {
            self.store
                .read()
                .await
                .documents
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Document", id))
        }

        async fn documents_for_claim(
            &self,
            claim_id: ClaimId,
        ) -> Result<Vec<SupportingDocument>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .documents
                .iter()
                .filter(|d| d.claim_id == claim_id)
                .cloned()
                .collect())
        }
    }
}
