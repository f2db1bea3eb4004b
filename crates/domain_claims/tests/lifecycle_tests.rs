//! End-to-end tests for the claim lifecycle engine

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimPeriod, LecturerId};
use domain_claims::{
    ClaimError, ClaimStatus, ClaimsPort, DocumentUpload, ReviewStage, SubmitClaimRequest,
};
use domain_lecturer::{LecturerPort, Role};
use test_utils::{pdf_upload, EngineHarness, LecturerBuilder, MoneyFixtures, TemporalFixtures};

fn request(lecturer_id: LecturerId, hours: Decimal, period: ClaimPeriod) -> SubmitClaimRequest {
    SubmitClaimRequest {
        lecturer_id,
        hours_worked: hours,
        hourly_rate_override: None,
        module: "PROG6212".to_string(),
        period,
        documents: Vec::new(),
    }
}

// ============================================================================
// Submission
// ============================================================================

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_computes_amount_from_contracted_rate() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.amount.amount(), dec!(8000));
        assert_eq!(claim.hourly_rate, lecturer.hourly_rate);
        assert_eq!(claim.submitted_at, TemporalFixtures::now());
    }

    #[tokio::test]
    async fn test_caller_supplied_rate_is_ignored() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let mut req = request(lecturer.id, dec!(10), TemporalFixtures::current_period());
        req.hourly_rate_override = Some(dec!(9999));

        let claim = harness.service.submit_claim(req).await.unwrap();
        // 10h x R200, not 10h x R9999
        assert_eq!(claim.amount.amount(), dec!(2000));
    }

    #[tokio::test]
    async fn test_unknown_lecturer_rejected() {
        let harness = EngineHarness::with_lecturers(vec![]).await;

        let result = harness
            .service
            .submit_claim(request(
                LecturerId::new_v7(),
                dec!(10),
                TemporalFixtures::current_period(),
            ))
            .await;
        assert!(matches!(result, Err(ClaimError::LecturerNotFound(_))));
    }

    #[tokio::test]
    async fn test_deactivated_lecturer_rejected() {
        let lecturer = LecturerBuilder::new().deactivated().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let result = harness
            .service
            .submit_claim(request(lecturer.id, dec!(10), TemporalFixtures::current_period()))
            .await;
        assert!(matches!(result, Err(ClaimError::LecturerInactive)));
    }

    #[tokio::test]
    async fn test_hours_over_ceiling_lists_error() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let err = harness
            .service
            .submit_claim(request(lecturer.id, dec!(200), TemporalFixtures::current_period()))
            .await
            .unwrap_err();

        let errors = err.validation_errors().expect("validation failure");
        assert_eq!(errors, ["Hours worked cannot exceed 180 hours per month."]);
    }

    #[tokio::test]
    async fn test_duplicate_period_blocked_until_rejection() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;
        let period = TemporalFixtures::current_period();

        let first = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), period))
            .await
            .unwrap();

        // Second submission for the same period fails while the first is Pending
        let err = harness
            .service
            .submit_claim(request(lecturer.id, dec!(20), period))
            .await
            .unwrap_err();
        let errors = err.validation_errors().expect("validation failure");
        assert_eq!(
            errors,
            ["A pending or approved claim for period 2025-05 already exists."]
        );

        // Rejection unblocks the period
        harness
            .service
            .reject(first.id, Role::Coordinator, ReviewStage::Coordinator, None)
            .await
            .unwrap();

        let resubmitted = harness
            .service
            .submit_claim(request(lecturer.id, dec!(20), period))
            .await
            .unwrap();
        assert_eq!(resubmitted.status, ClaimStatus::Pending);
    }
}

// ============================================================================
// Verification and review
// ============================================================================

mod review_tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_claim_flow_to_under_review() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();

        let outcome = harness
            .service
            .auto_verify(claim.id, Role::Coordinator)
            .await
            .unwrap();

        assert_eq!(outcome.claim.status, ClaimStatus::UnderReview);
        assert!(!outcome.requires_manager_review);
        assert!(outcome.flags.is_empty());
    }

    #[tokio::test]
    async fn test_high_value_claim_flagged_then_approved() {
        let lecturer = LecturerBuilder::new().with_rate(MoneyFixtures::senior_rate()).build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        // 60h x R350 = R21000
        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(60), TemporalFixtures::current_period()))
            .await
            .unwrap();
        assert_eq!(claim.amount.amount(), dec!(21000));

        let outcome = harness
            .service
            .auto_verify(claim.id, Role::Coordinator)
            .await
            .unwrap();
        assert!(outcome.requires_manager_review);
        assert_eq!(outcome.flags, ["High Value Claim (>R10k)"]);

        let approved = harness.service.approve(claim.id, Role::Manager).await.unwrap();
        assert_eq!(approved.status, ClaimStatus::Approved);
        assert_eq!(approved.last_modified_by, "MANAGER");
        assert!(approved
            .notes_text()
            .contains("[AUTO-FLAG]: High Value Claim (>R10k)"));
        assert!(approved.notes_text().contains("[APPROVED BY MANAGER]"));

        // Terminal: nothing moves an approved claim
        let again = harness.service.approve(claim.id, Role::Manager).await;
        assert!(matches!(
            again,
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_mismatch_flagged_after_rate_change() {
        let mut lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(10), TemporalFixtures::current_period()))
            .await
            .unwrap();

        // HR raises the contracted rate between submission and verification
        lecturer
            .set_hourly_rate(MoneyFixtures::zar(dec!(250)), TemporalFixtures::now())
            .unwrap();
        harness.lecturers.save_lecturer(&lecturer).await.unwrap();

        let outcome = harness
            .service
            .auto_verify(claim.id, Role::Coordinator)
            .await
            .unwrap();
        assert!(outcome.requires_manager_review);
        assert_eq!(
            outcome.flags,
            ["Rate Mismatch (claimed R200.00, contracted R250.00)"]
        );
        // The snapshot on the claim is untouched
        assert_eq!(outcome.claim.hourly_rate.amount(), dec!(200));
    }

    #[tokio::test]
    async fn test_manager_rejection_records_reason() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();
        harness
            .service
            .auto_verify(claim.id, Role::Coordinator)
            .await
            .unwrap();

        let rejected = harness
            .service
            .reject(
                claim.id,
                Role::Manager,
                ReviewStage::Manager,
                Some("timesheet does not match".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert!(rejected
            .notes_text()
            .contains("[REJECTED BY MANAGER] Reason: timesheet does not match"));
    }

    #[tokio::test]
    async fn test_missing_rejection_reason_defaults() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();

        let rejected = harness
            .service
            .reject(claim.id, Role::Coordinator, ReviewStage::Coordinator, None)
            .await
            .unwrap();
        assert!(rejected
            .notes_text()
            .contains("[REJECTED BY COORDINATOR] Reason: none provided"));
    }

    #[tokio::test]
    async fn test_coordinator_stage_requires_pending_claim() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();
        harness
            .service
            .auto_verify(claim.id, Role::Coordinator)
            .await
            .unwrap();

        // Claim is UnderReview now; the coordinator stage no longer applies
        let result = harness
            .service
            .reject(claim.id, Role::Coordinator, ReviewStage::Coordinator, None)
            .await;
        assert!(matches!(
            result,
            Err(ClaimError::InvalidStatusTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_lecturer_role_cannot_review() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let claim = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();

        for result in [
            harness.service.auto_verify(claim.id, Role::Lecturer).await.err(),
            harness.service.approve(claim.id, Role::Lecturer).await.err(),
            harness
                .service
                .reject(claim.id, Role::Lecturer, ReviewStage::Coordinator, None)
                .await
                .err(),
        ] {
            assert!(matches!(result, Some(ClaimError::Unauthorized { .. })));
        }
        // Approval is closed to coordinators too
        let result = harness.service.approve(claim.id, Role::Coordinator).await;
        assert!(matches!(result, Err(ClaimError::Unauthorized { .. })));
    }
}

// ============================================================================
// Documents
// ============================================================================

mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_documents_encrypted_and_downloadable() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let mut req = request(lecturer.id, dec!(40), TemporalFixtures::current_period());
        req.documents = vec![pdf_upload("timesheet.pdf")];

        let claim = harness.service.submit_claim(req).await.unwrap();

        let stored = harness.claims.documents_for_claim(claim.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].file_name, "timesheet.pdf");
        // Stored bytes are ciphertext, not the upload
        assert_ne!(stored[0].ciphertext, b"%PDF-1.7 test payload".to_vec());

        let (name, content) = harness
            .service
            .download_document(stored[0].id)
            .await
            .unwrap();
        assert_eq!(name, "timesheet.pdf");
        assert_eq!(content, b"%PDF-1.7 test payload".to_vec());
    }

    #[tokio::test]
    async fn test_unacceptable_document_skipped_not_fatal() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let mut req = request(lecturer.id, dec!(40), TemporalFixtures::current_period());
        req.documents = vec![
            pdf_upload("timesheet.pdf"),
            DocumentUpload::new("script.exe", vec![0u8; 64]),
        ];

        let claim = harness.service.submit_claim(req).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);

        let stored = harness.claims.documents_for_claim(claim.id).await.unwrap();
        assert_eq!(stored.len(), 1);

        // The skip is on the audit trail, in storage as well as on the return
        let persisted = harness.claims.get_claim(claim.id).await.unwrap();
        assert!(persisted.notes_text().contains("[DOCUMENT SKIPPED]"));
        assert!(persisted.notes_text().contains("script.exe"));
    }
}

// ============================================================================
// Reporting
// ============================================================================

mod reporting_tests {
    use super::*;

    #[tokio::test]
    async fn test_report_groups_approved_claims_per_lecturer() {
        let lecturer = LecturerBuilder::new().with_name("N. Dube").build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        // Two claims for different periods, both approved
        for (period, hours) in [("2025-04", dec!(40)), ("2025-05", dec!(20))] {
            let claim = harness
                .service
                .submit_claim(request(lecturer.id, hours, period.parse().unwrap()))
                .await
                .unwrap();
            harness
                .service
                .auto_verify(claim.id, Role::Coordinator)
                .await
                .unwrap();
            harness.service.approve(claim.id, Role::Manager).await.unwrap();
        }

        let report = harness
            .service
            .generate_payment_report(TemporalFixtures::current_month_range())
            .await
            .unwrap();

        assert_eq!(report.total_claims, 2);
        assert_eq!(report.total_amount.amount(), dec!(12000));
        assert_eq!(report.breakdown.len(), 1);
        let row = &report.breakdown[0];
        assert_eq!(row.lecturer_name, "N. Dube");
        assert_eq!(row.claim_count, 2);
        assert_eq!(row.total_hours, dec!(60));
        assert_eq!(row.total_amount.amount(), dec!(12000));
    }

    #[tokio::test]
    async fn test_report_excludes_unapproved_claims() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let pending = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), TemporalFixtures::current_period()))
            .await
            .unwrap();
        harness
            .service
            .auto_verify(pending.id, Role::Coordinator)
            .await
            .unwrap();

        let report = harness
            .service
            .generate_payment_report(TemporalFixtures::current_month_range())
            .await
            .unwrap();
        assert_eq!(report.total_claims, 0);
        assert!(report.breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_stats_over_live_engine() {
        let lecturer = LecturerBuilder::new().build();
        let harness = EngineHarness::with_lecturers(vec![lecturer.clone()]).await;

        let approved = harness
            .service
            .submit_claim(request(lecturer.id, dec!(40), "2025-04".parse().unwrap()))
            .await
            .unwrap();
        harness
            .service
            .auto_verify(approved.id, Role::Coordinator)
            .await
            .unwrap();
        harness.service.approve(approved.id, Role::Manager).await.unwrap();

        harness
            .service
            .submit_claim(request(lecturer.id, dec!(10), TemporalFixtures::current_period()))
            .await
            .unwrap();

        let stats = harness.service.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_claims, 2);
        assert_eq!(stats.pending_claims, 1);
        assert_eq!(stats.approved_claims, 1);
        assert_eq!(stats.total_lecturers, 1);
        assert_eq!(stats.active_lecturers, 1);
        // The approved claim was submitted at the pinned "now", so it counts
        // toward the current month
        assert_eq!(stats.total_payments_this_month.amount(), dec!(8000));
        assert_eq!(stats.average_approved_amount.amount(), dec!(8000));
    }
}
