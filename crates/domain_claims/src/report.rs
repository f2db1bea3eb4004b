//! Payment reporting and HR statistics
//!
//! Aggregation here is pure: the lifecycle service fetches claims and
//! lecturer names through the ports and hands them in, so everything in
//! this module is testable without storage.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{Currency, DateRange, LecturerId, Money};
use domain_lecturer::Lecturer;

use crate::claim::{Claim, ClaimStatus};

/// Per-lecturer totals within one payment report
#[derive(Debug, Clone, Serialize)]
pub struct LecturerPaymentBreakdown {
    pub lecturer_id: LecturerId,
    /// "Unknown" when the lecturer record no longer resolves
    pub lecturer_name: String,
    pub claim_count: usize,
    pub total_hours: Decimal,
    pub total_amount: Money,
}

/// Payment report over a date range: Approved claims grouped per lecturer
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReport {
    pub generated_at: DateTime<Utc>,
    pub range: DateRange,
    pub total_claims: usize,
    pub total_amount: Money,
    pub breakdown: Vec<LecturerPaymentBreakdown>,
}

impl PaymentReport {
    /// Builds a report from Approved claims already filtered to the range
    ///
    /// Lecturer names come from the lookup; a missing entry falls back to
    /// "Unknown" rather than dropping the row. Breakdown rows are ordered by
    /// lecturer id so output is stable across runs.
    pub fn build(
        range: DateRange,
        claims: &[Claim],
        lecturer_names: &HashMap<LecturerId, String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut groups: BTreeMap<LecturerId, Vec<&Claim>> = BTreeMap::new();
        for claim in claims {
            groups.entry(claim.lecturer_id).or_default().push(claim);
        }

        let breakdown: Vec<LecturerPaymentBreakdown> = groups
            .into_iter()
            .map(|(lecturer_id, group)| LecturerPaymentBreakdown {
                lecturer_id,
                lecturer_name: lecturer_names
                    .get(&lecturer_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                claim_count: group.len(),
                total_hours: group.iter().map(|c| c.hours_worked).sum(),
                total_amount: sum_amounts(group.iter().map(|c| c.amount)),
            })
            .collect();

        Self {
            generated_at,
            range,
            total_claims: claims.len(),
            total_amount: sum_amounts(claims.iter().map(|c| c.amount)),
            breakdown,
        }
    }

    /// Renders the report as CSV for accounting imports
    ///
    /// Per-lecturer rows followed by a blank line and a totals footer.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("Lecturer ID,Lecturer Name,Total Hours,Total Amount,Claim Count\n");
        for row in &self.breakdown {
            csv.push_str(&format!(
                "{},{},{},{:.2},{}\n",
                row.lecturer_id,
                row.lecturer_name,
                row.total_hours,
                row.total_amount.amount(),
                row.claim_count
            ));
        }
        csv.push('\n');
        csv.push_str(&format!("TOTAL CLAIMS:,{}\n", self.total_claims));
        csv.push_str(&format!("TOTAL AMOUNT:,{}\n", self.total_amount));
        csv
    }
}

/// Headline figures for the HR dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_lecturers: usize,
    pub active_lecturers: usize,
    pub total_claims: usize,
    pub pending_claims: usize,
    pub under_review_claims: usize,
    pub approved_claims: usize,
    pub rejected_claims: usize,
    /// Approved amounts for claims submitted in the current calendar month
    pub total_payments_this_month: Money,
    /// Mean Approved claim amount, zero when nothing is approved yet
    pub average_approved_amount: Money,
}

impl DashboardStats {
    pub fn build(claims: &[Claim], lecturers: &[Lecturer], now: DateTime<Utc>) -> Self {
        let count = |status: ClaimStatus| claims.iter().filter(|c| c.status == status).count();

        let approved: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.status == ClaimStatus::Approved)
            .collect();

        let this_month = sum_amounts(
            approved
                .iter()
                .filter(|c| {
                    c.submitted_at.year() == now.year() && c.submitted_at.month() == now.month()
                })
                .map(|c| c.amount),
        );

        let average = if approved.is_empty() {
            Money::zero(Currency::ZAR)
        } else {
            let total = sum_amounts(approved.iter().map(|c| c.amount));
            Money::new(
                total.amount() / Decimal::from(approved.len()),
                total.currency(),
            )
        };

        Self {
            total_lecturers: lecturers.len(),
            active_lecturers: lecturers.iter().filter(|l| l.is_active).count(),
            total_claims: claims.len(),
            pending_claims: count(ClaimStatus::Pending),
            under_review_claims: count(ClaimStatus::UnderReview),
            approved_claims: count(ClaimStatus::Approved),
            rejected_claims: count(ClaimStatus::Rejected),
            total_payments_this_month: this_month,
            average_approved_amount: average,
        }
    }
}

fn sum_amounts(amounts: impl Iterator<Item = Money>) -> Money {
    amounts.fold(Money::zero(Currency::ZAR), |acc, m| {
        Money::new(acc.amount() + m.amount(), acc.currency())
    })
}
