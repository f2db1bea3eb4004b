//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults, so
//! tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{ClaimPeriod, LecturerId, Money};
use domain_claims::{Claim, ClaimStatus, DocumentUpload};
use domain_lecturer::{Lecturer, Role};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builder for lecturer records
pub struct LecturerBuilder {
    name: String,
    email: String,
    hourly_rate: Money,
    role: Role,
    active: bool,
}

impl Default for LecturerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LecturerBuilder {
    /// Creates a builder for an active base-rate lecturer
    pub fn new() -> Self {
        Self {
            name: "Test Lecturer".to_string(),
            email: "lecturer@example.ac.za".to_string(),
            hourly_rate: MoneyFixtures::base_rate(),
            role: Role::Lecturer,
            active: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_rate(mut self, rate: Money) -> Self {
        self.hourly_rate = rate;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Builds the lecturer; panics on invalid builder input
    pub fn build(self) -> Lecturer {
        let mut lecturer = Lecturer::new(
            self.name,
            self.email,
            self.hourly_rate,
            self.role,
            "$2b$12$test-hash",
            TemporalFixtures::now(),
        )
        .expect("builder produced an invalid lecturer");
        if !self.active {
            lecturer.deactivate(TemporalFixtures::now());
        }
        lecturer
    }
}

/// Builder for claims in any lifecycle state
pub struct ClaimBuilder {
    lecturer_id: LecturerId,
    hours_worked: Decimal,
    hourly_rate: Money,
    module: String,
    period: ClaimPeriod,
    submitted_at: DateTime<Utc>,
    status: ClaimStatus,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a builder for a Pending 40-hour base-rate claim
    pub fn new() -> Self {
        Self {
            lecturer_id: LecturerId::new_v7(),
            hours_worked: dec!(40),
            hourly_rate: MoneyFixtures::base_rate(),
            module: "PROG6212".to_string(),
            period: TemporalFixtures::current_period(),
            submitted_at: TemporalFixtures::now(),
            status: ClaimStatus::Pending,
        }
    }

    pub fn for_lecturer(mut self, lecturer_id: LecturerId) -> Self {
        self.lecturer_id = lecturer_id;
        self
    }

    pub fn with_hours(mut self, hours: Decimal) -> Self {
        self.hours_worked = hours;
        self
    }

    pub fn with_rate(mut self, rate: Money) -> Self {
        self.hourly_rate = rate;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_period(mut self, period: ClaimPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = at;
        self
    }

    /// Target lifecycle state; the builder walks the legal transitions
    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Claim {
        let mut claim = Claim::new(
            self.lecturer_id,
            self.hours_worked,
            self.hourly_rate,
            self.module,
            self.period,
            self.submitted_at,
        );
        match self.status {
            ClaimStatus::Pending => {}
            ClaimStatus::UnderReview => {
                claim
                    .transition(ClaimStatus::UnderReview, "COORDINATOR", self.submitted_at)
                    .expect("builder transition");
            }
            ClaimStatus::Approved => {
                claim
                    .transition(ClaimStatus::UnderReview, "COORDINATOR", self.submitted_at)
                    .expect("builder transition");
                claim
                    .transition(ClaimStatus::Approved, "MANAGER", self.submitted_at)
                    .expect("builder transition");
            }
            ClaimStatus::Rejected => {
                claim
                    .transition(ClaimStatus::Rejected, "COORDINATOR", self.submitted_at)
                    .expect("builder transition");
            }
        }
        claim
    }
}

/// A small PDF-looking upload that passes screening
pub fn pdf_upload(name: &str) -> DocumentUpload {
    DocumentUpload::new(name, b"%PDF-1.7 test payload".to_vec())
}
