//! Lecturer aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, LecturerId, Money};
use crate::error::LecturerError;

/// Lower bound of the contracted hourly rate band (ZAR)
pub const MIN_HOURLY_RATE: Decimal = dec!(200);
/// Upper bound of the contracted hourly rate band (ZAR)
pub const MAX_HOURLY_RATE: Decimal = dec!(500);

/// The actor roles the engine recognises
///
/// Role identity is handed to the engine as an opaque attribute by the
/// caller; the engine only ever compares it against an operation's allowed
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Lecturer,
    Coordinator,
    Manager,
    Hr,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Lecturer => "LECTURER",
            Role::Coordinator => "COORDINATOR",
            Role::Manager => "MANAGER",
            Role::Hr => "HR",
        };
        write!(f, "{name}")
    }
}

/// A contract lecturer record, owned by HR
///
/// The contracted `hourly_rate` is the single source of truth that claim
/// computation snapshots and automated verification reconciles against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique identifier
    pub id: LecturerId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contracted hourly rate, centrally controlled by HR
    pub hourly_rate: Money,
    /// Whether the account may log in and submit claims
    pub is_active: bool,
    /// Role used for capability checks
    pub role: Role,
    /// Opaque credential hash; the engine never interprets it
    pub password_hash: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Lecturer {
    /// Creates a new active lecturer record
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        hourly_rate: Money,
        role: Role,
        password_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LecturerError> {
        let email = email.into();
        if !email.contains('@') {
            return Err(LecturerError::InvalidEmail(email));
        }
        validate_rate(hourly_rate)?;

        Ok(Self {
            id: LecturerId::new_v7(),
            name: name.into(),
            email,
            hourly_rate,
            is_active: true,
            role,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the contracted rate; applies to all future claims only
    pub fn set_hourly_rate(&mut self, rate: Money, now: DateTime<Utc>) -> Result<(), LecturerError> {
        validate_rate(rate)?;
        tracing::info!(lecturer_id = %self.id, old_rate = %self.hourly_rate, new_rate = %rate, "contracted rate updated");
        self.hourly_rate = rate;
        self.updated_at = now;
        Ok(())
    }

    /// Deactivates the account; historical claims are preserved
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

fn validate_rate(rate: Money) -> Result<(), LecturerError> {
    if rate.currency() != Currency::ZAR
        || rate.amount() < MIN_HOURLY_RATE
        || rate.amount() > MAX_HOURLY_RATE
    {
        return Err(LecturerError::RateOutOfBounds {
            rate: rate.to_string(),
            min: MIN_HOURLY_RATE.to_string(),
            max: MAX_HOURLY_RATE.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn rate(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::ZAR)
    }

    #[test]
    fn test_new_lecturer() {
        let lecturer = Lecturer::new(
            "T. Mokoena",
            "t.mokoena@example.ac.za",
            rate(dec!(350)),
            Role::Lecturer,
            "$2b$12$hash",
            now(),
        )
        .unwrap();

        assert!(lecturer.is_active);
        assert_eq!(lecturer.hourly_rate.amount(), dec!(350));
        assert_eq!(lecturer.created_at, lecturer.updated_at);
    }

    #[test]
    fn test_rate_band_enforced() {
        for bad in [dec!(199.99), dec!(500.01), dec!(0)] {
            let result = Lecturer::new(
                "X",
                "x@example.com",
                rate(bad),
                Role::Lecturer,
                "h",
                now(),
            );
            assert!(matches!(result, Err(LecturerError::RateOutOfBounds { .. })));
        }
        // Band endpoints are allowed
        for ok in [dec!(200), dec!(500)] {
            assert!(Lecturer::new("X", "x@example.com", rate(ok), Role::Lecturer, "h", now()).is_ok());
        }
    }

    #[test]
    fn test_set_rate_stamps_updated_at() {
        let mut lecturer =
            Lecturer::new("X", "x@example.com", rate(dec!(200)), Role::Lecturer, "h", now()).unwrap();
        let later = now() + chrono::Duration::days(30);

        lecturer.set_hourly_rate(rate(dec!(250)), later).unwrap();

        assert_eq!(lecturer.hourly_rate.amount(), dec!(250));
        assert_eq!(lecturer.updated_at, later);
    }

    #[test]
    fn test_rejects_bad_email() {
        let result = Lecturer::new("X", "not-an-email", rate(dec!(300)), Role::Lecturer, "h", now());
        assert!(matches!(result, Err(LecturerError::InvalidEmail(_))));
    }

    #[test]
    fn test_deactivate() {
        let mut lecturer =
            Lecturer::new("X", "x@example.com", rate(dec!(300)), Role::Lecturer, "h", now()).unwrap();
        lecturer.deactivate(now());
        assert!(!lecturer.is_active);
    }

    #[test]
    fn test_role_display_matches_audit_markers() {
        assert_eq!(Role::Coordinator.to_string(), "COORDINATOR");
        assert_eq!(Role::Hr.to_string(), "HR");
    }

    #[test]
    fn test_lecturer_serde_roundtrip() {
        let lecturer =
            Lecturer::new("X", "x@example.com", rate(dec!(325.50)), Role::Manager, "h", now())
                .unwrap();
        let json = serde_json::to_string(&lecturer).unwrap();
        let back: Lecturer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, lecturer.id);
        assert_eq!(back.hourly_rate, lecturer.hourly_rate);
        assert_eq!(back.role, Role::Manager);
    }
}
