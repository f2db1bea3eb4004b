//! Pre-built test data
//!
//! Fixed values shared across the suite so tests agree on "now", rates, and
//! periods without repeating literals everywhere.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{ClaimPeriod, Currency, DateRange, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Temporal fixtures
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The suite's canonical "now": 2025-05-15 10:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 15, 10, 0, 0).unwrap()
    }

    /// The period containing [`now`](Self::now)
    pub fn current_period() -> ClaimPeriod {
        "2025-05".parse().unwrap()
    }

    /// The calendar month of May 2025 as an inclusive range
    pub fn current_month_range() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 31, 23, 59, 59).unwrap(),
        )
        .unwrap()
    }
}

/// Money fixtures, all in ZAR
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The bottom of the contracted rate band
    pub fn base_rate() -> Money {
        Money::new(dec!(200), Currency::ZAR)
    }

    /// A mid-band rate
    pub fn senior_rate() -> Money {
        Money::new(dec!(350), Currency::ZAR)
    }

    pub fn zar(amount: Decimal) -> Money {
        Money::new(amount, Currency::ZAR)
    }
}
