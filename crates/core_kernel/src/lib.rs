//! Core Kernel - Foundational types and utilities for the claim system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Temporal types: claim periods and an injectable clock
//! - Common identifiers and value objects
//! - Port infrastructure for storage adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{ClaimPeriod, Clock, DateRange, SystemClock, FixedClock, TemporalError};
pub use identifiers::{LecturerId, ClaimId, DocumentId};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;
