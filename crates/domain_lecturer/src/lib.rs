//! Lecturer Records Domain
//!
//! This crate owns the lecturer master data the claim engine reconciles
//! against: the HR-controlled contracted hourly rate, the account's active
//! flag, and the role that gates lifecycle operations.

pub mod lecturer;
pub mod ports;
pub mod error;

pub use lecturer::{Lecturer, Role, MIN_HOURLY_RATE, MAX_HOURLY_RATE};
pub use ports::LecturerPort;
pub use error::LecturerError;
