//! Lecturer domain ports
//!
//! `LecturerPort` defines what the engine needs from the lecturer store.
//! The production adapter wraps the institution's HR database; tests use the
//! in-memory mock below.

use async_trait::async_trait;

use core_kernel::{DomainPort, LecturerId, PortError};
use crate::lecturer::Lecturer;

/// Storage port for lecturer master data
#[async_trait]
pub trait LecturerPort: DomainPort {
    /// Retrieves a lecturer by ID, or `PortError::NotFound`
    async fn get_lecturer(&self, id: LecturerId) -> Result<Lecturer, PortError>;

    /// Finds a lecturer by email, if any
    async fn find_by_email(&self, email: &str) -> Result<Option<Lecturer>, PortError>;

    /// Inserts a new record or replaces the one with the same id
    async fn save_lecturer(&self, lecturer: &Lecturer) -> Result<(), PortError>;

    /// Lists lecturer records, optionally restricted to active accounts
    async fn list_lecturers(&self, active_only: bool) -> Result<Vec<Lecturer>, PortError>;
}

/// In-memory implementation of `LecturerPort` for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// HashMap-backed mock adapter
    #[derive(Debug, Default)]
    pub struct MockLecturerPort {
        lecturers: Arc<RwLock<HashMap<LecturerId, Lecturer>>>,
    }

    impl MockLecturerPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with lecturer records
        pub async fn with_lecturers(lecturers: Vec<Lecturer>) -> Self {
            let port = Self::new();
            for lecturer in lecturers {
                port.lecturers.write().await.insert(lecturer.id, lecturer);
            }
            port
        }
    }

    impl DomainPort for MockLecturerPort {}

    #[async_trait]
    impl LecturerPort for MockLecturerPort {
        async fn get_lecturer(&self, id: LecturerId) -> Result<Lecturer, PortError> {
            self.lecturers
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Lecturer", id))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Lecturer>, PortError> {
            Ok(self
                .lecturers
                .read()
                .await
                .values()
                .find(|l| l.email == email)
                .cloned())
        }

        async fn save_lecturer(&self, lecturer: &Lecturer) -> Result<(), PortError> {
            self.lecturers
                .write()
                .await
                .insert(lecturer.id, lecturer.clone());
            Ok(())
        }

        async fn list_lecturers(&self, active_only: bool) -> Result<Vec<Lecturer>, PortError> {
            Ok(self
                .lecturers
                .read()
                .await
                .values()
                .filter(|l| !active_only || l.is_active)
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLecturerPort;
    use super::*;
    use crate::lecturer::Role;
    use chrono::{TimeZone, Utc};
    use core_kernel::{Currency, Money};
    use rust_decimal_macros::dec;

    fn test_lecturer(email: &str) -> Lecturer {
        Lecturer::new(
            "Test Lecturer",
            email,
            Money::new(dec!(300), Currency::ZAR),
            Role::Lecturer,
            "hash",
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let port = MockLecturerPort::new();
        let lecturer = test_lecturer("a@example.com");

        port.save_lecturer(&lecturer).await.unwrap();
        let fetched = port.get_lecturer(lecturer.id).await.unwrap();
        assert_eq!(fetched.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let port = MockLecturerPort::new();
        let result = port.get_lecturer(LecturerId::new_v7()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let port =
            MockLecturerPort::with_lecturers(vec![test_lecturer("b@example.com")]).await;

        assert!(port.find_by_email("b@example.com").await.unwrap().is_some());
        assert!(port.find_by_email("c@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_only() {
        let active = test_lecturer("a@example.com");
        let mut inactive = test_lecturer("b@example.com");
        inactive.deactivate(Utc::now());

        let port = MockLecturerPort::with_lecturers(vec![active, inactive]).await;

        assert_eq!(port.list_lecturers(false).await.unwrap().len(), 2);
        assert_eq!(port.list_lecturers(true).await.unwrap().len(), 1);
    }
}
