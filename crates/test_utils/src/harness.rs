//! Fully wired engine harness
//!
//! Builds a `ClaimLifecycleService` over the in-memory mock ports with a
//! pinned clock, keeping handles to the ports so tests can seed and inspect
//! storage directly.

use std::sync::{Arc, Once};

use core_kernel::FixedClock;
use domain_claims::ports::mock::MockClaimsPort;
use domain_claims::{ClaimLifecycleService, ClaimPolicy, DocumentCipher};
use domain_lecturer::ports::mock::MockLecturerPort;
use domain_lecturer::Lecturer;

use crate::fixtures::TemporalFixtures;

/// Cipher key used throughout the suite
pub const TEST_CIPHER_KEY: [u8; 32] = [7u8; 32];

static INIT_LOGGING: Once = Once::new();

/// Installs a tracing subscriber for test output, once per process
///
/// Honors `RUST_LOG`; silent by default so passing runs stay quiet.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An engine instance plus handles to its in-memory storage
pub struct EngineHarness {
    pub service: ClaimLifecycleService,
    pub claims: Arc<MockClaimsPort>,
    pub lecturers: Arc<MockLecturerPort>,
}

impl EngineHarness {
    /// Builds an engine with the default policy, a fixed clock, and the
    /// given lecturer records
    pub async fn with_lecturers(records: Vec<Lecturer>) -> Self {
        init_test_logging();
        let claims = Arc::new(MockClaimsPort::new());
        let lecturers = Arc::new(MockLecturerPort::with_lecturers(records).await);
        let service = ClaimLifecycleService::new(
            claims.clone(),
            lecturers.clone(),
            Arc::new(FixedClock(TemporalFixtures::now())),
            DocumentCipher::new(&TEST_CIPHER_KEY),
            ClaimPolicy::default(),
        );
        Self {
            service,
            claims,
            lecturers,
        }
    }

    /// The cipher the engine was built with
    pub fn cipher(&self) -> DocumentCipher {
        DocumentCipher::new(&TEST_CIPHER_KEY)
    }
}
