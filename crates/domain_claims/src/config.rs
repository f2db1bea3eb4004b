//! Engine configuration
//!
//! Policy constants and the cipher key are process-wide configuration,
//! loaded once at startup. Defaults mirror the source system's constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use core_kernel::CoreError;

/// Business-rule constants for claim processing
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimPolicy {
    /// Minimum claimable hours per month
    pub min_hours: Decimal,
    /// Maximum claimable hours per month
    pub max_hours: Decimal,
    /// Amounts strictly above this are flagged for manager review (ZAR)
    pub high_value_threshold: Decimal,
    /// Allowed supporting-document extensions, lowercased with dot
    pub allowed_extensions: Vec<String>,
    /// Ceiling on a single document's size in bytes
    pub max_document_bytes: usize,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            min_hours: dec!(1),
            max_hours: dec!(180),
            high_value_threshold: dec!(10000),
            allowed_extensions: vec![".pdf".to_string(), ".docx".to_string(), ".xlsx".to_string()],
            max_document_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ClaimPolicy {
    /// Loads policy overrides from `CLAIMS_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS"))
            .build()?
            .try_deserialize()
    }
}

/// Document cipher configuration
///
/// The key is a 32-byte secret; it is loaded once and never rotated within
/// a run.
#[derive(Debug, Clone, Deserialize)]
pub struct CipherConfig {
    pub key: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            key: "change-me-in-production-32bytes!".to_string(),
        }
    }
}

impl CipherConfig {
    /// Loads the key from `CIPHER_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CIPHER"))
            .build()?
            .try_deserialize()
    }

    /// The key material; must be exactly 32 bytes for AES-256
    pub fn key_bytes(&self) -> Result<[u8; 32], CoreError> {
        let bytes = self.key.as_bytes();
        bytes.try_into().map_err(|_| {
            CoreError::Configuration(format!(
                "Cipher key must be exactly 32 bytes, got {}",
                bytes.len()
            ))
        })
    }
}
