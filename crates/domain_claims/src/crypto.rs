//! Document encryption at rest
//!
//! AES-256-GCM with a random 96-bit nonce per document, stored as a prefix
//! of the ciphertext. The cipher performs no I/O; callers supply and receive
//! byte buffers. Independent documents encrypt in parallel safely since
//! nothing here is shared mutable state.
//!
//! Format: nonce_12bytes || ciphertext || tag_16bytes

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use thiserror::Error;

use crate::config::CipherConfig;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Errors from the document cipher
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Ciphertext too short to contain a nonce and tag")]
    CiphertextTooShort,

    #[error("Decryption failed (wrong key or tampered data)")]
    DecryptionFailed,
}

/// Symmetric cipher for supporting documents
#[derive(Clone)]
pub struct DocumentCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for DocumentCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material
        f.debug_struct("DocumentCipher").finish_non_exhaustive()
    }
}

impl DocumentCipher {
    /// Builds a cipher from 32 bytes of key material
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    /// Builds a cipher from configuration
    pub fn from_config(config: &CipherConfig) -> Result<Self, core_kernel::CoreError> {
        Ok(Self::new(&config.key_bytes()?))
    }

    /// Encrypts plaintext, returning nonce || ciphertext || tag
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts data produced by [`encrypt`](Self::encrypt)
    ///
    /// Fails on anything not produced with the matching key, including
    /// truncated or tampered buffers.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::CiphertextTooShort);
        }
        let nonce = Nonce::from_slice(&data[..NONCE_LEN]);
        self.cipher
            .decrypt(nonce, &data[NONCE_LEN..])
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}
