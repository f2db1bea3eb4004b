//! Supporting documents
//!
//! Documents are created only as children of a claim at submission time,
//! never mutated, and removed only by cascading claim deletion. Uploads are
//! screened against the policy's extension allow-list and size ceiling
//! before encryption.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{ClaimId, DocumentId};
use crate::config::ClaimPolicy;

/// An encrypted document attached to a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportingDocument {
    /// Unique identifier
    pub id: DocumentId,
    /// Owning claim
    pub claim_id: ClaimId,
    /// Original filename as uploaded
    pub file_name: String,
    /// AES-GCM ciphertext (nonce-prefixed)
    pub ciphertext: Vec<u8>,
}

impl SupportingDocument {
    pub fn new(claim_id: ClaimId, file_name: impl Into<String>, ciphertext: Vec<u8>) -> Self {
        Self {
            id: DocumentId::new_v7(),
            claim_id,
            file_name: file_name.into(),
            ciphertext,
        }
    }
}

/// A raw document handed in with a submission, not yet screened or encrypted
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Lowercased extension including the dot, if the filename has one
    pub fn extension(&self) -> Option<String> {
        let idx = self.file_name.rfind('.')?;
        if idx == 0 || idx == self.file_name.len() - 1 {
            return None;
        }
        Some(self.file_name[idx..].to_ascii_lowercase())
    }

    /// Checks the upload against the document policy
    ///
    /// A rejection here never fails the submission; the document is skipped
    /// with a recorded warning.
    pub fn screen(&self, policy: &ClaimPolicy) -> Result<(), DocumentRejection> {
        if self.content.is_empty() {
            return Err(DocumentRejection::Empty {
                file_name: self.file_name.clone(),
            });
        }
        match self.extension() {
            Some(ext) if policy.allowed_extensions.iter().any(|a| a == &ext) => {}
            other => {
                return Err(DocumentRejection::ExtensionNotAllowed {
                    file_name: self.file_name.clone(),
                    extension: other.unwrap_or_default(),
                });
            }
        }
        if self.content.len() > policy.max_document_bytes {
            return Err(DocumentRejection::TooLarge {
                file_name: self.file_name.clone(),
                size: self.content.len(),
                max: policy.max_document_bytes,
            });
        }
        Ok(())
    }
}

/// Why an upload was skipped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentRejection {
    #[error("File type '{extension}' is not allowed for '{file_name}'")]
    ExtensionNotAllowed { file_name: String, extension: String },

    #[error("File '{file_name}' is {size} bytes, over the {max} byte limit")]
    TooLarge {
        file_name: String,
        size: usize,
        max: usize,
    },

    #[error("File '{file_name}' is empty")]
    Empty { file_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ClaimPolicy {
        ClaimPolicy::default()
    }

    #[test]
    fn test_extension_extraction() {
        assert_eq!(
            DocumentUpload::new("Timesheet.PDF", vec![1]).extension(),
            Some(".pdf".to_string())
        );
        assert_eq!(DocumentUpload::new("no_extension", vec![1]).extension(), None);
        assert_eq!(DocumentUpload::new(".hidden", vec![1]).extension(), None);
        assert_eq!(DocumentUpload::new("trailing.", vec![1]).extension(), None);
    }

    #[test]
    fn test_allowed_types_pass() {
        for name in ["a.pdf", "b.docx", "c.xlsx", "UPPER.PDF"] {
            let upload = DocumentUpload::new(name, vec![0u8; 128]);
            assert!(upload.screen(&policy()).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn test_disallowed_extension_rejected() {
        let upload = DocumentUpload::new("malware.exe", vec![0u8; 128]);
        assert!(matches!(
            upload.screen(&policy()),
            Err(DocumentRejection::ExtensionNotAllowed { .. })
        ));
    }

    #[test]
    fn test_oversized_rejected() {
        let max = policy().max_document_bytes;
        let upload = DocumentUpload::new("big.pdf", vec![0u8; max + 1]);
        assert!(matches!(
            upload.screen(&policy()),
            Err(DocumentRejection::TooLarge { .. })
        ));

        let at_limit = DocumentUpload::new("ok.pdf", vec![0u8; max]);
        assert!(at_limit.screen(&policy()).is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        let upload = DocumentUpload::new("empty.pdf", vec![]);
        assert!(matches!(
            upload.screen(&policy()),
            Err(DocumentRejection::Empty { .. })
        ));
    }
}
