//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// VK error codes that mean the caller may not read the chat. The title
/// resolver turns these into an "inaccessible chat" sentinel label instead of
/// failing the enumeration.
const ACCESS_DENIED_CODES: &[i64] = &[15, 917, 945];

#[derive(Error, Debug)]
pub enum DomainError {
    /// Error reported by the VK API itself (error_code / error_msg envelope).
    #[error("VK API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("metadata stamping failed: {0}")]
    Metadata(String),

    #[error("input error: {0}")]
    Input(String),
}

impl DomainError {
    /// True when the platform denied access to the requested chat.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, DomainError::Api { code, .. } if ACCESS_DENIED_CODES.contains(code))
    }
}
