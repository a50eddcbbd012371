//! Invitation lifecycle errors

use super::code::InvitationCode;
use crate::store::StoreError;
use thiserror::Error;

/// Result type for invitation operations
pub type InvitationResult<T> = Result<T, InvitationError>;

/// Failures surfaced by the invitation lifecycle
///
/// All of these are recoverable at the presentation boundary; nothing here
/// is retried internally.
#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("Failed to write invitation: {0}")]
    StoreWriteFailed(#[source] StoreError),

    #[error("Failed to read invitations: {0}")]
    StoreReadFailed(#[source] StoreError),

    /// No messaging capability on this device; nothing was attempted
    #[error("Text messaging is not available")]
    DispatchUnavailable,

    /// A send was attempted and reported failed
    #[error("Sending invitation {code} failed")]
    DispatchOutcomeFailed { code: InvitationCode },

    #[error("Phone number must not be empty")]
    InvalidPhoneNumber,

    #[error("Invalid invitation code: {0:?}")]
    InvalidCode(String),

    #[error("Invitation not found: {0}")]
    NotFound(InvitationCode),

    #[error("Invitation already accepted: {0}")]
    AlreadyAccepted(InvitationCode),

    #[error("No free invitation code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
}
