//! Membership operation errors

use crate::invitation::InvitationError;
use crate::store::StoreError;
use crate::types::UserId;
use thiserror::Error;

/// Result type for membership operations
pub type MembershipResult<T> = Result<T, MembershipError>;

#[derive(Debug, Error)]
pub enum MembershipError {
    /// The store write did not happen; local state must not assume it did
    #[error("Failed to update user: {0}")]
    StoreWriteFailed(#[source] StoreError),

    #[error("Failed to read users: {0}")]
    StoreReadFailed(#[source] StoreError),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Invitation error: {0}")]
    Invitation(#[from] InvitationError),
}
