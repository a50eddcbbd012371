//! Invitation lifecycle
//!
//! Invitations grant a phone number access to one room. Each one is keyed
//! by a six-character code that is also the token sent to the recipient.
//!
//! ## Layout
//!
//! - `code`: code alphabet, generation and parsing
//! - `record`: the persisted record and its status values
//! - `pending`: per-room view over a single read of all invitations
//! - `lifecycle`: generate / dispatch / resend / revoke against the store

pub mod code;
pub mod error;
pub mod lifecycle;
pub mod pending;
pub mod record;

pub use code::{CodeGenerator, InvitationCode, RandomCodes, CODE_ALPHABET, CODE_LEN};
pub use error::{InvitationError, InvitationResult};
pub use lifecycle::InvitationLifecycle;
pub use pending::{PendingInvitations, PendingIter};
pub use record::{invitation_ttl, InvitationRecord, InvitationStatus, INVITATION_TTL_DAYS};
