//! RoomKey core
//!
//! Invitation lifecycle and room membership for a room-scoped app backed by
//! a hierarchical document database. The database and the device's text
//! messaging capability are injected as traits; this crate owns the rules
//! around them.
//!
//! ```text
//! presentation ──> InvitationLifecycle::generate ──> DocumentStore
//!              ──> InvitationLifecycle::dispatch ──> MessageDispatch
//!                                                └─> mark_sent / mark_failed
//! presentation ──> RoomMembership / RoomRoster   ──> DocumentStore
//! ```

pub mod config;
pub mod dispatch;
pub mod invitation;
pub mod logging;
pub mod membership;
pub mod metrics;
pub mod store;
pub mod test_utils;
pub mod types;

pub use config::Config;
pub use dispatch::{DispatchOutcome, MessageDispatch};
pub use invitation::{
    InvitationCode, InvitationError, InvitationLifecycle, InvitationRecord, InvitationStatus,
    PendingInvitations,
};
pub use logging::{init_logging, LogLevel};
pub use membership::{MembershipError, RoomMembership, RoomRoster, UserRecord};
pub use store::{DocumentStore, MemoryDocumentStore, StoreError, StorePath};
pub use types::{RoomId, UserId};
