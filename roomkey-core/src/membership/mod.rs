//! Room membership
//!
//! A user belongs to any number of rooms through the `roomAccess` map on
//! their record. `roomAccess[room] == true` is the only predicate used when
//! listing a room's users.

pub mod error;
pub mod roster;
pub mod service;
pub mod user;

pub use error::{MembershipError, MembershipResult};
pub use roster::RoomRoster;
pub use service::RoomMembership;
pub use user::UserRecord;
