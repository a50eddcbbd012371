//! Room membership operations against the store

use super::error::{MembershipError, MembershipResult};
use super::user::UserRecord;
use crate::metrics::{self, record_counter, StoreTimer};
use crate::store::{DocumentStore, StorePath};
use crate::types::{RoomId, UserId};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Membership service over the `users` collection
pub struct RoomMembership<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> RoomMembership<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Users whose `roomAccess[room_id]` is `true`, ordered by name
    pub async fn list_users(&self, room_id: &RoomId) -> MembershipResult<Vec<UserRecord>> {
        let snapshot = {
            let _timer = StoreTimer::start("users.list");
            self.store.read(&StorePath::users()).await.map_err(MembershipError::StoreReadFailed)?
        };

        let mut users = Vec::new();
        for (key, value) in snapshot.children() {
            match UserRecord::from_value(UserId::from(key), value.clone()) {
                Ok(user) if user.has_access(room_id) => users.push(user),
                Ok(_) => {}
                Err(e) => warn!(user_id = key, error = %e, "skipping malformed user record"),
            }
        }
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        debug!(room_id = %room_id, count = users.len(), "loaded room users");
        Ok(users)
    }

    /// Read one user
    pub async fn get_user(&self, user_id: &UserId) -> MembershipResult<Option<UserRecord>> {
        let path = StorePath::user(user_id.as_str()).map_err(MembershipError::StoreReadFailed)?;
        let snapshot = self.store.read(&path).await.map_err(MembershipError::StoreReadFailed)?;

        match snapshot.into_value() {
            Some(value) => UserRecord::from_value(user_id.clone(), value)
                .map(Some)
                .map_err(MembershipError::StoreReadFailed),
            None => Ok(None),
        }
    }

    /// Write `users/{user_id}/isAdmin`
    ///
    /// Nothing local is touched here; callers holding a copy of the user
    /// must apply the change only after this returns `Ok`.
    pub async fn set_admin(&self, user_id: &UserId, is_admin: bool) -> MembershipResult<()> {
        let path =
            StorePath::user_admin_flag(user_id.as_str()).map_err(MembershipError::StoreWriteFailed)?;
        {
            let _timer = StoreTimer::start("users.admin");
            self.store
                .set(&path, Value::Bool(is_admin))
                .await
                .map_err(MembershipError::StoreWriteFailed)?;
        }

        info!(user_id = %user_id, is_admin, "admin flag updated");
        record_counter(metrics::MEMBERSHIP_ADMIN_CHANGES, 1);
        Ok(())
    }

    /// Delete `users/{user_id}/roomAccess/{room_id}`; the user record stays
    pub async fn revoke_access(&self, user_id: &UserId, room_id: &RoomId) -> MembershipResult<()> {
        let path = StorePath::user_room_access(user_id.as_str(), room_id.as_str())
            .map_err(MembershipError::StoreWriteFailed)?;
        {
            let _timer = StoreTimer::start("users.access");
            self.store.remove(&path).await.map_err(MembershipError::StoreWriteFailed)?;
        }

        info!(user_id = %user_id, room_id = %room_id, "room access revoked");
        record_counter(metrics::MEMBERSHIP_ACCESS_REVOKED, 1);
        Ok(())
    }
}
