//! Local view model of one room's users and pending invitations
//!
//! Every mutation goes to the store first. The local lists change only
//! once the store confirms, so a failed write never shows up as applied.

use super::error::{MembershipError, MembershipResult};
use super::service::RoomMembership;
use super::user::UserRecord;
use crate::dispatch::{DispatchOutcome, MessageDispatch};
use crate::invitation::{InvitationCode, InvitationLifecycle, InvitationRecord};
use crate::store::DocumentStore;
use crate::types::{RoomId, UserId};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RoomRoster {
    room_id: RoomId,
    users: Vec<UserRecord>,
    pending: Vec<InvitationRecord>,
}

impl RoomRoster {
    /// Load users first, then the room's pending invitations
    pub async fn load<S, D>(
        membership: &RoomMembership<S>,
        lifecycle: &InvitationLifecycle<S, D>,
        room_id: RoomId,
    ) -> MembershipResult<Self>
    where
        S: DocumentStore,
        D: MessageDispatch,
    {
        let users = membership.list_users(&room_id).await?;
        let pending = lifecycle.list_pending(&room_id).await?.iter().cloned().collect();
        Ok(Self { room_id, users, pending })
    }

    /// Replace both lists with fresh reads
    pub async fn reload<S, D>(
        &mut self,
        membership: &RoomMembership<S>,
        lifecycle: &InvitationLifecycle<S, D>,
    ) -> MembershipResult<()>
    where
        S: DocumentStore,
        D: MessageDispatch,
    {
        *self = Self::load(membership, lifecycle, self.room_id.clone()).await?;
        Ok(())
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn pending(&self) -> &[InvitationRecord] {
        &self.pending
    }

    pub fn user(&self, user_id: &UserId) -> Option<&UserRecord> {
        self.users.iter().find(|u| &u.id == user_id)
    }

    pub fn invitation(&self, code: &InvitationCode) -> Option<&InvitationRecord> {
        self.pending.iter().find(|r| &r.code == code)
    }

    /// Flip a user's admin flag, returning the new value
    pub async fn toggle_admin<S: DocumentStore>(
        &mut self,
        membership: &RoomMembership<S>,
        user_id: &UserId,
    ) -> MembershipResult<bool> {
        let current = self
            .user(user_id)
            .map(|u| u.is_admin)
            .ok_or_else(|| MembershipError::UserNotFound(user_id.clone()))?;

        let updated = !current;
        membership.set_admin(user_id, updated).await?;

        if let Some(user) = self.users.iter_mut().find(|u| &u.id == user_id) {
            user.is_admin = updated;
        }
        Ok(updated)
    }

    /// Take away this room's access and drop the user from the list
    pub async fn remove_user<S: DocumentStore>(
        &mut self,
        membership: &RoomMembership<S>,
        user_id: &UserId,
    ) -> MembershipResult<()> {
        if self.user(user_id).is_none() {
            return Err(MembershipError::UserNotFound(user_id.clone()));
        }

        membership.revoke_access(user_id, &self.room_id).await?;
        self.users.retain(|u| &u.id != user_id);
        Ok(())
    }

    pub async fn revoke_invitation<S, D>(
        &mut self,
        lifecycle: &InvitationLifecycle<S, D>,
        code: &InvitationCode,
    ) -> MembershipResult<()>
    where
        S: DocumentStore,
        D: MessageDispatch,
    {
        lifecycle.revoke(code).await?;
        self.pending.retain(|r| &r.code != code);
        Ok(())
    }

    /// Resend, then refresh the local copy from the store whatever the outcome
    pub async fn resend_invitation<S, D>(
        &mut self,
        lifecycle: &InvitationLifecycle<S, D>,
        code: &InvitationCode,
    ) -> MembershipResult<DispatchOutcome>
    where
        S: DocumentStore,
        D: MessageDispatch,
    {
        let result = lifecycle.resend(code).await;

        match lifecycle.get(code).await {
            Ok(Some(record)) => {
                if let Some(local) = self.pending.iter_mut().find(|r| &r.code == code) {
                    *local = record;
                }
            }
            Ok(None) => self.pending.retain(|r| &r.code != code),
            Err(e) => warn!(code = %code, error = %e, "could not refresh invitation after resend"),
        }

        Ok(result?)
    }
}
