//! Invitation record model and persisted document shape

use super::code::InvitationCode;
use crate::store::StoreResult;
use crate::types::{RoomId, UserId};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Days an invitation stays redeemable
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Fixed validity window of an invitation
pub fn invitation_ttl() -> TimeDelta {
    TimeDelta::days(INVITATION_TTL_DAYS)
}

/// Delivery state of an invitation
///
/// ```text
/// created --dispatch:sent-->   sent
/// created --dispatch:failed--> failed
/// failed  --resend-->          sending --outcome--> sent | failed
/// sent    --resend-->          sending --outcome--> sent | failed
/// sending --cancelled-->       (status before the resend)
/// ```
///
/// `accepted` is only ever written by the redemption flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Created,
    /// A resend is in flight; the outcome is not known yet
    Sending,
    Sent,
    Failed,
    Accepted,
}

impl InvitationStatus {
    /// Still listed as pending for its room
    pub fn is_pending(&self) -> bool {
        !matches!(self, InvitationStatus::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Created => "created",
            InvitationStatus::Sending => "sending",
            InvitationStatus::Sent => "sent",
            InvitationStatus::Failed => "failed",
            InvitationStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An invitation as the lifecycle sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRecord {
    pub code: InvitationCode,
    /// Opaque destination, never format-checked
    pub phone_number: String,
    pub is_admin: bool,
    pub room_id: RoomId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: InvitationStatus,
}

/// Body stored under `invitations/{code}`; the code itself is the key
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvitationDocument {
    phone_number: String,
    is_admin: bool,
    room_id: RoomId,
    created_by: UserId,
    created_at: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
    status: InvitationStatus,
}

impl InvitationRecord {
    /// Fresh `created` record issued at `now`, expiring seven days later
    pub fn new(
        code: InvitationCode,
        phone_number: impl Into<String>,
        is_admin: bool,
        room_id: RoomId,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        // Persisted timestamps carry whole seconds only.
        let created_at = now.trunc_subsecs(0);
        InvitationRecord {
            code,
            phone_number: phone_number.into(),
            is_admin,
            room_id,
            created_by,
            created_at,
            expiry_date: created_at + invitation_ttl(),
            status: InvitationStatus::Created,
        }
    }

    /// Advisory: the store never purges expired invitations
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry_date
    }

    pub fn to_value(&self) -> StoreResult<Value> {
        let document = InvitationDocument {
            phone_number: self.phone_number.clone(),
            is_admin: self.is_admin,
            room_id: self.room_id.clone(),
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            expiry_date: self.expiry_date,
            status: self.status,
        };
        Ok(serde_json::to_value(document)?)
    }

    pub fn from_value(code: InvitationCode, value: Value) -> StoreResult<Self> {
        let document: InvitationDocument = serde_json::from_value(value)?;
        Ok(InvitationRecord {
            code,
            phone_number: document.phone_number,
            is_admin: document.is_admin,
            room_id: document.room_id,
            created_by: document.created_by,
            created_at: document.created_at,
            expiry_date: document.expiry_date,
            status: document.status,
        })
    }
}
