//! User record model

use crate::store::StoreResult;
use crate::types::{RoomId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A user as stored under `users/{userId}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub is_admin: bool,
    /// Per-room membership; only `true` grants access
    pub room_access: BTreeMap<RoomId, bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    name: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    room_access: BTreeMap<RoomId, bool>,
}

impl UserRecord {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), is_admin: false, room_access: BTreeMap::new() }
    }

    /// Builder-style room grant, mostly for fixtures
    pub fn with_access(mut self, room_id: RoomId, granted: bool) -> Self {
        self.room_access.insert(room_id, granted);
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Whether this user is listed for `room_id`
    pub fn has_access(&self, room_id: &RoomId) -> bool {
        self.room_access.get(room_id).copied().unwrap_or(false)
    }

    pub fn to_value(&self) -> StoreResult<Value> {
        let document = UserDocument {
            name: self.name.clone(),
            is_admin: self.is_admin,
            room_access: self.room_access.clone(),
        };
        Ok(serde_json::to_value(document)?)
    }

    pub fn from_value(id: UserId, value: Value) -> StoreResult<Self> {
        let document: UserDocument = serde_json::from_value(value)?;
        Ok(Self {
            id,
            name: document.name,
            is_admin: document.is_admin,
            room_access: document.room_access,
        })
    }
}
