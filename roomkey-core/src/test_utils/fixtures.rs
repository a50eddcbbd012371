//! Test fixtures for users, rooms and invitation codes

use crate::invitation::{CodeGenerator, InvitationCode};
use crate::membership::UserRecord;
use crate::store::{DocumentStore, MemoryDocumentStore, StorePath};
use crate::types::{RoomId, UserId};
use std::sync::Mutex;

/// Memory store pre-populated with `users`
pub async fn seeded_store(users: &[UserRecord]) -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    for user in users {
        let path = StorePath::user(user.id.as_str()).expect("fixture user id is a valid path segment");
        let value = user.to_value().expect("fixture user serializes");
        store.set(&path, value).await.expect("memory store accepts writes");
    }
    store
}

/// Builder for test users
pub struct TestUserBuilder {
    user: UserRecord,
}

impl TestUserBuilder {
    pub fn new(name: &str) -> Self {
        Self { user: UserRecord::new(UserId::generate(), name) }
    }

    pub fn admin(mut self) -> Self {
        self.user.is_admin = true;
        self
    }

    pub fn in_room(mut self, room: &str) -> Self {
        self.user.room_access.insert(RoomId::from(room), true);
        self
    }

    pub fn removed_from(mut self, room: &str) -> Self {
        self.user.room_access.insert(RoomId::from(room), false);
        self
    }

    pub fn build(self) -> UserRecord {
        self.user
    }
}

/// Hands out a fixed list of codes, repeating the last one once exhausted
pub struct SequenceCodes {
    codes: Mutex<Vec<InvitationCode>>,
}

impl SequenceCodes {
    pub fn new<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut codes: Vec<InvitationCode> = codes
            .into_iter()
            .map(|c| InvitationCode::parse(c).expect("fixture code is well formed"))
            .collect();
        assert!(!codes.is_empty(), "SequenceCodes needs at least one code");
        codes.reverse();
        Self { codes: Mutex::new(codes) }
    }
}

impl CodeGenerator for SequenceCodes {
    fn next_code(&self) -> InvitationCode {
        let mut codes = self.codes.lock().unwrap();
        if codes.len() > 1 {
            codes.pop().unwrap()
        } else {
            codes[0].clone()
        }
    }
}
