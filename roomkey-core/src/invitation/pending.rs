//! Pending invitations for one room

use super::code::InvitationCode;
use super::record::InvitationRecord;
use crate::types::RoomId;
use std::slice;

/// Invitations read in one pass, filtered to a room on every iteration
///
/// Iterating is lazy and can be restarted any number of times; the
/// underlying records are the ones read when the list was produced.
#[derive(Debug, Clone)]
pub struct PendingInvitations {
    room_id: RoomId,
    records: Vec<InvitationRecord>,
}

impl PendingInvitations {
    /// `records` may span every room; filtering happens on iteration
    pub fn new(room_id: RoomId, mut records: Vec<InvitationRecord>) -> Self {
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.code.cmp(&b.code)));
        Self { room_id, records }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn iter(&self) -> PendingIter<'_> {
        PendingIter { room_id: &self.room_id, inner: self.records.iter() }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, code: &InvitationCode) -> Option<&InvitationRecord> {
        self.iter().find(|r| &r.code == code)
    }

    pub fn contains(&self, code: &InvitationCode) -> bool {
        self.get(code).is_some()
    }
}

impl<'a> IntoIterator for &'a PendingInvitations {
    type Item = &'a InvitationRecord;
    type IntoIter = PendingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the pending records of one room
pub struct PendingIter<'a> {
    room_id: &'a RoomId,
    inner: slice::Iter<'a, InvitationRecord>,
}

impl<'a> Iterator for PendingIter<'a> {
    type Item = &'a InvitationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let room_id = self.room_id;
        self.inner.find(|r| &r.room_id == room_id && r.status.is_pending())
    }
}
