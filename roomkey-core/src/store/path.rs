//! Typed paths into the document tree

use super::error::{StoreError, StoreResult};
use std::fmt;

const FORBIDDEN: &[char] = &['/', '.', '#', '$', '[', ']'];

/// Root collection holding invitation records
pub const INVITATIONS: &str = "invitations";

/// Root collection holding user records
pub const USERS: &str = "users";

/// A validated, slash-separated location in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// Build a path from raw segments, rejecting anything the store would refuse
    pub fn new<I, S>(segments: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(StoreError::InvalidPath("path has no segments".to_string()));
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a `a/b/c` string
    pub fn parse(raw: &str) -> StoreResult<Self> {
        Self::new(raw.split('/'))
    }

    /// `invitations`
    pub fn invitations() -> Self {
        Self { segments: vec![INVITATIONS.to_string()] }
    }

    /// `invitations/{code}`
    pub fn invitation(code: &str) -> StoreResult<Self> {
        Self::invitations().child(code)
    }

    /// `invitations/{code}/status`
    pub fn invitation_status(code: &str) -> StoreResult<Self> {
        Self::invitation(code)?.child("status")
    }

    /// `users`
    pub fn users() -> Self {
        Self { segments: vec![USERS.to_string()] }
    }

    /// `users/{userId}`
    pub fn user(user_id: &str) -> StoreResult<Self> {
        Self::users().child(user_id)
    }

    /// `users/{userId}/isAdmin`
    pub fn user_admin_flag(user_id: &str) -> StoreResult<Self> {
        Self::user(user_id)?.child("isAdmin")
    }

    /// `users/{userId}/roomAccess/{roomId}`
    pub fn user_room_access(user_id: &str, room_id: &str) -> StoreResult<Self> {
        Self::user(user_id)?.child("roomAccess")?.child(room_id)
    }

    /// Append one segment
    pub fn child(mut self, segment: impl Into<String>) -> StoreResult<Self> {
        let segment = segment.into();
        validate_segment(&segment)?;
        self.segments.push(segment);
        Ok(self)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, i.e. the key this path addresses within its parent
    pub fn key(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

fn validate_segment(segment: &str) -> StoreResult<()> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath("empty path segment".to_string()));
    }
    if let Some(c) = segment.chars().find(|c| FORBIDDEN.contains(c) || c.is_control()) {
        return Err(StoreError::InvalidPath(format!(
            "segment {:?} contains forbidden character {:?}",
            segment, c
        )));
    }
    Ok(())
}
