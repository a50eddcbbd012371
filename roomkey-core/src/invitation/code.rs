//! Invitation code minting

use super::error::InvitationError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters a code is drawn from
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Characters per code
pub const CODE_LEN: usize = 6;

/// Six-character uppercase alphanumeric token; doubles as the record key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Draw a code from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Draw a code uniformly from `rng`
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        InvitationCode(code)
    }

    /// Accept a typed-in code, tolerating surrounding whitespace and lowercase
    pub fn parse(raw: &str) -> Result<Self, InvitationError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() != CODE_LEN || !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(InvitationError::InvalidCode(raw.to_string()));
        }
        Ok(InvitationCode(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for InvitationCode {
    type Error = InvitationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InvitationCode> for String {
    fn from(code: InvitationCode) -> Self {
        code.0
    }
}

/// Source of fresh codes for the lifecycle
pub trait CodeGenerator: Send + Sync {
    fn next_code(&self) -> InvitationCode;
}

/// Uniform random codes from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
    fn next_code(&self) -> InvitationCode {
        InvitationCode::generate()
    }
}
