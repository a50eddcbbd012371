//! Message dispatch seam
//!
//! Sending an invitation is delegated to a device or service capability
//! that can compose a text message. The lifecycle only needs two things
//! from it: whether sending is possible at all, and the outcome of a send.
//!
//! ```text
//! InvitationLifecycle
//!       |
//!       v
//! MessageDispatch (trait)
//!       |
//!       +---> platform SMS composer (outside this crate)
//!       |
//!       +---> ScriptedDispatcher (tests, demos)
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

mod message;
mod scripted;

pub use message::InvitationMessage;
pub use scripted::{ScriptedDispatcher, SentMessage};

/// Result reported by the messaging capability for one send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOutcome {
    /// The message left the device
    Sent,
    /// A send was attempted and failed
    Failed,
    /// The user dismissed the composer
    Cancelled,
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchOutcome::Sent => "sent",
            DispatchOutcome::Failed => "failed",
            DispatchOutcome::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Capability that delivers a text message to phone numbers
#[async_trait]
pub trait MessageDispatch: Send + Sync {
    /// Whether this device or service can send text messages at all
    async fn can_send(&self) -> bool;

    /// Present or perform a send and report its outcome
    ///
    /// Only called after `can_send` returned true.
    async fn send(&self, recipients: &[String], body: &str) -> DispatchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(DispatchOutcome::Sent.to_string(), "sent");
        assert_eq!(DispatchOutcome::Failed.to_string(), "failed");
        assert_eq!(DispatchOutcome::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&DispatchOutcome::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
