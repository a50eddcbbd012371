//! Scripted MessageDispatch for tests and demos
//!
//! Replays a queue of outcomes instead of talking to a real messaging
//! capability, and records what it was asked to send.

use super::{DispatchOutcome, MessageDispatch};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A message the dispatcher was asked to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipients: Vec<String>,
    pub body: String,
}

/// Dispatcher whose outcomes are decided up front
pub struct ScriptedDispatcher {
    available: AtomicBool,
    outcomes: Mutex<VecDeque<DispatchOutcome>>,
    fallback: DispatchOutcome,
    sent: Mutex<Vec<SentMessage>>,
}

impl ScriptedDispatcher {
    /// Dispatcher that reports `fallback` once the script runs out
    pub fn new(fallback: DispatchOutcome) -> Self {
        Self {
            available: AtomicBool::new(true),
            outcomes: Mutex::new(VecDeque::new()),
            fallback,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Dispatcher that always reports `Sent`
    pub fn always_sent() -> Self {
        Self::new(DispatchOutcome::Sent)
    }

    /// Dispatcher on a device without a messaging capability
    pub fn unavailable() -> Self {
        let dispatcher = Self::always_sent();
        dispatcher.set_available(false);
        dispatcher
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Queue the outcome for the next send
    pub fn push_outcome(&self, outcome: DispatchOutcome) {
        locked(&self.outcomes).push_back(outcome);
    }

    /// Messages handed to `send`, oldest first
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        locked(&self.sent).clone()
    }
}

/// A panicking test thread must not wedge every later call
fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for ScriptedDispatcher {
    fn default() -> Self {
        Self::always_sent()
    }
}

#[async_trait]
impl MessageDispatch for ScriptedDispatcher {
    async fn can_send(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn send(&self, recipients: &[String], body: &str) -> DispatchOutcome {
        locked(&self.sent).push(SentMessage {
            recipients: recipients.to_vec(),
            body: body.to_string(),
        });
        locked(&self.outcomes).pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let dispatcher = ScriptedDispatcher::new(DispatchOutcome::Cancelled);
        dispatcher.push_outcome(DispatchOutcome::Failed);

        let to = vec!["5551234567".to_string()];
        assert_eq!(dispatcher.send(&to, "hi").await, DispatchOutcome::Failed);
        assert_eq!(dispatcher.send(&to, "hi").await, DispatchOutcome::Cancelled);
        assert_eq!(dispatcher.sent_messages().len(), 2);
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let dispatcher = std::sync::Arc::new(ScriptedDispatcher::always_sent());
        let holder = dispatcher.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.sent.lock().unwrap();
            panic!("test thread dies holding the lock");
        })
        .join();

        dispatcher.push_outcome(DispatchOutcome::Failed);
        assert!(dispatcher.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let dispatcher = ScriptedDispatcher::unavailable();
        assert!(!dispatcher.can_send().await);
        dispatcher.set_available(true);
        assert!(dispatcher.can_send().await);
    }
}
