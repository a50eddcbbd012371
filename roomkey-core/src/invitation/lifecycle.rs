//! Invitation lifecycle service
//!
//! Owns the rules for minting, dispatching and retiring invitation codes.
//! Everything persistent goes through the injected [`DocumentStore`]; every
//! text message goes through the injected [`MessageDispatch`].
//!
//! ```text
//! generate ──> store.set_if_absent(invitations/{code})
//! dispatch ──> dispatcher.send ──> mark_sent | mark_failed | (cancelled: no-op)
//! resend   ──> status=sending ──> dispatcher.send ──> sent | failed | restore
//! revoke   ──> store.remove(invitations/{code})
//! ```

use super::code::{CodeGenerator, InvitationCode, RandomCodes};
use super::error::{InvitationError, InvitationResult};
use super::pending::PendingInvitations;
use super::record::{InvitationRecord, InvitationStatus};
use crate::config::{Config, InvitationConfig};
use crate::dispatch::{DispatchOutcome, InvitationMessage, MessageDispatch};
use crate::metrics::{self, record_counter, StoreTimer};
use crate::store::{DocumentStore, StorePath};
use crate::types::{RoomId, UserId};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Invitation service bound to one store and one messaging capability
pub struct InvitationLifecycle<S, D> {
    store: Arc<S>,
    dispatcher: Arc<D>,
    codes: Arc<dyn CodeGenerator>,
    message: InvitationMessage,
    settings: InvitationConfig,
}

impl<S: DocumentStore, D: MessageDispatch> InvitationLifecycle<S, D> {
    /// Create a lifecycle with default configuration
    pub fn new(store: Arc<S>, dispatcher: Arc<D>) -> Self {
        Self::with_config(store, dispatcher, &Config::default())
    }

    pub fn with_config(store: Arc<S>, dispatcher: Arc<D>, config: &Config) -> Self {
        Self {
            store,
            dispatcher,
            codes: Arc::new(RandomCodes),
            message: InvitationMessage::from_config(&config.dispatch),
            settings: config.invitations.clone(),
        }
    }

    /// Replace the code source, e.g. with a fixed sequence in tests
    pub fn with_code_generator(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Text that `dispatch` hands to the messaging capability for `code`
    pub fn message_body(&self, code: &InvitationCode) -> String {
        self.message.body(code.as_str())
    }

    /// Mint a code and persist a `created` invitation under it
    pub async fn generate(
        &self,
        phone_number: &str,
        is_admin: bool,
        room_id: &RoomId,
        issuer: &UserId,
    ) -> InvitationResult<InvitationRecord> {
        if phone_number.trim().is_empty() {
            return Err(InvitationError::InvalidPhoneNumber);
        }

        let attempts = if self.settings.unique_codes {
            self.settings.max_code_attempts.max(1)
        } else {
            1
        };

        for attempt in 1..=attempts {
            let record = InvitationRecord::new(
                self.codes.next_code(),
                phone_number,
                is_admin,
                room_id.clone(),
                issuer.clone(),
                Utc::now(),
            );
            let path = StorePath::invitation(record.code.as_str())
                .map_err(InvitationError::StoreWriteFailed)?;
            let value = record.to_value().map_err(InvitationError::StoreWriteFailed)?;

            let written = {
                let _timer = StoreTimer::start("invitation.create");
                if self.settings.unique_codes {
                    self.store.set_if_absent(&path, value).await
                } else {
                    self.store.set(&path, value).await.map(|()| true)
                }
            }
            .map_err(|e| {
                warn!(room_id = %room_id, error = %e, "failed to persist invitation");
                InvitationError::StoreWriteFailed(e)
            })?;

            if written {
                info!(
                    code = %record.code,
                    room_id = %room_id,
                    created_by = %issuer,
                    is_admin,
                    "invitation created"
                );
                record_counter(metrics::INVITATIONS_GENERATED, 1);
                return Ok(record);
            }

            warn!(code = %record.code, attempt, "invitation code already taken, drawing again");
            record_counter(metrics::INVITATIONS_CODE_COLLISIONS, 1);
        }

        Err(InvitationError::CodeSpaceExhausted { attempts })
    }

    /// Send `record` as a text message and record the outcome
    ///
    /// `Cancelled` leaves the stored status untouched. A `Failed` outcome is
    /// written to the store and then reported as `DispatchOutcomeFailed`.
    pub async fn dispatch(&self, record: &InvitationRecord) -> InvitationResult<DispatchOutcome> {
        self.ensure_can_send().await?;
        let outcome = self.send(record).await;
        self.settle(&record.code, outcome, None).await
    }

    /// Set status to `sent`; a store failure is logged and swallowed
    pub async fn mark_sent(&self, code: &InvitationCode) {
        self.write_status_logged(code, InvitationStatus::Sent).await;
    }

    /// Set status to `failed`; a store failure is logged and swallowed
    pub async fn mark_failed(&self, code: &InvitationCode) {
        self.write_status_logged(code, InvitationStatus::Failed).await;
    }

    /// Read one invitation
    pub async fn get(&self, code: &InvitationCode) -> InvitationResult<Option<InvitationRecord>> {
        let path = StorePath::invitation(code.as_str()).map_err(InvitationError::StoreReadFailed)?;
        let snapshot = {
            let _timer = StoreTimer::start("invitation.read");
            self.store.read(&path).await.map_err(InvitationError::StoreReadFailed)?
        };

        match snapshot.into_value() {
            Some(value) => InvitationRecord::from_value(code.clone(), value)
                .map(Some)
                .map_err(InvitationError::StoreReadFailed),
            None => Ok(None),
        }
    }

    /// Every non-accepted invitation for `room_id`
    ///
    /// Expired invitations are still listed; expiry is only advisory here.
    pub async fn list_pending(&self, room_id: &RoomId) -> InvitationResult<PendingInvitations> {
        let snapshot = {
            let _timer = StoreTimer::start("invitation.list");
            self.store
                .read(&StorePath::invitations())
                .await
                .map_err(InvitationError::StoreReadFailed)?
        };

        let mut records = Vec::new();
        for (key, value) in snapshot.children() {
            let code = match InvitationCode::parse(key) {
                Ok(code) if code.as_str() == key => code,
                _ => {
                    warn!(key, "skipping invitation stored under a malformed code");
                    continue;
                }
            };
            match InvitationRecord::from_value(code, value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key, error = %e, "skipping malformed invitation record"),
            }
        }

        debug!(room_id = %room_id, total = records.len(), "loaded invitations");
        Ok(PendingInvitations::new(room_id.clone(), records))
    }

    /// Delete an invitation; deleting a missing code succeeds
    pub async fn revoke(&self, code: &InvitationCode) -> InvitationResult<()> {
        let path = StorePath::invitation(code.as_str()).map_err(InvitationError::StoreWriteFailed)?;
        {
            let _timer = StoreTimer::start("invitation.remove");
            self.store.remove(&path).await.map_err(InvitationError::StoreWriteFailed)?;
        }

        info!(code = %code, "invitation revoked");
        record_counter(metrics::INVITATIONS_REVOKED, 1);
        Ok(())
    }

    /// Send the stored invitation again
    ///
    /// The status moves to `sending` while the message is out and only
    /// becomes `sent` or `failed` on a confirmed outcome. A cancelled send
    /// restores whatever status the invitation had before. If that restore
    /// cannot be written the record stays `sending` (still pending and
    /// resendable) and the store error is returned.
    pub async fn resend(&self, code: &InvitationCode) -> InvitationResult<DispatchOutcome> {
        let record = self
            .get(code)
            .await?
            .ok_or_else(|| InvitationError::NotFound(code.clone()))?;

        if record.status == InvitationStatus::Accepted {
            return Err(InvitationError::AlreadyAccepted(code.clone()));
        }

        self.ensure_can_send().await?;

        let previous = record.status;
        if !self.set_status(code, InvitationStatus::Sending).await? {
            return Err(InvitationError::NotFound(code.clone()));
        }
        debug!(code = %code, previous = %previous, "resending invitation");

        let outcome = self.send(&record).await;
        self.settle(code, outcome, Some(previous)).await
    }

    async fn ensure_can_send(&self) -> InvitationResult<()> {
        if self.dispatcher.can_send().await {
            Ok(())
        } else {
            warn!("text messaging unavailable on this device");
            Err(InvitationError::DispatchUnavailable)
        }
    }

    async fn send(&self, record: &InvitationRecord) -> DispatchOutcome {
        let body = self.message_body(&record.code);
        let recipients = [record.phone_number.clone()];
        self.dispatcher.send(&recipients, &body).await
    }

    async fn settle(
        &self,
        code: &InvitationCode,
        outcome: DispatchOutcome,
        restore: Option<InvitationStatus>,
    ) -> InvitationResult<DispatchOutcome> {
        match outcome {
            DispatchOutcome::Sent => {
                self.mark_sent(code).await;
                info!(code = %code, "invitation sent");
                record_counter(metrics::INVITATIONS_DISPATCHED, 1);
                Ok(outcome)
            }
            DispatchOutcome::Failed => {
                self.mark_failed(code).await;
                warn!(code = %code, "invitation send failed");
                record_counter(metrics::INVITATIONS_DISPATCH_FAILED, 1);
                Err(InvitationError::DispatchOutcomeFailed { code: code.clone() })
            }
            DispatchOutcome::Cancelled => {
                info!(code = %code, "invitation send cancelled");
                record_counter(metrics::INVITATIONS_DISPATCH_CANCELLED, 1);
                if let Some(previous) = restore {
                    self.restore_status(code, previous).await?;
                }
                Ok(outcome)
            }
        }
    }

    /// Write the status of an existing invitation; `false` when it is gone
    async fn set_status(&self, code: &InvitationCode, status: InvitationStatus) -> InvitationResult<bool> {
        let record = StorePath::invitation(code.as_str()).map_err(InvitationError::StoreWriteFailed)?;
        let value = serde_json::to_value(status)
            .map_err(|e| InvitationError::StoreWriteFailed(e.into()))?;

        let _timer = StoreTimer::start("invitation.status");
        self.store
            .update_if_present(&record, "status", value)
            .await
            .map_err(InvitationError::StoreWriteFailed)
    }

    async fn write_status_logged(&self, code: &InvitationCode, status: InvitationStatus) {
        match self.set_status(code, status).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(code = %code, status = %status, "invitation no longer stored, status not written");
                record_counter(metrics::STATUS_WRITES_DROPPED, 1);
            }
            Err(e) => {
                warn!(code = %code, status = %status, error = %e, "dropping invitation status update");
                record_counter(metrics::STATUS_WRITES_DROPPED, 1);
            }
        }
    }

    async fn restore_status(&self, code: &InvitationCode, previous: InvitationStatus) -> InvitationResult<()> {
        match self.set_status(code, previous).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                debug!(code = %code, "invitation revoked during resend, nothing to restore");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, previous = %previous, error = %e, "invitation left in sending state");
                record_counter(metrics::STATUS_WRITES_DROPPED, 1);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ScriptedDispatcher;
    use crate::store::MemoryDocumentStore;
    use crate::test_utils::{FlakyStore, SequenceCodes};

    fn lifecycle() -> (
        Arc<MemoryDocumentStore>,
        Arc<ScriptedDispatcher>,
        InvitationLifecycle<MemoryDocumentStore, ScriptedDispatcher>,
    ) {
        let store = Arc::new(MemoryDocumentStore::new());
        let dispatcher = Arc::new(ScriptedDispatcher::always_sent());
        let lifecycle = InvitationLifecycle::new(store.clone(), dispatcher.clone());
        (store, dispatcher, lifecycle)
    }

    fn room() -> RoomId {
        RoomId::from("room1")
    }

    fn issuer() -> UserId {
        UserId::from("ISSUER-1")
    }

    fn code(raw: &str) -> InvitationCode {
        InvitationCode::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_generate_persists_created_record() {
        let (_, _, lifecycle) = lifecycle();

        let record = lifecycle.generate("5551234567", false, &room(), &issuer()).await.unwrap();
        assert_eq!(record.status, InvitationStatus::Created);
        assert_eq!(record.code.as_str().len(), 6);

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_phone() {
        let (store, _, lifecycle) = lifecycle();

        let result = lifecycle.generate("   ", true, &room(), &issuer()).await;
        assert!(matches!(result, Err(InvitationError::InvalidPhoneNumber)));
        assert_eq!(store.dump().await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_generate_redraws_on_collision() {
        let (_, _, lifecycle) = lifecycle();
        let lifecycle = lifecycle
            .with_code_generator(Arc::new(SequenceCodes::new(["AAAAAA", "AAAAAA", "BBBBBB"])));

        let first = lifecycle.generate("111", false, &room(), &issuer()).await.unwrap();
        let second = lifecycle.generate("222", false, &room(), &issuer()).await.unwrap();

        assert_eq!(first.code, code("AAAAAA"));
        assert_eq!(second.code, code("BBBBBB"));
        let kept = lifecycle.get(&code("AAAAAA")).await.unwrap().unwrap();
        assert_eq!(kept.phone_number, "111");
    }

    #[tokio::test]
    async fn test_generate_gives_up_after_max_attempts() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut config = Config::default();
        config.invitations.max_code_attempts = 3;
        let lifecycle = InvitationLifecycle::with_config(
            store,
            Arc::new(ScriptedDispatcher::always_sent()),
            &config,
        )
        .with_code_generator(Arc::new(SequenceCodes::new(["AAAAAA"])));

        lifecycle.generate("111", false, &room(), &issuer()).await.unwrap();
        let result = lifecycle.generate("222", false, &room(), &issuer()).await;
        assert!(matches!(result, Err(InvitationError::CodeSpaceExhausted { attempts: 3 })));
    }

    #[tokio::test]
    async fn test_overwrite_when_uniqueness_disabled() {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut config = Config::default();
        config.invitations.unique_codes = false;
        let lifecycle = InvitationLifecycle::with_config(
            store,
            Arc::new(ScriptedDispatcher::always_sent()),
            &config,
        )
        .with_code_generator(Arc::new(SequenceCodes::new(["AAAAAA"])));

        lifecycle.generate("111", false, &room(), &issuer()).await.unwrap();
        lifecycle.generate("222", false, &room(), &issuer()).await.unwrap();

        let stored = lifecycle.get(&code("AAAAAA")).await.unwrap().unwrap();
        assert_eq!(stored.phone_number, "222");
    }

    #[tokio::test]
    async fn test_generate_surfaces_store_failure() {
        let store = Arc::new(FlakyStore::new(MemoryDocumentStore::new()));
        store.fail_writes(true);
        let lifecycle =
            InvitationLifecycle::new(store.clone(), Arc::new(ScriptedDispatcher::always_sent()));

        let result = lifecycle.generate("111", false, &room(), &issuer()).await;
        assert!(matches!(result, Err(InvitationError::StoreWriteFailed(_))));

        store.fail_writes(false);
        assert!(lifecycle.list_pending(&room()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_sends_templated_message() {
        let (_, dispatcher, lifecycle) = lifecycle();
        let record = lifecycle.generate("5551234567", false, &room(), &issuer()).await.unwrap();

        let outcome = lifecycle.dispatch(&record).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Sent);

        let sent = dispatcher.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["5551234567".to_string()]);
        assert!(sent[0].body.ends_with(record.code.as_str()));

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Sent);
    }

    #[tokio::test]
    async fn test_dispatch_failed_marks_record() {
        let (_, dispatcher, lifecycle) = lifecycle();
        dispatcher.push_outcome(DispatchOutcome::Failed);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        let result = lifecycle.dispatch(&record).await;
        assert!(matches!(result, Err(InvitationError::DispatchOutcomeFailed { .. })));

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Failed);
    }

    #[tokio::test]
    async fn test_dispatch_cancelled_is_noop() {
        let (_, dispatcher, lifecycle) = lifecycle();
        dispatcher.push_outcome(DispatchOutcome::Cancelled);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        assert_eq!(lifecycle.dispatch(&record).await.unwrap(), DispatchOutcome::Cancelled);
        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Created);
    }

    #[tokio::test]
    async fn test_dispatch_unavailable_is_distinct() {
        let (_, dispatcher, lifecycle) = lifecycle();
        dispatcher.set_available(false);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        let result = lifecycle.dispatch(&record).await;
        assert!(matches!(result, Err(InvitationError::DispatchUnavailable)));
        assert!(dispatcher.sent_messages().is_empty());

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Created);
    }

    #[tokio::test]
    async fn test_mark_sent_swallows_store_failure() {
        let store = Arc::new(FlakyStore::new(MemoryDocumentStore::new()));
        let lifecycle =
            InvitationLifecycle::new(store.clone(), Arc::new(ScriptedDispatcher::always_sent()));
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        store.fail_writes(true);
        lifecycle.mark_sent(&record.code).await;
        store.fail_writes(false);

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Created);
    }

    #[tokio::test]
    async fn test_resend_failed_invitation() {
        let (_, dispatcher, lifecycle) = lifecycle();
        dispatcher.push_outcome(DispatchOutcome::Failed);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        let _ = lifecycle.dispatch(&record).await;

        assert_eq!(lifecycle.resend(&record.code).await.unwrap(), DispatchOutcome::Sent);
        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Sent);
        assert_eq!(dispatcher.sent_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_resend_cancelled_restores_previous_status() {
        let (_, dispatcher, lifecycle) = lifecycle();
        dispatcher.push_outcome(DispatchOutcome::Failed);
        dispatcher.push_outcome(DispatchOutcome::Cancelled);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        let _ = lifecycle.dispatch(&record).await;

        assert_eq!(lifecycle.resend(&record.code).await.unwrap(), DispatchOutcome::Cancelled);
        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Failed);
    }

    #[tokio::test]
    async fn test_dispatch_after_revoke_leaves_store_empty() {
        let (store, _, lifecycle) = lifecycle();
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        lifecycle.revoke(&record.code).await.unwrap();

        assert_eq!(lifecycle.dispatch(&record).await.unwrap(), DispatchOutcome::Sent);
        lifecycle.mark_failed(&record.code).await;

        assert_eq!(store.dump().await, serde_json::json!({}));
        assert!(lifecycle.get(&record.code).await.unwrap().is_none());
    }

    #[derive(Clone, Copy)]
    enum DuringSend {
        Nothing,
        BreakWrites,
        Revoke,
    }

    /// Dispatcher that reads the stored status while its message is out
    struct ObservingDispatcher {
        store: Arc<FlakyStore<MemoryDocumentStore>>,
        outcome: DispatchOutcome,
        during_send: DuringSend,
        seen: std::sync::Mutex<Vec<Option<serde_json::Value>>>,
    }

    #[async_trait::async_trait]
    impl MessageDispatch for ObservingDispatcher {
        async fn can_send(&self) -> bool {
            true
        }

        async fn send(&self, _recipients: &[String], body: &str) -> DispatchOutcome {
            let code = &body[body.len() - 6..];
            let status = self.store.read(&StorePath::invitation_status(code).unwrap()).await.unwrap();
            self.seen.lock().unwrap().push(status.into_value());

            match self.during_send {
                DuringSend::Nothing => {}
                DuringSend::BreakWrites => self.store.fail_writes(true),
                DuringSend::Revoke => {
                    self.store.remove(&StorePath::invitation(code).unwrap()).await.unwrap()
                }
            }
            self.outcome
        }
    }

    fn observed(
        outcome: DispatchOutcome,
        during_send: DuringSend,
    ) -> (
        Arc<FlakyStore<MemoryDocumentStore>>,
        Arc<ObservingDispatcher>,
        InvitationLifecycle<FlakyStore<MemoryDocumentStore>, ObservingDispatcher>,
    ) {
        let store = Arc::new(FlakyStore::new(MemoryDocumentStore::new()));
        let dispatcher = Arc::new(ObservingDispatcher {
            store: store.clone(),
            outcome,
            during_send,
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let lifecycle = InvitationLifecycle::new(store.clone(), dispatcher.clone());
        (store, dispatcher, lifecycle)
    }

    #[tokio::test]
    async fn test_resend_is_sending_while_message_is_out() {
        let (_, dispatcher, lifecycle) = observed(DispatchOutcome::Sent, DuringSend::Nothing);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        assert_eq!(lifecycle.resend(&record.code).await.unwrap(), DispatchOutcome::Sent);

        let seen = dispatcher.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![Some(serde_json::json!("sending"))]);
        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Sent);
    }

    #[tokio::test]
    async fn test_dispatch_does_not_write_sending() {
        let (_, dispatcher, lifecycle) = observed(DispatchOutcome::Sent, DuringSend::Nothing);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        lifecycle.dispatch(&record).await.unwrap();
        let seen = dispatcher.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![Some(serde_json::json!("created"))]);
    }

    #[tokio::test]
    async fn test_resend_restore_failure_leaves_sending() {
        let (store, _, lifecycle) = observed(DispatchOutcome::Cancelled, DuringSend::BreakWrites);
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        let result = lifecycle.resend(&record.code).await;
        assert!(matches!(result, Err(InvitationError::StoreWriteFailed(_))));

        store.fail_writes(false);
        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Sending);
        assert!(lifecycle.list_pending(&room()).await.unwrap().contains(&record.code));
    }

    #[tokio::test]
    async fn test_revoke_during_resend_stays_revoked() {
        for outcome in [DispatchOutcome::Sent, DispatchOutcome::Failed, DispatchOutcome::Cancelled] {
            let (store, _, lifecycle) = observed(outcome, DuringSend::Revoke);
            let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

            let _ = lifecycle.resend(&record.code).await;

            assert_eq!(store.inner().dump().await, serde_json::json!({}));
            assert!(lifecycle.get(&record.code).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_resend_unknown_code() {
        let (_, _, lifecycle) = lifecycle();
        let result = lifecycle.resend(&code("ZZZZZZ")).await;
        assert!(matches!(result, Err(InvitationError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resend_unavailable_leaves_status() {
        let (_, dispatcher, lifecycle) = lifecycle();
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        lifecycle.dispatch(&record).await.unwrap();

        dispatcher.set_available(false);
        let result = lifecycle.resend(&record.code).await;
        assert!(matches!(result, Err(InvitationError::DispatchUnavailable)));

        let stored = lifecycle.get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Sent);
    }

    #[tokio::test]
    async fn test_resend_accepted_is_rejected() {
        let (store, _, lifecycle) = lifecycle();
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        store
            .set(
                &StorePath::invitation_status(record.code.as_str()).unwrap(),
                serde_json::json!("accepted"),
            )
            .await
            .unwrap();

        let result = lifecycle.resend(&record.code).await;
        assert!(matches!(result, Err(InvitationError::AlreadyAccepted(_))));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (_, _, lifecycle) = lifecycle();
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();

        lifecycle.revoke(&record.code).await.unwrap();
        lifecycle.revoke(&record.code).await.unwrap();

        assert!(lifecycle.get(&record.code).await.unwrap().is_none());
        assert!(!lifecycle.list_pending(&room()).await.unwrap().contains(&record.code));
    }

    #[tokio::test]
    async fn test_list_pending_skips_malformed_records() {
        let (store, _, lifecycle) = lifecycle();
        let record = lifecycle.generate("555", false, &room(), &issuer()).await.unwrap();
        store
            .set(&StorePath::invitation("BROKEN").unwrap(), serde_json::json!({ "roomId": "room1" }))
            .await
            .unwrap();
        store
            .set(&StorePath::invitation("lower1").unwrap(), record.to_value().unwrap())
            .await
            .unwrap();

        let pending = lifecycle.list_pending(&room()).await.unwrap();
        let codes: Vec<_> = pending.iter().map(|r| r.code.clone()).collect();
        assert_eq!(codes, vec![record.code]);
    }

    #[tokio::test]
    async fn test_list_pending_read_failure() {
        let store = Arc::new(FlakyStore::new(MemoryDocumentStore::new()));
        store.fail_reads(true);
        let lifecycle = InvitationLifecycle::new(store, Arc::new(ScriptedDispatcher::always_sent()));

        let result = lifecycle.list_pending(&room()).await;
        assert!(matches!(result, Err(InvitationError::StoreReadFailed(_))));
    }
}
