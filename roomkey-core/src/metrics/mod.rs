//! Metrics for invitation and membership operations
//!
//! Emitted through the `metrics` facade; installing a recorder/exporter is
//! left to the embedding application.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

pub const INVITATIONS_GENERATED: &str = "invitations.generated";
pub const INVITATIONS_DISPATCHED: &str = "invitations.dispatched";
pub const INVITATIONS_DISPATCH_FAILED: &str = "invitations.dispatch_failed";
pub const INVITATIONS_DISPATCH_CANCELLED: &str = "invitations.dispatch_cancelled";
pub const INVITATIONS_CODE_COLLISIONS: &str = "invitations.code_collisions";
pub const INVITATIONS_REVOKED: &str = "invitations.revoked";
pub const STATUS_WRITES_DROPPED: &str = "invitations.status_writes_dropped";
pub const MEMBERSHIP_ADMIN_CHANGES: &str = "membership.admin_changes";
pub const MEMBERSHIP_ACCESS_REVOKED: &str = "membership.access_revoked";
pub const STORE_OPERATION_DURATION: &str = "store.operation.duration_ms";

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(INVITATIONS_GENERATED, "Invitation codes minted and persisted");
    describe_counter!(INVITATIONS_DISPATCHED, "Invitations confirmed sent");
    describe_counter!(INVITATIONS_DISPATCH_FAILED, "Invitation sends reported failed");
    describe_counter!(INVITATIONS_DISPATCH_CANCELLED, "Invitation sends cancelled by the user");
    describe_counter!(INVITATIONS_CODE_COLLISIONS, "Drawn codes that already existed");
    describe_counter!(INVITATIONS_REVOKED, "Invitations deleted");
    describe_counter!(STATUS_WRITES_DROPPED, "Status updates lost to store failures");
    describe_counter!(MEMBERSHIP_ADMIN_CHANGES, "Admin flag updates");
    describe_counter!(MEMBERSHIP_ACCESS_REVOKED, "Room access removals");
    describe_histogram!(STORE_OPERATION_DURATION, "Store round-trip duration in milliseconds");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Measures a store round trip and records it on drop
pub struct StoreTimer {
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    pub fn start(operation: &'static str) -> Self {
        Self { operation, start: Instant::now() }
    }
}

impl Drop for StoreTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(STORE_OPERATION_DURATION, "operation" => self.operation).record(elapsed);
    }
}
