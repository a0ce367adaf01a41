//! Integration tests for Parceldeck.
//!
//! The orchestration layer is exercised end to end against [`MockScanner`],
//! a scripted stand-in for the mailbox-scanner backend. No live backend or
//! network is required:
//!
//! ```bash
//! cargo test -p parceldeck-integration-tests
//! ```
//!
//! Responses are scripted per call, optionally delayed (to provoke
//! out-of-order completions) or failed (to exercise the keep-previous-state
//! guarantees).

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use parceldeck_core::{Email, OrderNumber, RawOrder, Snapshot};
use parceldeck_dashboard::scanner::{BackendError, NewOrders, OrderSource};

/// One scripted response.
pub enum Scripted<T> {
    /// Respond immediately.
    Ok(T),
    /// Sleep first, then respond. Used to make an earlier request finish
    /// after a later one.
    DelayedOk(Duration, T),
    /// Fail with a transport-class error.
    Fail,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, BackendError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::DelayedOk(delay, value) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            Self::Fail => Err(BackendError::Status { status: 503 }),
        }
    }
}

/// Scripted mock of the scanner backend.
///
/// Snapshot and re-scan responses are consumed in push order; mutations
/// succeed unless failures are queued with [`MockScanner::fail_next_mutation`].
/// Every call is recorded for assertion.
#[derive(Default)]
pub struct MockScanner {
    snapshots: Mutex<VecDeque<Scripted<Snapshot>>>,
    rescans: Mutex<VecDeque<Scripted<NewOrders>>>,
    mutation_failures: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl MockScanner {
    /// Create a mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full-snapshot response.
    pub fn push_snapshot(&self, snapshot: Snapshot) {
        self.push_snapshot_scripted(Scripted::Ok(snapshot));
    }

    /// Queue a full-snapshot response that sleeps before resolving.
    pub fn push_snapshot_delayed(&self, delay: Duration, snapshot: Snapshot) {
        self.push_snapshot_scripted(Scripted::DelayedOk(delay, snapshot));
    }

    /// Queue a failing full-snapshot response.
    pub fn push_snapshot_failure(&self) {
        self.push_snapshot_scripted(Scripted::Fail);
    }

    fn push_snapshot_scripted(&self, scripted: Scripted<Snapshot>) {
        self.snapshots
            .lock()
            .expect("snapshot queue poisoned")
            .push_back(scripted);
    }

    /// Queue a re-scan response.
    pub fn push_rescan(&self, rescan: NewOrders) {
        self.rescans
            .lock()
            .expect("rescan queue poisoned")
            .push_back(Scripted::Ok(rescan));
    }

    /// Make the next mutation call fail with a transport error.
    pub fn fail_next_mutation(&self) {
        self.mutation_failures.fetch_add(1, Ordering::SeqCst);
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(call.into());
    }

    fn take_mutation_result(&self) -> Result<(), BackendError> {
        let failed = self
            .mutation_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(BackendError::Status { status: 503 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrderSource for MockScanner {
    async fn fetch_all_orders(&self, email: &Email) -> Result<Snapshot, BackendError> {
        self.record(format!("fetch_all_orders:{email}"));
        let scripted = self
            .snapshots
            .lock()
            .expect("snapshot queue poisoned")
            .pop_front()
            .expect("no scripted snapshot left");
        scripted.resolve().await
    }

    async fn fetch_new_orders(&self, email: &Email) -> Result<NewOrders, BackendError> {
        self.record(format!("fetch_new_orders:{email}"));
        let scripted = self
            .rescans
            .lock()
            .expect("rescan queue poisoned")
            .pop_front()
            .expect("no scripted rescan left");
        scripted.resolve().await
    }

    async fn discard_order(
        &self,
        order_number: &OrderNumber,
        email: &Email,
    ) -> Result<(), BackendError> {
        self.record(format!("discard:{order_number}:{email}"));
        self.take_mutation_result()
    }

    async fn mark_returned(&self, order_number: &OrderNumber) -> Result<(), BackendError> {
        self.record(format!("mark_returned:{order_number}"));
        self.take_mutation_result()
    }
}

/// Build a raw order with the given identifier, placed `days_ago` days
/// before `now`.
#[must_use]
pub fn raw_order(order_number: &str, now: DateTime<Utc>, days_ago: i64) -> RawOrder {
    RawOrder {
        order_number: Some(order_number.to_owned()),
        date: Some(now - chrono::Duration::days(days_ago)),
        subject: format!("Your package {order_number} has arrived"),
        tracking_number: Some(format!("1Z-{order_number}")),
        category: None,
    }
}

/// The session email used throughout the tests.
#[must_use]
pub fn test_email() -> Email {
    Email::parse("operator@example.com").expect("valid test email")
}
