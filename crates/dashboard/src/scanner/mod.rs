//! Mailbox-scanner backend client.
//!
//! The scanner is the source of truth for orders: it scans the user's
//! mailbox, groups what it finds by nominal category, and accepts
//! discard/mark-returned mutations. The dashboard never classifies on its
//! own authority - it feeds scanner snapshots through the core engine.
//!
//! [`OrderSource`] is the seam: route handlers and orchestration talk to
//! the trait, [`ScannerClient`] is the reqwest implementation, and the
//! integration tests substitute a mock.

mod client;

pub use client::ScannerClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parceldeck_core::{Email, OrderNumber, Snapshot};

/// Errors that can occur when talking to the scanner backend.
///
/// All of these are transport-class: user-retryable, never auto-retried.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (network, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The scanner answered with a non-success status code.
    #[error("scanner returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The scanner's response body did not parse.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The scanner reported a failure in an otherwise well-formed response.
    #[error("scanner rejected the request: {0}")]
    Rejected(String),
}

/// Response of the check-new-orders trigger: the scanner re-scans the
/// mailbox and returns both the delta and a fresh full snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrders {
    /// Orders not previously known to the scanner.
    #[serde(rename = "new_orders")]
    pub discovered: Snapshot,
    /// Fresh full snapshot, including the discovered orders.
    #[serde(rename = "all_orders")]
    pub all_orders: Snapshot,
}

/// The order-source collaborator contract.
///
/// Every call is scoped by the authenticated user's email. Failures
/// surface as retryable [`BackendError`]s; retry is always an explicit
/// user action, so backend outages stay visible.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Full snapshot of orders for the given session email.
    async fn fetch_all_orders(&self, email: &Email) -> Result<Snapshot, BackendError>;

    /// Trigger a mailbox re-scan; returns the discovered delta and a fresh
    /// full snapshot.
    async fn fetch_new_orders(&self, email: &Email) -> Result<NewOrders, BackendError>;

    /// Remove an order server-side.
    async fn discard_order(
        &self,
        order_number: &OrderNumber,
        email: &Email,
    ) -> Result<(), BackendError>;

    /// Mark an order returned server-side. The caller must follow up with
    /// a full refresh; no local state transition is assumed.
    async fn mark_returned(&self, order_number: &OrderNumber) -> Result<(), BackendError>;
}
