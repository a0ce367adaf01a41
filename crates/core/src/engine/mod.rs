//! Order lifecycle engine.
//!
//! Takes a raw, scanner-supplied snapshot of orders and deterministically
//! assigns every order to exactly one of four lifecycle buckets, re-derives
//! "Lost" purely from elapsed time, sorts for display priority, and
//! reconciles incremental updates (new orders discovered, orders discarded)
//! without losing or duplicating state.
//!
//! Everything here is pure: given identical inputs, identical outputs.
//! Classification is never patched field-by-field - it is recomputed
//! wholesale from the latest snapshot, except for single-order removal on
//! discard.

mod reconcile;
mod snapshot;
mod view;

pub use reconcile::{Classification, age_in_days, apply_discard, reconcile};
pub use snapshot::{MergeOutcome, Snapshot};
pub use view::{DisplayOrder, select_view};

use thiserror::Error;

use crate::types::OrderNumber;

/// Number of days an order may sit in Ready for Pickup before it is
/// considered lost.
pub const LOST_THRESHOLD_DAYS: i64 = 7;

/// Errors produced by the lifecycle engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A scanner record is missing a required field. The whole reconcile
    /// call aborts; no partial classification is returned.
    #[error("invalid order record: {reason}")]
    Validation {
        /// What was wrong with the record.
        reason: String,
    },

    /// A mutation targeted an order absent from every bucket.
    #[error("order not found: {0}")]
    NotFound(OrderNumber),
}
