//! Snapshot reconciliation: raw snapshot in, four-bucket classification out.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{EngineError, LOST_THRESHOLD_DAYS, Snapshot};
use crate::types::{Bucket, NominalCategory, Order, OrderNumber, RawOrder};

/// The derived four-bucket classification of a snapshot.
///
/// Buckets are only ever replaced wholesale (by [`reconcile`]) or shrunk by
/// one order (by [`apply_discard`]); nothing mutates them field-by-field.
/// The `now` the classification was computed against travels with it so the
/// view selector ages orders consistently within a view session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    ready_for_pickup: Vec<Order>,
    failed_delivery: Vec<Order>,
    returned: Vec<Order>,
    lost: Vec<Order>,
    reconciled_at: DateTime<Utc>,
}

impl Classification {
    /// Borrow the members of one bucket, in engine order.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[Order] {
        match bucket {
            Bucket::ReadyForPickup => &self.ready_for_pickup,
            Bucket::FailedDelivery => &self.failed_delivery,
            Bucket::Returned => &self.returned,
            Bucket::Lost => &self.lost,
        }
    }

    /// The reference time this classification was computed against.
    #[must_use]
    pub const fn reconciled_at(&self) -> DateTime<Utc> {
        self.reconciled_at
    }

    /// The bucket currently holding the given order, if any.
    #[must_use]
    pub fn bucket_of(&self, order_number: &OrderNumber) -> Option<Bucket> {
        [
            Bucket::ReadyForPickup,
            Bucket::FailedDelivery,
            Bucket::Returned,
            Bucket::Lost,
        ]
        .into_iter()
        .find(|b| self.bucket(*b).iter().any(|o| &o.order_number == order_number))
    }

    /// Total number of orders across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ready_for_pickup.len()
            + self.failed_delivery.len()
            + self.returned.len()
            + self.lost.len()
    }

    /// True when every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Age of an order in whole days, truncated toward the floor.
///
/// Used for display sorting and urgency only; the lost predicate compares
/// the exact elapsed duration so that one second past the threshold counts.
#[must_use]
pub fn age_in_days(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    now.signed_duration_since(date).num_days()
}

/// Whether an order placed at `date` has aged past the lost threshold.
fn is_lost(now: DateTime<Utc>, date: DateTime<Utc>) -> bool {
    now.signed_duration_since(date) > Duration::days(LOST_THRESHOLD_DAYS)
}

/// Validate one raw record into a domain order.
///
/// The snapshot grouping is authoritative for the category; a `category`
/// field on the record itself is ignored.
fn validate(raw: &RawOrder, category: NominalCategory) -> Result<Order, EngineError> {
    let order_number = raw
        .identity()
        .and_then(OrderNumber::new)
        .ok_or_else(|| EngineError::Validation {
            reason: format!("record in {category} is missing an order number"),
        })?;

    let date = raw.date.ok_or_else(|| EngineError::Validation {
        reason: format!("order {order_number} is missing a date"),
    })?;

    Ok(Order {
        order_number,
        date,
        subject: raw.subject.clone(),
        tracking_number: raw.tracking_number.clone(),
        category,
    })
}

/// Recompute the full classification from a raw snapshot.
///
/// Every order in the snapshot's Ready for Pickup list lands in exactly one
/// of `ReadyForPickup` or `Lost`, determined solely by its age against
/// `now`. Failed Delivery and Returned pass through unchanged into their
/// same-named buckets. An order number appearing under two nominal
/// categories is kept at its first occurrence in canonical category order
/// and dropped elsewhere, so no bucket ever duplicates another.
///
/// # Errors
///
/// `EngineError::Validation` if any record is missing its order number or
/// date; the whole call aborts and no partial classification is returned.
pub fn reconcile(snapshot: &Snapshot, now: DateTime<Utc>) -> Result<Classification, EngineError> {
    let mut seen: HashSet<OrderNumber> = HashSet::new();
    let mut ready_for_pickup = Vec::new();
    let mut failed_delivery = Vec::new();
    let mut returned = Vec::new();
    let mut lost = Vec::new();

    for category in NominalCategory::ALL {
        for raw in snapshot.category(category) {
            let order = validate(raw, category)?;
            if !seen.insert(order.order_number.clone()) {
                continue;
            }
            match category {
                NominalCategory::ReadyForPickup => {
                    if is_lost(now, order.date) {
                        lost.push(order);
                    } else {
                        ready_for_pickup.push(order);
                    }
                }
                NominalCategory::FailedDelivery => failed_delivery.push(order),
                NominalCategory::Returned => returned.push(order),
            }
        }
    }

    Ok(Classification {
        ready_for_pickup,
        failed_delivery,
        returned,
        lost,
        reconciled_at: now,
    })
}

/// Remove one order from whichever bucket holds it.
///
/// The returned classification keeps its original `reconciled_at`; a
/// discard is a removal, not a re-aging.
///
/// # Errors
///
/// `EngineError::NotFound` if the order is absent from all four buckets.
/// The input classification is left untouched either way.
pub fn apply_discard(
    classification: &Classification,
    order_number: &OrderNumber,
) -> Result<Classification, EngineError> {
    let Some(bucket) = classification.bucket_of(order_number) else {
        return Err(EngineError::NotFound(order_number.clone()));
    };

    let mut next = classification.clone();
    let list = match bucket {
        Bucket::ReadyForPickup => &mut next.ready_for_pickup,
        Bucket::FailedDelivery => &mut next.failed_delivery,
        Bucket::Returned => &mut next.returned,
        Bucket::Lost => &mut next.lost,
    };
    list.retain(|o| &o.order_number != order_number);

    Ok(next)
}
