//! View selection: classification in, display-ready order list out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Classification, age_in_days};
use crate::types::{Bucket, Order, OrderNumber, Urgency};

/// One row of the operator-facing order table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOrder {
    /// Unique identifier, stable across snapshots.
    pub order_number: OrderNumber,
    /// Timestamp the order was placed/detected.
    pub date: DateTime<Utc>,
    /// Status label shown to the operator: "Lost" for the lost bucket,
    /// otherwise the order's nominal category.
    pub status: String,
    /// Subject line of the source email.
    pub subject: String,
    /// Carrier tracking number, when one was extracted.
    pub tracking_number: Option<String>,
    /// Whole-day age at the moment of reconciliation.
    pub age_days: i64,
    /// Urgency indicator; `None` for the lost bucket, where ordering and
    /// urgency are immaterial to the operator.
    pub urgency: Option<Urgency>,
}

fn display_order(order: &Order, bucket: Bucket, reconciled_at: DateTime<Utc>) -> DisplayOrder {
    let age_days = age_in_days(reconciled_at, order.date);
    let (status, urgency) = if bucket == Bucket::Lost {
        (Bucket::Lost.label().to_owned(), None)
    } else {
        (
            order.category.wire_name().to_owned(),
            Some(Urgency::from_age_days(age_days)),
        )
    };

    DisplayOrder {
        order_number: order.order_number.clone(),
        date: order.date,
        status,
        subject: order.subject.clone(),
        tracking_number: order.tracking_number.clone(),
        age_days,
        urgency,
    }
}

/// Produce the ordered, display-ready list for one bucket.
///
/// Lost orders come back in engine order - they are already past the
/// urgency window. The other buckets are stable-sorted oldest first, with
/// ages evaluated against the classification's own `reconciled_at` (never
/// re-evaluated per render) so the ordering cannot flap within a view
/// session. Ties on whole-day age keep their relative engine order.
#[must_use]
pub fn select_view(classification: &Classification, bucket: Bucket) -> Vec<DisplayOrder> {
    let reconciled_at = classification.reconciled_at();
    let mut rows: Vec<DisplayOrder> = classification
        .bucket(bucket)
        .iter()
        .map(|order| display_order(order, bucket, reconciled_at))
        .collect();

    if bucket != Bucket::Lost {
        rows.sort_by(|a, b| b.age_days.cmp(&a.age_days));
    }

    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::engine::{Snapshot, reconcile};
    use crate::types::RawOrder;

    fn raw_at(order_number: &str, date: DateTime<Utc>) -> RawOrder {
        RawOrder {
            order_number: Some(order_number.to_owned()),
            date: Some(date),
            subject: format!("Package {order_number}"),
            tracking_number: None,
            category: None,
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-08-28T12:00:00Z".parse().unwrap()
    }

    fn numbers(rows: &[DisplayOrder]) -> Vec<&str> {
        rows.iter().map(|r| r.order_number.as_str()).collect()
    }

    #[test]
    fn test_sorts_oldest_first() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("six", now - Duration::days(6)),
                raw_at("two", now - Duration::days(2)),
                raw_at("four", now - Duration::days(4)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();

        let rows = select_view(&classification, Bucket::ReadyForPickup);
        assert_eq!(numbers(&rows), ["six", "four", "two"]);
    }

    #[test]
    fn test_equal_ages_keep_input_order() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("first", now - Duration::days(2)),
                raw_at("second", now - Duration::days(2) - Duration::hours(3)),
                raw_at("third", now - Duration::days(5)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();

        // first and second both truncate to age 2
        let rows = select_view(&classification, Bucket::ReadyForPickup);
        assert_eq!(numbers(&rows), ["third", "first", "second"]);
    }

    #[test]
    fn test_lost_bucket_unsorted_and_without_urgency() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("A", now - Duration::days(8)),
                raw_at("B", now - Duration::days(20)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();

        let rows = select_view(&classification, Bucket::Lost);
        // Engine order preserved, no re-sort by age.
        assert_eq!(numbers(&rows), ["A", "B"]);
        assert!(rows.iter().all(|r| r.urgency.is_none()));
        assert!(rows.iter().all(|r| r.status == "Lost"));
    }

    #[test]
    fn test_urgency_tracks_age() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("fresh", now - Duration::days(1)),
                raw_at("warning", now - Duration::days(4)),
                raw_at("critical", now - Duration::days(6)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();

        let rows = select_view(&classification, Bucket::ReadyForPickup);
        let urgency_of = |name: &str| {
            rows.iter()
                .find(|r| r.order_number.as_str() == name)
                .and_then(|r| r.urgency)
                .unwrap()
        };
        assert_eq!(urgency_of("fresh"), Urgency::Fresh);
        assert_eq!(urgency_of("warning"), Urgency::Warning);
        assert_eq!(urgency_of("critical"), Urgency::Critical);
    }

    #[test]
    fn test_scenario_three_day_order_is_fresh() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("A", now - Duration::days(3)),
                raw_at("B", now - Duration::days(8)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();

        let rows = select_view(&classification, Bucket::ReadyForPickup);
        assert_eq!(numbers(&rows), ["A"]);
        assert_eq!(rows[0].urgency, Some(Urgency::Fresh));

        let lost = select_view(&classification, Bucket::Lost);
        assert_eq!(numbers(&lost), ["B"]);
    }

    #[test]
    fn test_selection_never_mutates_classification() {
        let now = now();
        let snapshot = Snapshot {
            ready_for_pickup: vec![
                raw_at("six", now - Duration::days(6)),
                raw_at("two", now - Duration::days(2)),
            ],
            ..Snapshot::default()
        };
        let classification = reconcile(&snapshot, now).unwrap();
        let before = classification.clone();

        let _ = select_view(&classification, Bucket::ReadyForPickup);
        assert_eq!(classification, before);
    }
}
