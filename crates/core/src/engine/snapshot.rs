//! Raw snapshots: orders grouped by nominal category, as the scanner
//! reports them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{NominalCategory, RawOrder};

/// A full point-in-time listing of orders grouped by nominal category.
///
/// An absent category on the wire is treated as an empty sequence, so all
/// three fields default. Unknown keys in the scanner payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Orders awaiting pickup.
    #[serde(rename = "Ready for Pickup", default)]
    pub ready_for_pickup: Vec<RawOrder>,
    /// Orders whose delivery attempt failed.
    #[serde(rename = "Failed Delivery", default)]
    pub failed_delivery: Vec<RawOrder>,
    /// Orders already sent back.
    #[serde(rename = "Returned", default)]
    pub returned: Vec<RawOrder>,
}

/// Result of merging a discovered delta into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Count of genuinely new orders across all nominal categories,
    /// computed from the discovered set only.
    pub new_orders: usize,
}

impl Snapshot {
    /// Borrow the order list for one nominal category.
    #[must_use]
    pub fn category(&self, category: NominalCategory) -> &[RawOrder] {
        match category {
            NominalCategory::ReadyForPickup => &self.ready_for_pickup,
            NominalCategory::FailedDelivery => &self.failed_delivery,
            NominalCategory::Returned => &self.returned,
        }
    }

    fn category_mut(&mut self, category: NominalCategory) -> &mut Vec<RawOrder> {
        match category {
            NominalCategory::ReadyForPickup => &mut self.ready_for_pickup,
            NominalCategory::FailedDelivery => &mut self.failed_delivery,
            NominalCategory::Returned => &mut self.returned,
        }
    }

    /// Total number of records across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        NominalCategory::ALL
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }

    /// True when no category holds any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every order identifier present in the snapshot.
    fn identities(&self) -> HashSet<String> {
        NominalCategory::ALL
            .iter()
            .flat_map(|c| self.category(*c).iter())
            .filter_map(|o| o.identity().map(str::to_owned))
            .collect()
    }

    /// Union a discovered delta into this snapshot, keyed by order number.
    ///
    /// Discovered orders whose identifier is already present anywhere in the
    /// snapshot are ignored as duplicates, never overwritten. Records
    /// lacking an identifier are carried through so the subsequent
    /// reconcile rejects them instead of silently dropping them.
    ///
    /// Returns the count of genuinely new orders, computed from the
    /// discovered set only.
    pub fn merge_discovered(&mut self, discovered: &Self) -> MergeOutcome {
        let mut seen = self.identities();
        let mut new_orders = 0;

        for category in NominalCategory::ALL {
            for order in discovered.category(category) {
                if let Some(id) = order.identity() {
                    if seen.contains(id) {
                        continue;
                    }
                    seen.insert(id.to_owned());
                }
                self.category_mut(category).push(order.clone());
                new_orders += 1;
            }
        }

        MergeOutcome { new_orders }
    }

    /// Remove the record with the given identifier from whichever category
    /// holds it. Returns whether anything was removed.
    pub fn remove(&mut self, order_number: &str) -> bool {
        for category in NominalCategory::ALL {
            let list = self.category_mut(category);
            let before = list.len();
            list.retain(|o| o.identity() != Some(order_number));
            if list.len() != before {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(order_number: &str) -> RawOrder {
        RawOrder {
            order_number: Some(order_number.to_owned()),
            date: Some("2026-08-20T10:00:00Z".parse().unwrap()),
            subject: format!("Package {order_number}"),
            tracking_number: None,
            category: None,
        }
    }

    #[test]
    fn test_absent_categories_deserialize_empty() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"Returned": []}"#).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_merge_adds_new_orders() {
        let mut current = Snapshot {
            ready_for_pickup: vec![raw("A")],
            ..Snapshot::default()
        };
        let discovered = Snapshot {
            ready_for_pickup: vec![raw("B")],
            returned: vec![raw("C")],
            ..Snapshot::default()
        };

        let outcome = current.merge_discovered(&discovered);
        assert_eq!(outcome.new_orders, 2);
        assert_eq!(current.ready_for_pickup.len(), 2);
        assert_eq!(current.returned.len(), 1);
    }

    #[test]
    fn test_merge_ignores_known_identifiers() {
        let mut current = Snapshot {
            ready_for_pickup: vec![raw("A")],
            ..Snapshot::default()
        };
        let kept = current.ready_for_pickup[0].clone();

        let mut rediscovered = raw("A");
        rediscovered.subject = "different subject".to_owned();
        let discovered = Snapshot {
            ready_for_pickup: vec![rediscovered],
            ..Snapshot::default()
        };

        let outcome = current.merge_discovered(&discovered);
        assert_eq!(outcome.new_orders, 0);
        // The current entry is untouched, not overwritten.
        assert_eq!(current.ready_for_pickup, vec![kept]);
    }

    #[test]
    fn test_merge_dedup_crosses_categories() {
        let mut current = Snapshot {
            failed_delivery: vec![raw("A")],
            ..Snapshot::default()
        };
        let discovered = Snapshot {
            ready_for_pickup: vec![raw("A")],
            ..Snapshot::default()
        };

        let outcome = current.merge_discovered(&discovered);
        assert_eq!(outcome.new_orders, 0);
        assert!(current.ready_for_pickup.is_empty());
    }

    #[test]
    fn test_merge_dedup_within_discovered_set() {
        let mut current = Snapshot::default();
        let discovered = Snapshot {
            ready_for_pickup: vec![raw("A"), raw("A")],
            ..Snapshot::default()
        };

        let outcome = current.merge_discovered(&discovered);
        assert_eq!(outcome.new_orders, 1);
        assert_eq!(current.ready_for_pickup.len(), 1);
    }

    #[test]
    fn test_remove_by_identifier() {
        let mut snapshot = Snapshot {
            ready_for_pickup: vec![raw("A")],
            returned: vec![raw("B")],
            ..Snapshot::default()
        };

        assert!(snapshot.remove("B"));
        assert!(snapshot.returned.is_empty());
        assert!(!snapshot.remove("B"));
        assert_eq!(snapshot.len(), 1);
    }
}
