//! Order records: the raw wire form and the validated domain form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NominalCategory;

/// Opaque unique identifier for an order, stable across snapshots.
///
/// Used as the identity key: no two live orders share one within the
/// authoritative state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wrap a raw order number string.
    ///
    /// Returns `None` for an empty string - the scanner must always supply
    /// an identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if s.is_empty() { None } else { Some(Self(s)) }
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An order record as the scanner reports it, before validation.
///
/// Lenient on purpose: the scanner parses free-form emails, so any field can
/// be missing on the wire. The engine rejects records missing `order_number`
/// or `date` rather than silently dropping them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOrder {
    /// Unique identifier, if the scanner found one.
    #[serde(default)]
    pub order_number: Option<String>,
    /// Timestamp the order was placed/detected.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Subject line of the source email.
    #[serde(default)]
    pub subject: String,
    /// Carrier tracking number, when one was extracted.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Nominal category reported by the scanner.
    #[serde(default)]
    pub category: Option<NominalCategory>,
}

impl RawOrder {
    /// The identity key of this record, if it has one.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.order_number.as_deref().filter(|s| !s.is_empty())
    }
}

/// A validated order record.
///
/// `order_number` and `date` are guaranteed present; `date` is immutable
/// once observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier, stable across snapshots.
    pub order_number: OrderNumber,
    /// Timestamp the order was placed/detected.
    pub date: DateTime<Utc>,
    /// Subject line of the source email.
    pub subject: String,
    /// Carrier tracking number, when one was extracted.
    pub tracking_number: Option<String>,
    /// Nominal category at ingestion.
    pub category: NominalCategory,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_rejects_empty() {
        assert!(OrderNumber::new("").is_none());
        assert_eq!(OrderNumber::new("PKG-1").unwrap().as_str(), "PKG-1");
    }

    #[test]
    fn test_raw_order_tolerates_missing_fields() {
        let raw: RawOrder = serde_json::from_str(r#"{"subject": "Your package"}"#).unwrap();
        assert!(raw.order_number.is_none());
        assert!(raw.date.is_none());
        assert!(raw.identity().is_none());
        assert_eq!(raw.subject, "Your package");
    }

    #[test]
    fn test_raw_order_identity_ignores_empty_string() {
        let raw: RawOrder = serde_json::from_str(r#"{"order_number": ""}"#).unwrap();
        assert!(raw.identity().is_none());
    }

    #[test]
    fn test_raw_order_full_record() {
        let raw: RawOrder = serde_json::from_str(
            r#"{
                "order_number": "PKG-42",
                "date": "2026-08-20T10:00:00Z",
                "subject": "Ready for pickup",
                "tracking_number": "1Z999",
                "category": "Ready for Pickup"
            }"#,
        )
        .unwrap();
        assert_eq!(raw.identity(), Some("PKG-42"));
        assert_eq!(raw.category, Some(NominalCategory::ReadyForPickup));
    }
}
