//! Category, bucket, and urgency enums.

use serde::{Deserialize, Serialize};

/// Nominal category of an order, as reported by the mailbox scanner.
///
/// This is the category *before* age-based reclassification; the engine may
/// move a `ReadyForPickup` order into the `Lost` bucket, but never changes
/// the nominal category itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NominalCategory {
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    #[serde(rename = "Failed Delivery")]
    FailedDelivery,
    #[serde(rename = "Returned")]
    Returned,
}

impl NominalCategory {
    /// Canonical iteration order for snapshot categories.
    ///
    /// Fixes the tie-break when the same order number shows up under two
    /// categories: the first category in this order wins.
    pub const ALL: [Self; 3] = [Self::ReadyForPickup, Self::FailedDelivery, Self::Returned];

    /// The wire name the scanner uses for this category.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::ReadyForPickup => "Ready for Pickup",
            Self::FailedDelivery => "Failed Delivery",
            Self::Returned => "Returned",
        }
    }
}

impl std::fmt::Display for NominalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Lifecycle bucket an order is classified into.
///
/// The first three mirror the nominal categories; `Lost` is derived purely
/// from elapsed time and never appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    ReadyForPickup,
    FailedDelivery,
    Returned,
    Lost,
}

impl Bucket {
    /// Human-readable label, matching the scanner's category names where
    /// one exists.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReadyForPickup => "Ready for Pickup",
            Self::FailedDelivery => "Failed Delivery",
            Self::Returned => "Returned",
            Self::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready_for_pickup" => Ok(Self::ReadyForPickup),
            "failed_delivery" => Ok(Self::FailedDelivery),
            "returned" => Ok(Self::Returned),
            "lost" => Ok(Self::Lost),
            _ => Err(format!("invalid bucket: {s}")),
        }
    }
}

/// Visual urgency of a pending order, a pure function of its age in whole
/// days at the moment of reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// 3 days old or less.
    Fresh,
    /// Older than 3 days, up to 5.
    Warning,
    /// Older than 5 days, up to 7.
    Critical,
    /// Older than 7 days. Should not occur outside `Lost`; defensive value.
    Stale,
}

impl Urgency {
    /// Map an age in whole days onto an urgency level.
    #[must_use]
    pub const fn from_age_days(age_days: i64) -> Self {
        if age_days > 7 {
            Self::Stale
        } else if age_days > 5 {
            Self::Critical
        } else if age_days > 3 {
            Self::Warning
        } else {
            Self::Fresh
        }
    }
}
