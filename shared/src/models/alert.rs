//! Derived alert models

use serde::{Deserialize, Serialize};

use super::Medication;

/// Kind of derived catalog alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    /// Expiry date falls within the configured window (today included)
    ExpirySoon,
    /// Expiry date has already passed
    Expired,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::LowStock => write!(f, "low_stock"),
            AlertKind::ExpirySoon => write!(f, "expiry_soon"),
            AlertKind::Expired => write!(f, "expired"),
        }
    }
}

/// A transient alert, recomputed from the catalog on every query
///
/// Alerts are never stored; the medication is a snapshot taken at
/// derivation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub medication: Medication,
    pub kind: AlertKind,
    pub message: String,
    pub message_pt: String,
}
