//! Medication catalog models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medication in the pharmacy catalog
///
/// `stock_quantity` is only ever mutated through the stock ledger, which
/// guarantees it never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    /// Display dosage (e.g. "500mg"); may be empty
    pub dosage: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub expiry_date: NaiveDate,
    pub status: MedicationStatus,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }

    pub fn is_expired_on(&self, date: NaiveDate) -> bool {
        self.expiry_date < date
    }

    /// Name with the dosage appended when one is set
    pub fn display_name(&self) -> String {
        if self.dosage.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.dosage)
        }
    }
}

/// Lifecycle status of a catalog entry
///
/// `Removed` is a soft state: the record stays resolvable by id so that
/// historical sales and movements never dangle, but it no longer appears
/// in any listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MedicationStatus {
    Active,
    Inactive,
    Removed,
}

impl std::fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MedicationStatus::Active => write!(f, "active"),
            MedicationStatus::Inactive => write!(f, "inactive"),
            MedicationStatus::Removed => write!(f, "removed"),
        }
    }
}
