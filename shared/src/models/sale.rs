//! Sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed sale line
///
/// Name and unit price are copied out of the catalog at commit time, so
/// later edits to the medication never rewrite sales history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub medication_id: Uuid,
    pub medication_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl SaleItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A committed sale; immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub items: Vec<SaleItem>,
    pub total_amount: Decimal,
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    /// Sum of line subtotals. `total_amount` must always equal this;
    /// subtotals are summed exactly, never rounded individually.
    pub fn total_of(items: &[SaleItem]) -> Decimal {
        items.iter().map(SaleItem::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(name: &str, quantity: i32, unit_price: &str) -> SaleItem {
        SaleItem {
            medication_id: Uuid::new_v4(),
            medication_name: name.to_string(),
            quantity,
            unit_price: Decimal::from_str(unit_price).unwrap(),
        }
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(
            item("Dipirona 500mg", 3, "7.50").subtotal(),
            Decimal::from_str("22.50").unwrap()
        );
    }

    #[test]
    fn test_total_of_two_lines() {
        let items = vec![item("A", 2, "10.00"), item("B", 1, "5.00")];
        assert_eq!(Sale::total_of(&items), Decimal::from_str("25.00").unwrap());
    }

    #[test]
    fn test_total_of_empty() {
        assert_eq!(Sale::total_of(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_keeps_cents_exact() {
        // 3 x 0.10 must be exactly 0.30, not a float approximation
        let items = vec![item("A", 3, "0.10")];
        assert_eq!(Sale::total_of(&items), Decimal::from_str("0.30").unwrap());
    }
}
