//! Alert engine
//!
//! Stateless over the catalog: every query rescans the active medications
//! and derives the alert list from scratch. Nothing here is persisted.

use std::sync::Arc;

use chrono::Local;

use shared::models::{Alert, AlertKind, Medication};

use crate::config::AlertsConfig;
use crate::error::AppResult;
use crate::store::{CatalogStore, ListFilter};

/// Alert engine over the catalog
#[derive(Clone)]
pub struct AlertService {
    catalog: Arc<dyn CatalogStore>,
    config: AlertsConfig,
}

impl AlertService {
    pub fn new(catalog: Arc<dyn CatalogStore>, config: AlertsConfig) -> Self {
        Self { catalog, config }
    }

    /// Derive alerts with the configured thresholds
    pub async fn list_alerts(&self) -> AppResult<Vec<Alert>> {
        self.list_alerts_with(
            self.config.low_stock_threshold,
            self.config.expiry_window_days,
        )
        .await
    }

    /// Derive alerts with explicit thresholds
    ///
    /// A medication can emit one stock alert and one expiry alert; the two
    /// kinds are never deduplicated against each other. Expiry policy:
    /// days-until-expiry in `[0, window]` is `ExpirySoon`, a negative value
    /// is `Expired`. Already-expired items keep alerting.
    pub async fn list_alerts_with(
        &self,
        low_stock_threshold: i32,
        expiry_window_days: i64,
    ) -> AppResult<Vec<Alert>> {
        let today = Local::now().date_naive();
        let medications = self.catalog.list_medications(ListFilter::ActiveOnly).await?;

        let mut alerts = Vec::new();
        for medication in medications {
            if medication.stock_quantity > 0 && medication.stock_quantity <= low_stock_threshold {
                alerts.push(Alert {
                    kind: AlertKind::LowStock,
                    message: format!(
                        "Low stock: only {} units remaining.",
                        medication.stock_quantity
                    ),
                    message_pt: format!(
                        "Estoque baixo: apenas {} unidades restantes.",
                        medication.stock_quantity
                    ),
                    medication: medication.clone(),
                });
            }

            let days_until = (medication.expiry_date - today).num_days();
            if days_until < 0 {
                alerts.push(Alert {
                    kind: AlertKind::Expired,
                    message: format!("Expired {} days ago.", -days_until),
                    message_pt: format!("Vencido há {} dias.", -days_until),
                    medication,
                });
            } else if days_until <= expiry_window_days {
                alerts.push(Alert {
                    kind: AlertKind::ExpirySoon,
                    message: format!("Expires in {} days.", days_until),
                    message_pt: format!("Validade próxima: vence em {} dias.", days_until),
                    medication,
                });
            }
        }

        Ok(alerts)
    }

    /// Active medications at or below the low-stock threshold (and not out
    /// of stock entirely)
    pub async fn low_stock(&self) -> AppResult<Vec<Medication>> {
        let medications = self.catalog.list_medications(ListFilter::ActiveOnly).await?;
        Ok(medications
            .into_iter()
            .filter(|m| m.stock_quantity > 0 && m.stock_quantity <= self.config.low_stock_threshold)
            .collect())
    }

    /// Active medications whose expiry falls inside the window, today
    /// included; already-expired items are not in this list
    pub async fn expiring_soon(&self) -> AppResult<Vec<Medication>> {
        let today = Local::now().date_naive();
        let medications = self.catalog.list_medications(ListFilter::ActiveOnly).await?;
        Ok(medications
            .into_iter()
            .filter(|m| {
                let days_until = (m.expiry_date - today).num_days();
                (0..=self.config.expiry_window_days).contains(&days_until)
            })
            .collect())
    }
}
