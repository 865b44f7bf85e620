//! Dashboard aggregator
//!
//! Read-only rollup over the other components. Holds no state of its own;
//! every figure is recomputed per call, and empty collaborators produce
//! zeros rather than errors.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;

use crate::error::AppResult;
use crate::services::alerts::AlertService;
use crate::store::{CatalogStore, ClientStore, ListFilter, SaleStore};

/// Aggregated figures for the back-office landing page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_medication_count: usize,
    pub registered_client_count: usize,
    /// Sales whose timestamp falls on today's local calendar day:
    /// an exact-day match, not a rolling 24h window
    pub sales_today: usize,
    pub active_alert_count: usize,
}

/// Dashboard aggregation service
#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<dyn CatalogStore>,
    clients: Arc<dyn ClientStore>,
    sales: Arc<dyn SaleStore>,
    alerts: AlertService,
}

impl DashboardService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        clients: Arc<dyn ClientStore>,
        sales: Arc<dyn SaleStore>,
        alerts: AlertService,
    ) -> Self {
        Self {
            catalog,
            clients,
            sales,
            alerts,
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let medications = self.catalog.list_medications(ListFilter::ActiveOnly).await?;
        let clients = self.clients.list_clients().await?;
        let sales = self.sales.list_sales().await?;
        let alerts = self.alerts.list_alerts().await?;

        let today = Local::now().date_naive();
        let sales_today = sales
            .iter()
            .filter(|s| s.sold_at.with_timezone(&Local).date_naive() == today)
            .count();

        Ok(DashboardStats {
            active_medication_count: medications.len(),
            registered_client_count: clients.len(),
            sales_today,
            active_alert_count: alerts.len(),
        })
    }
}
