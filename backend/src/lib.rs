//! Drogaria São Paulo Back-Office Core Engine
//!
//! Inventory ledger and sales transaction engine for a pharmacy
//! back-office: catalog and client registries, the append-only stock
//! ledger, derived low-stock/expiry alerts, multi-line sale composition
//! and the dashboard rollup.
//!
//! Transport, authentication and durable persistence are external
//! collaborators: the embedding system talks to the services in
//! [`services`] and supplies [`store`] implementations with durable
//! backing (the bundled [`store::InMemoryStore`] is the in-process
//! reference).

pub mod audit;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

use std::sync::Arc;

use audit::{SharedAuditSink, TracingAuditSink};
use services::{
    AlertService, CatalogService, ClientService, DashboardService, SalesService, StockService,
};
use store::Stores;

/// The assembled engine: every service wired over one set of stores and
/// one audit sink
#[derive(Clone)]
pub struct Backoffice {
    pub catalog: CatalogService,
    pub clients: ClientService,
    pub stock: StockService,
    pub alerts: AlertService,
    pub sales: SalesService,
    pub dashboard: DashboardService,
}

impl Backoffice {
    pub fn new(stores: Stores, config: Config, audit: SharedAuditSink) -> Self {
        let catalog = CatalogService::new(
            stores.catalog.clone(),
            stores.categories.clone(),
            audit.clone(),
        );
        let clients = ClientService::new(stores.clients.clone(), audit.clone());
        let stock = StockService::new(
            stores.catalog.clone(),
            stores.movements.clone(),
            audit.clone(),
        );
        let alerts = AlertService::new(stores.catalog.clone(), config.alerts.clone());
        let sales = SalesService::new(
            stores.catalog.clone(),
            stores.clients.clone(),
            stores.sales.clone(),
            stock.clone(),
            config.sales.clone(),
            audit,
        );
        let dashboard = DashboardService::new(
            stores.catalog,
            stores.clients,
            stores.sales,
            alerts.clone(),
        );

        Self {
            catalog,
            clients,
            stock,
            alerts,
            sales,
            dashboard,
        }
    }

    /// Assemble the engine over the in-memory store with tracing audit
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            Stores::in_memory(),
            config,
            Arc::new(TracingAuditSink::default()),
        )
    }
}
