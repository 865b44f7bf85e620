//! Business logic services for the pharmacy back-office

pub mod alerts;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod sales;
pub mod stock;

pub use alerts::AlertService;
pub use catalog::CatalogService;
pub use clients::ClientService;
pub use dashboard::DashboardService;
pub use sales::SalesService;
pub use stock::StockService;
