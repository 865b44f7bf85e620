//! Shared types and models for the Drogaria São Paulo back-office
//!
//! This crate contains the domain model of the pharmacy back-office
//! (catalog, clients, stock ledger, sales) plus the validation rules
//! shared by every component that accepts user input.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
