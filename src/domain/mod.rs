//! Core domain types and logic.

pub mod price;
pub mod config;
pub mod config_validation;
pub mod position;
pub mod ledger;
pub mod cycle;
pub mod execution;
pub mod engine;
pub mod summary;
pub mod sweep;
pub mod error;
