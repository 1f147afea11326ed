//! Auto-parts store: inventory, sales and reporting
//!
//! A metadata-driven store for an auto-parts retailer: a registry describes
//! every entity table, a generic CRUD engine reads and writes them through
//! that registry, and a catalog of parameterised analytical reports runs
//! over the same database.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod crud;
pub mod reports;
pub mod store;
