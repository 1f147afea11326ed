//! Core module - fundamental types and utilities

pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod value;

pub use config::Config;
pub use error::{Result, StoreError};
pub use project::{Project, ProjectError};
pub use value::{ColumnKind, Value};
