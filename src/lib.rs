//! # biztime
//!
//! A REST API over two related tables, companies and the invoices they owe.
//!
//! ## Features
//!
//! - **Company CRUD**: detail view lists the ids of the company's invoices
//! - **Invoice CRUD**: detail view nests the owning company
//! - **Injected stores**: in-memory by default, PostgreSQL with the `postgres` feature
//! - **Snapshot reads**: two-step detail lookups never mix two points in time
//! - **Typed errors**: not-found, conflict and bad-reference map to 404, 409 and 400
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{BizTimeError, ConfigError, ErrorResponse, StorageError},
        money::normalize_amount,
        store::{CompanyStore, InvoiceStore},
    };

    // === Entities ===
    pub use crate::entities::company::{
        Company, CompanyChanges, CompanyDescriptor, CompanyDetail, CompanySummary, NewCompany,
    };
    pub use crate::entities::invoice::{
        Invoice, InvoiceChanges, InvoiceDescriptor, InvoiceDetail, InvoiceSummary, NewInvoice,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{AppConfig, DatabaseConfig, LogConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}
