//! Store traits for companies and invoices
//!
//! Handlers receive an `Arc<dyn CompanyStore>` / `Arc<dyn InvoiceStore>` at
//! construction time and never reach for a global connection. The framework
//! is agnostic to the backend: see [`crate::storage`] for the in-memory and
//! PostgreSQL implementations.
//!
//! Keyed mutations report "no such row" through their return value
//! (`Option`/`bool`) so handlers decide which resource name goes into the
//! `NotFound` error. Constraint violations come back as
//! [`BizTimeError::Conflict`](crate::core::error::BizTimeError::Conflict) or
//! [`BizTimeError::InvalidReference`](crate::core::error::BizTimeError::InvalidReference).

use crate::core::error::Result;
use crate::entities::company::{Company, CompanyChanges, CompanyDetail, CompanySummary, NewCompany};
use crate::entities::invoice::{Invoice, InvoiceChanges, InvoiceDetail, InvoiceSummary, NewInvoice};
use async_trait::async_trait;

/// Data access for the `companies` table
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// All companies ordered by name
    async fn list_companies(&self) -> Result<Vec<CompanySummary>>;

    /// Look up a company and the ids of its invoices
    ///
    /// Both reads observe the same snapshot, so the invoice list can never
    /// mention an invoice deleted between the two queries.
    async fn get_company(&self, code: &str) -> Result<Option<CompanyDetail>>;

    /// Insert a company and return the stored row
    async fn create_company(&self, company: NewCompany) -> Result<Company>;

    /// Change name and description; `None` when no row matched
    async fn update_company(&self, code: &str, changes: CompanyChanges)
    -> Result<Option<Company>>;

    /// Delete by code; `false` when no row matched
    async fn delete_company(&self, code: &str) -> Result<bool>;
}

/// Data access for the `invoices` table
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// All invoices ordered by id
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>>;

    /// Look up an invoice and its owning company in one snapshot
    async fn get_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>>;

    /// Insert an invoice; `paid`, `paid_date` and `add_date` take store defaults
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice>;

    /// Change the amount only; `None` when no row matched
    async fn update_invoice(&self, id: i32, changes: InvoiceChanges) -> Result<Option<Invoice>>;

    /// Delete by id; `false` when no row matched
    async fn delete_invoice(&self, id: i32) -> Result<bool>;
}
