//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresStore`], implementing both [`CompanyStore`] and
//! [`InvoiceStore`] over a shared `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE companies (
//!     code TEXT PRIMARY KEY,
//!     name TEXT NOT NULL UNIQUE,
//!     description TEXT NOT NULL DEFAULT ''
//! );
//!
//! CREATE TABLE invoices (
//!     id SERIAL PRIMARY KEY,
//!     comp_code TEXT NOT NULL REFERENCES companies (code),
//!     amt NUMERIC(10,2) NOT NULL,
//!     paid BOOLEAN NOT NULL DEFAULT false,
//!     add_date TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     paid_date TIMESTAMPTZ
//! );
//! ```
//!
//! Detail lookups run their two queries inside a `REPEATABLE READ, READ ONLY`
//! transaction so both see the same snapshot.

use crate::config::DatabaseConfig;
use crate::core::error::{BizTimeError, Result, StorageError};
use crate::core::money::normalize_amount;
use crate::core::store::{CompanyStore, InvoiceStore};
use crate::entities::company::{Company, CompanyChanges, CompanyDetail, CompanySummary, NewCompany};
use crate::entities::invoice::{Invoice, InvoiceChanges, InvoiceDetail, InvoiceSummary, NewInvoice};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

const BACKEND: &str = "PostgreSQL";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Create the `companies` and `invoices` tables if they are missing.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error(&e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies (code),
            amt NUMERIC(10,2) NOT NULL,
            paid BOOLEAN NOT NULL DEFAULT false,
            add_date TIMESTAMPTZ NOT NULL DEFAULT now(),
            paid_date TIMESTAMPTZ
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error(&e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_comp_code ON invoices (comp_code)")
        .execute(pool)
        .await
        .map_err(|e| query_error(&e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Which side of the `invoices.comp_code` foreign key a statement touches
#[derive(Clone, Copy, Debug)]
enum ForeignKeySide {
    /// Inserting a child row that points at a missing parent
    Referencing,
    /// Deleting a parent row that children still point at
    Referenced,
}

fn query_error(err: &sqlx::Error) -> BizTimeError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: err.to_string(),
            }
            .into()
        }
        _ => StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: err.to_string(),
        }
        .into(),
    }
}

/// Map a failed write into the typed taxonomy.
///
/// Unique violations become `Conflict`; foreign key violations become
/// `InvalidReference` or `Conflict` depending on `side`; a numeric overflow
/// (SQLSTATE 22003) is a bad body. Anything else is a storage error.
fn write_error(
    resource: &'static str,
    side: ForeignKeySide,
) -> impl Fn(sqlx::Error) -> BizTimeError {
    move |err| {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return BizTimeError::conflict(resource, db.message());
            }
            if db.is_foreign_key_violation() {
                return match side {
                    ForeignKeySide::Referencing => {
                        BizTimeError::invalid_reference(resource, db.message())
                    }
                    ForeignKeySide::Referenced => BizTimeError::conflict(resource, db.message()),
                };
            }
            if db.code().as_deref() == Some("22003") {
                return BizTimeError::InvalidBody {
                    message: db.message().to_string(),
                };
            }
        }
        query_error(&err)
    }
}

fn transaction_error(err: sqlx::Error) -> BizTimeError {
    StorageError::TransactionError {
        message: err.to_string(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Company and invoice storage backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use biztime::storage::PostgresStore;
///
/// let store = PostgresStore::connect(&config.database).await?;
/// let companies = store.list_companies().await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: "no database url configured".to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        ensure_schema(&pool).await?;
        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a read-only snapshot for two-step lookups
    async fn snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(transaction_error)?;
        Ok(tx)
    }
}

#[async_trait]
impl CompanyStore for PostgresStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>> {
        sqlx::query_as::<_, CompanySummary>("SELECT code, name FROM companies ORDER BY name, code")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error(&e))
    }

    async fn get_company(&self, code: &str) -> Result<Option<CompanyDetail>> {
        let mut tx = self.snapshot().await?;

        let company = sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_error(&e))?;

        let Some(company) = company else {
            tx.rollback().await.map_err(transaction_error)?;
            return Ok(None);
        };

        let invoices: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM invoices WHERE comp_code = $1 ORDER BY id")
                .bind(code)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| query_error(&e))?;

        tx.commit().await.map_err(transaction_error)?;
        Ok(Some(CompanyDetail::new(company, invoices)))
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        let created = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description)
             VALUES ($1, $2, $3)
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error("company", ForeignKeySide::Referenced))?;

        tracing::debug!(code = %created.code, "company created");
        Ok(created)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies
             SET name = $1, description = $2
             WHERE code = $3
             RETURNING code, name, description",
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error("company", ForeignKeySide::Referenced))
    }

    async fn delete_company(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(write_error("company", ForeignKeySide::Referenced))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InvoiceStore for PostgresStore {
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>> {
        sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error(&e))
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>> {
        let mut tx = self.snapshot().await?;

        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, comp_code, amt, paid, add_date, paid_date
             FROM invoices
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_error(&e))?;

        let Some(invoice) = invoice else {
            tx.rollback().await.map_err(transaction_error)?;
            return Ok(None);
        };

        let company = sqlx::query_as::<_, Company>(
            "SELECT c.code, c.name, c.description
             FROM invoices AS i
             JOIN companies AS c ON i.comp_code = c.code
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_error(&e))?
        .ok_or_else(|| {
            BizTimeError::Internal(format!(
                "invoice {} references missing company '{}'",
                id, invoice.comp_code
            ))
        })?;

        tx.commit().await.map_err(transaction_error)?;
        Ok(Some(InvoiceDetail::new(invoice, company)))
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice> {
        let amt = normalize_amount(invoice.amt)?;

        let created = sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (comp_code, amt)
             VALUES ($1, $2)
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(&invoice.comp_code)
        .bind(amt)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error("invoice", ForeignKeySide::Referencing))?;

        tracing::debug!(id = created.id, comp_code = %created.comp_code, "invoice created");
        Ok(created)
    }

    async fn update_invoice(&self, id: i32, changes: InvoiceChanges) -> Result<Option<Invoice>> {
        let amt = normalize_amount(changes.amt)?;

        sqlx::query_as::<_, Invoice>(
            "UPDATE invoices
             SET amt = $1
             WHERE id = $2
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(amt)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error("invoice", ForeignKeySide::Referencing))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error(&e))?;

        Ok(result.rows_affected() > 0)
    }
}
