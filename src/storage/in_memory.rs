//! In-memory implementation of the company and invoice stores
//!
//! Useful for testing and development. Both tables live behind one `RwLock`,
//! so every operation (including the two-step detail lookups) sees a
//! consistent snapshot. The relational rules of the PostgreSQL schema are
//! reproduced here: unique company code and name, invoice `comp_code` must
//! reference a company, and a company with invoices cannot be deleted.

use crate::core::error::{BizTimeError, Result, StorageError};
use crate::core::money::normalize_amount;
use crate::core::store::{CompanyStore, InvoiceStore};
use crate::entities::company::{Company, CompanyChanges, CompanyDetail, CompanySummary, NewCompany};
use crate::entities::invoice::{Invoice, InvoiceChanges, InvoiceDetail, InvoiceSummary, NewInvoice};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    next_invoice_id: i32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            companies: BTreeMap::new(),
            invoices: BTreeMap::new(),
            next_invoice_id: 1,
        }
    }
}

impl Tables {
    fn name_taken(&self, name: &str, except_code: Option<&str>) -> bool {
        self.companies
            .values()
            .any(|c| c.name == name && Some(c.code.as_str()) != except_code)
    }

    fn invoice_ids_for(&self, code: &str) -> Vec<i32> {
        // BTreeMap iteration is already ascending by id
        self.invoices
            .values()
            .filter(|inv| inv.comp_code == code)
            .map(|inv| inv.id)
            .collect()
    }
}

/// In-memory store implementing both [`CompanyStore`] and [`InvoiceStore`]
///
/// Cloning is cheap and every clone shares the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn list_companies(&self) -> Result<Vec<CompanySummary>> {
        let tables = self.read()?;

        let mut companies: Vec<CompanySummary> = tables
            .companies
            .values()
            .map(|c| CompanySummary {
                code: c.code.clone(),
                name: c.name.clone(),
            })
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

        Ok(companies)
    }

    async fn get_company(&self, code: &str) -> Result<Option<CompanyDetail>> {
        let tables = self.read()?;

        let Some(company) = tables.companies.get(code).cloned() else {
            return Ok(None);
        };
        let invoices = tables.invoice_ids_for(code);

        Ok(Some(CompanyDetail::new(company, invoices)))
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        let mut tables = self.write()?;

        if tables.companies.contains_key(&company.code) {
            return Err(BizTimeError::conflict(
                "company",
                format!("code '{}' already exists", company.code),
            ));
        }
        if tables.name_taken(&company.name, None) {
            return Err(BizTimeError::conflict(
                "company",
                format!("name '{}' already exists", company.name),
            ));
        }

        let company = Company::from(company);
        tables
            .companies
            .insert(company.code.clone(), company.clone());

        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Option<Company>> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(code) {
            return Ok(None);
        }
        if tables.name_taken(&changes.name, Some(code)) {
            return Err(BizTimeError::conflict(
                "company",
                format!("name '{}' already exists", changes.name),
            ));
        }

        let Some(company) = tables.companies.get_mut(code) else {
            return Ok(None);
        };
        company.name = changes.name;
        company.description = changes.description;

        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> Result<bool> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(code) {
            return Ok(false);
        }
        if tables.invoices.values().any(|inv| inv.comp_code == code) {
            return Err(BizTimeError::conflict(
                "company",
                format!("company '{}' still has invoices", code),
            ));
        }

        tables.companies.remove(code);
        Ok(true)
    }
}

#[async_trait]
impl InvoiceStore for InMemoryStore {
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>> {
        let tables = self.read()?;

        Ok(tables
            .invoices
            .values()
            .map(|inv| InvoiceSummary {
                id: inv.id,
                comp_code: inv.comp_code.clone(),
            })
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>> {
        let tables = self.read()?;

        let Some(invoice) = tables.invoices.get(&id).cloned() else {
            return Ok(None);
        };
        let company = tables
            .companies
            .get(&invoice.comp_code)
            .cloned()
            .ok_or_else(|| {
                BizTimeError::Internal(format!(
                    "invoice {} references missing company '{}'",
                    id, invoice.comp_code
                ))
            })?;

        Ok(Some(InvoiceDetail::new(invoice, company)))
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice> {
        let amt = normalize_amount(invoice.amt)?;
        let mut tables = self.write()?;

        if !tables.companies.contains_key(&invoice.comp_code) {
            return Err(BizTimeError::invalid_reference(
                "invoice",
                format!("company '{}' does not exist", invoice.comp_code),
            ));
        }

        let id = tables.next_invoice_id;
        tables.next_invoice_id += 1;

        let invoice = Invoice {
            id,
            comp_code: invoice.comp_code,
            amt,
            paid: false,
            add_date: Utc::now(),
            paid_date: None,
        };
        tables.invoices.insert(id, invoice.clone());

        Ok(invoice)
    }

    async fn update_invoice(&self, id: i32, changes: InvoiceChanges) -> Result<Option<Invoice>> {
        let amt = normalize_amount(changes.amt)?;
        let mut tables = self.write()?;

        Ok(tables.invoices.get_mut(&id).map(|invoice| {
            invoice.amt = amt;
            invoice.clone()
        }))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(tables.invoices.remove(&id).is_some())
    }
}
