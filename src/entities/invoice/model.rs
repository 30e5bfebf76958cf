//! Invoice entity model

use crate::entities::company::Company;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An invoice row as stored in `invoices`
///
/// `amt` always carries two fractional digits and serializes as a string
/// (`"100.00"`). `paid` and `paid_date` keep their store defaults; no
/// endpoint changes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

/// Projection used by the list endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// An invoice with its owning company nested in place of `comp_code`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub company: Company,
}

impl InvoiceDetail {
    pub fn new(invoice: Invoice, company: Company) -> Self {
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

/// Body of `POST /invoices`; `amt` accepts a JSON number or a numeric string
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: Decimal,
}

/// Body of `PUT /invoices/{id}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceChanges {
    pub amt: Decimal,
}
