//! Company entity model

use serde::{Deserialize, Serialize};

/// A company row as stored in `companies`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// Projection used by the list endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// A company together with the ids of the invoices it owns, ascending
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: String,
    pub invoices: Vec<i32>,
}

impl CompanyDetail {
    pub fn new(company: Company, invoices: Vec<i32>) -> Self {
        Self {
            code: company.code,
            name: company.name,
            description: company.description,
            invoices,
        }
    }
}

/// Body of `POST /companies`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: String,
}

impl From<NewCompany> for Company {
    fn from(new: NewCompany) -> Self {
        Self {
            code: new.code,
            name: new.name,
            description: new.description,
        }
    }
}

/// Body of `PUT /companies/{code}`; the code itself never changes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyChanges {
    pub name: String,
    pub description: String,
}
