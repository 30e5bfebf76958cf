//! Company entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::CompanyDescriptor;
pub use handlers::*;
pub use model::{Company, CompanyChanges, CompanyDetail, CompanySummary, NewCompany};
