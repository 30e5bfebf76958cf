//! Resources exposed by the API
//!
//! Each resource follows the same layout: `model` (row and body types),
//! `handlers` (axum handlers over an injected store) and `descriptor`
//! (routes, registered with the [`EntityRegistry`](crate::server::EntityRegistry)).

pub mod company;
pub mod invoice;

pub use company::{Company, CompanyDescriptor};
pub use invoice::{Invoice, InvoiceDescriptor};
