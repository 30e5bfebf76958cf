//! Core types shared by every resource: errors, store traits, money

pub mod error;
pub mod money;
pub mod store;

pub use error::{BizTimeError, ConfigError, StorageError};
pub use store::{CompanyStore, InvoiceStore};
