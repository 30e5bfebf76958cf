//! Entity descriptor for Invoice

use super::handlers::{
    InvoiceAppState, create_invoice, delete_invoice, get_invoice, list_invoices, update_invoice,
};
use crate::core::store::InvoiceStore;
use crate::server::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Invoice entity
pub struct InvoiceDescriptor {
    pub store: Arc<dyn InvoiceStore>,
}

impl InvoiceDescriptor {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }
}

impl EntityDescriptor for InvoiceDescriptor {
    fn entity_type(&self) -> &str {
        "invoice"
    }

    fn plural(&self) -> &str {
        "invoices"
    }

    fn build_routes(&self) -> Router {
        let state = InvoiceAppState {
            store: self.store.clone(),
        };

        Router::new()
            .route("/invoices", get(list_invoices).post(create_invoice))
            .route(
                "/invoices/{id}",
                get(get_invoice).put(update_invoice).delete(delete_invoice),
            )
            .with_state(state)
    }
}
