//! Entity descriptor for Company

use super::handlers::{
    CompanyAppState, create_company, delete_company, get_company, list_companies, update_company,
};
use crate::core::store::CompanyStore;
use crate::server::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Company entity
pub struct CompanyDescriptor {
    pub store: Arc<dyn CompanyStore>,
}

impl CompanyDescriptor {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self { store }
    }
}

impl EntityDescriptor for CompanyDescriptor {
    fn entity_type(&self) -> &str {
        "company"
    }

    fn plural(&self) -> &str {
        "companies"
    }

    fn build_routes(&self) -> Router {
        let state = CompanyAppState {
            store: self.store.clone(),
        };

        Router::new()
            .route("/companies", get(list_companies).post(create_company))
            .route(
                "/companies/{code}",
                get(get_company).put(update_company).delete(delete_company),
            )
            .with_state(state)
    }
}
