//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::router::build_router;
use crate::core::store::{CompanyStore, InvoiceStore};
use crate::entities::{CompanyDescriptor, InvoiceDescriptor};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the biztime HTTP application
///
/// Stores are injected here and handed to each resource's handlers; nothing
/// reaches for a global connection.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    company_store: Option<Arc<dyn CompanyStore>>,
    invoice_store: Option<Arc<dyn InvoiceStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            company_store: None,
            invoice_store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use one backend for both tables
    pub fn with_store<S>(self, store: S) -> Self
    where
        S: CompanyStore + InvoiceStore + 'static,
    {
        let store = Arc::new(store);
        self.with_company_store(store.clone())
            .with_invoice_store(store)
    }

    /// Set the company store (required)
    pub fn with_company_store(mut self, store: Arc<dyn CompanyStore>) -> Self {
        self.company_store = Some(store);
        self
    }

    /// Set the invoice store (required)
    pub fn with_invoice_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.invoice_store = Some(store);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the entity registry from the configured stores
    pub fn build_registry(&self) -> Result<EntityRegistry> {
        let company_store = self
            .company_store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("CompanyStore is required. Call .with_store()"))?;
        let invoice_store = self
            .invoice_store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("InvoiceStore is required. Call .with_store()"))?;

        let mut registry = EntityRegistry::new();
        registry.register(Box::new(CompanyDescriptor::new(company_store)));
        registry.register(Box::new(InvoiceDescriptor::new(invoice_store)));
        Ok(registry)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let registry = self.build_registry()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);

        tracing::debug!(resources = ?registry.plurals(), "Routes registered");
        Ok(build_router(&registry, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr`, serves requests, and stops on SIGTERM or Ctrl+C.
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
