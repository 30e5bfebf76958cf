//! REST router assembly
//!
//! Merges the resource routes from the [`EntityRegistry`] with the health
//! routes and any custom routes, installs a JSON 404 fallback and wraps the
//! whole thing in the HTTP tracing and CORS layers.

use super::entity_registry::EntityRegistry;
use crate::core::error::BizTimeError;
use axum::{Json, Router, http::Uri, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn build_router(registry: &EntityRegistry, custom_routes: Vec<Router>) -> Router {
    let mut app = health_routes().merge(registry.build_routes());

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    app.fallback(route_not_found).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "biztime"
    }))
}

/// Unmatched paths get the same error envelope as a missing row
async fn route_not_found(uri: Uri) -> BizTimeError {
    BizTimeError::not_found("route", uri.path())
}
