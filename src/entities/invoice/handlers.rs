//! Invoice HTTP handlers

use super::model::{InvoiceChanges, NewInvoice};
use crate::core::error::{BizTimeError, Result};
use crate::core::store::InvoiceStore;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Invoice-specific AppState
#[derive(Clone)]
pub struct InvoiceAppState {
    pub store: Arc<dyn InvoiceStore>,
}

/// Parse the `{id}` path segment.
///
/// A segment that is not an integer can never match a row, so it is
/// reported as not found rather than as a bad request.
fn parse_invoice_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| BizTimeError::not_found("invoice", raw))
}

/// `GET /invoices` → `{invoices: [{id, comp_code}, ...]}`
pub async fn list_invoices(State(state): State<InvoiceAppState>) -> Result<Json<Value>> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// `GET /invoices/{id}` → `{invoice: {id, amt, paid, add_date, paid_date, company}}`
pub async fn get_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_invoice_id(&id)?;
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| BizTimeError::not_found("invoice", id))?;

    Ok(Json(json!({ "invoice": invoice })))
}

/// `POST /invoices` → 201 `{invoice: {id, comp_code, amt, paid, add_date, paid_date}}`
pub async fn create_invoice(
    State(state): State<InvoiceAppState>,
    payload: std::result::Result<Json<NewInvoice>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(new_invoice) = payload?;
    let invoice = state.store.create_invoice(new_invoice).await?;

    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

/// `PUT /invoices/{id}` → `{invoice: {id, comp_code, amt, paid, add_date, paid_date}}`
pub async fn update_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<InvoiceChanges>, JsonRejection>,
) -> Result<Json<Value>> {
    let id = parse_invoice_id(&id)?;
    let Json(changes) = payload?;
    let invoice = state
        .store
        .update_invoice(id, changes)
        .await?
        .ok_or_else(|| BizTimeError::not_found("invoice", id))?;

    Ok(Json(json!({ "invoice": invoice })))
}

/// `DELETE /invoices/{id}` → `{status: "deleted"}`
pub async fn delete_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_invoice_id(&id)?;
    if !state.store.delete_invoice(id).await? {
        return Err(BizTimeError::not_found("invoice", id));
    }

    Ok(Json(json!({ "status": "deleted" })))
}
