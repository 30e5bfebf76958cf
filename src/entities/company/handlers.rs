//! Company HTTP handlers

use super::model::{CompanyChanges, NewCompany};
use crate::core::error::{BizTimeError, Result};
use crate::core::store::CompanyStore;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Company-specific AppState
#[derive(Clone)]
pub struct CompanyAppState {
    pub store: Arc<dyn CompanyStore>,
}

/// `GET /companies` → `{companies: [{code, name}, ...]}`
pub async fn list_companies(State(state): State<CompanyAppState>) -> Result<Json<Value>> {
    let companies = state.store.list_companies().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// `GET /companies/{code}` → `{company: {code, name, description, invoices}}`
pub async fn get_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| BizTimeError::not_found("company", &code))?;

    Ok(Json(json!({ "company": company })))
}

/// `POST /companies` → 201 `{company: {code, name, description}}`
pub async fn create_company(
    State(state): State<CompanyAppState>,
    payload: std::result::Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(new_company) = payload?;
    let company = state.store.create_company(new_company).await?;

    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// `PUT /companies/{code}` → `{company: {code, name, description}}`
pub async fn update_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
    payload: std::result::Result<Json<CompanyChanges>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(changes) = payload?;
    let company = state
        .store
        .update_company(&code, changes)
        .await?
        .ok_or_else(|| BizTimeError::not_found("company", &code))?;

    Ok(Json(json!({ "company": company })))
}

/// `DELETE /companies/{code}` → `{status: "deleted"}`
pub async fn delete_company(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>> {
    if !state.store.delete_company(&code).await? {
        return Err(BizTimeError::not_found("company", &code));
    }

    Ok(Json(json!({ "status": "deleted" })))
}
