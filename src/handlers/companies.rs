// handlers/companies.rs - /companies routes

use axum::extract::{Path, Query, State};
use serde_json::{json, Map, Value};

use super::query_fields;
use crate::database::models::Company;
use crate::filter::{build_filter_clause, build_update_clause, fields::COMPANY_FILTERS, fields::COMPANY_UPDATE};
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::schemas::NewCompany;
use crate::state::AppState;

/// POST /companies - admin only
pub async fn create(State(state): State<AppState>, ValidJson(body): ValidJson<NewCompany>) -> ApiResult<Value> {
    let company = Company::create(&state.pool, &body).await?;
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies?name=&minEmployees=&maxEmployees=
pub async fn list(State(state): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> ApiResult<Value> {
    let filter = build_filter_clause(&query_fields(params), &COMPANY_FILTERS)?;
    let companies = Company::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle - company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    ValidJson(patch): ValidJson<Map<String, Value>>,
) -> ApiResult<Value> {
    let set = build_update_clause(&patch, &COMPANY_UPDATE)?;
    let company = Company::update(&state.pool, &handle, &set).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
