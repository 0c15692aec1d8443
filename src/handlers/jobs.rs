// handlers/jobs.rs - /jobs routes

use axum::extract::{Path, Query, State};
use serde_json::{json, Map, Value};

use super::query_fields;
use crate::database::models::Job;
use crate::filter::{build_filter_clause, build_update_clause, fields::JOB_FILTERS, fields::JOB_UPDATE};
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::schemas::NewJob;
use crate::state::AppState;

/// POST /jobs - admin only
pub async fn create(State(state): State<AppState>, ValidJson(body): ValidJson<NewJob>) -> ApiResult<Value> {
    let job = Job::create(&state.pool, &body).await?;
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn list(State(state): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> ApiResult<Value> {
    let filter = build_filter_clause(&query_fields(params), &JOB_FILTERS)?;
    let jobs = Job::find_all(&state.pool, &filter).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id - job with its company
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Value> {
    let job = Job::get(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PATCH /jobs/:id - admin only; a job cannot move between companies
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(patch): ValidJson<Map<String, Value>>,
) -> ApiResult<Value> {
    let set = build_update_clause(&patch, &JOB_UPDATE)?;
    let job = Job::update(&state.pool, id, &set).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Value> {
    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
