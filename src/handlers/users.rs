// handlers/users.rs - /users routes

use axum::extract::{Path, State};
use serde_json::{json, Map, Value};

use crate::auth::password::hash_password_blocking;
use crate::database::models::User;
use crate::error::ApiError;
use crate::filter::{build_update_clause, fields::USER_UPDATE};
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::schemas::{user::check_password, NewUser};
use crate::state::AppState;

/// POST /users - admin only; unlike registration this may create admins
pub async fn create(State(state): State<AppState>, ValidJson(body): ValidJson<NewUser>) -> ApiResult<Value> {
    let password_hash = hash_password_blocking(body.password.clone(), state.bcrypt_work_factor()).await?;
    let user = User::register(&state.pool, &body, &password_hash).await?;

    let token = state.jwt.sign(&user.username, user.is_admin)?;
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// GET /users - admin only
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let users = User::find_all(&state.pool).await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /users/:username - self or admin
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    let user = User::get(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PATCH /users/:username - self or admin
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidJson(mut patch): ValidJson<Map<String, Value>>,
) -> ApiResult<Value> {
    if let Some(password) = patch.get("password") {
        let password = password
            .as_str()
            .ok_or_else(|| ApiError::bad_request("Invalid value for password: expected a string"))?;
        check_password(password).map_err(|reason| ApiError::bad_request(format!("Invalid value for password: {}", reason)))?;

        let password_hash = hash_password_blocking(password.to_string(), state.bcrypt_work_factor()).await?;
        // Replacing in place keeps the key's position in the SET list.
        patch.insert("password".to_string(), Value::String(password_hash));
    }

    let set = build_update_clause(&patch, &USER_UPDATE)?;
    let user = User::update(&state.pool, &username, &set).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// DELETE /users/:username - self or admin
pub async fn remove(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    User::remove(&state.pool, &username).await?;
    Ok(ApiResponse::success(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id - self or admin
pub async fn apply(State(state): State<AppState>, Path((username, id)): Path<(String, i32)>) -> ApiResult<Value> {
    User::apply_to_job(&state.pool, &username, id).await?;
    Ok(ApiResponse::success(json!({ "applied": id })))
}
