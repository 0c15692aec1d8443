// handlers/auth.rs - POST /auth/token and POST /auth/register

use axum::extract::State;
use serde_json::{json, Value};

use crate::auth::password::{hash_password_blocking, verify_login};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::schemas::{LoginRequest, NewUser, RegisterRequest};
use crate::state::AppState;

/// POST /auth/token - exchange username/password for a credential
pub async fn token(State(state): State<AppState>, ValidJson(body): ValidJson<LoginRequest>) -> ApiResult<Value> {
    let (user, stored) = match User::find_credentials(&state.pool, &body.username).await? {
        Some((user, hash)) => (Some(user), Some(hash)),
        None => (None, None),
    };
    let matches = verify_login(body.password, stored, state.bcrypt_work_factor()).await?;
    let user = user
        .filter(|_| matches)
        .ok_or_else(|| ApiError::unauthorized("Invalid username/password"))?;

    let token = state.jwt.sign(&user.username, user.is_admin)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /auth/register - create a non-admin account and return a credential
pub async fn register(State(state): State<AppState>, ValidJson(body): ValidJson<RegisterRequest>) -> ApiResult<Value> {
    let new_user = NewUser::from(body);
    let password_hash = hash_password_blocking(new_user.password.clone(), state.bcrypt_work_factor()).await?;
    let user = User::register(&state.pool, &new_user, &password_hash).await?;

    let token = state.jwt.sign(&user.username, user.is_admin)?;
    Ok(ApiResponse::created(json!({ "token": token })))
}
