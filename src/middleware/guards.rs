//! Authorization guards.
//!
//! Each guard is a `from_fn` stage: it either hands the request to `next`
//! or returns `Unauthorized`, in which case nothing downstream runs. The
//! decisions themselves live in the `ensure_*` predicates so they can be
//! checked without a request.

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

use super::auth::current_identity;
use crate::auth::Identity;
use crate::error::ApiError;

/// Path parameter naming the user a route acts on.
pub const USERNAME_PARAM: &str = "username";

fn denied(reason: &str) -> ApiError {
    tracing::warn!("Request denied: {}", reason);
    ApiError::unauthorized("Unauthorized")
}

pub fn ensure_logged_in(identity: Option<&Identity>) -> Result<&Identity, ApiError> {
    identity.ok_or_else(|| denied("not logged in"))
}

pub fn ensure_admin(identity: Option<&Identity>) -> Result<&Identity, ApiError> {
    let identity = ensure_logged_in(identity)?;
    if identity.is_admin {
        Ok(identity)
    } else {
        Err(denied("admin required"))
    }
}

/// Admins may act on any user; everyone else only on themselves.
pub fn ensure_self_or_admin<'a>(identity: Option<&'a Identity>, username: &str) -> Result<&'a Identity, ApiError> {
    let identity = ensure_logged_in(identity)?;
    if identity.is_admin || identity.username == username {
        Ok(identity)
    } else {
        Err(denied("not the target user or an admin"))
    }
}

pub async fn require_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    ensure_logged_in(current_identity(&request))?;
    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    ensure_admin(current_identity(&request))?;
    Ok(next.run(request).await)
}

pub async fn require_self_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A route without the parameter can only be passed by an admin.
    let username = params.get(USERNAME_PARAM).map(String::as_str).unwrap_or_default();
    ensure_self_or_admin(current_identity(&request), username)?;
    Ok(next.run(request).await)
}
