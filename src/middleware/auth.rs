use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Identity;
use crate::state::AppState;

/// Verify a bearer credential if one is present and attach its identity to
/// the request.
///
/// Never rejects: a missing, malformed, forged or expired token leaves the
/// request unauthenticated and the guards downstream decide what that means.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.jwt.verify(token) {
            Ok(identity) => {
                tracing::debug!("Authenticated request as {}", identity.username);
                request.extensions_mut().insert(identity);
            }
            Err(e) => tracing::debug!("Ignoring unverifiable credential: {}", e),
        }
    }

    next.run(request).await
}

/// Identity attached by `authenticate`, if any.
pub fn current_identity(request: &Request) -> Option<&Identity> {
    request.extensions().get::<Identity>()
}

/// Extract the token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
