//! Session checks applied in front of handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::AppState;
use crate::auth::SessionManager;
use crate::guard::{self, GuardDecision};

/// Run every page request through the navigation guard. Redirects become
/// `303 See Other`.
pub async fn navigation_guard(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let full_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let target = state.routes.resolve(&full_path);

    match guard::evaluate(state.auth.is_session_active(), &target) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(redirect) => {
            let location = redirect.location();
            tracing::debug!(from = %full_path, to = %location, "Navigation redirected");
            Redirect::to(&location).into_response()
        }
    }
}

/// Reject API requests made without an active session.
pub async fn require_session(
    State(auth): State<SessionManager>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.is_session_active() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Request without an active session");
        Err(StatusCode::UNAUTHORIZED)
    }
}
