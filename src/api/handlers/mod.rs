use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::auth::{AuthError, SessionManager};
use crate::guard::{self, GuardDecision, NavigationTarget};
use crate::models::*;
use crate::tickets::TicketStore;

// ============================================================
// Error Handling
// ============================================================

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub enum ApiError {
    Auth(AuthError),
    NotFound(&'static str),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::Auth(e) => {
                let status = match e {
                    AuthError::AccountNotFound => StatusCode::NOT_FOUND,
                    AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    AuthError::EmailTaken => StatusCode::CONFLICT,
                };
                (status, e.kind(), e.to_string())
            }
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{what} not found"),
            ),
        };
        let body = ErrorBody {
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Session
// ============================================================

pub async fn login(
    State(auth): State<SessionManager>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AccountSummary>, ApiError> {
    let account = auth.login(&input.email, &input.password).await?;
    Ok(Json(account.summary()))
}

pub async fn signup(
    State(auth): State<SessionManager>,
    Json(input): Json<SignupInput>,
) -> Result<(StatusCode, Json<AccountSummary>), ApiError> {
    let account = auth
        .signup(&input.name, &input.email, &input.password)
        .await?;
    Ok((StatusCode::CREATED, Json(account.summary())))
}

pub async fn logout(State(auth): State<SessionManager>) -> StatusCode {
    auth.logout();
    StatusCode::NO_CONTENT
}

pub async fn session(State(auth): State<SessionManager>) -> Json<SessionView> {
    let user = auth.current_user();
    Json(SessionView {
        session_active: user.as_ref().is_some_and(|u| u.session_active),
        user: user.map(|u| u.summary()),
    })
}

pub async fn list_accounts(State(auth): State<SessionManager>) -> Json<Vec<AccountSummary>> {
    Json(auth.accounts().iter().map(Account::summary).collect())
}

// ============================================================
// Navigation
// ============================================================

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub path: String,
}

/// Guard verdict for a prospective navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub target: NavigationTarget,
    pub decision: GuardDecision,
    /// Where the client ends up, `None` when the navigation is allowed as is.
    pub location: Option<String>,
}

pub async fn navigate(
    State(state): State<AppState>,
    Query(query): Query<NavigateQuery>,
) -> Json<NavigationResponse> {
    let target = state.routes.resolve(&query.path);
    let decision = guard::evaluate(state.auth.is_session_active(), &target);
    let location = match &decision {
        GuardDecision::Allow => None,
        GuardDecision::Redirect(redirect) => Some(redirect.location()),
    };
    Json(NavigationResponse {
        target,
        decision,
        location,
    })
}

/// Descriptor of a page the guard let through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub route: Option<String>,
    pub path: String,
}

pub async fn page(State(state): State<AppState>, uri: Uri) -> Json<PageView> {
    let full_path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = state.routes.resolve(full_path);
    Json(PageView {
        route: target.name,
        path: target.full_path,
    })
}

// ============================================================
// Tickets
// ============================================================

pub async fn list_tickets(State(tickets): State<TicketStore>) -> Json<Vec<Ticket>> {
    Json(tickets.list())
}

pub async fn get_ticket(
    State(tickets): State<TicketStore>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    tickets
        .get(&id)
        .map(Json)
        .ok_or(ApiError::NotFound("Ticket"))
}

pub async fn create_ticket(
    State(tickets): State<TicketStore>,
    Json(input): Json<CreateTicketInput>,
) -> (StatusCode, Json<Ticket>) {
    (StatusCode::CREATED, Json(tickets.add(input)))
}

pub async fn update_ticket(
    State(tickets): State<TicketStore>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTicketInput>,
) -> Result<Json<Ticket>, ApiError> {
    tickets
        .update(&id, input)
        .map(Json)
        .ok_or(ApiError::NotFound("Ticket"))
}

pub async fn delete_ticket(
    State(tickets): State<TicketStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if tickets.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Ticket"))
    }
}
