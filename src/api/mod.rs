mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionManager;
use crate::config::DEFAULT_CORS_ORIGIN;
use crate::guard::RouteTable;
use crate::tickets::TicketStore;

pub use handlers::{ErrorBody, NavigateQuery, NavigationResponse, PageView};

/// Everything the handlers share. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct AppState {
    pub auth: SessionManager,
    pub tickets: TicketStore,
    pub routes: Arc<RouteTable>,
    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// State with the demo tickets and the default route table.
    pub fn new(auth: SessionManager) -> Self {
        Self {
            auth,
            tickets: TicketStore::default(),
            routes: Arc::new(RouteTable::default()),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for TicketStore {
    fn from_ref(state: &AppState) -> Self {
        state.tickets.clone()
    }
}

/// CORS restricted to the configured origins. Unparsable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_router(state: AppState) -> Router {
    let tickets = Router::new()
        .route("/tickets", get(handlers::list_tickets))
        .route("/tickets", post(handlers::create_ticket))
        .route("/tickets/{id}", get(handlers::get_ticket))
        .route("/tickets/{id}", put(handlers::update_ticket))
        .route("/tickets/{id}", delete(handlers::delete_ticket))
        .route_layer(from_fn_with_state(
            state.auth.clone(),
            middleware::require_session,
        ));

    let api = Router::new()
        // Session
        .route("/auth/login", post(handlers::login))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/session", get(handlers::session))
        .route("/accounts", get(handlers::list_accounts))
        // Navigation
        .route("/navigate", get(handlers::navigate))
        // Health
        .route("/health", get(handlers::health))
        .merge(tickets);

    let pages = Router::new()
        .route("/", get(handlers::page))
        .route("/auth", get(handlers::page))
        .route("/auth/{mode}", get(handlers::page))
        .route("/dashboard", get(handlers::page))
        .route("/dashboard/tickets", get(handlers::page))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::navigation_guard,
        ));

    Router::new()
        .nest("/api/v1", api)
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.cors_origins))
        .with_state(state)
}
