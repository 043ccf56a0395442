pub mod auth;
pub mod middleware;
pub mod oauth;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_session;
pub use state::AppState;

/// Room for the NIK field and the multipart framing on top of both files.
const FORM_HEADROOM: u64 = 1024 * 1024;

/// The largest document submission the router reads. A body cut off here is
/// reported by the handler as a file over its limit.
pub fn body_limit(state: &AppState) -> usize {
    let rules = &state.config.documents;
    let total = rules
        .ktp
        .max_bytes
        .saturating_add(rules.selfie.max_bytes)
        .saturating_add(FORM_HEADROOM);
    usize::try_from(total).unwrap_or(usize::MAX)
}

/// Builds the API router. CORS and the Swagger UI are layered on by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/checkin/decode", post(rest::checkin_decode_handler))
        .route("/calendar", get(rest::calendar_handler))
        .route("/oauth/config", get(oauth::oauth_config_handler));

    // Candidate routes (session required)
    let protected_routes = Router::new()
        .route("/candidate/profile", get(rest::profile_handler))
        .route("/candidate/documents", post(rest::submit_documents_handler))
        .route("/oauth/token", post(oauth::oauth_token_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let limit = body_limit(&state);
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
