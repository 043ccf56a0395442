//! services/api/src/web/oauth.rs
//!
//! The browser runs the Google consent flow; these endpoints hand it the client
//! settings and receive the outcome for the `TokenGate`.

use crate::adapters::TokenState;
use crate::config::{is_placeholder, OAUTH_SCOPES};
use crate::error::ApiError;
use crate::messages;
use crate::web::auth::MessageResponse;
use crate::web::state::{AppState, CandidateSession};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct OAuthConfigResponse {
    pub client_id: String,
    pub scopes: Vec<String>,
    /// `false` while the client id or Drive folder is still a placeholder.
    pub configured: bool,
    /// Whether the server already holds a token.
    pub has_token: bool,
}

/// The token-client callback: either a token or the error it reported.
#[derive(Deserialize, ToSchema)]
pub struct OAuthTokenRequest {
    pub access_token: Option<String>,
    pub error: Option<String>,
}

/// GET /oauth/config - Client settings for the consent flow
#[utoipa::path(
    get,
    path = "/oauth/config",
    responses(
        (status = 200, description = "OAuth2 client settings", body = OAuthConfigResponse)
    )
)]
pub async fn oauth_config_handler(State(state): State<Arc<AppState>>) -> Json<OAuthConfigResponse> {
    let client_id = if is_placeholder(&state.config.oauth_client_id) {
        String::new()
    } else {
        state.config.oauth_client_id.clone()
    };
    Json(OAuthConfigResponse {
        client_id,
        scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
        configured: state.config.uploads_configured(),
        has_token: matches!(state.token_gate.current(), TokenState::Granted(_)),
    })
}

/// POST /oauth/token - Register the outcome of the consent flow
///
/// The token is tied to the calling session and dropped when it logs out.
#[utoipa::path(
    post,
    path = "/oauth/token",
    request_body = OAuthTokenRequest,
    responses(
        (status = 200, description = "Outcome recorded", body = MessageResponse),
        (status = 400, description = "Neither a token nor an error was sent"),
        (status = 401, description = "No active session")
    )
)]
pub async fn oauth_token_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CandidateSession>,
    Json(req): Json<OAuthTokenRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match (req.access_token, req.error) {
        (Some(token), _) if !token.trim().is_empty() => {
            state.token_gate.grant_for(&session.id, token.trim());
            Ok(Json(MessageResponse {
                message: "OK".to_string(),
            }))
        }
        (_, Some(reason)) => {
            state.token_gate.deny_for(&session.id, reason);
            Ok(Json(MessageResponse {
                message: messages::AUTH_FAILED.to_string(),
            }))
        }
        _ => Err(ApiError::Validation(messages::AUTH_FAILED.to_string())),
    }
}
