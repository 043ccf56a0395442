//! services/api/src/web/auth.rs
//!
//! Candidate login and logout. A login is a phone number plus birth date that
//! must match a row of the candidate sheet.

use crate::error::ApiError;
use crate::messages;
use crate::web::middleware::{session_id, SESSION_COOKIE};
use crate::web::state::{AppState, SESSION_TTL_SECS};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Local};
use recruitment_core::dates::{input_date_to_standard, is_valid_input_date, mask_date_input};
use recruitment_core::validation::{is_valid_phone, normalize_phone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Any common format: `0812...`, `+62 812...`, `62-812-...`.
    pub phone: String,
    /// `DD/MM/YYYY`, or its eight digits.
    pub birth_date: String,
}

/// Where the client should send the candidate after logging in.
#[derive(Serialize, ToSchema, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    DataEntry,
    Profile,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub name: String,
    pub next: NextStep,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn session_cookie(id: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, id, max_age_secs
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Match a candidate row and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Candidate found, session cookie set", body = LoginResponse),
        (status = 400, description = "Invalid phone number or date"),
        (status = 404, description = "No matching candidate"),
        (status = 502, description = "The candidate sheet could not be read")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the input before touching the sheet
    let phone = normalize_phone(&req.phone);
    if !is_valid_phone(&phone) {
        return Err(ApiError::Validation(messages::PHONE_INVALID.to_string()));
    }
    // Same mask as the date input, so `01011990` is accepted too.
    let birth_date = mask_date_input(&req.birth_date);
    if !is_valid_input_date(&birth_date, Local::now().year()) {
        return Err(ApiError::Validation(messages::DATE_INVALID.to_string()));
    }
    let birth_date = input_date_to_standard(&birth_date);

    // 2. Scan the sheet for the first matching row
    let record = state
        .registry
        .find_candidate(&phone, &birth_date)
        .await
        .map_err(|e| {
            error!("Login error: {:?}", e);
            ApiError::Upstream(messages::NETWORK_ERROR.to_string())
        })?
        .ok_or_else(|| ApiError::NotFound(messages::LOGIN_FAILED.to_string()))?;

    // 3. Open the session and route on profile completeness
    let next = if record.is_complete() {
        NextStep::Profile
    } else {
        NextStep::DataEntry
    };
    let name = record.name.clone();
    for expired in state.sessions.prune_expired().await {
        state.token_gate.release(&expired);
    }
    let session = state.sessions.create(record).await;
    let active_sessions = state.sessions.len().await;
    info!(
        row_index = session.record.row_index,
        active_sessions,
        "Candidate logged in"
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&session.id, SESSION_TTL_SECS))],
        Json(LoginResponse {
            message: messages::SUCCESS_LOGIN.to_string(),
            name,
            next,
        }),
    ))
}

/// POST /auth/logout - End the candidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(&headers)
        .ok_or_else(|| ApiError::Unauthorized(messages::SESSION_REQUIRED.to_string()))?;

    if state.sessions.remove(id).await.is_some() {
        info!("Candidate logged out");
    }
    // A token registered through this session's consent flow goes with it.
    state.token_gate.release(id);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(MessageResponse {
            message: messages::SUCCESS_LOGOUT.to_string(),
        }),
    ))
}
