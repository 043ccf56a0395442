//! services/api/src/web/middleware.rs
//!
//! Session middleware for the candidate routes.

use crate::error::ApiError;
use crate::messages;
use crate::web::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

pub const SESSION_COOKIE: &str = "candidate_session";

/// Reads the session id from the `Cookie` header.
pub fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// Middleware that resolves the session cookie to the logged-in candidate.
///
/// If valid, inserts the `CandidateSession` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthorized = || ApiError::Unauthorized(messages::SESSION_REQUIRED.to_string());

    let id = session_id(req.headers()).ok_or_else(unauthorized)?.to_string();
    let Some(session) = state.sessions.get(&id).await else {
        debug!("Unknown or expired session cookie");
        state.token_gate.release(&id);
        return Err(unauthorized());
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_the_session_cookie_among_others() {
        let h = headers("theme=dark; candidate_session=abc-123; lang=id");
        assert_eq!(session_id(&h), Some("abc-123"));
    }

    #[test]
    fn ignores_lookalike_and_empty_cookies() {
        assert_eq!(session_id(&headers("candidate_session_old=x")), None);
        assert_eq!(session_id(&headers("candidate_session=")), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }
}
