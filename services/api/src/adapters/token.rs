//! services/api/src/adapters/token.rs
//!
//! The access-token gate. It implements the `AccessTokenProvider` port from the
//! `core` crate: callers await it once, and it resolves when the browser consent
//! flow reports back through `POST /oauth/token`.

use async_trait::async_trait;
use recruitment_core::ports::{AccessTokenProvider, PortError, PortResult};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Outcome of the consent flow as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Pending,
    Granted(String),
    Denied(String),
}

impl TokenState {
    fn is_pending(&self) -> bool {
        matches!(self, TokenState::Pending)
    }
}

/// The current state plus the session that registered it, if any.
#[derive(Debug, Clone)]
struct Slot {
    state: TokenState,
    owner: Option<String>,
}

/// Holds the bearer token in memory only.
///
/// A token registered by a candidate session lives until that session logs
/// out; the gate then falls back to the startup state (the preset token from
/// `GOOGLE_ACCESS_TOKEN`, or `Pending`).
pub struct TokenGate {
    slot: watch::Sender<Slot>,
    preset: Option<String>,
    wait: Duration,
}

impl TokenGate {
    /// A gate that blocks callers for at most `wait` until a token is registered.
    pub fn new(wait: Duration) -> Self {
        Self::with_preset(None, wait)
    }

    /// A gate that is already open, e.g. from `GOOGLE_ACCESS_TOKEN`.
    pub fn granted(token: impl Into<String>, wait: Duration) -> Self {
        Self::with_preset(Some(token.into()), wait)
    }

    fn with_preset(preset: Option<String>, wait: Duration) -> Self {
        let (slot, _) = watch::channel(Self::startup_slot(&preset));
        Self { slot, preset, wait }
    }

    fn startup_slot(preset: &Option<String>) -> Slot {
        Slot {
            state: preset
                .clone()
                .map_or(TokenState::Pending, TokenState::Granted),
            owner: None,
        }
    }

    /// Registers a token obtained by the given session's consent flow.
    pub fn grant_for(&self, session_id: &str, token: impl Into<String>) {
        self.slot.send_replace(Slot {
            state: TokenState::Granted(token.into()),
            owner: Some(session_id.to_string()),
        });
        info!("OAuth2 token received");
    }

    pub fn deny_for(&self, session_id: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(reason = %reason, "OAuth2 consent was refused");
        self.slot.send_replace(Slot {
            state: TokenState::Denied(reason),
            owner: Some(session_id.to_string()),
        });
    }

    /// Drops whatever was registered and returns to the startup state.
    pub fn reset(&self) {
        self.slot.send_replace(Self::startup_slot(&self.preset));
    }

    /// Resets the gate if `session_id` registered the current state.
    /// Returns whether anything was dropped.
    pub fn release(&self, session_id: &str) -> bool {
        let startup = Self::startup_slot(&self.preset);
        let released = self.slot.send_if_modified(|slot| {
            if slot.owner.as_deref() == Some(session_id) {
                *slot = startup;
                true
            } else {
                false
            }
        });
        if released {
            info!("OAuth2 token released on logout");
        }
        released
    }

    pub fn current(&self) -> TokenState {
        self.slot.borrow().state.clone()
    }
}

#[async_trait]
impl AccessTokenProvider for TokenGate {
    async fn access_token(&self) -> PortResult<String> {
        let mut rx = self.slot.subscribe();
        let resolved = tokio::time::timeout(self.wait, async move {
            rx.wait_for(|s| !s.state.is_pending())
                .await
                .map(|s| s.state.clone())
        })
        .await
        .map_err(|_| PortError::Unauthorized("no OAuth2 token was registered in time".to_string()))?
        .map_err(|_| PortError::Unexpected("token gate closed".to_string()))?;

        match resolved {
            TokenState::Granted(token) => Ok(token),
            TokenState::Denied(reason) => Err(PortError::Unauthorized(reason)),
            TokenState::Pending => Err(PortError::Unexpected("token gate still pending".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn preset_token_resolves_immediately() {
        let gate = TokenGate::granted("ya29.token", Duration::from_secs(1));
        assert_eq!(gate.access_token().await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn waiter_resumes_when_token_is_registered() {
        let gate = Arc::new(TokenGate::new(Duration::from_secs(5)));
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.access_token().await })
        };

        tokio::task::yield_now().await;
        gate.grant_for("session-a", "ya29.late");

        assert_eq!(waiter.await.unwrap().unwrap(), "ya29.late");
    }

    #[tokio::test]
    async fn denial_is_unauthorized() {
        let gate = TokenGate::new(Duration::from_secs(1));
        gate.deny_for("session-a", "access_denied");
        assert!(matches!(
            gate.access_token().await,
            Err(PortError::Unauthorized(reason)) if reason == "access_denied"
        ));
    }

    #[tokio::test]
    async fn pending_gate_times_out() {
        let gate = TokenGate::new(Duration::from_millis(20));
        assert!(matches!(gate.access_token().await, Err(PortError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn reset_closes_the_gate_again() {
        let gate = TokenGate::new(Duration::from_millis(20));
        gate.grant_for("session-a", "ya29.old");
        gate.reset();
        assert_eq!(gate.current(), TokenState::Pending);
        assert!(gate.access_token().await.is_err());
    }

    #[test]
    fn session_token_is_released_only_by_its_owner() {
        let gate = TokenGate::new(Duration::from_millis(20));
        gate.grant_for("session-a", "ya29.a");

        assert!(!gate.release("session-b"));
        assert_eq!(gate.current(), TokenState::Granted("ya29.a".to_string()));

        assert!(gate.release("session-a"));
        assert_eq!(gate.current(), TokenState::Pending);
    }

    #[test]
    fn release_falls_back_to_the_preset_token() {
        let gate = TokenGate::granted("ya29.preset", Duration::from_millis(20));
        gate.grant_for("session-a", "ya29.a");
        gate.release("session-a");
        assert_eq!(gate.current(), TokenState::Granted("ya29.preset".to_string()));

        // The preset itself has no owner and survives any logout.
        assert!(!gate.release("session-a"));
    }
}
