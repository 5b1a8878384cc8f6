//! Session expiry watching.
//!
//! There is no refresh token: once the guard sees a missing, unreadable or
//! expired token it clears it and the user must sign in again.

use crate::session::{decode_claims, SessionProvider};
use log::info;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(10);

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InvalidReason {
    MissingToken,
    Expired,
    Malformed,
}

impl InvalidReason {
    pub fn notice(self) -> &'static str {
        match self {
            Self::MissingToken => "Please sign in to continue.",
            Self::Expired => "Your session has expired. Please sign in again.",
            Self::Malformed => "Your session is invalid. Please sign in again.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GuardState {
    Valid,
    Invalid(InvalidReason),
}

pub(crate) fn evaluate(token: Option<&str>, now_secs: i64) -> GuardState {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return GuardState::Invalid(InvalidReason::MissingToken);
    };

    match decode_claims(token) {
        Ok(claims) if claims.is_expired(now_secs) => GuardState::Invalid(InvalidReason::Expired),
        Ok(_) => GuardState::Valid,
        Err(_) => GuardState::Invalid(InvalidReason::Malformed),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GuardOutcome {
    Valid,
    /// Just became invalid; the caller should notify and redirect once.
    Transitioned(InvalidReason),
    AlreadyInvalid,
}

pub(crate) struct AuthGuard {
    session: Arc<dyn SessionProvider>,
    state: GuardState,
}

impl AuthGuard {
    pub fn new(session: Arc<dyn SessionProvider>) -> Self {
        Self {
            session,
            state: GuardState::Valid,
        }
    }

    pub fn check(&mut self, now_secs: i64) -> GuardOutcome {
        let next = evaluate(self.session.token().as_deref(), now_secs);
        let previous = std::mem::replace(&mut self.state, next);

        match (previous, next) {
            (_, GuardState::Valid) => GuardOutcome::Valid,
            (GuardState::Valid, GuardState::Invalid(reason)) => {
                info!("session invalid ({reason:?}); clearing token");
                self.session.clear();
                GuardOutcome::Transitioned(reason)
            }
            (GuardState::Invalid(_), GuardState::Invalid(_)) => GuardOutcome::AlreadyInvalid,
        }
    }
}

/// Validate a new password and its confirmation before submitting.
pub(crate) fn validate_new_password(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters");
    }
    if password != confirmation {
        return Err("Passwords do not match");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_tokens::token_with_payload;
    use crate::session::MemorySession;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_evaluate_states() {
        assert_eq!(evaluate(None, NOW), GuardState::Invalid(InvalidReason::MissingToken));
        assert_eq!(evaluate(Some("  "), NOW), GuardState::Invalid(InvalidReason::MissingToken));
        assert_eq!(evaluate(Some("abc"), NOW), GuardState::Invalid(InvalidReason::Malformed));

        let live = token_with_payload(&json!({ "exp": NOW + 60 }));
        assert_eq!(evaluate(Some(&live), NOW), GuardState::Valid);

        let boundary = token_with_payload(&json!({ "exp": NOW }));
        assert_eq!(evaluate(Some(&boundary), NOW), GuardState::Valid);

        let expired = token_with_payload(&json!({ "exp": NOW - 1 }));
        assert_eq!(evaluate(Some(&expired), NOW), GuardState::Invalid(InvalidReason::Expired));

        let no_exp = token_with_payload(&json!({ "id": 3 }));
        assert_eq!(evaluate(Some(&no_exp), NOW), GuardState::Valid);
    }

    #[test]
    fn test_expired_token_is_cleared_on_next_check() {
        let token = token_with_payload(&json!({ "exp": NOW + 5 }));
        let session = Arc::new(MemorySession::with_token(token));
        let mut guard = AuthGuard::new(session.clone());

        assert_eq!(guard.check(NOW), GuardOutcome::Valid);
        assert!(session.token().is_some());

        // One polling interval later the token has expired.
        let later = NOW + POLL_INTERVAL.as_secs() as i64;
        assert_eq!(guard.check(later), GuardOutcome::Transitioned(InvalidReason::Expired));
        assert!(session.token().is_none());
        assert_eq!(guard.check(later + 10), GuardOutcome::AlreadyInvalid);
    }

    #[test]
    fn test_transition_reported_once() {
        let session = Arc::new(MemorySession::default());
        let mut guard = AuthGuard::new(session.clone());

        assert_eq!(guard.check(NOW), GuardOutcome::Transitioned(InvalidReason::MissingToken));
        assert_eq!(guard.check(NOW + 10), GuardOutcome::AlreadyInvalid);

        session.set_token(&token_with_payload(&json!({ "exp": NOW + 3600 })));
        assert_eq!(guard.check(NOW + 20), GuardOutcome::Valid);
    }

    #[test]
    fn test_validate_new_password() {
        assert_eq!(validate_new_password("abc", "abc"), Err("Password must be at least 6 characters"));
        assert_eq!(validate_new_password("secret1", "secret2"), Err("Passwords do not match"));
        assert_eq!(validate_new_password("secret1", "secret1"), Ok(()));
    }
}
