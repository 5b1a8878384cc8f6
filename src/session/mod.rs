//! Session token access and JWT claim decoding.
//!
//! The token lives behind [`SessionProvider`] so the API client, the download
//! helper and the auth guard never read browser storage directly.

use crate::storage::{read_item, remove_item, write_item, TOKEN_KEY};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

pub(crate) trait SessionProvider: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear(&self);
}

/// Session backed by `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserSession;

impl SessionProvider for BrowserSession {
    fn token(&self) -> Option<String> {
        read_item(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    fn set_token(&self, token: &str) {
        write_item(TOKEN_KEY, token);
    }

    fn clear(&self) {
        remove_item(TOKEN_KEY);
    }
}

/// In-memory session for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySession {
    token: std::sync::RwLock<Option<String>>,
}

#[cfg(test)]
impl MemorySession {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: std::sync::RwLock::new(Some(token.into())),
        }
    }
}

#[cfg(test)]
impl SessionProvider for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SessionError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The subset of JWT claims the portal reads.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, rename = "firstName", alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName", alias = "last_name")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Claims {
    /// Expiry is strictly-less-than: a token expiring this second is still valid.
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp < now_secs)
    }

    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full.is_empty() {
            return full;
        }

        self.email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Employee".to_string())
    }
}

pub(crate) fn decode_claims(token: &str) -> Result<Claims, SessionError> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SessionError::Malformed);
    };

    let payload = payload.trim_end_matches('=');
    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => STANDARD_NO_PAD.decode(payload)?,
    };

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    /// Unsigned token carrying the given JSON payload.
    pub(crate) fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }
}


// Browser-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_browser_session_storage_roundtrip() {
        let session = BrowserSession;
        session.clear();
        assert!(session.token().is_none());

        session.set_token("t1");
        assert_eq!(session.token().as_deref(), Some("t1"));

        session.clear();
        assert!(session.token().is_none());
    }
}
