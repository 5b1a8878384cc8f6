use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::models::UserProfile;
use crate::session::{decode_claims, BrowserSession, SessionProvider};
use leptos::prelude::*;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub session: Arc<dyn SessionProvider>,
    pub api_client: ApiClient,

    /// Mirrors whether a token is stored; the session watcher flips it off.
    pub signed_in: RwSignal<bool>,
    /// Name shown in the header. Restored from the token claims on reload.
    pub display_name: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let session: Arc<dyn SessionProvider> = Arc::new(BrowserSession);
        let api_client = ApiClient::new(config.api_url.clone(), session.clone());

        let display_name = session
            .token()
            .as_deref()
            .and_then(|t| decode_claims(t).ok())
            .map(|c| c.display_name())
            .filter(|n| !n.is_empty());

        Self {
            config,
            signed_in: RwSignal::new(api_client.is_authenticated()),
            display_name: RwSignal::new(display_name),
            session,
            api_client,
        }
    }

    pub fn sign_in(&self, user: &UserProfile) {
        self.display_name.set(Some(user.display_name()));
        self.signed_in.set(true);
    }

    pub fn sign_out(&self) {
        self.api_client.logout();
        self.display_name.set(None);
        self.signed_in.set(false);
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
