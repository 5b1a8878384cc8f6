use crate::auth::{AuthGuard, GuardOutcome, POLL_INTERVAL};
use crate::state::AppContext;
use crate::util::now_secs;
use leptos::prelude::*;
use leptos_dom::helpers::set_interval_with_handle;
use log::warn;

/// Re-checks the stored token on mount and every [`POLL_INTERVAL`].
///
/// The first check that finds the session missing, malformed or expired
/// tells the user once and sends them to the login page.
#[component]
pub fn SessionWatcher() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let guard = StoredValue::new(AuthGuard::new(app_state.0.session.clone()));

    let check = move || {
        let outcome = guard
            .try_update_value(|g| g.check(now_secs()))
            .unwrap_or(GuardOutcome::AlreadyInvalid);

        if let GuardOutcome::Transitioned(reason) = outcome {
            app_state.0.display_name.set(None);
            app_state.0.signed_in.set(false);
            let _ = window().alert_with_message(reason.notice());
            let _ = window().location().set_href("/login");
        }
    };

    check();

    match set_interval_with_handle(check, POLL_INTERVAL) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => warn!("could not start session polling: {e:?}"),
    }
}
