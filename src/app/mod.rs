use crate::components::ui::{ToastHost, Toasts};
use crate::config::EnvConfig;
use crate::pages::{
    ChangePasswordPage, CircularsPage, ForgotPasswordPage, GenerationReportsPage, LoginPage,
    PromotionsPage, RegisterPage, ResetPasswordPage, RootAuthed, RootPage, RulesManualsPage,
    TrainingsPage, TransfersPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(config)));

    let toasts = Toasts::new();
    provide_context(toasts);

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("signup") view=RegisterPage />
                <Route path=path!("forgot-password") view=ForgotPasswordPage />
                <Route path=path!("reset-password") view=ResetPasswordPage />
                <Route path=path!("change-password") view=move || view! {
                    <RootAuthed>
                        <ChangePasswordPage />
                    </RootAuthed>
                } />
                <Route path=path!("circulars") view=move || view! {
                    <RootAuthed>
                        <CircularsPage />
                    </RootAuthed>
                } />
                <Route path=path!("promotions") view=move || view! {
                    <RootAuthed>
                        <PromotionsPage />
                    </RootAuthed>
                } />
                <Route path=path!("transfers") view=move || view! {
                    <RootAuthed>
                        <TransfersPage />
                    </RootAuthed>
                } />
                <Route path=path!("trainings") view=move || view! {
                    <RootAuthed>
                        <TrainingsPage />
                    </RootAuthed>
                } />
                <Route path=path!("rules-manuals") view=move || view! {
                    <RootAuthed>
                        <RulesManualsPage />
                    </RootAuthed>
                } />
                <Route path=path!("generation-reports") view=move || view! {
                    <RootAuthed>
                        <GenerationReportsPage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
        <ToastHost toasts=toasts />
    }
}
