mod collection;

pub use collection::{
    CircularsPage, GenerationReportsPage, PromotionsPage, RulesManualsPage, TrainingsPage,
    TransfersPage,
};

use crate::api::RegisterRequest;
use crate::auth::validate_new_password;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorBanner, Input, Label, Spinner, SuccessBanner,
};
use crate::components::{SessionWatcher, SidebarNav};
use crate::resources::{
    Circular, GenerationReport, Promotion, Resource, RulesManual, Training, Transfer,
};
use crate::sidebar::active_group;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_query_map};
use log::warn;

const APP_NAME: &str = "Employee Portal";

/// Centered card used by every signed-out page.
#[component]
fn AuthCard(title: &'static str, description: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">{APP_NAME}</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                        <CardDescription class="text-xs">{description}</CardDescription>
                    </CardHeader>
                    <CardContent>{children()}</CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] r#type: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional, into)] autocomplete: String,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <Label html_for=id>{label}</Label>
            <Input
                id=id
                name=id
                r#type=r#type
                placeholder=placeholder
                autocomplete=autocomplete
                bind_value=value
                required=true
            />
        </div>
    }
}

#[component]
fn SubmitButton(
    loading: RwSignal<bool>,
    idle: &'static str,
    busy: &'static str,
) -> impl IntoView {
    view! {
        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
            <span class="inline-flex items-center gap-2">
                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <Spinner />
                </Show>
                {move || if loading.get() { busy } else { idle }}
            </span>
        </Button>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let employee_code: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let code = employee_code.get();
        let password_val = password.get();
        if code.trim().is_empty() || password_val.is_empty() {
            error.set(Some("Enter your employee code and password.".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        let app_state = app_state.clone();
        spawn_local(async move {
            match app_state.0.api_client.login_employee(&code, &password_val).await {
                Ok(response) => {
                    app_state.0.sign_in(&response.user);
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    warn!("login failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthCard title="Sign in" description="Use your employee code and password.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <Field id="employee-code" label="Employee code" placeholder="E12345" autocomplete="username" value=employee_code />
                <Field id="password" label="Password" r#type="password" autocomplete="current-password" value=password />

                <ErrorBanner message=error />

                <SubmitButton loading=loading idle="Sign in" busy="Signing in..." />

                <div class="flex justify-between pt-1 text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/forgot-password">"Forgot password?"</a>
                    <a class="text-primary underline underline-offset-4" href="/signup">"Create account"</a>
                </div>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let first_name: RwSignal<String> = RwSignal::new(String::new());
    let last_name: RwSignal<String> = RwSignal::new(String::new());
    let employee_code: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let password_val = password.get();
        if let Err(msg) = validate_new_password(&password_val, &confirm_password.get()) {
            error.set(Some(msg.to_string()));
            return;
        }

        let code = employee_code.get().trim().to_string();
        let req = RegisterRequest {
            username: code.clone(),
            email: email.get().trim().to_string(),
            password: password_val,
            employee_code: code,
            first_name: first_name.get().trim().to_string(),
            last_name: last_name.get().trim().to_string(),
        };

        loading.set(true);
        error.set(None);
        success.set(None);

        let app_state = app_state.clone();
        spawn_local(async move {
            match app_state.0.api_client.register(&req).await {
                Ok(_) => {
                    success.set(Some("Account created. You can now sign in.".to_string()));
                }
                Err(e) => {
                    warn!("registration failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthCard title="Create account" description="Register with your employee details.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <div class="grid grid-cols-2 gap-3">
                    <Field id="first-name" label="First name" autocomplete="given-name" value=first_name />
                    <Field id="last-name" label="Last name" autocomplete="family-name" value=last_name />
                </div>
                <Field id="employee-code" label="Employee code" value=employee_code />
                <Field id="email" label="Email" r#type="email" placeholder="you@example.com" autocomplete="email" value=email />
                <Field id="password" label="Password" r#type="password" autocomplete="new-password" value=password />
                <Field id="confirm-password" label="Confirm password" r#type="password" autocomplete="new-password" value=confirm_password />

                <ErrorBanner message=error />
                <SuccessBanner message=success />

                <SubmitButton loading=loading idle="Create account" busy="Creating..." />

                <div class="pt-1 text-xs text-muted-foreground">
                    "Already registered? "
                    <a class="text-primary underline underline-offset-4" href="/login">"Sign in"</a>
                </div>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get();
        loading.set(true);
        error.set(None);
        success.set(None);

        let app_state = app_state.clone();
        spawn_local(async move {
            match app_state.0.api_client.forgot_password(&email_val).await {
                Ok(_) => success.set(Some(
                    "If an account exists for that email, a reset link is on its way.".to_string(),
                )),
                Err(e) => {
                    warn!("forgot-password request failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthCard title="Forgot password" description="We will email you a link to choose a new password.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <Field id="email" label="Email" r#type="email" placeholder="you@example.com" autocomplete="email" value=email />

                <ErrorBanner message=error />
                <SuccessBanner message=success />

                <SubmitButton loading=loading idle="Send reset link" busy="Sending..." />

                <div class="pt-1 text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/login">"Back to sign in"</a>
                </div>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let query = use_query_map();
    let code = move || query.with(|q| q.get("code")).filter(|c| !c.trim().is_empty());

    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let Some(code) = code() else {
            error.set(Some("This reset link is invalid or incomplete.".to_string()));
            return;
        };

        let password_val = password.get();
        let confirm_val = confirm_password.get();
        if let Err(msg) = validate_new_password(&password_val, &confirm_val) {
            error.set(Some(msg.to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        let app_state = app_state.clone();
        spawn_local(async move {
            match app_state
                .0
                .api_client
                .reset_password(&code, &password_val, &confirm_val)
                .await
            {
                Ok(_) => success.set(Some("Password updated. You can now sign in.".to_string())),
                Err(e) => {
                    warn!("password reset failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <AuthCard title="Reset password" description="Choose a new password of at least 6 characters.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <Show when=move || code().is_none() fallback=|| ().into_view()>
                    <div class="text-xs text-destructive">"The reset code is missing from this link."</div>
                </Show>

                <Field id="password" label="New password" r#type="password" autocomplete="new-password" value=password />
                <Field id="confirm-password" label="Confirm password" r#type="password" autocomplete="new-password" value=confirm_password />

                <ErrorBanner message=error />
                <SuccessBanner message=success />

                <SubmitButton loading=loading idle="Update password" busy="Updating..." />

                <div class="pt-1 text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/login">"Back to sign in"</a>
                </div>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn ChangePasswordPage() -> impl IntoView {
    let current_password: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let current_val = current_password.get();
        let password_val = password.get();
        let confirm_val = confirm_password.get();
        if let Err(msg) = validate_new_password(&password_val, &confirm_val) {
            error.set(Some(msg.to_string()));
            return;
        }

        loading.set(true);
        error.set(None);
        success.set(None);

        let app_state = app_state.clone();
        spawn_local(async move {
            match app_state
                .0
                .api_client
                .change_password(&current_val, &password_val, &confirm_val)
                .await
            {
                Ok(_) => {
                    current_password.set(String::new());
                    password.set(String::new());
                    confirm_password.set(String::new());
                    success.set(Some("Your password has been changed.".to_string()));
                }
                Err(e) => {
                    warn!("password change failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="max-w-md">
            <Card>
                <CardHeader>
                    <CardTitle class="text-base">"Change password"</CardTitle>
                    <CardDescription class="text-xs">"Enter your current password and a new one."</CardDescription>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <Field id="current-password" label="Current password" r#type="password" autocomplete="current-password" value=current_password />
                        <Field id="password" label="New password" r#type="password" autocomplete="new-password" value=password />
                        <Field id="confirm-password" label="Confirm new password" r#type="password" autocomplete="new-password" value=confirm_password />

                        <ErrorBanner message=error />
                        <SuccessBanner message=success />

                        <SubmitButton loading=loading idle="Change password" busy="Saving..." />
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display_name = app_state.0.display_name;

    let sections: [(&'static str, &'static str, &'static str); 6] = [
        (Circular::TITLE, Circular::ROUTE, "Office orders and circulars"),
        (RulesManual::TITLE, RulesManual::ROUTE, "Rules, manuals and handbooks"),
        (Promotion::TITLE, Promotion::ROUTE, "Promotion orders by cadre"),
        (Transfer::TITLE, Transfer::ROUTE, "Transfer and posting orders"),
        (Training::TITLE, Training::ROUTE, "Upcoming and past trainings"),
        (GenerationReport::TITLE, GenerationReport::ROUTE, "Monthly and quarterly reports"),
    ];

    view! {
        <div class="space-y-4">
            <div>
                <h1 class="text-lg font-semibold">
                    {move || match display_name.get() {
                        Some(name) => format!("Welcome, {name}"),
                        None => "Welcome".to_string(),
                    }}
                </h1>
                <p class="text-xs text-muted-foreground">"Documents and reports published for employees."</p>
            </div>

            <div class="grid grid-cols-1 gap-3 sm:grid-cols-2 lg:grid-cols-3">
                {sections
                    .into_iter()
                    .map(|(title, href, blurb)| {
                        view! {
                            <a href=href class="block">
                                <Card class="h-full gap-2 py-4 transition-colors hover:bg-accent/40">
                                    <CardHeader class="px-4">
                                        <CardTitle class="text-sm">{title}</CardTitle>
                                        <CardDescription class="text-xs">{blurb}</CardDescription>
                                    </CardHeader>
                                </Card>
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
pub fn AuthedLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display_name = app_state.0.display_name;

    let location = use_location();
    let section = move || {
        active_group(&location.pathname.get()).map(|g| g.title)
    };

    let on_logout = move |_| {
        app_state.0.sign_out();
        let _ = window().location().set_href("/login");
    };

    view! {
        <SessionWatcher />
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-6xl gap-6 px-4 py-6">
                <aside class="w-56 shrink-0">
                    <div class="sticky top-6 space-y-4">
                        <a href="/" class="block px-2 text-sm font-semibold text-foreground">{APP_NAME}</a>

                        <SidebarNav />

                        <Card class="gap-2 py-3">
                            <CardContent class="space-y-2 px-3">
                                <div class="truncate text-xs text-muted-foreground">
                                    {move || display_name.get().unwrap_or_else(|| "Signed in".to_string())}
                                </div>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    on:click=on_logout
                                    class="w-full"
                                >
                                    "Sign out"
                                </Button>
                            </CardContent>
                        </Card>
                    </div>
                </aside>

                <main class="min-w-0 flex-1">
                    <div class="mb-2 h-4 text-[11px] uppercase tracking-wide text-muted-foreground">
                        {section}
                    </div>
                    {children()}
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let signed_in = app_state.0.signed_in;

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=move || signed_in.get() fallback=move || view! { <LoginPage /> }>
            <AuthedLayout>
                {move || children.with_value(|c| c())}
            </AuthedLayout>
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    view! {
        <RootAuthed>
            <HomePage />
        </RootAuthed>
    }
}
