use crate::sidebar::{is_active, NAV_GROUPS};
use leptos::prelude::*;
use leptos_router::hooks::use_location;

#[component]
pub fn SidebarNav() -> impl IntoView {
    let location = use_location();
    let pathname = move || location.pathname.get();

    view! {
        <nav class="space-y-4" aria-label="Main">
            {NAV_GROUPS
                .iter()
                .map(|group| {
                    view! {
                        <div class="space-y-1">
                            <div class="px-2 text-[11px] font-medium uppercase tracking-wide text-muted-foreground">
                                {group.title}
                            </div>
                            {group
                                .links
                                .iter()
                                .map(|link| {
                                    let href = link.href;
                                    view! {
                                        <a
                                            href=href
                                            aria-current=move || is_active(href, &pathname()).then_some("page")
                                            class=move || {
                                                if is_active(href, &pathname()) {
                                                    "block rounded-md bg-accent px-2 py-1.5 text-sm font-medium text-accent-foreground"
                                                } else {
                                                    "block rounded-md px-2 py-1.5 text-sm text-foreground hover:bg-accent/60"
                                                }
                                            }
                                        >
                                            {link.label}
                                        </a>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </nav>
    }
}
