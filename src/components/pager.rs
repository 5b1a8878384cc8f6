use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::pagination::{PageAction, PageControls};
use leptos::prelude::*;

/// First / previous / next / last control with a page summary.
#[component]
pub fn Pager(
    #[prop(into)] current: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total_records: Signal<usize>,
    on_change: Callback<usize>,
) -> impl IntoView {
    let controls = Memo::new(move |_| {
        PageControls::new(current.get(), total_pages.get(), total_records.get())
    });

    let button = move |action: PageAction, label: &'static str, title: &'static str| {
        view! {
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Xs
                attr:title=title
                attr:disabled=move || !controls.get().enabled(action)
                on:click=move |_| {
                    if let Some(page) = controls.get_untracked().target(action) {
                        on_change.run(page);
                    }
                }
            >
                {label}
            </Button>
        }
    };

    view! {
        <div class="flex flex-wrap items-center justify-between gap-2 pt-3">
            <div class="text-xs text-muted-foreground">{move || controls.get().summary()}</div>
            <div class="flex items-center gap-1">
                {button(PageAction::First, "«", "First page")}
                {button(PageAction::Prev, "‹", "Previous page")}
                {button(PageAction::Next, "›", "Next page")}
                {button(PageAction::Last, "»", "Last page")}
            </div>
        </div>
    }
}
