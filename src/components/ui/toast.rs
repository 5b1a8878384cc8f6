use leptos::prelude::*;
use leptos_dom::helpers::set_timeout;
use std::time::Duration;

const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub id: u64,
    pub text: String,
}

/// Transient error notices raised by page actions such as downloads.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<ToastMessage>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, text: impl Into<String>) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.items.update(|items| {
            items.push(ToastMessage {
                id,
                text: text.into(),
            })
        });

        let this = *self;
        set_timeout(move || this.dismiss(id), TOAST_TTL);
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }
}

#[component]
pub fn ToastHost(toasts: Toasts) -> impl IntoView {
    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-50 flex w-80 flex-col gap-2" aria-live="polite">
            <For
                each=move || toasts.items.get()
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    view! {
                        <div class="pointer-events-auto flex items-start justify-between gap-3 rounded-md border border-destructive/30 bg-card px-3 py-2 text-xs text-destructive shadow-md">
                            <span>{t.text}</span>
                            <button
                                class="text-muted-foreground hover:text-foreground"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
