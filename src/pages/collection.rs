use crate::api::ReportFilter;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, ErrorBanner, Input, Label, Select, Spinner, Table,
    TableBody, TableCell, TableHead, TableHeader, TableRow, TableWrapper, Toasts,
};
use crate::components::Pager;
use crate::download::{download_file, DownloadMode};
use crate::listing::ListController;
use crate::models::FileRef;
use crate::resources::{
    Circular, FilterField, GenerationReport, Promotion, Resource, RulesManual, Training, Transfer,
};
use crate::state::AppContext;
use crate::util::format_timestamp;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_options() -> Vec<(String, String)> {
    std::iter::once((String::new(), "Any month".to_string()))
        .chain(
            MONTHS
                .iter()
                .enumerate()
                .map(|(i, m)| ((i + 1).to_string(), m.to_string())),
        )
        .collect()
}

fn quarter_options() -> Vec<(String, String)> {
    std::iter::once((String::new(), "Any quarter".to_string()))
        .chain((1..=4).map(|q| (q.to_string(), format!("Q{q}"))))
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// The list page shared by every collection: fetch once on mount, then
/// search, filter, sort and page locally.
pub(crate) fn collection_page<R: Resource>() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let toasts = expect_context::<Toasts>();

    let controller: RwSignal<ListController<R>> = RwSignal::new(ListController::new());
    // Ignore responses that finish after a newer request was issued.
    let request_id: StoredValue<u64> = StoredValue::new(0);

    let api_client = app_state.0.api_client.clone();
    let load = Callback::new(move |filter: ReportFilter| {
        let id = request_id.get_value() + 1;
        request_id.set_value(id);
        controller.update(|c| c.begin_load());

        let api_client = api_client.clone();
        spawn_local(async move {
            let result = api_client.fetch_records::<R>(&filter).await;
            if request_id.get_value() != id {
                return;
            }
            if let Err(e) = &result {
                warn!("loading {} failed: {e}", R::COLLECTION);
            }
            controller.update(|c| c.finish_load(result));
        });
    });

    load.run(ReportFilter::default());

    // Search box and per-field filter inputs.
    let search: RwSignal<String> = RwSignal::new(String::new());
    Effect::new(move |_| {
        let value = search.get();
        controller.update(|c| c.set_search(value));
    });

    let filter_inputs: Vec<(FilterField, RwSignal<String>)> = R::filter_fields()
        .iter()
        .map(|field| (*field, RwSignal::new(String::new())))
        .collect();
    for (field, value) in filter_inputs.iter().copied() {
        Effect::new(move |_| {
            let value = value.get();
            controller.update(|c| c.set_filter(field.key, value));
        });
    }
    let filter_signals: Vec<RwSignal<String>> = filter_inputs.iter().map(|(_, v)| *v).collect();
    let has_filters = !filter_inputs.is_empty();

    let on_clear = move |_| {
        search.set(String::new());
        for value in &filter_signals {
            value.set(String::new());
        }
        controller.update(|c| c.clear_filters());
    };

    // Server-side report filters.
    let report_date: RwSignal<String> = RwSignal::new(String::new());
    let report_month: RwSignal<String> = RwSignal::new(String::new());
    let report_year: RwSignal<String> = RwSignal::new(String::new());
    let report_quarter: RwSignal<String> = RwSignal::new(String::new());

    let on_apply_report = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        load.run(ReportFilter {
            date: non_empty(report_date.get()),
            month: non_empty(report_month.get()),
            year: non_empty(report_year.get()),
            quarter: non_empty(report_quarter.get()),
        });
    };

    let on_reset_report = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        report_date.set(String::new());
        report_month.set(String::new());
        report_year.set(String::new());
        report_quarter.set(String::new());
        load.run(ReportFilter::default());
    };

    let list = Memo::new(move |_| controller.with(|c| c.view()));
    let loading = Signal::derive(move || controller.with(|c| c.loading));
    let error = Signal::derive(move || controller.with(|c| c.error.map(|e| e.message().to_string())));
    let last_updated = move || {
        controller
            .with(|c| c.last_updated.clone())
            .map(|ts| format!("Last updated: {}", format_timestamp(&ts)))
    };

    let on_page = Callback::new(move |page: usize| controller.update(|c| c.set_page(page)));

    let base_url = app_state.0.config.api_url.clone();
    let session = app_state.0.session.clone();
    let on_download = Callback::new(move |file: Option<FileRef>| {
        let base_url = base_url.clone();
        let session = session.clone();
        spawn_local(async move {
            let mode = DownloadMode::for_resource(R::REQUIRES_AUTH);
            if let Err(e) = download_file(&base_url, file.as_ref(), mode, session.as_ref()).await {
                toasts.push(e.user_message());
            }
        });
    });

    let column_count = R::columns().len() + 1;

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-end justify-between gap-2">
                <div>
                    <h1 class="text-lg font-semibold">{R::TITLE}</h1>
                    <p class="text-xs text-muted-foreground">{last_updated}</p>
                </div>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:title="Toggle date order"
                    on:click=move |_| controller.update(|c| c.toggle_sort())
                >
                    {move || controller.with(|c| c.sort.label())}
                </Button>
            </div>

            {R::REPORT_FILTERS.then(move || view! {
                <form class="flex flex-wrap items-end gap-3 rounded-md border p-3" on:submit=on_apply_report>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="report-date">"Date"</Label>
                        <Input id="report-date" r#type="date" bind_value=report_date class="w-40" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="report-month">"Month"</Label>
                        <Select id="report-month" options={month_options()} bind_value=report_month class="w-36" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="report-year">"Year"</Label>
                        <Input id="report-year" r#type="number" placeholder="2024" bind_value=report_year class="w-24" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="report-quarter">"Quarter"</Label>
                        <Select id="report-quarter" options={quarter_options()} bind_value=report_quarter class="w-32" />
                    </div>
                    <Button size=ButtonSize::Sm attr:disabled=move || loading.get()>"Apply"</Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=on_reset_report
                    >
                        "Reset"
                    </Button>
                </form>
            })}

            <div class="flex flex-wrap items-end gap-3">
                <div class="flex min-w-56 flex-1 flex-col gap-1.5">
                    <Label html_for="search">"Search"</Label>
                    <Input id="search" r#type="search" placeholder="Search..." bind_value=search />
                </div>
                {filter_inputs
                    .into_iter()
                    .map(|(field, value)| {
                        let id = format!("filter-{:?}", field.key).to_lowercase();
                        view! {
                            <div class="flex flex-col gap-1.5">
                                <Label html_for={id.clone()}>{field.label}</Label>
                                <Input id=id r#type={field.input_type()} bind_value=value class="w-44" />
                            </div>
                        }
                    })
                    .collect_view()}
                {has_filters.then(move || view! {
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_clear>
                        "Clear filters"
                    </Button>
                })}
            </div>

            <ErrorBanner message=error />

            <TableWrapper>
                <Table>
                    <TableHeader>
                        <TableRow>
                            {R::columns()
                                .iter()
                                .map(|col| view! { <TableHead>{*col}</TableHead> })
                                .collect_view()}
                            <TableHead class="text-right">"File"</TableHead>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            let rows = list.get().rows;
                            if loading.get() && rows.is_empty() {
                                return view! {
                                    <TableRow>
                                        <TableCell attr:colspan={column_count.to_string()}>
                                            <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                                <Spinner />
                                                "Loading..."
                                            </div>
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any();
                            }
                            if rows.is_empty() {
                                return view! {
                                    <TableRow>
                                        <TableCell attr:colspan={column_count.to_string()} class="text-xs text-muted-foreground">
                                            "No records found."
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any();
                            }

                            rows.into_iter()
                                .map(|row| {
                                    let file = row.attributes.file().cloned();
                                    let has_file = file.is_some();
                                    let title = if has_file { "Download file" } else { "No file attached" };
                                    view! {
                                        <TableRow>
                                            {row
                                                .attributes
                                                .cells()
                                                .into_iter()
                                                .map(|cell| view! { <TableCell>{cell}</TableCell> })
                                                .collect_view()}
                                            <TableCell class="text-right">
                                                <Button
                                                    variant=ButtonVariant::Outline
                                                    size=ButtonSize::Xs
                                                    attr:disabled={!has_file}
                                                    attr:title=title
                                                    on:click=move |_| on_download.run(file.clone())
                                                >
                                                    "Download"
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </TableBody>
                </Table>
            </TableWrapper>

            <Pager
                current={Signal::derive(move || list.with(|l| l.page))}
                total_pages={Signal::derive(move || list.with(|l| l.total_pages))}
                total_records={Signal::derive(move || list.with(|l| l.total_records))}
                on_change=on_page
            />
        </div>
    }
}

#[component]
pub fn CircularsPage() -> impl IntoView {
    collection_page::<Circular>()
}

#[component]
pub fn PromotionsPage() -> impl IntoView {
    collection_page::<Promotion>()
}

#[component]
pub fn TransfersPage() -> impl IntoView {
    collection_page::<Transfer>()
}

#[component]
pub fn TrainingsPage() -> impl IntoView {
    collection_page::<Training>()
}

#[component]
pub fn RulesManualsPage() -> impl IntoView {
    collection_page::<RulesManual>()
}

#[component]
pub fn GenerationReportsPage() -> impl IntoView {
    collection_page::<GenerationReport>()
}
