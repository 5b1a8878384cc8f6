//! Client-side search, filter, sort and paging shared by every list page.
//!
//! The displayed slice is always
//! `paginate(derive(records), clamp_page(page, total_pages), page_size)`.

use crate::api::ApiError;
use crate::models::Record;
use crate::resources::{filter_mode, FilterKey, MatchMode, Resource};
use crate::util::{normalize_date, parse_date, parse_timestamp};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub(crate) const UNAUTHORIZED_MESSAGE: &str =
    "You are not authorized to view this content. Please sign in again.";
pub(crate) const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data. Please try again later.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "Oldest first",
            Self::Desc => "Newest first",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoadError {
    Unauthorized,
    FetchFailed,
}

impl LoadError {
    pub fn message(self) -> &'static str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
            Self::FetchFailed => FETCH_FAILED_MESSAGE,
        }
    }
}

impl From<&ApiError> for LoadError {
    fn from(e: &ApiError) -> Self {
        match e {
            ApiError::Unauthorized => Self::Unauthorized,
            _ => Self::FetchFailed,
        }
    }
}

pub(crate) type Filters = BTreeMap<FilterKey, String>;

fn matches_search<A: Resource>(attrs: &A, needle: &str) -> bool {
    needle.is_empty()
        || attrs
            .search_text()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

fn matches_filter(value: Option<&str>, wanted: &str, mode: MatchMode) -> bool {
    let Some(value) = value else {
        return false;
    };

    match mode {
        MatchMode::Substring => value.to_lowercase().contains(&wanted.to_lowercase()),
        MatchMode::Exact => value.trim().to_lowercase() == wanted.to_lowercase(),
        MatchMode::Date => match (normalize_date(value), normalize_date(wanted)) {
            (Some(a), Some(b)) => a == b,
            _ => value.trim() == wanted,
        },
    }
}

fn matches_filters<A: Resource>(attrs: &A, filters: &Filters) -> bool {
    filters.iter().all(|(key, wanted)| {
        let wanted = wanted.trim();
        wanted.is_empty() || matches_filter(attrs.filter_value(*key), wanted, filter_mode::<A>(*key))
    })
}

/// Sort key for a record's date. Parsed dates come first, then values that
/// do not parse, then missing dates; the direction only applies within a tier.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey<'a> {
    Parsed(NaiveDate, &'a str),
    Unparsed(&'a str),
    Missing,
}

impl<'a> DateKey<'a> {
    fn of(raw: Option<&'a str>) -> Self {
        match raw {
            Some(s) => match parse_date(s) {
                Some(d) => Self::Parsed(d, s),
                None => Self::Unparsed(s),
            },
            None => Self::Missing,
        }
    }

    fn tier(&self) -> u8 {
        match self {
            Self::Parsed(..) => 0,
            Self::Unparsed(_) => 1,
            Self::Missing => 2,
        }
    }
}

fn compare_dates(a: &DateKey<'_>, b: &DateKey<'_>, order: SortOrder) -> Ordering {
    a.tier().cmp(&b.tier()).then_with(|| match order {
        SortOrder::Asc => a.cmp(b),
        SortOrder::Desc => b.cmp(a),
    })
}

/// Search, then filter, then stable-sort by the resource's date field.
pub(crate) fn derive<A: Resource>(
    records: &[Record<A>],
    search: &str,
    filters: &Filters,
    sort: SortOrder,
) -> Vec<Record<A>> {
    let needle = search.trim().to_lowercase();

    let mut keyed: Vec<(DateKey<'_>, Record<A>)> = records
        .iter()
        .filter(|r| matches_search(&r.attributes, &needle))
        .filter(|r| matches_filters(&r.attributes, filters))
        .map(|r| (DateKey::of(r.attributes.sort_date()), r.clone()))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_dates(a, b, sort));
    keyed.into_iter().map(|(_, r)| r).collect()
}

pub(crate) fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

pub(crate) fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub(crate) fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Latest `updated_at` across records; RFC 3339 values compare by instant.
pub(crate) fn last_updated<A: Resource>(records: &[Record<A>]) -> Option<String> {
    records
        .iter()
        .filter_map(|r| r.attributes.updated_at())
        .max_by(|a, b| match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.cmp(b),
        })
        .map(str::to_string)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ListView<A> {
    pub rows: Vec<Record<A>>,
    pub page: usize,
    pub total_pages: usize,
    /// Records matching the current search and filters.
    pub total_records: usize,
}

/// Per-page list state, from mount to unmount.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ListController<A> {
    pub records: Vec<Record<A>>,
    pub loading: bool,
    pub error: Option<LoadError>,
    pub search: String,
    pub filters: Filters,
    pub sort: SortOrder,
    pub page: usize,
    pub page_size: usize,
    pub last_updated: Option<String>,
}

impl<A: Resource> ListController<A> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            search: String::new(),
            filters: Filters::new(),
            sort: SortOrder::default(),
            page: 1,
            page_size: A::PAGE_SIZE,
            last_updated: None,
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Record<A>>, ApiError>) {
        match result {
            Ok(records) => {
                self.last_updated = last_updated(&records);
                self.records = records;
                self.error = None;
            }
            Err(e) => {
                // Rows from a previous query must not show under the error.
                self.records.clear();
                self.last_updated = None;
                self.error = Some(LoadError::from(&e));
            }
        }
        self.loading = false;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        if self.filters.get(&key).map(String::as_str).unwrap_or_default() != value {
            self.filters.insert(key, value);
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.page = 1;
        }
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn view(&self) -> ListView<A> {
        let filtered = derive(&self.records, &self.search, &self.filters, self.sort);
        let total_pages = total_pages(filtered.len(), self.page_size);
        let page = clamp_page(self.page, total_pages);

        ListView {
            rows: paginate(&filtered, page, self.page_size),
            page,
            total_pages,
            total_records: filtered.len(),
        }
    }
}

impl<A: Resource> Default for ListController<A> {
    fn default() -> Self {
        Self::new()
    }
}
