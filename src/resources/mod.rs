//! Per-collection field mappings.
//!
//! Every list page is the same page; what differs between circulars,
//! promotions and the rest is declared here once per attribute type.

mod documents;
mod reports;

pub(crate) use documents::{Circular, Promotion, RulesManual, Training, Transfer};
pub(crate) use reports::GenerationReport;

use crate::models::FileRef;
use serde::de::DeserializeOwned;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum FilterKey {
    OrderNo,
    Date,
    Category,
    Cadre,
    Venue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchMode {
    /// Case-insensitive substring.
    Substring,
    /// Case-insensitive equality after trimming both sides.
    Exact,
    /// Same calendar day, whatever format either side uses.
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FilterField {
    pub key: FilterKey,
    pub label: &'static str,
    pub mode: MatchMode,
}

impl FilterField {
    pub const fn new(key: FilterKey, label: &'static str, mode: MatchMode) -> Self {
        Self { key, label, mode }
    }

    pub fn input_type(&self) -> &'static str {
        match self.mode {
            MatchMode::Date => "date",
            MatchMode::Substring | MatchMode::Exact => "text",
        }
    }
}

pub(crate) trait Resource:
    DeserializeOwned + Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static
{
    /// Collection path segment under `/api/`.
    const COLLECTION: &'static str;
    /// Relation passed to `populate=`.
    const FILE_FIELD: &'static str = "File";
    const TITLE: &'static str;
    const ROUTE: &'static str;
    /// Files of this collection are only served with a bearer token.
    const REQUIRES_AUTH: bool = false;
    const PAGE_SIZE: usize = 10;
    /// Page through the whole collection instead of trusting one response.
    const FETCH_ALL: bool = false;
    /// The page offers server-side date/month/year/quarter filters.
    const REPORT_FILTERS: bool = false;

    fn search_text(&self) -> Vec<&str>;

    fn filter_fields() -> &'static [FilterField] {
        &[]
    }

    fn filter_value(&self, _key: FilterKey) -> Option<&str> {
        None
    }

    fn sort_date(&self) -> Option<&str>;

    fn file(&self) -> Option<&FileRef>;

    fn updated_at(&self) -> Option<&str>;

    fn columns() -> &'static [&'static str];

    /// One display string per entry of [`Resource::columns`].
    fn cells(&self) -> Vec<String>;
}

pub(crate) fn filter_mode<R: Resource>(key: FilterKey) -> MatchMode {
    R::filter_fields()
        .iter()
        .find(|f| f.key == key)
        .map(|f| f.mode)
        .unwrap_or(MatchMode::Substring)
}

pub(crate) fn opt_cell(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

pub(crate) fn date_cell(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(crate::util::format_date)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_columns_match<R: Resource>(sample: R) {
        assert_eq!(
            R::columns().len(),
            sample.cells().len(),
            "{} columns and cells disagree",
            R::COLLECTION
        );
    }

    #[test]
    fn test_every_resource_has_matching_cells() {
        assert_columns_match(Circular::default());
        assert_columns_match(Promotion::default());
        assert_columns_match(Transfer::default());
        assert_columns_match(Training::default());
        assert_columns_match(RulesManual::default());
        assert_columns_match(GenerationReport::default());
    }

    #[test]
    fn test_declared_filters_are_readable() {
        let mut circular = Circular::default();
        circular.order_no = Some("HR/12".to_string());
        circular.order_date = Some("2024-03-01".to_string());
        circular.module = Some("Establishment".to_string());
        for field in Circular::filter_fields() {
            assert!(circular.filter_value(field.key).is_some(), "{:?}", field.key);
        }
    }

    #[test]
    fn test_filter_mode_defaults_to_substring() {
        assert_eq!(filter_mode::<Circular>(FilterKey::Date), MatchMode::Date);
        assert_eq!(filter_mode::<Circular>(FilterKey::Venue), MatchMode::Substring);
    }

    #[test]
    fn test_routes_and_collections_are_unique() {
        let routes = [
            Circular::ROUTE,
            Promotion::ROUTE,
            Transfer::ROUTE,
            Training::ROUTE,
            RulesManual::ROUTE,
            GenerationReport::ROUTE,
        ];
        let mut sorted = routes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), routes.len());
    }
}
