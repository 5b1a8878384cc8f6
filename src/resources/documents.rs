use super::{date_cell, opt_cell, FilterField, FilterKey, MatchMode, Resource};
use crate::models::{deserialize_media, FileRef};
use serde::Deserialize;

const ORDER_NO: FilterField = FilterField::new(FilterKey::OrderNo, "Order no.", MatchMode::Substring);
const ORDER_DATE: FilterField = FilterField::new(FilterKey::Date, "Order date", MatchMode::Date);

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Circular {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "OrderNo")]
    pub order_no: Option<String>,
    #[serde(rename = "OrderDt")]
    pub order_date: Option<String>,
    #[serde(rename = "Module")]
    pub module: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Resource for Circular {
    const COLLECTION: &'static str = "circulars";
    const TITLE: &'static str = "Circulars";
    const ROUTE: &'static str = "/circulars";
    const FETCH_ALL: bool = true;

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        out.extend(self.module.as_deref());
        out.extend(self.description.as_deref());
        out
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[
            ORDER_NO,
            ORDER_DATE,
            FilterField::new(FilterKey::Category, "Module", MatchMode::Exact),
        ];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::OrderNo => self.order_no.as_deref(),
            FilterKey::Date => self.order_date.as_deref(),
            FilterKey::Category => self.module.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.order_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Order no.", "Order date", "Module"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt_cell(&self.order_no),
            date_cell(&self.order_date),
            opt_cell(&self.module),
        ]
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Promotion {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "OrderNo")]
    pub order_no: Option<String>,
    #[serde(rename = "OrderDt")]
    pub order_date: Option<String>,
    #[serde(rename = "Cadre")]
    pub cadre: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Resource for Promotion {
    const COLLECTION: &'static str = "promotions";
    const TITLE: &'static str = "Promotions";
    const ROUTE: &'static str = "/promotions";
    const REQUIRES_AUTH: bool = true;
    const FETCH_ALL: bool = true;

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        out.extend(self.cadre.as_deref());
        out.extend(self.description.as_deref());
        out
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[
            ORDER_NO,
            ORDER_DATE,
            FilterField::new(FilterKey::Cadre, "Cadre", MatchMode::Substring),
        ];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::OrderNo => self.order_no.as_deref(),
            FilterKey::Date => self.order_date.as_deref(),
            FilterKey::Cadre => self.cadre.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.order_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Order no.", "Order date", "Cadre"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt_cell(&self.order_no),
            date_cell(&self.order_date),
            opt_cell(&self.cadre),
        ]
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Transfer {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "OrderNo")]
    pub order_no: Option<String>,
    #[serde(rename = "OrderDt")]
    pub order_date: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Resource for Transfer {
    const COLLECTION: &'static str = "transfers";
    const TITLE: &'static str = "Transfers";
    const ROUTE: &'static str = "/transfers";
    const REQUIRES_AUTH: bool = true;
    const FETCH_ALL: bool = true;

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        out.extend(self.description.as_deref());
        out
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[ORDER_NO, ORDER_DATE];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::OrderNo => self.order_no.as_deref(),
            FilterKey::Date => self.order_date.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.order_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Order no.", "Order date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt_cell(&self.order_no),
            date_cell(&self.order_date),
        ]
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct Training {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "Venue")]
    pub venue: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Resource for Training {
    const COLLECTION: &'static str = "trainings";
    const TITLE: &'static str = "Trainings";
    const ROUTE: &'static str = "/trainings";
    const PAGE_SIZE: usize = 6;

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        out.extend(self.description.as_deref());
        out.extend(self.venue.as_deref());
        out
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[
            FilterField::new(FilterKey::Venue, "Venue", MatchMode::Substring),
            FilterField::new(FilterKey::Date, "Start date", MatchMode::Date),
        ];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Venue => self.venue.as_deref(),
            FilterKey::Date => self.start_date.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Programme", "Start date", "Venue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            date_cell(&self.start_date),
            opt_cell(&self.venue),
        ]
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct RulesManual {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "PublishedDt")]
    pub published_date: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Resource for RulesManual {
    const COLLECTION: &'static str = "rules-manuals";
    const TITLE: &'static str = "Rules & Manuals";
    const ROUTE: &'static str = "/rules-manuals";
    const PAGE_SIZE: usize = 8;

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        out.extend(self.category.as_deref());
        out.extend(self.description.as_deref());
        out
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[FilterField::new(
            FilterKey::Category,
            "Category",
            MatchMode::Exact,
        )];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Category => self.category.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Category", "Published"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt_cell(&self.category),
            date_cell(&self.published_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use serde_json::json;

    #[test]
    fn test_order_filters_are_shared() {
        for fields in [
            Circular::filter_fields(),
            Promotion::filter_fields(),
            Transfer::filter_fields(),
        ] {
            assert_eq!(&fields[..2], &[ORDER_NO, ORDER_DATE]);
        }
    }

    #[test]
    fn test_circular_contract_deserialize() {
        let record: Record<Circular> = serde_json::from_value(json!({
            "id": 41,
            "attributes": {
                "Title": "Revision of DA rates",
                "OrderNo": "HR/2024/17",
                "OrderDt": "2024-04-02",
                "Module": "Finance",
                "updatedAt": "2024-04-03T06:12:00.000Z",
                "File": { "data": { "id": 9, "attributes": { "url": "/uploads/da_rates.pdf", "name": "da_rates.pdf" } } }
            }
        }))
        .expect("circular should parse");

        assert_eq!(record.id, 41);
        assert_eq!(record.attributes.order_no.as_deref(), Some("HR/2024/17"));
        assert_eq!(
            record.attributes.file().map(|f| f.url.as_str()),
            Some("/uploads/da_rates.pdf")
        );
        assert_eq!(
            record.attributes.cells(),
            vec!["Revision of DA rates", "HR/2024/17", "02-04-2024", "Finance"]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let record: Record<Transfer> =
            serde_json::from_value(json!({ "id": 1, "attributes": { "Title": "T" } }))
                .expect("sparse transfer should parse");
        assert!(record.attributes.file().is_none());
        assert!(record.attributes.sort_date().is_none());
    }

    #[test]
    fn test_search_text_includes_optional_fields() {
        let training = Training {
            title: "Fire safety".to_string(),
            venue: Some("Unit 3 auditorium".to_string()),
            ..Default::default()
        };
        assert_eq!(
            training.search_text(),
            vec!["Fire safety", "Unit 3 auditorium"]
        );
    }
}
