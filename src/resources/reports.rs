use super::{date_cell, FilterField, FilterKey, MatchMode, Resource};
use crate::models::{deserialize_media, FileRef};
use serde::{Deserialize, Deserializer};

/// Monthly/quarterly generation report. Month, year and quarter arrive as
/// strings or numbers depending on how the entry was created.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct GenerationReport {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "ReportDt")]
    pub report_date: Option<String>,
    #[serde(rename = "Month", deserialize_with = "string_or_number")]
    pub month: Option<String>,
    #[serde(rename = "Year", deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(rename = "Quarter", deserialize_with = "string_or_number")]
    pub quarter: Option<String>,
    #[serde(rename = "File", deserialize_with = "deserialize_media")]
    pub file: Option<FileRef>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        },
    )
}

impl GenerationReport {
    fn period(&self) -> String {
        match (&self.quarter, &self.month, &self.year) {
            (Some(q), _, Some(y)) => format!("Q{} {}", q.trim_start_matches(['Q', 'q']), y),
            (None, Some(m), Some(y)) => format!("{m} {y}"),
            (_, _, Some(y)) => y.clone(),
            _ => String::new(),
        }
    }
}

impl Resource for GenerationReport {
    const COLLECTION: &'static str = "generation-reports";
    const TITLE: &'static str = "Generation Reports";
    const ROUTE: &'static str = "/generation-reports";
    const REQUIRES_AUTH: bool = true;
    const FETCH_ALL: bool = true;
    const REPORT_FILTERS: bool = true;

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[FilterField::new(
            FilterKey::Date,
            "Report date",
            MatchMode::Date,
        )];
        FIELDS
    }

    fn filter_value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Date => self.report_date.as_deref(),
            _ => None,
        }
    }

    fn sort_date(&self) -> Option<&str> {
        self.report_date.as_deref()
    }

    fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn columns() -> &'static [&'static str] {
        &["Report", "Date", "Period"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.trim().to_string(),
            date_cell(&self.report_date),
            self.period(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_period_fields() {
        let report: GenerationReport = serde_json::from_value(json!({
            "Title": "Generation summary",
            "ReportDt": "2024-07-01",
            "Year": 2024,
            "Quarter": "2"
        }))
        .expect("report should parse");

        assert_eq!(report.year.as_deref(), Some("2024"));
        assert_eq!(report.period(), "Q2 2024");
    }

    #[test]
    fn test_month_period() {
        let report = GenerationReport {
            month: Some("March".to_string()),
            year: Some("2023".to_string()),
            ..Default::default()
        };
        assert_eq!(report.period(), "March 2023");
    }
}
