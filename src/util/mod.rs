use chrono::{DateTime, FixedOffset, NaiveDate};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

pub(crate) fn now_secs() -> i64 {
    now_ms() / 1000
}

/// Parse the date formats the CMS and its editors produce.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, `DD-MM-YYYY` and `DD/MM/YYYY`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(s, "%d-%m-%Y").ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok())
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

/// `YYYY-MM-DD` form of any accepted date, used for exact-date comparisons.
pub(crate) fn normalize_date(raw: &str) -> Option<String> {
    parse_date(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Display form used in tables (`DD-MM-YYYY`); unparseable input is shown as-is.
pub(crate) fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => d.format("%d-%m-%Y").to_string(),
        None => raw.trim().to_string(),
    }
}

pub(crate) fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%d-%m-%Y %H:%M").to_string(),
        None => format_date(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(parse_date("2024-02-01"), expected);
        assert_eq!(parse_date("2024-02-01T09:30:00.000Z"), expected);
        assert_eq!(parse_date("01-02-2024"), expected);
        assert_eq!(parse_date("01/02/2024"), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_normalize_and_format() {
        assert_eq!(normalize_date("05-03-2023").as_deref(), Some("2023-03-05"));
        assert_eq!(format_date("2023-03-05"), "05-03-2023");
        assert_eq!(format_date("n/a"), "n/a");
        assert_eq!(format_timestamp("2023-03-05T14:07:00Z"), "05-03-2023 14:07");
    }
}
