use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One CMS entry: `{ "id": .., "attributes": { .. } }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Record<A> {
    pub id: u64,
    pub attributes: A,
}

/// Attached file, owned by the record that references it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FileRef {
    /// Path relative to the backend origin (`/uploads/..`), or an absolute URL.
    pub url: String,
    pub name: String,
}

/// Deserialize a media relation into at most one [`FileRef`].
///
/// The CMS nests media as `{ "data": { "attributes": { "url", "name" } } }`,
/// `{ "data": [..] }` for multi-file fields, or `{ "data": null }` when empty.
/// Flattened `{ "url", "name" }` objects and bare URL strings are accepted too.
pub(crate) fn deserialize_media<'de, D>(deserializer: D) -> Result<Option<FileRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(file_ref_from_value))
}

fn file_ref_from_value(value: &Value) -> Option<FileRef> {
    match value {
        Value::Array(items) => items.iter().find_map(file_ref_from_value),
        Value::String(url) => file_ref_from_parts(url, None),
        Value::Object(map) => {
            if let Some(data) = map.get("data") {
                return file_ref_from_value(data);
            }
            if let Some(attrs) = map.get("attributes") {
                return file_ref_from_value(attrs);
            }
            let url = map.get("url").and_then(Value::as_str)?;
            file_ref_from_parts(url, map.get("name").and_then(Value::as_str))
        }
        _ => None,
    }
}

fn file_ref_from_parts(url: &str, name: Option<&str>) -> Option<FileRef> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| crate::download::file_name_from_url(url));

    Some(FileRef {
        url: url.to_string(),
        name,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Meta {
    #[serde(default)]
    pub pagination: Option<PageMeta>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub(crate) struct CollectionResponse<A> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<Record<A>>,
    #[serde(default)]
    pub meta: Meta,
}

/// Signed-in user as returned by the auth endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserProfile {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub employee_code: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username
                .clone()
                .or_else(|| self.email.clone())
                .unwrap_or_else(|| "Employee".to_string())
        } else {
            full
        }
    }
}
