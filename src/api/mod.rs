use crate::models::{CollectionResponse, Record, UserProfile};
use crate::resources::Resource;
use crate::session::SessionProvider;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Page size used when walking a whole collection.
pub(crate) const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// Upper bound on pages requested by one walk, for backends that ignore `page`.
pub(crate) const MAX_PAGES: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    /// Map a non-2xx status and its body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        Self::Http {
            status,
            message: error_message_from_body(body),
        }
    }

    /// Text suitable for a form banner.
    pub(crate) fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Invalid credentials or session expired.".to_string(),
            Self::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
            Self::Http { message, .. } if !message.is_empty() => message.clone(),
            Self::Http { .. } | Self::Parse(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Pull a human message out of a CMS error body.
///
/// Handles `{"error":{"message":..}}`, `{"message":..}` and the older
/// `{"message":[{"messages":[{"message":..}]}]}`; falls back to the raw text.
pub(crate) fn error_message_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    value
        .pointer("/error/message")
        .or_else(|| value.pointer("/message/0/messages/0/message"))
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// Server-side filters accepted by report-style collections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ReportFilter {
    pub date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub quarter: Option<String>,
}

impl ReportFilter {
    fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("date", self.date.as_deref()),
            ("month", self.month.as_deref()),
            ("year", self.year.as_deref()),
            ("quarter", self.quarter.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(str::trim).filter(|v| !v.is_empty()).map(|v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

pub(crate) fn collection_url(
    base_url: &str,
    collection: &str,
    file_field: &str,
    page: Option<PageRequest>,
    filters: &ReportFilter,
) -> String {
    let mut url = format!(
        "{}/api/{}?populate={}&sort=id:desc",
        base_url.trim_end_matches('/'),
        collection,
        urlencoding::encode(file_field)
    );

    if let Some(p) = page {
        url.push_str(&format!("&page={}&pageSize={}", p.page, p.page_size));
    }

    for (key, value) in filters.pairs() {
        url.push_str(&format!("&{key}={}", urlencoding::encode(value)));
    }

    url
}

/// Walk a paged collection one page at a time, starting at page 1.
///
/// Stops at the first empty page, or after the page the response metadata
/// reports as the last one. Page `n + 1` is only requested once page `n`
/// has resolved.
pub(crate) async fn collect_pages<A, F, Fut>(mut fetch: F) -> ApiResult<Vec<Record<A>>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<CollectionResponse<A>>>,
{
    let mut out = Vec::new();

    for page in 1..=MAX_PAGES {
        let res = fetch(page).await?;
        if res.data.is_empty() {
            break;
        }

        let page_count = res.meta.pagination.as_ref().and_then(|p| p.page_count);
        out.extend(res.data);

        if page_count.is_some_and(|count| page >= count) {
            break;
        }
    }

    Ok(out)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    #[serde(rename = "employeeCode")]
    pub employee_code: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub jwt: String,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest {
    pub code: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    pub fn logout(&self) {
        info!("signing out");
        self.session.clear();
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> ApiResult<T> {
        let status = res.status();
        if status.is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let req = Self::with_auth_headers(reqwest::Client::new().get(url), self.session.token());
        let res = req.send().await.map_err(ApiError::network)?;
        Self::read_json(res).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        authenticated: bool,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url}");
        let mut req = reqwest::Client::new().post(url).json(body);
        if authenticated {
            req = Self::with_auth_headers(req, self.session.token());
        }
        let res = req.send().await.map_err(ApiError::network)?;
        Self::read_json(res).await
    }

    pub async fn fetch_page<R: Resource>(
        &self,
        page: Option<PageRequest>,
        filters: &ReportFilter,
    ) -> ApiResult<CollectionResponse<R>> {
        let url = collection_url(&self.base_url, R::COLLECTION, R::FILE_FIELD, page, filters);
        self.get_json(&url).await
    }

    /// Every record of `R`'s collection, paging through it when `R::FETCH_ALL`.
    pub async fn fetch_records<R: Resource>(
        &self,
        filters: &ReportFilter,
    ) -> ApiResult<Vec<Record<R>>> {
        if !filters.is_empty() {
            debug!("{} report filter: {filters:?}", R::COLLECTION);
        }

        let records = if R::FETCH_ALL {
            collect_pages(|page| {
                self.fetch_page::<R>(
                    Some(PageRequest {
                        page,
                        page_size: FETCH_ALL_PAGE_SIZE,
                    }),
                    filters,
                )
            })
            .await?
        } else {
            self.fetch_page::<R>(None, filters).await?.data
        };

        debug!("{} {} records loaded", records.len(), R::COLLECTION);
        Ok(records)
    }

    /// Sign in with employee code and password; the token is kept on success.
    pub async fn login_employee(
        &self,
        employee_code: &str,
        password: &str,
    ) -> ApiResult<LoginResponse> {
        let res: LoginResponse = self
            .post_json(
                "/api/auth/login-employee",
                &LoginRequest {
                    employee_code: employee_code.trim().to_string(),
                    password: password.to_string(),
                },
                false,
            )
            .await?;

        self.session.set_token(&res.jwt);
        info!("signed in as user {}", res.user.id);
        Ok(res)
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<LoginResponse> {
        self.post_json("/api/auth/local/register", req, false).await
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<serde_json::Value> {
        self.post_json(
            "/api/auth/forgot-password",
            &ForgotPasswordRequest {
                email: email.trim().to_string(),
            },
            false,
        )
        .await
    }

    pub async fn reset_password(
        &self,
        code: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ApiResult<LoginResponse> {
        self.post_json(
            "/api/auth/reset-password",
            &ResetPasswordRequest {
                code: code.to_string(),
                password: password.to_string(),
                password_confirmation: password_confirmation.to_string(),
            },
            false,
        )
        .await
    }

    /// Change the signed-in user's password; the refreshed token replaces the old one.
    pub async fn change_password(
        &self,
        current_password: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ApiResult<LoginResponse> {
        let res: LoginResponse = self
            .post_json(
                "/api/auth/change-password",
                &ChangePasswordRequest {
                    current_password: current_password.to_string(),
                    password: password.to_string(),
                    password_confirmation: password_confirmation.to_string(),
                },
                true,
            )
            .await?;

        self.session.set_token(&res.jwt);
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meta, PageMeta};
    use crate::resources::Circular;
    use crate::session::MemorySession;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn page_of(ids: &[u64], page_count: Option<u32>) -> CollectionResponse<Circular> {
        CollectionResponse {
            data: ids
                .iter()
                .map(|&id| Record {
                    id,
                    attributes: Circular::default(),
                })
                .collect(),
            meta: Meta {
                pagination: page_count.map(|c| PageMeta {
                    page_count: Some(c),
                    ..Default::default()
                }),
            },
        }
    }

    #[test]
    fn test_collection_url_basic() {
        let url = collection_url(
            "http://cms.local/",
            "circulars",
            "File",
            None,
            &ReportFilter::default(),
        );
        assert_eq!(url, "http://cms.local/api/circulars?populate=File&sort=id:desc");
    }

    #[test]
    fn test_collection_url_with_page_and_filters() {
        let filters = ReportFilter {
            month: Some("March 2024".to_string()),
            year: Some("2024".to_string()),
            quarter: Some("  ".to_string()),
            ..Default::default()
        };
        let url = collection_url(
            "http://cms.local",
            "generation-reports",
            "File",
            Some(PageRequest {
                page: 3,
                page_size: 100,
            }),
            &filters,
        );
        assert_eq!(
            url,
            "http://cms.local/api/generation-reports?populate=File&sort=id:desc&page=3&pageSize=100&month=March%202024&year=2024"
        );
        assert!(!filters.is_empty());
        assert!(ReportFilter::default().is_empty());
    }

    #[test]
    fn test_collect_pages_stops_at_empty_page() {
        let requested = RefCell::new(Vec::new());
        let pages = [vec![5, 4], vec![3, 2], vec![1], vec![]];

        let out = block_on(collect_pages(|page| {
            requested.borrow_mut().push(page);
            let ids = pages[(page - 1) as usize].clone();
            async move { Ok(page_of(&ids, None)) }
        }))
        .expect("walk should succeed");

        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
        assert_eq!(*requested.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_collect_pages_honours_page_count() {
        let requested = RefCell::new(0u32);
        let out = block_on(collect_pages(|page| {
            *requested.borrow_mut() = page;
            async move { Ok(page_of(&[u64::from(page)], Some(2))) }
        }))
        .expect("walk should succeed");

        assert_eq!(out.len(), 2);
        assert_eq!(*requested.borrow(), 2);
    }

    #[test]
    fn test_collect_pages_propagates_first_error() {
        let result = block_on(collect_pages(|page| async move {
            if page == 2 {
                Err(ApiError::Unauthorized)
            } else {
                Ok(page_of(&[1], None))
            }
        }));
        assert_eq!(result, Err(ApiError::Unauthorized));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from_status(401, r#"{"message":"Unauthorized"}"#),
            ApiError::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(400, r#"{"error":{"status":400,"message":"Invalid identifier or password"}}"#),
            ApiError::Http {
                status: 400,
                message: "Invalid identifier or password".to_string()
            }
        );
        assert_eq!(
            ApiError::from_status(502, "Bad Gateway"),
            ApiError::Http {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }

    #[test]
    fn test_legacy_error_body() {
        let body = r#"{"message":[{"messages":[{"id":"Auth.form.error","message":"Email already taken"}]}]}"#;
        assert_eq!(error_message_from_body(body), "Email already taken");
    }

    #[test]
    fn test_login_response_contract_deserialize() {
        let json = r#"{
            "jwt": "jwt-token",
            "user": {"id": 1, "username": "e1001", "email": "e1001@example.org", "firstName": "Ravi"}
        }"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.jwt, "jwt-token");
        assert_eq!(parsed.user.first_name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let v = serde_json::to_value(LoginRequest {
            employee_code: "1001".to_string(),
            password: "pass".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v["employeeCode"], "1001");

        let v = serde_json::to_value(ChangePasswordRequest {
            current_password: "old".to_string(),
            password: "new-secret".to_string(),
            password_confirmation: "new-secret".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v["currentPassword"], "old");
        assert_eq!(v["passwordConfirmation"], "new-secret");
    }

    #[test]
    fn test_api_client_session_state() {
        let session: Arc<dyn SessionProvider> = Arc::new(MemorySession::default());
        let client = ApiClient::new("http://cms.local/", session.clone());
        assert_eq!(client.base_url, "http://cms.local");
        assert!(!client.is_authenticated());

        session.set_token("abc");
        assert!(client.is_authenticated());

        client.logout();
        assert!(session.token().is_none());
    }

    #[test]
    fn test_with_auth_headers_sets_bearer() {
        let req = ApiClient::with_auth_headers(
            reqwest::Client::new().get("http://cms.local/api/circulars"),
            Some("my-jwt-token".to_string()),
        )
        .build()
        .expect("request should build");
        assert_eq!(
            req.headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer my-jwt-token")
        );
    }
}
