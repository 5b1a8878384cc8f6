//! File downloads for record attachments.
//!
//! Public files are opened through a launcher window so the browser's own
//! download handling applies. Protected files are fetched with the bearer
//! token and saved from a temporary object URL.

use crate::models::FileRef;
use crate::session::SessionProvider;
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DownloadError {
    #[error("record has no attached file")]
    MissingFile,
    #[error("download window was blocked")]
    PopupBlocked,
    #[error("file request failed with status {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("browser error: {0}")]
    Browser(String),
}

impl DownloadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingFile => "No file is attached to this record.",
            Self::PopupBlocked => "Pop-up blocked. Allow pop-ups for this site to download files.",
            Self::Http(401) | Self::Http(403) => {
                "You are not allowed to download this file. Please sign in again."
            }
            Self::Http(404) => "The file could not be found on the server.",
            Self::Http(_) => "The server could not provide this file. Please try again later.",
            Self::Network(_) => "Download failed. Check your connection and try again.",
            Self::Browser(_) => "Your browser could not save this file.",
        }
    }
}

fn browser_err(e: JsValue) -> DownloadError {
    DownloadError::Browser(format!("{e:?}"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DownloadMode {
    /// Navigate a new window to the file URL.
    Window,
    /// Fetch with the bearer token and save the body.
    AuthenticatedBlob,
}

impl DownloadMode {
    pub fn for_resource(requires_auth: bool) -> Self {
        if requires_auth {
            Self::AuthenticatedBlob
        } else {
            Self::Window
        }
    }
}

pub(crate) fn resolve_file_url(base_url: &str, relative: Option<&str>) -> Result<String, DownloadError> {
    let path = relative
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(DownloadError::MissingFile)?;

    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(path.to_string());
    }

    Ok(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Last path segment of `url`, percent-decoded, without query or fragment.
pub(crate) fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if decoded.trim().is_empty() {
        "download".to_string()
    } else {
        decoded
    }
}

/// Absolute URL for `file` and the name it is saved under.
///
/// The saved name is always the URL's trailing path segment; the media
/// record's display name is ignored.
pub(crate) fn download_target(base_url: &str, file: Option<&FileRef>) -> Result<(String, String), DownloadError> {
    let full_url = resolve_file_url(base_url, file.map(|f| f.url.as_str()))?;
    let file_name = file_name_from_url(&full_url);
    Ok((full_url, file_name))
}

/// HTML written into the launcher window; navigates to `url` once loaded.
pub(crate) fn launcher_html(url: &str) -> String {
    // A JSON string is a valid JS string literal; `</` is split so the URL
    // cannot close the script element.
    let literal = serde_json::to_string(url)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!(
        "<!DOCTYPE html><html><head><title>Downloading…</title></head>\
         <body onload=\"window.location.href = {}\">\
         <p>Your download will start shortly.</p></body></html>",
        html_attr_escape(&literal)
    )
}

fn html_attr_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The browser steps of saving bytes as a file.
pub(crate) trait BlobSink {
    fn create_object_url(&mut self, bytes: &[u8], mime: Option<&str>) -> Result<String, DownloadError>;
    /// Create a hidden anchor with `download=file_name`, click it and remove it.
    fn click_anchor(&mut self, object_url: &str, file_name: &str) -> Result<(), DownloadError>;
    fn revoke_object_url(&mut self, object_url: &str);
}

/// Save `bytes` through `sink`. The object URL is revoked exactly once,
/// whether or not the click succeeded.
pub(crate) fn save_blob(
    sink: &mut impl BlobSink,
    bytes: &[u8],
    mime: Option<&str>,
    file_name: &str,
) -> Result<(), DownloadError> {
    let object_url = sink.create_object_url(bytes, mime)?;
    let clicked = sink.click_anchor(&object_url, file_name);
    sink.revoke_object_url(&object_url);
    clicked
}

pub(crate) struct BrowserBlobSink;

impl BlobSink for BrowserBlobSink {
    fn create_object_url(&mut self, bytes: &[u8], mime: Option<&str>) -> Result<String, DownloadError> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));

        let options = web_sys::BlobPropertyBag::new();
        if let Some(mime) = mime {
            options.set_type(mime);
        }

        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(browser_err)?;
        web_sys::Url::create_object_url_with_blob(&blob).map_err(browser_err)
    }

    fn click_anchor(&mut self, object_url: &str, file_name: &str) -> Result<(), DownloadError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DownloadError::Browser("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| DownloadError::Browser("no body".to_string()))?;

        let anchor = document
            .create_element("a")
            .map_err(browser_err)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| DownloadError::Browser("anchor cast failed".to_string()))?;
        anchor.set_href(object_url);
        anchor.set_download(file_name);
        let _ = anchor.set_attribute("style", "display: none");

        body.append_child(&anchor).map_err(browser_err)?;
        anchor.click();
        anchor.remove();
        Ok(())
    }

    fn revoke_object_url(&mut self, object_url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(object_url) {
            warn!("revoking object URL failed: {e:?}");
        }
    }
}

/// Open a launcher window that navigates to `full_url`.
pub(crate) fn open_in_window(full_url: &str) -> Result<(), DownloadError> {
    let window = web_sys::window().ok_or_else(|| DownloadError::Browser("no window".to_string()))?;
    let popup = window
        .open_with_url_and_target("", "_blank")
        .map_err(browser_err)?
        .ok_or(DownloadError::PopupBlocked)?;

    let document = popup
        .document()
        .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        .ok_or(DownloadError::PopupBlocked)?;

    let html = js_sys::Array::of1(&JsValue::from_str(&launcher_html(full_url)));
    document.write(&html).map_err(browser_err)?;
    document.close().map_err(browser_err)?;
    Ok(())
}

/// Fetch `full_url` with the bearer token and save the body as `file_name`.
pub(crate) async fn fetch_and_save(
    full_url: &str,
    file_name: &str,
    token: Option<String>,
) -> Result<(), DownloadError> {
    let mut req = reqwest::Client::new().get(full_url);
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let res = req
        .send()
        .await
        .map_err(|e| DownloadError::Network(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        return Err(DownloadError::Http(status.as_u16()));
    }

    let mime = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = res
        .bytes()
        .await
        .map_err(|e| DownloadError::Network(e.to_string()))?;

    debug!("saving {} bytes from {full_url}", bytes.len());
    save_blob(&mut BrowserBlobSink, &bytes, mime.as_deref(), file_name)
}

/// Download `file` using `mode`. Failures are logged and handed back for display.
pub(crate) async fn download_file(
    base_url: &str,
    file: Option<&FileRef>,
    mode: DownloadMode,
    session: &dyn SessionProvider,
) -> Result<(), DownloadError> {
    let result = match download_target(base_url, file) {
        Ok((full_url, file_name)) => match mode {
            DownloadMode::Window => open_in_window(&full_url),
            DownloadMode::AuthenticatedBlob => fetch_and_save(&full_url, &file_name, session.token()).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        warn!("download failed: {e}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use futures::executor::block_on;

    #[derive(Default)]
    struct RecordingSink {
        created: Vec<(usize, Option<String>)>,
        clicked: Vec<(String, String)>,
        revoked: Vec<String>,
        fail_click: bool,
    }

    impl BlobSink for RecordingSink {
        fn create_object_url(
            &mut self,
            bytes: &[u8],
            mime: Option<&str>,
        ) -> Result<String, DownloadError> {
            self.created.push((bytes.len(), mime.map(str::to_string)));
            Ok(format!("blob:test/{}", self.created.len()))
        }

        fn click_anchor(&mut self, object_url: &str, file_name: &str) -> Result<(), DownloadError> {
            if self.fail_click {
                return Err(DownloadError::Browser("click".to_string()));
            }
            self.clicked.push((object_url.to_string(), file_name.to_string()));
            Ok(())
        }

        fn revoke_object_url(&mut self, object_url: &str) {
            self.revoked.push(object_url.to_string());
        }
    }

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_file_url("http://cms.local/", Some("/uploads/a.pdf")),
            Ok("http://cms.local/uploads/a.pdf".to_string())
        );
        assert_eq!(
            resolve_file_url("http://cms.local", Some("uploads/a.pdf")),
            Ok("http://cms.local/uploads/a.pdf".to_string())
        );
        assert_eq!(
            resolve_file_url("http://cms.local", Some("https://cdn.example.org/a.pdf")),
            Ok("https://cdn.example.org/a.pdf".to_string())
        );
        assert_eq!(resolve_file_url("http://cms.local", None), Err(DownloadError::MissingFile));
        assert_eq!(resolve_file_url("http://cms.local", Some("  ")), Err(DownloadError::MissingFile));
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("/uploads/a%20b.pdf?x=1"), "a b.pdf");
        assert_eq!(file_name_from_url("http://cms.local/uploads/order_17.pdf#page=2"), "order_17.pdf");
        assert_eq!(file_name_from_url("http://cms.local/uploads/dir/"), "dir");
        assert_eq!(file_name_from_url(""), "download");
    }

    #[test]
    fn test_saved_name_comes_from_url_not_media_name() {
        let file = FileRef {
            url: "/uploads/c_12_ab3f.pdf".to_string(),
            name: "Circular 12.pdf".to_string(),
        };
        let (full_url, file_name) = download_target("http://cms.local/", Some(&file)).unwrap();
        assert_eq!(full_url, "http://cms.local/uploads/c_12_ab3f.pdf");
        assert_eq!(file_name, "c_12_ab3f.pdf");

        let blank_name = FileRef {
            url: "https://cdn.example.org/media/order%2017.pdf?v=2".to_string(),
            name: String::new(),
        };
        let (_, file_name) = download_target("http://cms.local", Some(&blank_name)).unwrap();
        assert_eq!(file_name, "order 17.pdf");

        assert_eq!(download_target("http://cms.local", None), Err(DownloadError::MissingFile));
    }

    #[test]
    fn test_mode_follows_resource_flag() {
        assert_eq!(DownloadMode::for_resource(true), DownloadMode::AuthenticatedBlob);
        assert_eq!(DownloadMode::for_resource(false), DownloadMode::Window);
    }

    #[test]
    fn test_save_blob_clicks_then_revokes_once() {
        let mut sink = RecordingSink::default();
        save_blob(&mut sink, b"%PDF-1.7", Some("application/pdf"), "order_17.pdf")
            .expect("save should succeed");

        assert_eq!(sink.created, vec![(8, Some("application/pdf".to_string()))]);
        assert_eq!(
            sink.clicked,
            vec![("blob:test/1".to_string(), "order_17.pdf".to_string())]
        );
        assert_eq!(sink.revoked, vec!["blob:test/1".to_string()]);
    }

    #[test]
    fn test_save_blob_revokes_even_when_click_fails() {
        let mut sink = RecordingSink {
            fail_click: true,
            ..Default::default()
        };
        let result = save_blob(&mut sink, b"data", None, "x.bin");
        assert!(matches!(result, Err(DownloadError::Browser(_))));
        assert_eq!(sink.revoked.len(), 1);
    }

    #[test]
    fn test_launcher_html_escapes_url() {
        let html = launcher_html("http://cms.local/uploads/a\".pdf</script>");
        assert!(html.contains("onload=\"window.location.href = &quot;http://cms.local/uploads/a\\&quot;.pdf&lt;\\/script&gt;&quot;\""));
        assert!(!html.contains("</script>"));
    }

    #[test]
    fn test_download_without_file_fails_before_any_request() {
        let session = MemorySession::with_token("t");
        for mode in [DownloadMode::Window, DownloadMode::AuthenticatedBlob] {
            let result = block_on(download_file("http://cms.local", None, mode, &session));
            assert_eq!(result, Err(DownloadError::MissingFile));
        }
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let errors = [
            DownloadError::MissingFile,
            DownloadError::PopupBlocked,
            DownloadError::Http(500),
            DownloadError::Network("x".to_string()),
        ];
        let mut messages: Vec<&str> = errors.iter().map(DownloadError::user_message).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }
}
