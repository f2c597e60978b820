//! Request client bound to a fixed base URL
//!
//! Every backend call goes through [`ApiClient`], which owns the path building,
//! JSON encoding, and the translation of non-success responses into
//! [`Error::Backend`] carrying the backend's `detail` message.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use mlops_core::prelude::*;

/// Configured HTTP client for one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    request_timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// `timeout` bounds ordinary request/response calls. Streaming calls
    /// made through [`ApiClient::stream`] are not subject to it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{base_url}: not a base URL")));
        }
        // Path segments are appended, so the base must not end in a file part
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            request_timeout: timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the URL for `segments` below the base.
    ///
    /// Each segment is percent-encoded, so names containing `/` or spaces
    /// are addressed as a single path component.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).timeout(self.request_timeout)
    }

    pub async fn get_json<T>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);
        let response = send(self.request(Method::GET, url).query(query)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!("POST {}", url);
        let response = send(self.request(Method::POST, url).json(body)).await?;
        decode(response).await
    }

    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!("PUT {}", url);
        let response = send(self.request(Method::PUT, url).json(body)).await?;
        decode(response).await
    }

    /// `DELETE`; any response body (204 or a JSON message) is discarded.
    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        debug!("DELETE {}", url);
        send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Open a long-lived `GET` whose body is consumed incrementally.
    pub async fn stream(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!("GET (stream) {}", url);
        send(self.http.get(url).query(query)).await
    }
}

/// Send a request and reject non-success statuses.
async fn send(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await.map_err(transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body).unwrap_or_else(|| fallback_detail(status, &body));
    warn!("Backend returned {}: {}", status, detail);
    Err(Error::backend(status.as_u16(), detail))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    // 204 and empty bodies decode as JSON null
    if bytes.is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::http(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        Error::http(format!("Could not connect to backend: {e}"))
    } else {
        Error::http(e.to_string())
    }
}

/// Pull the user-facing message out of a `{"detail": ...}` error body.
///
/// `detail` is usually a string. Request validation failures carry a list
/// of `{"msg": ...}` objects instead, which are joined.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn fallback_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('<') {
        return format!("HTTP {}: {}", status.as_u16(), body);
    }
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let c = client("http://localhost:8000");
        let url = c.endpoint(&["codes", "7", "versions"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/codes/7/versions");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("http://gateway/api/v1");
        let url = c.endpoint(&["clusters"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway/api/v1/clusters");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let c = client("http://localhost:8000/");
        let url = c.endpoint(&["clusters", "my cluster/x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/clusters/my%20cluster%2Fx");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail": "Code not found"}"#),
            Some("Code not found".to_string())
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"},
                                  {"loc": ["body", "content"], "msg": "field required"}]}"#;
        assert_eq!(
            extract_detail(body),
            Some("field required; field required".to_string())
        );
    }

    #[test]
    fn test_extract_detail_missing() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"message": "x"}"#), None);
    }

    #[test]
    fn test_fallback_detail() {
        assert_eq!(
            fallback_detail(StatusCode::BAD_GATEWAY, "<html>..</html>"),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            fallback_detail(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "HTTP 500: boom"
        );
    }
}
