//! WeChat HTTP Client
//!
//! The JSON-over-HTTP pipeline shared by every endpoint:
//!
//! - [`WechatClient::get_json`]: request fields become query parameters
//! - [`WechatClient::post_json`]: request is sent as a JSON body
//! - [`WechatClient::post_multipart`]: fields are sent as `multipart/form-data`
//!
//! All three require HTTP 200, buffer the body, and hand it to
//! [`decode_response`](crate::api::common::decode_response), which checks
//! `errcode` before decoding the result type.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::Service;

use super::multipart::{build_form, MultipartField};
use crate::api::common::decode_response;
use crate::encoding::{merge_query, ToQueryParams};
use crate::error::{EncodingError, HttpError, WechatError};
use crate::middleware::redact_url;
use crate::pool::{BufferPool, DEFAULT_POOL_CAPACITY};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const TEXT_BUFFER_SIZE: usize = 4 * 1024;
const MEDIA_BUFFER_SIZE: usize = 64 * 1024;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat API Client
///
/// Cheap to clone; clones share the connection pool and buffer pools, so
/// build one per process and share it.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    base_url: String,
    text_pool: BufferPool,
    media_pool: BufferPool,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("base_url", &self.base_url)
            .field("text_pool", &self.text_pool)
            .field("media_pool", &self.media_pool)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> WechatClientBuilder {
        WechatClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pool of buffers used for JSON bodies and response bodies.
    pub fn text_pool(&self) -> &BufferPool {
        &self.text_pool
    }

    /// Pool of buffers used to stage multipart file content.
    pub fn media_pool(&self) -> &BufferPool {
        &self.media_pool
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Append a percent-encoded `access_token` query parameter to `path`.
    pub fn with_access_token(path: &str, access_token: &str) -> String {
        let encoded = utf8_percent_encode(access_token, NON_ALPHANUMERIC);
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}access_token={encoded}")
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    fn endpoint_url(&self, path: &str, params: &[(String, String)]) -> Result<String, WechatError> {
        merge_query(&format!("{}{}", self.base_url, path), params)
    }

    async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, WechatError> {
        let method = request.method().clone();
        let safe_url = redact_url(request.url().as_str());
        debug!("{} {}", method, safe_url);

        let mut response = self.send_request(request).await.map_err(HttpError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("{} {} returned {}", method, safe_url, status);
            return Err(HttpError::Status { status }.into());
        }

        let mut body = self.text_pool.acquire();
        while let Some(chunk) = response.chunk().await.map_err(HttpError::from)? {
            body.extend_from_slice(&chunk);
        }
        drop(response);

        let result = decode_response(&body);
        if let Err(WechatError::Api { code, message }) = &result {
            warn!("{} {} errcode {}: {}", method, safe_url, code, message);
        }
        result
    }

    /// Make a GET request, sending `request` as query parameters
    ///
    /// # Arguments
    /// * `path` - API endpoint path, may already carry a query (e.g. `access_token`)
    /// * `request` - Flat request; fields are merged into the query string
    ///
    /// # Errors
    /// - `WechatError::Encoding` if the request has non-scalar fields or the URL is malformed
    /// - `WechatError::Http` on network failure, timeout, or any status other than 200
    /// - `WechatError::Api` when WeChat API returns errcode != 0
    /// - `WechatError::Decode` when the body is not the expected JSON
    pub async fn get_json<Q, T>(&self, path: &str, request: &Q) -> Result<T, WechatError>
    where
        Q: ToQueryParams + ?Sized,
        T: DeserializeOwned,
    {
        let params = request.to_query_params()?;
        let url = self.endpoint_url(path, &params)?;
        let request = self.http.get(url).build()?;
        self.execute(request).await
    }

    /// Make a POST request with `body` serialized as JSON
    ///
    /// # Errors
    /// Same as [`get_json`](Self::get_json); `WechatError::Encoding` also
    /// covers JSON serialization failures.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, WechatError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(path, &[])?;

        let payload = {
            let mut buffer = self.text_pool.acquire();
            serde_json::to_writer(&mut *buffer, body).map_err(EncodingError::Json)?;
            buffer.to_vec()
        };

        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .body(payload)
            .build()?;
        self.execute(request).await
    }

    /// Make a POST request with a `multipart/form-data` body
    ///
    /// # Errors
    /// Same as [`get_json`](Self::get_json); `WechatError::Encoding` also
    /// covers failures reading a file field.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
    ) -> Result<T, WechatError> {
        let url = self.endpoint_url(path, &[])?;
        let form = build_form(fields, &self.media_pool)?;
        let request = self.http.post(url).multipart(form).build()?;
        self.execute(request).await
    }
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for WechatClient
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use wechat_mp_client::client::WechatClient;
///
/// let client = WechatClient::builder()
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url(), "https://api.weixin.qq.com");
/// ```
#[derive(Debug, Default)]
pub struct WechatClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_capacity: Option<usize>,
}

impl WechatClientBuilder {
    /// Set the base URL for API calls
    ///
    /// Default: `<https://api.weixin.qq.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for one round trip
    ///
    /// Default: 5 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 3 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set how many idle buffers each buffer pool retains
    ///
    /// Default: 16
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }

    /// Build the WechatClient
    ///
    /// # Errors
    /// Returns `WechatError::Config` if the base URL is not http(s) or the
    /// TLS backend cannot be initialized
    pub fn build(self) -> Result<WechatClient, WechatError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(WechatError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        let pool_capacity = self.pool_capacity.unwrap_or(DEFAULT_POOL_CAPACITY);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| WechatError::Config(format!("http client: {e}")))?;

        Ok(WechatClient {
            http: client,
            base_url,
            text_pool: BufferPool::new(pool_capacity, TEXT_BUFFER_SIZE),
            media_pool: BufferPool::new(pool_capacity, MEDIA_BUFFER_SIZE),
            middleware_executor: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default_values() {
        let client = WechatClient::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.text_pool().idle(), 0);
    }

    #[test]
    fn test_builder_custom_base_url() {
        let client = WechatClient::builder()
            .base_url("https://custom.api.example.com/")
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://custom.api.example.com");
    }

    #[test]
    fn test_builder_custom_timeouts() {
        let client = WechatClient::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .pool_capacity(2)
            .build()
            .unwrap();

        // reqwest::Client doesn't expose timeout getters; the builder
        // accepting the values and producing a client is what is checked.
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_rejects_non_http_base_url() {
        let result = WechatClient::builder().base_url("ftp://example.com").build();
        assert!(matches!(result, Err(WechatError::Config(_))));
    }

    #[test]
    fn test_with_access_token_appends_query() {
        assert_eq!(
            WechatClient::with_access_token("/wxa/getpaidunionid", "abc"),
            "/wxa/getpaidunionid?access_token=abc"
        );
        assert_eq!(
            WechatClient::with_access_token("/cgi-bin/media/upload?type=image", "abc"),
            "/cgi-bin/media/upload?type=image&access_token=abc"
        );
    }

    #[test]
    fn test_with_access_token_percent_encodes() {
        assert_eq!(
            WechatClient::with_access_token("/x", "a+b/c=="),
            "/x?access_token=a%2Bb%2Fc%3D%3D"
        );
    }

    #[test]
    fn test_endpoint_url_merges_params() {
        let client = WechatClient::builder().build().unwrap();
        let url = client
            .endpoint_url(
                "/sns/jscode2session",
                &[("appid".to_string(), "wx1".to_string())],
            )
            .unwrap();
        assert_eq!(url, "https://api.weixin.qq.com/sns/jscode2session?appid=wx1");
    }
}
