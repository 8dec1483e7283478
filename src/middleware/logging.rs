use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use http::StatusCode;
use log::{debug, info};
use reqwest::{Request, Response};
use tower::{Layer, Service};

const LOG_TARGET: &str = "wechat_mp_client::http";

/// Tower layer logging one line per request and one per response.
///
/// Credential query parameters are redacted before logging.
#[derive(Clone)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Log at `debug` level with the status reason phrase instead of `info`.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

const SENSITIVE_FIELDS: &[&str] = &[
    "access_token",
    "appsecret",
    "secret",
    "js_code",
    "session_key",
    "password",
    "token",
    "authorization",
];

/// Replace the values of credential-bearing query parameters with `[REDACTED]`.
pub(crate) fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let redacted_query = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, _)) if SENSITIVE_FIELDS.iter().any(|s| key.eq_ignore_ascii_case(s)) => {
                format!("{key}=[REDACTED]")
            }
            _ => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{redacted_query}")
}

fn log_request(method: &str, url: &str, verbose: bool) {
    let safe_url = redact_url(url);
    if verbose {
        debug!(target: LOG_TARGET, ">>> {} {}", method, safe_url);
    } else {
        info!(target: LOG_TARGET, "{} {}", method, safe_url);
    }
}

fn log_response(status: StatusCode, elapsed: Duration, verbose: bool) {
    if verbose {
        debug!(
            target: LOG_TARGET,
            "<<< {} - {} ({:?})",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            elapsed
        );
    } else {
        info!(target: LOG_TARGET, "{} ({:?})", status.as_u16(), elapsed);
    }
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().as_str().to_string();
        let url = req.url().to_string();
        let verbose = self.verbose;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            log_request(&method, &url, verbose);

            let start = Instant::now();
            let response = inner.call(req).await?;

            log_response(response.status(), start.elapsed(), verbose);

            Ok(response)
        })
    }
}
