use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::api::WechatContext;
use crate::error::WechatError;

use super::wechat_client::{MiddlewareExecutor, WechatClient};
use super::WechatMp;

#[must_use]
#[derive(Default)]
pub struct WechatMpBuilder<M = ()> {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_capacity: Option<usize>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for WechatMpBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatMpBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("pool_capacity", &self.pool_capacity)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<M> WechatMpBuilder<M> {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }

    /// Route every request through `middleware`.
    pub fn with_middleware<M2>(self, middleware: M2) -> WechatMpBuilder<M2>
    where
        M2: Layer<WechatClient> + Clone + Send + Sync + 'static,
    {
        WechatMpBuilder {
            base_url: self.base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            pool_capacity: self.pool_capacity,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<WechatMp, WechatError>
    where
        M: Layer<WechatClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let mut builder = WechatClient::builder();
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(capacity) = self.pool_capacity {
            builder = builder.pool_capacity(capacity);
        }
        let mut client = builder.build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let context = Arc::new(WechatContext::new(Arc::new(client)));
        Ok(WechatMp::from(context))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
            as Pin<Box<dyn Future<Output = Result<ReqwestResponse, reqwest::Error>> + Send>>
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use tower::{Layer, Service};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::Code2SessionRequest;

    fn session_body() -> serde_json::Value {
        serde_json::json!({
            "openid": "test_openid",
            "session_key": "test_session_key",
            "unionid": null,
            "errcode": 0,
            "errmsg": "ok"
        })
    }

    #[test]
    fn test_builder_default_values() {
        let wechat = WechatMp::builder().build().unwrap();
        assert_eq!(wechat.client().base_url(), "https://api.weixin.qq.com");
    }

    #[test]
    fn test_builder_custom_values() {
        let wechat = WechatMp::builder()
            .base_url("https://custom.api.example.com")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .pool_capacity(4)
            .build()
            .unwrap();

        assert_eq!(wechat.client().base_url(), "https://custom.api.example.com");
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = WechatMp::builder().base_url("api.weixin.qq.com").build();
        assert!(matches!(result, Err(WechatError::Config(_))));
    }

    #[tokio::test]
    async fn test_middleware_configured_and_executes() {
        #[derive(Clone)]
        struct FlagLayer {
            flag: Arc<AtomicBool>,
        }

        impl Layer<WechatClient> for FlagLayer {
            type Service = FlagService;

            fn layer(&self, inner: WechatClient) -> Self::Service {
                FlagService {
                    inner,
                    flag: Arc::clone(&self.flag),
                }
            }
        }

        #[derive(Clone)]
        struct FlagService {
            inner: WechatClient,
            flag: Arc<AtomicBool>,
        }

        impl Service<ReqwestRequest> for FlagService {
            type Response = ReqwestResponse;
            type Error = reqwest::Error;
            type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: ReqwestRequest) -> Self::Future {
                self.flag.store(true, Ordering::SeqCst);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
        }

        let middleware_invoked = Arc::new(AtomicBool::new(false));
        let layer = FlagLayer {
            flag: Arc::clone(&middleware_invoked),
        };

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sns/jscode2session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(&mock_server)
            .await;

        let wechat = WechatMp::builder()
            .base_url(mock_server.uri())
            .with_middleware(layer)
            .build()
            .unwrap();

        let request = Code2SessionRequest::new("wx1234567890abcdef", "secret", "mock_js_code");
        wechat.code2session(&request).await.unwrap();

        assert!(middleware_invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_builder_with_logging_middleware_builds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sns/jscode2session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(&mock_server)
            .await;

        let wechat = WechatMp::builder()
            .base_url(mock_server.uri())
            .with_middleware(crate::middleware::LoggingMiddleware::new())
            .build()
            .unwrap();

        let request = Code2SessionRequest::new("wx1234567890abcdef", "secret", "mock_js_code");
        let session = wechat.code2session(&request).await.unwrap();
        assert_eq!(session.openid, "test_openid");
    }
}
