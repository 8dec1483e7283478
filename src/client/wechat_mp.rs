//! Unified WeChat Mini Program client

use std::io::Read;
use std::sync::Arc;

use crate::api::analytics::{
    AnalyticsApi, AnalyticsDateRangeRequest, AnalyticsResponse, DailySummaryResponse,
    RetainResponse, VisitTrendResponse,
};
use crate::api::auth::{
    AccessTokenRequest, AccessTokenResponse, AuthApi, Code2SessionRequest, Code2SessionResponse,
    PaidUnionIdRequest, PaidUnionIdResponse,
};
use crate::api::common::ApiResponseBase;
use crate::api::media::{MediaApi, MediaType, MediaUploadResponse};
use crate::api::security::{MsgSecCheckRequest, MsgSecCheckResponse, SecurityApi};
use crate::api::WechatContext;
use crate::error::WechatError;

use super::builder::WechatMpBuilder;
use super::WechatClient;

/// Unified WeChat Mini Program client
///
/// This is the main entry point of the crate. Every call performs exactly one
/// HTTP round trip; access tokens are supplied by the caller.
///
/// # Example
///
/// ```rust,ignore
/// use wechat_mp_client::WechatMp;
/// use wechat_mp_client::api::Code2SessionRequest;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let wechat = WechatMp::builder().build()?;
///
///     let session = wechat
///         .code2session(&Code2SessionRequest::new("wx1234567890abcdef", "secret", "code"))
///         .await?;
///     println!("OpenID: {}", session.openid);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WechatMp {
    context: Arc<WechatContext>,
}

impl std::fmt::Debug for WechatMp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatMp")
            .field("base_url", &self.context.client.base_url())
            .finish()
    }
}

impl From<Arc<WechatContext>> for WechatMp {
    fn from(context: Arc<WechatContext>) -> Self {
        Self { context }
    }
}

impl WechatMp {
    pub fn builder() -> WechatMpBuilder {
        WechatMpBuilder::default()
    }

    pub fn client(&self) -> &WechatClient {
        &self.context.client
    }

    pub fn context(&self) -> Arc<WechatContext> {
        Arc::clone(&self.context)
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.context())
    }

    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(self.context())
    }

    pub fn media(&self) -> MediaApi {
        MediaApi::new(self.context())
    }

    pub fn security(&self) -> SecurityApi {
        SecurityApi::new(self.context())
    }

    // Auth API

    pub async fn code2session(
        &self,
        request: &Code2SessionRequest,
    ) -> Result<Code2SessionResponse, WechatError> {
        self.auth().code2session(request).await
    }

    pub async fn get_access_token(
        &self,
        request: &AccessTokenRequest,
    ) -> Result<AccessTokenResponse, WechatError> {
        self.auth().get_access_token(request).await
    }

    pub async fn get_paid_unionid(
        &self,
        access_token: &str,
        request: &PaidUnionIdRequest,
    ) -> Result<PaidUnionIdResponse, WechatError> {
        self.auth().get_paid_unionid(access_token, request).await
    }

    // Analytics API

    pub async fn get_daily_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.analytics().get_daily_retain(access_token, request).await
    }

    pub async fn get_weekly_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.analytics().get_weekly_retain(access_token, request).await
    }

    pub async fn get_monthly_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.analytics()
            .get_monthly_retain(access_token, request)
            .await
    }

    pub async fn get_daily_summary(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<DailySummaryResponse, WechatError> {
        self.analytics().get_daily_summary(access_token, request).await
    }

    pub async fn get_daily_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.analytics()
            .get_daily_visit_trend(access_token, request)
            .await
    }

    pub async fn get_weekly_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.analytics()
            .get_weekly_visit_trend(access_token, request)
            .await
    }

    pub async fn get_monthly_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.analytics()
            .get_monthly_visit_trend(access_token, request)
            .await
    }

    pub async fn get_user_portrait(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.analytics().get_user_portrait(access_token, request).await
    }

    pub async fn get_visit_distribution(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.analytics()
            .get_visit_distribution(access_token, request)
            .await
    }

    pub async fn get_visit_page(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.analytics().get_visit_page(access_token, request).await
    }

    // Media API

    pub async fn upload_temp_media(
        &self,
        access_token: &str,
        media_type: MediaType,
        filename: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<MediaUploadResponse, WechatError> {
        self.media()
            .upload_temp_media(access_token, media_type, filename, data)
            .await
    }

    pub async fn upload_temp_media_from(
        &self,
        access_token: &str,
        media_type: MediaType,
        filename: &str,
        reader: impl Read + Send + 'static,
    ) -> Result<MediaUploadResponse, WechatError> {
        self.media()
            .upload_temp_media_from(access_token, media_type, filename, reader)
            .await
    }

    // Security API

    pub async fn msg_sec_check(
        &self,
        access_token: &str,
        request: &MsgSecCheckRequest,
    ) -> Result<MsgSecCheckResponse, WechatError> {
        self.security().msg_sec_check(access_token, request).await
    }

    pub async fn img_sec_check(
        &self,
        access_token: &str,
        filename: &str,
        reader: impl Read + Send + 'static,
    ) -> Result<ApiResponseBase, WechatError> {
        self.security()
            .img_sec_check(access_token, filename, reader)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wechat_mp_shares_context() {
        let wechat = WechatMp::builder().build().unwrap();
        let cloned = wechat.clone();
        assert!(Arc::ptr_eq(&wechat.context(), &cloned.context()));
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        // Unroutable base URL: any request that escaped validation would fail as transport.
        let wechat = WechatMp::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let err = wechat
            .get_daily_retain("", &AnalyticsDateRangeRequest::new("20170313", "20170313"))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = wechat
            .code2session(&Code2SessionRequest::new("", "secret", "code"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WechatError::MissingRequiredField { field: "appid" }
        ));
    }
}
