//! Security API
//!
//! Content security checks.
//!
//! # Endpoints
//!
//! - [`SecurityApi::msg_sec_check`] - Check text content for policy violations
//! - [`SecurityApi::img_sec_check`] - Check an image upload for policy violations

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::common::ApiResponseBase;
use super::endpoint::Endpoint;
use super::{WechatApi, WechatContext};
use crate::client::{MultipartField, WechatClient};
use crate::error::WechatError;

const MSG_SEC_CHECK_VERSION: u8 = 2;

/// Scene the checked text comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecCheckScene {
    Profile = 1,
    Comment = 2,
    Forum = 3,
    SocialLog = 4,
}

impl Serialize for SecCheckScene {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// msgSecCheck request
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct MsgSecCheckRequest {
    /// Author of the content; must have visited the Mini Program recently
    pub openid: String,
    pub scene: SecCheckScene,
    /// Text to check, at most 2500 characters
    pub content: String,
    pub title: Option<String>,
    pub nickname: Option<String>,
    pub signature: Option<String>,
}

impl MsgSecCheckRequest {
    pub fn new(openid: impl Into<String>, scene: SecCheckScene, content: impl Into<String>) -> Self {
        Self {
            openid: openid.into(),
            scene,
            content: content.into(),
            title: None,
            nickname: None,
            signature: None,
        }
    }
}

#[derive(Serialize)]
struct MsgSecCheckBody<'a> {
    version: u8,
    openid: &'a str,
    scene: SecCheckScene,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nickname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<&'a str>,
}

/// Detail item from message security check
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MsgSecCheckDetail {
    #[serde(default)]
    pub strategy: String,
    /// Per-strategy code; independent of the envelope `errcode`
    #[serde(default)]
    pub errcode: i32,
    /// "pass", "risky", or "review"
    #[serde(default)]
    pub suggest: String,
    /// 100 = normal, 10001 = advertising, ...
    #[serde(default)]
    pub label: i32,
    #[serde(default)]
    pub keyword: String,
    /// Confidence, 0-100
    #[serde(default)]
    pub prob: i32,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MsgSecCheckResult {
    #[serde(default)]
    pub suggest: String,
    #[serde(default)]
    pub label: i32,
}

/// Response from msgSecCheck
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MsgSecCheckResponse {
    #[serde(default)]
    pub result: MsgSecCheckResult,
    #[serde(default)]
    pub detail: Vec<MsgSecCheckDetail>,
    #[serde(default)]
    pub trace_id: String,
}

impl MsgSecCheckResponse {
    pub fn is_pass(&self) -> bool {
        self.result.suggest == "pass"
    }
}

pub struct SecurityApi {
    context: Arc<WechatContext>,
}

impl SecurityApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Check text for policy violations
    ///
    /// POST /wxa/msg_sec_check?access_token=ACCESS_TOKEN
    pub async fn msg_sec_check(
        &self,
        access_token: &str,
        request: &MsgSecCheckRequest,
    ) -> Result<MsgSecCheckResponse, WechatError> {
        WechatError::require("access_token", access_token)?;
        WechatError::require("openid", &request.openid)?;
        WechatError::require("content", &request.content)?;

        let body = MsgSecCheckBody {
            version: MSG_SEC_CHECK_VERSION,
            openid: &request.openid,
            scene: request.scene,
            content: &request.content,
            title: request.title.as_deref(),
            nickname: request.nickname.as_deref(),
            signature: request.signature.as_deref(),
        };

        let path = WechatClient::with_access_token(Endpoint::MsgSecCheck.path(), access_token);
        self.context.client.post_json(&path, &body).await
    }

    /// Check an image synchronously
    ///
    /// POST /wxa/img_sec_check?access_token=ACCESS_TOKEN
    ///
    /// A violating image is reported by the API as errcode 87014, which
    /// surfaces as `WechatError::Api`.
    ///
    /// `reader` is drained with blocking reads before the request is sent,
    /// so pass in-memory content (e.g. `Cursor<Vec<u8>>`).
    pub async fn img_sec_check(
        &self,
        access_token: &str,
        filename: &str,
        reader: impl Read + Send + 'static,
    ) -> Result<ApiResponseBase, WechatError> {
        WechatError::require("access_token", access_token)?;
        WechatError::require("filename", filename)?;

        let path = WechatClient::with_access_token(Endpoint::ImgSecCheck.path(), access_token);
        let fields = vec![MultipartField::file("media", filename, reader)];
        self.context.client.post_multipart(&path, fields).await
    }
}

impl WechatApi for SecurityApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "security"
    }
}
