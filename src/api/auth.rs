//! WeChat Authentication API
//!
//! Login session exchange, access token retrieval, and UnionID lookup after
//! payment. All three are GET endpoints whose request fields travel as query
//! parameters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::endpoint::Endpoint;
use crate::api::r#trait::{WechatApi, WechatContext};
use crate::client::WechatClient;
use crate::encoding::ToQueryParams;
use crate::error::WechatError;

/// `grant_type` values accepted by the auth endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    ClientCredential,
}

/// code2Session request
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct Code2SessionRequest {
    /// Mini Program AppID
    pub appid: String,
    /// Mini Program AppSecret
    pub secret: String,
    /// Code obtained from `wx.login()`
    pub js_code: String,
}

impl Code2SessionRequest {
    pub fn new(
        appid: impl Into<String>,
        secret: impl Into<String>,
        js_code: impl Into<String>,
    ) -> Self {
        Self {
            appid: appid.into(),
            secret: secret.into(),
            js_code: js_code.into(),
        }
    }
}

#[derive(Serialize)]
struct Code2SessionQuery<'a> {
    appid: &'a str,
    secret: &'a str,
    js_code: &'a str,
    grant_type: GrantType,
}

impl ToQueryParams for Code2SessionQuery<'_> {}

/// Login response from code2Session API
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Code2SessionResponse {
    /// User's unique ID under the Mini Program
    #[serde(default)]
    pub openid: String,
    /// Session key for decrypting user data
    #[serde(default)]
    pub session_key: String,
    /// User's unique ID across the WeChat Open Platform, when bound
    #[serde(default)]
    pub unionid: Option<String>,
}

/// getAccessToken request
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct AccessTokenRequest {
    pub appid: String,
    pub secret: String,
}

impl AccessTokenRequest {
    pub fn new(appid: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            secret: secret.into(),
        }
    }
}

#[derive(Serialize)]
struct AccessTokenQuery<'a> {
    grant_type: GrantType,
    appid: &'a str,
    secret: &'a str,
}

impl ToQueryParams for AccessTokenQuery<'_> {}

/// Response from getAccessToken
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: String,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
}

/// getPaidUnionId request
///
/// Identify the payment either by `transaction_id`, or by `mch_id` together
/// with `out_trade_no`. With neither, the lookup covers payments made in the
/// last 5 minutes.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaidUnionIdRequest {
    pub openid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_trade_no: Option<String>,
}

impl PaidUnionIdRequest {
    pub fn new(openid: impl Into<String>) -> Self {
        Self {
            openid: openid.into(),
            ..Default::default()
        }
    }

    pub fn transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn merchant_order(
        mut self,
        mch_id: impl Into<String>,
        out_trade_no: impl Into<String>,
    ) -> Self {
        self.mch_id = Some(mch_id.into());
        self.out_trade_no = Some(out_trade_no.into());
        self
    }
}

impl ToQueryParams for PaidUnionIdRequest {}

/// Response from getPaidUnionId
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaidUnionIdResponse {
    #[serde(default)]
    pub unionid: String,
}

/// WeChat authentication API
pub struct AuthApi {
    context: Arc<WechatContext>,
}

impl AuthApi {
    /// Create a new AuthApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Exchange a `wx.login()` code for the user's session
    ///
    /// GET /sns/jscode2session
    ///
    /// # Errors
    /// `WechatError::MissingRequiredField` if `appid`, `secret` or `js_code`
    /// is empty; no request is sent in that case.
    pub async fn code2session(
        &self,
        request: &Code2SessionRequest,
    ) -> Result<Code2SessionResponse, WechatError> {
        WechatError::require("appid", &request.appid)?;
        WechatError::require("secret", &request.secret)?;
        WechatError::require("js_code", &request.js_code)?;

        let query = Code2SessionQuery {
            appid: &request.appid,
            secret: &request.secret,
            js_code: &request.js_code,
            grant_type: GrantType::AuthorizationCode,
        };

        self.context
            .client
            .get_json(Endpoint::Code2Session.path(), &query)
            .await
    }

    /// Get the Mini Program's global access token
    ///
    /// GET /cgi-bin/token
    ///
    /// The caller owns caching and refreshing the returned token.
    pub async fn get_access_token(
        &self,
        request: &AccessTokenRequest,
    ) -> Result<AccessTokenResponse, WechatError> {
        WechatError::require("appid", &request.appid)?;
        WechatError::require("secret", &request.secret)?;

        let query = AccessTokenQuery {
            grant_type: GrantType::ClientCredential,
            appid: &request.appid,
            secret: &request.secret,
        };

        self.context
            .client
            .get_json(Endpoint::GetAccessToken.path(), &query)
            .await
    }

    /// Get a user's UnionID after they completed a payment
    ///
    /// GET /wxa/getpaidunionid?access_token=ACCESS_TOKEN
    pub async fn get_paid_unionid(
        &self,
        access_token: &str,
        request: &PaidUnionIdRequest,
    ) -> Result<PaidUnionIdResponse, WechatError> {
        WechatError::require("access_token", access_token)?;
        WechatError::require("openid", &request.openid)?;

        let path = WechatClient::with_access_token(Endpoint::GetPaidUnionId.path(), access_token);
        self.context.client.get_json(&path, request).await
    }
}

impl WechatApi for AuthApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "auth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code2session_query_fixes_grant_type() {
        let query = Code2SessionQuery {
            appid: "wx1234567890abcdef",
            secret: "s",
            js_code: "c",
            grant_type: GrantType::AuthorizationCode,
        };
        let params = query.to_query_params().unwrap();
        assert!(params.contains(&(
            "grant_type".to_string(),
            "authorization_code".to_string()
        )));
        assert_eq!(params[0].0, "appid");
    }

    #[test]
    fn test_access_token_query_grant_type() {
        let query = AccessTokenQuery {
            grant_type: GrantType::ClientCredential,
            appid: "wx1",
            secret: "s",
        };
        let params = query.to_query_params().unwrap();
        assert_eq!(
            params[0],
            ("grant_type".to_string(), "client_credential".to_string())
        );
    }

    #[test]
    fn test_paid_unionid_request_omits_unset_fields() {
        let params = PaidUnionIdRequest::new("oUser")
            .transaction_id("4200000001")
            .to_query_params()
            .unwrap();
        assert_eq!(
            params,
            vec![
                ("openid".to_string(), "oUser".to_string()),
                ("transaction_id".to_string(), "4200000001".to_string()),
            ]
        );
    }

    #[test]
    fn test_paid_unionid_request_merchant_order() {
        let request = PaidUnionIdRequest::new("oUser").merchant_order("1230000109", "T20240101");
        let params = request.to_query_params().unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[2].0, "out_trade_no");
    }

    #[test]
    fn test_code2session_response_with_unionid() {
        let json = r#"{
            "openid": "oABC123xyz",
            "session_key": "test_session_key_abc",
            "unionid": "uABC123union"
        }"#;

        let response: Code2SessionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.openid, "oABC123xyz");
        assert_eq!(response.session_key, "test_session_key_abc");
        assert_eq!(response.unionid, Some("uABC123union".to_string()));
    }

    #[test]
    fn test_access_token_response_parse() {
        let json = r#"{"access_token": "ACCESS_TOKEN", "expires_in": 7200}"#;
        let response: AccessTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "ACCESS_TOKEN");
        assert_eq!(response.expires_in, 7200);
    }
}
