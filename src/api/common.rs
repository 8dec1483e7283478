//! Common API response primitives
//!
//! Every WeChat response body may carry `errcode` / `errmsg`. A zero (or
//! absent) `errcode` means success.
//!
//! [`decode_response`] is the single place where this envelope is checked:
//! it reads the envelope first and only decodes the caller's type when the
//! code is zero. Response types elsewhere in the crate therefore hold data
//! fields only.
//!
//! ```rust
//! use wechat_mp_client::api::common::{decode_response, ApiResponseBase};
//!
//! let resp: ApiResponseBase = decode_response(br#"{"errcode": 0, "errmsg": "ok"}"#).unwrap();
//! assert!(resp.is_success());
//!
//! let err = decode_response::<ApiResponseBase>(br#"{"errcode": 40013, "errmsg": "invalid appid"}"#)
//!     .unwrap_err();
//! assert_eq!(err.api_code(), Some(40013));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::WechatError;

/// Success code of the response envelope
pub const ERRCODE_OK: i32 = 0;

/// The `errcode` / `errmsg` envelope shared by every response.
///
/// Also usable as the result type of endpoints that return nothing beyond
/// success or failure.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiResponseBase {
    /// Error code (`0` = success)
    #[serde(default)]
    pub errcode: i32,
    /// Error message
    #[serde(default)]
    pub errmsg: String,
}

impl ApiResponseBase {
    /// Create a success response.
    pub fn success() -> Self {
        Self {
            errcode: ERRCODE_OK,
            errmsg: "ok".to_string(),
        }
    }

    /// Create an error response with the given code and message.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            errcode: code,
            errmsg: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errcode == ERRCODE_OK
    }

    /// `Ok(())` on success, otherwise [`WechatError::Api`] with code and message.
    pub fn check(&self) -> Result<(), WechatError> {
        WechatError::check_api(self.errcode, &self.errmsg)
    }
}

/// Decode a buffered response body.
///
/// The envelope is checked before `T` is decoded from the same bytes.
///
/// # Errors
/// - [`WechatError::Decode`] if the body is not JSON or does not match `T`
/// - [`WechatError::Api`] if `errcode` is non-zero
pub fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, WechatError> {
    let envelope: ApiResponseBase = serde_json::from_slice(body).map_err(WechatError::Decode)?;
    envelope.check()?;
    serde_json::from_slice(body).map_err(WechatError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Session {
        openid: String,
        session_key: String,
        #[serde(default)]
        unionid: Option<String>,
    }

    #[test]
    fn test_api_response_base_success() {
        let resp = ApiResponseBase::success();
        assert_eq!(resp.errcode, 0);
        assert_eq!(resp.errmsg, "ok");
        assert!(resp.is_success());
        assert!(resp.check().is_ok());
    }

    #[test]
    fn test_api_response_base_error() {
        let resp = ApiResponseBase::error(40013, "invalid appid");
        assert!(!resp.is_success());
        assert!(resp.check().is_err());
    }

    #[test]
    fn test_api_response_base_defaults_on_missing_fields() {
        let resp: ApiResponseBase = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.errcode, 0);
        assert!(resp.errmsg.is_empty());
        assert!(resp.is_success());
    }

    #[test]
    fn test_decode_success_populates_every_field() {
        let body = br#"{
            "openid": "oABC123xyz",
            "session_key": "key==",
            "unionid": "uABC",
            "errcode": 0,
            "errmsg": "ok"
        }"#;
        let session: Session = decode_response(body).unwrap();
        assert_eq!(session.openid, "oABC123xyz");
        assert_eq!(session.session_key, "key==");
        assert_eq!(session.unionid.as_deref(), Some("uABC"));
    }

    #[test]
    fn test_decode_success_without_envelope_fields() {
        let body = br#"{"openid": "o1", "session_key": "k"}"#;
        let session: Session = decode_response(body).unwrap();
        assert_eq!(session.openid, "o1");
        assert!(session.unionid.is_none());
    }

    #[test]
    fn test_decode_remote_error_carries_exact_code_and_message() {
        let body = br#"{"errcode": 40029, "errmsg": "invalid code, rid: 5f1a"}"#;
        let err = decode_response::<Session>(body).unwrap_err();
        match err {
            WechatError::Api { code, message } => {
                assert_eq!(code, 40029);
                assert_eq!(message, "invalid code, rid: 5f1a");
            }
            other => panic!("Expected WechatError::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_remote_error_wins_over_shape_mismatch() {
        // openid/session_key missing: the envelope must be reported, not the shape.
        let body = br#"{"errcode": -1, "errmsg": "system error"}"#;
        let err = decode_response::<Session>(body).unwrap_err();
        assert!(err.is_remote());
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_response::<Session>(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, WechatError::Decode(_)));
    }

    #[test]
    fn test_decode_shape_mismatch_is_decode_error() {
        let err = decode_response::<Session>(br#"{"errcode": 0, "openid": 5}"#).unwrap_err();
        assert!(matches!(err, WechatError::Decode(_)));
    }
}
