//! Error types
//!
//! Every call returns a single [`WechatError`]. The variant tells a local
//! validation failure apart from an encoding failure, a transport failure, a
//! remote rejection (`errcode != 0`) and an undecodable body. Use
//! [`WechatError::kind`] when only the category matters.

use http::StatusCode;
use thiserror::Error;

/// Broad category of a [`WechatError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input was empty; no request was sent.
    Validation,
    /// The request could not be turned into a URL or body.
    Encoding,
    /// Network failure, timeout or non-200 HTTP status.
    Transport,
    /// The API answered with a non-zero `errcode`.
    Remote,
    /// The response body was not the expected JSON.
    Decode,
    /// The client was configured with invalid settings.
    Config,
}

/// WeChat client error types
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("request param error: {field} is empty")]
    MissingRequiredField { field: &'static str },

    #[error("request encode error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("http request error: {0}")]
    Http(#[from] HttpError),

    #[error("http response error: errcode: {code}, errmsg: {message}")]
    Api { code: i32, message: String },

    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures turning a request value into a URL or body
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("field `{field}` has unsupported type {kind}")]
    UnsupportedFieldType { field: String, kind: &'static str },

    #[error("malformed url `{url}`: {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("query serialize error: {0}")]
    Serialize(String),

    #[error("json encode error: {0}")]
    Json(#[source] serde_json::Error),

    #[error("multipart field `{field}` read error: {source}")]
    Io {
        field: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures on the wire
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("http status: {status}")]
    Status { status: StatusCode },
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout(e)
        } else {
            HttpError::Transport(e)
        }
    }
}

impl From<reqwest::Error> for WechatError {
    fn from(e: reqwest::Error) -> Self {
        WechatError::Http(e.into())
    }
}

impl WechatError {
    /// Returns `Err(WechatError::Api)` when `code` is non-zero.
    pub fn check_api(code: i32, message: &str) -> Result<(), WechatError> {
        if code != 0 {
            return Err(WechatError::Api {
                code,
                message: message.to_string(),
            });
        }
        Ok(())
    }

    /// Fails with [`WechatError::MissingRequiredField`] when `value` is empty.
    pub(crate) fn require(field: &'static str, value: &str) -> Result<(), WechatError> {
        if value.is_empty() {
            return Err(WechatError::MissingRequiredField { field });
        }
        Ok(())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WechatError::MissingRequiredField { .. } => ErrorKind::Validation,
            WechatError::Encoding(_) => ErrorKind::Encoding,
            WechatError::Http(_) => ErrorKind::Transport,
            WechatError::Api { .. } => ErrorKind::Remote,
            WechatError::Decode(_) => ErrorKind::Decode,
            WechatError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_remote(&self) -> bool {
        self.kind() == ErrorKind::Remote
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// True when the client-wide timeout elapsed before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WechatError::Http(HttpError::Timeout(_)))
    }

    /// The HTTP status of a [`HttpError::Status`] failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WechatError::Http(HttpError::Status { status }) => Some(*status),
            _ => None,
        }
    }

    /// The remote `errcode` of an [`WechatError::Api`] failure.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            WechatError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
