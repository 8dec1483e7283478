//! WeChat Mini Program API modules
//!
//! - [`common`] - Response envelope and decoder
//! - [`endpoint`] - Endpoint inventory (name, path, transport)
//! - [`auth`] - Login session, access token, paid UnionID
//! - [`analytics`] - Retention, visit trends and other `datacube` reports
//! - [`media`] - Temporary media upload
//! - [`security`] - Content security checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_mp_client::WechatMp;
//! use wechat_mp_client::api::AnalyticsDateRangeRequest;
//!
//! let wechat = WechatMp::builder().build()?;
//! let retain = wechat
//!     .get_daily_retain(&access_token, &AnalyticsDateRangeRequest::new("20170313", "20170313"))
//!     .await?;
//! ```

pub mod analytics;
pub mod auth;
pub mod common;
pub mod endpoint;
pub mod media;
pub mod security;
pub mod r#trait;

pub use analytics::{
    AnalyticsApi, AnalyticsDateRangeRequest, AnalyticsResponse, DailySummaryItem,
    DailySummaryResponse, RetainItem, RetainResponse, VisitTrendItem, VisitTrendResponse,
};
pub use auth::{
    AccessTokenRequest, AccessTokenResponse, AuthApi, Code2SessionRequest, Code2SessionResponse,
    GrantType, PaidUnionIdRequest, PaidUnionIdResponse,
};
pub use common::{decode_response, ApiResponseBase};
pub use endpoint::{Endpoint, Transport};
pub use media::{MediaApi, MediaType, MediaUploadResponse};
pub use r#trait::{WechatApi, WechatContext};
pub use security::{
    MsgSecCheckDetail, MsgSecCheckRequest, MsgSecCheckResponse, MsgSecCheckResult,
    SecCheckScene, SecurityApi,
};
