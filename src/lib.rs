//! WeChat Mini Program client for Rust
//!
//! A typed JSON-over-HTTP binding for the WeChat Mini Program server API.
//! Every call is a single round trip: request fields are validated locally,
//! encoded as a query string, JSON body or multipart form, sent with a fixed
//! timeout, and the response envelope (`errcode` / `errmsg`) is checked before
//! the body is decoded into the endpoint's response type.
//!
//! ## API Coverage
//!
//! | Category | Endpoints | Transport |
//! |----------|-----------|-----------|
//! | Login / Access Token / UnionID | 3 | GET, query string |
//! | Analytics (`datacube`) | 10 | POST, JSON |
//! | Temporary Media | 1 | POST, multipart |
//! | Content Security | 2 | POST, JSON / multipart |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_mp_client::WechatMp;
//! use wechat_mp_client::api::{AccessTokenRequest, AnalyticsDateRangeRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wechat = WechatMp::builder().build()?;
//!
//!     let token = wechat
//!         .get_access_token(&AccessTokenRequest::new("wx1234567890abcdef", "your_secret"))
//!         .await?;
//!
//!     let retain = wechat
//!         .get_daily_retain(
//!             &token.access_token,
//!             &AnalyticsDateRangeRequest::new("20170313", "20170313"),
//!         )
//!         .await?;
//!     println!("{} new visitors", retain.visit_uv_new.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Endpoint functions and request/response types
//! - [`client`] - HTTP transport and the [`WechatMp`] facade
//! - [`encoding`] - Query-string encoding and URL merging
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (request logging)
//! - [`pool`] - Reusable byte buffers
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use wechat_mp_client::WechatError;
//!
//! match result {
//!     Ok(response) => { /* handle success */ }
//!     Err(WechatError::MissingRequiredField { field }) => {
//!         eprintln!("missing {field}");
//!     }
//!     Err(WechatError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(WechatError::Http(e)) => {
//!         eprintln!("HTTP error: {}", e);
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {}", e);
//!     }
//! }
//! ```

pub mod api;
pub mod client;
pub mod encoding;
pub mod error;
pub mod middleware;
pub mod pool;

pub use client::{MultipartField, WechatClient, WechatClientBuilder, WechatMp, WechatMpBuilder};
pub use error::{ErrorKind, WechatError};
