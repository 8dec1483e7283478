//! Middleware components
//!
//! Requests sent by [`WechatClient`](crate::client::WechatClient) can be
//! routed through a tower [`Layer`] installed with
//! [`WechatMpBuilder::with_middleware`](crate::client::WechatMpBuilder::with_middleware).
//!
//! - [`LoggingMiddleware`] - logs request/response lines with credentials redacted
//!
//! ## Usage
//!
//! ```rust
//! use wechat_mp_client::middleware::LoggingMiddleware;
//! use wechat_mp_client::WechatMp;
//!
//! let wechat = WechatMp::builder()
//!     .with_middleware(LoggingMiddleware::new())
//!     .build()
//!     .unwrap();
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::LoggingMiddleware;
pub(crate) use logging::redact_url;
