//! WeChat HTTP Client module
//!
//! This module contains the WechatClient transport and the WechatMp facade.

mod wechat_client;
pub use wechat_client::{WechatClient, WechatClientBuilder};

mod multipart;
pub use multipart::MultipartField;

mod wechat_mp;
pub use wechat_mp::WechatMp;

mod builder;
pub use builder::WechatMpBuilder;
