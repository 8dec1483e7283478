//! Temporary Media Management API
//!
//! Uploads media that can be referenced by customer service messages for
//! 3 days.
//!
//! ## Example
//!
//! ```ignore
//! use wechat_mp_client::api::media::{MediaApi, MediaType};
//!
//! let media_api = MediaApi::new(context);
//! let image = std::fs::read("image.jpg")?;
//! let response = media_api
//!     .upload_temp_media(&access_token, MediaType::Image, "image.jpg", image)
//!     .await?;
//! println!("Media ID: {}", response.media_id);
//! ```

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::endpoint::Endpoint;
use super::{WechatApi, WechatContext};
use crate::client::{MultipartField, WechatClient};
use crate::error::WechatError;

/// Form field name WeChat expects the file under
const MEDIA_FIELD: &str = "media";

/// Media type for temporary media upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image file (jpg, png)
    Image,
    /// Voice file (mp3, wav, amr)
    Voice,
    /// Video file (mp4)
    Video,
    /// Thumbnail file (jpg, png)
    Thumb,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Voice => "voice",
            MediaType::Video => "video",
            MediaType::Thumb => "thumb",
        }
    }
}

/// Response from temporary media upload
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub media_id: String,
    /// Unix timestamp of the upload
    #[serde(default)]
    pub created_at: i64,
}

pub struct MediaApi {
    context: Arc<WechatContext>,
}

impl MediaApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Upload temporary media from memory
    ///
    /// POST /cgi-bin/media/upload?access_token=ACCESS_TOKEN&type=TYPE
    ///
    /// Pass an owned `Vec<u8>` to hand the content to the request without
    /// copying it.
    pub async fn upload_temp_media(
        &self,
        access_token: &str,
        media_type: MediaType,
        filename: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<MediaUploadResponse, WechatError> {
        let field = MultipartField::bytes(MEDIA_FIELD, filename, data);
        self.upload(access_token, media_type, filename, field).await
    }

    /// Upload temporary media, reading the content from `reader`
    ///
    /// The reader is drained with blocking reads before the request is sent;
    /// use an in-memory reader or [`upload_temp_media`](Self::upload_temp_media)
    /// for large files.
    pub async fn upload_temp_media_from(
        &self,
        access_token: &str,
        media_type: MediaType,
        filename: &str,
        reader: impl Read + Send + 'static,
    ) -> Result<MediaUploadResponse, WechatError> {
        let field = MultipartField::file(MEDIA_FIELD, filename, reader);
        self.upload(access_token, media_type, filename, field).await
    }

    async fn upload(
        &self,
        access_token: &str,
        media_type: MediaType,
        filename: &str,
        field: MultipartField,
    ) -> Result<MediaUploadResponse, WechatError> {
        WechatError::require("access_token", access_token)?;
        WechatError::require("filename", filename)?;

        let path = format!(
            "{}?type={}",
            Endpoint::UploadTempMedia.path(),
            media_type.as_str()
        );
        let path = WechatClient::with_access_token(&path, access_token);

        self.context.client.post_multipart(&path, vec![field]).await
    }
}

impl WechatApi for MediaApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "media"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_wire_names() {
        assert_eq!(MediaType::Image.as_str(), "image");
        assert_eq!(MediaType::Thumb.as_str(), "thumb");
        assert_eq!(serde_json::to_value(MediaType::Voice).unwrap(), "voice");
    }

    #[test]
    fn test_upload_response_parse() {
        let json = r#"{"type": "image", "media_id": "MEDIA_ID", "created_at": 1700000000}"#;
        let response: MediaUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.media_type, "image");
        assert_eq!(response.media_id, "MEDIA_ID");
        assert_eq!(response.created_at, 1_700_000_000);
    }
}
