//! Wire types for the VK JSON API (method envelope and the subset of fields
//! the pipeline reads). Deserialized with serde; mapped to domain entities in
//! [`super::mapper`].

use serde::Deserialize;

/// Every method response is wrapped in `{"response": ...}` or
/// `{"error": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub error_code: i64,
    pub error_msg: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsResponse {
    pub count: u64,
    #[serde(default)]
    pub items: Vec<ConversationItem>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationItem {
    pub conversation: ConversationInfo,
}

#[derive(Debug, Deserialize)]
pub struct ConversationInfo {
    pub peer: ApiPeer,
}

#[derive(Debug, Deserialize)]
pub struct ApiPeer {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChatInfo {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupInfo {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub items: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiMessage {
    #[serde(default)]
    pub attachments: Vec<ApiAttachment>,
    #[serde(default)]
    pub fwd_messages: Vec<ApiMessage>,
}

/// Attachment with its declared type string and the type-specific payload
/// embedded under a field of the same name.
#[derive(Debug, Deserialize)]
pub struct ApiAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub photo: Option<ApiPhoto>,
    pub video: Option<ApiVideo>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPhoto {
    pub owner_id: i64,
    pub id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub sizes: Vec<ApiPhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPhotoSize {
    #[serde(default)]
    pub width: u32,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiVideo {
    pub owner_id: i64,
    pub id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub title: String,
    pub access_key: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoGetResponse {
    #[serde(default)]
    pub items: Vec<VideoEntry>,
}

#[derive(Debug, Deserialize)]
pub struct VideoEntry {
    pub files: Option<VideoFiles>,
}

/// Direct-download quality map returned by the privileged `video.get` call.
#[derive(Debug, Deserialize, Default)]
pub struct VideoFiles {
    pub mp4_1080: Option<String>,
    pub mp4_720: Option<String>,
    pub mp4_480: Option<String>,
    pub mp4_360: Option<String>,
    pub mp4_240: Option<String>,
    pub external: Option<String>,
}
