//! Implements VkGateway over the VK HTTP JSON API with reqwest.
//!
//! One bearer token per gateway; every call carries the token and API
//! version. API-reported errors are surfaced as `DomainError::Api` so the
//! title resolver can classify access-denied codes.

use crate::adapters::vk::api_types::{
    ApiEnvelope, ChatInfo, ConversationsResponse, GroupInfo, HistoryResponse, UserInfo,
    VideoGetResponse,
};
use crate::adapters::vk::mapper;
use crate::domain::{ConversationRef, DomainError, MessageNode};
use crate::ports::VkGateway;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

const API_BASE: &str = "https://api.vk.com/method";
const API_VERSION: &str = "5.131";

/// VK gateway adapter. Thin per-method wrappers over one `call` helper.
pub struct VkHttpGateway {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl VkHttpGateway {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, API_BASE.to_string())
    }

    /// Custom API base, used by tests to point at a local mock server.
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "VK API call");

        let mut query: Vec<(&str, String)> = vec![
            ("access_token", self.token.clone()),
            ("v", API_VERSION.to_string()),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        let envelope: ApiEnvelope<T> = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        if let Some(err) = envelope.error {
            return Err(DomainError::Api {
                code: err.error_code,
                message: err.error_msg,
            });
        }
        envelope
            .response
            .ok_or_else(|| DomainError::Transport(format!("{method}: missing response field")))
    }
}

#[async_trait]
impl VkGateway for VkHttpGateway {
    async fn conversation_count(&self) -> Result<u64, DomainError> {
        let resp: ConversationsResponse = self
            .call("messages.getConversations", &[("count", "0".to_string())])
            .await?;
        Ok(resp.count)
    }

    async fn conversations_page(
        &self,
        offset: u64,
        count: u64,
    ) -> Result<Vec<ConversationRef>, DomainError> {
        let resp: ConversationsResponse = self
            .call(
                "messages.getConversations",
                &[
                    ("count", count.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        Ok(resp
            .items
            .into_iter()
            .map(|item| ConversationRef {
                peer_id: item.conversation.peer.id,
            })
            .collect())
    }

    async fn chat_title(&self, chat_id: i64) -> Result<String, DomainError> {
        let chat: ChatInfo = self
            .call("messages.getChat", &[("chat_id", chat_id.to_string())])
            .await?;
        Ok(chat.title.unwrap_or_else(|| format!("chat {chat_id}")))
    }

    async fn user_name(&self, user_id: i64) -> Result<Option<String>, DomainError> {
        let users: Vec<UserInfo> = self
            .call(
                "users.get",
                &[
                    ("user_ids", user_id.to_string()),
                    ("fields", "first_name,last_name".to_string()),
                ],
            )
            .await?;
        Ok(users.first().map(mapper::display_name))
    }

    async fn community_name(&self, community_id: i64) -> Result<Option<String>, DomainError> {
        let groups: Vec<GroupInfo> = self
            .call("groups.getById", &[("group_id", community_id.to_string())])
            .await?;
        Ok(groups.into_iter().next().and_then(|g| g.name))
    }

    async fn history_page(
        &self,
        peer_id: i64,
        offset: u64,
        count: u64,
    ) -> Result<Vec<MessageNode>, DomainError> {
        // extended=1 is required for access keys to appear on video payloads.
        let resp: HistoryResponse = self
            .call(
                "messages.getHistory",
                &[
                    ("peer_id", peer_id.to_string()),
                    ("offset", offset.to_string()),
                    ("count", count.to_string()),
                    ("extended", "1".to_string()),
                ],
            )
            .await?;
        Ok(resp.items.into_iter().map(mapper::message_node).collect())
    }

    async fn video_direct_url(
        &self,
        owner_id: i64,
        video_id: i64,
        access_key: &str,
    ) -> Result<Option<String>, DomainError> {
        let resp: VideoGetResponse = self
            .call(
                "video.get",
                &[
                    ("videos", format!("{owner_id}_{video_id}_{access_key}")),
                    ("mobile", "1".to_string()),
                ],
            )
            .await?;
        Ok(resp
            .items
            .first()
            .and_then(|entry| entry.files.as_ref())
            .and_then(mapper::pick_direct_url)
            .map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway(server: &MockServer) -> VkHttpGateway {
        VkHttpGateway::with_base_url("test-token".to_string(), server.uri())
    }

    #[tokio::test]
    async fn test_conversation_count_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages.getConversations"))
            .and(query_param("count", "0"))
            .and(query_param("access_token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"count": 412, "items": []}
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        assert_eq!(gw.conversation_count().await.unwrap(), 412);
    }

    #[tokio::test]
    async fn test_conversations_page_maps_peer_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages.getConversations"))
            .and(query_param("count", "200"))
            .and(query_param("offset", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"count": 3, "items": [
                    {"conversation": {"peer": {"id": 123}}},
                    {"conversation": {"peer": {"id": 2000000001i64}}},
                    {"conversation": {"peer": {"id": -77}}}
                ]}
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let page = gw.conversations_page(200, 200).await.unwrap();
        assert_eq!(
            page.iter().map(|c| c.peer_id).collect::<Vec<_>>(),
            vec![123, 2_000_000_001, -77]
        );
    }

    #[tokio::test]
    async fn test_api_error_envelope_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages.getChat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"error_code": 917, "error_msg": "You can't access this chat"}
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let err = gw.chat_title(5).await.unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_user_name_empty_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users.get"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": []})),
            )
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        assert_eq!(gw.user_name(11).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_user_name_concatenated_and_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users.get"))
            .and(query_param("fields", "first_name,last_name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [{"id": 10, "first_name": "First", "last_name": "Last"}]
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        assert_eq!(gw.user_name(10).await.unwrap().as_deref(), Some("First Last"));
    }

    #[tokio::test]
    async fn test_video_direct_url_picks_best_tier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video.get"))
            .and(query_param("videos", "-17_456_key"))
            .and(query_param("mobile", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"items": [{"files": {
                    "mp4_480": "A", "mp4_240": "B", "external": "C"
                }}]}
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        assert_eq!(
            gw.video_direct_url(-17, 456, "key").await.unwrap().as_deref(),
            Some("A")
        );
    }

    #[tokio::test]
    async fn test_video_direct_url_no_items_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video.get"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": {"items": []}})),
            )
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        assert_eq!(gw.video_direct_url(1, 2, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_page_maps_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages.getHistory"))
            .and(query_param("peer_id", "123"))
            .and(query_param("extended", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"items": [{
                    "attachments": [{"type": "photo", "photo": {
                        "owner_id": 1, "id": 2, "date": 0,
                        "sizes": [{"width": 10, "url": "u"}]
                    }}],
                    "fwd_messages": []
                }]}
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let page = gw.history_page(123, 0, 200).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].attachments.len(), 1);
    }
}
