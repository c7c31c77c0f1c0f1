//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ConversationRef, DomainError, MessageNode};
use std::path::Path;

/// VK API gateway. One method per platform endpoint the pipeline needs.
#[async_trait::async_trait]
pub trait VkGateway: Send + Sync {
    /// Total number of conversations, obtained via a zero-count probe call.
    async fn conversation_count(&self) -> Result<u64, DomainError>;

    /// One page of the conversations listing.
    async fn conversations_page(
        &self,
        offset: u64,
        count: u64,
    ) -> Result<Vec<ConversationRef>, DomainError>;

    /// Title of a group chat by chat id. Access-denied errors surface as
    /// `DomainError::Api` with a code the caller can classify.
    async fn chat_title(&self, chat_id: i64) -> Result<String, DomainError>;

    /// Display name ("First Last", trimmed) for a user. `None` when the
    /// lookup returns no records (deleted account).
    async fn user_name(&self, user_id: i64) -> Result<Option<String>, DomainError>;

    /// Community name by community id. `None` when the name is missing.
    async fn community_name(&self, community_id: i64) -> Result<Option<String>, DomainError>;

    /// One page of message history for a peer, with attachments and the
    /// forwarded-message tree mapped to domain form.
    async fn history_page(
        &self,
        peer_id: i64,
        offset: u64,
        count: u64,
    ) -> Result<Vec<MessageNode>, DomainError>;

    /// Second-stage resolution for access-key-protected videos: privileged
    /// "mobile" lookup returning the best available direct file URL, or
    /// `None` when the response carries no usable quality tier.
    async fn video_direct_url(
        &self,
        owner_id: i64,
        video_id: i64,
        access_key: &str,
    ) -> Result<Option<String>, DomainError>;
}

/// Media retrieval port. Fetches one URL to a local path and stamps metadata.
/// Never fails the caller: all errors are logged and become `false`.
#[async_trait::async_trait]
pub trait DownloadPort: Send + Sync {
    async fn download(&self, url: &str, dest: &Path, original_ts: Option<i64>) -> bool;
}
