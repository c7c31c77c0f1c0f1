//! Maps a conversation's peer id to a human-readable label.
//!
//! Resolution failures are per-item: they produce a sentinel title and never
//! abort the surrounding enumeration loop.

use crate::domain::{ConversationLabel, ConversationRef, DomainError, PeerKind};
use crate::ports::VkGateway;
use std::sync::Arc;
use tracing::warn;

/// Resolves one `ConversationRef` into a labeled entry via the gateway.
pub struct TitleResolver {
    vk: Arc<dyn VkGateway>,
}

impl TitleResolver {
    pub fn new(vk: Arc<dyn VkGateway>) -> Self {
        Self { vk }
    }

    /// Never fails: any unclassified error becomes the "resolution error"
    /// sentinel so the conversation still shows up in the selection list.
    pub async fn resolve(&self, conversation: &ConversationRef) -> ConversationLabel {
        let peer_id = conversation.peer_id;
        let title = match self.resolve_title(peer_id).await {
            Ok(title) => title,
            Err(e) => {
                warn!(peer_id, error = %e, "title resolution failed");
                "resolution error".to_string()
            }
        };
        ConversationLabel { title, peer_id }
    }

    async fn resolve_title(&self, peer_id: i64) -> Result<String, DomainError> {
        match PeerKind::of(peer_id) {
            PeerKind::Chat { chat_id } => match self.vk.chat_title(chat_id).await {
                Ok(title) => Ok(title),
                // Access denied is an expected state, not an error: the chat
                // is listed so the user can choose to skip it.
                Err(e) if e.is_access_denied() => Ok(format!("inaccessible chat {chat_id}")),
                Err(e) => Err(e),
            },
            PeerKind::User { user_id } => Ok(self
                .vk
                .user_name(user_id)
                .await?
                .unwrap_or_else(|| format!("deleted user {user_id}"))),
            PeerKind::Community { community_id } => Ok(self
                .vk
                .community_name(community_id)
                .await?
                .unwrap_or_else(|| format!("community {community_id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageNode;

    /// Gateway stub: user 10 exists, user 11 is deleted, chat 5 is access
    /// denied, chat lookups otherwise fail with transport errors, community
    /// 7 has no name.
    struct StubGateway;

    #[async_trait::async_trait]
    impl VkGateway for StubGateway {
        async fn conversation_count(&self) -> Result<u64, DomainError> {
            Ok(0)
        }

        async fn conversations_page(
            &self,
            _offset: u64,
            _count: u64,
        ) -> Result<Vec<ConversationRef>, DomainError> {
            Ok(vec![])
        }

        async fn chat_title(&self, chat_id: i64) -> Result<String, DomainError> {
            match chat_id {
                5 => Err(DomainError::Api {
                    code: 917,
                    message: "You can't access this chat".into(),
                }),
                6 => Ok("Weekend plans".into()),
                _ => Err(DomainError::Transport("timeout".into())),
            }
        }

        async fn user_name(&self, user_id: i64) -> Result<Option<String>, DomainError> {
            match user_id {
                10 => Ok(Some("First Last".into())),
                11 => Ok(None),
                _ => Err(DomainError::Transport("timeout".into())),
            }
        }

        async fn community_name(&self, community_id: i64) -> Result<Option<String>, DomainError> {
            match community_id {
                7 => Ok(None),
                8 => Ok(Some("Rust News".into())),
                _ => Err(DomainError::Transport("timeout".into())),
            }
        }

        async fn history_page(
            &self,
            _peer_id: i64,
            _offset: u64,
            _count: u64,
        ) -> Result<Vec<MessageNode>, DomainError> {
            Ok(vec![])
        }

        async fn video_direct_url(
            &self,
            _owner_id: i64,
            _video_id: i64,
            _access_key: &str,
        ) -> Result<Option<String>, DomainError> {
            Ok(None)
        }
    }

    fn resolver() -> TitleResolver {
        TitleResolver::new(Arc::new(StubGateway))
    }

    #[tokio::test]
    async fn test_chat_resolved() {
        let label = resolver()
            .resolve(&ConversationRef {
                peer_id: 2_000_000_006,
            })
            .await;
        assert_eq!(label.title, "Weekend plans");
        assert_eq!(label.peer_id, 2_000_000_006);
    }

    #[tokio::test]
    async fn test_access_denied_chat_gets_sentinel() {
        let label = resolver()
            .resolve(&ConversationRef {
                peer_id: 2_000_000_005,
            })
            .await;
        assert_eq!(label.title, "inaccessible chat 5");
    }

    #[tokio::test]
    async fn test_deleted_user_sentinel() {
        let label = resolver().resolve(&ConversationRef { peer_id: 11 }).await;
        assert_eq!(label.title, "deleted user 11");
    }

    #[tokio::test]
    async fn test_user_display_name() {
        let label = resolver().resolve(&ConversationRef { peer_id: 10 }).await;
        assert_eq!(label.title, "First Last");
    }

    #[tokio::test]
    async fn test_community_fallback_name() {
        let label = resolver().resolve(&ConversationRef { peer_id: -7 }).await;
        assert_eq!(label.title, "community 7");
    }

    #[tokio::test]
    async fn test_transport_error_maps_to_resolution_error() {
        let label = resolver().resolve(&ConversationRef { peer_id: 999 }).await;
        assert_eq!(label.title, "resolution error");
        assert_eq!(label.peer_id, 999);
    }
}
