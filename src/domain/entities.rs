//! Domain entities. Pure data structures for the core business.
//!
//! No VK/IO types here — these are mapped from adapters.

/// Peer IDs at or above this value denote group chats; the chat id is the
/// remainder. This offset is part of the VK wire contract.
pub const GROUP_CHAT_PEER_BASE: i64 = 2_000_000_000;

/// One conversation as returned by the conversations listing. The peer id
/// encodes the peer category (see [`PeerKind`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationRef {
    pub peer_id: i64,
}

/// Peer category decoded from a raw peer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerKind {
    /// Group chat; `chat_id` = peer_id - 2_000_000_000.
    Chat { chat_id: i64 },
    /// Individual user.
    User { user_id: i64 },
    /// Community (group/public page); `community_id` = |peer_id|.
    Community { community_id: i64 },
}

impl PeerKind {
    /// Classify a peer id. Total over all i64 values:
    /// >= 2_000_000_000 chat, > 0 user, <= 0 community.
    pub fn of(peer_id: i64) -> Self {
        if peer_id >= GROUP_CHAT_PEER_BASE {
            PeerKind::Chat {
                chat_id: peer_id - GROUP_CHAT_PEER_BASE,
            }
        } else if peer_id > 0 {
            PeerKind::User { user_id: peer_id }
        } else {
            PeerKind::Community {
                community_id: peer_id.abs(),
            }
        }
    }
}

/// Human-readable label for a conversation. `title` is either a resolved
/// display name or a sentinel ("inaccessible chat N", "deleted user N",
/// "resolution error"). Rebuilt fully on every enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationLabel {
    pub title: String,
    pub peer_id: i64,
}

/// One message with its attachments and forwarded subtree, as mapped from the
/// raw API response. Forwarding depth is unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageNode {
    pub attachments: Vec<Attachment>,
    pub forwarded: Vec<MessageNode>,
}

/// Typed attachment payload. Unknown attachment kinds map to `Other` and are
/// ignored by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Photo(PhotoAttachment),
    Video(VideoAttachment),
    Other,
}

/// One size variant of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSize {
    pub width: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoAttachment {
    pub owner_id: i64,
    pub id: i64,
    pub date: i64,
    pub sizes: Vec<PhotoSize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoAttachment {
    pub owner_id: i64,
    pub id: i64,
    pub date: i64,
    pub title: String,
    /// Capability token required to resolve a direct file URL for
    /// privacy-restricted videos.
    pub access_key: Option<String>,
    /// Non-null when the video is hosted on a third-party platform; such
    /// videos are not retrievable and are dropped during extraction.
    pub platform: Option<String>,
}

/// A downloadable media descriptor. Video `url` is either a resolved direct
/// file URL or a fallback watch-page URL the downloader will refuse.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaItem {
    Photo {
        id: String,
        url: String,
        date: i64,
    },
    Video {
        id: String,
        url: String,
        title: String,
        date: i64,
    },
}

impl MediaItem {
    pub fn id(&self) -> &str {
        match self {
            MediaItem::Photo { id, .. } | MediaItem::Video { id, .. } => id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            MediaItem::Photo { url, .. } | MediaItem::Video { url, .. } => url,
        }
    }

    pub fn date(&self) -> i64 {
        match self {
            MediaItem::Photo { date, .. } | MediaItem::Video { date, .. } => *date,
        }
    }

    /// File extension for the archived copy.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaItem::Photo { .. } => "jpg",
            MediaItem::Video { .. } => "mp4",
        }
    }
}

/// Result of one download pass, reported back to the UI.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub canceled: bool,
}
