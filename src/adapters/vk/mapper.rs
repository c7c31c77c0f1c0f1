//! Map VK wire types to domain entities.
//!
//! Attachment dispatch is a closed match over the known kind strings; unknown
//! kinds (docs, stickers, audio, ...) fall through to `Attachment::Other` and
//! are ignored downstream.

use crate::adapters::vk::api_types::{
    ApiAttachment, ApiMessage, ApiPhoto, ApiVideo, UserInfo, VideoFiles,
};
use crate::domain::{Attachment, MessageNode, PhotoAttachment, PhotoSize, VideoAttachment};

/// Map a raw message (and its forwarded subtree) to domain form.
pub fn message_node(msg: ApiMessage) -> MessageNode {
    MessageNode {
        attachments: msg.attachments.into_iter().map(attachment).collect(),
        forwarded: msg.fwd_messages.into_iter().map(message_node).collect(),
    }
}

fn attachment(raw: ApiAttachment) -> Attachment {
    match raw.kind.as_str() {
        // A kind string without its matching payload is malformed; drop the
        // attachment, not the message.
        "photo" => raw.photo.map(photo).unwrap_or(Attachment::Other),
        "video" => raw.video.map(video).unwrap_or(Attachment::Other),
        _ => Attachment::Other,
    }
}

fn photo(raw: ApiPhoto) -> Attachment {
    Attachment::Photo(PhotoAttachment {
        owner_id: raw.owner_id,
        id: raw.id,
        date: raw.date,
        sizes: raw
            .sizes
            .into_iter()
            .map(|s| PhotoSize {
                width: s.width,
                url: s.url,
            })
            .collect(),
    })
}

fn video(raw: ApiVideo) -> Attachment {
    Attachment::Video(VideoAttachment {
        owner_id: raw.owner_id,
        id: raw.id,
        date: raw.date,
        title: raw.title,
        access_key: raw.access_key,
        platform: raw.platform,
    })
}

/// Display name from a user record, trimmed ("First Last").
pub fn display_name(user: &UserInfo) -> String {
    format!("{} {}", user.first_name, user.last_name)
        .trim()
        .to_string()
}

/// Pick a direct URL from the quality map in strict descending preference
/// order; the "external" link is the last resort. This tier order is an
/// externally observable contract.
pub fn pick_direct_url(files: &VideoFiles) -> Option<&str> {
    files
        .mp4_1080
        .as_deref()
        .or(files.mp4_720.as_deref())
        .or(files.mp4_480.as_deref())
        .or(files.mp4_360.as_deref())
        .or(files.mp4_240.as_deref())
        .or(files.external.as_deref())
}
