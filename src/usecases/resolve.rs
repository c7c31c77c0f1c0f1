//! Two-stage video URL resolution.
//!
//! Access-keyed videos get a privileged "mobile" lookup for a direct file
//! URL. Everything that cannot be resolved falls back to the public
//! watch-page URL, which is recorded (with title and date) but refused by the
//! downloader. Resolution failures never propagate past the single video.

use crate::domain::{DomainError, MediaItem, VideoAttachment};
use crate::ports::VkGateway;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds the public watch-page URL for a video. Never directly
/// downloadable; the downloader rejects it by pattern.
pub fn watch_page_url(owner_id: i64, video_id: i64) -> String {
    format!("https://vk.com/video{owner_id}_{video_id}")
}

/// Resolves a `VideoAttachment` into a downloadable (or fallback) item.
pub struct VideoResolver {
    vk: Arc<dyn VkGateway>,
}

impl VideoResolver {
    pub fn new(vk: Arc<dyn VkGateway>) -> Self {
        Self { vk }
    }

    pub async fn resolve(&self, video: &VideoAttachment) -> MediaItem {
        let direct = match &video.access_key {
            Some(key) => match self
                .vk
                .video_direct_url(video.owner_id, video.id, key)
                .await
            {
                Ok(url) => url,
                Err(e) => {
                    warn!(
                        owner_id = video.owner_id,
                        video_id = video.id,
                        error = %e,
                        "direct URL resolution failed, using watch-page fallback"
                    );
                    None
                }
            },
            None => {
                debug!(
                    owner_id = video.owner_id,
                    video_id = video.id,
                    "video has no access key, using watch-page fallback"
                );
                None
            }
        };

        MediaItem::Video {
            id: format!("video{}_{}", video.owner_id, video.id),
            url: direct.unwrap_or_else(|| watch_page_url(video.owner_id, video.id)),
            title: video.title.clone(),
            date: video.date,
        }
    }
}
