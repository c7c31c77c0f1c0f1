//! Pipeline orchestrator: enumeration -> title resolution -> [selection by
//! the UI] -> history paging -> extraction -> video resolution -> download ->
//! stamping.
//!
//! Strictly sequential: one conversation at a time, one attachment at a time.
//! Cancellation is cooperative (atomic flag polled before each conversation
//! and each attachment); partially written output is never rolled back.

use crate::domain::{ConversationLabel, DomainError, DownloadStats, MediaItem};
use crate::ports::{DownloadPort, VkGateway};
use crate::usecases::extract::{Extracted, extract_media};
use crate::usecases::paginate::{Paginator, progress_percent};
use crate::usecases::{TitleResolver, VideoResolver};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Characters that are unsafe in directory names across platforms; each is
/// replaced with an underscore.
const FORBIDDEN_PATH_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Directory name for a conversation, derived from its resolved title.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if FORBIDDEN_PATH_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Orchestrates one extraction pass. Owns the cancel flag (single writer is
/// the signal handler, readers are the worker loops) and the bounded progress
/// channel consumed by the UI.
pub struct PipelineService {
    vk: Arc<dyn VkGateway>,
    downloader: Arc<dyn DownloadPort>,
    paginator: Paginator,
    titles: TitleResolver,
    videos: VideoResolver,
    cancel: Arc<AtomicBool>,
    progress: mpsc::Sender<u8>,
}

impl PipelineService {
    pub fn new(
        vk: Arc<dyn VkGateway>,
        downloader: Arc<dyn DownloadPort>,
        page_delay: Duration,
        cancel: Arc<AtomicBool>,
        progress: mpsc::Sender<u8>,
    ) -> Self {
        Self {
            titles: TitleResolver::new(Arc::clone(&vk)),
            videos: VideoResolver::new(Arc::clone(&vk)),
            paginator: Paginator::new(page_delay),
            vk,
            downloader,
            cancel,
            progress,
        }
    }

    fn canceled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Progress is lossy on purpose: a full channel drops the update rather
    /// than stalling the pipeline.
    fn report(&self, percent: u8) {
        let _ = self.progress.try_send(percent);
    }

    /// Enumerate every conversation and resolve its label. Fatal only when
    /// the conversations endpoint itself cannot be paged; per-item resolution
    /// failures degrade to sentinel labels.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationLabel>, DomainError> {
        let total = self.vk.conversation_count().await?;
        info!(total, "enumerating conversations");

        let refs = {
            let vk = Arc::clone(&self.vk);
            self.paginator
                .collect_all(move |offset, count| {
                    let vk = Arc::clone(&vk);
                    async move { vk.conversations_page(offset, count).await }
                })
                .await?
        };

        let mut labels = Vec::with_capacity(refs.len());
        for (processed, conversation) in refs.iter().enumerate() {
            labels.push(self.titles.resolve(conversation).await);
            self.report(progress_percent(processed as u64 + 1, total));
        }

        info!(count = labels.len(), "conversation enumeration complete");
        Ok(labels)
    }

    /// Download all media for the selected conversations into
    /// `destination_root/<sanitized title>/<attachment id>.<ext>`.
    pub async fn download_selected(
        &self,
        selected: &[ConversationLabel],
        destination_root: &Path,
    ) -> Result<DownloadStats, DomainError> {
        let mut stats = DownloadStats::default();
        let total_dialogs = selected.len();

        'dialogs: for (dialog_idx, label) in selected.iter().enumerate() {
            if self.canceled() {
                stats.canceled = true;
                break;
            }

            let dir_name = match sanitize_title(&label.title) {
                name if name.is_empty() => label.peer_id.to_string(),
                name => name,
            };
            let dialog_dir = destination_root.join(&dir_name);
            if let Err(e) = tokio::fs::create_dir_all(&dialog_dir).await {
                warn!(peer_id = label.peer_id, path = %dialog_dir.display(), error = %e, "cannot create conversation directory, skipping");
                continue;
            }

            let items = match self.collect_media(label.peer_id).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(peer_id = label.peer_id, error = %e, "history retrieval failed, skipping conversation");
                    continue;
                }
            };
            info!(
                peer_id = label.peer_id,
                title = %label.title,
                count = items.len(),
                "media discovered"
            );

            let per_dialog = items.len();
            for (done, item) in items.iter().enumerate() {
                if self.canceled() {
                    stats.canceled = true;
                    break 'dialogs;
                }

                let dest = dialog_dir.join(format!("{}.{}", item.id(), item.extension()));
                if self
                    .downloader
                    .download(item.url(), &dest, Some(item.date()))
                    .await
                {
                    stats.downloaded += 1;
                } else {
                    stats.skipped += 1;
                }

                self.report(overall_percent(
                    dialog_idx,
                    total_dialogs,
                    done + 1,
                    per_dialog,
                ));
            }
        }

        if !stats.canceled {
            self.report(100);
        }
        info!(
            downloaded = stats.downloaded,
            skipped = stats.skipped,
            canceled = stats.canceled,
            "download pass finished"
        );
        Ok(stats)
    }

    /// Page through one conversation's history and flatten it into resolved
    /// media items. Rebuilt from scratch on every call; no cross-run cache.
    async fn collect_media(&self, peer_id: i64) -> Result<Vec<MediaItem>, DomainError> {
        let nodes = {
            let vk = Arc::clone(&self.vk);
            self.paginator
                .collect_all(move |offset, count| {
                    let vk = Arc::clone(&vk);
                    async move { vk.history_page(peer_id, offset, count).await }
                })
                .await?
        };

        let mut items = Vec::new();
        for node in &nodes {
            for extracted in extract_media(node) {
                match extracted {
                    Extracted::Photo(item) => items.push(item),
                    Extracted::Video(video) => items.push(self.videos.resolve(&video).await),
                }
            }
        }
        Ok(items)
    }
}

/// Overall percentage across dialogs, advancing fractionally within the
/// current dialog's attachment list.
fn overall_percent(
    done_dialogs: usize,
    total_dialogs: usize,
    done_items: usize,
    total_items: usize,
) -> u8 {
    if total_dialogs == 0 {
        return 100;
    }
    let within = if total_items == 0 {
        1.0
    } else {
        done_items as f64 / total_items as f64
    };
    let percent = (done_dialogs as f64 + within) / total_dialogs as f64 * 100.0;
    percent.min(100.0).floor() as u8
}
