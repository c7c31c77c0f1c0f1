//! Implements DownloadPort. Streaming HTTP transfer for plain URLs, yt-dlp
//! subprocess for direct media streams (container extension or adaptive
//! manifest), metadata stamping afterwards.
//!
//! Never propagates: every failure is logged with URL and destination and
//! becomes a `false` result so the pipeline skips the item and moves on.

use crate::adapters::media::stamper;
use crate::domain::DomainError;
use crate::ports::DownloadPort;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Watch-page URLs carry this pattern; they render an HTML player, not a
/// media stream, and are never downloadable.
const WATCH_PAGE_PATTERN: &str = "vk.com/video";

/// yt-dlp format preference: best mp4 video+audio pair, then best combined
/// mp4, then whatever is best.
const YTDLP_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// URL shapes handed to yt-dlp instead of a plain byte transfer.
fn is_stream_url(url: &str) -> bool {
    [".mp4", ".m3u8"].iter().any(|pattern| url.contains(pattern))
}

/// Media downloader adapter.
pub struct MediaDownloader {
    http: reqwest::Client,
    ytdlp_bin: String,
}

impl MediaDownloader {
    /// `ytdlp_bin`: yt-dlp binary name or path (config override).
    pub fn new(ytdlp_bin: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            ytdlp_bin,
        }
    }

    async fn transfer(&self, url: &str, dest: &Path) -> Result<(), DomainError> {
        if is_stream_url(url) {
            self.run_ytdlp(url, dest).await
        } else {
            self.stream_to_file(url, dest).await
        }
    }

    /// Plain sequential byte transfer: open the URL, write chunks as they
    /// arrive.
    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<(), DomainError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DomainError::Download(e.to_string()))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| DomainError::Download(e.to_string()))?;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DomainError::Download(e.to_string()))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| DomainError::Download(e.to_string()))?;
        }
        file.flush()
            .await
            .map_err(|e| DomainError::Download(e.to_string()))?;
        Ok(())
    }

    /// Adaptive-format download via yt-dlp. The output template replaces the
    /// destination extension with yt-dlp's resolved final format.
    async fn run_ytdlp(&self, url: &str, dest: &Path) -> Result<(), DomainError> {
        let template = output_template(dest);
        let status = Command::new(&self.ytdlp_bin)
            .arg("--quiet")
            .arg("-f")
            .arg(YTDLP_FORMAT)
            .arg("-o")
            .arg(&template)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| DomainError::Download(format!("{}: {}", self.ytdlp_bin, e)))?;

        if !status.success() {
            return Err(DomainError::Download(format!(
                "{} exited with {}",
                self.ytdlp_bin, status
            )));
        }
        Ok(())
    }
}

/// `<dest without extension>.%(ext)s`, yt-dlp's output-template syntax.
fn output_template(dest: &Path) -> PathBuf {
    let stem = dest.with_extension("");
    PathBuf::from(format!("{}.%(ext)s", stem.display()))
}

#[async_trait]
impl DownloadPort for MediaDownloader {
    async fn download(&self, url: &str, dest: &Path, original_ts: Option<i64>) -> bool {
        if url.is_empty() {
            warn!(path = %dest.display(), "empty media URL, skipping");
            return false;
        }
        if url.contains(WATCH_PAGE_PATTERN) {
            warn!(url, "no direct link available, skipping watch-page URL");
            return false;
        }

        if let Err(e) = self.transfer(url, dest).await {
            error!(url, path = %dest.display(), error = %e, "download failed");
            return false;
        }
        debug!(url, path = %dest.display(), "downloaded");

        // Stamping is best-effort: its failures are logged inside the
        // stamper and never flip the download result.
        if let Some(ts) = original_ts {
            let path = dest.to_path_buf();
            if let Err(e) = tokio::task::spawn_blocking(move || stamper::stamp(&path, ts)).await {
                warn!(path = %dest.display(), error = %e, "metadata stamping task failed");
            }
        }

        true
    }
}
